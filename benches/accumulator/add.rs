/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::Rng;
use rsa_accumulator::group::Rsa;
use rsa_accumulator::{Accumulator, MembershipWitness};
use rug::Integer;

fn random_elems(n: usize) -> Vec<[u8; 32]> {
  (0..n).map(|_| rand::thread_rng().gen::<[u8; 32]>()).collect()
}

fn bench_add(acc: &Accumulator<Rsa>, elems: &[[u8; 32]]) {
  let elems = elems.iter().map(|e| &e[..]).collect::<Vec<_>>();
  acc.add_batch(&elems).unwrap();
}

fn bench_iterative_add(acc: &Accumulator<Rsa>, elems: &[[u8; 32]]) {
  let mut acc = acc.clone();
  for elem in elems {
    acc = acc.add(elem).unwrap().0;
  }
}

fn bench_verify(acc: &Accumulator<Rsa>, prime: &Integer, witness: &MembershipWitness<Rsa>) {
  assert!(acc.state().verify_membership_prime(prime, witness));
}

fn init_acc() -> Accumulator<Rsa> {
  let mut acc = Accumulator::new(Rsa::rsa2048()).unwrap();
  for _ in 0..10 {
    let elems = random_elems(100);
    let elems = elems.iter().map(|e| &e[..]).collect::<Vec<_>>();
    acc = acc.add_batch(&elems).unwrap().0;
  }
  acc
}

fn criterion_benchmark(c: &mut Criterion) {
  let acc = init_acc();
  let elems = random_elems(100);
  let (acc_1, acc_2, acc_3, acc_4) = (acc.clone(), acc.clone(), acc.clone(), acc.clone());
  let (elems_1, elems_2, elems_3, elems_4) =
    (elems.clone(), elems.clone(), elems.clone(), elems.clone());

  c.bench_function("rsa_add_1", move |b| {
    b.iter(|| bench_add(&acc_1, &elems_1[0..1]))
  });
  c.bench_function("rsa_add_10", move |b| {
    b.iter(|| bench_add(&acc_2, &elems_2[0..10]))
  });
  c.bench_function("rsa_add_100", move |b| b.iter(|| bench_add(&acc_3, &elems_3)));
  c.bench_function("rsa_iterative_add_10", move |b| {
    b.iter(|| bench_iterative_add(&acc_4, &elems_4[0..10]))
  });

  let (acc, witness) = acc.add(&elems[0]).unwrap();
  let prime = witness.prime().clone();
  c.bench_function("rsa_verify", move |b| {
    b.iter(|| bench_verify(&acc, &prime, &witness))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
