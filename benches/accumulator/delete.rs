/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rsa_accumulator::group::Rsa;
use rsa_accumulator::{Accumulator, MembershipWitness};

fn bench_delete(acc: &Accumulator<Rsa>, witnesses: &[MembershipWitness<Rsa>]) {
  acc
    .delete_witnessed(witnesses)
    .expect("Valid delete expected.");
}

fn criterion_benchmark(c: &mut Criterion) {
  let elems = (0..100u32).map(|i| i.to_be_bytes()).collect::<Vec<_>>();
  let elems = elems.iter().map(|e| &e[..]).collect::<Vec<_>>();
  let (acc, witnesses) = Accumulator::new(Rsa::rsa2048())
    .unwrap()
    .add_batch(&elems)
    .unwrap();

  let (acc_1, witnesses_1) = (acc.clone(), witnesses.clone());
  c.bench_function("rsa_delete_1", move |b| {
    b.iter(|| bench_delete(&acc_1, &witnesses_1[0..1]))
  });
  let (acc_2, witnesses_2) = (acc.clone(), witnesses.clone());
  c.bench_function("rsa_delete_10", move |b| {
    b.iter(|| bench_delete(&acc_2, &witnesses_2[0..10]))
  });
  c.bench_function("rsa_delete_100", move |b| {
    b.iter(|| bench_delete(&acc, &witnesses))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
