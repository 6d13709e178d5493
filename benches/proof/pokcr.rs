/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rsa_accumulator::group::{Group, Rsa, UnknownOrderGroup};
use rsa_accumulator::hash::hash_to_prime;
use rsa_accumulator::proof::Pokcr;
use rsa_accumulator::util::product;
use rug::Integer;

fn bench_pokcr_prove(group: &Rsa, s: &Integer, x: &Integer) {
  Pokcr::prove(group, s, x).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
  let group = Rsa::rsa2048();
  let members = (0..100u32)
    .map(|i| hash_to_prime(&i.to_be_bytes()).unwrap())
    .collect::<Vec<_>>();
  let s = product(&members);
  let acc = group.exp(&group.unknown_order_elem(), &s).unwrap();
  let x = hash_to_prime(b"outsider").unwrap();
  let y = hash_to_prime(b"other outsider").unwrap();
  let proof_x = Pokcr::prove(&group, &s, &x).unwrap();
  let proof_y = Pokcr::prove(&group, &s, &y).unwrap();

  let (g_1, s_1, x_1) = (group.clone(), s.clone(), x.clone());
  c.bench_function("pokcr_rsa_prove_100", move |b| {
    b.iter(|| bench_pokcr_prove(&g_1, &s_1, &x_1))
  });
  let (g_2, acc_2, x_2, p_2) = (group.clone(), acc.clone(), x.clone(), proof_x.clone());
  c.bench_function("pokcr_rsa_verify", move |b| {
    b.iter(|| Pokcr::verify(&g_2, &acc_2, &x_2, &p_2))
  });
  c.bench_function("pokcr_rsa_aggregate", move |b| {
    b.iter(|| Pokcr::aggregate(&group, &acc, (&x, &proof_x), (&y, &proof_y)).unwrap())
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
