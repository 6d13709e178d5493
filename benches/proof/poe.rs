/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rsa_accumulator::group::{Group, Rsa, RsaElem, UnknownOrderGroup};
use rsa_accumulator::hash::hash_to_prime;
use rsa_accumulator::proof::Poe;
use rsa_accumulator::util::product;
use rug::Integer;

fn bench_poe_prove(group: &Rsa, base: &RsaElem, exp: &Integer, result: &RsaElem) {
  Poe::prove(group, base, exp, result).unwrap();
}

fn bench_poe_verify(
  group: &Rsa,
  base: &RsaElem,
  exp: &Integer,
  result: &RsaElem,
  proof: &Poe<Rsa>,
) {
  assert!(Poe::verify(group, base, exp, result, proof));
}

fn criterion_benchmark(c: &mut Criterion) {
  let group = Rsa::rsa2048();
  let base = group.unknown_order_elem();
  // The exponent of a 100-element batch.
  let primes = (0..100u32)
    .map(|i| hash_to_prime(&i.to_be_bytes()).unwrap())
    .collect::<Vec<_>>();
  let exp = product(&primes);
  let result = group.exp(&base, &exp).unwrap();
  let proof = Poe::prove(&group, &base, &exp, &result).unwrap();

  let (g_1, b_1, e_1, r_1) = (group.clone(), base.clone(), exp.clone(), result.clone());
  c.bench_function("poe_rsa_prove_100", move |b| {
    b.iter(|| bench_poe_prove(&g_1, &b_1, &e_1, &r_1))
  });
  c.bench_function("poe_rsa_verify_100", move |b| {
    b.iter(|| bench_poe_verify(&group, &base, &exp, &result, &proof))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
