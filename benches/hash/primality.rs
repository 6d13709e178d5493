/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::Rng;
use rsa_accumulator::hash::primality::{is_prob_prime, passes_lucas, passes_miller_rabin};
use rug::integer::Order;
use rug::Integer;

fn bench_mr2(n: &Integer) {
  passes_miller_rabin(n, 2);
}

fn bench_mr2_rug(n: &Integer) {
  // GMP does not let us demand a base-2 Fermat test so we just do one of random base.
  n.is_probably_prime(1);
}

fn bench_lucas(n: &Integer) {
  passes_lucas(n, 5);
}

fn bench_bpsw(n: &Integer) {
  is_prob_prime(n);
}

fn criterion_benchmark(c: &mut Criterion) {
  let mut random_bytes = rand::thread_rng().gen::<[u8; 32]>();
  random_bytes[0] |= 1;
  let n = Integer::from_digits(&random_bytes, Order::Lsf);
  let (n_1, n_2, n_3) = (n.clone(), n.clone(), n.clone());
  c.bench_function("mr2", move |b| b.iter(|| bench_mr2(&n)));
  c.bench_function("mr2_rug", move |b| b.iter(|| bench_mr2_rug(&n_1)));
  c.bench_function("lucas", move |b| b.iter(|| bench_lucas(&n_2)));
  c.bench_function("bpsw", move |b| b.iter(|| bench_bpsw(&n_3)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
