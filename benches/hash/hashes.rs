/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::Rng;
use rsa_accumulator::hash::{blake2, hash_to_prime, Transcript};
use rug::Integer;

fn bench_blake2() {
  blake2(b"werg", None);
}

fn bench_hash_to_prime() {
  let random_bytes = rand::thread_rng().gen::<[u8; 32]>();
  hash_to_prime(&random_bytes).unwrap();
}

fn bench_transcript_challenge(x: &Integer) {
  let mut transcript = Transcript::new(b"bench");
  transcript.append_integer(b"x", x);
  transcript.challenge_prime().unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
  let x = Integer::from(Integer::u_pow_u(3, 1000));
  c.bench_function("blake2", |b| b.iter(bench_blake2));
  c.bench_function("hash_to_prime", |b| b.iter(bench_hash_to_prime));
  c.bench_function("transcript_challenge", move |b| {
    b.iter(|| bench_transcript_challenge(&x))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
