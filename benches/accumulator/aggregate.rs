/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rsa_accumulator::group::Rsa;
use rsa_accumulator::Accumulator;

fn criterion_benchmark(c: &mut Criterion) {
  let elems = (0..100u32).map(|i| i.to_be_bytes()).collect::<Vec<_>>();
  let elems = elems.iter().map(|e| &e[..]).collect::<Vec<_>>();
  let (acc, witnesses) = Accumulator::new(Rsa::rsa2048())
    .unwrap()
    .add_batch(&elems)
    .unwrap();
  let outsiders = (100..110u32).map(|i| i.to_be_bytes()).collect::<Vec<_>>();
  let outsiders = outsiders.iter().map(|e| &e[..]).collect::<Vec<_>>();
  let nonmembership = outsiders
    .iter()
    .map(|e| acc.prove_nonmembership(e).unwrap())
    .collect::<Vec<_>>();

  let state = acc.state().clone();
  let aggregate = state.aggregate_membership(&witnesses).unwrap();
  let aggregate_non = state.aggregate_nonmembership(&nonmembership).unwrap();

  let (state_1, witnesses_1) = (state.clone(), witnesses.clone());
  c.bench_function("rsa_aggregate_membership_100", move |b| {
    b.iter(|| state_1.aggregate_membership(&witnesses_1).unwrap())
  });
  let (state_2, elems_2) = (state.clone(), elems.iter().map(|e| e.to_vec()).collect::<Vec<_>>());
  c.bench_function("rsa_verify_aggregated_membership_100", move |b| {
    let elems = elems_2.iter().map(|e| &e[..]).collect::<Vec<_>>();
    b.iter(|| assert!(state_2.verify_aggregated(&elems, &aggregate)))
  });
  let (state_3, nonmembership_3) = (state.clone(), nonmembership.clone());
  c.bench_function("rsa_aggregate_nonmembership_10", move |b| {
    b.iter(|| state_3.aggregate_nonmembership(&nonmembership_3).unwrap())
  });
  let batch_proof = state.prove_membership_batch(&witnesses).unwrap();
  c.bench_function("rsa_verify_membership_batch_100", |b| {
    b.iter(|| assert!(state.verify_membership_batch(&elems, &witnesses, &batch_proof)))
  });
  let outsiders = outsiders.iter().map(|e| e.to_vec()).collect::<Vec<_>>();
  c.bench_function("rsa_verify_aggregated_nonmembership_10", move |b| {
    let outsiders = outsiders.iter().map(|e| &e[..]).collect::<Vec<_>>();
    b.iter(|| assert!(state.verify_aggregated(&outsiders, &aggregate_non)))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
