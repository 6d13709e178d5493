/// See https://bheisler.github.io/criterion.rs/book/getting_started.html to add more benchmarks.
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rsa_accumulator::group::{Group, Rsa, RsaElem, UnknownOrderGroup};
use rug::Integer;
use std::str::FromStr;

struct RsaBenchEnv {
  group: Rsa,
  op_l: RsaElem,
  op_r: RsaElem,
  op_large_l: RsaElem,
  op_large_r: RsaElem,
  exp_base: RsaElem,
  exp: Integer,
  elem_to_inv: RsaElem,
}

// Initialize all the elements we need here so that initialization logic
// does not pollute the benchmarks.
fn init_env() -> RsaBenchEnv {
  let group = Rsa::rsa2048();
  let op_l = group.elem(
    Integer::from_str(
      "111066521363124532171649626395987136074128970245601106158251038731392583290069",
    )
    .unwrap(),
  );
  let op_r = group.elem(
    Integer::from_str(
      "106610920435831899020588753249099054915951032185883121197718271189872278955399",
    )
    .unwrap(),
  );
  // Two near-modulus-size operands.
  let op_large_l = group.elem(Integer::from(group.modulus() - 12_345));
  let op_large_r = group.elem(Integer::from(group.modulus() / 3));
  let exp_base = group.unknown_order_elem();
  // A 256-bit prime, the size of every element representative.
  let exp = rsa_accumulator::hash::hash_to_prime(b"bench").unwrap();
  let elem_to_inv = group.unknown_order_elem();

  RsaBenchEnv {
    group,
    op_l,
    op_r,
    op_large_l,
    op_large_r,
    exp_base,
    exp,
    elem_to_inv,
  }
}

fn criterion_benchmark(c: &mut Criterion) {
  let env = init_env();
  c.bench_function("group_rsa_op", |b| {
    b.iter(|| env.group.op(&env.op_l, &env.op_r))
  });
  c.bench_function("group_rsa_op_large", |b| {
    b.iter(|| env.group.op(&env.op_large_l, &env.op_large_r))
  });
  c.bench_function("group_rsa_exp", |b| {
    b.iter(|| env.group.exp(&env.exp_base, &env.exp))
  });
  c.bench_function("group_rsa_inv", |b| b.iter(|| env.group.inv(&env.elem_to_inv)));
  c.bench_function("group_rsa_square", |b| {
    b.iter(|| env.group.op(&env.exp_base, &env.exp_base))
  });
  c.bench_function("group_rsa_elem_to_bytes", |b| {
    b.iter(|| env.group.elem_to_bytes(&env.op_large_l))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
