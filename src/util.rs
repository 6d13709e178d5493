use crate::error::AccError;
use crate::group::Group;
use rayon::prelude::*;
use rug::Integer;

pub fn int<T>(val: T) -> Integer
where
  Integer: From<T>,
{
  Integer::from(val)
}

/// Product of a list of integers, computed as a parallel tree reduction.
pub fn product(xs: &[Integer]) -> Integer {
  xs.par_iter()
    .cloned()
    .reduce(|| int(1), |a, b| a * b)
}

/// Reduces `x` into `[0, m)`.
pub fn modulo(x: Integer, m: &Integer) -> Integer {
  let r = x % m;
  if r < 0 {
    r + m
  } else {
    r
  }
}

/// Extended Euclid over non-negative `x` and `y`. Returns `(gcd, a, b)` with `a*x + b*y = gcd`.
///
/// Iterative, and bounded by twice the bit length of the larger input; the Euclidean algorithm
/// needs at most ~1.44 steps per bit, so hitting the bound means the inputs were bogus.
pub fn bezout(x: &Integer, y: &Integer) -> Result<(Integer, Integer, Integer), AccError> {
  if *x < 0 || *y < 0 {
    return Err(AccError::NotCoprime);
  }
  let bound = 2 * std::cmp::max(x.significant_bits(), y.significant_bits()) as usize + 2;

  let (mut old_r, mut r) = (x.clone(), y.clone());
  let (mut old_a, mut a) = (int(1), int(0));
  let (mut old_b, mut b) = (int(0), int(1));
  let mut steps = 0;

  while r != 0 {
    if steps >= bound {
      return Err(AccError::IterationBoundExceeded);
    }
    steps += 1;

    let (q, rem) = old_r.div_rem(r.clone());
    old_r = std::mem::replace(&mut r, rem);
    let next_a = old_a - Integer::from(&q * &a);
    old_a = std::mem::replace(&mut a, next_a);
    let next_b = old_b - Integer::from(&q * &b);
    old_b = std::mem::replace(&mut b, next_b);
  }

  Ok((old_r, old_a, old_b))
}

/// Computes the `(xy)`th root of `g` given the `x`th and `y`th roots of `g` and `(x, y)` coprime.
pub fn shamir_trick<G: Group>(
  group: &G,
  xth_root: &G::Elem,
  yth_root: &G::Elem,
  x: &Integer,
  y: &Integer,
) -> Result<G::Elem, AccError> {
  if group.exp(xth_root, x)? != group.exp(yth_root, y)? {
    return Err(AccError::VerificationFailed);
  }

  let (gcd, a, b) = bezout(x, y)?;

  if gcd != 1 {
    return Err(AccError::NotCoprime);
  }

  Ok(group.op(&group.exp(xth_root, &b)?, &group.exp(yth_root, &a)?))
}

/// Folds `(prime, root)` pairs into a single root of the product of all primes, running the Shamir
/// trick as a balanced tree: for `[a, b, c, d]` do `S(S(a, b), S(c, d))` instead of
/// `S(S(S(a, b), c), d)`, which keeps the exponents small on average.
pub fn divide_and_conquer<G: Group>(
  group: &G,
  roots: &[(Integer, G::Elem)],
) -> Result<(Integer, G::Elem), AccError> {
  match roots.len() {
    0 => Err(AccError::VerificationFailed),
    1 => Ok(roots[0].clone()),
    n => {
      let (l, r) = roots.split_at(n / 2);
      let (left, right) = rayon::join(
        || divide_and_conquer(group, l),
        || divide_and_conquer(group, r),
      );
      let (x, xth_root) = left?;
      let (y, yth_root) = right?;
      let root = shamir_trick(group, &xth_root, &yth_root, &x, &y)?;
      Ok((x * y, root))
    }
  }
}
