//! Groups of hidden order. The accumulator, proofs and aggregator are written against the `Group`
//! and `UnknownOrderGroup` traits; `Rsa` is the concrete implementation, an RSA group whose modulus
//! is supplied at runtime by whoever ran the trusted setup.
use crate::error::AccError;
use rug::Integer;
use std::fmt::Debug;
use std::hash::Hash;

mod rsa;
pub use rsa::{Rsa, RsaElem, RSA2048_MODULUS};

/// A finite abelian group. Group handles carry their public parameters (e.g. the modulus) and are
/// cheap to clone, so every snapshot and proof can hold one.
pub trait Group: Clone + Debug + Eq + Send + Sync {
  type Elem: Clone + Debug + Eq + Hash + Send + Sync;

  fn id(&self) -> Self::Elem;

  fn op(&self, a: &Self::Elem, b: &Self::Elem) -> Self::Elem;

  /// Fails with `NotInvertible` if `a` has no inverse, which for a hidden-order group means the
  /// secret order has leaked into the element.
  fn inv(&self, a: &Self::Elem) -> Result<Self::Elem, AccError>;

  /// Default implementation of exponentiation via repeated squaring.
  /// Implementations may provide more performant specializations
  /// (e.g. GMP's windowed exponentiation for RSA groups).
  fn exp(&self, a: &Self::Elem, n: &Integer) -> Result<Self::Elem, AccError> {
    let (mut val, mut a, mut n) = {
      if *n < 0 {
        (self.id(), self.inv(a)?, Integer::from(-n))
      } else {
        (self.id(), a.clone(), n.clone())
      }
    };
    while n > 0 {
      if n.is_odd() {
        val = self.op(&val, &a);
      }
      a = self.op(&a, &a);
      n >>= 1;
    }
    Ok(val)
  }

  /// Number of bytes in the fixed-width encoding of an element.
  fn elem_width(&self) -> usize;

  /// Fails with `ProofMalformed` if `a` is not an element of this group, e.g. one taken from a
  /// group with a larger modulus.
  fn elem_to_bytes(&self, a: &Self::Elem) -> Result<Vec<u8>, AccError>;

  /// Rejects encodings of the wrong width or out of range with `ProofMalformed`.
  fn elem_from_bytes(&self, bytes: &[u8]) -> Result<Self::Elem, AccError>;
}

/// We use this to mean a group containing elements of unknown order, not necessarily that the group
/// itself has unknown order. E.g. RSA groups.
pub trait UnknownOrderGroup: Group {
  /// The public base `g` every accumulator starts from.
  fn unknown_order_elem(&self) -> Self::Elem;

  /// Size of the public parameters in bits, e.g. the bit length of an RSA modulus.
  fn security_bits(&self) -> u32;
}

/// Given `base` and exponents `x_1..x_n`, returns `base^(x_1 * ... * x_n / x_i)` for every `i`.
///
/// Shares the work between the outputs: each half of the list is raised into the other half's
/// product before recursing, so the whole batch costs O(n log n) exponentiations by single `x_i`
/// rather than n exponentiations by the full product.
pub fn root_factor<G: Group>(
  group: &G,
  base: &G::Elem,
  xs: &[Integer],
) -> Result<Vec<G::Elem>, AccError> {
  match xs.len() {
    0 => Ok(Vec::new()),
    1 => Ok(vec![base.clone()]),
    n => {
      let half_n = n / 2;
      let raise = |elems: &[Integer]| -> Result<G::Elem, AccError> {
        elems
          .iter()
          .try_fold(base.clone(), |acc, x| group.exp(&acc, x))
      };
      let (g_l, g_r) = rayon::join(|| raise(&xs[..half_n]), || raise(&xs[half_n..]));
      let (g_l, g_r) = (g_l?, g_r?);
      let (left, right) = rayon::join(
        || root_factor(group, &g_r, &xs[..half_n]),
        || root_factor(group, &g_l, &xs[half_n..]),
      );
      let mut left = left?;
      left.append(&mut right?);
      Ok(left)
    }
  }
}
