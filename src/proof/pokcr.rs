//! Proof of knowledge of coprimality: for an accumulator value `A = g^s` and a public `x`, a pair
//! `(a, d)` with `A^a * d^x = g`. It exists exactly when `gcd(s, x) = 1`, which is what makes it a
//! non-membership proof for the prime `x`.
use crate::error::AccError;
use crate::group::UnknownOrderGroup;
use crate::util::bezout;
use rug::Integer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pokcr<G: UnknownOrderGroup> {
  a: Integer,
  d: G::Elem,
}

impl<G: UnknownOrderGroup> Pokcr<G> {
  pub(crate) fn from_parts(a: Integer, d: G::Elem) -> Self {
    Pokcr { a, d }
  }

  /// Given the exponent `s` behind the accumulator value and `x` coprime to it, finds Bezout
  /// coefficients `a*s + b*x = 1` with `a` in `[0, x)` and returns `(a, g^b)`.
  pub fn prove(group: &G, s: &Integer, x: &Integer) -> Result<Self, AccError> {
    let (gcd, a, b) = bezout(s, x)?;
    if gcd != 1 {
      return Err(AccError::NotCoprime);
    }
    // Shift a by a multiple of x and compensate in b.
    let (k, a) = a.div_rem_euc(x.clone());
    let b = b + k * s;
    let d = group.exp(&group.unknown_order_elem(), &b)?;
    Ok(Pokcr { a, d })
  }

  pub fn verify(group: &G, acc: &G::Elem, x: &Integer, proof: &Self) -> bool {
    if *x <= 0 || proof.a < 0 || proof.a >= *x {
      return false;
    }
    let lhs = match (group.exp(acc, &proof.a), group.exp(&proof.d, x)) {
      (Ok(acc_a), Ok(d_x)) => group.op(&acc_a, &d_x),
      _ => return false,
    };
    lhs == group.unknown_order_elem()
  }

  /// Combines proofs for coprime `x1` and `x2` against the same `acc` into a proof for `x1 * x2`.
  ///
  /// With `alpha*x1 + beta*x2 = 1`, the pair `(a2*alpha*x1 + a1*beta*x2, d1^beta * d2^alpha)` works
  /// for `x1*x2`; the coefficient is then reduced below `x1*x2` by moving whole multiples into `d`.
  pub fn aggregate(
    group: &G,
    acc: &G::Elem,
    (x1, proof1): (&Integer, &Self),
    (x2, proof2): (&Integer, &Self),
  ) -> Result<Self, AccError> {
    let (gcd, alpha, beta) = bezout(x1, x2)?;
    if gcd != 1 {
      return Err(AccError::NotCoprime);
    }
    let a = Integer::from(&proof2.a * &alpha) * x1 + Integer::from(&proof1.a * &beta) * x2;
    let d = group.op(
      &group.exp(&proof1.d, &beta)?,
      &group.exp(&proof2.d, &alpha)?,
    );
    let (k, a) = a.div_rem_euc(Integer::from(x1 * x2));
    let d = group.op(&d, &group.exp(acc, &k)?);
    Ok(Pokcr { a, d })
  }

  pub fn a(&self) -> &Integer {
    &self.a
  }

  pub fn d(&self) -> &G::Elem {
    &self.d
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::group::{Group, Rsa, RsaElem};
  use crate::util::int;

  fn setup(s: u64) -> (Rsa, RsaElem) {
    let group = Rsa::rsa2048();
    let acc = group.exp(&group.unknown_order_elem(), &int(s)).unwrap();
    (group, acc)
  }

  #[test]
  fn test_pokcr() {
    let (group, acc) = setup(3 * 5 * 7);
    let s = int(3 * 5 * 7);
    let proof = Pokcr::prove(&group, &s, &int(11)).unwrap();
    assert!(*proof.a() >= 0 && *proof.a() < 11);
    assert!(Pokcr::verify(&group, &acc, &int(11), &proof));
    assert!(!Pokcr::verify(&group, &acc, &int(13), &proof));
  }

  #[test]
  fn test_pokcr_empty_set() {
    let group = Rsa::rsa2048();
    let g = group.unknown_order_elem();
    let proof = Pokcr::prove(&group, &int(1), &int(13)).unwrap();
    assert_eq!(*proof.a(), 1);
    assert_eq!(*proof.d(), group.id());
    assert!(Pokcr::verify(&group, &g, &int(13), &proof));
  }

  #[test]
  fn test_pokcr_not_coprime() {
    let group = Rsa::rsa2048();
    assert_eq!(
      Pokcr::prove(&group, &int(3 * 5 * 7), &int(5)),
      Err(AccError::NotCoprime)
    );
  }

  #[test]
  fn test_pokcr_rejects_unreduced_coefficient() {
    let (group, acc) = setup(3 * 5 * 7);
    let proof = Pokcr::prove(&group, &int(3 * 5 * 7), &int(11)).unwrap();
    let shifted = Pokcr::from_parts(
      Integer::from(proof.a() + 11),
      group.op(proof.d(), &group.inv(&acc).unwrap()),
    );
    // Still satisfies the equation, but the coefficient is out of range.
    assert!(!Pokcr::verify(&group, &acc, &int(11), &shifted));
  }

  #[test]
  fn test_pokcr_aggregate() {
    let (group, acc) = setup(3 * 5 * 7);
    let s = int(3 * 5 * 7);
    let p1 = Pokcr::prove(&group, &s, &int(11)).unwrap();
    let p2 = Pokcr::prove(&group, &s, &int(13)).unwrap();
    let agg = Pokcr::aggregate(&group, &acc, (&int(11), &p1), (&int(13), &p2)).unwrap();
    assert!(*agg.a() < 143);
    assert!(Pokcr::verify(&group, &acc, &int(143), &agg));
    assert!(!Pokcr::verify(&group, &acc, &int(11), &agg));

    assert_eq!(
      Pokcr::aggregate(&group, &acc, (&int(11), &p1), (&int(11), &p1)),
      Err(AccError::NotCoprime)
    );
  }
}
