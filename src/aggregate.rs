//! Batch aggregation: many witnesses against one state become a single witness plus a proof of
//! exponentiation, so checking `k` claims costs a constant number of group operations.
//!
//! The `k` membership equations `w_i^p_i = A` are first merged into one by a random linear
//! combination: with Fiat-Shamir coefficients `c_i` drawn over the state and every witness, they
//! all hold (except with negligible probability) iff `prod w_i^(c_i * p_i) = A^(c_1 + ... + c_k)`.
//! The combined equation only sees witnesses up to a sign: if `w^p = -A` then `(-w)^p = A` for
//! odd `p`, so such a witness still proves membership.
use crate::accumulator::AccumulatorState;
use crate::codec::{write_elem, write_var_uint, Codec, Reader};
use crate::error::AccError;
use crate::group::{Group, UnknownOrderGroup};
use crate::hash::{hash_to_prime, Transcript};
use crate::proof::{MultiPoe, Poe, Pokcr};
use crate::util::{divide_and_conquer, int, product};
use crate::witness::{MembershipWitness, NonMembershipWitness};
use log::{debug, warn};
use rayon::prelude::*;
use rug::Integer;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AggregatedWitness<G: UnknownOrderGroup> {
  /// `value^P = A` for `P` the product of the claimed primes, certified by `proof`.
  Membership {
    value: G::Elem,
    proof: Poe<G>,
    version: u64,
  },
  /// `A^a * d^P = g`, certified by `proof`.
  NonMembership {
    a: Integer,
    d: G::Elem,
    proof: MultiPoe<G>,
    version: u64,
  },
}

impl<G: UnknownOrderGroup> AggregatedWitness<G> {
  pub fn version(&self) -> u64 {
    match self {
      AggregatedWitness::Membership { version, .. }
      | AggregatedWitness::NonMembership { version, .. } => *version,
    }
  }
}

const COMBINATION_DOMAIN: &[u8] = b"rsa-accumulator/combination/v1";

// Bases, exponents and target of the combined membership equation for `witnesses`.
fn combine_membership<G: UnknownOrderGroup>(
  state: &AccumulatorState<G>,
  witnesses: &[MembershipWitness<G>],
) -> Result<(Vec<G::Elem>, Vec<Integer>, G::Elem), AccError> {
  let group = state.group();
  let mut transcript = Transcript::new(COMBINATION_DOMAIN);
  transcript.append_bytes(b"acc", &group.elem_to_bytes(state.value())?);
  transcript.append_u64(b"version", state.version());
  transcript.append_u64(b"terms", witnesses.len() as u64);
  for w in witnesses {
    transcript.append_integer(b"prime", w.prime());
    transcript.append_bytes(b"witness", &group.elem_to_bytes(w.value())?);
  }
  let coefficients = transcript.challenge_coefficients(witnesses.len());

  let bases = witnesses.iter().map(|w| w.value().clone()).collect();
  let exps = coefficients
    .iter()
    .zip(witnesses.iter())
    .map(|(c, w)| Integer::from(c * w.prime()))
    .collect();
  let sum = coefficients.iter().fold(int(0), |acc, c| acc + c);
  let target = group.exp(state.value(), &sum)?;
  Ok((bases, exps, target))
}

fn multi_exp<G: Group>(
  group: &G,
  bases: &[G::Elem],
  exps: &[Integer],
) -> Result<G::Elem, AccError> {
  let terms = bases
    .par_iter()
    .zip(exps.par_iter())
    .map(|(base, exp)| group.exp(base, exp))
    .collect::<Result<Vec<_>, _>>()?;
  Ok(terms.iter().fold(group.id(), |acc, term| group.op(&acc, term)))
}

fn check_distinct<'a, I: Iterator<Item = &'a Integer>>(primes: I) -> Result<(), AccError> {
  let mut seen = BTreeSet::new();
  for prime in primes {
    if !seen.insert(prime) {
      return Err(AccError::DuplicateElement);
    }
  }
  Ok(())
}

// Pairwise coprimality-proof aggregation as a balanced tree, like `divide_and_conquer`.
fn fold_nonmembership<G: UnknownOrderGroup>(
  group: &G,
  acc: &G::Elem,
  proofs: &[(Integer, Pokcr<G>)],
) -> Result<(Integer, Pokcr<G>), AccError> {
  match proofs.len() {
    0 => Ok((int(1), Pokcr::from_parts(int(0), group.unknown_order_elem()))),
    1 => Ok(proofs[0].clone()),
    n => {
      let (l, r) = proofs.split_at(n / 2);
      let (left, right) = rayon::join(
        || fold_nonmembership(group, acc, l),
        || fold_nonmembership(group, acc, r),
      );
      let (x1, p1) = left?;
      let (x2, p2) = right?;
      let proof = Pokcr::aggregate(group, acc, (&x1, &p1), (&x2, &p2))?;
      Ok((x1 * x2, proof))
    }
  }
}

impl<G: UnknownOrderGroup> AccumulatorState<G> {
  /// Folds membership witnesses for distinct elements into one root `W` of the accumulator value
  /// with `W^P = A`, plus a proof of that exponentiation. Every witness is checked first.
  pub fn aggregate_membership(
    &self,
    witnesses: &[MembershipWitness<G>],
  ) -> Result<AggregatedWitness<G>, AccError> {
    check_distinct(witnesses.iter().map(|w| w.prime()))?;
    self.check_combined_membership(witnesses)?;

    let (p, value) = if witnesses.is_empty() {
      (int(1), self.value().clone())
    } else {
      let roots = witnesses
        .iter()
        .map(|w| (w.prime().clone(), w.value().clone()))
        .collect::<Vec<_>>();
      divide_and_conquer(self.group(), &roots)?
    };
    let proof = Poe::prove(self.group(), &value, &p, self.value())?;
    debug!("aggregated {} membership witnesses", witnesses.len());
    Ok(AggregatedWitness::Membership {
      value,
      proof,
      version: self.version(),
    })
  }

  // Checks every witness at once through the combined equation.
  fn check_combined_membership(
    &self,
    witnesses: &[MembershipWitness<G>],
  ) -> Result<(Vec<G::Elem>, Vec<Integer>, G::Elem), AccError> {
    for w in witnesses {
      self.check_version(w.version())?;
    }
    let (bases, exps, target) = combine_membership(self, witnesses)?;
    if multi_exp(self.group(), &bases, &exps)? != target {
      warn!("refusing a batch containing an invalid membership witness");
      return Err(AccError::ElementNotMember);
    }
    Ok((bases, exps, target))
  }

  /// Proves that every witness in the batch verifies against this state. The proof certifies the
  /// combined equation, so the verifier does one small exponentiation per witness instead of one by
  /// the full `c_i * p_i`.
  pub fn prove_membership_batch(
    &self,
    witnesses: &[MembershipWitness<G>],
  ) -> Result<MultiPoe<G>, AccError> {
    let (bases, exps, target) = self.check_combined_membership(witnesses)?;
    debug!("proved a batch of {} membership witnesses", witnesses.len());
    MultiPoe::prove(self.group(), &bases, &exps, &target)
  }

  /// Verifies a batch of membership witnesses for `elements` against one combined proof. Fails if
  /// any single witness would have failed on its own.
  pub fn verify_membership_batch(
    &self,
    elements: &[&[u8]],
    witnesses: &[MembershipWitness<G>],
    proof: &MultiPoe<G>,
  ) -> bool {
    if elements.len() != witnesses.len()
      || witnesses
        .iter()
        .any(|w| self.check_version(w.version()).is_err())
    {
      return false;
    }
    let primes = elements
      .par_iter()
      .map(|e| hash_to_prime(e))
      .collect::<Result<Vec<_>, _>>();
    let primes_match = match primes {
      Ok(primes) => primes
        .iter()
        .zip(witnesses.iter())
        .all(|(p, w)| p == w.prime()),
      Err(_) => false,
    };
    if !primes_match {
      return false;
    }
    match combine_membership(self, witnesses) {
      Ok((bases, exps, target)) => {
        MultiPoe::verify(self.group(), &bases, &exps, &target, proof)
      }
      Err(_) => false,
    }
  }

  /// Folds non-membership witnesses for distinct elements into one `(a, d)` with
  /// `A^a * d^P = g`, plus a proof of that two-base exponentiation.
  pub fn aggregate_nonmembership(
    &self,
    witnesses: &[NonMembershipWitness<G>],
  ) -> Result<AggregatedWitness<G>, AccError> {
    check_distinct(witnesses.iter().map(|w| w.prime()))?;
    witnesses.par_iter().try_for_each(|w| {
      self.check_version(w.version())?;
      if !self.verify_nonmembership_prime(w.prime(), w) {
        warn!("refusing to aggregate an invalid non-membership witness");
        return Err(AccError::VerificationFailed);
      }
      Ok(())
    })?;

    let proofs = witnesses
      .iter()
      .map(|w| (w.prime().clone(), w.proof().clone()))
      .collect::<Vec<_>>();
    let (p, folded) = fold_nonmembership(self.group(), self.value(), &proofs)?;
    let (a, d) = (folded.a().clone(), folded.d().clone());
    let proof = MultiPoe::prove(
      self.group(),
      &[self.value().clone(), d.clone()],
      &[a.clone(), p],
      &self.group().unknown_order_elem(),
    )?;
    debug!("aggregated {} non-membership witnesses", witnesses.len());
    Ok(AggregatedWitness::NonMembership {
      a,
      d,
      proof,
      version: self.version(),
    })
  }

  /// Verifies an aggregate for `elements`. Only hashing and the product of the primes grow with the
  /// batch; the group work is constant.
  pub fn verify_aggregated(&self, elements: &[&[u8]], aggregate: &AggregatedWitness<G>) -> bool {
    let primes = elements
      .par_iter()
      .map(|e| hash_to_prime(e))
      .collect::<Result<Vec<_>, _>>();
    match primes {
      Ok(primes) => self.verify_aggregated_primes(&primes, aggregate),
      Err(_) => false,
    }
  }

  pub fn verify_aggregated_primes(
    &self,
    primes: &[Integer],
    aggregate: &AggregatedWitness<G>,
  ) -> bool {
    if self.check_version(aggregate.version()).is_err() {
      return false;
    }
    let p = product(primes);
    match aggregate {
      AggregatedWitness::Membership { value, proof, .. } => {
        Poe::verify(self.group(), value, &p, self.value(), proof)
      }
      AggregatedWitness::NonMembership { a, d, proof, .. } => {
        *a < p
          && MultiPoe::verify(
            self.group(),
            &[self.value().clone(), d.clone()],
            &[a.clone(), p],
            &self.group().unknown_order_elem(),
            proof,
          )
      }
    }
  }
}

const TAG_MEMBERSHIP: u8 = 0;
const TAG_NONMEMBERSHIP: u8 = 1;

/// Membership: `0 ‖ value ‖ version ‖ poe`. Non-membership: `1 ‖ a ‖ d ‖ version ‖ multi-poe`,
/// with `a` length-prefixed since it grows with the batch.
impl<G: UnknownOrderGroup> Codec<G> for AggregatedWitness<G> {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError> {
    let mut out = vec![];
    match self {
      AggregatedWitness::Membership {
        value,
        proof,
        version,
      } => {
        out.push(TAG_MEMBERSHIP);
        write_elem(&mut out, group, value)?;
        out.extend_from_slice(&version.to_be_bytes());
        out.extend(proof.to_bytes(group)?);
      }
      AggregatedWitness::NonMembership {
        a,
        d,
        proof,
        version,
      } => {
        out.push(TAG_NONMEMBERSHIP);
        write_var_uint(&mut out, a)?;
        write_elem(&mut out, group, d)?;
        out.extend_from_slice(&version.to_be_bytes());
        out.extend(proof.to_bytes(group)?);
      }
    }
    Ok(out)
  }

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError> {
    let mut reader = Reader::new(bytes);
    let aggregate = match reader.read_u8()? {
      TAG_MEMBERSHIP => {
        let value = reader.read_elem(group)?;
        let version = reader.read_u64()?;
        let proof = Poe::from_bytes(group, reader.rest())?;
        AggregatedWitness::Membership {
          value,
          proof,
          version,
        }
      }
      TAG_NONMEMBERSHIP => {
        let a = reader.read_var_uint()?;
        let d = reader.read_elem(group)?;
        let version = reader.read_u64()?;
        let proof = MultiPoe::from_bytes(group, reader.rest())?;
        AggregatedWitness::NonMembership {
          a,
          d,
          proof,
          version,
        }
      }
      _ => return Err(AccError::ProofMalformed("unknown aggregate tag")),
    };
    reader.finish()?;
    Ok(aggregate)
  }
}
