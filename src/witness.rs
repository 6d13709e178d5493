//! Witnesses and the tagged proof type every verifier goes through.
use crate::accumulator::{AccumulatorState, Delta};
use crate::aggregate::AggregatedWitness;
use crate::codec::{write_elem, write_uint, Codec, Reader};
use crate::error::AccError;
use crate::group::UnknownOrderGroup;
use crate::proof::Pokcr;
use crate::util::{bezout, product};
use log::warn;
use rug::Integer;

/// `value^prime = A` for the accumulator value `A` at `version`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipWitness<G: UnknownOrderGroup> {
  prime: Integer,
  value: G::Elem,
  version: u64,
}

/// `A^a * d^prime = g` for the accumulator value `A` at `version`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonMembershipWitness<G: UnknownOrderGroup> {
  prime: Integer,
  proof: Pokcr<G>,
  version: u64,
}

/// Anything a verifier can be handed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Proof<G: UnknownOrderGroup> {
  Membership(MembershipWitness<G>),
  NonMembership(NonMembershipWitness<G>),
  Aggregated(AggregatedWitness<G>),
}

/// What a proof is supposed to show.
#[derive(Clone, Copy, Debug)]
pub enum Claim<'a> {
  Member(&'a [u8]),
  NonMember(&'a [u8]),
  Members(&'a [&'a [u8]]),
  NonMembers(&'a [&'a [u8]]),
}

impl<G: UnknownOrderGroup> MembershipWitness<G> {
  pub(crate) fn new(prime: Integer, value: G::Elem, version: u64) -> Self {
    MembershipWitness {
      prime,
      value,
      version,
    }
  }

  pub fn prime(&self) -> &Integer {
    &self.prime
  }

  pub fn value(&self) -> &G::Elem {
    &self.value
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  /// Carries the witness across `delta` to `state`. Additions raise the witness to their product;
  /// deletions are folded in with Bezout coefficients `a*p + b*x = 1`, since
  /// `(w^b * A'^a)^p = A'` whenever `w^p = A'^x`.
  pub fn update(&self, state: &AccumulatorState<G>, delta: &Delta) -> Result<Self, AccError> {
    if state.version() < self.version {
      return Err(AccError::StaleWitness {
        witness: self.version,
        state: state.version(),
      });
    }
    if delta.deleted().contains(&self.prime) {
      return Err(AccError::ElementNotMember);
    }
    let group = state.group();
    let mut value = group.exp(&self.value, &product(delta.added()))?;
    if !delta.deleted().is_empty() {
      let x = product(delta.deleted());
      let (gcd, a, b) = bezout(&self.prime, &x)?;
      if gcd != 1 {
        return Err(AccError::NotCoprime);
      }
      value = group.op(&group.exp(&value, &b)?, &group.exp(state.value(), &a)?);
    }
    let witness = MembershipWitness::new(self.prime.clone(), value, state.version());
    if !state.verify_membership_prime(&self.prime, &witness) {
      warn!("membership witness does not survive the update");
      return Err(AccError::VerificationFailed);
    }
    Ok(witness)
  }
}

impl<G: UnknownOrderGroup> NonMembershipWitness<G> {
  pub(crate) fn new(prime: Integer, proof: Pokcr<G>, version: u64) -> Self {
    NonMembershipWitness {
      prime,
      proof,
      version,
    }
  }

  pub fn prime(&self) -> &Integer {
    &self.prime
  }

  pub fn a(&self) -> &Integer {
    self.proof.a()
  }

  pub fn d(&self) -> &G::Elem {
    self.proof.d()
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  pub(crate) fn proof(&self) -> &Pokcr<G> {
    &self.proof
  }

  /// Carries the witness from `from` (the state it was issued for) across `delta` to `to`.
  ///
  /// With `u` the product of the added primes, the coefficient becomes `a' = a/u mod p` and `d`
  /// absorbs `A^((a - u*a')/p)`. With `v` the product of the deleted primes, `a*v` is reduced
  /// mod `p` and the quotient moves into `d` against the new value.
  pub fn update(
    &self,
    from: &AccumulatorState<G>,
    to: &AccumulatorState<G>,
    delta: &Delta,
  ) -> Result<Self, AccError> {
    from.check_version(self.version)?;
    if to.version() < from.version() {
      return Err(AccError::StaleWitness {
        witness: self.version,
        state: to.version(),
      });
    }
    if delta.added().contains(&self.prime) {
      return Err(AccError::AlreadyMember);
    }
    let group = to.group();
    let p = &self.prime;
    let mut a = self.a().clone();
    let mut d = self.d().clone();

    let u = product(delta.added());
    if u != 1 {
      let u_inv = match u.invert_ref(p) {
        Some(inv) => Integer::from(inv),
        None => return Err(AccError::NotCoprime),
      };
      let a_next = Integer::from(&a * &u_inv) % p;
      let shift = (a - Integer::from(&u * &a_next)).div_exact(p);
      d = group.op(&d, &group.exp(from.value(), &shift)?);
      a = a_next;
    }

    if !delta.deleted().is_empty() {
      let v = product(delta.deleted());
      let (k, a_next) = (a * v).div_rem_euc(p.clone());
      d = group.op(&d, &group.exp(to.value(), &k)?);
      a = a_next;
    }

    let witness = NonMembershipWitness::new(
      p.clone(),
      Pokcr::from_parts(a, d),
      to.version(),
    );
    if !to.verify_nonmembership_prime(p, &witness) {
      warn!("non-membership witness does not survive the update");
      return Err(AccError::VerificationFailed);
    }
    Ok(witness)
  }
}

impl<G: UnknownOrderGroup> Proof<G> {
  /// Verifies the proof against the state. A proof of the wrong kind for the claim is rejected.
  pub fn verify(&self, state: &AccumulatorState<G>, claim: &Claim) -> bool {
    match (self, claim) {
      (Proof::Membership(w), Claim::Member(element)) => state.verify_membership(element, w),
      (Proof::NonMembership(w), Claim::NonMember(element)) => {
        state.verify_nonmembership(element, w)
      }
      (Proof::Aggregated(agg @ AggregatedWitness::Membership { .. }), Claim::Members(elements))
      | (
        Proof::Aggregated(agg @ AggregatedWitness::NonMembership { .. }),
        Claim::NonMembers(elements),
      ) => state.verify_aggregated(elements, agg),
      _ => false,
    }
  }
}

/// `prime ‖ value ‖ version`.
impl<G: UnknownOrderGroup> Codec<G> for MembershipWitness<G> {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError> {
    let mut out = Vec::with_capacity(2 * group.elem_width() + 8);
    write_uint(&mut out, &self.prime, group.elem_width())?;
    write_elem(&mut out, group, &self.value)?;
    out.extend_from_slice(&self.version.to_be_bytes());
    Ok(out)
  }

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError> {
    let mut reader = Reader::new(bytes);
    let prime = reader.read_uint(group.elem_width())?;
    let value = reader.read_elem(group)?;
    let version = reader.read_u64()?;
    reader.finish()?;
    Ok(MembershipWitness::new(prime, value, version))
  }
}

/// `prime ‖ a ‖ d ‖ version`.
impl<G: UnknownOrderGroup> Codec<G> for NonMembershipWitness<G> {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError> {
    let mut out = Vec::with_capacity(3 * group.elem_width() + 8);
    write_uint(&mut out, &self.prime, group.elem_width())?;
    write_uint(&mut out, self.a(), group.elem_width())?;
    write_elem(&mut out, group, self.d())?;
    out.extend_from_slice(&self.version.to_be_bytes());
    Ok(out)
  }

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError> {
    let mut reader = Reader::new(bytes);
    let prime = reader.read_uint(group.elem_width())?;
    let a = reader.read_uint(group.elem_width())?;
    let d = reader.read_elem(group)?;
    let version = reader.read_u64()?;
    reader.finish()?;
    if a >= prime {
      return Err(AccError::ProofMalformed("coefficient not below the prime"));
    }
    Ok(NonMembershipWitness::new(
      prime,
      Pokcr::from_parts(a, d),
      version,
    ))
  }
}

const TAG_MEMBERSHIP: u8 = 0;
const TAG_NONMEMBERSHIP: u8 = 1;
const TAG_AGGREGATED: u8 = 2;

/// One tag byte, then the inner encoding.
impl<G: UnknownOrderGroup> Codec<G> for Proof<G> {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError> {
    let (tag, body) = match self {
      Proof::Membership(w) => (TAG_MEMBERSHIP, w.to_bytes(group)?),
      Proof::NonMembership(w) => (TAG_NONMEMBERSHIP, w.to_bytes(group)?),
      Proof::Aggregated(agg) => (TAG_AGGREGATED, agg.to_bytes(group)?),
    };
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(tag);
    out.extend(body);
    Ok(out)
  }

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError> {
    let (tag, body) = bytes
      .split_first()
      .ok_or(AccError::ProofMalformed("empty proof"))?;
    match *tag {
      TAG_MEMBERSHIP => Ok(Proof::Membership(MembershipWitness::from_bytes(group, body)?)),
      TAG_NONMEMBERSHIP => Ok(Proof::NonMembership(NonMembershipWitness::from_bytes(
        group, body,
      )?)),
      TAG_AGGREGATED => Ok(Proof::Aggregated(AggregatedWitness::from_bytes(group, body)?)),
      _ => Err(AccError::ProofMalformed("unknown proof tag")),
    }
  }
}
