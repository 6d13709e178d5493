//! Accumulator library, built on a generic group interface.
//!
//! Every snapshot is immutable. Operations that "mutate" the accumulator (add, delete) take `&self`
//! and return the next snapshot, so readers holding an older one are never disturbed and a failed
//! batch leaves nothing half-applied.
use crate::codec::{write_elem, Codec, Reader};
use crate::config::{Config, DuplicatePolicy};
use crate::error::AccError;
use crate::group::{root_factor, UnknownOrderGroup};
use crate::hash::hash_to_prime;
use crate::proof::{Pokcr, Poe};
use crate::util::{divide_and_conquer, product};
use crate::witness::{MembershipWitness, NonMembershipWitness};
use log::{debug, warn};
use rayon::prelude::*;
use rug::Integer;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// The published accumulator: `value = g^(product of member primes)`, plus the member count and a
/// version that increments on every committed update. Everything a verifier needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccumulatorState<G: UnknownOrderGroup> {
  group: G,
  value: G::Elem,
  size: u64,
  version: u64,
}

/// The primes added and deleted between two snapshots. Additions apply before deletions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Delta {
  added: Vec<Integer>,
  deleted: Vec<Integer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
  Add,
  Delete,
}

/// Certifies that one committed batch moved the state value by exactly `primes`: for an add,
/// `old^P = new`; for a delete, `new^P = old`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateProof<G: UnknownOrderGroup> {
  kind: UpdateKind,
  primes: Vec<Integer>,
  poe: Poe<G>,
}

/// Prover-side accumulator: the published state plus the member set needed to issue witnesses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator<G: UnknownOrderGroup> {
  state: AccumulatorState<G>,
  members: Arc<BTreeSet<Integer>>,
  config: Config,
}

fn hash_all(elements: &[&[u8]]) -> Result<Vec<Integer>, AccError> {
  elements.par_iter().map(|e| hash_to_prime(e)).collect()
}

impl<G: UnknownOrderGroup> AccumulatorState<G> {
  /// The empty accumulator, `value = g`.
  pub fn new(group: G) -> Self {
    let value = group.unknown_order_elem();
    AccumulatorState {
      group,
      value,
      size: 0,
      version: 0,
    }
  }

  fn next(&self, value: G::Elem, size: u64) -> Self {
    AccumulatorState {
      group: self.group.clone(),
      value,
      size,
      version: self.version + 1,
    }
  }

  pub fn group(&self) -> &G {
    &self.group
  }

  pub fn value(&self) -> &G::Elem {
    &self.value
  }

  pub fn size(&self) -> u64 {
    self.size
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  pub(crate) fn check_version(&self, version: u64) -> Result<(), AccError> {
    if version != self.version {
      warn!(
        "rejecting witness for version {} against state version {}",
        version, self.version
      );
      return Err(AccError::StaleWitness {
        witness: version,
        state: self.version,
      });
    }
    Ok(())
  }

  pub fn verify_membership(&self, element: &[u8], witness: &MembershipWitness<G>) -> bool {
    match hash_to_prime(element) {
      Ok(prime) => self.verify_membership_prime(&prime, witness),
      Err(_) => false,
    }
  }

  /// Checks `witness.value^prime == value` for a witness issued at this version.
  pub fn verify_membership_prime(&self, prime: &Integer, witness: &MembershipWitness<G>) -> bool {
    if witness.prime() != prime || self.check_version(witness.version()).is_err() {
      return false;
    }
    match self.group.exp(witness.value(), prime) {
      Ok(v) => v == self.value,
      Err(_) => false,
    }
  }

  pub fn verify_nonmembership(&self, element: &[u8], witness: &NonMembershipWitness<G>) -> bool {
    match hash_to_prime(element) {
      Ok(prime) => self.verify_nonmembership_prime(&prime, witness),
      Err(_) => false,
    }
  }

  /// Checks `value^a * d^prime == g` for a witness issued at this version.
  pub fn verify_nonmembership_prime(
    &self,
    prime: &Integer,
    witness: &NonMembershipWitness<G>,
  ) -> bool {
    if witness.prime() != prime || self.check_version(witness.version()).is_err() {
      return false;
    }
    Pokcr::verify(&self.group, &self.value, prime, witness.proof())
  }

  /// Proves that `element` is not committed, given the full list of member primes behind `value`.
  /// Fails with `NotCoprime` if the element is a member, and with `VerificationFailed` if
  /// `member_primes` does not match the state.
  pub fn prove_nonmembership(
    &self,
    member_primes: &[Integer],
    element: &[u8],
  ) -> Result<NonMembershipWitness<G>, AccError> {
    self.prove_nonmembership_prime(member_primes, &hash_to_prime(element)?)
  }

  pub fn prove_nonmembership_prime(
    &self,
    member_primes: &[Integer],
    prime: &Integer,
  ) -> Result<NonMembershipWitness<G>, AccError> {
    let s = product(member_primes);
    let proof = Pokcr::prove(&self.group, &s, prime)?;
    if !Pokcr::verify(&self.group, &self.value, prime, &proof) {
      warn!("member list does not match the accumulator value");
      return Err(AccError::VerificationFailed);
    }
    Ok(NonMembershipWitness::new(prime.clone(), proof, self.version))
  }

  /// Checks that `next` is the snapshot produced by the batch `proof` certifies.
  pub fn verify_update(&self, next: &Self, proof: &UpdateProof<G>) -> bool {
    let count = proof.primes.len() as u64;
    if self.version.checked_add(1) != Some(next.version) {
      return false;
    }
    let p = product(&proof.primes);
    match proof.kind {
      UpdateKind::Add => {
        self.size.checked_add(count) == Some(next.size)
          && Poe::verify(&self.group, &self.value, &p, &next.value, &proof.poe)
      }
      UpdateKind::Delete => {
        next.size.checked_add(count) == Some(self.size)
          && Poe::verify(&self.group, &next.value, &p, &self.value, &proof.poe)
      }
    }
  }
}

impl Delta {
  pub fn new(added: Vec<Integer>, deleted: Vec<Integer>) -> Self {
    Delta { added, deleted }
  }

  pub fn from_elements(added: &[&[u8]], deleted: &[&[u8]]) -> Result<Self, AccError> {
    Ok(Delta {
      added: hash_all(added)?,
      deleted: hash_all(deleted)?,
    })
  }

  pub fn added(&self) -> &[Integer] {
    &self.added
  }

  pub fn deleted(&self) -> &[Integer] {
    &self.deleted
  }

  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.deleted.is_empty()
  }

  /// Folds a later delta into this one.
  pub fn extend(&mut self, later: &Delta) {
    self.added.extend(later.added.iter().cloned());
    self.deleted.extend(later.deleted.iter().cloned());
  }
}

impl<G: UnknownOrderGroup> UpdateProof<G> {
  pub fn kind(&self) -> UpdateKind {
    self.kind
  }

  /// The primes committed by the batch, in commit order. Callers match these against the elements
  /// they expected to change.
  pub fn primes(&self) -> &[Integer] {
    &self.primes
  }
}

impl<G: UnknownOrderGroup> Accumulator<G> {
  /// Empty accumulator with the default configuration.
  pub fn new(group: G) -> Result<Self, AccError> {
    Self::with_config(group, Config::default())
  }

  pub fn with_config(group: G, config: Config) -> Result<Self, AccError> {
    if group.security_bits() < config.min_modulus_bits {
      return Err(AccError::InvalidModulus(
        "modulus shorter than the configured minimum",
      ));
    }
    Ok(Accumulator {
      state: AccumulatorState::new(group),
      members: Arc::new(BTreeSet::new()),
      config,
    })
  }

  pub fn state(&self) -> &AccumulatorState<G> {
    &self.state
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn member_primes(&self) -> impl Iterator<Item = &Integer> {
    self.members.iter()
  }

  pub fn contains(&self, element: &[u8]) -> Result<bool, AccError> {
    Ok(self.contains_prime(&hash_to_prime(element)?))
  }

  pub fn contains_prime(&self, prime: &Integer) -> bool {
    self.members.contains(prime)
  }

  // The conciseness of accumulator.add() and low probability of confusion with implementations of
  // the Add trait probably justify this...
  #[allow(clippy::should_implement_trait)]
  /// Adds one element. The witness is the previous accumulator value.
  pub fn add(&self, element: &[u8]) -> Result<(Self, MembershipWitness<G>), AccError> {
    self.add_prime(hash_to_prime(element)?)
  }

  pub fn add_prime(&self, prime: Integer) -> Result<(Self, MembershipWitness<G>), AccError> {
    let (next, mut witnesses, _) = self.commit_add(&[prime])?;
    let witness = witnesses.pop().ok_or(AccError::VerificationFailed)?;
    Ok((next, witness))
  }

  /// Adds a batch in one update. The result, witnesses included, equals adding the elements one at
  /// a time in any order; witnesses come back in input order.
  pub fn add_batch(
    &self,
    elements: &[&[u8]],
  ) -> Result<(Self, Vec<MembershipWitness<G>>), AccError> {
    self.add_primes(&hash_all(elements)?)
  }

  pub fn add_primes(
    &self,
    primes: &[Integer],
  ) -> Result<(Self, Vec<MembershipWitness<G>>), AccError> {
    let (next, witnesses, _) = self.commit_add(primes)?;
    Ok((next, witnesses))
  }

  /// Like `add_batch`, also returning a proof that lets anyone holding the old state check the new
  /// one without redoing the exponentiation.
  pub fn add_batch_with_proof(
    &self,
    elements: &[&[u8]],
  ) -> Result<(Self, Vec<MembershipWitness<G>>, UpdateProof<G>), AccError> {
    let (next, witnesses, fresh) = self.commit_add(&hash_all(elements)?)?;
    let poe = Poe::prove(
      self.state.group(),
      self.state.value(),
      &product(&fresh),
      next.state.value(),
    )?;
    let proof = UpdateProof {
      kind: UpdateKind::Add,
      primes: fresh,
      poe,
    };
    Ok((next, witnesses, proof))
  }

  // Applies the duplicate policy, then raises the value to the product of the fresh primes. Returns
  // the next snapshot, one witness per input prime and the primes actually committed.
  fn commit_add(
    &self,
    primes: &[Integer],
  ) -> Result<(Self, Vec<MembershipWitness<G>>, Vec<Integer>), AccError> {
    let mut seen = BTreeSet::new();
    let mut fresh = Vec::with_capacity(primes.len());
    for prime in primes {
      let repeated = !seen.insert(prime);
      if repeated || self.members.contains(prime) {
        match self.config.duplicate_policy {
          DuplicatePolicy::Reject if repeated => return Err(AccError::DuplicateElement),
          DuplicatePolicy::Reject => return Err(AccError::AlreadyMember),
          DuplicatePolicy::Idempotent => continue,
        }
      }
      fresh.push(prime.clone());
    }

    let next = if fresh.is_empty() {
      self.clone()
    } else {
      let group = self.state.group();
      let new_value = group.exp(self.state.value(), &product(&fresh))?;
      let mut members = (*self.members).clone();
      members.extend(fresh.iter().cloned());
      let next = Accumulator {
        state: self
          .state
          .next(new_value, self.state.size + fresh.len() as u64),
        members: Arc::new(members),
        config: self.config.clone(),
      };
      debug!(
        "added {} elements, version {} -> {}",
        fresh.len(),
        self.state.version,
        next.state.version
      );
      next
    };

    let roots = root_factor(self.state.group(), self.state.value(), &fresh)?;
    let fresh_roots = fresh.iter().zip(roots).collect::<HashMap<_, _>>();
    let version = next.state.version;
    let witnesses = primes
      .par_iter()
      .map(|prime| match fresh_roots.get(prime) {
        Some(root) => Ok(MembershipWitness::new(prime.clone(), root.clone(), version)),
        None => next.prove_membership_prime(prime),
      })
      .collect::<Result<Vec<_>, _>>()?;
    Ok((next, witnesses, fresh))
  }

  /// Removes one element. The new value is the witness value.
  pub fn delete(&self, element: &[u8], witness: &MembershipWitness<G>) -> Result<Self, AccError> {
    self.delete_batch(&[element], std::slice::from_ref(witness))
  }

  /// Removes a batch, all or nothing: every witness is checked before anything changes.
  pub fn delete_batch(
    &self,
    elements: &[&[u8]],
    witnesses: &[MembershipWitness<G>],
  ) -> Result<Self, AccError> {
    self.check_elements(elements, witnesses)?;
    Ok(self.commit_delete(witnesses)?.0)
  }

  /// Removes the elements the witnesses were issued for.
  pub fn delete_witnessed(&self, witnesses: &[MembershipWitness<G>]) -> Result<Self, AccError> {
    Ok(self.commit_delete(witnesses)?.0)
  }

  pub fn delete_batch_with_proof(
    &self,
    elements: &[&[u8]],
    witnesses: &[MembershipWitness<G>],
  ) -> Result<(Self, UpdateProof<G>), AccError> {
    self.check_elements(elements, witnesses)?;
    let (next, p) = self.commit_delete(witnesses)?;
    let poe = Poe::prove(
      self.state.group(),
      next.state.value(),
      &p,
      self.state.value(),
    )?;
    let proof = UpdateProof {
      kind: UpdateKind::Delete,
      primes: witnesses.iter().map(|w| w.prime().clone()).collect(),
      poe,
    };
    Ok((next, proof))
  }

  fn check_elements(
    &self,
    elements: &[&[u8]],
    witnesses: &[MembershipWitness<G>],
  ) -> Result<(), AccError> {
    if elements.len() != witnesses.len() {
      return Err(AccError::ProofMalformed(
        "element and witness counts differ",
      ));
    }
    let primes = hash_all(elements)?;
    if primes
      .iter()
      .zip(witnesses.iter())
      .any(|(prime, w)| prime != w.prime())
    {
      return Err(AccError::ElementNotMember);
    }
    Ok(())
  }

  fn check_witness(&self, witness: &MembershipWitness<G>) -> Result<(), AccError> {
    self.state.check_version(witness.version())?;
    if !self.members.contains(witness.prime())
      || self.state.group().exp(witness.value(), witness.prime())? != *self.state.value()
    {
      warn!("rejecting membership witness that does not match the state");
      return Err(AccError::ElementNotMember);
    }
    Ok(())
  }

  // Returns the next snapshot and the product of the deleted primes.
  fn commit_delete(&self, witnesses: &[MembershipWitness<G>]) -> Result<(Self, Integer), AccError> {
    if witnesses.is_empty() {
      return Ok((self.clone(), Integer::from(1)));
    }
    let mut seen = BTreeSet::new();
    if !witnesses.iter().all(|w| seen.insert(w.prime())) {
      return Err(AccError::DuplicateElement);
    }
    witnesses
      .par_iter()
      .try_for_each(|w| self.check_witness(w))?;

    let roots = witnesses
      .iter()
      .map(|w| (w.prime().clone(), w.value().clone()))
      .collect::<Vec<_>>();
    let (p, new_value) = divide_and_conquer(self.state.group(), &roots)?;

    let mut members = (*self.members).clone();
    for w in witnesses {
      members.remove(w.prime());
    }
    let next = Accumulator {
      state: self
        .state
        .next(new_value, self.state.size - witnesses.len() as u64),
      members: Arc::new(members),
      config: self.config.clone(),
    };
    debug!(
      "deleted {} elements, version {} -> {}",
      witnesses.len(),
      self.state.version,
      next.state.version
    );
    Ok((next, p))
  }

  /// Witness for a committed element: `g` raised to every other member prime.
  pub fn prove_membership(&self, element: &[u8]) -> Result<MembershipWitness<G>, AccError> {
    self.prove_membership_prime(&hash_to_prime(element)?)
  }

  pub fn prove_membership_prime(&self, prime: &Integer) -> Result<MembershipWitness<G>, AccError> {
    if !self.members.contains(prime) {
      return Err(AccError::ElementNotMember);
    }
    let others = self
      .members
      .iter()
      .filter(|p| *p != prime)
      .cloned()
      .collect::<Vec<_>>();
    let group = self.state.group();
    let value = group.exp(&group.unknown_order_elem(), &product(&others))?;
    Ok(MembershipWitness::new(
      prime.clone(),
      value,
      self.state.version,
    ))
  }

  pub fn prove_nonmembership(&self, element: &[u8]) -> Result<NonMembershipWitness<G>, AccError> {
    self.prove_nonmembership_prime(&hash_to_prime(element)?)
  }

  pub fn prove_nonmembership_prime(
    &self,
    prime: &Integer,
  ) -> Result<NonMembershipWitness<G>, AccError> {
    let members = self.members.iter().cloned().collect::<Vec<_>>();
    self.state.prove_nonmembership_prime(&members, prime)
  }
}

/// `value ‖ version ‖ size`, the last two as big-endian u64.
impl<G: UnknownOrderGroup> Codec<G> for AccumulatorState<G> {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError> {
    if *group != self.group {
      return Err(AccError::ProofMalformed("state belongs to a different group"));
    }
    let mut out = Vec::with_capacity(group.elem_width() + 16);
    write_elem(&mut out, group, &self.value)?;
    out.extend_from_slice(&self.version.to_be_bytes());
    out.extend_from_slice(&self.size.to_be_bytes());
    Ok(out)
  }

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError> {
    let mut reader = Reader::new(bytes);
    let value = reader.read_elem(group)?;
    let version = reader.read_u64()?;
    let size = reader.read_u64()?;
    reader.finish()?;
    Ok(AccumulatorState {
      group: group.clone(),
      value,
      size,
      version,
    })
  }
}
