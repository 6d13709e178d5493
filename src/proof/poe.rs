//! Wesolowski's proof of exponentiation. See page 16 of B&B.
use crate::codec::{write_elem, write_uint, Codec, Reader};
use crate::error::AccError;
use crate::group::Group;
use crate::hash::Transcript;
use rug::Integer;

const POE_DOMAIN: &[u8] = b"rsa-accumulator/poe/v1";

/// Proof that `base^exp = result` for a public, non-negative `exp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poe<G: Group> {
  q: G::Elem,
  r: Integer,
}

/// Proof that `base_1^exp_1 * ... * base_n^exp_n = result`. One quotient term covers every base;
/// each exponent carries its own remainder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiPoe<G: Group> {
  q: G::Elem,
  r: Vec<Integer>,
}

// The challenge binds every base, exponent and the claimed result.
fn challenge<G: Group>(
  group: &G,
  bases: &[G::Elem],
  exps: &[Integer],
  result: &G::Elem,
) -> Result<Integer, AccError> {
  let mut transcript = Transcript::new(POE_DOMAIN);
  transcript.append_u64(b"terms", bases.len() as u64);
  for (base, exp) in bases.iter().zip(exps.iter()) {
    transcript.append_bytes(b"base", &group.elem_to_bytes(base)?);
    transcript.append_integer(b"exp", exp);
  }
  transcript.append_bytes(b"result", &group.elem_to_bytes(result)?);
  transcript.challenge_prime()
}

fn prove_terms<G: Group>(
  group: &G,
  bases: &[G::Elem],
  exps: &[Integer],
  result: &G::Elem,
) -> Result<(G::Elem, Vec<Integer>), AccError> {
  if bases.len() != exps.len() {
    return Err(AccError::ProofMalformed("bases and exponents differ in length"));
  }
  if exps.iter().any(|e| *e < 0) {
    return Err(AccError::ProofMalformed("negative exponent"));
  }
  let l = challenge(group, bases, exps, result)?;
  let mut q = group.id();
  let mut rs = Vec::with_capacity(exps.len());
  for (base, exp) in bases.iter().zip(exps.iter()) {
    let (quot, rem) = exp.clone().div_rem_euc(l.clone());
    q = group.op(&q, &group.exp(base, &quot)?);
    rs.push(rem);
  }
  Ok((q, rs))
}

// Q^l * prod(base_i^r_i) == result, after checking each r_i against the recomputed challenge.
fn verify_terms<G: Group>(
  group: &G,
  bases: &[G::Elem],
  exps: &[Integer],
  result: &G::Elem,
  q: &G::Elem,
  rs: &[Integer],
) -> bool {
  if bases.len() != exps.len() || exps.len() != rs.len() || exps.iter().any(|e| *e < 0) {
    return false;
  }
  let l = match challenge(group, bases, exps, result) {
    Ok(l) => l,
    Err(_) => return false,
  };
  let mut lhs = match group.exp(q, &l) {
    Ok(lhs) => lhs,
    Err(_) => return false,
  };
  for ((base, exp), r) in bases.iter().zip(exps.iter()).zip(rs.iter()) {
    if Integer::from(exp % &l) != *r {
      return false;
    }
    match group.exp(base, r) {
      Ok(term) => lhs = group.op(&lhs, &term),
      Err(_) => return false,
    }
  }
  lhs == *result
}

impl<G: Group> Poe<G> {
  /// Computes a proof that `base^exp = result`. The claim itself is not checked here.
  pub fn prove(
    group: &G,
    base: &G::Elem,
    exp: &Integer,
    result: &G::Elem,
  ) -> Result<Self, AccError> {
    let (q, mut r) = prove_terms(
      group,
      &[base.clone()],
      &[exp.clone()],
      result,
    )?;
    Ok(Poe {
      q,
      r: r.pop().unwrap_or_default(),
    })
  }

  /// Verifies that `base^exp = result` using two small exponentiations.
  pub fn verify(group: &G, base: &G::Elem, exp: &Integer, result: &G::Elem, proof: &Self) -> bool {
    verify_terms(
      group,
      &[base.clone()],
      &[exp.clone()],
      result,
      &proof.q,
      std::slice::from_ref(&proof.r),
    )
  }

  pub fn quotient_term(&self) -> &G::Elem {
    &self.q
  }

  pub fn remainder(&self) -> &Integer {
    &self.r
  }
}

impl<G: Group> MultiPoe<G> {
  pub fn prove(
    group: &G,
    bases: &[G::Elem],
    exps: &[Integer],
    result: &G::Elem,
  ) -> Result<Self, AccError> {
    let (q, r) = prove_terms(group, bases, exps, result)?;
    Ok(MultiPoe { q, r })
  }

  pub fn verify(
    group: &G,
    bases: &[G::Elem],
    exps: &[Integer],
    result: &G::Elem,
    proof: &Self,
  ) -> bool {
    verify_terms(group, bases, exps, result, &proof.q, &proof.r)
  }
}

// Remainders are below the 256-bit challenge, so they fit the element width of any real modulus.
impl<G: Group> Codec<G> for Poe<G> {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError> {
    let mut out = Vec::with_capacity(2 * group.elem_width());
    write_elem(&mut out, group, &self.q)?;
    write_uint(&mut out, &self.r, group.elem_width())?;
    Ok(out)
  }

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError> {
    let mut reader = Reader::new(bytes);
    let q = reader.read_elem(group)?;
    let r = reader.read_uint(group.elem_width())?;
    reader.finish()?;
    Ok(Poe { q, r })
  }
}

impl<G: Group> Codec<G> for MultiPoe<G> {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError> {
    let mut out = Vec::with_capacity((1 + self.r.len()) * group.elem_width() + 4);
    write_elem(&mut out, group, &self.q)?;
    out.extend_from_slice(&(self.r.len() as u32).to_be_bytes());
    for r in &self.r {
      write_uint(&mut out, r, group.elem_width())?;
    }
    Ok(out)
  }

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError> {
    let mut reader = Reader::new(bytes);
    let q = reader.read_elem(group)?;
    let n = u32::from_be_bytes(*array_ref![reader.read_exact(4)?, 0, 4]) as usize;
    if n.saturating_mul(group.elem_width()) > bytes.len() {
      return Err(AccError::ProofMalformed("remainder count exceeds input"));
    }
    let r = (0..n)
      .map(|_| reader.read_uint(group.elem_width()))
      .collect::<Result<Vec<_>, _>>()?;
    reader.finish()?;
    Ok(MultiPoe { q, r })
  }
}
