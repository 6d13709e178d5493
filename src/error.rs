//! Errors shared by every layer of the crate.
use thiserror::Error;

/// The different types of accumulator errors.
///
/// Verification never produces an error: a failed check is a plain `false`. `VerificationFailed`
/// exists for operations that must check a witness before acting on it (e.g. aggregation).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccError {
  /// The modulus or generator failed a sanity check. Fatal.
  #[error("invalid modulus: {0}")]
  InvalidModulus(&'static str),

  /// A group element shares a factor with the modulus. Treat as a compromised modulus.
  #[error("group element is not invertible modulo N")]
  NotInvertible,

  /// The element is already committed and the duplicate policy rejects re-adds.
  #[error("element is already a member")]
  AlreadyMember,

  /// The element is not committed, or its witness does not check out.
  #[error("element is not a member")]
  ElementNotMember,

  /// The element's prime divides the member product, i.e. it collides with a member.
  #[error("element prime is not coprime to the member product")]
  NotCoprime,

  /// A witness or proof failed to verify.
  #[error("verification failed")]
  VerificationFailed,

  /// An externally supplied encoding has the wrong size or an out-of-range field.
  #[error("malformed proof: {0}")]
  ProofMalformed(&'static str),

  /// The same element appears twice in one batch.
  #[error("duplicate element in batch")]
  DuplicateElement,

  /// A witness was issued for a different accumulator version.
  #[error("witness version {witness} does not match state version {state}")]
  StaleWitness { witness: u64, state: u64 },

  /// The upward prime search ran off the end of the 256-bit range.
  #[error("prime search exhausted the candidate range")]
  PrimeSearchExhausted,

  /// The extended Euclidean algorithm did not converge within its bound.
  #[error("extended gcd exceeded its iteration bound")]
  IterationBoundExceeded,
}

impl AccError {
  /// Errors that signal a broken or compromised setup. These must be escalated, never retried.
  pub fn is_fatal(&self) -> bool {
    match self {
      AccError::InvalidModulus(_) | AccError::NotInvertible => true,
      _ => false,
    }
  }
}
