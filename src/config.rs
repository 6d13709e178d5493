//! Accumulator policy knobs.

/// Minimum modulus size accepted by default.
pub const DEFAULT_MIN_MODULUS_BITS: u32 = 2048;

/// What to do when an element that is already committed gets added again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
  /// Fail with `AlreadyMember`. Within a batch, a repeated element fails with `DuplicateElement`.
  Reject,
  /// Leave the state untouched and hand back a witness for the existing member.
  Idempotent,
}

impl Default for DuplicatePolicy {
  fn default() -> Self {
    DuplicatePolicy::Reject
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub duplicate_policy: DuplicatePolicy,
  /// Groups whose public parameters are shorter than this are refused.
  pub min_modulus_bits: u32,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      duplicate_policy: DuplicatePolicy::default(),
      min_modulus_bits: DEFAULT_MIN_MODULUS_BITS,
    }
  }
}

impl Config {
  pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
    self.duplicate_policy = policy;
    self
  }

  pub fn with_min_modulus_bits(mut self, bits: u32) -> Self {
    self.min_modulus_bits = bits;
    self
  }
}
