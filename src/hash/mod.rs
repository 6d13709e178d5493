//! Hashing: BLAKE2b behind the `Hasher` interface, deterministic hash-to-prime, and Fiat-Shamir
//! transcripts whose challenges are primes.
use crate::error::AccError;
use blake2_rfc::blake2b::Blake2b as Blake2b_;
use log::trace;
use rug::integer::Order;
use rug::Integer;
use std::hash::Hasher;

pub mod primality;

// 32 bytes = 256 bits.
const HASH_LENGTH_IN_BYTES: usize = 32;

/// Bit length of every prime returned by `hash_to_prime`.
pub const PRIME_BITS: u32 = 256;

const HASH_TO_PRIME_DOMAIN: &[u8] = b"rsa-accumulator/hash-to-prime/v1";

/// Bit length of the coefficients drawn by `Transcript::challenge_coefficients`.
pub const COEFFICIENT_BITS: u32 = 128;

/// Just like Hasher, but general over output type.
pub trait GeneralHasher: Hasher + Default {
  type Output;
  /// Similar to Hasher::finish, but consumes self.
  fn finalize(self) -> Self::Output;
}

pub struct Blake2b(pub Blake2b_);

impl Default for Blake2b {
  fn default() -> Self {
    Blake2b(Blake2b_::new(HASH_LENGTH_IN_BYTES))
  }
}

impl Hasher for Blake2b {
  /// Truncates a copy of the digest to its first eight bytes.
  fn finish(&self) -> u64 {
    let digest = self.0.clone().finalize();
    u64::from_be_bytes(*array_ref![digest.as_bytes(), 0, 8])
  }
  fn write(&mut self, bytes: &[u8]) {
    Blake2b_::update(&mut self.0, bytes)
  }
}

impl GeneralHasher for Blake2b {
  type Output = [u8; HASH_LENGTH_IN_BYTES];
  fn finalize(self) -> Self::Output {
    let digest = self.0.finalize();
    *array_ref![digest.as_bytes(), 0, HASH_LENGTH_IN_BYTES]
  }
}

/// BLAKE2b-256 of `data`, optionally keyed.
pub fn blake2(data: &[u8], key: Option<&[u8]>) -> [u8; HASH_LENGTH_IN_BYTES] {
  let key: &[u8] = match key {
    Some(bytes) => bytes,
    None => &[],
  };
  let res = blake2_rfc::blake2b::blake2b(HASH_LENGTH_IN_BYTES, key, data);
  *array_ref![res.as_bytes(), 0, HASH_LENGTH_IN_BYTES]
}

/// Maps `data` to a 256-bit prime. The BLAKE2b digest seeds the search with its top and bottom bits
/// forced on; from there we walk upward over odd integers and return the first probable prime.
///
/// A pure function of `data`: every implementation that follows the same steps gets the same prime.
pub fn hash_to_prime(data: &[u8]) -> Result<Integer, AccError> {
  let mut hasher = Blake2b::default();
  hasher.write(HASH_TO_PRIME_DOMAIN);
  hasher.write(data);
  let seed = hasher.finalize();

  let mut candidate = Integer::from_digits(&seed, Order::Msf);
  candidate.set_bit(PRIME_BITS - 1, true);
  candidate.set_bit(0, true);

  let mut steps = 0u64;
  while candidate.significant_bits() <= PRIME_BITS {
    if primality::is_prob_prime(&candidate) {
      trace!("hash_to_prime found a prime after {} steps", steps);
      return Ok(candidate);
    }
    candidate += 2;
    steps += 1;
  }
  Err(AccError::PrimeSearchExhausted)
}

/// Fiat-Shamir transcript. Every absorbed field is labelled and length-prefixed so that distinct
/// transcripts never serialize to the same byte string.
pub struct Transcript(Blake2b);

impl Transcript {
  pub fn new(domain: &'static [u8]) -> Self {
    let mut transcript = Transcript(Blake2b::default());
    transcript.append_bytes(b"domain", domain);
    transcript
  }

  pub fn append_bytes(&mut self, label: &'static [u8], bytes: &[u8]) {
    self.0.write(&(label.len() as u64).to_be_bytes());
    self.0.write(label);
    self.0.write(&(bytes.len() as u64).to_be_bytes());
    self.0.write(bytes);
  }

  /// Absorbs a signed integer as a sign byte followed by its big-endian magnitude.
  pub fn append_integer(&mut self, label: &'static [u8], x: &Integer) {
    let mut bytes = vec![if *x < 0 { 1u8 } else { 0u8 }];
    bytes.extend(x.to_digits::<u8>(Order::Msf));
    self.append_bytes(label, &bytes);
  }

  pub fn append_u64(&mut self, label: &'static [u8], x: u64) {
    self.append_bytes(label, &x.to_be_bytes());
  }

  /// Hashes everything absorbed so far to a prime challenge.
  pub fn challenge_prime(self) -> Result<Integer, AccError> {
    hash_to_prime(&self.0.finalize())
  }

  /// Expands everything absorbed so far into `n` coefficients of exactly `COEFFICIENT_BITS` bits,
  /// the i-th one being BLAKE2b of the transcript digest and `i`.
  pub fn challenge_coefficients(self, n: usize) -> Vec<Integer> {
    let seed = self.0.finalize();
    (0..n as u64)
      .map(|i| {
        let mut hasher = Blake2b::default();
        hasher.write(&seed);
        hasher.write(&i.to_be_bytes());
        let digest = hasher.finalize();
        let mut c = Integer::from_digits(&digest[..COEFFICIENT_BITS as usize / 8], Order::Msf);
        c.set_bit(COEFFICIENT_BITS - 1, true);
        c
      })
      .collect()
  }
}
