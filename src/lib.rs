//! Dynamic accumulators over groups of hidden order.
//!
//! Elements are hashed to 256-bit primes and committed as `A = g^(p_1 * ... * p_n)` in an RSA group
//! whose modulus comes from an external trusted setup. The crate supports single and batched adds
//! and deletes, membership and non-membership witnesses, witness updates, and aggregation of many
//! witnesses into one constant-size proof backed by a Wesolowski proof of exponentiation.
#![allow(clippy::many_single_char_names)]

#[macro_use]
extern crate arrayref;
#[macro_use]
extern crate lazy_static;

pub mod accumulator;
pub mod aggregate;
pub mod codec;
pub mod config;
pub mod error;
pub mod group;
pub mod hash;
pub mod proof;
pub mod util;
pub mod witness;

pub use accumulator::{Accumulator, AccumulatorState, Delta, UpdateKind, UpdateProof};
pub use aggregate::AggregatedWitness;
pub use codec::Codec;
pub use config::{Config, DuplicatePolicy};
pub use error::AccError;
pub use group::{Group, Rsa, RsaElem, UnknownOrderGroup};
pub use witness::{Claim, MembershipWitness, NonMembershipWitness, Proof};
