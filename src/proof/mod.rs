//! Succinct proofs over hidden-order groups, made non-interactive with Fiat-Shamir transcripts.
mod poe;
mod pokcr;

pub use poe::{MultiPoe, Poe};
pub use pokcr::Pokcr;
