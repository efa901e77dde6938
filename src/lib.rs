//! A generalized XMSS signature implementation.
//!
//! "Hash-Based Multi-Signatures for Post-Quantum Ethereum"
//! By Justin Drake, Dmitry Khovratovich, Mikhail Kudinov and Benedikt Wagner
//! <https://eprint.iacr.org/2025/055>
//!
#![warn(missing_docs, rust_2018_idioms)]

/// Byte length of messages that can be signed
pub const MESSAGE_LENGTH: usize = 32;

/// Tweak separator of chain hashing
pub(crate) const TWEAK_SEPARATOR_FOR_CHAIN_HASH: u8 = 0x00;
/// Tweak separator of tree hashing
pub(crate) const TWEAK_SEPARATOR_FOR_TREE_HASH: u8 = 0x01;
/// Tweak separator of message hashing
pub(crate) const TWEAK_SEPARATOR_FOR_MESSAGE_HASH: u8 = 0x02;

pub mod encoding;
mod errors;
pub mod hash_tree;
pub mod instantiations;
pub mod message_hash;
pub mod prf;
pub mod traits;
pub mod tweak_hash;
pub mod xmss;

pub use errors::{EncodingError, Error};
