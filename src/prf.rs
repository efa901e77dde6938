//! Pseudorandom function used to derive the chain starts of each epoch from a
//! single short key, so that the secret key does not need to store them.

use core::fmt::Debug;

use rand_core::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use zeroize::Zeroize;

/// Byte size of a PRF key.
pub const PRF_KEY_SIZE: usize = 32;

/// Domain separator, prepended to every PRF input so that PRF evaluations can
/// never collide with evaluations of the tweakable hash.
const PRF_DOMAIN_SEP: [u8; 16] = [
    0x00, 0x01, 0x12, 0xff, 0x00, 0x01, 0xfa, 0xff, 0x00, 0xaf, 0x12, 0xff, 0x01, 0xfa, 0xff, 0x00,
];

/// Trait that defines a pseudorandom function, keyed by `Key`, mapping an epoch
/// and a chain index to a pseudorandom output.
pub trait Pseudorandom {
    /// Type of the PRF key
    type Key: Zeroize + Clone + Debug;
    /// Type of the PRF output
    type Output;

    /// Sample a fresh PRF key
    fn key_gen<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Key;

    /// Evaluate the PRF on the pair (epoch, index)
    fn apply(key: &Self::Key, epoch: u32, index: u64) -> Self::Output;

    /// Run checks of the parameters of `Self`. Intended for tests, panics if an
    /// invariant is broken.
    fn internal_consistency_check();
}

/// PRF implemented with SHA3-256, with outputs truncated to `OUTPUT_LEN` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaPRF<const OUTPUT_LEN: usize>;

impl<const OUTPUT_LEN: usize> Pseudorandom for ShaPRF<OUTPUT_LEN> {
    type Key = [u8; PRF_KEY_SIZE];
    type Output = [u8; OUTPUT_LEN];

    fn key_gen<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Key {
        let mut key = [0u8; PRF_KEY_SIZE];
        rng.fill_bytes(&mut key);
        key
    }

    fn apply(key: &Self::Key, epoch: u32, index: u64) -> Self::Output {
        let mut hasher = Sha3_256::new();
        hasher.update(PRF_DOMAIN_SEP);
        hasher.update(key);
        hasher.update(epoch.to_be_bytes());
        hasher.update(index.to_be_bytes());
        let digest = hasher.finalize();

        let mut output = [0u8; OUTPUT_LEN];
        output.copy_from_slice(&digest[..OUTPUT_LEN]);
        output
    }

    fn internal_consistency_check() {
        assert!(
            OUTPUT_LEN < 32,
            "SHA PRF: Output length must be less than 256 bit"
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn prf_is_deterministic() {
        let key = ShaPRF::<26>::key_gen(&mut OsRng);

        assert_eq!(ShaPRF::<26>::apply(&key, 3, 17), ShaPRF::<26>::apply(&key, 3, 17));
    }

    #[test]
    fn prf_separates_inputs() {
        let key = ShaPRF::<26>::key_gen(&mut OsRng);

        let out = ShaPRF::<26>::apply(&key, 3, 17);
        assert_ne!(out, ShaPRF::<26>::apply(&key, 4, 17));
        assert_ne!(out, ShaPRF::<26>::apply(&key, 3, 18));
    }

    #[test]
    fn prf_separates_keys() {
        let key_a = ShaPRF::<26>::key_gen(&mut OsRng);
        let key_b = ShaPRF::<26>::key_gen(&mut OsRng);
        assert_ne!(key_a, key_b);

        assert_ne!(
            ShaPRF::<26>::apply(&key_a, 0, 0),
            ShaPRF::<26>::apply(&key_b, 0, 0)
        );
    }

    #[test]
    fn known_output() {
        let key = [0x42u8; PRF_KEY_SIZE];
        assert_eq!(
            ShaPRF::<26>::apply(&key, 7, 3).to_vec(),
            hex::decode("1f1ebc8fa098ef9a1f4881de0da8c76ac267f2984c943fc81f03").unwrap()
        );
    }

    #[test]
    fn consistency() {
        ShaPRF::<16>::internal_consistency_check();
        ShaPRF::<26>::internal_consistency_check();
    }
}
