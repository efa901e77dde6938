//! Incomparable encodings: maps from messages to vectors of chain positions
//! such that no two codewords are pointwise comparable. This is what makes
//! one-time chain signatures unforgeable: a forger would need a codeword that
//! is at least as far along every chain as a codeword it has seen, and
//! incomparability rules that out.

use core::fmt::Debug;
use core::marker::PhantomData;

use rand_core::{CryptoRng, RngCore};

use crate::errors::EncodingError;
use crate::message_hash::MessageHash;
use crate::MESSAGE_LENGTH;

/// Trait that defines an incomparable encoding. Codewords have `DIMENSION`
/// many digits, each in the range `0..BASE`.
pub trait IncomparableEncoding {
    /// Type of the public parameter, shared with the message hash
    type Parameter;
    /// Type of the per-signature randomness
    type Randomness: Copy + PartialEq + Debug + AsRef<[u8]> + for<'a> core::convert::TryFrom<&'a [u8]>;

    /// Number of digits of a codeword
    const DIMENSION: usize;
    /// How often the signer should retry with fresh randomness before
    /// giving up. Encodings that can never fail set this to one.
    const MAX_TRIES: usize;
    /// Radix of the digits
    const BASE: usize;
    /// Byte size of the randomness
    const RAND_SIZE: usize;

    /// Sample fresh randomness for one encoding attempt
    fn rand<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Randomness;

    /// Encode the message into a codeword. May fail, in which case the signer
    /// retries with fresh randomness.
    fn encode(
        parameter: &Self::Parameter,
        message: &[u8; MESSAGE_LENGTH],
        randomness: &Self::Randomness,
        epoch: u32,
    ) -> Result<Vec<u8>, EncodingError>;

    /// Run checks of the parameters of `Self`. Intended for tests, panics if an
    /// invariant is broken.
    fn internal_consistency_check();
}

/// Winternitz checksum of the message digits: the sum of `base - 1 - digit`
/// over all digits, written with `num_digits` base-`base` digits, least
/// significant first. Increasing any message digit strictly decreases the
/// checksum, which yields incomparability.
pub(crate) fn winternitz_checksum(digits: &[u8], base: usize, num_digits: usize) -> Vec<u8> {
    let mut sum: u64 = digits.iter().map(|&d| (base - 1) as u64 - d as u64).sum();

    let mut checksum = Vec::with_capacity(num_digits);
    for _ in 0..num_digits {
        checksum.push((sum % base as u64) as u8);
        sum /= base as u64;
    }
    checksum
}

/// Incomparable encoding based on the basic Winternitz scheme: the codeword is
/// the message hash digits followed by their checksum. Encoding never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinternitzEncoding<MH, const CHUNK_SIZE: usize, const NUM_CHUNKS_CHECKSUM: usize>(
    PhantomData<MH>,
);

impl<MH: MessageHash, const CHUNK_SIZE: usize, const NUM_CHUNKS_CHECKSUM: usize>
    IncomparableEncoding for WinternitzEncoding<MH, CHUNK_SIZE, NUM_CHUNKS_CHECKSUM>
{
    type Parameter = MH::Parameter;
    type Randomness = MH::Randomness;

    const DIMENSION: usize = MH::DIMENSION + NUM_CHUNKS_CHECKSUM;
    const MAX_TRIES: usize = 1;
    const BASE: usize = MH::BASE;
    const RAND_SIZE: usize = MH::RAND_SIZE;

    fn rand<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Randomness {
        MH::rand(rng)
    }

    fn encode(
        parameter: &Self::Parameter,
        message: &[u8; MESSAGE_LENGTH],
        randomness: &Self::Randomness,
        epoch: u32,
    ) -> Result<Vec<u8>, EncodingError> {
        let mut digits = MH::apply(parameter, epoch, randomness, message);
        debug_assert_eq!(digits.len(), MH::DIMENSION);

        let checksum = winternitz_checksum(&digits, Self::BASE, NUM_CHUNKS_CHECKSUM);
        digits.extend(checksum);
        Ok(digits)
    }

    fn internal_consistency_check() {
        assert!(
            Self::DIMENSION <= 1 << 8,
            "Winternitz Encoding: Dimension must be at most 2^8"
        );
        assert!(
            matches!(CHUNK_SIZE, 1 | 2 | 4 | 8),
            "Winternitz Encoding: Chunk Size must be 1, 2, 4, or 8"
        );
        assert!(
            MH::BASE == 1 << CHUNK_SIZE,
            "Winternitz Encoding: Base and chunk size not consistent with message hash"
        );
        // the checksum digits must be able to hold the maximal sum
        let max_sum = (MH::DIMENSION * (MH::BASE - 1)) as u128;
        assert!(
            (MH::BASE as u128).pow(NUM_CHUNKS_CHECKSUM as u32) > max_sum,
            "Winternitz Encoding: Checksum digits cannot hold the maximal sum"
        );
        MH::internal_consistency_check();
    }
}

/// Incomparable encoding based on a target sum: the codeword is the message
/// hash digits, accepted only if they add up to `TARGET_SUM`. The signer
/// retries with fresh randomness until the sum comes out right; the fixed sum
/// makes distinct codewords incomparable without any checksum digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSumEncoding<MH, const TARGET_SUM: usize>(PhantomData<MH>);

impl<MH: MessageHash, const TARGET_SUM: usize> IncomparableEncoding
    for TargetSumEncoding<MH, TARGET_SUM>
{
    type Parameter = MH::Parameter;
    type Randomness = MH::Randomness;

    const DIMENSION: usize = MH::DIMENSION;
    const MAX_TRIES: usize = 100_000;
    const BASE: usize = MH::BASE;
    const RAND_SIZE: usize = MH::RAND_SIZE;

    fn rand<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Randomness {
        MH::rand(rng)
    }

    fn encode(
        parameter: &Self::Parameter,
        message: &[u8; MESSAGE_LENGTH],
        randomness: &Self::Randomness,
        epoch: u32,
    ) -> Result<Vec<u8>, EncodingError> {
        let digits = MH::apply(parameter, epoch, randomness, message);
        let sum: usize = digits.iter().map(|&d| d as usize).sum();

        if sum == TARGET_SUM {
            Ok(digits)
        } else {
            Err(EncodingError::TargetSumMismatch {
                expected: TARGET_SUM,
                got: sum,
            })
        }
    }

    fn internal_consistency_check() {
        assert!(
            Self::BASE <= 1 << 8,
            "Target Sum Encoding: Base must be at most 2^8"
        );
        assert!(
            Self::DIMENSION <= 1 << 8,
            "Target Sum Encoding: Dimension must be at most 2^8"
        );
        assert!(
            TARGET_SUM <= MH::DIMENSION * (MH::BASE - 1),
            "Target Sum Encoding: Target sum is not reachable"
        );
        MH::internal_consistency_check();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::message_hash::ShaMessageHash;
    use rand::rngs::OsRng;

    type MhW2 = ShaMessageHash<18, 23, 72, 2>;
    type Winternitz = WinternitzEncoding<MhW2, 2, 8>;
    type TargetSum = TargetSumEncoding<MhW2, 108>;

    #[test]
    fn checksum_of_all_zero_digits() {
        // all-zero digits give the maximal sum, 3 * 4 = 12 = (0, 3) in base 4
        assert_eq!(winternitz_checksum(&[0, 0, 0, 0], 4, 2), vec![0, 3]);
    }

    #[test]
    fn checksum_of_maximal_digits_is_zero() {
        assert_eq!(winternitz_checksum(&[3, 3, 3, 3], 4, 2), vec![0, 0]);
    }

    #[test]
    fn checksum_decreases_when_digits_increase() {
        // the checksum sum strictly decreases when any digit increases
        let sum = |digits: &[u8]| -> u64 {
            winternitz_checksum(digits, 4, 2)
                .iter()
                .enumerate()
                .map(|(i, &d)| d as u64 * 4u64.pow(i as u32))
                .sum()
        };
        assert!(sum(&[1, 2, 0, 3]) > sum(&[1, 2, 1, 3]));
        assert!(sum(&[1, 2, 1, 3]) > sum(&[2, 2, 1, 3]));
    }

    #[test]
    fn winternitz_encodes_every_message() {
        let parameter = [0u8; 18];
        let message = [42u8; MESSAGE_LENGTH];
        let randomness = Winternitz::rand(&mut OsRng);

        let codeword = Winternitz::encode(&parameter, &message, &randomness, 0).unwrap();
        assert_eq!(codeword.len(), Winternitz::DIMENSION);
        assert!(codeword.iter().all(|&d| (d as usize) < Winternitz::BASE));
    }

    #[test]
    fn winternitz_incomparability_on_flipped_digit() {
        // two encodings of different messages must differ in both directions
        // in at least one position each, unless they are equal
        let parameter = [0u8; 18];
        let randomness = Winternitz::rand(&mut OsRng);

        let a = Winternitz::encode(&parameter, &[0u8; MESSAGE_LENGTH], &randomness, 0).unwrap();
        let b = Winternitz::encode(&parameter, &[1u8; MESSAGE_LENGTH], &randomness, 0).unwrap();
        assert_ne!(a, b);
        assert!(a.iter().zip(&b).any(|(x, y)| x > y));
        assert!(a.iter().zip(&b).any(|(x, y)| x < y));
    }

    #[test]
    fn target_sum_accepts_only_the_target() {
        let parameter = [0u8; 18];
        let message = [42u8; MESSAGE_LENGTH];

        let mut successes = 0;
        for _ in 0..10_000 {
            let randomness = TargetSum::rand(&mut OsRng);
            match TargetSum::encode(&parameter, &message, &randomness, 0) {
                Ok(codeword) => {
                    successes += 1;
                    assert_eq!(codeword.len(), TargetSum::DIMENSION);
                    let sum: usize = codeword.iter().map(|&d| d as usize).sum();
                    assert_eq!(sum, 108);
                }
                Err(EncodingError::TargetSumMismatch { expected, got }) => {
                    assert_eq!(expected, 108);
                    assert_ne!(got, 108);
                }
            }
        }
        // the expected digit sum is 108, so a few percent of tries succeed
        assert!(successes > 0, "No encoding attempt hit the target sum");
    }

    #[test]
    fn consistency() {
        Winternitz::internal_consistency_check();
        TargetSum::internal_consistency_check();
    }
}
