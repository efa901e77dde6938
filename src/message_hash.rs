//! Message hash: a randomized hash mapping an arbitrary message of
//! [`MESSAGE_LENGTH`] bytes to a vector of base-`BASE` digits, which the
//! incomparable encodings then turn into chain positions.

use core::fmt::Debug;

use rand_core::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};

use crate::{MESSAGE_LENGTH, TWEAK_SEPARATOR_FOR_MESSAGE_HASH};

/// Trait that defines a randomized message hash. `DIMENSION` many digits are
/// produced, each in the range `0..BASE`.
pub trait MessageHash {
    /// Type of the public parameter, sampled once per key pair
    type Parameter;
    /// Type of the per-signature randomness
    type Randomness: Copy + PartialEq + Debug + AsRef<[u8]> + for<'a> core::convert::TryFrom<&'a [u8]>;

    /// Number of digits this hash produces
    const DIMENSION: usize;
    /// Radix of each digit
    const BASE: usize;
    /// Byte size of the randomness
    const RAND_SIZE: usize;

    /// Sample fresh randomness for one hashing attempt
    fn rand<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Randomness;

    /// Hash the message with respect to the given epoch and randomness,
    /// returning `DIMENSION` digits in `0..BASE`.
    fn apply(
        parameter: &Self::Parameter,
        epoch: u32,
        randomness: &Self::Randomness,
        message: &[u8; MESSAGE_LENGTH],
    ) -> Vec<u8>;

    /// Run checks of the parameters of `Self`. Intended for tests, panics if an
    /// invariant is broken.
    fn internal_consistency_check();
}

/// Isolate the `chunk_index`-th chunk of `chunk_size` bits from a byte,
/// counting from the least significant bits.
pub(crate) fn isolate_chunk_from_byte(byte: u8, chunk_index: usize, chunk_size: usize) -> u8 {
    debug_assert!(matches!(chunk_size, 1 | 2 | 4 | 8));
    debug_assert!(chunk_index < 8 / chunk_size);

    let shift = chunk_index * chunk_size;
    let mask = ((1u16 << chunk_size) - 1) as u8;
    (byte >> shift) & mask
}

/// Split a byte string into chunks of `chunk_size` bits, least significant
/// bits of each byte first. `chunk_size` must be 1, 2, 4, or 8.
pub(crate) fn bytes_to_chunks(bytes: &[u8], chunk_size: usize) -> Vec<u8> {
    let chunks_per_byte = 8 / chunk_size;
    let mut chunks = Vec::with_capacity(bytes.len() * chunks_per_byte);
    for &byte in bytes {
        for chunk_index in 0..chunks_per_byte {
            chunks.push(isolate_chunk_from_byte(byte, chunk_index, chunk_size));
        }
    }
    chunks
}

/// Message hash implemented with SHA3-256. The digest of
/// ( randomness || parameter || separator || epoch || message )
/// is truncated and split into `NUM_CHUNKS` chunks of `CHUNK_SIZE` bits each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaMessageHash<
    const PARAMETER_LEN: usize,
    const RAND_LEN: usize,
    const NUM_CHUNKS: usize,
    const CHUNK_SIZE: usize,
>;

impl<
        const PARAMETER_LEN: usize,
        const RAND_LEN: usize,
        const NUM_CHUNKS: usize,
        const CHUNK_SIZE: usize,
    > MessageHash for ShaMessageHash<PARAMETER_LEN, RAND_LEN, NUM_CHUNKS, CHUNK_SIZE>
{
    type Parameter = [u8; PARAMETER_LEN];
    type Randomness = [u8; RAND_LEN];

    const DIMENSION: usize = NUM_CHUNKS;
    const BASE: usize = 1 << CHUNK_SIZE;
    const RAND_SIZE: usize = RAND_LEN;

    fn rand<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Randomness {
        let mut randomness = [0u8; RAND_LEN];
        rng.fill_bytes(&mut randomness);
        randomness
    }

    fn apply(
        parameter: &Self::Parameter,
        epoch: u32,
        randomness: &Self::Randomness,
        message: &[u8; MESSAGE_LENGTH],
    ) -> Vec<u8> {
        let mut hasher = Sha3_256::new();
        hasher.update(randomness);
        hasher.update(parameter);
        hasher.update([TWEAK_SEPARATOR_FOR_MESSAGE_HASH]);
        hasher.update(epoch.to_le_bytes());
        hasher.update(message);
        let digest = hasher.finalize();

        // take exactly as many bytes as we need before chunking
        let num_bytes = NUM_CHUNKS * CHUNK_SIZE / 8;
        bytes_to_chunks(&digest[..num_bytes], CHUNK_SIZE)
    }

    fn internal_consistency_check() {
        assert!(
            matches!(CHUNK_SIZE, 1 | 2 | 4 | 8),
            "SHA Message Hash: Chunk Size must be 1, 2, 4, or 8"
        );
        assert!(
            PARAMETER_LEN < 32,
            "SHA Message Hash: Parameter Length must be less than 256 bit"
        );
        assert!(
            RAND_LEN > 0 && RAND_LEN < 32,
            "SHA Message Hash: Randomness Length must be non-zero and less than 256 bit"
        );
        assert!(
            NUM_CHUNKS * CHUNK_SIZE % 8 == 0 && NUM_CHUNKS * CHUNK_SIZE / 8 <= 32,
            "SHA Message Hash: Output must be a whole number of bytes, at most 256 bit"
        );
    }
}
