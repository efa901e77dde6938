//! Tweakable hash function: a hash that takes a public parameter and a tweak
//! next to the message. The tweak acts as the address of the hash evaluation
//! (position in a chain, or position in the Merkle tree), so that no two
//! evaluations in the scheme are ever over the same input domain.

use core::fmt::Debug;

use rand_core::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};

use crate::{TWEAK_SEPARATOR_FOR_CHAIN_HASH, TWEAK_SEPARATOR_FOR_TREE_HASH};

/// Trait that defines a tweakable hash function.
///
/// Hashing happens over lists of `Domain` elements, so that chain values and
/// pairs of inner tree nodes can be hashed with the same function. The trait
/// also fixes how tweaks for chain steps and tree nodes are derived, which is
/// what guarantees domain separation between the two uses.
pub trait TweakableHash {
    /// Type of the public parameter, sampled once per key pair
    type Parameter: Copy + PartialEq + Debug + AsRef<[u8]> + for<'a> core::convert::TryFrom<&'a [u8]>;
    /// Type of a tweak
    type Tweak;
    /// Type of the inputs and outputs of the hash
    type Domain: Copy + PartialEq + Debug + AsRef<[u8]> + for<'a> core::convert::TryFrom<&'a [u8]>;

    /// Byte size of the public parameter
    const PARAMETER_SIZE: usize;
    /// Byte size of a domain element
    const DOMAIN_SIZE: usize;

    /// Sample a random public parameter
    fn rand_parameter<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Parameter;

    /// Sample a random domain element, used as padding in the sparse hash tree
    fn rand_domain<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Domain;

    /// Tweak of a tree node, addressed by its level (leafs are level zero) and
    /// its position within the level
    fn tree_tweak(level: u8, pos_in_level: u32) -> Self::Tweak;

    /// Tweak of a chain step, addressed by the epoch the chain belongs to, the
    /// index of the chain, and the position within the chain
    fn chain_tweak(epoch: u32, chain_index: u8, pos_in_chain: u8) -> Self::Tweak;

    /// Apply the hash to a list of domain elements
    fn apply(
        parameter: &Self::Parameter,
        tweak: &Self::Tweak,
        message: &[Self::Domain],
    ) -> Self::Domain;

    /// Run checks of the parameters of `Self`. Intended for tests, panics if an
    /// invariant is broken.
    fn internal_consistency_check();
}

/// Walk a hash chain, starting at position `start_pos_in_chain` with value
/// `start`, for `steps` many steps. For example, walking two steps with
/// `start = A` means we walk A -> B -> C and return C.
///
/// All evaluations use the given parameter, and tweaks determined by `epoch`,
/// `chain_index`, and the position of the step within the chain.
pub fn chain<TH: TweakableHash>(
    parameter: &TH::Parameter,
    epoch: u32,
    chain_index: u8,
    start_pos_in_chain: u8,
    steps: usize,
    start: &TH::Domain,
) -> TH::Domain {
    let mut current = *start;

    for j in 0..steps {
        let pos = start_pos_in_chain as usize + j + 1;
        debug_assert!(pos <= u8::MAX as usize);
        let tweak = TH::chain_tweak(epoch, chain_index, pos as u8);
        current = TH::apply(parameter, &tweak, &[current]);
    }

    current
}

/// Tweaks of [`ShaTweakHash`], in their two shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaTweak {
    /// Tweak addressing a node of the Merkle tree
    TreeTweak {
        /// Level of the node, leafs being level zero
        level: u8,
        /// Position of the node within its level
        pos_in_level: u32,
    },
    /// Tweak addressing a single step of a hash chain
    ChainTweak {
        /// Epoch the chain belongs to
        epoch: u32,
        /// Index of the chain within its epoch
        chain_index: u8,
        /// Position of the step within the chain
        pos_in_chain: u8,
    },
}

impl ShaTweak {
    /// Encode the tweak into its byte representation. The first byte is a
    /// separator that distinguishes the two shapes, the rest is the address
    /// data in big-endian.
    pub fn to_bytes(self) -> Vec<u8> {
        match self {
            ShaTweak::TreeTweak {
                level,
                pos_in_level,
            } => {
                let mut bytes = Vec::with_capacity(6);
                bytes.push(TWEAK_SEPARATOR_FOR_TREE_HASH);
                bytes.push(level);
                bytes.extend_from_slice(&pos_in_level.to_be_bytes());
                bytes
            }
            ShaTweak::ChainTweak {
                epoch,
                chain_index,
                pos_in_chain,
            } => {
                let mut bytes = Vec::with_capacity(7);
                bytes.push(TWEAK_SEPARATOR_FOR_CHAIN_HASH);
                bytes.extend_from_slice(&epoch.to_be_bytes());
                bytes.push(chain_index);
                bytes.push(pos_in_chain);
                bytes
            }
        }
    }
}

/// Tweakable hash implemented with SHA3-256, with parameters of
/// `PARAMETER_LEN` bytes and outputs truncated to `HASH_LEN` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaTweakHash<const PARAMETER_LEN: usize, const HASH_LEN: usize>;

impl<const PARAMETER_LEN: usize, const HASH_LEN: usize> TweakableHash
    for ShaTweakHash<PARAMETER_LEN, HASH_LEN>
{
    type Parameter = [u8; PARAMETER_LEN];
    type Tweak = ShaTweak;
    type Domain = [u8; HASH_LEN];

    const PARAMETER_SIZE: usize = PARAMETER_LEN;
    const DOMAIN_SIZE: usize = HASH_LEN;

    fn rand_parameter<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Parameter {
        let mut parameter = [0u8; PARAMETER_LEN];
        rng.fill_bytes(&mut parameter);
        parameter
    }

    fn rand_domain<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Domain {
        let mut domain = [0u8; HASH_LEN];
        rng.fill_bytes(&mut domain);
        domain
    }

    fn tree_tweak(level: u8, pos_in_level: u32) -> Self::Tweak {
        ShaTweak::TreeTweak {
            level,
            pos_in_level,
        }
    }

    fn chain_tweak(epoch: u32, chain_index: u8, pos_in_chain: u8) -> Self::Tweak {
        ShaTweak::ChainTweak {
            epoch,
            chain_index,
            pos_in_chain,
        }
    }

    fn apply(
        parameter: &Self::Parameter,
        tweak: &Self::Tweak,
        message: &[Self::Domain],
    ) -> Self::Domain {
        let mut hasher = Sha3_256::new();

        // add the parameter and tweak
        hasher.update(parameter);
        hasher.update(tweak.to_bytes());

        // now add the actual message to be hashed
        for part in message {
            hasher.update(part);
        }

        // finalize the hash, and take as many bytes as we need
        let digest = hasher.finalize();
        let mut output = [0u8; HASH_LEN];
        output.copy_from_slice(&digest[..HASH_LEN]);
        output
    }

    fn internal_consistency_check() {
        assert!(
            PARAMETER_LEN < 32,
            "SHA Tweak Hash: Parameter Length must be less than 256 bit"
        );
        assert!(
            HASH_LEN < 32,
            "SHA Tweak Hash: Hash Length must be less than 256 bit"
        );
    }
}
