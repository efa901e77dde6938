//! Generalized XMSS: a synchronized signature scheme built from hash chains
//! and a Merkle tree. Each epoch owns one leaf of the tree, derived from the
//! ends of a set of hash chains whose starts are derived from a PRF key. A
//! signature reveals intermediate chain values selected by an incomparable
//! encoding of the message, together with the Merkle opening of the leaf.

use core::convert::TryInto;
use core::marker::PhantomData;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

#[cfg(feature = "serde_enabled")]
use serde::{Deserialize, Serialize};

use crate::encoding::IncomparableEncoding;
use crate::errors::Error;
use crate::hash_tree::{hash_tree_verify, HashTree, HashTreeOpening};
use crate::prf::Pseudorandom;
use crate::traits::SignatureScheme;
use crate::tweak_hash::{chain, TweakableHash};
use crate::MESSAGE_LENGTH;

/// Public key of generalized XMSS: the Merkle root, and the public parameter
/// of the tweakable hash.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde_enabled",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "TH::Domain: Serialize, TH::Parameter: Serialize",
        deserialize = "TH::Domain: Deserialize<'de>, TH::Parameter: Deserialize<'de>"
    ))
)]
pub struct GeneralizedXmssPublicKey<TH: TweakableHash> {
    root: TH::Domain,
    parameter: TH::Parameter,
}

/// Secret key of generalized XMSS. Beyond the PRF key, it holds the full
/// Merkle tree over the active epochs, so signing never recomputes chains of
/// other epochs. The PRF key is erased from memory on drop.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde_enabled",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "PRF::Key: Serialize, TH::Domain: Serialize, TH::Parameter: Serialize",
        deserialize = "PRF::Key: Deserialize<'de>, TH::Domain: Deserialize<'de>, TH::Parameter: Deserialize<'de>"
    ))
)]
pub struct GeneralizedXmssSecretKey<PRF: Pseudorandom, TH: TweakableHash> {
    prf_key: PRF::Key,
    tree: HashTree<TH>,
    parameter: TH::Parameter,
    activation_epoch: u32,
    num_active_epochs: u32,
}

impl<PRF: Pseudorandom, TH: TweakableHash> GeneralizedXmssSecretKey<PRF, TH> {
    /// First epoch the key is active for
    pub fn activation_epoch(&self) -> u32 {
        self.activation_epoch
    }

    /// Number of epochs the key is active for, starting at the activation epoch
    pub fn num_active_epochs(&self) -> u32 {
        self.num_active_epochs
    }
}

impl<PRF: Pseudorandom, TH: TweakableHash> Drop for GeneralizedXmssSecretKey<PRF, TH> {
    fn drop(&mut self) {
        self.prf_key.zeroize();
    }
}

/// Structure that represents a generalized XMSS signature: the Merkle opening
/// of the epoch's leaf, the encoding randomness, and one intermediate value
/// per hash chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde_enabled",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "IE::Randomness: Serialize, TH::Domain: Serialize",
        deserialize = "IE::Randomness: Deserialize<'de>, TH::Domain: Deserialize<'de>"
    ))
)]
pub struct GeneralizedXmssSignature<IE: IncomparableEncoding, TH: TweakableHash, const LOG_LIFETIME: usize>
{
    path: HashTreeOpening<TH>,
    rho: IE::Randomness,
    hashes: Vec<TH::Domain>,
}

/// Generalized XMSS signature scheme, assembled from a PRF, an incomparable
/// encoding, and a tweakable hash, with a lifetime of `2^LOG_LIFETIME` epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralizedXmss<PRF, IE, TH, const LOG_LIFETIME: usize>(PhantomData<(PRF, IE, TH)>);

impl<PRF, IE, TH, const LOG_LIFETIME: usize> GeneralizedXmss<PRF, IE, TH, LOG_LIFETIME>
where
    PRF: Pseudorandom<Output = TH::Domain>,
    IE: IncomparableEncoding<Parameter = TH::Parameter>,
    TH: TweakableHash,
{
    /// Run checks of the parameters of `Self`. Intended for tests, panics if an
    /// invariant is broken.
    pub fn internal_consistency_check() {
        PRF::internal_consistency_check();
        IE::internal_consistency_check();
        TH::internal_consistency_check();
        assert!(IE::BASE <= 256, "Generalized XMSS: Base must fit in u8");
        assert!(
            IE::DIMENSION <= 256,
            "Generalized XMSS: Dimension must fit in u8"
        );
        assert!(
            LOG_LIFETIME <= 32,
            "Generalized XMSS: Lifetime must be at most 2^32"
        );
    }
}

impl<PRF, IE, TH, const LOG_LIFETIME: usize> SignatureScheme
    for GeneralizedXmss<PRF, IE, TH, LOG_LIFETIME>
where
    PRF: Pseudorandom<Output = TH::Domain>,
    IE: IncomparableEncoding<Parameter = TH::Parameter>,
    TH: TweakableHash,
{
    type PublicKey = GeneralizedXmssPublicKey<TH>;
    type SecretKey = GeneralizedXmssSecretKey<PRF, TH>;
    type Signature = GeneralizedXmssSignature<IE, TH, LOG_LIFETIME>;

    const LIFETIME: u64 = 1 << LOG_LIFETIME;

    fn key_gen<R: RngCore + CryptoRng>(
        rng: &mut R,
        activation_epoch: u32,
        num_active_epochs: u32,
    ) -> Result<(Self::PublicKey, Self::SecretKey), Error> {
        if num_active_epochs == 0
            || activation_epoch as u64 + num_active_epochs as u64 > Self::LIFETIME
        {
            return Err(Error::ActivationExceedsLifetime(
                activation_epoch,
                num_active_epochs,
            ));
        }

        let parameter = TH::rand_parameter(rng);
        let prf_key = PRF::key_gen(rng);

        let num_chains = IE::DIMENSION;
        let chain_length = IE::BASE;

        // one leaf per active epoch: walk every chain to its end, then hash
        // the ends together with the leaf-level tree tweak
        let leaf_hashes = (activation_epoch..activation_epoch + num_active_epochs)
            .map(|epoch| {
                let ends: Vec<TH::Domain> = (0..num_chains)
                    .map(|index| {
                        let start = PRF::apply(&prf_key, epoch, index as u64);
                        chain::<TH>(&parameter, epoch, index as u8, 0, chain_length - 1, &start)
                    })
                    .collect();
                TH::apply(&parameter, &TH::tree_tweak(0, epoch), &ends)
            })
            .collect();

        let tree = HashTree::<TH>::new(rng, LOG_LIFETIME, activation_epoch, &parameter, leaf_hashes);
        let root = tree.root();

        let pk = GeneralizedXmssPublicKey { root, parameter };
        let sk = GeneralizedXmssSecretKey {
            prf_key,
            tree,
            parameter,
            activation_epoch,
            num_active_epochs,
        };
        Ok((pk, sk))
    }

    fn sign<R: RngCore + CryptoRng>(
        rng: &mut R,
        sk: &Self::SecretKey,
        epoch: u32,
        message: &[u8; MESSAGE_LENGTH],
    ) -> Result<Self::Signature, Error> {
        let start = sk.activation_epoch;
        let end = start + sk.num_active_epochs;
        if epoch < start || epoch >= end {
            return Err(Error::KeyNotActive(epoch));
        }

        let path = sk.tree.path(epoch);

        // encode the message, retrying with fresh randomness until the
        // encoding succeeds or the allowed tries are exhausted
        let mut encoding = None;
        for _ in 0..IE::MAX_TRIES {
            let rho = IE::rand(rng);
            if let Ok(digits) = IE::encode(&sk.parameter, message, &rho, epoch) {
                encoding = Some((rho, digits));
                break;
            }
        }
        let (rho, digits) = encoding.ok_or(Error::UnluckyFailure)?;

        // walk each chain as many steps as its digit says
        let hashes = digits
            .iter()
            .enumerate()
            .map(|(index, &digit)| {
                let start_value = PRF::apply(&sk.prf_key, epoch, index as u64);
                chain::<TH>(
                    &sk.parameter,
                    epoch,
                    index as u8,
                    0,
                    digit as usize,
                    &start_value,
                )
            })
            .collect();

        Ok(GeneralizedXmssSignature { path, rho, hashes })
    }

    fn verify(
        pk: &Self::PublicKey,
        epoch: u32,
        message: &[u8; MESSAGE_LENGTH],
        sig: &Self::Signature,
    ) -> Result<(), Error> {
        if epoch as u64 >= Self::LIFETIME {
            return Err(Error::EpochOutOfRange(epoch));
        }

        let digits =
            IE::encode(&pk.parameter, message, &sig.rho, epoch).map_err(|_| Error::InvalidEncoding)?;
        if digits.len() != IE::DIMENSION {
            return Err(Error::InvalidEncoding);
        }
        if sig.hashes.len() != IE::DIMENSION {
            return Err(Error::InvalidSignatureSize(sig.hashes.len()));
        }
        if sig.path.co_path.len() != LOG_LIFETIME {
            return Err(Error::InvalidSignatureSize(sig.path.co_path.len()));
        }

        // complete each chain from the position the digit determines
        let chain_length = IE::BASE;
        let ends: Vec<TH::Domain> = digits
            .iter()
            .zip(&sig.hashes)
            .enumerate()
            .map(|(index, (&digit, start_value))| {
                let steps = chain_length - 1 - digit as usize;
                chain::<TH>(&pk.parameter, epoch, index as u8, digit, steps, start_value)
            })
            .collect();

        let leaf = TH::apply(&pk.parameter, &TH::tree_tweak(0, epoch), &ends);
        if hash_tree_verify::<TH>(&pk.parameter, &pk.root, epoch, &leaf, &sig.path) {
            Ok(())
        } else {
            Err(Error::InvalidHashComparison)
        }
    }
}

// And now we implement serialisation
impl<TH: TweakableHash> GeneralizedXmssPublicKey<TH> {
    /// Byte size of the public key
    pub const SIZE: usize = TH::DOMAIN_SIZE + TH::PARAMETER_SIZE;

    /// Convert `Self` into its byte representation, the array
    /// ( self.root || self.parameter ) of size `Self::SIZE`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(self.root.as_ref());
        bytes.extend_from_slice(self.parameter.as_ref());
        bytes
    }

    /// Convert a slice of bytes into `Self`.
    ///
    /// # Errors
    /// The function fails if
    /// * `bytes.len()` is not of the expected size
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidPublicKeySize(bytes.len()));
        }

        let root = bytes[..TH::DOMAIN_SIZE]
            .try_into()
            .map_err(|_| Error::InvalidPublicKeySize(bytes.len()))?;
        let parameter = bytes[TH::DOMAIN_SIZE..]
            .try_into()
            .map_err(|_| Error::InvalidPublicKeySize(bytes.len()))?;
        Ok(Self { root, parameter })
    }
}

impl<IE: IncomparableEncoding, TH: TweakableHash, const LOG_LIFETIME: usize>
    GeneralizedXmssSignature<IE, TH, LOG_LIFETIME>
{
    /// Byte size of the signature
    pub const SIZE: usize =
        IE::RAND_SIZE + 4 + (LOG_LIFETIME + IE::DIMENSION) * TH::DOMAIN_SIZE;

    /// Convert `Self` into its byte representation, the array
    /// ( self.rho || start_index || self.path || self.hashes )
    /// of size `Self::SIZE`, with the start index in big-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(self.rho.as_ref());
        bytes.extend_from_slice(&self.path.start_index.to_be_bytes());
        for sibling in &self.path.co_path {
            bytes.extend_from_slice(sibling.as_ref());
        }
        for hash in &self.hashes {
            bytes.extend_from_slice(hash.as_ref());
        }
        bytes
    }

    /// Convert a slice of bytes into `Self`.
    ///
    /// # Errors
    /// The function fails if
    /// * `bytes.len()` is not of the expected size
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidSignatureSize(bytes.len()));
        }

        let rho = bytes[..IE::RAND_SIZE]
            .try_into()
            .map_err(|_| Error::InvalidSignatureSize(bytes.len()))?;

        let mut offset = IE::RAND_SIZE;
        let mut start_index_bytes = [0u8; 4];
        start_index_bytes.copy_from_slice(&bytes[offset..offset + 4]);
        let start_index = u32::from_be_bytes(start_index_bytes);
        offset += 4;

        let mut co_path = Vec::with_capacity(LOG_LIFETIME);
        for _ in 0..LOG_LIFETIME {
            let sibling = bytes[offset..offset + TH::DOMAIN_SIZE]
                .try_into()
                .map_err(|_| Error::InvalidSignatureSize(bytes.len()))?;
            co_path.push(sibling);
            offset += TH::DOMAIN_SIZE;
        }

        let mut hashes = Vec::with_capacity(IE::DIMENSION);
        for _ in 0..IE::DIMENSION {
            let hash = bytes[offset..offset + TH::DOMAIN_SIZE]
                .try_into()
                .map_err(|_| Error::InvalidSignatureSize(bytes.len()))?;
            hashes.push(hash);
            offset += TH::DOMAIN_SIZE;
        }

        Ok(Self {
            path: HashTreeOpening {
                start_index,
                co_path,
            },
            rho,
            hashes,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::encoding::{TargetSumEncoding, WinternitzEncoding};
    use crate::message_hash::ShaMessageHash;
    use crate::prf::ShaPRF;
    use crate::tweak_hash::ShaTweakHash;
    use rand::rngs::OsRng;

    // small-lifetime variants of the provided instantiations, so that keys
    // for the full lifetime can be generated quickly
    type TestWinternitz = GeneralizedXmss<
        ShaPRF<26>,
        WinternitzEncoding<ShaMessageHash<18, 23, 72, 2>, 2, 8>,
        ShaTweakHash<18, 26>,
        4,
    >;
    type TestTargetSum = GeneralizedXmss<
        ShaPRF<26>,
        TargetSumEncoding<ShaMessageHash<18, 23, 72, 2>, 108>,
        ShaTweakHash<18, 26>,
        4,
    >;
    type TestPublicKey = <TestWinternitz as SignatureScheme>::PublicKey;
    type TestSignature = <TestWinternitz as SignatureScheme>::Signature;

    #[test]
    fn winternitz_sign_verify_all_epochs() {
        let (pk, sk) = TestWinternitz::key_gen(&mut OsRng, 0, 16).unwrap();
        let message = [0x4a; MESSAGE_LENGTH];

        for epoch in 0..16 {
            let sigma = TestWinternitz::sign(&mut OsRng, &sk, epoch, &message).unwrap();
            assert!(TestWinternitz::verify(&pk, epoch, &message, &sigma).is_ok());
        }
    }

    #[test]
    fn target_sum_sign_verify() {
        let (pk, sk) = TestTargetSum::key_gen(&mut OsRng, 0, 16).unwrap();
        let message = [0x4a; MESSAGE_LENGTH];

        for epoch in [0, 7, 15] {
            let sigma = TestTargetSum::sign(&mut OsRng, &sk, epoch, &message).unwrap();
            assert!(TestTargetSum::verify(&pk, epoch, &message, &sigma).is_ok());
        }
    }

    #[test]
    fn partial_activation_range() {
        let (pk, sk) = TestWinternitz::key_gen(&mut OsRng, 5, 6).unwrap();
        let message = [0xff; MESSAGE_LENGTH];

        for epoch in 5..11 {
            let sigma = TestWinternitz::sign(&mut OsRng, &sk, epoch, &message).unwrap();
            assert!(TestWinternitz::verify(&pk, epoch, &message, &sigma).is_ok());
        }

        // epochs outside of the active range must be rejected when signing
        assert_eq!(
            TestWinternitz::sign(&mut OsRng, &sk, 4, &message).unwrap_err(),
            Error::KeyNotActive(4)
        );
        assert_eq!(
            TestWinternitz::sign(&mut OsRng, &sk, 11, &message).unwrap_err(),
            Error::KeyNotActive(11)
        );
    }

    #[test]
    fn keygen_rejects_range_beyond_lifetime() {
        assert_eq!(
            TestWinternitz::key_gen(&mut OsRng, 10, 7).unwrap_err(),
            Error::ActivationExceedsLifetime(10, 7)
        );
        assert_eq!(
            TestWinternitz::key_gen(&mut OsRng, 0, 0).unwrap_err(),
            Error::ActivationExceedsLifetime(0, 0)
        );
    }

    #[test]
    fn wrong_message_fails() {
        let (pk, sk) = TestWinternitz::key_gen(&mut OsRng, 0, 4).unwrap();
        let message = [0x4a; MESSAGE_LENGTH];
        let sigma = TestWinternitz::sign(&mut OsRng, &sk, 2, &message).unwrap();

        let other_message = [0x4b; MESSAGE_LENGTH];
        assert!(TestWinternitz::verify(&pk, 2, &other_message, &sigma).is_err());
    }

    #[test]
    fn wrong_epoch_fails() {
        let (pk, sk) = TestWinternitz::key_gen(&mut OsRng, 0, 4).unwrap();
        let message = [0x4a; MESSAGE_LENGTH];
        let sigma = TestWinternitz::sign(&mut OsRng, &sk, 2, &message).unwrap();

        assert!(TestWinternitz::verify(&pk, 3, &message, &sigma).is_err());
        assert_eq!(
            TestWinternitz::verify(&pk, 16, &message, &sigma).unwrap_err(),
            Error::EpochOutOfRange(16)
        );
    }

    #[test]
    fn wrong_public_key_fails() {
        let (_, sk) = TestWinternitz::key_gen(&mut OsRng, 0, 4).unwrap();
        let (other_pk, _) = TestWinternitz::key_gen(&mut OsRng, 0, 4).unwrap();
        let message = [0x4a; MESSAGE_LENGTH];
        let sigma = TestWinternitz::sign(&mut OsRng, &sk, 2, &message).unwrap();

        assert_eq!(
            TestWinternitz::verify(&other_pk, 2, &message, &sigma).unwrap_err(),
            Error::InvalidHashComparison
        );
    }

    #[test]
    fn public_key_bytes_roundtrip() {
        let (pk, _) = TestWinternitz::key_gen(&mut OsRng, 0, 4).unwrap();

        let bytes = pk.to_bytes();
        assert_eq!(bytes.len(), TestPublicKey::SIZE);
        let parsed = TestPublicKey::from_bytes(&bytes).unwrap();
        assert_eq!(pk, parsed);

        assert!(TestPublicKey::from_bytes(&bytes[1..]).is_err());
    }

    #[test]
    fn signature_bytes_roundtrip() {
        let (pk, sk) = TestWinternitz::key_gen(&mut OsRng, 0, 4).unwrap();
        let message = [0x77; MESSAGE_LENGTH];
        let sigma = TestWinternitz::sign(&mut OsRng, &sk, 1, &message).unwrap();

        let bytes = sigma.to_bytes();
        assert_eq!(bytes.len(), TestSignature::SIZE);
        let parsed = TestSignature::from_bytes(&bytes).unwrap();
        assert_eq!(sigma, parsed);
        assert!(TestWinternitz::verify(&pk, 1, &message, &parsed).is_ok());

        assert!(TestSignature::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn tampered_signature_bytes_fail() {
        let (pk, sk) = TestWinternitz::key_gen(&mut OsRng, 0, 4).unwrap();
        let message = [0x77; MESSAGE_LENGTH];
        let sigma = TestWinternitz::sign(&mut OsRng, &sk, 1, &message).unwrap();

        let mut bytes = sigma.to_bytes();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let parsed = TestSignature::from_bytes(&bytes).unwrap();
        assert!(TestWinternitz::verify(&pk, 1, &message, &parsed).is_err());
    }

    #[test]
    fn consistency() {
        TestWinternitz::internal_consistency_check();
        TestTargetSum::internal_consistency_check();
    }
}
