//! Traits that define a synchronized signature scheme instance
use rand_core::{CryptoRng, RngCore};

use crate::errors::Error;
use crate::MESSAGE_LENGTH;

/// Trait that defines a synchronized signature scheme: signing is done with
/// respect to discrete epochs, and each epoch must be used at most once per
/// key pair. A key pair is generated for a contiguous range of epochs within
/// the lifetime of the scheme, and can only sign in that range.
///
/// # Example
/// ```
/// use generalized_xmss::instantiations::SigWinternitzLifetime18W1;
/// use generalized_xmss::traits::SignatureScheme;
///
/// let mut rng = rand::thread_rng();
/// // key active for epochs 10..18 of the 2^18 available ones
/// let (pk, sk) = SigWinternitzLifetime18W1::key_gen(&mut rng, 10, 8).unwrap();
///
/// let message = [0u8; 32];
/// let sigma = SigWinternitzLifetime18W1::sign(&mut rng, &sk, 12, &message).unwrap();
///
/// assert!(SigWinternitzLifetime18W1::verify(&pk, 12, &message, &sigma).is_ok());
/// ```
pub trait SignatureScheme {
    /// Type of the public key
    type PublicKey;
    /// Type of the secret key
    type SecretKey;
    /// Type of a signature
    type Signature;

    /// Total number of epochs supported by the scheme
    const LIFETIME: u64;

    /// Generate a key pair that is active for the epochs
    /// `activation_epoch..activation_epoch + num_active_epochs`.
    ///
    /// # Errors
    /// Fails if the requested range of epochs exceeds the lifetime.
    fn key_gen<R: RngCore + CryptoRng>(
        rng: &mut R,
        activation_epoch: u32,
        num_active_epochs: u32,
    ) -> Result<(Self::PublicKey, Self::SecretKey), Error>;

    /// Sign a message with respect to the given epoch, using `sk`.
    ///
    /// # Errors
    /// Fails if the key is not active in the given epoch, or, with negligible
    /// probability, if no valid message encoding was found.
    fn sign<R: RngCore + CryptoRng>(
        rng: &mut R,
        sk: &Self::SecretKey,
        epoch: u32,
        message: &[u8; MESSAGE_LENGTH],
    ) -> Result<Self::Signature, Error>;

    /// Verify a signature with respect to a public key, an epoch, and a message
    fn verify(
        pk: &Self::PublicKey,
        epoch: u32,
        message: &[u8; MESSAGE_LENGTH],
        sig: &Self::Signature,
    ) -> Result<(), Error>;
}
