//! Errors specific to generalized XMSS signatures

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enum of errors associated with generalized XMSS signatures
pub enum Error {
    /// Error occurs when a key pair is requested for an epoch range that exceeds the
    /// lifetime of the scheme.
    ActivationExceedsLifetime(u32, u32),
    /// Error occurs when a signature is requested for an epoch in which the secret
    /// key is not active.
    KeyNotActive(u32),
    /// Error occurs when signing failed in all of the allowed encoding attempts. The
    /// probability of this happening is negligible for the provided instantiations.
    UnluckyFailure,
    /// Error occurs when the epoch associated with a signature is beyond the lifetime
    /// of the public key.
    EpochOutOfRange(u32),
    /// Error occurs when the message encoding recomputed during verification is not
    /// valid, i.e. the signature randomness does not encode the message.
    InvalidEncoding,
    /// This error occurs when the comparison of two hashes that are expected to be equal fail.
    InvalidHashComparison,
    /// Error occurs when the size of the public key is not the expected.
    InvalidPublicKeySize(usize),
    /// Error occurs when the size of the signature is not the expected.
    InvalidSignatureSize(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enum of failures of an incomparable encoding attempt. Encoding failures are
/// expected during signing, and are resolved by retrying with fresh randomness.
pub enum EncodingError {
    /// The digits produced by the message hash do not add up to the required target sum.
    TargetSumMismatch {
        /// The sum the digits must add up to.
        expected: usize,
        /// The sum the digits actually add up to.
        got: usize,
    },
}
