//! Concrete instantiations of generalized XMSS over SHA3, for lifetimes of
//! 2^18 and 2^20 epochs and chunk sizes w of 1, 2, 4, and 8 bits.
//!
//! All instantiations target 128 bit security and share the parameter and
//! randomness lengths; the number of chains and the hash output length vary
//! with the chunk size. The target-sum variants come in two flavours: the
//! expected digit sum, and the sum offset by 10%, which trades more work per
//! signing attempt for fewer attempts.

use crate::encoding::{TargetSumEncoding, WinternitzEncoding};
use crate::message_hash::ShaMessageHash;
use crate::prf::ShaPRF;
use crate::tweak_hash::ShaTweakHash;
use crate::xmss::GeneralizedXmss;

/// Byte length of the public parameter
const PARAMETER_LEN: usize = 18;
/// Byte length of the message hash randomness
const RAND_LEN: usize = 23;
/// Number of checksum chains of the Winternitz instantiations
const NUM_CHUNKS_CHECKSUM: usize = 8;

// message hashes per chunk size, all producing 18 bytes of digits
type MhW1 = ShaMessageHash<PARAMETER_LEN, RAND_LEN, 144, 1>;
type MhW2 = ShaMessageHash<PARAMETER_LEN, RAND_LEN, 72, 2>;
type MhW4 = ShaMessageHash<PARAMETER_LEN, RAND_LEN, 36, 4>;
type MhW8 = ShaMessageHash<PARAMETER_LEN, RAND_LEN, 18, 8>;

// tweakable hashes and PRFs per chunk size
type ThW1 = ShaTweakHash<PARAMETER_LEN, 25>;
type ThW2 = ShaTweakHash<PARAMETER_LEN, 26>;
type ThW4 = ShaTweakHash<PARAMETER_LEN, 26>;
type ThW8 = ShaTweakHash<PARAMETER_LEN, 28>;
type PrfW1 = ShaPRF<25>;
type PrfW2 = ShaPRF<26>;
type PrfW4 = ShaPRF<26>;
type PrfW8 = ShaPRF<28>;

/// Winternitz instantiation with lifetime 2^18 and chunk size 1
pub type SigWinternitzLifetime18W1 =
    GeneralizedXmss<PrfW1, WinternitzEncoding<MhW1, 1, NUM_CHUNKS_CHECKSUM>, ThW1, 18>;
/// Winternitz instantiation with lifetime 2^18 and chunk size 2
pub type SigWinternitzLifetime18W2 =
    GeneralizedXmss<PrfW2, WinternitzEncoding<MhW2, 2, NUM_CHUNKS_CHECKSUM>, ThW2, 18>;
/// Winternitz instantiation with lifetime 2^18 and chunk size 4
pub type SigWinternitzLifetime18W4 =
    GeneralizedXmss<PrfW4, WinternitzEncoding<MhW4, 4, NUM_CHUNKS_CHECKSUM>, ThW4, 18>;
/// Winternitz instantiation with lifetime 2^18 and chunk size 8
pub type SigWinternitzLifetime18W8 =
    GeneralizedXmss<PrfW8, WinternitzEncoding<MhW8, 8, NUM_CHUNKS_CHECKSUM>, ThW8, 18>;

/// Winternitz instantiation with lifetime 2^20 and chunk size 1
pub type SigWinternitzLifetime20W1 =
    GeneralizedXmss<PrfW1, WinternitzEncoding<MhW1, 1, NUM_CHUNKS_CHECKSUM>, ThW1, 20>;
/// Winternitz instantiation with lifetime 2^20 and chunk size 2
pub type SigWinternitzLifetime20W2 =
    GeneralizedXmss<PrfW2, WinternitzEncoding<MhW2, 2, NUM_CHUNKS_CHECKSUM>, ThW2, 20>;
/// Winternitz instantiation with lifetime 2^20 and chunk size 4
pub type SigWinternitzLifetime20W4 =
    GeneralizedXmss<PrfW4, WinternitzEncoding<MhW4, 4, NUM_CHUNKS_CHECKSUM>, ThW4, 20>;
/// Winternitz instantiation with lifetime 2^20 and chunk size 8
pub type SigWinternitzLifetime20W8 =
    GeneralizedXmss<PrfW8, WinternitzEncoding<MhW8, 8, NUM_CHUNKS_CHECKSUM>, ThW8, 20>;

/// Target-sum instantiation with lifetime 2^18, chunk size 1, and the
/// expected sum as target
pub type SigTargetSumLifetime18W1NoOff =
    GeneralizedXmss<PrfW1, TargetSumEncoding<MhW1, 72>, ThW1, 18>;
/// Target-sum instantiation with lifetime 2^18, chunk size 1, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime18W1Off10 =
    GeneralizedXmss<PrfW1, TargetSumEncoding<MhW1, 80>, ThW1, 18>;
/// Target-sum instantiation with lifetime 2^18, chunk size 2, and the
/// expected sum as target
pub type SigTargetSumLifetime18W2NoOff =
    GeneralizedXmss<PrfW2, TargetSumEncoding<MhW2, 108>, ThW2, 18>;
/// Target-sum instantiation with lifetime 2^18, chunk size 2, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime18W2Off10 =
    GeneralizedXmss<PrfW2, TargetSumEncoding<MhW2, 119>, ThW2, 18>;
/// Target-sum instantiation with lifetime 2^18, chunk size 4, and the
/// expected sum as target
pub type SigTargetSumLifetime18W4NoOff =
    GeneralizedXmss<PrfW4, TargetSumEncoding<MhW4, 270>, ThW4, 18>;
/// Target-sum instantiation with lifetime 2^18, chunk size 4, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime18W4Off10 =
    GeneralizedXmss<PrfW4, TargetSumEncoding<MhW4, 297>, ThW4, 18>;
/// Target-sum instantiation with lifetime 2^18, chunk size 8, and the
/// expected sum as target
pub type SigTargetSumLifetime18W8NoOff =
    GeneralizedXmss<PrfW8, TargetSumEncoding<MhW8, 2295>, ThW8, 18>;
/// Target-sum instantiation with lifetime 2^18, chunk size 8, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime18W8Off10 =
    GeneralizedXmss<PrfW8, TargetSumEncoding<MhW8, 2525>, ThW8, 18>;

/// Target-sum instantiation with lifetime 2^20, chunk size 1, and the
/// expected sum as target
pub type SigTargetSumLifetime20W1NoOff =
    GeneralizedXmss<PrfW1, TargetSumEncoding<MhW1, 72>, ThW1, 20>;
/// Target-sum instantiation with lifetime 2^20, chunk size 1, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime20W1Off10 =
    GeneralizedXmss<PrfW1, TargetSumEncoding<MhW1, 80>, ThW1, 20>;
/// Target-sum instantiation with lifetime 2^20, chunk size 2, and the
/// expected sum as target
pub type SigTargetSumLifetime20W2NoOff =
    GeneralizedXmss<PrfW2, TargetSumEncoding<MhW2, 108>, ThW2, 20>;
/// Target-sum instantiation with lifetime 2^20, chunk size 2, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime20W2Off10 =
    GeneralizedXmss<PrfW2, TargetSumEncoding<MhW2, 119>, ThW2, 20>;
/// Target-sum instantiation with lifetime 2^20, chunk size 4, and the
/// expected sum as target
pub type SigTargetSumLifetime20W4NoOff =
    GeneralizedXmss<PrfW4, TargetSumEncoding<MhW4, 270>, ThW4, 20>;
/// Target-sum instantiation with lifetime 2^20, chunk size 4, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime20W4Off10 =
    GeneralizedXmss<PrfW4, TargetSumEncoding<MhW4, 297>, ThW4, 20>;
/// Target-sum instantiation with lifetime 2^20, chunk size 8, and the
/// expected sum as target
pub type SigTargetSumLifetime20W8NoOff =
    GeneralizedXmss<PrfW8, TargetSumEncoding<MhW8, 2295>, ThW8, 20>;
/// Target-sum instantiation with lifetime 2^20, chunk size 8, and the target
/// sum offset by 10%
pub type SigTargetSumLifetime20W8Off10 =
    GeneralizedXmss<PrfW8, TargetSumEncoding<MhW8, 2525>, ThW8, 20>;

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::SignatureScheme;
    use crate::MESSAGE_LENGTH;
    use rand::rngs::OsRng;

    #[test]
    fn winternitz_consistency() {
        SigWinternitzLifetime18W1::internal_consistency_check();
        SigWinternitzLifetime18W2::internal_consistency_check();
        SigWinternitzLifetime18W4::internal_consistency_check();
        SigWinternitzLifetime18W8::internal_consistency_check();
        SigWinternitzLifetime20W1::internal_consistency_check();
        SigWinternitzLifetime20W2::internal_consistency_check();
        SigWinternitzLifetime20W4::internal_consistency_check();
        SigWinternitzLifetime20W8::internal_consistency_check();
    }

    #[test]
    fn target_sum_consistency() {
        SigTargetSumLifetime18W1NoOff::internal_consistency_check();
        SigTargetSumLifetime18W1Off10::internal_consistency_check();
        SigTargetSumLifetime18W2NoOff::internal_consistency_check();
        SigTargetSumLifetime18W2Off10::internal_consistency_check();
        SigTargetSumLifetime18W4NoOff::internal_consistency_check();
        SigTargetSumLifetime18W4Off10::internal_consistency_check();
        SigTargetSumLifetime18W8NoOff::internal_consistency_check();
        SigTargetSumLifetime18W8Off10::internal_consistency_check();
        SigTargetSumLifetime20W1NoOff::internal_consistency_check();
        SigTargetSumLifetime20W1Off10::internal_consistency_check();
        SigTargetSumLifetime20W2NoOff::internal_consistency_check();
        SigTargetSumLifetime20W2Off10::internal_consistency_check();
        SigTargetSumLifetime20W4NoOff::internal_consistency_check();
        SigTargetSumLifetime20W4Off10::internal_consistency_check();
        SigTargetSumLifetime20W8NoOff::internal_consistency_check();
        SigTargetSumLifetime20W8Off10::internal_consistency_check();
    }

    // keys here are activated for a few epochs only, so that the full
    // lifetime-deep tree stays cheap to build
    #[test]
    fn lifetime18_winternitz_roundtrip() {
        let message = [0xab; MESSAGE_LENGTH];
        let (pk, sk) = SigWinternitzLifetime18W4::key_gen(&mut OsRng, 1000, 4).unwrap();
        let sigma = SigWinternitzLifetime18W4::sign(&mut OsRng, &sk, 1002, &message).unwrap();
        assert!(SigWinternitzLifetime18W4::verify(&pk, 1002, &message, &sigma).is_ok());
    }

    #[test]
    fn lifetime20_target_sum_roundtrip() {
        let message = [0xcd; MESSAGE_LENGTH];
        let (pk, sk) = SigTargetSumLifetime20W2NoOff::key_gen(&mut OsRng, 0, 4).unwrap();
        let sigma = SigTargetSumLifetime20W2NoOff::sign(&mut OsRng, &sk, 3, &message).unwrap();
        assert!(SigTargetSumLifetime20W2NoOff::verify(&pk, 3, &message, &sigma).is_ok());
    }
}
