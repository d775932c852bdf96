//! Hamming distance between 64-bit hashes.
//!
//! The hot path is a SWAR (SIMD-within-a-register) population count: a
//! fixed number of word-wide operations instead of a loop over 64 bits.

use super::HashDistance;
use crate::core::hasher::PerceptualHash;

const M1: u64 = 0x5555_5555_5555_5555;
const M2: u64 = 0x3333_3333_3333_3333;
const M4: u64 = 0x0f0f_0f0f_0f0f_0f0f;
const H01: u64 = 0x0101_0101_0101_0101;

/// Number of differing bits between two raw 64-bit codes.
#[inline]
pub const fn hamming_distance(a: u64, b: u64) -> HashDistance {
    let mut x = a ^ b;
    // 2-bit counts
    x -= (x >> 1) & M1;
    // 4-bit counts
    x = (x & M2) + ((x >> 2) & M2);
    // 8-bit counts
    x = (x + (x >> 4)) & M4;
    // the top byte collects the sum of all eight byte counts
    (x.wrapping_mul(H01) >> 56) as HashDistance
}

/// Hamming distance between two perceptual hashes, in `0..=64`.
#[inline]
pub fn distance(a: PerceptualHash, b: PerceptualHash) -> HashDistance {
    hamming_distance(a.bits(), b.bits())
}

/// Same result as [`distance`], via the hardware population count.
#[inline]
pub fn distance_intrinsic(a: PerceptualHash, b: PerceptualHash) -> HashDistance {
    (a.bits() ^ b.bits()).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naive(a: u64, b: u64) -> u32 {
        let x = a ^ b;
        (0..64).filter(|bit| (x >> bit) & 1 == 1).count() as u32
    }

    fn h(bits: u64) -> PerceptualHash {
        PerceptualHash::new(bits)
    }

    #[test]
    fn opposite_hashes_are_64_apart() {
        assert_eq!(distance(h(0), h(u64::MAX)), 64);
        assert_eq!(
            distance(h(0x0F0F_0F0F_0F0F_0F0F), h(0xF0F0_F0F0_F0F0_F0F0)),
            64
        );
    }

    #[test]
    fn single_bit_positions() {
        for bit in 0..64 {
            assert_eq!(hamming_distance(0, 1 << bit), 1, "bit {bit}");
            assert_eq!(hamming_distance(u64::MAX, !(1 << bit)), 1, "bit {bit}");
        }
    }

    #[test]
    fn adversarial_patterns_match_naive() {
        let patterns = [
            0,
            u64::MAX,
            M1,
            !M1,
            M2,
            M4,
            H01,
            0x8000_0000_0000_0000,
            0x0000_0000_0000_0001,
            0xFF00_FF00_FF00_FF00,
            0x00FF_FFFF_FFFF_FF00,
            0xDEAD_BEEF_CAFE_BABE,
        ];
        for &a in &patterns {
            for &b in &patterns {
                assert_eq!(hamming_distance(a, b), naive(a, b), "{a:#x} vs {b:#x}");
                assert_eq!(hamming_distance(a, !a ^ b), naive(a, !a ^ b));
            }
        }
    }

    #[test]
    fn usable_in_const_context() {
        const D: HashDistance = hamming_distance(0b1011, 0b0001);
        assert_eq!(D, 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10_000))]

        #[test]
        fn swar_matches_naive_and_intrinsic(a: u64, b: u64) {
            let expected = naive(a, b);
            prop_assert_eq!(distance(h(a), h(b)), expected);
            prop_assert_eq!(distance_intrinsic(h(a), h(b)), expected);
        }

        #[test]
        fn boundary_cases(a: u64) {
            prop_assert_eq!(distance(h(a), h(a)), 0);
            prop_assert_eq!(distance(h(0), h(a)), naive(0, a));
            prop_assert_eq!(distance(h(a), h(u64::MAX)), naive(a, u64::MAX));
            prop_assert_eq!(distance(h(a), h(!a)), 64);
        }

        #[test]
        fn symmetric(a: u64, b: u64) {
            prop_assert_eq!(distance(h(a), h(b)), distance(h(b), h(a)));
        }

        #[test]
        fn triangle_inequality(a: u64, b: u64, c: u64) {
            let ac = distance(h(a), h(c));
            let ab = distance(h(a), h(b));
            let bc = distance(h(b), h(c));
            prop_assert!(ac <= ab + bc);
        }

        #[test]
        fn bounded(a: u64, b: u64) {
            prop_assert!(distance(h(a), h(b)) <= 64);
        }
    }
}
