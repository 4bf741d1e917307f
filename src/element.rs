//! Width-family configuration for the two codecs.
//!
//! The 32-bit and 64-bit codecs share every algorithm and differ only in
//! the configuration collected by the [`Element`] trait: the stream magic,
//! the menu of packed widths, and the element-wide copy path.

use std::fmt::Debug;

use num::{PrimInt, Unsigned, cast::AsPrimitive};
use static_assertions::const_assert_eq;

use crate::{
    unpack::{self, UnpackFn},
    wire,
};

/// Elements per block handed to the partitioner.
pub(crate) const BLOCK_LEN: usize = 65536;

/// Trailing block elements stored uncompressed. Unpackers may read and
/// write up to a full group past the elements they were asked for; the
/// tail absorbs that slack on both the source and destination side.
pub(crate) const TAIL_LEN: usize = 16;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// A fixed-width unsigned integer the codec operates on.
///
/// Implemented for `u32` and `u64`. Sealed: the wire format defines
/// exactly two families, distinguished by their magic numbers.
pub trait Element: PrimInt + Unsigned + AsPrimitive<u64> + Debug + sealed::Sealed {
    const BITS: u32;
    const BYTES: usize;

    /// Stream preamble, written big-endian. Fixed forever.
    const MAGIC: u64;

    /// Smallest supported packed width ≥ the actual bit need, indexed by
    /// bit need `0..=BITS`.
    #[doc(hidden)]
    const ROUNDUP: &'static [u8];

    /// Packed width → control nibble, indexed by `0..=BITS`. `0xFF` marks
    /// widths outside the menu; those are unreachable behind
    /// [`Self::ROUNDUP`].
    #[doc(hidden)]
    const CTRL_WIDTH: &'static [u8];

    /// Unpacker handle per control nibble. `None` entries are reserved
    /// encodings and rejected by the block decoder.
    #[doc(hidden)]
    const UNPACKERS: [Option<UnpackFn<Self>>; 16];

    #[doc(hidden)]
    fn from_u32(v: u32) -> Self;

    #[doc(hidden)]
    fn put_be(dst: &mut [u8], v: Self);

    #[doc(hidden)]
    fn get_be(src: &[u8]) -> Self;

    /// Bits required to represent `self`; 0 for 0.
    #[doc(hidden)]
    #[inline]
    fn bits_needed(self) -> usize {
        (Self::BITS - self.leading_zeros()) as usize
    }
}

impl Element for u32 {
    const BITS: u32 = 32;
    const BYTES: usize = 4;

    const MAGIC: u64 = 0xBC32_AD23_9023_940E;

    #[rustfmt::skip]
    const ROUNDUP: &'static [u8] = &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
        16, 16, 16, 16,
        32, 32, 32, 32, 32, 32, 32, 32,
        32, 32, 32, 32, 32, 32, 32, 32,
    ];

    #[rustfmt::skip]
    const CTRL_WIDTH: &'static [u8] = &[
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
        0x08, 0x09, 0x0A, 0x0B, 0x0C, 0xFF, 0xFF, 0xFF,
        0x0D, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0x0E,
    ];

    const UNPACKERS: [Option<UnpackFn<Self>>; 16] = [
        Some(unpack::unpack0),
        Some(unpack::unpack1),
        Some(unpack::unpack2),
        Some(unpack::unpack3),
        Some(unpack::unpack4),
        Some(unpack::unpack5),
        Some(unpack::unpack6),
        Some(unpack::unpack7),
        Some(unpack::unpack8),
        Some(unpack::unpack9),
        Some(unpack::unpack10),
        Some(unpack::unpack11),
        Some(unpack::unpack12),
        Some(unpack::unpack16),
        Some(unpack::unpack32),
        None,
    ];

    #[inline]
    fn from_u32(v: u32) -> Self {
        v
    }

    #[inline]
    fn put_be(dst: &mut [u8], v: Self) {
        wire::put_u32(dst, v);
    }

    #[inline]
    fn get_be(src: &[u8]) -> Self {
        wire::get_u32(src)
    }
}

impl Element for u64 {
    const BITS: u32 = 64;
    const BYTES: usize = 8;

    const MAGIC: u64 = 0x08B5_A703_3F4C_BC3D;

    #[rustfmt::skip]
    const ROUNDUP: &'static [u8] = &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
        16, 16, 16, 16,
        32, 32, 32, 32, 32, 32, 32, 32,
        32, 32, 32, 32, 32, 32, 32, 32,
        64, 64, 64, 64, 64, 64, 64, 64,
        64, 64, 64, 64, 64, 64, 64, 64,
        64, 64, 64, 64, 64, 64, 64, 64,
        64, 64, 64, 64, 64, 64, 64, 64,
    ];

    #[rustfmt::skip]
    const CTRL_WIDTH: &'static [u8] = &[
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
        0x08, 0x09, 0x0A, 0x0B, 0x0C, 0xFF, 0xFF, 0xFF,
        0x0D, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0x0E, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0x0F,
    ];

    const UNPACKERS: [Option<UnpackFn<Self>>; 16] = [
        Some(unpack::unpack0),
        Some(unpack::unpack1),
        Some(unpack::unpack2),
        Some(unpack::unpack3),
        Some(unpack::unpack4),
        Some(unpack::unpack5),
        Some(unpack::unpack6),
        Some(unpack::unpack7),
        Some(unpack::unpack8),
        Some(unpack::unpack9),
        Some(unpack::unpack10),
        Some(unpack::unpack11),
        Some(unpack::unpack12),
        Some(unpack::unpack16),
        Some(unpack::unpack32),
        Some(unpack::unpack64),
    ];

    #[inline]
    fn from_u32(v: u32) -> Self {
        v as u64
    }

    #[inline]
    fn put_be(dst: &mut [u8], v: Self) {
        wire::put_u64(dst, v);
    }

    #[inline]
    fn get_be(src: &[u8]) -> Self {
        wire::get_u64(src)
    }
}

const_assert_eq!(<u32 as Element>::ROUNDUP.len(), 33);
const_assert_eq!(<u32 as Element>::CTRL_WIDTH.len(), 33);
const_assert_eq!(<u64 as Element>::ROUNDUP.len(), 65);
const_assert_eq!(<u64 as Element>::CTRL_WIDTH.len(), 65);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_needed() {
        assert_eq!(0u32.bits_needed(), 0);
        assert_eq!(1u32.bits_needed(), 1);
        assert_eq!(255u32.bits_needed(), 8);
        assert_eq!(256u32.bits_needed(), 9);
        assert_eq!(u32::MAX.bits_needed(), 32);

        assert_eq!(0u64.bits_needed(), 0);
        assert_eq!((1u64 << 33).bits_needed(), 34);
        assert_eq!(u64::MAX.bits_needed(), 64);
    }

    #[test]
    fn test_roundup_is_monotone_menu() {
        for b in 0..=32 {
            let w = <u32 as Element>::ROUNDUP[b] as usize;
            assert!(w >= b, "rounded width must cover the bit need");
            assert_ne!(<u32 as Element>::CTRL_WIDTH[w], 0xFF);
        }
        for b in 0..=64 {
            let w = <u64 as Element>::ROUNDUP[b] as usize;
            assert!(w >= b);
            assert_ne!(<u64 as Element>::CTRL_WIDTH[w], 0xFF);
        }
    }

    #[test]
    fn test_ctrl_width_nibbles_are_dense() {
        // The menu widths map onto nibbles 0x0..=0xE (32-bit) and
        // 0x0..=0xF (64-bit) with no gaps.
        let nibbles: Vec<u8> = <u32 as Element>::CTRL_WIDTH
            .iter()
            .copied()
            .filter(|&c| c != 0xFF)
            .collect();
        assert_eq!(nibbles, (0x0..=0x0E).collect::<Vec<u8>>());

        let nibbles: Vec<u8> = <u64 as Element>::CTRL_WIDTH
            .iter()
            .copied()
            .filter(|&c| c != 0xFF)
            .collect();
        assert_eq!(nibbles, (0x0..=0x0F).collect::<Vec<u8>>());
    }
}
