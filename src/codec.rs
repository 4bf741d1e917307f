//! Whole-stream compress/uncompress drivers.

use bytes::Bytes;

use crate::{
    DecodeErr, EncodeErr,
    block::{compress_block, uncompress_block},
    element::{BLOCK_LEN, Element},
    partition::Partitioner,
    wire,
};

/// Upper bound on the compressed size of `n` elements: the magic, the
/// per-block framing, and the worst-case per-element expansion of one
/// control byte of overhead on top of the raw element width.
pub fn compress_bound<E: Element>(n: usize) -> usize {
    8 + 8 * n.div_ceil(BLOCK_LEN) + (E::BYTES + 1) * n
}

/// Compresses `src` into `dst`, returning the number of bytes written.
///
/// Size `dst` with [`compress_bound`] to rule out [`EncodeErr::OutputFull`].
///
/// The stream does not record the element count: callers must convey
/// `src.len()` out of band and hand it back to [`uncompress`].
pub fn compress<E: Element>(src: &[E], dst: &mut [u8]) -> Result<usize, EncodeErr> {
    if dst.len() < 8 {
        return Err(EncodeErr::OutputFull);
    }
    wire::put_u64(dst, E::MAGIC);
    let mut pos = 8;

    let mut splitter = Partitioner::default();
    for block in src.chunks(BLOCK_LEN) {
        pos += compress_block(block, &mut dst[pos..], &mut splitter)?;
    }
    Ok(pos)
}

/// Decompresses a stream produced by [`compress`] into `dst`, returning
/// the number of bytes read.
///
/// The element count is not part of the stream: `dst.len()` must equal the
/// `src.len()` originally given to [`compress`]. On any error the contents
/// of `dst` are indeterminate and must be discarded.
pub fn uncompress<E: Element>(src: &[u8], dst: &mut [E]) -> Result<usize, DecodeErr> {
    if src.len() < 8 {
        return Err(DecodeErr::Length);
    }
    if wire::get_u64(src) != E::MAGIC {
        return Err(DecodeErr::Magic);
    }
    let mut pos = 8;

    for block in dst.chunks_mut(BLOCK_LEN) {
        pos += uncompress_block(&src[pos..], block)?;
    }
    Ok(pos)
}

/// Compresses `src` into a freshly allocated [`Bytes`] buffer.
pub fn compress_to_bytes<E: Element>(src: &[E]) -> Bytes {
    let mut buf = vec![0u8; compress_bound::<E>(src.len())];
    let len = compress(src, &mut buf).expect("destination sized to compress_bound");
    buf.truncate(len);
    Bytes::from(buf)
}

/// Decompresses a stream of `n` elements into a freshly allocated vector.
pub fn uncompress_to_vec<E: Element>(src: &[u8], n: usize) -> Result<Vec<E>, DecodeErr> {
    let mut out = vec![E::zero(); n];
    uncompress(src, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use proptest::proptest;

    use super::*;
    use crate::{
        assert_error,
        testutil::{Draw, Xor128},
        wire::put_u64,
    };

    fn check_roundtrip<E: Element>(src: &[E]) {
        let bound = compress_bound::<E>(src.len());
        let mut dst = vec![0u8; bound];
        let wsize = compress(src, &mut dst).unwrap();
        assert!(wsize <= bound);

        let mut out = vec![E::zero(); src.len()];
        let rsize = uncompress(&dst, &mut out).unwrap();
        assert_eq!(rsize, wsize);
        assert_eq!(out, src);
    }

    #[test]
    fn test_roundtrip_grid_u32() {
        let sizes = [1usize, 7, 143, 144, 255, 1024, 4096];
        let shifts = [1u32, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 16, 24];
        let mut rng = Xor128::new();
        for (&n, &shift) in sizes.iter().cartesian_product(shifts.iter()) {
            let values: Vec<u32> = (0..n).map(|_| u32::draw(&mut rng) % (1 << shift)).collect();
            check_roundtrip(&values);
        }
    }

    #[test]
    fn test_roundtrip_grid_u64() {
        let sizes = [1usize, 7, 143, 144, 255, 1024, 4096];
        let shifts = [1u32, 4, 8, 12, 16, 24, 33, 48, 63];
        let mut rng = Xor128::new();
        for (&n, &shift) in sizes.iter().cartesian_product(shifts.iter()) {
            let values: Vec<u64> = (0..n).map(|_| u64::draw(&mut rng) % (1 << shift)).collect();
            check_roundtrip(&values);
        }
    }

    #[test]
    fn test_roundtrip_multi_block() {
        let mut rng = Xor128::new();
        for n in [65536usize, 65537, 131072] {
            let values: Vec<u32> = (0..n).map(|_| u32::draw(&mut rng) % (1 << 24)).collect();
            check_roundtrip(&values);
        }
    }

    #[test]
    fn test_roundtrip_degenerate_inputs() {
        check_roundtrip::<u32>(&[]);
        check_roundtrip(&[0u32; 128]);
        check_roundtrip(&vec![u32::MAX; 4096]);
        check_roundtrip(&[0u64; 128]);
        check_roundtrip(&vec![u64::MAX; 4096]);
    }

    #[test]
    fn test_magic_corruption_rejected() {
        let mut rng = Xor128::new();
        let values: Vec<u32> = (0..4096).map(|_| u32::draw(&mut rng) % (1 << 12)).collect();
        let mut dst = vec![0u8; compress_bound::<u32>(values.len())];
        compress(&values, &mut dst).unwrap();

        let mut out = vec![0u32; values.len()];
        put_u64(&mut dst, 0x0FBC_32AD_2390_2394);
        assert_error!(uncompress(&dst, &mut out), DecodeErr::Magic);
    }

    #[test]
    fn test_families_reject_each_other() {
        let values = vec![3u32; 4096];
        let stream = compress_to_bytes(&values);

        let mut out = vec![0u64; values.len()];
        assert_error!(uncompress(&stream, &mut out), DecodeErr::Magic);
    }

    #[test]
    fn test_truncated_stream_rejected() {
        let values = vec![3u64; 4096];
        let stream = compress_to_bytes(&values);

        let mut out = vec![0u64; values.len()];
        assert_error!(
            uncompress(&stream[..stream.len() - 1], &mut out),
            DecodeErr::Length
        );
        assert_error!(uncompress(&stream[..4], &mut out), DecodeErr::Length);
    }

    #[test]
    fn test_empty_stream_is_just_magic() {
        let stream = compress_to_bytes::<u32>(&[]);
        assert_eq!(stream.len(), 8);
        assert_eq!(uncompress_to_vec::<u32>(&stream, 0), Ok(vec![]));
    }

    #[test]
    fn test_uncompress_to_vec() {
        let mut rng = Xor128::new();
        let values: Vec<u64> = (0..300).map(|_| u64::draw(&mut rng) % (1 << 40)).collect();
        let stream = compress_to_bytes(&values);
        assert_eq!(uncompress_to_vec(&stream, values.len()), Ok(values));
    }

    proptest! {
        #[test]
        fn test_roundtrip_proptest_u32(
            values in proptest::collection::vec(0u32..=u32::MAX, 0..2048),
        ) {
            check_roundtrip(&values);
        }

        #[test]
        fn test_roundtrip_proptest_u64(
            values in proptest::collection::vec(0u64..=u64::MAX, 0..2048),
        ) {
            check_roundtrip(&values);
        }
    }
}
