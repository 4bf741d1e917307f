//! Fixed-width unpackers, one per packed width in the menu.
//!
//! Bit order matches [`write_bits`](crate::pack::write_bits): big-endian,
//! MSB-first, so `unpack ∘ write_bits` is the identity on values below
//! `2^w`. For throughput every unpacker processes whole groups (see the
//! group table in the block format docs) and may read and write up to one
//! group past the `n` requested elements. The byte count it *returns* is
//! always the exact `ceil(n·w/8)`; the slack stays inside the caller's
//! bounds because framed blocks end in an uncompressed tail.
//!
//! Widths 9..=12 gather the packed region into u16 chunks first and then
//! scatter fields; the equivalence to a pure bit-stream reader is a
//! property of the pack layout.

use crate::{DecodeErr, element::Element, wire};

/// Handle type stored in the per-family dispatch tables.
pub type UnpackFn<E> = fn(&[u8], &mut [E], usize) -> Result<usize, DecodeErr>;

/// Group-aligned bounds check shared by every unpacker. A short source is
/// a truncated stream; a short destination means the control directory
/// promises more elements than the block holds.
#[inline]
fn check_bounds<E: Element>(
    src: &[u8],
    nbytes: usize,
    dst: &[E],
    nelems: usize,
) -> Result<(), DecodeErr> {
    if src.len() < nbytes {
        Err(DecodeErr::Length)
    } else if dst.len() < nelems {
        Err(DecodeErr::Validity)
    } else {
        Ok(())
    }
}

pub(crate) fn unpack0<E: Element>(
    _src: &[u8],
    dst: &mut [E],
    n: usize,
) -> Result<usize, DecodeErr> {
    if dst.len() < n {
        return Err(DecodeErr::Validity);
    }
    dst[..n].fill(E::zero());
    Ok(0)
}

pub(crate) fn unpack1<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(8);
    check_bounds(src, ngroup, dst, 8 * ngroup)?;

    for (src, dst) in src.chunks_exact(1).zip(dst.chunks_exact_mut(8)).take(ngroup) {
        let b = src[0] as u32;
        for (j, out) in dst.iter_mut().enumerate() {
            *out = E::from_u32((b >> (7 - j)) & 0x01);
        }
    }

    Ok(ngroup)
}

pub(crate) fn unpack2<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(4);
    check_bounds(src, ngroup, dst, 4 * ngroup)?;

    for (src, dst) in src.chunks_exact(1).zip(dst.chunks_exact_mut(4)).take(ngroup) {
        let b = src[0] as u32;
        for (j, out) in dst.iter_mut().enumerate() {
            *out = E::from_u32((b >> (6 - 2 * j)) & 0x03);
        }
    }

    Ok(ngroup)
}

pub(crate) fn unpack3<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(8);
    check_bounds(src, 3 * ngroup, dst, 8 * ngroup)?;

    for (src, dst) in src.chunks_exact(3).zip(dst.chunks_exact_mut(8)).take(ngroup) {
        let (b0, b1, b2) = (src[0] as u32, src[1] as u32, src[2] as u32);
        dst[0] = E::from_u32((b0 >> 5) & 0x07);
        dst[1] = E::from_u32((b0 >> 2) & 0x07);
        dst[2] = E::from_u32(((b0 << 1) & 0x07) | ((b1 >> 7) & 0x01));
        dst[3] = E::from_u32((b1 >> 4) & 0x07);
        dst[4] = E::from_u32((b1 >> 1) & 0x07);
        dst[5] = E::from_u32(((b1 << 2) & 0x07) | ((b2 >> 6) & 0x03));
        dst[6] = E::from_u32((b2 >> 3) & 0x07);
        dst[7] = E::from_u32(b2 & 0x07);
    }

    Ok((3 * n).div_ceil(8))
}

pub(crate) fn unpack4<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(2);
    check_bounds(src, ngroup, dst, 2 * ngroup)?;

    for (src, dst) in src.chunks_exact(1).zip(dst.chunks_exact_mut(2)).take(ngroup) {
        let b = src[0] as u32;
        dst[0] = E::from_u32((b >> 4) & 0x0F);
        dst[1] = E::from_u32(b & 0x0F);
    }

    Ok(ngroup)
}

pub(crate) fn unpack5<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(8);
    check_bounds(src, 5 * ngroup, dst, 8 * ngroup)?;

    for (src, dst) in src.chunks_exact(5).zip(dst.chunks_exact_mut(8)).take(ngroup) {
        let (b0, b1, b2, b3, b4) = (
            src[0] as u32,
            src[1] as u32,
            src[2] as u32,
            src[3] as u32,
            src[4] as u32,
        );
        dst[0] = E::from_u32((b0 >> 3) & 0x1F);
        dst[1] = E::from_u32(((b0 << 2) & 0x1F) | ((b1 >> 6) & 0x03));
        dst[2] = E::from_u32((b1 >> 1) & 0x1F);
        dst[3] = E::from_u32(((b1 << 4) & 0x1F) | ((b2 >> 4) & 0x0F));
        dst[4] = E::from_u32(((b2 << 1) & 0x1F) | ((b3 >> 7) & 0x01));
        dst[5] = E::from_u32((b3 >> 2) & 0x1F);
        dst[6] = E::from_u32(((b3 << 3) & 0x1F) | ((b4 >> 5) & 0x07));
        dst[7] = E::from_u32(b4 & 0x1F);
    }

    Ok((5 * n).div_ceil(8))
}

pub(crate) fn unpack6<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(4);
    check_bounds(src, 3 * ngroup, dst, 4 * ngroup)?;

    for (src, dst) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)).take(ngroup) {
        let (b0, b1, b2) = (src[0] as u32, src[1] as u32, src[2] as u32);
        dst[0] = E::from_u32((b0 >> 2) & 0x3F);
        dst[1] = E::from_u32(((b0 << 4) & 0x3F) | ((b1 >> 4) & 0x0F));
        dst[2] = E::from_u32(((b1 << 2) & 0x3F) | ((b2 >> 6) & 0x03));
        dst[3] = E::from_u32(b2 & 0x3F);
    }

    Ok((3 * n).div_ceil(4))
}

pub(crate) fn unpack7<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(8);
    check_bounds(src, 7 * ngroup, dst, 8 * ngroup)?;

    for (src, dst) in src.chunks_exact(7).zip(dst.chunks_exact_mut(8)).take(ngroup) {
        let (b0, b1, b2, b3, b4, b5, b6) = (
            src[0] as u32,
            src[1] as u32,
            src[2] as u32,
            src[3] as u32,
            src[4] as u32,
            src[5] as u32,
            src[6] as u32,
        );
        dst[0] = E::from_u32((b0 >> 1) & 0x7F);
        dst[1] = E::from_u32(((b0 << 6) & 0x7F) | ((b1 >> 2) & 0x3F));
        dst[2] = E::from_u32(((b1 << 5) & 0x7F) | ((b2 >> 3) & 0x1F));
        dst[3] = E::from_u32(((b2 << 4) & 0x7F) | ((b3 >> 4) & 0x0F));
        dst[4] = E::from_u32(((b3 << 3) & 0x7F) | ((b4 >> 5) & 0x07));
        dst[5] = E::from_u32(((b4 << 2) & 0x7F) | ((b5 >> 6) & 0x03));
        dst[6] = E::from_u32(((b5 << 1) & 0x7F) | ((b6 >> 7) & 0x01));
        dst[7] = E::from_u32(b6 & 0x7F);
    }

    Ok((7 * n).div_ceil(8))
}

pub(crate) fn unpack8<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    check_bounds(src, n, dst, n)?;

    for (&b, out) in src.iter().zip(dst.iter_mut()).take(n) {
        *out = E::from_u32(b as u32);
    }

    Ok(n)
}

pub(crate) fn unpack9<E: Element>(src: &[u8], dst: &mut [E], n: usize) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(16);
    check_bounds(src, 18 * ngroup, dst, 16 * ngroup)?;

    for (src, dst) in src.chunks_exact(18).zip(dst.chunks_exact_mut(16)).take(ngroup) {
        let mut v = [0u32; 9];
        for (j, chunk) in src.chunks_exact(2).enumerate() {
            v[j] = wire::get_u16(chunk) as u32;
        }

        dst[0] = E::from_u32((v[0] >> 7) & 0x01FF);
        dst[1] = E::from_u32(((v[0] << 2) & 0x01FF) | (v[1] >> 14));
        dst[2] = E::from_u32((v[1] >> 5) & 0x01FF);
        dst[3] = E::from_u32(((v[1] << 4) & 0x01FF) | (v[2] >> 12));
        dst[4] = E::from_u32((v[2] >> 3) & 0x01FF);
        dst[5] = E::from_u32(((v[2] << 6) & 0x01FF) | (v[3] >> 10));
        dst[6] = E::from_u32((v[3] >> 1) & 0x01FF);
        dst[7] = E::from_u32(((v[3] << 8) & 0x01FF) | (v[4] >> 8));
        dst[8] = E::from_u32(((v[4] << 1) & 0x01FF) | (v[5] >> 15));
        dst[9] = E::from_u32((v[5] >> 6) & 0x01FF);
        dst[10] = E::from_u32(((v[5] << 3) & 0x01FF) | (v[6] >> 13));
        dst[11] = E::from_u32((v[6] >> 4) & 0x01FF);
        dst[12] = E::from_u32(((v[6] << 5) & 0x01FF) | (v[7] >> 11));
        dst[13] = E::from_u32((v[7] >> 2) & 0x01FF);
        dst[14] = E::from_u32(((v[7] << 7) & 0x01FF) | (v[8] >> 9));
        dst[15] = E::from_u32(v[8] & 0x01FF);
    }

    Ok((9 * n).div_ceil(8))
}

pub(crate) fn unpack10<E: Element>(
    src: &[u8],
    dst: &mut [E],
    n: usize,
) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(8);
    check_bounds(src, 10 * ngroup, dst, 8 * ngroup)?;

    for (src, dst) in src.chunks_exact(10).zip(dst.chunks_exact_mut(8)).take(ngroup) {
        let mut v = [0u32; 5];
        for (j, chunk) in src.chunks_exact(2).enumerate() {
            v[j] = wire::get_u16(chunk) as u32;
        }

        dst[0] = E::from_u32((v[0] >> 6) & 0x03FF);
        dst[1] = E::from_u32(((v[0] << 4) & 0x03FF) | (v[1] >> 12));
        dst[2] = E::from_u32((v[1] >> 2) & 0x03FF);
        dst[3] = E::from_u32(((v[1] << 8) & 0x03FF) | (v[2] >> 8));
        dst[4] = E::from_u32(((v[2] << 2) & 0x03FF) | (v[3] >> 14));
        dst[5] = E::from_u32((v[3] >> 4) & 0x03FF);
        dst[6] = E::from_u32(((v[3] << 6) & 0x03FF) | (v[4] >> 10));
        dst[7] = E::from_u32(v[4] & 0x03FF);
    }

    Ok((5 * n).div_ceil(4))
}

pub(crate) fn unpack11<E: Element>(
    src: &[u8],
    dst: &mut [E],
    n: usize,
) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(16);
    check_bounds(src, 22 * ngroup, dst, 16 * ngroup)?;

    for (src, dst) in src.chunks_exact(22).zip(dst.chunks_exact_mut(16)).take(ngroup) {
        let mut v = [0u32; 11];
        for (j, chunk) in src.chunks_exact(2).enumerate() {
            v[j] = wire::get_u16(chunk) as u32;
        }

        dst[0] = E::from_u32((v[0] >> 5) & 0x07FF);
        dst[1] = E::from_u32(((v[0] << 6) & 0x07FF) | (v[1] >> 10));
        dst[2] = E::from_u32(((v[1] << 1) & 0x07FF) | (v[2] >> 15));
        dst[3] = E::from_u32((v[2] >> 4) & 0x07FF);
        dst[4] = E::from_u32(((v[2] << 7) & 0x07FF) | (v[3] >> 9));
        dst[5] = E::from_u32(((v[3] << 2) & 0x07FF) | (v[4] >> 14));
        dst[6] = E::from_u32((v[4] >> 3) & 0x07FF);
        dst[7] = E::from_u32(((v[4] << 8) & 0x07FF) | (v[5] >> 8));
        dst[8] = E::from_u32(((v[5] << 3) & 0x07FF) | (v[6] >> 13));
        dst[9] = E::from_u32((v[6] >> 2) & 0x07FF);
        dst[10] = E::from_u32(((v[6] << 9) & 0x07FF) | (v[7] >> 7));
        dst[11] = E::from_u32(((v[7] << 4) & 0x07FF) | (v[8] >> 12));
        dst[12] = E::from_u32((v[8] >> 1) & 0x07FF);
        dst[13] = E::from_u32(((v[8] << 10) & 0x07FF) | (v[9] >> 6));
        dst[14] = E::from_u32(((v[9] << 5) & 0x07FF) | (v[10] >> 11));
        dst[15] = E::from_u32(v[10] & 0x07FF);
    }

    Ok((11 * n).div_ceil(8))
}

pub(crate) fn unpack12<E: Element>(
    src: &[u8],
    dst: &mut [E],
    n: usize,
) -> Result<usize, DecodeErr> {
    let ngroup = n.div_ceil(4);
    check_bounds(src, 6 * ngroup, dst, 4 * ngroup)?;

    for (src, dst) in src.chunks_exact(6).zip(dst.chunks_exact_mut(4)).take(ngroup) {
        let mut v = [0u32; 3];
        for (j, chunk) in src.chunks_exact(2).enumerate() {
            v[j] = wire::get_u16(chunk) as u32;
        }

        dst[0] = E::from_u32((v[0] >> 4) & 0x0FFF);
        dst[1] = E::from_u32(((v[0] << 8) & 0x0FFF) | (v[1] >> 8));
        dst[2] = E::from_u32(((v[1] << 4) & 0x0FFF) | (v[2] >> 12));
        dst[3] = E::from_u32(v[2] & 0x0FFF);
    }

    Ok((3 * n).div_ceil(2))
}

pub(crate) fn unpack16<E: Element>(
    src: &[u8],
    dst: &mut [E],
    n: usize,
) -> Result<usize, DecodeErr> {
    check_bounds(src, 2 * n, dst, n)?;

    for (chunk, out) in src.chunks_exact(2).zip(dst.iter_mut()).take(n) {
        *out = E::from_u32(wire::get_u16(chunk) as u32);
    }

    Ok(2 * n)
}

pub(crate) fn unpack32<E: Element>(
    src: &[u8],
    dst: &mut [E],
    n: usize,
) -> Result<usize, DecodeErr> {
    check_bounds(src, 4 * n, dst, n)?;

    for (chunk, out) in src.chunks_exact(4).zip(dst.iter_mut()).take(n) {
        *out = E::from_u32(wire::get_u32(chunk));
    }

    Ok(4 * n)
}

pub(crate) fn unpack64(src: &[u8], dst: &mut [u64], n: usize) -> Result<usize, DecodeErr> {
    check_bounds(src, 8 * n, dst, n)?;

    for (chunk, out) in src.chunks_exact(8).zip(dst.iter_mut()).take(n) {
        *out = wire::get_u64(chunk);
    }

    Ok(8 * n)
}
