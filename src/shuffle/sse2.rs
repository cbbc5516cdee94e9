//! 16-byte vector kernels.
//!
//! Compiled only when the build targets SSE2 on x86_64; the driver in the
//! parent module routes here at compile time. Every function produces output
//! byte-identical to its scalar counterpart in `generic`, finishing sub-16
//! tails through the scalar remainder entries.

use std::arch::x86_64::*;

use super::generic;

/// Transpose bytes within elements for 16 bit elements.
pub fn trans_byte_elem_16(input: &[u8], output: &mut [u8], size: usize) -> i64 {
    debug_assert!(input.len() >= size * 2 && output.len() >= size * 2);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut ii = 0;
        while ii + 15 < size {
            let a0 = _mm_loadu_si128(in_b.add(2 * ii) as *const __m128i);
            let b0 = _mm_loadu_si128(in_b.add(2 * ii + 16) as *const __m128i);

            let a1 = _mm_unpacklo_epi8(a0, b0);
            let b1 = _mm_unpackhi_epi8(a0, b0);

            let a0 = _mm_unpacklo_epi8(a1, b1);
            let b0 = _mm_unpackhi_epi8(a1, b1);

            let a1 = _mm_unpacklo_epi8(a0, b0);
            let b1 = _mm_unpackhi_epi8(a0, b0);

            let a0 = _mm_unpacklo_epi8(a1, b1);
            let b0 = _mm_unpackhi_epi8(a1, b1);

            _mm_storeu_si128(out_b.add(ii) as *mut __m128i, a0);
            _mm_storeu_si128(out_b.add(size + ii) as *mut __m128i, b0);
            ii += 16;
        }
    }
    generic::trans_byte_elem_remainder(input, output, size, 2, size - size % 16)
}

/// Transpose bytes within elements for 32 bit elements.
pub fn trans_byte_elem_32(input: &[u8], output: &mut [u8], size: usize) -> i64 {
    debug_assert!(input.len() >= size * 4 && output.len() >= size * 4);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut ii = 0;
        while ii + 15 < size {
            let a0 = _mm_loadu_si128(in_b.add(4 * ii) as *const __m128i);
            let b0 = _mm_loadu_si128(in_b.add(4 * ii + 16) as *const __m128i);
            let c0 = _mm_loadu_si128(in_b.add(4 * ii + 32) as *const __m128i);
            let d0 = _mm_loadu_si128(in_b.add(4 * ii + 48) as *const __m128i);

            let a1 = _mm_unpacklo_epi8(a0, b0);
            let b1 = _mm_unpackhi_epi8(a0, b0);
            let c1 = _mm_unpacklo_epi8(c0, d0);
            let d1 = _mm_unpackhi_epi8(c0, d0);

            let a0 = _mm_unpacklo_epi8(a1, b1);
            let b0 = _mm_unpackhi_epi8(a1, b1);
            let c0 = _mm_unpacklo_epi8(c1, d1);
            let d0 = _mm_unpackhi_epi8(c1, d1);

            let a1 = _mm_unpacklo_epi8(a0, b0);
            let b1 = _mm_unpackhi_epi8(a0, b0);
            let c1 = _mm_unpacklo_epi8(c0, d0);
            let d1 = _mm_unpackhi_epi8(c0, d0);

            let a0 = _mm_unpacklo_epi64(a1, c1);
            let b0 = _mm_unpackhi_epi64(a1, c1);
            let c0 = _mm_unpacklo_epi64(b1, d1);
            let d0 = _mm_unpackhi_epi64(b1, d1);

            _mm_storeu_si128(out_b.add(ii) as *mut __m128i, a0);
            _mm_storeu_si128(out_b.add(size + ii) as *mut __m128i, b0);
            _mm_storeu_si128(out_b.add(2 * size + ii) as *mut __m128i, c0);
            _mm_storeu_si128(out_b.add(3 * size + ii) as *mut __m128i, d0);
            ii += 16;
        }
    }
    generic::trans_byte_elem_remainder(input, output, size, 4, size - size % 16)
}

/// Transpose bytes within elements for 64 bit elements.
pub fn trans_byte_elem_64(input: &[u8], output: &mut [u8], size: usize) -> i64 {
    debug_assert!(input.len() >= size * 8 && output.len() >= size * 8);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut ii = 0;
        while ii + 15 < size {
            let a0 = _mm_loadu_si128(in_b.add(8 * ii) as *const __m128i);
            let b0 = _mm_loadu_si128(in_b.add(8 * ii + 16) as *const __m128i);
            let c0 = _mm_loadu_si128(in_b.add(8 * ii + 32) as *const __m128i);
            let d0 = _mm_loadu_si128(in_b.add(8 * ii + 48) as *const __m128i);
            let e0 = _mm_loadu_si128(in_b.add(8 * ii + 64) as *const __m128i);
            let f0 = _mm_loadu_si128(in_b.add(8 * ii + 80) as *const __m128i);
            let g0 = _mm_loadu_si128(in_b.add(8 * ii + 96) as *const __m128i);
            let h0 = _mm_loadu_si128(in_b.add(8 * ii + 112) as *const __m128i);

            let a1 = _mm_unpacklo_epi8(a0, b0);
            let b1 = _mm_unpackhi_epi8(a0, b0);
            let c1 = _mm_unpacklo_epi8(c0, d0);
            let d1 = _mm_unpackhi_epi8(c0, d0);
            let e1 = _mm_unpacklo_epi8(e0, f0);
            let f1 = _mm_unpackhi_epi8(e0, f0);
            let g1 = _mm_unpacklo_epi8(g0, h0);
            let h1 = _mm_unpackhi_epi8(g0, h0);

            let a0 = _mm_unpacklo_epi8(a1, b1);
            let b0 = _mm_unpackhi_epi8(a1, b1);
            let c0 = _mm_unpacklo_epi8(c1, d1);
            let d0 = _mm_unpackhi_epi8(c1, d1);
            let e0 = _mm_unpacklo_epi8(e1, f1);
            let f0 = _mm_unpackhi_epi8(e1, f1);
            let g0 = _mm_unpacklo_epi8(g1, h1);
            let h0 = _mm_unpackhi_epi8(g1, h1);

            let a1 = _mm_unpacklo_epi32(a0, c0);
            let b1 = _mm_unpackhi_epi32(a0, c0);
            let c1 = _mm_unpacklo_epi32(b0, d0);
            let d1 = _mm_unpackhi_epi32(b0, d0);
            let e1 = _mm_unpacklo_epi32(e0, g0);
            let f1 = _mm_unpackhi_epi32(e0, g0);
            let g1 = _mm_unpacklo_epi32(f0, h0);
            let h1 = _mm_unpackhi_epi32(f0, h0);

            let a0 = _mm_unpacklo_epi64(a1, e1);
            let b0 = _mm_unpackhi_epi64(a1, e1);
            let c0 = _mm_unpacklo_epi64(b1, f1);
            let d0 = _mm_unpackhi_epi64(b1, f1);
            let e0 = _mm_unpacklo_epi64(c1, g1);
            let f0 = _mm_unpackhi_epi64(c1, g1);
            let g0 = _mm_unpacklo_epi64(d1, h1);
            let h0 = _mm_unpackhi_epi64(d1, h1);

            _mm_storeu_si128(out_b.add(ii) as *mut __m128i, a0);
            _mm_storeu_si128(out_b.add(size + ii) as *mut __m128i, b0);
            _mm_storeu_si128(out_b.add(2 * size + ii) as *mut __m128i, c0);
            _mm_storeu_si128(out_b.add(3 * size + ii) as *mut __m128i, d0);
            _mm_storeu_si128(out_b.add(4 * size + ii) as *mut __m128i, e0);
            _mm_storeu_si128(out_b.add(5 * size + ii) as *mut __m128i, f0);
            _mm_storeu_si128(out_b.add(6 * size + ii) as *mut __m128i, g0);
            _mm_storeu_si128(out_b.add(7 * size + ii) as *mut __m128i, h0);
            ii += 16;
        }
    }
    generic::trans_byte_elem_remainder(input, output, size, 8, size - size % 16)
}

/// Transpose bytes within elements using the best SSE algorithm available.
pub fn trans_byte_elem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    // Trivial cases: power of 2 bytes.
    match elem_size {
        1 => return generic::copy(input, output, size, elem_size),
        2 => return trans_byte_elem_16(input, output, size),
        4 => return trans_byte_elem_32(input, output, size),
        8 => return trans_byte_elem_64(input, output, size),
        _ => {}
    }

    // Worst case: odd number of bytes. Measured faster through the scalar
    // path for (odd * 2) byte elements as well, hence % 4.
    if elem_size % 4 != 0 {
        return generic::trans_byte_elem(input, output, size, elem_size);
    }

    // Multiple of a power of 2: transpose hierarchically.
    let mut tmp_buf = match super::scratch(size * elem_size) {
        Ok(buf) => buf,
        Err(e) => return e,
    };

    let count;
    if elem_size % 8 == 0 {
        let nchunk_elem = elem_size / 8;
        generic::trans_elem(input, output, size, nchunk_elem, 8);
        count = trans_byte_elem_64(output, &mut tmp_buf, size * nchunk_elem);
        generic::trans_elem(&tmp_buf, output, 8, nchunk_elem, size);
    } else {
        let nchunk_elem = elem_size / 4;
        generic::trans_elem(input, output, size, nchunk_elem, 4);
        count = trans_byte_elem_32(output, &mut tmp_buf, size * nchunk_elem);
        generic::trans_elem(&tmp_buf, output, 4, nchunk_elem, size);
    }
    count
}

/// Transpose bits within bytes.
pub fn trans_bit_byte(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    let nbyte = elem_size * size;

    if let Err(e) = generic::check_mult_eight(nbyte) {
        return e;
    }
    debug_assert!(input.len() >= nbyte && output.len() >= nbyte);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut ii = 0;
        while ii + 15 < nbyte {
            let mut xmm = _mm_loadu_si128(in_b.add(ii) as *const __m128i);
            for kk in 0..8 {
                let bt = _mm_movemask_epi8(xmm);
                xmm = _mm_slli_epi16(xmm, 1);
                let out_ptr = out_b.add(((7 - kk) * nbyte + ii) / 8) as *mut u16;
                out_ptr.write_unaligned(bt as u16);
            }
            ii += 16;
        }
    }
    generic::trans_bit_byte_remainder(input, output, size, elem_size, nbyte - nbyte % 16)
}

/// Transpose bits within elements.
pub fn trans_bit_elem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    if let Err(e) = generic::check_mult_eight(size) {
        return e;
    }

    let mut tmp_buf = match super::scratch(size * elem_size) {
        Ok(buf) => buf,
        Err(e) => return e,
    };

    let count = trans_byte_elem(input, output, size, elem_size);
    if count < 0 {
        return count;
    }
    let count = trans_bit_byte(output, &mut tmp_buf, size, elem_size);
    if count < 0 {
        return count;
    }
    generic::trans_bitrow_eight(&tmp_buf, output, size, elem_size)
}

#[inline]
unsafe fn store_low(ptr: *mut u8, v: __m128i) {
    _mm_storel_epi64(ptr as *mut __m128i, v);
}

#[inline]
unsafe fn store_high(ptr: *mut u8, v: __m128i) {
    _mm_storel_epi64(ptr as *mut __m128i, _mm_unpackhi_epi64(v, v));
}

/// For data organized into a row for each bit (8 * elem_size rows),
/// transpose the bytes.
pub fn trans_byte_bitrow(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    if let Err(e) = generic::check_mult_eight(size) {
        return e;
    }

    let nrows = 8 * elem_size;
    let nbyte_row = size / 8;
    debug_assert!(input.len() >= nrows * nbyte_row && output.len() >= nrows * nbyte_row);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut ii = 0;
        while ii + 7 < nrows {
            let mut jj = 0;
            while jj + 15 < nbyte_row {
                let a0 = _mm_loadu_si128(in_b.add(ii * nbyte_row + jj) as *const __m128i);
                let b0 = _mm_loadu_si128(in_b.add((ii + 1) * nbyte_row + jj) as *const __m128i);
                let c0 = _mm_loadu_si128(in_b.add((ii + 2) * nbyte_row + jj) as *const __m128i);
                let d0 = _mm_loadu_si128(in_b.add((ii + 3) * nbyte_row + jj) as *const __m128i);
                let e0 = _mm_loadu_si128(in_b.add((ii + 4) * nbyte_row + jj) as *const __m128i);
                let f0 = _mm_loadu_si128(in_b.add((ii + 5) * nbyte_row + jj) as *const __m128i);
                let g0 = _mm_loadu_si128(in_b.add((ii + 6) * nbyte_row + jj) as *const __m128i);
                let h0 = _mm_loadu_si128(in_b.add((ii + 7) * nbyte_row + jj) as *const __m128i);

                let a1 = _mm_unpacklo_epi8(a0, b0);
                let b1 = _mm_unpacklo_epi8(c0, d0);
                let c1 = _mm_unpacklo_epi8(e0, f0);
                let d1 = _mm_unpacklo_epi8(g0, h0);
                let e1 = _mm_unpackhi_epi8(a0, b0);
                let f1 = _mm_unpackhi_epi8(c0, d0);
                let g1 = _mm_unpackhi_epi8(e0, f0);
                let h1 = _mm_unpackhi_epi8(g0, h0);

                let a0 = _mm_unpacklo_epi16(a1, b1);
                let b0 = _mm_unpacklo_epi16(c1, d1);
                let c0 = _mm_unpackhi_epi16(a1, b1);
                let d0 = _mm_unpackhi_epi16(c1, d1);

                let e0 = _mm_unpacklo_epi16(e1, f1);
                let f0 = _mm_unpacklo_epi16(g1, h1);
                let g0 = _mm_unpackhi_epi16(e1, f1);
                let h0 = _mm_unpackhi_epi16(g1, h1);

                let a1 = _mm_unpacklo_epi32(a0, b0);
                let b1 = _mm_unpackhi_epi32(a0, b0);

                let c1 = _mm_unpacklo_epi32(c0, d0);
                let d1 = _mm_unpackhi_epi32(c0, d0);

                let e1 = _mm_unpacklo_epi32(e0, f0);
                let f1 = _mm_unpackhi_epi32(e0, f0);

                let g1 = _mm_unpacklo_epi32(g0, h0);
                let h1 = _mm_unpackhi_epi32(g0, h0);

                // The low and high quadwords of each register land in
                // consecutive output rows.
                store_low(out_b.add(jj * nrows + ii), a1);
                store_high(out_b.add((jj + 1) * nrows + ii), a1);
                store_low(out_b.add((jj + 2) * nrows + ii), b1);
                store_high(out_b.add((jj + 3) * nrows + ii), b1);
                store_low(out_b.add((jj + 4) * nrows + ii), c1);
                store_high(out_b.add((jj + 5) * nrows + ii), c1);
                store_low(out_b.add((jj + 6) * nrows + ii), d1);
                store_high(out_b.add((jj + 7) * nrows + ii), d1);
                store_low(out_b.add((jj + 8) * nrows + ii), e1);
                store_high(out_b.add((jj + 9) * nrows + ii), e1);
                store_low(out_b.add((jj + 10) * nrows + ii), f1);
                store_high(out_b.add((jj + 11) * nrows + ii), f1);
                store_low(out_b.add((jj + 12) * nrows + ii), g1);
                store_high(out_b.add((jj + 13) * nrows + ii), g1);
                store_low(out_b.add((jj + 14) * nrows + ii), h1);
                store_high(out_b.add((jj + 15) * nrows + ii), h1);
                jj += 16;
            }
            for jj in (nbyte_row - nbyte_row % 16)..nbyte_row {
                for kk in 0..8 {
                    *out_b.add(jj * nrows + ii + kk) = *in_b.add((ii + kk) * nbyte_row + jj);
                }
            }
            ii += 8;
        }
    }
    (size * elem_size) as i64
}

/// Shuffle bits within the bytes of eight-element groups.
pub fn shuffle_bit_eightelem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    if let Err(e) = generic::check_mult_eight(size) {
        return e;
    }

    if elem_size % 2 != 0 {
        return generic::shuffle_bit_eightelem(input, output, size, elem_size);
    }

    let nbyte = elem_size * size;
    debug_assert!(input.len() >= nbyte && output.len() >= nbyte);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut ii = 0;
        while ii + 8 * elem_size <= nbyte {
            let mut jj = 0;
            while jj + 15 < 8 * elem_size {
                let mut xmm = _mm_loadu_si128(in_b.add(ii + jj) as *const __m128i);
                for kk in 0..8 {
                    let bt = _mm_movemask_epi8(xmm);
                    xmm = _mm_slli_epi16(xmm, 1);
                    let ind = ii + jj / 8 + (7 - kk) * elem_size;
                    (out_b.add(ind) as *mut u16).write_unaligned(bt as u16);
                }
                jj += 16;
            }
            ii += 8 * elem_size;
        }
    }
    (size * elem_size) as i64
}

/// Untranspose bits within elements.
pub fn untrans_bit_elem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    if let Err(e) = generic::check_mult_eight(size) {
        return e;
    }

    let mut tmp_buf = match super::scratch(size * elem_size) {
        Ok(buf) => buf,
        Err(e) => return e,
    };

    let count = trans_byte_bitrow(input, &mut tmp_buf, size, elem_size);
    if count < 0 {
        return count;
    }
    shuffle_bit_eightelem(&tmp_buf, output, size, elem_size)
}
