//! 32-byte vector kernels.
//!
//! Compiled only when the build targets AVX2 on x86_64. The byte-transpose
//! stage stays on the 16-byte kernels (it is unpack-bound, not width-bound);
//! element sizes that do not divide by 4 fall back to the SSE2 kernels.

use std::arch::x86_64::*;

use super::{generic, sse2};

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
        while ii + 31 < nbyte {
            let mut ymm = _mm256_loadu_si256(in_b.add(ii) as *const __m256i);
            for kk in 0..8 {
                let bt = _mm256_movemask_epi8(ymm);
                ymm = _mm256_slli_epi16(ymm, 1);
                let out_ptr = out_b.add(((7 - kk) * nbyte + ii) / 8) as *mut i32;
                out_ptr.write_unaligned(bt);
            }
            ii += 32;
        }
    }
    generic::trans_bit_byte_remainder(input, output, size, elem_size, nbyte - nbyte % 32)
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

    let count = sse2::trans_byte_elem(input, output, size, elem_size);
    if count < 0 {
        return count;
    }
    let count = trans_bit_byte(output, &mut tmp_buf, size, elem_size);
    if count < 0 {
        return count;
    }
    generic::trans_bitrow_eight(&tmp_buf, output, size, elem_size)
}

/// For data organized into a row for each bit (8 * elem_size rows),
/// transpose the bytes.
pub fn trans_byte_bitrow(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    if let Err(e) = generic::check_mult_eight(size) {
        return e;
    }

    if elem_size % 4 != 0 {
        return sse2::trans_byte_bitrow(input, output, size, elem_size);
    }

    let nrows = 8 * elem_size;
    let nbyte_row = size / 8;
    debug_assert!(input.len() >= nrows * nbyte_row && output.len() >= nrows * nbyte_row);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut ymm_0 = [_mm256_setzero_si256(); 8];
        let mut ymm_1 = [_mm256_setzero_si256(); 8];
        let mut ymm_storage = [[_mm256_setzero_si256(); 4]; 8];

        let mut jj = 0;
        while jj + 31 < nbyte_row {
            let mut ii = 0;
            while ii + 3 < elem_size {
                for hh in 0..4 {
                    for kk in 0..8 {
                        ymm_0[kk] = _mm256_loadu_si256(
                            in_b.add((ii * 8 + hh * 8 + kk) * nbyte_row + jj) as *const __m256i,
                        );
                    }

                    for kk in 0..4 {
                        ymm_1[kk] = _mm256_unpacklo_epi8(ymm_0[kk * 2], ymm_0[kk * 2 + 1]);
                        ymm_1[kk + 4] = _mm256_unpackhi_epi8(ymm_0[kk * 2], ymm_0[kk * 2 + 1]);
                    }

                    for kk in 0..2 {
                        for mm in 0..2 {
                            ymm_0[kk * 4 + mm] = _mm256_unpacklo_epi16(
                                ymm_1[kk * 4 + mm * 2],
                                ymm_1[kk * 4 + mm * 2 + 1],
                            );
                            ymm_0[kk * 4 + mm + 2] = _mm256_unpackhi_epi16(
                                ymm_1[kk * 4 + mm * 2],
                                ymm_1[kk * 4 + mm * 2 + 1],
                            );
                        }
                    }

                    for kk in 0..4 {
                        ymm_1[kk * 2] = _mm256_unpacklo_epi32(ymm_0[kk * 2], ymm_0[kk * 2 + 1]);
                        ymm_1[kk * 2 + 1] = _mm256_unpackhi_epi32(ymm_0[kk * 2], ymm_0[kk * 2 + 1]);
                    }

                    for kk in 0..8 {
                        ymm_storage[kk][hh] = ymm_1[kk];
                    }
                }

                for mm in 0..8 {
                    for kk in 0..4 {
                        ymm_0[kk] = ymm_storage[mm][kk];
                    }

                    ymm_1[0] = _mm256_unpacklo_epi64(ymm_0[0], ymm_0[1]);
                    ymm_1[1] = _mm256_unpacklo_epi64(ymm_0[2], ymm_0[3]);
                    ymm_1[2] = _mm256_unpackhi_epi64(ymm_0[0], ymm_0[1]);
                    ymm_1[3] = _mm256_unpackhi_epi64(ymm_0[2], ymm_0[3]);

                    // Cross the 128-bit lane boundary the unpacks cannot.
                    ymm_0[0] = _mm256_permute2x128_si256(ymm_1[0], ymm_1[1], 32);
                    ymm_0[1] = _mm256_permute2x128_si256(ymm_1[2], ymm_1[3], 32);
                    ymm_0[2] = _mm256_permute2x128_si256(ymm_1[0], ymm_1[1], 49);
                    ymm_0[3] = _mm256_permute2x128_si256(ymm_1[2], ymm_1[3], 49);

                    _mm256_storeu_si256(
                        out_b.add((jj + mm * 2) * nrows + ii * 8) as *mut __m256i,
                        ymm_0[0],
                    );
                    _mm256_storeu_si256(
                        out_b.add((jj + mm * 2 + 1) * nrows + ii * 8) as *mut __m256i,
                        ymm_0[1],
                    );
                    _mm256_storeu_si256(
                        out_b.add((jj + mm * 2 + 16) * nrows + ii * 8) as *mut __m256i,
                        ymm_0[2],
                    );
                    _mm256_storeu_si256(
                        out_b.add((jj + mm * 2 + 16 + 1) * nrows + ii * 8) as *mut __m256i,
                        ymm_0[3],
                    );
                }
                ii += 4;
            }
            jj += 32;
        }
    }

    for ii in 0..nrows {
        for jj in (nbyte_row - nbyte_row % 32)..nbyte_row {
            output[jj * nrows + ii] = input[ii * nbyte_row + jj];
        }
    }
    (size * elem_size) as i64
}

/// Shuffle bits within the bytes of eight-element groups.
pub fn shuffle_bit_eightelem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    if let Err(e) = generic::check_mult_eight(size) {
        return e;
    }

    if elem_size % 4 != 0 {
        return sse2::shuffle_bit_eightelem(input, output, size, elem_size);
    }

    let nbyte = elem_size * size;
    debug_assert!(input.len() >= nbyte && output.len() >= nbyte);

    unsafe {
        let in_b = input.as_ptr();
        let out_b = output.as_mut_ptr();

        let mut jj = 0;
        while jj + 31 < 8 * elem_size {
            let mut ii = 0;
            while ii + 8 * elem_size <= nbyte {
                let mut ymm = _mm256_loadu_si256(in_b.add(ii + jj) as *const __m256i);
                for kk in 0..8 {
                    let bt = _mm256_movemask_epi8(ymm);
                    ymm = _mm256_slli_epi16(ymm, 1);
                    let ind = ii + jj / 8 + (7 - kk) * elem_size;
                    (out_b.add(ind) as *mut i32).write_unaligned(bt);
                }
                ii += 8 * elem_size;
            }
            jj += 32;
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
