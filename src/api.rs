//! Public entry points.
//!
//! A thin `Result`-typed facade over the sentinel-returning core. Negative
//! codes are listed in [`crate::errors`]. All operations take `size` in
//! elements and `block_size` in elements; pass `block_size = 0` for the
//! stable default. Input and output cannot alias (enforced by the borrow
//! rules).

use crate::blocked;
use crate::blocked::lz4;
use crate::shuffle;

pub use crate::blocked::default_block_size;
pub use crate::shuffle::{using_avx2, using_sse2};

fn check(count: i64) -> Result<usize, i64> {
    if count < 0 {
        Err(count)
    } else {
        Ok(count as usize)
    }
}

/// Bitshuffle the `size` elements of `input` into `output`, returning the
/// bytes written (`size * elem_size`). Elements past the last multiple of
/// eight are copied through verbatim.
///
/// # Panics
/// Panics if `input` or `output` is shorter than `size * elem_size` bytes.
pub fn bitshuffle(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    block_size: usize,
) -> Result<usize, i64> {
    check(blocked::bitshuffle(input, output, size, elem_size, block_size))
}

/// Undo [`bitshuffle`] with the same `size`, `elem_size`, and `block_size`.
///
/// # Panics
/// Panics if `input` or `output` is shorter than `size * elem_size` bytes.
pub fn bitunshuffle(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    block_size: usize,
) -> Result<usize, i64> {
    check(blocked::bitunshuffle(input, output, size, elem_size, block_size))
}

/// Bitshuffle and LZ4-compress `input` into `output`, returning the exact
/// compressed size. Size `output` with [`compress_bound`].
pub fn compress_lz4(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    block_size: usize,
) -> Result<usize, i64> {
    check(lz4::compress_lz4(input, output, size, elem_size, block_size))
}

/// Decompress and bitunshuffle a stream produced by [`compress_lz4`] with
/// the same parameters. Writes `size * elem_size` bytes to `output` and
/// returns the bytes consumed from `input`.
///
/// # Panics
/// Panics if `output` is shorter than `size * elem_size` bytes.
pub fn decompress_lz4(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    block_size: usize,
) -> Result<usize, i64> {
    check(lz4::decompress_lz4(input, output, size, elem_size, block_size))
}

/// Upper bound on the size of [`compress_lz4`] output for these parameters.
pub fn compress_bound(size: usize, elem_size: usize, block_size: usize) -> Result<usize, i64> {
    check(lz4::compress_bound(size, elem_size, block_size))
}

/// Bitshuffle a single region whose `size` is a multiple of eight, without
/// the block framework. Fails with [`crate::errors::ERR_SIZE_MULT8`]
/// otherwise.
pub fn bitshuffle_raw(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
) -> Result<usize, i64> {
    check(shuffle::trans_bit_elem(input, output, size, elem_size))
}

/// Inverse of [`bitshuffle_raw`].
pub fn bitunshuffle_raw(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
) -> Result<usize, i64> {
    check(shuffle::untrans_bit_elem(input, output, size, elem_size))
}
