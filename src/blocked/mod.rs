//! Blocked application of per-block workers to whole buffers.
//!
//! A buffer of `size` elements splits into full blocks of `block_size`
//! elements, one partial block rounded down to a multiple of eight, and up
//! to seven leftover elements that pass through verbatim. Workers pull their
//! ranges from an [`iochain::IocChain`], so the byte layout of the output is
//! a pure function of the inputs regardless of how the loop is driven.

pub mod iochain;
pub mod lz4;

use crate::errors::{ERR_BLOCK_SIZE, ERR_LZ4};
use crate::shuffle;
use iochain::IocChain;

/// Lower limit for the recommended block size, in elements.
pub const MIN_RECOMMEND_BLOCK: usize = 128;
/// Block sizes must be a multiple of this.
pub const BLOCKED_MULT: usize = 8;
/// The default block size targets roughly this many bytes per block.
pub const TARGET_BLOCK_SIZE_BYTES: usize = 8192;

/// Per-block worker. Pulls its ranges from the chain, processes `size`
/// elements of `elem_size` bytes, and returns the bytes it produced.
pub(crate) type BlockFn = fn(&IocChain, &[u8], &mut [u8], usize, usize) -> i64;

/// Recommended block size for a positive element size, in elements.
///
/// This function needs to be absolutely stable between versions; streams
/// encoded with the default block size are only decodable because both ends
/// compute the same value from `elem_size` alone.
///
/// # Panics
/// Panics if `elem_size` is zero.
pub fn default_block_size(elem_size: usize) -> usize {
    let block_size = TARGET_BLOCK_SIZE_BYTES / elem_size / BLOCKED_MULT * BLOCKED_MULT;
    block_size.max(MIN_RECOMMEND_BLOCK)
}

pub(crate) fn resolve_block_size(block_size: usize, elem_size: usize) -> Result<usize, i64> {
    // No block size can be derived for zero-size elements.
    if elem_size == 0 {
        return Err(ERR_BLOCK_SIZE);
    }
    let block_size = if block_size == 0 {
        default_block_size(elem_size)
    } else {
        block_size
    };
    if block_size % BLOCKED_MULT != 0 {
        return Err(ERR_BLOCK_SIZE);
    }
    Ok(block_size)
}

/// Wrap a per-block worker to process an entire buffer: full blocks first,
/// then the rounded-down partial block, then the verbatim leftover copy.
/// Returns the cumulative byte count or the first error a worker reported.
pub(crate) fn blocked_wrap(
    fun: BlockFn,
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    block_size: usize,
) -> i64 {
    let block_size = match resolve_block_size(block_size, elem_size) {
        Ok(resolved) => resolved,
        Err(e) => return e,
    };

    let chain = IocChain::new();
    let mut err: i64 = 0;
    let mut cum_count: i64 = 0;

    for _ in 0..size / block_size {
        let count = fun(&chain, input, output, block_size, elem_size);
        if count < 0 && err == 0 {
            err = count;
        }
        cum_count += count;
    }

    let last_block_size = size % block_size / BLOCKED_MULT * BLOCKED_MULT;
    if last_block_size > 0 {
        let count = fun(&chain, input, output, last_block_size, elem_size);
        if count < 0 && err == 0 {
            err = count;
        }
        cum_count += count;
    }

    if err < 0 {
        tracing::trace!(code = err, "block worker failed");
        return err;
    }

    // Elements not filling an eight-element group pass through unshuffled.
    let leftover_bytes = size % BLOCKED_MULT * elem_size;
    let in_off = chain.get_in().advance(leftover_bytes);
    let out_off = chain.get_out().advance(leftover_bytes);
    // A truncated compressed stream can end inside the verbatim tail.
    if in_off + leftover_bytes > input.len() {
        return ERR_LZ4;
    }
    output[out_off..out_off + leftover_bytes]
        .copy_from_slice(&input[in_off..in_off + leftover_bytes]);

    cum_count + leftover_bytes as i64
}

/// Bitshuffle a single block.
fn bitshuffle_block(
    chain: &IocChain,
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
) -> i64 {
    let nbyte = size * elem_size;
    let in_off = chain.get_in().advance(nbyte);
    let out_off = chain.get_out().advance(nbyte);

    shuffle::trans_bit_elem(
        &input[in_off..in_off + nbyte],
        &mut output[out_off..out_off + nbyte],
        size,
        elem_size,
    )
}

/// Bitunshuffle a single block.
fn bitunshuffle_block(
    chain: &IocChain,
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
) -> i64 {
    let nbyte = size * elem_size;
    let in_off = chain.get_in().advance(nbyte);
    let out_off = chain.get_out().advance(nbyte);

    shuffle::untrans_bit_elem(
        &input[in_off..in_off + nbyte],
        &mut output[out_off..out_off + nbyte],
        size,
        elem_size,
    )
}

/// Bitshuffle an entire buffer, block by block.
pub fn bitshuffle(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    block_size: usize,
) -> i64 {
    blocked_wrap(bitshuffle_block, input, output, size, elem_size, block_size)
}

/// Undo [`bitshuffle`], block by block.
pub fn bitunshuffle(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    block_size: usize,
) -> i64 {
    blocked_wrap(bitunshuffle_block, input, output, size, elem_size, block_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_size_is_a_stable_multiple_of_eight() {
        assert_eq!(default_block_size(1), 8192);
        assert_eq!(default_block_size(2), 4096);
        assert_eq!(default_block_size(4), 2048);
        assert_eq!(default_block_size(8), 1024);
        // Small quotients round down to a multiple of 8 and clamp at 128.
        assert_eq!(default_block_size(100), 128);
        for elem_size in 1..=256 {
            let block = default_block_size(elem_size);
            assert_eq!(block % BLOCKED_MULT, 0, "elem_size={}", elem_size);
            assert!(block >= MIN_RECOMMEND_BLOCK, "elem_size={}", elem_size);
        }
    }

    #[test]
    fn block_size_resolution_rejects_bad_inputs() {
        assert_eq!(resolve_block_size(12, 4), Err(ERR_BLOCK_SIZE));
        assert_eq!(resolve_block_size(0, 0), Err(ERR_BLOCK_SIZE));
        assert_eq!(resolve_block_size(0, 4), Ok(2048));
        assert_eq!(resolve_block_size(64, 4), Ok(64));
    }
}
