//! The shuffled bit layout itself, checked against a naive bit-gather model
//! and against hand-computed planes.

use bitshuf::api::{bitshuffle, bitshuffle_raw, bitunshuffle};

/// Reference model: bit k of element i (bit k%8 of byte k/8) lands at bit
/// position k * size + i of the output stream.
fn naive_bitshuffle(input: &[u8], size: usize, elem_size: usize) -> Vec<u8> {
    let mut out = vec![0u8; input.len()];
    for k in 0..8 * elem_size {
        for i in 0..size {
            let bit = (input[i * elem_size + k / 8] >> (k % 8)) & 1;
            let pos = k * size + i;
            out[pos / 8] |= bit << (pos % 8);
        }
    }
    out
}

#[test]
fn test_eight_byte_elements_shuffle_to_known_planes() {
    // Eight single-byte elements 0..8: plane k packs bit k of each element,
    // element index fastest.
    let input: Vec<u8> = (0u8..8).collect();
    let mut output = vec![0u8; 8];
    bitshuffle_raw(&input, &mut output, 8, 1).expect("shuffle failed");
    assert_eq!(output, [0xAA, 0xCC, 0xF0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_low_bit_planes_of_u32_counters() {
    // Sixteen u32 values 0..16, little endian. The first two output bytes
    // are bit-plane 0: the LSB of each element, eight per byte.
    let values: Vec<u32> = (0u32..16).collect();
    let input: &[u8] = bytemuck::cast_slice(&values);
    let mut output = vec![0u8; input.len()];
    bitshuffle_raw(input, &mut output, 16, 4).expect("shuffle failed");

    assert_eq!(&output[0..2], &[0xAA, 0xAA], "plane 0 should pack the LSBs");
    assert_eq!(&output[2..4], &[0xCC, 0xCC], "plane 1");
    assert_eq!(&output[4..6], &[0xF0, 0xF0], "plane 2");
    assert_eq!(&output[6..8], &[0x00, 0xFF], "plane 3");
    // Values are below 16, so every higher plane is empty.
    assert!(output[8..].iter().all(|&byte| byte == 0));
}

#[test]
fn test_matches_naive_model() {
    for &(size, elem_size) in &[(8usize, 1usize), (16, 4), (64, 3), (256, 8), (64, 12)] {
        let nbyte = size * elem_size;
        let input: Vec<u8> = (0..nbyte).map(|i| (i * 131 + 17) as u8).collect();
        let mut output = vec![0u8; nbyte];
        bitshuffle_raw(&input, &mut output, size, elem_size).expect("shuffle failed");

        assert_eq!(
            output,
            naive_bitshuffle(&input, size, elem_size),
            "bit layout mismatch for size={} elem_size={}",
            size,
            elem_size
        );
    }
}

#[test]
fn test_blocks_shuffle_independently() {
    // With an explicit block size, each block is a self-contained shuffle of
    // its own elements.
    let size = 64;
    let elem_size = 2;
    let block_size = 16;
    let nbyte = size * elem_size;
    let input: Vec<u8> = (0..nbyte).map(|i| (i * 37) as u8).collect();

    let mut whole = vec![0u8; nbyte];
    bitshuffle(&input, &mut whole, size, elem_size, block_size).expect("shuffle failed");

    for block in 0..size / block_size {
        let start = block * block_size * elem_size;
        let end = start + block_size * elem_size;
        let expected = naive_bitshuffle(&input[start..end], block_size, elem_size);
        assert_eq!(&whole[start..end], &expected[..], "block {}", block);
    }

    let mut recovered = vec![0u8; nbyte];
    bitunshuffle(&whole, &mut recovered, size, elem_size, block_size).expect("unshuffle failed");
    assert_eq!(recovered, input);
}
