//! Every vector kernel must reproduce the scalar output bit for bit, on
//! aligned and unaligned buffers alike. Builds without an instruction set
//! must report it through the sentinel instead.

use bitshuf::shuffle::{using_avx2, using_sse2};

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
fn random_bytes(nbyte: usize, seed: u64) -> Vec<u8> {
    use rand::{RngCore, SeedableRng};

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut buf = vec![0u8; nbyte];
    rng.fill_bytes(&mut buf);
    buf
}

#[test]
fn test_capability_reporting_matches_build() {
    assert_eq!(
        using_sse2(),
        cfg!(all(target_arch = "x86_64", target_feature = "sse2"))
    );
    assert_eq!(
        using_avx2(),
        cfg!(all(target_arch = "x86_64", target_feature = "avx2"))
    );
    // The 32-byte kernels lean on the 16-byte ones.
    assert!(!using_avx2() || using_sse2());
}

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
mod sse2_equivalence {
    use super::random_bytes;
    use bitshuf::shuffle::{generic, sse2};

    type Kernel = fn(&[u8], &mut [u8], usize, usize) -> i64;

    const PAIRS: &[(&str, Kernel, Kernel)] = &[
        ("trans_byte_elem", generic::trans_byte_elem, sse2::trans_byte_elem),
        ("trans_bit_byte", generic::trans_bit_byte, sse2::trans_bit_byte),
        ("trans_bit_elem", generic::trans_bit_elem, sse2::trans_bit_elem),
        ("trans_byte_bitrow", generic::trans_byte_bitrow, sse2::trans_byte_bitrow),
        (
            "shuffle_bit_eightelem",
            generic::shuffle_bit_eightelem,
            sse2::shuffle_bit_eightelem,
        ),
        ("untrans_bit_elem", generic::untrans_bit_elem, sse2::untrans_bit_elem),
    ];

    fn compare(name: &str, scalar: Kernel, vector: Kernel, size: usize, elem_size: usize) {
        let nbyte = size * elem_size;
        // One spare byte so the same data can be replayed one byte off.
        let backing = random_bytes(nbyte + 1, (size * 31 + elem_size) as u64);

        for offset in [0usize, 1] {
            let input = &backing[offset..offset + nbyte];
            let mut expected = vec![0u8; nbyte];
            let mut actual = vec![0u8; nbyte];

            let scalar_count = scalar(input, &mut expected, size, elem_size);
            let vector_count = vector(input, &mut actual, size, elem_size);

            assert_eq!(
                scalar_count, vector_count,
                "{}: count mismatch (size={} elem_size={} offset={})",
                name, size, elem_size, offset
            );
            assert_eq!(
                expected, actual,
                "{}: output mismatch (size={} elem_size={} offset={})",
                name, size, elem_size, offset
            );
        }
    }

    #[test]
    fn test_sse2_kernels_match_scalar() {
        for &(name, scalar, vector) in PAIRS {
            // Sizes straddling the 16-element unroll, element sizes covering
            // the specializations, the scalar fallback, and both
            // hierarchical branches.
            for &size in &[8usize, 16, 24, 128, 136, 2048] {
                for &elem_size in &[1usize, 2, 3, 4, 5, 6, 7, 8, 11, 12, 16, 24, 64] {
                    compare(name, scalar, vector, size, elem_size);
                }
            }
        }
    }

    #[test]
    fn test_sized_byte_transposes_match_scalar() {
        for &size in &[8usize, 16, 31, 48, 1024] {
            for (elem_size, kernel) in [
                (2usize, sse2::trans_byte_elem_16 as fn(&[u8], &mut [u8], usize) -> i64),
                (4, sse2::trans_byte_elem_32),
                (8, sse2::trans_byte_elem_64),
            ] {
                let nbyte = size * elem_size;
                let input = random_bytes(nbyte, size as u64);
                let mut expected = vec![0u8; nbyte];
                let mut actual = vec![0u8; nbyte];

                generic::trans_byte_elem(&input, &mut expected, size, elem_size);
                kernel(&input, &mut actual, size);

                assert_eq!(expected, actual, "elem_size={} size={}", elem_size, size);
            }
        }
    }
}

#[cfg(all(target_arch = "x86_64", target_feature = "sse2", target_feature = "avx2"))]
mod avx2_equivalence {
    use super::random_bytes;
    use bitshuf::shuffle::{avx2, generic};

    type Kernel = fn(&[u8], &mut [u8], usize, usize) -> i64;

    const PAIRS: &[(&str, Kernel, Kernel)] = &[
        ("trans_bit_byte", generic::trans_bit_byte, avx2::trans_bit_byte),
        ("trans_bit_elem", generic::trans_bit_elem, avx2::trans_bit_elem),
        ("trans_byte_bitrow", generic::trans_byte_bitrow, avx2::trans_byte_bitrow),
        (
            "shuffle_bit_eightelem",
            generic::shuffle_bit_eightelem,
            avx2::shuffle_bit_eightelem,
        ),
        ("untrans_bit_elem", generic::untrans_bit_elem, avx2::untrans_bit_elem),
    ];

    #[test]
    fn test_avx2_kernels_match_scalar() {
        for &(name, scalar, vector) in PAIRS {
            // Sizes straddling the 32-byte unroll and both fallback edges.
            for &size in &[8usize, 16, 32, 256, 264, 2048] {
                for &elem_size in &[1usize, 2, 3, 4, 5, 7, 8, 12, 16, 64] {
                    let nbyte = size * elem_size;
                    let backing = random_bytes(nbyte + 1, (size * 17 + elem_size) as u64);

                    for offset in [0usize, 1] {
                        let input = &backing[offset..offset + nbyte];
                        let mut expected = vec![0u8; nbyte];
                        let mut actual = vec![0u8; nbyte];

                        let scalar_count = scalar(input, &mut expected, size, elem_size);
                        let vector_count = vector(input, &mut actual, size, elem_size);

                        assert_eq!(scalar_count, vector_count, "{}: count mismatch", name);
                        assert_eq!(
                            expected, actual,
                            "{}: output mismatch (size={} elem_size={} offset={})",
                            name, size, elem_size, offset
                        );
                    }
                }
            }
        }
    }
}

#[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
mod sse2_stubs {
    use bitshuf::errors::ERR_SSE_UNAVAILABLE;
    use bitshuf::shuffle::sse2;

    #[test]
    fn test_sse2_stubs_report_unavailable() {
        let input = vec![0u8; 64];
        let mut output = vec![0u8; 64];
        assert_eq!(sse2::trans_bit_elem(&input, &mut output, 16, 4), ERR_SSE_UNAVAILABLE);
        assert_eq!(sse2::untrans_bit_elem(&input, &mut output, 16, 4), ERR_SSE_UNAVAILABLE);
    }
}

#[cfg(not(all(target_arch = "x86_64", target_feature = "sse2", target_feature = "avx2")))]
mod avx2_stubs {
    use bitshuf::errors::ERR_AVX_UNAVAILABLE;
    use bitshuf::shuffle::avx2;

    #[test]
    fn test_avx2_stubs_report_unavailable() {
        let input = vec![0u8; 64];
        let mut output = vec![0u8; 64];
        assert_eq!(avx2::trans_bit_elem(&input, &mut output, 16, 4), ERR_AVX_UNAVAILABLE);
        assert_eq!(avx2::untrans_bit_elem(&input, &mut output, 16, 4), ERR_AVX_UNAVAILABLE);
    }
}
