//! Bit-elem transpose kernels and the build-time driver.
//!
//! Three interchangeable realizations exist: scalar (`generic`), 16-byte
//! vectors (`sse2`) and 32-byte vectors (`avx2`). Selection is fixed when
//! the crate is compiled; build with `-C target-feature=+avx2` for the
//! widest kernels. All three produce bit-identical output.

pub mod generic;

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
pub mod sse2;

#[cfg(all(target_arch = "x86_64", target_feature = "sse2", target_feature = "avx2"))]
pub mod avx2;

/// Stubs reporting that the instruction set is absent from this build. The
/// driver never routes here; they exist so defensive tests can observe the
/// sentinel.
#[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
pub mod sse2 {
    use crate::errors::ERR_SSE_UNAVAILABLE;

    fn unavailable() -> i64 {
        tracing::error!("16-byte kernel invoked in a build without sse2");
        ERR_SSE_UNAVAILABLE
    }

    pub fn trans_byte_elem_16(_input: &[u8], _output: &mut [u8], _size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_byte_elem_32(_input: &[u8], _output: &mut [u8], _size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_byte_elem_64(_input: &[u8], _output: &mut [u8], _size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_byte_elem(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_bit_byte(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_bit_elem(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_byte_bitrow(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn shuffle_bit_eightelem(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn untrans_bit_elem(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }
}

#[cfg(not(all(target_arch = "x86_64", target_feature = "sse2", target_feature = "avx2")))]
pub mod avx2 {
    use crate::errors::ERR_AVX_UNAVAILABLE;

    fn unavailable() -> i64 {
        tracing::error!("32-byte kernel invoked in a build without avx2");
        ERR_AVX_UNAVAILABLE
    }

    pub fn trans_bit_byte(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_bit_elem(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn trans_byte_bitrow(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn shuffle_bit_eightelem(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }

    pub fn untrans_bit_elem(_input: &[u8], _output: &mut [u8], _size: usize, _elem_size: usize) -> i64 {
        unavailable()
    }
}

use crate::errors::ERR_ALLOC;

/// Whether this build routes through the 16-byte kernels.
pub fn using_sse2() -> bool {
    cfg!(all(target_arch = "x86_64", target_feature = "sse2"))
}

/// Whether this build routes through the 32-byte kernels.
pub fn using_avx2() -> bool {
    cfg!(all(target_arch = "x86_64", target_feature = "sse2", target_feature = "avx2"))
}

/// Fallible scratch allocation, so exhaustion surfaces as a sentinel instead
/// of an abort.
pub(crate) fn scratch(nbyte: usize) -> Result<Vec<u8>, i64> {
    let mut buf = Vec::new();
    if buf.try_reserve_exact(nbyte).is_err() {
        return Err(ERR_ALLOC);
    }
    buf.resize(nbyte, 0);
    Ok(buf)
}

/// Transpose bits within elements with the widest kernels in this build.
///
/// Requires `size` to be a multiple of 8; `output` must not alias `input`
/// (guaranteed by the borrow rules).
pub fn trans_bit_elem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    #[cfg(all(target_arch = "x86_64", target_feature = "sse2", target_feature = "avx2"))]
    return avx2::trans_bit_elem(input, output, size, elem_size);

    #[cfg(all(target_arch = "x86_64", target_feature = "sse2", not(target_feature = "avx2")))]
    return sse2::trans_bit_elem(input, output, size, elem_size);

    #[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
    return generic::trans_bit_elem(input, output, size, elem_size);
}

/// Untranspose bits within elements with the widest kernels in this build.
pub fn untrans_bit_elem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) -> i64 {
    #[cfg(all(target_arch = "x86_64", target_feature = "sse2", target_feature = "avx2"))]
    return avx2::untrans_bit_elem(input, output, size, elem_size);

    #[cfg(all(target_arch = "x86_64", target_feature = "sse2", not(target_feature = "avx2")))]
    return sse2::untrans_bit_elem(input, output, size, elem_size);

    #[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
    return generic::untrans_bit_elem(input, output, size, elem_size);
}
