// Sentinel codes returned by the i64 core routines. Success is a byte count
// (>= 0); failures are negative. The api module converts them to Result.

pub const ERR_ALLOC: i64 = -1; /* scratch allocation failed, or no room left in the destination */
pub const ERR_SSE_UNAVAILABLE: i64 = -11; /* 16-byte kernel invoked in a build without SSE2 */
pub const ERR_AVX_UNAVAILABLE: i64 = -12; /* 32-byte kernel invoked in a build without AVX2 */
pub const ERR_SIZE_MULT8: i64 = -80; /* size or byte count not a multiple of 8 */
pub const ERR_BLOCK_SIZE: i64 = -81; /* block size not a positive multiple of 8 */
pub const ERR_LZ4_SIZE_MISMATCH: i64 = -91; /* decompressed length disagrees with the record header */

/// LZ4 failures are reported below this offset to keep them apart from the
/// filter's own codes.
pub const LZ4_ERROR_OFFSET: i64 = -1000;

pub const ERR_LZ4: i64 = LZ4_ERROR_OFFSET - 1; /* the codec rejected the data */
