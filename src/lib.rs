//! Bitshuffle filter with a blocked LZ4 container.
//!
//! Bitshuffling gathers the k-th bit of every element into the k-th
//! bit-plane of the output. For slowly varying typed data (floats, counters,
//! sensor words) the resulting bit-planes are long monotone runs that
//! byte-oriented coders such as LZ4 compress far better than the original
//! layout. The permutation is strictly invertible.

pub mod api;
pub mod blocked;
pub mod errors;
pub mod shuffle;

pub use api::*;
pub use errors::*;
