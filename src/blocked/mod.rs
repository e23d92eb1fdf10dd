//! Cache-blocked multiplication.
//!
//! The output is visited tile by tile instead of row by row. Only the
//! output dimensions are tiled; each cell still runs its dot product over
//! the whole reduction dimension. The rows of `left` and the columns of
//! `right` touched by one tile stay hot in cache while that tile is
//! computed.
//!
//! - `tiling`: block size, remainder policy and the block range iterator
//! - `tiled`: the blocked multiply itself

pub mod tiled;
pub mod tiling;

pub use tiled::{BlockedMultiplier, multiply_blocked, multiply_blocked_with};
pub use tiling::{BlockRanges, BlockSize, RemainderPolicy};
