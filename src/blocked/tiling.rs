use std::num::NonZeroUsize;
use std::ops::Range;

use crate::error::{MatmulError, Result};

/// Side length of one square output tile.
///
/// Independent of the matrix dimension: it need not divide N unless the
/// multiply is run with [`RemainderPolicy::RequireDivisible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockSize(NonZeroUsize);

impl BlockSize {
    /// Block size used by the tiled demo.
    pub const DEFAULT: Self = Self(NonZeroUsize::MIN.saturating_add(39));

    pub fn new(size: usize) -> Result<Self> {
        NonZeroUsize::new(size)
            .map(Self)
            .ok_or_else(|| MatmulError::invalid("block size must be > 0"))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What to do with the last, partial block when B does not divide N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainderPolicy {
    /// Clip the last block to `min(start + B, N)`.
    #[default]
    Clip,
    /// Reject any N that is not a multiple of B.
    RequireDivisible,
}

impl RemainderPolicy {
    pub fn check(self, dim: usize, block: BlockSize) -> Result<()> {
        match self {
            RemainderPolicy::Clip => Ok(()),
            RemainderPolicy::RequireDivisible if dim.is_multiple_of(block.get()) => Ok(()),
            RemainderPolicy::RequireDivisible => Err(MatmulError::invalid(format!(
                "block size {} does not divide dimension {}",
                block.get(),
                dim
            ))),
        }
    }
}

/// Iterator over the index ranges of consecutive blocks along one axis.
///
/// The last range is clipped at `total`.
#[derive(Debug, Clone)]
pub struct BlockRanges {
    total: usize,
    block: usize,
    current: usize,
}

impl BlockRanges {
    pub fn new(total: usize, block: BlockSize) -> Self {
        Self {
            total,
            block: block.get(),
            current: 0,
        }
    }
}

impl Iterator for BlockRanges {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total {
            return None;
        }

        let start = self.current;
        let end = (start + self.block).min(self.total);
        self.current = end;

        Some(start..end)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total - self.current.min(self.total)).div_ceil(self.block);
        (left, Some(left))
    }
}

impl ExactSizeIterator for BlockRanges {}
