//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub`, but
//! callers should prefer the `.index()` helper when indexing a `Vec`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identity of a train.  Used as a label in events and snapshots and as
    /// the holder tag recorded inside a segment.
    pub struct TrainId(u32);
}

typed_id! {
    /// Index of a segment in the ring, `0..segment_count`.
    pub struct SegmentId(u32);
}

impl SegmentId {
    /// The segment after `self` on a ring of `count` segments.
    #[inline]
    pub fn next(self, count: usize) -> SegmentId {
        SegmentId(((self.index() + 1) % count) as u32)
    }

    /// The segment before `self` on a ring of `count` segments.
    #[inline]
    pub fn prev(self, count: usize) -> SegmentId {
        SegmentId(((self.index() + count - 1) % count) as u32)
    }
}
