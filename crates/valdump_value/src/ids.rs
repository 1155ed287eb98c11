//! Index newtypes for heap storage and interned types.
//!
//! Every handle is a 32-bit index into one of the [`Heap`](crate::Heap)
//! arenas (or the [`TypeTable`](crate::TypeTable) for [`TypeId`]). Handles
//! are allocated sequentially starting from 0 and never reused.

use std::fmt;

macro_rules! index_newtype {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a handle from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[expect(
                clippy::cast_possible_truncation,
                reason = "arenas are bounded well below u32::MAX entries"
            )]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

index_newtype!(
    /// An addressable heap slot holding one typed value (a "variable").
    SlotId,
    "slot"
);

index_newtype!(
    /// The shared backing storage of one or more slices.
    BlockId,
    "block"
);

index_newtype!(
    /// A map's storage. Map entries are not addressable.
    MapId,
    "map"
);

index_newtype!(
    /// A function value's code identity.
    FuncId,
    "func"
);

index_newtype!(
    /// A channel's storage.
    ChanId,
    "chan"
);

index_newtype!(
    /// A type interned in the [`TypeTable`](crate::TypeTable).
    ///
    /// Types are compared by index equality, never structurally.
    TypeId,
    "type"
);

impl TypeId {
    /// `bool`
    pub const BOOL: Self = Self(0);
    /// `int` (64-bit signed)
    pub const INT: Self = Self(1);
    /// `int8`
    pub const INT8: Self = Self(2);
    /// `int16`
    pub const INT16: Self = Self(3);
    /// `int32`
    pub const INT32: Self = Self(4);
    /// `int64`
    pub const INT64: Self = Self(5);
    /// `uint` (64-bit unsigned)
    pub const UINT: Self = Self(6);
    /// `uint8`
    pub const UINT8: Self = Self(7);
    /// `uint16`
    pub const UINT16: Self = Self(8);
    /// `uint32`
    pub const UINT32: Self = Self(9);
    /// `uint64`
    pub const UINT64: Self = Self(10);
    /// `float32`
    pub const FLOAT32: Self = Self(11);
    /// `float64`
    pub const FLOAT64: Self = Self(12);
    /// `string`
    pub const STRING: Self = Self(13);
    /// The empty interface, printed as `any`.
    pub const ANY: Self = Self(14);

    /// Number of pre-interned types.
    pub const PRIMITIVE_COUNT: u32 = 15;
}
