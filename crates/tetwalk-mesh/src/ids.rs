//! Dense integer handles into the mesh arenas.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of this record in its arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Handle for arena slot `index`, if it fits in 32 bits.
            #[inline]
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index).ok().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Handle of a mesh node.
    NodeId
);
define_id!(
    /// Handle of a triangular face.
    FaceId
);
define_id!(
    /// Handle of a tetrahedron.
    TetId
);
define_id!(
    /// Handle of an edge.
    EdgeId
);
