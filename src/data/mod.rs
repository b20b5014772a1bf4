//! Attribute storage: block-chunked columns, row-managing containers and
//! typed handlers.

pub mod container;
pub mod handler;
pub(crate) mod hole_block;
pub mod multi_vector;

mod _debug_invariants;

pub use container::AttributeContainer;
pub use handler::{
    AttributeHandler, DartAttribute, EdgeAttribute, FaceAttribute, VertexAttribute,
    VolumeAttribute,
};
pub use multi_vector::{AttributeMultiVector, AttributeMultiVectorGen, AttributeValue, BLOCK_SIZE};
