//! Cell traversals over maps.
//!
//! Every traversor follows the `begin`/`next` protocol of [`Traversor`] and
//! can also be used as an iterator through [`Traversor::iter`].

pub mod selector;
pub mod traversal;
pub mod traversal_core;
pub mod traversor2;
pub mod traversor3;

pub use selector::{
    AllDarts, Selector, SelectorFalse, SelectorMarked, SelectorNoBoundary, SelectorTrue,
    SelectorUnmarked,
};
pub use traversal::{CellTraversal, TraversorCell, TraversorDartsOfOrbit, foreach_cell, nb_cells};
pub use traversal_core::{Traversor, TraversorIter};
pub use traversor2::{Incidence2, Traversor2, Traversor2Adjacent};
pub use traversor3::{MarkerSlot, Traversor3XXaY, Traversor3XY};
