//! Data model for phylogenetic trees as produced by tree-building programs.
//!
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either a `Root`, `Internal`, or `Leaf`,
//! referenced by [VertexIndex]. Vertices may have any number of children.

pub mod tree;
pub mod vertex;

pub use tree::{Tree, VertexIndex};
pub use vertex::{BranchLength, Vertex};
