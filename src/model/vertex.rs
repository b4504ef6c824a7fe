//! Vertex types of the tree arena.

use crate::model::tree::VertexIndex;
use std::ops::Deref;

/// During construction, Internal and Leaf vertex might not have parent set yet.
const NO_PARENT_SET: VertexIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has children, no parent, optional name and branch length
/// - **Internal**: Has parent and children, optional name (e.g. a support
///   value written after the closing parenthesis) and branch length
/// - **Leaf**: Has parent and label, might have branch length
///
/// Trees written by tree-building programs are often unrooted and drawn with a
/// trifurcating root, so vertices hold any positive number of children.
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Root vertex of the tree
    Root {
        index: VertexIndex,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    },
    /// Internal vertex
    Internal {
        index: VertexIndex,
        parent: VertexIndex,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    },
    /// Leaf vertex
    Leaf {
        index: VertexIndex,
        parent: VertexIndex,
        label: String,
        branch_length: Option<BranchLength>,
    },
}

impl Vertex {
    /// Creates a new root vertex.
    pub fn new_root(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Root {
            index,
            children,
            name,
            branch_length,
        }
    }

    /// Creates a new internal (non-leaf, non-root) vertex.
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: NO_PARENT_SET,
            children,
            name,
            branch_length,
        }
    }

    /// Creates a new leaf vertex.
    pub fn new_leaf(index: VertexIndex, branch_length: Option<BranchLength>, label: String) -> Self {
        Vertex::Leaf {
            index,
            parent: NO_PARENT_SET,
            label,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. }
            | Vertex::Internal { index, .. }
            | Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns the length of the incoming branch, if one was given.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Returns the branch length as plain number, treating a missing length as `0.0`.
    pub fn branch_length_or_zero(&self) -> f64 {
        self.branch_length().map_or(0.0, |bl| *bl)
    }

    /// Returns the label if this is a leaf, else `None`.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Leaf { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Returns the name of a root or internal vertex, if present.
    pub fn name(&self) -> Option<&str> {
        match self {
            Vertex::Root { name, .. } | Vertex::Internal { name, .. } => name.as_deref(),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is a root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Returns the children of a root or internal vertex; empty for a leaf.
    pub fn children(&self) -> &[VertexIndex] {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => &[],
        }
    }

    /// Sets new parent for non-root vertex.
    ///
    /// # Panics
    /// Panics if called on root.
    pub fn set_parent(&mut self, parent: VertexIndex) {
        match self {
            Vertex::Root { .. } => panic!("Cannot set parent on root vertex"),
            Vertex::Internal { parent: p, .. } | Vertex::Leaf { parent: p, .. } => *p = parent,
        }
    }

    /// Returns the index of parent if this a non-root vertex with parent set, else `None`.
    pub fn parent_index(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                (*parent != NO_PARENT_SET).then_some(*parent)
            }
            Vertex::Root { .. } => None,
        }
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, guaranteed finite.
///
/// Negative values are accepted: neighbor-joining can produce them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length, or `None` if `length` is not finite.
    pub fn new(length: f64) -> Option<Self> {
        length.is_finite().then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}
