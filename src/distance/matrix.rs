use crate::model::{Tree, VertexIndex};

/// Symmetric matrix of path lengths between the leaves of a [Tree].
///
/// Leaves are ordered as in [Tree::leaves], i.e. as they appear in the
/// Newick string. The distance of two leaves is the sum of branch lengths
/// on the path connecting them; missing branch lengths count as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<String>,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes all leaf-to-leaf distances of `tree`.
    ///
    /// Runs one traversal of the unrooted tree per leaf, so the cost is
    /// O(leaves * vertices).
    pub fn from_tree(tree: &Tree) -> Self {
        let n = tree.num_vertices();
        let leaves: Vec<VertexIndex> = tree.leaves().map(|v| v.index()).collect();
        let labels = leaves
            .iter()
            .map(|&leaf| tree[leaf].label().unwrap_or_default().to_string())
            .collect();

        // Undirected adjacency, edge weight is the branch length of the lower vertex
        let mut neighbours: Vec<Vec<(VertexIndex, f64)>> = vec![Vec::new(); n];
        for vertex in tree.pre_order_iter() {
            for &child in vertex.children() {
                let length = tree[child].branch_length_or_zero();
                neighbours[vertex.index()].push((child, length));
                neighbours[child].push((vertex.index(), length));
            }
        }

        let mut distances = vec![0.0; leaves.len() * leaves.len()];
        let mut from_source = vec![0.0; n];
        let mut visited = vec![false; n];
        let mut stack = Vec::new();

        for (row, &source) in leaves.iter().enumerate() {
            visited.fill(false);
            from_source[source] = 0.0;
            visited[source] = true;
            stack.push(source);

            while let Some(current) = stack.pop() {
                for &(next, length) in &neighbours[current] {
                    if !visited[next] {
                        visited[next] = true;
                        from_source[next] = from_source[current] + length;
                        stack.push(next);
                    }
                }
            }

            for (col, &target) in leaves.iter().enumerate() {
                distances[row * leaves.len() + col] = from_source[target];
            }
        }

        Self { labels, distances }
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Leaf labels in matrix order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distance between leaves `i` and `j`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.len() && j < self.len(), "leaf index out of bounds");
        self.distances[i * self.len() + j]
    }

    /// Distances from leaf `i` to all leaves, itself included.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.distances[i * self.len()..(i + 1) * self.len()]
    }
}
