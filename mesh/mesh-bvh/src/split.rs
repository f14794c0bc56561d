//! Node split strategies.

use mesh_types::{Aabb, Triangle};

/// Where a node's elements are divided between its two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Axis the elements were ordered along (0 = X, 1 = Y, 2 = Z).
    pub axis: usize,
    /// Index of the first element of the right child.
    pub mid: usize,
}

/// Decides how an internal node divides its elements.
///
/// Implementations may reorder `elements` in place; the builder then gives
/// `elements[..mid]` to the left child and `elements[mid..]` to the right.
/// A returned `mid` outside `1..elements.len()` is clamped into that range so
/// that both children are non-empty.
pub trait SplitStrategy {
    /// Order `elements` and choose the split point.
    ///
    /// Called only with at least two elements; `bounds` is their tight union.
    fn split(&self, bounds: &Aabb, elements: &mut [Triangle]) -> Split;
}

/// Split at the median centroid along the longest axis of the node bounds.
///
/// Elements are stably sorted by centroid coordinate, so equal keys keep their
/// input order and the resulting tree is fully deterministic. Depth is
/// `O(log n)` by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestAxisMedian;

impl SplitStrategy for LongestAxisMedian {
    fn split(&self, bounds: &Aabb, elements: &mut [Triangle]) -> Split {
        let axis = bounds.longest_axis();
        elements.sort_by(|a, b| a.centroid()[axis].total_cmp(&b.centroid()[axis]));
        Split {
            axis,
            mid: (elements.len() / 2).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::MeshBounds;

    fn tri_at(x: f64, y: f64) -> Triangle {
        Triangle::from_arrays([x, y, 0.0], [x + 0.5, y, 0.0], [x, y + 0.5, 0.0])
    }

    #[test]
    fn median_split_sorts_along_longest_axis() {
        let mut elements = vec![tri_at(3.0, 0.0), tri_at(0.0, 0.5), tri_at(2.0, 0.2), tri_at(1.0, 0.1)];
        let bounds = elements.bounds();

        let split = LongestAxisMedian.split(&bounds, &mut elements);
        assert_eq!(split, Split { axis: 0, mid: 2 });

        let xs: Vec<f64> = elements.iter().map(|t| t.v0().x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn median_split_is_stable_for_equal_keys() {
        let a = tri_at(0.0, 0.0);
        let b = tri_at(0.0, 5.0).reversed();
        let c = tri_at(0.0, 5.0);
        let mut elements = vec![a, b.clone(), c.clone()];
        // Longest axis is Y; b and c share a centroid and must keep their order
        let bounds = elements.bounds();
        let split = LongestAxisMedian.split(&bounds, &mut elements);
        assert_eq!(split.axis, 1);
        assert_eq!(split.mid, 1);
        assert_eq!(elements[1], b);
        assert_eq!(elements[2], c);
    }
}
