//! Two-dimensional KD-tree for k-nearest-site queries during interpolation.
//!
//! Nodes live in a flat vector; children are indices into it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Node {
    point: [f64; 2],
    id: usize,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, PartialEq)]
struct Neighbour {
    distance_sq: f64,
    id: usize,
}

impl Eq for Neighbour {}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbour {
    // max-heap on distance, ties broken by id so queries are deterministic
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_sq
            .partial_cmp(&other.distance_sq)
            .unwrap_or(Ordering::Equal)
            .then(self.id.cmp(&other.id))
    }
}

#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree {
    /// Build from points; query results refer to positions in `points`.
    pub fn new(points: &[[f64; 2]]) -> Self {
        let mut items: Vec<([f64; 2], usize)> = points.iter().copied().zip(0..).collect();
        let mut tree = Self { nodes: Vec::with_capacity(points.len()), root: None };
        tree.root = tree.build(&mut items, 0);
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn build(&mut self, items: &mut [([f64; 2], usize)], depth: usize) -> Option<usize> {
        if items.is_empty() {
            return None;
        }
        let axis = depth % 2;
        items.sort_by(|a, b| a.0[axis].partial_cmp(&b.0[axis]).unwrap_or(Ordering::Equal));
        let mid = items.len() / 2;
        let (point, id) = items[mid];

        let node_idx = self.nodes.len();
        self.nodes.push(Node { point, id, left: None, right: None });

        let (lower, rest) = items.split_at_mut(mid);
        let left = self.build(lower, depth + 1);
        let right = self.build(&mut rest[1..], depth + 1);
        self.nodes[node_idx].left = left;
        self.nodes[node_idx].right = right;
        Some(node_idx)
    }

    /// Ids of the `k` nearest points to `target`, closest first.
    pub fn nearest(&self, target: [f64; 2], k: usize) -> Vec<usize> {
        if k == 0 {
            return Vec::new();
        }
        let mut heap = BinaryHeap::with_capacity(k + 1);
        if let Some(root) = self.root {
            self.search(root, target, k, 0, &mut heap);
        }
        let mut found = heap.into_sorted_vec();
        found.truncate(k);
        found.into_iter().map(|n| n.id).collect()
    }

    fn search(
        &self,
        node_idx: usize,
        target: [f64; 2],
        k: usize,
        depth: usize,
        heap: &mut BinaryHeap<Neighbour>,
    ) {
        let node = &self.nodes[node_idx];
        let dx = node.point[0] - target[0];
        let dy = node.point[1] - target[1];
        let distance_sq = dx * dx + dy * dy;

        if heap.len() < k {
            heap.push(Neighbour { distance_sq, id: node.id });
        } else if let Some(worst) = heap.peek() {
            if distance_sq < worst.distance_sq {
                heap.pop();
                heap.push(Neighbour { distance_sq, id: node.id });
            }
        }

        let axis = depth % 2;
        let diff = target[axis] - node.point[axis];
        let (near, far) = if diff < 0.0 { (node.left, node.right) } else { (node.right, node.left) };

        if let Some(near) = near {
            self.search(near, target, k, depth + 1, heap);
        }
        let worst = heap.peek().map(|n| n.distance_sq).unwrap_or(f64::INFINITY);
        if heap.len() < k || diff * diff < worst {
            if let Some(far) = far {
                self.search(far, target, k, depth + 1, heap);
            }
        }
    }
}
