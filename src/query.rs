//! Bounded best-first traversal: per-query recursive descent with
//! triangle-inequality pruning, backed by a fixed-capacity max-heap.
//!
//! By the triangle inequality, every point `p` in the ball centered at `c`
//! with radius `r` satisfies `d(q, p) >= d(q, c) - r`. So once `d(q, c) - r`
//! exceeds the current k-th-best distance, nothing in that ball can improve
//! the heap and the subtree is skipped.

use crate::dataset::Dataset;
use crate::heap::BoundedMaxHeap;
use crate::metric::Metric;
use crate::number::Number;
use crate::tree::Node;

/// Runs the bounded best-first descent for a single query row, writing
/// results into `dist`/`idx` (both length `k`).
pub(crate) fn query_one<T: Number, D: Dataset<T>>(
    data: &D,
    metric: Metric,
    nodes: &[Node<T>],
    perm: &[usize],
    query: &[T],
    dist: &mut [T],
    idx: &mut [usize],
) {
    let mut heap = BoundedMaxHeap::new(dist, idx);
    if nodes.is_empty() {
        return;
    }
    let dc = metric.one_to_one(query, &nodes[0].center);
    visit(data, metric, nodes, perm, query, 0, dc, &mut heap);
}

#[allow(clippy::too_many_arguments)]
fn visit<T: Number, D: Dataset<T>>(
    data: &D,
    metric: Metric,
    nodes: &[Node<T>],
    perm: &[usize],
    query: &[T],
    v: usize,
    dc: T,
    heap: &mut BoundedMaxHeap<T>,
) {
    let node = &nodes[v];

    // Prune.
    if dc - node.radius > heap.worst() {
        log::trace!("prune node {v}: lower bound {:?} exceeds worst {:?}", dc - node.radius, heap.worst());
        return;
    }

    // Leaf.
    if node.is_leaf {
        for i in node.data_lo..=node.data_hi {
            let p = perm[i];
            let d = metric.one_to_one(query, data.get(p));
            if d < heap.worst() {
                heap.replace_root(d, p);
                log::trace!("heap replace: point {p} at distance {:?}", d);
            }
        }
        return;
    }

    // Internal: descend nearer child first so the bound tightens before the
    // farther subtree is even considered.
    let l = 2 * v + 1;
    let r = 2 * v + 2;
    let dc_l = metric.one_to_one(query, &nodes[l].center);
    let dc_r = metric.one_to_one(query, &nodes[r].center);

    if dc_l <= dc_r {
        visit(data, metric, nodes, perm, query, l, dc_l, heap);
        visit(data, metric, nodes, perm, query, r, dc_r, heap);
    } else {
        visit(data, metric, nodes, perm, query, r, dc_r, heap);
        visit(data, metric, nodes, perm, query, l, dc_l, heap);
    }
}

#[cfg(test)]
mod tests {
    use super::query_one;
    use crate::dataset::TabularDataset;
    use crate::metric::Metric;
    use crate::tree;

    #[test]
    fn matches_brute_force_on_a_small_set() {
        let rows: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![10.0, 10.0],
        ];
        let flat: Vec<f64> = rows.iter().flatten().cloned().collect();
        let data = TabularDataset::new(&flat, rows.len(), 2);
        let metric = Metric::Euclidean;
        let arrays = tree::build(&data, metric, 2, Some(1));

        let query = [0.0_f64, 0.0];
        let k = 3;
        let mut dist = vec![0.0_f64; k];
        let mut idx = vec![0usize; k];
        query_one(&data, metric, &arrays.nodes, &arrays.perm, &query, &mut dist, &mut idx);

        let mut got: Vec<usize> = idx.clone();
        got.sort_unstable();
        assert_eq!(got, vec![0, 1, 2]);

        let worst = dist.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(worst, dist[0]);
    }
}
