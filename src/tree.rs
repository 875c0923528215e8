//! Tree construction: recursive median-split partitioning of a
//! one-dimensional projection into a flat, breadth-first-addressed binary
//! tree.
//!
//! The recursion threads `perm` through sibling calls by disjoint index
//! ranges rather than by slicing sub-vectors: a partition mutates `perm` for
//! the whole `[lo, hi]` range in place, and each child must see the
//! post-partition state of its half.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::dataset::Dataset;
use crate::helpers::arg_max;
use crate::metric::Metric;
use crate::number::Number;

/// One slot of the flat, breadth-first-addressed tree.
///
/// Unused slots are left zero-initialized and are never visited by a query,
/// because the builder checks the leaf-size condition at every depth and
/// marks the parent a leaf before a child slot would go unused.
#[derive(Debug, Clone)]
pub(crate) struct Node<T: Number> {
    pub(crate) data_lo: usize,
    pub(crate) data_hi: usize,
    pub(crate) center: Vec<T>,
    pub(crate) radius: T,
    pub(crate) is_leaf: bool,
}

impl<T: Number> Node<T> {
    fn empty(dim: usize) -> Self {
        Self { data_lo: 0, data_hi: 0, center: vec![T::zero(); dim], radius: T::zero(), is_leaf: true }
    }
}

/// The flat tree arrays plus the permutation they index into.
pub(crate) struct TreeArrays<T: Number> {
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) perm: Vec<usize>,
    pub(crate) leaf_size: usize,
    pub(crate) height: usize,
}

/// `height = ceil(log2(n / leaf_size)) + 1`, with the degenerate `n <=
/// leaf_size` case (the root itself is a leaf) folded in as `height = 1`.
fn height_for(n: usize, leaf_size: usize) -> usize {
    if n <= leaf_size {
        1
    } else {
        let ratio = n as f64 / leaf_size as f64;
        (ratio.log2().ceil() as usize) + 1
    }
}

/// Builds the flat tree over `data`.
pub(crate) fn build<T: Number, D: Dataset<T>>(
    data: &D,
    metric: Metric,
    leaf_size: usize,
    seed: Option<u64>,
) -> TreeArrays<T> {
    let n = data.n();
    let dim = data.dim();
    let height = height_for(n, leaf_size);
    let node_count = (1usize << height) - 1;

    let mut perm: Vec<usize> = (0..n).collect();
    let mut nodes: Vec<Node<T>> = (0..node_count).map(|_| Node::empty(dim)).collect();

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_rng(rand::thread_rng()).expect("seeding pivot RNG from the process RNG"),
    };

    build_node(data, metric, leaf_size, &mut perm, &mut nodes, &mut rng, 0, 0, n - 1);

    TreeArrays { nodes, perm, leaf_size, height }
}

/// Computes `center` (coordinate-wise mean) and `radius` (max distance from
/// `center` to any point in range) for `perm[lo..=hi]`, and writes the
/// node's bounds.
fn set_ball<T: Number, D: Dataset<T>>(data: &D, metric: Metric, perm: &[usize], lo: usize, hi: usize, node: &mut Node<T>) {
    let dim = data.dim();
    let count = hi - lo + 1;

    let mut center = vec![T::zero(); dim];
    for &p in &perm[lo..=hi] {
        let row = data.get(p);
        for d in 0..dim {
            center[d] = center[d] + row[d];
        }
    }
    let count_t = T::from_usize(count).unwrap_or_else(T::one);
    for c in center.iter_mut() {
        *c = *c / count_t;
    }

    let refs: Vec<&[T]> = perm[lo..=hi].iter().map(|&p| data.get(p)).collect();
    let radius = metric
        .one_to_many(&center, &refs)
        .into_iter()
        .fold(T::zero(), |acc, d| if d > acc { d } else { acc });

    node.center = center;
    node.radius = radius;
    node.data_lo = lo;
    node.data_hi = hi;
}

/// Hoare-partitions `proj`/`perm` (same length, scanned by relative index) in
/// lockstep around `pivot`, using strict `<`/`>` scan conditions so an
/// all-equal range still converges with the two pointers meeting near the
/// middle rather than degenerating to one side. Returns the relative index
/// of the partition boundary.
fn hoare_partition<T: Number>(proj: &mut [T], perm: &mut [usize], pivot: T) -> usize {
    let n = proj.len();
    let mut i: isize = -1;
    let mut j: isize = n as isize;
    loop {
        loop {
            i += 1;
            if proj[i as usize] >= pivot {
                break;
            }
        }
        loop {
            j -= 1;
            if proj[j as usize] <= pivot {
                break;
            }
        }
        if i >= j {
            return j as usize;
        }
        proj.swap(i as usize, j as usize);
        perm.swap(i as usize, j as usize);
    }
}

/// Selects the `target`-th smallest value (0-indexed) of `proj` in place via
/// quickselect, partitioning `perm` in lockstep so that afterward every
/// index below `target` holds a value `<=` the selected one and every index
/// at or above it holds a value `>=` it, over the entire slice, not just the
/// final active sub-range.
fn select_nth<T: Number>(proj: &mut [T], perm: &mut [usize], target: usize) {
    let mut lo = 0usize;
    let mut hi = proj.len() - 1;
    loop {
        if lo == hi {
            return;
        }
        let pivot = proj[lo + (hi - lo) / 2];
        let split = hoare_partition(&mut proj[lo..=hi], &mut perm[lo..=hi], pivot);
        let split_abs = lo + split;
        if target <= split_abs {
            hi = split_abs;
        } else {
            lo = split_abs + 1;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_node<T: Number, D: Dataset<T>>(
    data: &D,
    metric: Metric,
    leaf_size: usize,
    perm: &mut [usize],
    nodes: &mut [Node<T>],
    rng: &mut ChaCha8Rng,
    v: usize,
    lo: usize,
    hi: usize,
) {
    let count = hi - lo + 1;

    // Leaf case.
    if count <= leaf_size {
        set_ball(data, metric, perm, lo, hi, &mut nodes[v]);
        nodes[v].is_leaf = true;
        log::trace!("leaf node {v}: range [{lo}, {hi}] ({count} points)");
        return;
    }

    // Internal case.
    let dim = data.dim();
    let refs: Vec<&[T]> = perm[lo..=hi].iter().map(|&p| data.get(p)).collect();

    // Random seed point x0.
    let r = rng.gen_range(lo..=hi);
    let x0 = data.get(perm[r]).to_vec();

    // x1, the farthest point from x0.
    let d0 = metric.one_to_many(&x0, &refs);
    let (arg1, _) = arg_max(&d0);
    let x1 = data.get(perm[lo + arg1]).to_vec();

    // x2, the farthest point from x1.
    let d1 = metric.one_to_many(&x1, &refs);
    let (arg2, _) = arg_max(&d1);
    let x2 = data.get(perm[lo + arg2]).to_vec();

    // Project every point onto u = x1 - x2 (unnormalized, uncentered).
    let u: Vec<T> = (0..dim).map(|d| x1[d] - x2[d]).collect();
    let mut proj: Vec<T> = refs.iter().map(|row| dot(&u, row)).collect();

    // Exact median split at m = floor(count / 2).
    let m = count / 2;
    select_nth(&mut proj, &mut perm[lo..=hi], m);

    // Ball over the full range, written before recursing.
    set_ball(data, metric, perm, lo, hi, &mut nodes[v]);
    nodes[v].is_leaf = false;
    let left = 2 * v + 1;
    let right = 2 * v + 2;
    log::trace!("internal node {v}: range [{lo}, {hi}] split {m}/{} into children {left}/{right}", count - m);

    // Recurse left/right.
    build_node(data, metric, leaf_size, perm, nodes, rng, left, lo, lo + m - 1);
    build_node(data, metric, leaf_size, perm, nodes, rng, right, lo + m, hi);
}

fn dot<T: Number>(u: &[T], row: &[T]) -> T {
    u.iter().zip(row).map(|(&a, &b)| a * b).sum()
}
