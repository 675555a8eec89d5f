//! Three-dimensional k-d tree over catalog colors
//!
//! The tree is stored implicitly: for any node range the median element sits
//! at the middle position, with its lower half to the left and upper half to
//! the right, splitting on red, green, blue in turn by depth. Matches are
//! ranked by `(squared distance, insertion index)` so equal-distance entries
//! resolve to the earliest catalog entry, identical to a linear scan.

use crate::catalog::store::ColorCatalog;
use crate::io::error::{MosaicError, Result};
use image::Rgb;

const DIMENSIONS: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Node {
    color: [i32; DIMENSIONS],
    index: usize,
}

impl Node {
    const fn axis_value(&self, axis: usize) -> i32 {
        match axis {
            0 => self.color[0],
            1 => self.color[1],
            _ => self.color[2],
        }
    }
}

/// Result of a nearest-color query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nearest {
    /// Catalog insertion index of the matched entry
    pub index: usize,
    /// Squared Euclidean distance in RGB space
    pub distance_squared: u32,
}

impl Nearest {
    const fn ranks_before(&self, other: &Self) -> bool {
        self.distance_squared < other.distance_squared
            || (self.distance_squared == other.distance_squared && self.index < other.index)
    }
}

/// Read-only nearest-neighbour index built once from a finished catalog
///
/// Queries take `&self` and share no mutable state, so any number of
/// workers may query concurrently.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    nodes: Vec<Node>,
}

impl SpatialIndex {
    /// Partition the catalog colors into a k-d tree
    ///
    /// Median selection per level gives average O(n log n) construction.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCatalog` if the catalog has no entries
    pub fn build(catalog: &ColorCatalog) -> Result<Self> {
        if catalog.is_empty() {
            return Err(MosaicError::EmptyCatalog);
        }

        let mut nodes: Vec<Node> = catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(index, profile)| Node {
                color: profile.rgb.0.map(i32::from),
                index,
            })
            .collect();

        partition(&mut nodes, 0);
        Ok(Self { nodes })
    }

    /// Number of indexed colors
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no colors (never true for a built index)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Closest catalog entry to `target`, earliest insertion index on ties
    pub fn nearest(&self, target: Rgb<u8>) -> Nearest {
        let target = target.0.map(i32::from);
        let mut best = Nearest {
            index: usize::MAX,
            distance_squared: u32::MAX,
        };
        search(&self.nodes, 0, &target, &mut best);
        best
    }
}

/// Linear scan for the closest color, earliest insertion index on ties
///
/// Returns `None` for an empty catalog.
pub fn brute_force_nearest(catalog: &ColorCatalog, target: Rgb<u8>) -> Option<Nearest> {
    let target = target.0.map(i32::from);
    catalog
        .entries()
        .iter()
        .enumerate()
        .map(|(index, profile)| Nearest {
            index,
            distance_squared: distance_squared(&profile.rgb.0.map(i32::from), &target),
        })
        .reduce(|best, candidate| {
            if candidate.ranks_before(&best) {
                candidate
            } else {
                best
            }
        })
}

fn distance_squared(a: &[i32; DIMENSIONS], b: &[i32; DIMENSIONS]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).unsigned_abs().pow(2))
        .sum()
}

fn partition(nodes: &mut [Node], depth: usize) {
    if nodes.len() <= 1 {
        return;
    }

    let axis = depth % DIMENSIONS;
    let mid = nodes.len() / 2;
    nodes.select_nth_unstable_by(mid, |a, b| {
        a.axis_value(axis)
            .cmp(&b.axis_value(axis))
            .then(a.index.cmp(&b.index))
    });

    let (lower, rest) = nodes.split_at_mut(mid);
    partition(lower, depth + 1);
    if let Some((_, upper)) = rest.split_first_mut() {
        partition(upper, depth + 1);
    }
}

fn search(nodes: &[Node], depth: usize, target: &[i32; DIMENSIONS], best: &mut Nearest) {
    let (lower, rest) = nodes.split_at(nodes.len() / 2);
    let Some((node, upper)) = rest.split_first() else {
        return;
    };

    let candidate = Nearest {
        index: node.index,
        distance_squared: distance_squared(&node.color, target),
    };
    if candidate.ranks_before(best) {
        *best = candidate;
    }

    let axis = depth % DIMENSIONS;
    let target_value = match axis {
        0 => target[0],
        1 => target[1],
        _ => target[2],
    };
    let offset = target_value - node.axis_value(axis);
    let (near, far) = if offset < 0 {
        (lower, upper)
    } else {
        (upper, lower)
    };

    search(near, depth + 1, target, best);

    // Equal distance to the splitting plane can still hide a lower index
    if offset.unsigned_abs().pow(2) <= best.distance_squared {
        search(far, depth + 1, target, best);
    }
}
