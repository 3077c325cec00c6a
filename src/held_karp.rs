//! Exact open-path travelling salesman over one region's active cells.
//!
//! The table is indexed by `(visited subset, last node)`. Subsets are bitsets over the
//! node list, so a region with `n` nodes needs `n · 2ⁿ` entries; this is why regions are
//! capped before they reach the solver.

use log::debug;
use serde::Serialize;

use crate::{
    grid::Mask,
    point::{path_cost, Point},
    region::{self, Region},
};

/// The largest node list the solver accepts.
///
/// At this size the cost and parent tables together take a little under half a gigabyte.
pub const MAX_EXACT_NODES: usize = 22;

const UNREACHED: u32 = u32::MAX;
const NO_PARENT: u8 = u8::MAX;

/// A visiting order over a set of cells. The path is open: it does not return to its start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tour {
    pub cells: Vec<Point>,
    /// Sum of Manhattan distances between consecutive cells.
    pub cost: usize,
}

impl Tour {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Find a minimum-cost open path visiting every node exactly once.
///
/// When several end nodes reach the optimum, the lowest index wins.
pub fn solve(nodes: &[Point]) -> Result<Tour, Error> {
    let n = nodes.len();
    if n > MAX_EXACT_NODES {
        return Err(Error::TooManyNodes {
            nodes: n,
            max: MAX_EXACT_NODES,
        });
    }
    match n {
        0 => return Ok(Tour::default()),
        1 => {
            return Ok(Tour {
                cells: nodes.to_vec(),
                cost: 0,
            })
        }
        _ => {}
    }

    let dist: Vec<u32> = nodes
        .iter()
        .flat_map(|a| nodes.iter().map(move |&b| a.manhattan(b) as u32))
        .collect();

    let states = 1usize << n;
    // Flattened as `mask * n + last`.
    let mut cost = vec![UNREACHED; states * n];
    let mut parent = vec![NO_PARENT; states * n];

    for i in 0..n {
        cost[(1 << i) * n + i] = 0;
    }

    // Increasing masks visit every subset before any of its supersets.
    for mask in 1..states {
        let mut lasts = mask;
        while lasts != 0 {
            let last = lasts.trailing_zeros() as usize;
            lasts &= lasts - 1;

            let prev = mask ^ (1 << last);
            if prev == 0 {
                continue;
            }

            let mut best = UNREACHED;
            let mut best_k = NO_PARENT;
            let mut ks = prev;
            while ks != 0 {
                let k = ks.trailing_zeros() as usize;
                ks &= ks - 1;

                let base = cost[prev * n + k];
                if base == UNREACHED {
                    continue;
                }
                let candidate = base + dist[k * n + last];
                if candidate < best {
                    best = candidate;
                    best_k = k as u8;
                }
            }
            cost[mask * n + last] = best;
            parent[mask * n + last] = best_k;
        }
    }

    let full = states - 1;
    let (end, total) = (0..n)
        .map(|i| (i, cost[full * n + i]))
        .fold((0, UNREACHED), |best, candidate| {
            if candidate.1 < best.1 {
                candidate
            } else {
                best
            }
        });

    let mut order = Vec::with_capacity(n);
    let mut mask = full;
    let mut node = end;
    loop {
        order.push(node);
        let prev = parent[mask * n + node];
        mask ^= 1 << node;
        if prev == NO_PARENT {
            break;
        }
        node = prev as usize;
    }
    order.reverse();
    debug_assert_eq!(mask, 0, "reconstruction must consume every node");

    let cells: Vec<Point> = order.into_iter().map(|i| nodes[i]).collect();
    debug_assert_eq!(path_cost(&cells), total as usize);
    Ok(Tour {
        cells,
        cost: total as usize,
    })
}

/// Solve the open-path problem over the active cells of `region`, gathered row by row.
pub fn solve_region(mask: &Mask, region: Region, cap: usize) -> Result<Tour, Error> {
    region.check_bounds(mask)?;
    let nodes: Vec<Point> = region.active_cells(mask).collect();
    if nodes.len() > cap {
        return Err(Error::RegionTooLarge {
            region,
            active: nodes.len(),
            cap,
        });
    }
    let tour = solve(&nodes)?;
    debug!(
        "region {:?}: {} nodes, tour cost {}",
        region,
        tour.len(),
        tour.cost
    );
    Ok(tour)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("region {region:?} holds {active} active cells, more than the cap of {cap}")]
    RegionTooLarge {
        region: Region,
        active: usize,
        cap: usize,
    },
    #[error("{nodes} nodes exceed the exact solver's limit of {max}")]
    TooManyNodes { nodes: usize, max: usize },
    #[error(transparent)]
    Region(#[from] region::Error),
}
