//! Greedy coverage: keep walking to the nearest cell which still needs a visit.
//!
//! Distances are move counts found by breadth-first search over the whole grid.
//! Inactive cells are walkable; only cells marked in an optional obstacle grid are not.

use std::collections::VecDeque;

use log::{debug, trace, warn};

use crate::{
    grid::{Grid, Mask},
    point::Point,
};

/// The outcome of a greedy coverage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    /// Every active cell appears in the path.
    Complete(Vec<Point>),
    /// The walk stopped because the remaining active cells cannot be reached.
    Incomplete {
        path: Vec<Point>,
        /// Active cells missing from `path`, row by row.
        unreached: Vec<Point>,
    },
}

impl Coverage {
    pub fn path(&self) -> &[Point] {
        match self {
            Coverage::Complete(path) | Coverage::Incomplete { path, .. } => path,
        }
    }

    pub fn unreached(&self) -> &[Point] {
        match self {
            Coverage::Complete(_) => &[],
            Coverage::Incomplete { unreached, .. } => unreached,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Coverage::Complete(_))
    }

    pub fn into_parts(self) -> (Vec<Point>, Vec<Point>) {
        match self {
            Coverage::Complete(path) => (path, Vec::new()),
            Coverage::Incomplete { path, unreached } => (path, unreached),
        }
    }
}

/// Cover every active cell of `mask`, starting from `start`.
///
/// The path does not include `start` unless `start` is itself active.
pub fn cover(mask: &Mask, start: Point) -> Result<Coverage, Error> {
    Ok(Walker::new(mask, None, start)?.run(start))
}

/// As [`cover`], but cells marked `true` in `blocked` cannot be entered.
///
/// This can leave active cells unreachable, reported as [`Coverage::Incomplete`].
pub fn cover_with_obstacles(
    mask: &Mask,
    blocked: &Grid<bool>,
    start: Point,
) -> Result<Coverage, Error> {
    if !mask.same_shape(blocked) {
        return Err(Error::DimensionMismatch {
            mask: (mask.width(), mask.height()),
            blocked: (blocked.width(), blocked.height()),
        });
    }
    Ok(Walker::new(mask, Some(blocked), start)?.run(start))
}

struct Walker<'a> {
    blocked: Option<&'a Grid<bool>>,
    unvisited: Grid<bool>,
    remaining: usize,
}

impl<'a> Walker<'a> {
    fn new(mask: &Mask, blocked: Option<&'a Grid<bool>>, start: Point) -> Result<Self, Error> {
        if !mask.contains(start) && !mask.is_empty() {
            return Err(Error::StartOutOfBounds {
                start,
                width: mask.width(),
                height: mask.height(),
            });
        }
        Ok(Walker {
            blocked,
            unvisited: mask.clone(),
            remaining: mask.count_active(),
        })
    }

    fn is_walkable(&self, point: Point) -> bool {
        self.blocked.map_or(true, |blocked| !blocked[point])
    }

    fn service(&mut self, point: Point) {
        let cell = &mut self.unvisited[point];
        if *cell {
            *cell = false;
            self.remaining -= 1;
        }
    }

    /// Breadth-first search from `from` to the closest unvisited cell.
    ///
    /// Returns the moves to get there, excluding `from`.
    fn nearest_unvisited(&self, from: Point) -> Option<Vec<Point>> {
        let (width, height) = (self.unvisited.width(), self.unvisited.height());
        let mut parents: Grid<Option<Point>> = Grid::new(width, height);
        let mut seen: Grid<bool> = Grid::new(width, height);
        seen[from] = true;

        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            for next in current.neighbors(width, height) {
                if seen[next] || !self.is_walkable(next) {
                    continue;
                }
                seen[next] = true;
                parents[next] = Some(current);
                if self.unvisited[next] {
                    return Some(trace_back(&parents, from, next));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn run(mut self, start: Point) -> Coverage {
        let mut path = Vec::new();
        let mut position = start;

        while self.remaining > 0 {
            let leg = if self.unvisited[position] {
                vec![position]
            } else {
                match self.nearest_unvisited(position) {
                    Some(leg) => leg,
                    None => break,
                }
            };
            let Some(&target) = leg.last() else { break };
            trace!("walking {} steps from {position:?} to {target:?}", leg.len());

            for &cell in &leg {
                self.service(cell);
            }
            position = target;
            path.extend(leg);
        }

        if self.remaining == 0 {
            debug!("greedy coverage complete in {} cells", path.len());
            return Coverage::Complete(path);
        }

        let unreached: Vec<Point> = self.unvisited.active_cells().collect();
        warn!(
            "greedy coverage stopped at {position:?} with {} active cells unreachable",
            unreached.len()
        );
        Coverage::Incomplete { path, unreached }
    }
}

/// Follow `parents` back from `to` until reaching `from`, then reverse.
fn trace_back(parents: &Grid<Option<Point>>, from: Point, to: Point) -> Vec<Point> {
    let mut leg = vec![to];
    let mut current = to;
    while let Some(parent) = parents[current] {
        if parent == from {
            break;
        }
        leg.push(parent);
        current = parent;
    }
    leg.reverse();
    leg
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("start {start:?} is outside the {width}x{height} grid")]
    StartOutOfBounds {
        start: Point,
        width: usize,
        height: usize,
    },
    #[error("obstacle grid is {blocked:?} but the mask is {mask:?}")]
    DimensionMismatch {
        mask: (usize, usize),
        blocked: (usize, usize),
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn assert_contiguous(path: &[Point]) {
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    fn assert_covers(mask: &Mask, path: &[Point]) {
        let visited: BTreeSet<_> = path.iter().copied().collect();
        for cell in mask.active_cells() {
            assert!(visited.contains(&cell), "{cell:?} never visited");
        }
    }

    #[test]
    fn walks_across_inactive_cells() {
        let mask: Mask = "#..#".parse().unwrap();
        let coverage = cover(&mask, Point::new(0, 0)).unwrap();
        assert_eq!(
            coverage,
            Coverage::Complete(vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(3, 0),
            ])
        );
    }

    #[test]
    fn all_inactive_is_empty() {
        let mask: Mask = "..\n..".parse().unwrap();
        let coverage = cover(&mask, Point::new(0, 0)).unwrap();
        assert_eq!(coverage, Coverage::Complete(Vec::new()));
    }

    #[test]
    fn inactive_start_is_not_in_path() {
        let mask: Mask = ".#".parse().unwrap();
        let coverage = cover(&mask, Point::new(0, 0)).unwrap();
        assert_eq!(coverage.path(), &[Point::new(1, 0)]);
    }

    #[test]
    fn full_grid_is_covered_contiguously() {
        let mask: Mask = Grid::filled(4, 4, true);
        let coverage = cover(&mask, Point::new(0, 0)).unwrap();
        assert!(coverage.is_complete());
        assert_contiguous(coverage.path());
        assert_covers(&mask, coverage.path());
        // a full grid never needs to revisit with nearest-first walking from a corner
        assert_eq!(coverage.path().len(), 16);
    }

    #[test]
    fn irregular_mask_is_covered() {
        let mask: Mask = "
            ##..#...
            #...##..
            ...#..#.
            .#......
            ....####
        "
        .parse()
        .unwrap();
        let coverage = cover(&mask, Point::new(0, 0)).unwrap();
        assert!(coverage.is_complete());
        assert_contiguous(coverage.path());
        assert_covers(&mask, coverage.path());
    }

    #[test]
    fn passing_over_active_cells_services_them() {
        // (1,0) is passed on the way from (0,0) to (2,0)
        let mask: Mask = "###".parse().unwrap();
        let coverage = cover(&mask, Point::new(0, 0)).unwrap();
        assert_eq!(coverage.path().len(), 3);
    }

    #[test]
    fn starts_anywhere_in_the_grid() {
        let mask: Mask = "#...#".parse().unwrap();
        let coverage = cover(&mask, Point::new(2, 0)).unwrap();
        assert!(coverage.is_complete());
        assert_contiguous(coverage.path());
        assert_covers(&mask, coverage.path());
        // east is explored first, so the right end is reached first
        assert_eq!(coverage.path().first(), Some(&Point::new(3, 0)));
    }

    #[test]
    fn start_outside_grid_is_rejected() {
        let mask: Mask = "##".parse().unwrap();
        assert!(matches!(
            cover(&mask, Point::new(2, 0)),
            Err(Error::StartOutOfBounds { .. })
        ));
    }

    #[test]
    fn walled_off_cells_are_reported() {
        let mask: Mask = "#..#\n....\n#..#".parse().unwrap();
        let blocked: Grid<bool> = "..#.\n..#.\n..#.".parse().unwrap();
        let coverage = cover_with_obstacles(&mask, &blocked, Point::new(0, 0)).unwrap();
        assert!(!coverage.is_complete());
        assert_eq!(coverage.unreached(), &[Point::new(3, 0), Point::new(3, 2)]);
        assert_contiguous(coverage.path());
        assert!(coverage.path().contains(&Point::new(0, 2)));
    }

    #[test]
    fn obstacles_are_walked_around() {
        let mask: Mask = "#.#\n...".parse().unwrap();
        let blocked: Grid<bool> = ".#.\n...".parse().unwrap();
        let coverage = cover_with_obstacles(&mask, &blocked, Point::new(0, 0)).unwrap();
        assert_eq!(
            coverage,
            Coverage::Complete(vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(2, 0),
            ])
        );
    }

    #[test]
    fn obstacle_grid_must_match_mask() {
        let mask: Mask = "##".parse().unwrap();
        let blocked: Grid<bool> = Grid::new(3, 1);
        assert!(matches!(
            cover_with_obstacles(&mask, &blocked, Point::new(0, 0)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn runs_are_deterministic() {
        let mask: Mask = "#.#.\n.#.#\n#..#".parse().unwrap();
        let a = cover(&mask, Point::new(0, 0)).unwrap();
        let b = cover(&mask, Point::new(0, 0)).unwrap();
        assert_eq!(a, b);
    }
}
