use serde::{Deserialize, Serialize};

/// A cell coordinate. `x` is the column and `y` is the row; `(0, 0)` is the top left corner.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Number of orthogonal moves between two cells.
    pub fn manhattan(self, other: Point) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// `true` when `other` is exactly one orthogonal move away.
    pub fn is_adjacent(self, other: Point) -> bool {
        self.manhattan(other) == 1
    }

    /// The orthogonal neighbours of this point which lie inside a `width × height` grid.
    ///
    /// Order is east, west, south, north. Searches depend on this order being stable.
    pub fn neighbors(self, width: usize, height: usize) -> impl Iterator<Item = Point> {
        let Point { x, y } = self;
        let east = (x + 1 < width).then(|| Point::new(x + 1, y));
        let west = x.checked_sub(1).map(|x| Point::new(x, y));
        let south = (y + 1 < height).then(|| Point::new(x, y + 1));
        let north = y.checked_sub(1).map(|y| Point::new(x, y));
        [east, west, south, north]
            .into_iter()
            .flatten()
            .filter(move |p| p.x < width && p.y < height)
    }
}

impl From<(usize, usize)> for Point {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// Sum of the Manhattan distances between consecutive points.
pub fn path_cost(points: &[Point]) -> usize {
    points.windows(2).map(|w| w[0].manhattan(w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((0, 0), (0, 0), 0)]
    #[case((0, 0), (3, 0), 3)]
    #[case((5, 1), (2, 4), 6)]
    fn manhattan_distance(#[case] a: (usize, usize), #[case] b: (usize, usize), #[case] d: usize) {
        assert_eq!(Point::from(a).manhattan(b.into()), d);
        assert_eq!(Point::from(b).manhattan(a.into()), d);
    }

    #[test]
    fn corner_has_two_neighbors() {
        let n: Vec<_> = Point::new(0, 0).neighbors(3, 3).collect();
        assert_eq!(n, vec![Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn interior_neighbor_order() {
        let n: Vec<_> = Point::new(1, 1).neighbors(3, 3).collect();
        assert_eq!(
            n,
            vec![
                Point::new(2, 1),
                Point::new(0, 1),
                Point::new(1, 2),
                Point::new(1, 0)
            ]
        );
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        assert_eq!(Point::new(0, 0).neighbors(1, 1).count(), 0);
    }

    #[test]
    fn cost_of_path() {
        let points = [Point::new(0, 0), Point::new(2, 0), Point::new(2, 3)];
        assert_eq!(path_cost(&points), 5);
        assert_eq!(path_cost(&points[..1]), 0);
        assert_eq!(path_cost(&[]), 0);
    }
}
