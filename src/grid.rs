use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use crate::point::Point;

/// A representation of a 2d grid.
///
/// For indexing operations on this grid, `(0, 0)` is the top left corner.
/// Storage is row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Which cells of a yard require servicing.
///
/// `true` marks an active cell.
pub type Mask = Grid<bool>;

impl<T> Grid<T>
where
    T: Default + Clone,
{
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T>
where
    T: Clone,
{
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Grid {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid from a list of rows.
    ///
    /// Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, Error> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(Error::Ragged {
                    row: y,
                    len: row.len(),
                    width,
                });
            }
            cells.extend(row);
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `true` when the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get the internal index where the desired value is stored,
    /// or `None` if it is out of bounds.
    pub fn idx(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some((y * self.width) + x)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.idx(point.x, point.y).is_some()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.idx(x, y).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.idx(x, y).map(|idx| &mut self.cells[idx])
    }

    /// Every coordinate of the grid, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }

    /// `true` when `other` has the same width and height as `self`.
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl Grid<bool> {
    /// `false` for inactive cells and for anything outside the grid.
    pub fn is_active(&self, point: Point) -> bool {
        self.get(point.x, point.y).copied().unwrap_or(false)
    }

    /// Active cells in row-major order.
    pub fn active_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(|&p| self[p])
    }

    pub fn count_active(&self) -> usize {
        self.cells.iter().filter(|&&active| active).count()
    }
}

impl<T> Index<Point> for Grid<T> {
    type Output = T;

    fn index(&self, point: Point) -> &Self::Output {
        self.get(point.x, point.y).unwrap()
    }
}

impl<T> IndexMut<Point> for Grid<T> {
    fn index_mut(&mut self, point: Point) -> &mut Self::Output {
        self.get_mut(point.x, point.y).unwrap()
    }
}

/// Parse a mask from text: one line per row, `#` for an active cell and `.` for an inactive one.
///
/// Surrounding whitespace on each line is ignored, as are blank lines.
impl FromStr for Grid<bool> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .enumerate()
                    .map(|(x, ch)| match ch {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        _ => Err(Error::InvalidCell { x, y, ch }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }
}

impl fmt::Display for Grid<bool> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = if self[Point::new(x, y)] { '#' } else { '.' };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("row {row} has {len} cells but the grid is {width} wide")]
    Ragged { row: usize, len: usize, width: usize },
    #[error("unexpected character {ch:?} at `({x}, {y})`; expected '#' or '.'")]
    InvalidCell { x: usize, y: usize, ch: char },
}
