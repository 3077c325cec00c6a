use log::trace;
use serde::{Deserialize, Serialize};

use crate::{grid::Mask, point::Point};

/// An axis-aligned rectangle of cells. All bounds are inclusive.
///
/// `r0..=r1` are rows (`y`) and `c0..=c1` are columns (`x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub r0: usize,
    pub r1: usize,
    pub c0: usize,
    pub c1: usize,
}

impl Region {
    /// Return the region if its extent is positive, or `Error::InvalidRegion` otherwise.
    pub fn new(r0: usize, r1: usize, c0: usize, c1: usize) -> Result<Self, Error> {
        let region = Region { r0, r1, c0, c1 };
        if r0 > r1 || c0 > c1 {
            return Err(Error::InvalidRegion {
                region,
                width: None,
                height: None,
            });
        }
        Ok(region)
    }

    /// The region spanning the whole mask, or `None` if the mask has no cells.
    pub fn covering(mask: &Mask) -> Option<Self> {
        (!mask.is_empty()).then(|| Region {
            r0: 0,
            r1: mask.height() - 1,
            c0: 0,
            c1: mask.width() - 1,
        })
    }

    pub fn rows(&self) -> usize {
        self.r1 - self.r0 + 1
    }

    pub fn cols(&self) -> usize {
        self.c1 - self.c0 + 1
    }

    pub fn area(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.r0..=self.r1).contains(&point.y) && (self.c0..=self.c1).contains(&point.x)
    }

    /// Every cell of the region, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let Region { r0, r1, c0, c1 } = *self;
        (r0..=r1).flat_map(move |y| (c0..=c1).map(move |x| Point::new(x, y)))
    }

    /// The region's active cells, row by row.
    pub fn active_cells<'a>(&self, mask: &'a Mask) -> impl Iterator<Item = Point> + 'a {
        self.cells().filter(|&p| mask.is_active(p))
    }

    pub fn count_active(&self, mask: &Mask) -> usize {
        self.active_cells(mask).count()
    }

    /// Check that the region lies entirely inside the mask.
    pub fn check_bounds(&self, mask: &Mask) -> Result<(), Error> {
        if self.r0 > self.r1 || self.c0 > self.c1 || self.r1 >= mask.height() || self.c1 >= mask.width()
        {
            return Err(Error::InvalidRegion {
                region: *self,
                width: Some(mask.width()),
                height: Some(mask.height()),
            });
        }
        Ok(())
    }

    /// Halve the region along its longer side. Square regions split their rows.
    ///
    /// A single-cell region cannot be split.
    fn split(&self) -> Option<(Region, Region)> {
        if self.area() < 2 {
            return None;
        }
        let Region { r0, r1, c0, c1 } = *self;
        Some(if self.rows() >= self.cols() {
            let mid = (r0 + r1) / 2;
            (Region { r1: mid, ..*self }, Region { r0: mid + 1, ..*self })
        } else {
            let mid = (c0 + c1) / 2;
            (Region { c1: mid, ..*self }, Region { c0: mid + 1, ..*self })
        })
    }
}

/// Partition the whole mask into regions holding at most `cap` active cells each.
///
/// A mask with no cells produces no regions.
pub fn partition(mask: &Mask, cap: usize) -> Result<Vec<Region>, Error> {
    match Region::covering(mask) {
        Some(region) => partition_region(mask, region, cap),
        None => {
            check_cap(cap)?;
            Ok(Vec::new())
        }
    }
}

/// Partition `region` into non-overlapping sub-regions holding at most `cap` active cells each.
///
/// Regions are returned in recursion order: the first half of every split precedes the second.
/// Regions without any active cells are still emitted.
pub fn partition_region(mask: &Mask, region: Region, cap: usize) -> Result<Vec<Region>, Error> {
    check_cap(cap)?;
    region.check_bounds(mask)?;
    let mut regions = Vec::new();
    subdivide(mask, region, cap, &mut regions);
    Ok(regions)
}

fn check_cap(cap: usize) -> Result<(), Error> {
    if cap == 0 {
        Err(Error::ZeroCap)
    } else {
        Ok(())
    }
}

fn subdivide(mask: &Mask, region: Region, cap: usize, regions: &mut Vec<Region>) {
    let active = region.count_active(mask);
    match region.split() {
        // with cap >= 1 a single cell always terminates
        Some((first, second)) if active > cap => {
            trace!("splitting {region:?} holding {active} active cells");
            subdivide(mask, first, cap, regions);
            subdivide(mask, second, cap, regions);
        }
        _ => regions.push(region),
    }
}

/// The smallest and the largest region by area.
///
/// Ties resolve to the earliest region in the list.
pub fn area_extremes(regions: &[Region]) -> Option<(Region, Region)> {
    let first = *regions.first()?;
    Some(
        regions
            .iter()
            .skip(1)
            .fold((first, first), |(min, max), &region| {
                (
                    if region.area() < min.area() { region } else { min },
                    if region.area() > max.area() { region } else { max },
                )
            }),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("region {region:?} is empty or lies outside the grid (width: {width:?}, height: {height:?})")]
    InvalidRegion {
        region: Region,
        width: Option<usize>,
        height: Option<usize>,
    },
    #[error("the active-cell cap per region must be at least 1")]
    ZeroCap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use rstest::rstest;

    fn full(width: usize, height: usize) -> Mask {
        Grid::filled(width, height, true)
    }

    /// Every cell of the mask belongs to exactly one region.
    fn assert_exact_cover(mask: &Mask, regions: &[Region]) {
        let mut owners: Grid<u32> = Grid::new(mask.width(), mask.height());
        for region in regions {
            for cell in region.cells() {
                owners[cell] += 1;
            }
        }
        for point in mask.points() {
            assert_eq!(owners[point], 1, "cell {point:?} covered {} times", owners[point]);
        }
    }

    #[rstest]
    #[case(1, 1, 1)]
    #[case(4, 4, 16)]
    #[case(4, 4, 3)]
    #[case(30, 30, 20)]
    #[case(7, 3, 2)]
    #[case(1, 9, 1)]
    fn regions_respect_cap_and_cover(
        #[case] width: usize,
        #[case] height: usize,
        #[case] cap: usize,
    ) {
        let mask = full(width, height);
        let regions = partition(&mask, cap).unwrap();
        for region in &regions {
            assert!(region.count_active(&mask) <= cap);
        }
        assert_exact_cover(&mask, &regions);
    }

    #[test]
    fn sparse_mask_regions_cover() {
        let mask: Mask = "
            #.#.#.#.
            ..##..##
            ########
            #......#
            .#.#.#.#
        "
        .parse()
        .unwrap();
        let regions = partition(&mask, 3).unwrap();
        for region in &regions {
            assert!(region.count_active(&mask) <= 3);
        }
        assert_exact_cover(&mask, &regions);
    }

    #[test]
    fn under_cap_is_a_single_region() {
        let mask = full(4, 4);
        let regions = partition(&mask, 16).unwrap();
        assert_eq!(regions, vec![Region::new(0, 3, 0, 3).unwrap()]);
    }

    #[test]
    fn square_splits_rows_first() {
        let mask = full(4, 4);
        let regions = partition(&mask, 8).unwrap();
        assert_eq!(
            regions,
            vec![
                Region::new(0, 1, 0, 3).unwrap(),
                Region::new(2, 3, 0, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn wide_region_splits_columns() {
        let mask = full(6, 2);
        let regions = partition(&mask, 6).unwrap();
        assert_eq!(
            regions,
            vec![
                Region::new(0, 1, 0, 2).unwrap(),
                Region::new(0, 1, 3, 5).unwrap(),
            ]
        );
    }

    #[test]
    fn inactive_regions_are_emitted() {
        let mask: Mask = "##..\n##..\n....\n....".parse().unwrap();
        let regions = partition(&mask, 2).unwrap();
        assert!(regions.iter().any(|r| r.count_active(&mask) == 0));
        assert_exact_cover(&mask, &regions);
    }

    #[test]
    fn empty_mask_has_no_regions() {
        let mask: Mask = Grid::new(0, 0);
        assert!(partition(&mask, 20).unwrap().is_empty());
    }

    #[test]
    fn zero_cap_is_rejected() {
        let mask = full(2, 2);
        assert!(matches!(partition(&mask, 0), Err(Error::ZeroCap)));
    }

    #[rstest]
    #[case(1, 0, 0, 0)]
    #[case(0, 0, 2, 1)]
    fn inverted_bounds_are_invalid(
        #[case] r0: usize,
        #[case] r1: usize,
        #[case] c0: usize,
        #[case] c1: usize,
    ) {
        assert!(matches!(
            Region::new(r0, r1, c0, c1),
            Err(Error::InvalidRegion { .. })
        ));
    }

    #[test]
    fn out_of_grid_region_is_invalid() {
        let mask = full(3, 3);
        let region = Region::new(0, 3, 0, 2).unwrap();
        assert!(matches!(
            partition_region(&mask, region, 4),
            Err(Error::InvalidRegion {
                width: Some(3),
                height: Some(3),
                ..
            })
        ));
    }

    #[test]
    fn extremes_prefer_earliest() {
        let a = Region::new(0, 1, 0, 1).unwrap();
        let b = Region::new(0, 0, 0, 3).unwrap();
        let c = Region::new(0, 0, 0, 0).unwrap();
        let d = Region::new(0, 2, 0, 2).unwrap();
        assert_eq!(area_extremes(&[a, b, c, d]), Some((c, d)));
        assert_eq!(area_extremes(&[a, b]), Some((a, a)));
        assert_eq!(area_extremes(&[]), None);
    }
}
