use crate::{
    grid::{Grid, Mask},
    point::Point,
};

/// Step through a planned path one cell per tick, recording which active cells have been serviced.
///
/// The planner never sees this state; it belongs to whoever consumes the path.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    mask: &'a Mask,
    path: &'a [Point],
    index: usize,
    serviced: Grid<bool>,
    serviced_count: usize,
    total_active: usize,
}

impl<'a> Replay<'a> {
    pub fn new(mask: &'a Mask, path: &'a [Point]) -> Self {
        Replay {
            mask,
            path,
            index: 0,
            serviced: Grid::new(mask.width(), mask.height()),
            serviced_count: 0,
            total_active: mask.count_active(),
        }
    }

    /// Where the agent stands, or `None` before the first tick.
    pub fn position(&self) -> Option<Point> {
        self.index.checked_sub(1).map(|idx| self.path[idx])
    }

    pub fn is_serviced(&self, point: Point) -> bool {
        self.serviced.get(point.x, point.y).copied().unwrap_or(false)
    }

    pub fn serviced_count(&self) -> usize {
        self.serviced_count
    }

    pub fn total_active(&self) -> usize {
        self.total_active
    }

    /// Fraction of active cells serviced so far. A yard with nothing to service is done.
    pub fn progress(&self) -> f64 {
        if self.total_active == 0 {
            1.0
        } else {
            self.serviced_count as f64 / self.total_active as f64
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.path.len()
    }

    /// Run the remaining ticks.
    pub fn finish(&mut self) -> &Self {
        for _ in self.by_ref() {}
        self
    }
}

impl<'a> Iterator for Replay<'a> {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        let point = *self.path.get(self.index)?;
        self.index += 1;
        if self.mask.is_active(point) {
            if let Some(cell) = self.serviced.get_mut(point.x, point.y) {
                if !*cell {
                    *cell = true;
                    self.serviced_count += 1;
                }
            }
        }
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_mark_active_cells() {
        let mask: Mask = "#.#".parse().unwrap();
        let path = [Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)];
        let mut replay = Replay::new(&mask, &path);
        assert_eq!(replay.position(), None);

        assert_eq!(replay.next(), Some(Point::new(0, 0)));
        assert!(replay.is_serviced(Point::new(0, 0)));
        assert_eq!(replay.progress(), 0.5);

        replay.next();
        assert!(!replay.is_serviced(Point::new(1, 0)));
        assert_eq!(replay.serviced_count(), 1);

        replay.next();
        assert_eq!(replay.position(), Some(Point::new(2, 0)));
        assert!(replay.is_finished());
        assert_eq!(replay.progress(), 1.0);
        assert_eq!(replay.next(), None);
    }

    #[test]
    fn revisits_count_once() {
        let mask: Mask = "##".parse().unwrap();
        let path = [Point::new(0, 0), Point::new(1, 0), Point::new(0, 0)];
        let mut replay = Replay::new(&mask, &path);
        assert_eq!(replay.finish().serviced_count(), 2);
    }

    #[test]
    fn empty_yard_is_done() {
        let mask: Mask = "..".parse().unwrap();
        let replay = Replay::new(&mask, &[]);
        assert!(replay.is_finished());
        assert_eq!(replay.progress(), 1.0);
    }
}
