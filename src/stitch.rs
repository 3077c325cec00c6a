use log::trace;

use crate::{held_karp::Tour, point::Point};

/// Unit steps from `from` to `to`, first along `x` and then along `y`.
///
/// `from` itself is not yielded; `to` is the last item unless the points coincide,
/// in which case nothing is yielded. The walk ignores cell activity.
pub fn manhattan_path(from: Point, to: Point) -> impl Iterator<Item = Point> {
    let mut current = from;
    std::iter::from_fn(move || {
        current = if current.x < to.x {
            Point::new(current.x + 1, current.y)
        } else if current.x > to.x {
            Point::new(current.x - 1, current.y)
        } else if current.y < to.y {
            Point::new(current.x, current.y + 1)
        } else if current.y > to.y {
            Point::new(current.x, current.y - 1)
        } else {
            return None;
        };
        Some(current)
    })
}

/// Join tours into one path of unit moves, in the order given.
///
/// Empty tours are skipped. Every waypoint after the first is reached by a
/// [`manhattan_path`] from the previously emitted cell.
pub fn stitch<'a>(tours: impl IntoIterator<Item = &'a Tour>) -> Vec<Point> {
    let mut path: Vec<Point> = Vec::new();
    for tour in tours {
        for &waypoint in &tour.cells {
            match path.last().copied() {
                None => path.push(waypoint),
                Some(last) => {
                    let before = path.len();
                    path.extend(manhattan_path(last, waypoint));
                    trace!(
                        "connector {last:?} -> {waypoint:?}: {} steps",
                        path.len() - before
                    );
                }
            }
        }
    }
    path
}
