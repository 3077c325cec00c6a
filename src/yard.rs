//! Random irregular yards: a full lawn with round and rectangular bare patches cut out.

use rand::Rng;

use crate::{
    config::{self, YardConfig},
    grid::Mask,
    point::Point,
};

/// Generate a yard mask. Active cells are grass.
///
/// The same configuration and RNG state always produce the same yard.
pub fn generate(config: &YardConfig, rng: &mut impl Rng) -> Result<Mask, config::Error> {
    config.validate()?;
    let (width, height) = (config.width, config.height);
    let mut mask = Mask::filled(width, height, true);

    let circles = rng.gen_range(config.circles.min..=config.circles.max);
    for _ in 0..circles {
        let cx = rng.gen_range(0.0..width as f64);
        let cy = rng.gen_range(0.0..height as f64);
        let radius = rng.gen_range(config.circle_radius.min..config.circle_radius.max);
        clear_circle(&mut mask, cx, cy, radius);
    }

    let rects = rng.gen_range(config.rects.min..=config.rects.max);
    for _ in 0..rects {
        let w = rng.gen_range(config.rect_side.min..=config.rect_side.max).min(width);
        let h = rng.gen_range(config.rect_side.min..=config.rect_side.max).min(height);
        let x0 = rng.gen_range(0..=width - w);
        let y0 = rng.gen_range(0..=height - h);
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask[Point::new(x, y)] = false;
            }
        }
    }

    Ok(mask)
}

fn clear_circle(mask: &mut Mask, cx: f64, cy: f64, radius: f64) {
    for point in mask.points().collect::<Vec<_>>() {
        let (dx, dy) = (point.x as f64 - cx, point.y as f64 - cy);
        if dx.hypot(dy) < radius {
            mask[point] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn same_seed_same_yard() {
        let config = YardConfig::default();
        let a = generate(&config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = generate(&config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn yard_has_configured_shape_and_patches() {
        let config = YardConfig {
            width: 30,
            height: 20,
            ..YardConfig::default()
        };
        let mask = generate(&config, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!((mask.width(), mask.height()), (30, 20));
        let bare = 30 * 20 - mask.count_active();
        // at least two rectangles of at least 2x2 are cut
        assert!(bare >= 4, "only {bare} bare cells");
        assert!(mask.count_active() > 0);
    }

    #[test]
    fn no_patches_leaves_full_lawn() {
        let config = YardConfig {
            width: 5,
            height: 4,
            circles: Bounds::new(0, 0),
            rects: Bounds::new(0, 0),
            ..YardConfig::default()
        };
        let mask = generate(&config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(mask.count_active(), 20);
    }

    #[test]
    fn rectangles_larger_than_yard_are_clipped() {
        let config = YardConfig {
            width: 2,
            height: 2,
            circles: Bounds::new(0, 0),
            rects: Bounds::new(1, 1),
            rect_side: Bounds::new(5, 5),
            ..YardConfig::default()
        };
        let mask = generate(&config, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(mask.count_active(), 0);
    }

    #[test]
    fn empty_yard_is_rejected() {
        let config = YardConfig {
            width: 0,
            ..YardConfig::default()
        };
        assert!(matches!(
            generate(&config, &mut ChaCha8Rng::seed_from_u64(0)),
            Err(config::Error::EmptyYard { .. })
        ));
    }
}
