//! Configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [planner]
//! strategy = "exact"
//! max_active_per_region = 20
//! start = { x = 0, y = 0 }
//!
//! [yard]
//! width = 30
//! height = 30
//! seed = 7
//! circles = { min = 3, max = 5 }
//!
//! [calibration]
//! max_regions = 100
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{held_karp::MAX_EXACT_NODES, planner::Strategy, point::Point};

mod defaults {
    use super::Bounds;

    pub fn max_active_per_region() -> usize {
        20
    }

    pub fn yard_side() -> usize {
        30
    }

    pub fn circles() -> Bounds<usize> {
        Bounds::new(3, 5)
    }

    pub fn circle_radius() -> Bounds<f64> {
        Bounds::new(2.0, 5.0)
    }

    pub fn rects() -> Bounds<usize> {
        Bounds::new(2, 4)
    }

    pub fn rect_side() -> Bounds<usize> {
        Bounds::new(2, 5)
    }

    pub fn max_cap() -> usize {
        crate::held_karp::MAX_EXACT_NODES
    }

    pub fn max_regions() -> usize {
        100
    }

    /// Work of one region at the default cap.
    pub fn region_budget() -> u64 {
        crate::calibrate::work(max_active_per_region())
    }

    pub fn total_budget() -> u64 {
        6 * region_budget()
    }
}

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub yard: YardConfig,

    #[serde(default)]
    pub calibration: CalibrationConfig,
}

/// Planning settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Which planner to run
    #[serde(default)]
    pub strategy: Strategy,

    /// Most active cells the exact strategy puts in one region
    #[serde(default = "defaults::max_active_per_region")]
    pub max_active_per_region: usize,

    /// Where the greedy strategy starts walking
    #[serde(default)]
    pub start: Point,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_active_per_region: defaults::max_active_per_region(),
            start: Point::default(),
        }
    }
}

/// An inclusive pair of limits
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

/// Random yard generation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YardConfig {
    /// Columns
    #[serde(default = "defaults::yard_side")]
    pub width: usize,

    /// Rows
    #[serde(default = "defaults::yard_side")]
    pub height: usize,

    /// RNG seed; a fresh one is drawn when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// How many round bare patches to cut
    #[serde(default = "defaults::circles")]
    pub circles: Bounds<usize>,

    /// Radius of round patches in cells (upper limit exclusive)
    #[serde(default = "defaults::circle_radius")]
    pub circle_radius: Bounds<f64>,

    /// How many rectangular bare patches to cut
    #[serde(default = "defaults::rects")]
    pub rects: Bounds<usize>,

    /// Side length of rectangular patches in cells
    #[serde(default = "defaults::rect_side")]
    pub rect_side: Bounds<usize>,
}

impl Default for YardConfig {
    fn default() -> Self {
        Self {
            width: defaults::yard_side(),
            height: defaults::yard_side(),
            seed: None,
            circles: defaults::circles(),
            circle_radius: defaults::circle_radius(),
            rects: defaults::rects(),
            rect_side: defaults::rect_side(),
        }
    }
}

/// Region cap calibration settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Largest cap to try
    #[serde(default = "defaults::max_cap")]
    pub max_cap: usize,

    /// Give up once a cap produces more regions than this
    #[serde(default = "defaults::max_regions")]
    pub max_regions: usize,

    /// Work allowed for any single region
    #[serde(default = "defaults::region_budget")]
    pub region_budget: u64,

    /// Work allowed for all regions together
    #[serde(default = "defaults::total_budget")]
    pub total_budget: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            max_cap: defaults::max_cap(),
            max_regions: defaults::max_regions(),
            region_budget: defaults::region_budget(),
            total_budget: defaults::total_budget(),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.planner.validate()?;
        self.yard.validate()?;
        if self.calibration.max_cap == 0 {
            return Err(Error::CapOutOfRange {
                cap: 0,
                max: MAX_EXACT_NODES,
            });
        }
        Ok(())
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let cap = self.max_active_per_region;
        if !(1..=MAX_EXACT_NODES).contains(&cap) {
            return Err(Error::CapOutOfRange {
                cap,
                max: MAX_EXACT_NODES,
            });
        }
        Ok(())
    }
}

impl YardConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyYard {
                width: self.width,
                height: self.height,
            });
        }
        let checks = [
            ("circles", self.circles.min <= self.circles.max),
            (
                "circle_radius",
                self.circle_radius.min < self.circle_radius.max,
            ),
            ("rects", self.rects.min <= self.rects.max),
            (
                "rect_side",
                self.rect_side.min >= 1 && self.rect_side.min <= self.rect_side.max,
            ),
        ];
        match checks.into_iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(Error::EmptyRange { field }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Toml(#[from] toml::de::Error),
    #[error("max_active_per_region must be between 1 and {max}, got {cap}")]
    CapOutOfRange { cap: usize, max: usize },
    #[error("yard must have at least one cell, got {width}x{height}")]
    EmptyYard { width: usize, height: usize },
    #[error("`{field}` range is empty")]
    EmptyRange { field: &'static str },
}
