mod calibrate;
mod config;
mod greedy;
mod grid;
mod held_karp;
mod planner;
mod point;
mod region;
mod replay;
mod stitch;
mod yard;

pub use calibrate::{calibrate, work, Calibration};
pub use config::{Bounds, CalibrationConfig, Config, PlannerConfig, YardConfig};
pub use greedy::{cover, cover_with_obstacles, Coverage};
pub use grid::{Grid, Mask};
pub use held_karp::{solve, solve_region, Tour, MAX_EXACT_NODES};
pub use planner::{plan, Plan, Strategy};
pub use point::{path_cost, Point};
pub use region::{area_extremes, partition, partition_region, Region};
pub use replay::Replay;
pub use stitch::{manhattan_path, stitch};
pub use yard::generate as generate_yard;

/// Error types of each stage.
pub mod error {
    pub use crate::config::Error as ConfigError;
    pub use crate::greedy::Error as GreedyError;
    pub use crate::grid::Error as GridError;
    pub use crate::held_karp::Error as SolverError;
    pub use crate::planner::Error as PlanError;
    pub use crate::region::Error as RegionError;
}
