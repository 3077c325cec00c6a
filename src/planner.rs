use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::{self, PlannerConfig},
    greedy,
    grid::Mask,
    held_karp,
    point::{path_cost, Point},
    region::{self, Region},
    stitch::stitch,
};

/// How to order the visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Partition into capped regions, solve each exactly, stitch in partition order.
    #[default]
    Exact,
    /// Repeatedly walk to the nearest cell still needing a visit.
    Greedy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Exact => "exact",
            Strategy::Greedy => "greedy",
        })
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Strategy::Exact),
            "greedy" => Ok(Strategy::Greedy),
            other => Err(Error::UnknownStrategy(other.to_owned())),
        }
    }
}

/// A planned coverage path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub strategy: Strategy,
    /// Cells in visiting order; consecutive cells are adjacent.
    pub path: Vec<Point>,
    /// Regions in stitching order. Empty for the greedy strategy.
    pub regions: Vec<Region>,
    /// Active cells the path could not reach.
    pub unreached: Vec<Point>,
}

impl Plan {
    pub fn is_complete(&self) -> bool {
        self.unreached.is_empty()
    }

    /// Number of unit moves along the path.
    pub fn moves(&self) -> usize {
        path_cost(&self.path)
    }
}

/// Plan a coverage path over `mask` using the configured strategy.
pub fn plan(mask: &Mask, config: &PlannerConfig) -> Result<Plan, Error> {
    config.validate()?;
    let plan = match config.strategy {
        Strategy::Exact => plan_exact(mask, config.max_active_per_region)?,
        Strategy::Greedy => {
            let (path, unreached) = greedy::cover(mask, config.start)?.into_parts();
            Plan {
                strategy: Strategy::Greedy,
                path,
                regions: Vec::new(),
                unreached,
            }
        }
    };
    debug!(
        "{} plan: {} cells, {} moves, {} regions, {} unreached",
        plan.strategy,
        plan.path.len(),
        plan.moves(),
        plan.regions.len(),
        plan.unreached.len()
    );
    Ok(plan)
}

fn plan_exact(mask: &Mask, cap: usize) -> Result<Plan, Error> {
    let regions = region::partition(mask, cap)?;
    let tours = regions
        .iter()
        .map(|&region| held_karp::solve_region(mask, region, cap))
        .collect::<Result<Vec<_>, _>>()?;
    let path = stitch(&tours);
    Ok(Plan {
        strategy: Strategy::Exact,
        path,
        regions,
        unreached: Vec::new(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown strategy \"{0}\"; expected \"exact\" or \"greedy\"")]
    UnknownStrategy(String),
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    Region(#[from] region::Error),
    #[error(transparent)]
    Solver(#[from] held_karp::Error),
    #[error(transparent)]
    Greedy(#[from] greedy::Error),
}
