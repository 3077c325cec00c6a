//! Choose the largest region cap that keeps exact solving within a work budget.
//!
//! Solving a region of `n` nodes touches `n² · 2ⁿ` table transitions, which stands in
//! for its running time.

use log::{debug, warn};
use serde::Serialize;

use crate::{config::CalibrationConfig, grid::Mask, held_karp::MAX_EXACT_NODES, region};

/// Estimated solver work for a region with `nodes` active cells.
pub fn work(nodes: usize) -> u64 {
    (nodes as u64).pow(2) << nodes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Calibration {
    /// The chosen cap
    pub cap: usize,
    /// Regions produced at that cap
    pub regions: usize,
    /// Estimated work over all regions at that cap
    pub work: u64,
}

/// Try caps `1..=max_cap` in turn and keep the largest one that fits every budget.
///
/// Caps producing more than `max_regions` regions are skipped. The search stops at the
/// first cap whose work exceeds a budget. When no cap fits, the cap is 1.
pub fn calibrate(mask: &Mask, config: &CalibrationConfig) -> Result<Calibration, region::Error> {
    let max_cap = config.max_cap.clamp(1, MAX_EXACT_NODES);
    let mut best = None;

    for cap in 1..=max_cap {
        let (calibration, largest) = measure(mask, cap)?;
        if calibration.regions > config.max_regions {
            debug!(
                "cap {cap}: {} regions exceed the limit of {}",
                calibration.regions, config.max_regions
            );
            continue;
        }
        if largest > config.region_budget || calibration.work > config.total_budget {
            debug!(
                "cap {cap}: region work {largest}, total work {} over budget",
                calibration.work
            );
            break;
        }
        best = Some(calibration);
    }

    let best = match best {
        Some(best) => best,
        None => {
            warn!("no region cap fits the calibration budget; falling back to 1");
            measure(mask, 1)?.0
        }
    };
    debug!(
        "calibrated cap {} ({} regions, work {})",
        best.cap, best.regions, best.work
    );
    Ok(best)
}

/// Partition at `cap` and total the work, also returning the largest single region's work.
fn measure(mask: &Mask, cap: usize) -> Result<(Calibration, u64), region::Error> {
    let regions = region::partition(mask, cap)?;
    let (total, largest) = regions
        .iter()
        .map(|region| work(region.count_active(mask)))
        .fold((0u64, 0u64), |(total, largest), w| {
            (total.saturating_add(w), largest.max(w))
        });
    Ok((
        Calibration {
            cap,
            regions: regions.len(),
            work: total,
        },
        largest,
    ))
}
