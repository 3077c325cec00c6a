use std::{error::Error, fs, path::PathBuf};

use clap::Parser;
use log::{info, warn};
use mow_planner::{
    area_extremes, calibrate, generate_yard, plan, Config, Mask, Replay, Strategy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Plan a path that services every grass cell of a yard.
#[derive(Debug, Parser)]
#[command(name = "mow", version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mask file ('#' grass, '.' bare); a random yard is generated when absent
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Planner to run: exact or greedy
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Most grass cells per region for the exact planner
    #[arg(long)]
    cap: Option<usize>,

    /// Pick the region cap from the calibration budget
    #[arg(long)]
    calibrate: bool,

    /// Generated yard width
    #[arg(long)]
    width: Option<usize>,

    /// Generated yard height
    #[arg(long)]
    height: Option<usize>,

    /// Generated yard seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the plan as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(strategy) = args.strategy {
        config.planner.strategy = strategy;
    }
    if let Some(cap) = args.cap {
        config.planner.max_active_per_region = cap;
    }
    if let Some(width) = args.width {
        config.yard.width = width;
    }
    if let Some(height) = args.height {
        config.yard.height = height;
    }
    if args.seed.is_some() {
        config.yard.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn load_mask(args: &Args, config: &Config) -> Result<Mask, Box<dyn Error>> {
    if let Some(path) = &args.mask {
        return Ok(fs::read_to_string(path)?.parse()?);
    }
    let seed = config.yard.seed.unwrap_or_else(rand::random);
    info!("generating {}x{} yard with seed {seed}", config.yard.width, config.yard.height);
    Ok(generate_yard(
        &config.yard,
        &mut ChaCha8Rng::seed_from_u64(seed),
    )?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = load_config(&args)?;
    let mask = load_mask(&args, &config)?;

    if args.calibrate {
        let calibration = calibrate(&mask, &config.calibration)?;
        info!(
            "calibrated region cap {} ({} regions)",
            calibration.cap, calibration.regions
        );
        config.planner.max_active_per_region = calibration.cap;
    }

    let plan = plan(&mask, &config.planner)?;
    let mut replay = Replay::new(&mask, &plan.path);
    replay.finish();

    if !plan.is_complete() {
        warn!("{} grass cells could not be reached", plan.unreached.len());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    print!("{mask}");
    println!();
    println!("strategy:  {}", plan.strategy);
    println!("yard:      {}x{}", mask.width(), mask.height());
    if plan.strategy == Strategy::Exact {
        println!(
            "regions:   {} (cap {})",
            plan.regions.len(),
            config.planner.max_active_per_region
        );
        if let Some((smallest, largest)) = area_extremes(&plan.regions) {
            println!("smallest:  {smallest:?} ({} cells)", smallest.area());
            println!("largest:   {largest:?} ({} cells)", largest.area());
        }
    }
    println!("path:      {} cells, {} moves", plan.path.len(), plan.moves());
    println!(
        "serviced:  {}/{} ({:.1}%)",
        replay.serviced_count(),
        replay.total_active(),
        replay.progress() * 100.0
    );
    Ok(())
}
