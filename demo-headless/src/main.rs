use clap::Parser;
use fire_kernels_core::{BurnParams, FireSimulation, FireSimulationConfig, FuelEmitter, Vec3};
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Grid smoke and fire demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "fire-kernels-demo")]
#[command(about = "Headless smoke and fire combustion demo", long_about = None)]
struct Args {
    /// Cells along x
    #[arg(long, default_value_t = 64)]
    nx: usize,

    /// Cells along y
    #[arg(long, default_value_t = 64)]
    ny: usize,

    /// Cells along z (ignored with --planar)
    #[arg(long, default_value_t = 32)]
    nz: usize,

    /// Run on a single 2D layer
    #[arg(long)]
    planar: bool,

    /// Number of steps to run
    #[arg(short, long, default_value_t = 200)]
    steps: u32,

    /// Print statistics every N steps
    #[arg(short, long, default_value_t = 20)]
    report_interval: u32,

    /// Time step in simulation units
    #[arg(long)]
    dt: Option<f32>,

    /// Fuel consumed per unit time
    #[arg(long)]
    burning_rate: Option<f32>,

    /// Track smoke color channels
    #[arg(short, long)]
    color: bool,

    /// Relative jitter of the central fuel source (0 = uniform)
    #[arg(long, default_value_t = 0.1)]
    jitter: f32,

    /// Seed for the fuel source jitter
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// TOML file with a full simulation config, replaces the grid flags
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Top-level layout of a `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    steps: Option<u32>,
    report_interval: Option<u32>,
    simulation: FireSimulationConfig,
}

fn load_config(path: &Path) -> Result<DemoConfig, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let config = toml::from_str(&text)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Box of roughly a quarter of the extent around the middle of `n` cells
fn centered(n: usize) -> (usize, usize) {
    let half = (n / 8).max(1);
    let min = (n / 2).saturating_sub(half);
    (min, (min + 2 * half).min(n))
}

fn config_from_args(args: &Args) -> FireSimulationConfig {
    let nz = if args.planar { 1 } else { args.nz };

    let mut params = BurnParams::default();
    if let Some(dt) = args.dt {
        params = params.with_dt(dt);
    }
    if let Some(rate) = args.burning_rate {
        params = params.with_burning_rate(rate);
    }

    let (x0, x1) = centered(args.nx);
    let (y0, y1) = centered(args.ny);
    let (z0, z1) = if nz > 1 { centered(nz) } else { (0, 1) };
    let source =
        FuelEmitter::new([x0, y0, z0], [x1, y1, z1], 1.0, 1.0).with_jitter(args.jitter, args.seed);

    FireSimulationConfig {
        nx: args.nx,
        ny: args.ny,
        nz,
        color: args.color.then(Vec3::zeros),
        params,
        emitters: vec![source],
        ..Default::default()
    }
}

fn print_report(sim: &FireSimulation) {
    let stats = sim.stats();
    println!(
        "{:5} | {:7.2} | {:10.2} | {:10.2} | {:8} | {:9.3} | {:9}",
        sim.step_count(),
        sim.simulation_time(),
        stats.total_fuel,
        stats.total_density,
        stats.burning_cells,
        stats.max_flame,
        stats
            .mean_heat
            .map_or_else(|| "-".to_string(), |heat| format!("{heat:.4}")),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("=== Fire Kernels Demo ===\n");

    let (config, steps, report_interval) = match &args.config {
        Some(path) => {
            let demo = load_config(path)?;
            (
                demo.simulation,
                demo.steps.unwrap_or(args.steps),
                demo.report_interval.unwrap_or(args.report_interval),
            )
        }
        None => (config_from_args(&args), args.steps, args.report_interval),
    };

    let mut sim = FireSimulation::from_config(&config)?;
    let dims = sim.fields().dims();
    let params = sim.params();
    println!(
        "Grid {} ({}), {} kernel cells",
        dims,
        if dims.is_3d() { "3D" } else { "2D" },
        sim.region().cell_count()
    );
    println!(
        "Burning rate {:.2}, flame smoke {:.2}, temperatures {:.2}..{:.2}, dt {:.3}",
        params.burning_rate, params.flame_smoke, params.ignition_temp, params.max_temp, params.dt
    );
    println!("Fuel sources: {}\n", config.emitters.len());

    println!(" Step |    Time |       Fuel |      Smoke |  Burning | Max flame | Mean heat");
    println!("------|---------|------------|------------|----------|-----------|----------");
    print_report(&sim);

    let report_interval = u64::from(report_interval.max(1));
    let mut next_report = report_interval;
    for _ in 0..steps {
        sim.step()?;
        if sim.step_count() >= next_report {
            print_report(&sim);
            next_report += report_interval;
        }
    }

    let stats = sim.stats();
    println!("\n=== Simulation Complete ===");
    println!("Steps: {}", sim.step_count());
    println!("Final time: {:.2}", sim.simulation_time());
    println!("{stats}");

    Ok(())
}
