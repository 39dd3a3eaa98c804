mod ic;

use clap::{Parser, ValueEnum};
use ic::{generate_ic, sample_ic_type};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trisolve_core::{
    DiffusionBootstrap, EquationKind, FixedRate, InitialProfile, LayerView, SimulationConfig,
    SimulationEngine, SolverError, StopHandle, TickSource, Unpaced,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    /// sin(pi x) for wave, unit bump on (0.4, 0.6) for diffusion
    Reference,
    Sine,
    Bump,
    /// Seeded random gaussians or plateaus
    Random,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON config file; flags given on the command line override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Equation to solve (wave|diffusion)
    #[arg(long)]
    equation: Option<EquationKind>,

    /// Number of grid intervals N (N+1 nodes)
    #[arg(long)]
    nodes: Option<usize>,

    /// Domain length L
    #[arg(long)]
    length: Option<f64>,

    /// Time step; defaults to each scheme's own policy
    #[arg(long)]
    tau: Option<f64>,

    #[arg(long, value_enum, default_value_t = ProfileArg::Reference)]
    profile: ProfileArg,

    /// Sine mode for --profile sine
    #[arg(long, default_value_t = 1)]
    mode: u32,

    /// Bootstrap diffusion with one full FTCS step instead of stable sub-steps
    #[arg(long)]
    explicit_bootstrap: bool,

    /// Safety factor for the sub-stepped diffusion bootstrap
    #[arg(long)]
    safety: Option<f64>,

    /// RNG seed for --profile random
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Number of steps to advance
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// Record a snapshot every this many steps
    #[arg(long, default_value_t = 10)]
    every: u64,

    /// Pace steps at a fixed rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Tick interval for --realtime
    #[arg(long, default_value_t = 30)]
    interval_ms: u64,

    /// Output directory for values.bin and meta.jsonl
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct MetaRow<'a> {
    snapshot_idx: u64,
    step: u64,
    time: f64,

    equation: EquationKind,
    profile: &'a str,
    nodes: usize,
    length: f64,
    tau: f64,

    max_abs: f64,
    energy: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    if args.every == 0 {
        return Err("--every must be >= 1".into());
    }

    let (cfg, profile_label) = build_config(&args)?;
    let mut engine = SimulationEngine::start(&cfg).map_err(report)?;

    let mut recorder = match &args.out {
        Some(dir) => Recorder::files(dir)?,
        None => Recorder::Log,
    };
    let label = RunLabel {
        equation: engine.equation(),
        profile: &profile_label,
        nodes: engine.grid().n(),
        length: engine.grid().length(),
        tau: engine.tau(),
    };

    let (mut ticks, stop): (Box<dyn TickSource>, StopHandle) = if args.realtime {
        let t = FixedRate::new(Duration::from_millis(args.interval_ms)).limited(args.steps);
        let stop = t.stop_handle();
        (Box::new(t), stop)
    } else {
        let t = Unpaced::limited(args.steps);
        let stop = t.stop_handle();
        (Box::new(t), stop)
    };

    recorder.record(&label, &engine.current_layer())?;

    let mut failed: Option<io::Error> = None;
    let taken = engine.run(ticks.as_mut(), |view| {
        if view.step % args.every != 0 || failed.is_some() {
            return;
        }
        if let Err(e) = recorder.record(&label, &view) {
            failed = Some(e);
            stop.stop();
        }
    })?;
    if let Some(e) = failed {
        return Err(e.into());
    }
    recorder.flush()?;

    let last = engine.current_layer();
    info!(
        steps = taken,
        time = last.time,
        max_abs = last.max_abs(),
        energy = last.energy(),
        "run finished"
    );
    if let Some(dir) = &args.out {
        println!("Wrote {} snapshots to: {}", recorder.count(), dir.display());
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<(SimulationConfig, String), Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(equation) = args.equation {
        cfg.equation = equation;
    }
    if let Some(nodes) = args.nodes {
        cfg.nodes = nodes;
    }
    if let Some(length) = args.length {
        cfg.length = length;
    }
    if args.tau.is_some() {
        cfg.tau = args.tau;
    }
    if args.explicit_bootstrap {
        cfg.diffusion_bootstrap = DiffusionBootstrap::Explicit;
    } else if let Some(safety) = args.safety {
        cfg.diffusion_bootstrap = DiffusionBootstrap::Substepped { safety };
    }

    let label = match args.profile {
        // a profile from the config file counts as the reference
        ProfileArg::Reference if cfg.profile.is_some() => "config".to_string(),
        ProfileArg::Reference => "reference".to_string(),
        ProfileArg::Sine => {
            cfg.profile = Some(InitialProfile::Sine {
                mode: args.mode,
                amplitude: 1.0,
            });
            "sine".to_string()
        }
        ProfileArg::Bump => {
            cfg.profile = Some(InitialProfile::reference(EquationKind::Diffusion));
            "bump".to_string()
        }
        ProfileArg::Random => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            let ty = sample_ic_type(&mut rng);
            cfg.profile = Some(generate_ic(&mut rng, cfg.length, ty));
            ty.as_str().to_string()
        }
    };

    cfg.validate().map_err(report)?;
    Ok((cfg, label))
}

/// Prefix configuration errors so they read as a rejected setup rather than
/// a failure mid-run.
fn report(e: SolverError) -> Box<dyn std::error::Error> {
    if e.is_configuration() {
        format!("invalid configuration: {e}").into()
    } else {
        e.into()
    }
}

fn load_config(path: &Path) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let cfg = serde_json::from_str(&text)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(cfg)
}

struct RunLabel<'a> {
    equation: EquationKind,
    profile: &'a str,
    nodes: usize,
    length: f64,
    tau: f64,
}

enum Recorder {
    Files {
        values: BufWriter<File>,
        meta: BufWriter<File>,
        count: u64,
    },
    Log,
}

impl Recorder {
    fn files(dir: &Path) -> io::Result<Recorder> {
        fs::create_dir_all(dir)?;
        let values = BufWriter::new(File::create(dir.join("values.bin"))?);
        let meta = BufWriter::new(
            OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(dir.join("meta.jsonl"))?,
        );
        Ok(Recorder::Files {
            values,
            meta,
            count: 0,
        })
    }

    fn record(&mut self, label: &RunLabel<'_>, view: &LayerView<'_>) -> io::Result<()> {
        match self {
            Recorder::Files {
                values,
                meta,
                count,
            } => {
                write_f64_vec(values, view.values)?;
                let row = MetaRow {
                    snapshot_idx: *count,
                    step: view.step,
                    time: view.time,
                    equation: label.equation,
                    profile: label.profile,
                    nodes: label.nodes,
                    length: label.length,
                    tau: label.tau,
                    max_abs: view.max_abs(),
                    energy: view.energy(),
                };
                serde_json::to_writer(&mut *meta, &row)?;
                meta.write_all(b"\n")?;
                *count += 1;
            }
            Recorder::Log => {
                info!(
                    step = view.step,
                    time = view.time,
                    max_abs = view.max_abs(),
                    energy = view.energy(),
                    "snapshot"
                );
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Recorder::Files { values, meta, .. } = self {
            values.flush()?;
            meta.flush()?;
        }
        Ok(())
    }

    fn count(&self) -> u64 {
        match self {
            Recorder::Files { count, .. } => *count,
            Recorder::Log => 0,
        }
    }
}

fn write_f64_vec<W: Write>(w: &mut W, v: &[f64]) -> io::Result<()> {
    for &x in v {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}
