use anyhow::{Context, Result};
use bicrit::buffer::SelectionPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod config;
mod driver;
mod provenance;

use config::FileCfg;
use provenance::Provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Bicriteria branch-and-bound demo driver")]
struct Cmd {
    /// Default log level `debug` instead of `info`; `RUST_LOG` wins when set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    Distance,
    Crowding,
}

impl From<Policy> for SelectionPolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Distance => SelectionPolicy::DistanceToFront,
            Policy::Crowding => SelectionPolicy::CrowdingDistance,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Run the demo search and write a JSON report plus provenance sidecar
    Run {
        /// TOML file with `[buffer]` and `[run]` sections
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        capacity: Option<usize>,
        #[arg(long, value_enum)]
        policy: Option<Policy>,
        /// Skip lazy re-prioritization of the global tier
        #[arg(long)]
        hypervolume_only: bool,
        #[arg(long)]
        eps: Option<f64>,
        #[arg(long)]
        max_iters: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        dim: Option<usize>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(filter)
        .init();

    match cmd.action {
        Action::Run {
            config,
            out,
            capacity,
            policy,
            hypervolume_only,
            eps,
            max_iters,
            seed,
            dim,
        } => {
            let mut cfg = FileCfg::load(config.as_deref())?;
            if let Some(v) = capacity {
                cfg.buffer.capacity = v;
            }
            if let Some(p) = policy {
                cfg.buffer.policy = p.into();
            }
            cfg.buffer.hypervolume_only |= hypervolume_only;
            if let Some(v) = eps {
                cfg.run.eps = v;
            }
            if let Some(v) = max_iters {
                cfg.run.max_iters = v;
            }
            if let Some(v) = seed {
                cfg.run.seed = v;
            }
            if let Some(v) = dim {
                cfg.run.dim = v;
            }
            run(&cfg, &out)
        }
        Action::Report => report(),
    }
}

fn run(cfg: &FileCfg, out: &Path) -> Result<()> {
    tracing::info!(out = %out.display(), ?cfg, "run");
    let report = driver::run(cfg)?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&report)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let params = serde_json::to_value(cfg)?;
    let sidecar = provenance::write_sidecar(out, Provenance::new(params))?;
    tracing::info!(report = %out.display(), sidecar = %sidecar.display(), "written");
    Ok(())
}

fn report() -> Result<()> {
    let prov = Provenance::new(serde_json::to_value(FileCfg::default())?);
    println!("{}", serde_json::to_string_pretty(&prov)?);
    Ok(())
}
