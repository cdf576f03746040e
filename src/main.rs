//! Benchmark runner: random square products, sequential vs. worker pool.

use std::{fs::File, io::BufWriter, num::NonZeroUsize, path::PathBuf};

use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser};
use matmul_pool::{
    Config, Element,
    trial::{Summary, TrialLog, TrialSettings, run_trial},
};
use rand::{SeedableRng, rngs::StdRng};

/// Times the threaded multiplication against the triple loop over many
/// randomly sized square matrices and logs every trial.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Number of trials to run.
    #[clap(long, default_value_t = 500)]
    trials: usize,

    /// Worker threads for the threaded path.
    ///
    /// Defaults to MATMUL_WORKER_THREADS, or 4 when that is unset.
    #[clap(short, long)]
    threads: Option<NonZeroUsize>,

    /// Dimensions are twice a uniform draw from 1..=this value.
    #[clap(long, default_value_t = 100)]
    max_half_dimension: usize,

    /// Smallest matrix entry.
    #[clap(long, default_value_t = 1, allow_hyphen_values = true)]
    min_value: Element,

    /// Largest matrix entry.
    #[clap(long, default_value_t = 100, allow_hyphen_values = true)]
    max_value: Element,

    /// Seed for reproducible operands; random when omitted.
    #[clap(long)]
    seed: Option<u64>,

    /// Where to write the per-trial log.
    #[clap(long, default_value = "matrix_multiplication_log.txt")]
    log: PathBuf,

    /// Check that both paths produce the same matrix on every trial.
    #[clap(long)]
    verify: bool,

    #[clap(flatten)]
    verbosity: Verbosity,
}

/// Configures the verbosity of the builtin logger.
#[derive(Clone, Copy, Debug, Args)]
struct Verbosity {
    /// `-v` is Debug, `-vv` is Trace.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

impl Verbosity {
    fn setup(self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => log::Level::Info,
            1 => log::Level::Debug,
            _ => log::Level::Trace,
        };
        simple_logger::init_with_level(level).context("failed to install logger")
    }
}

impl Cli {
    fn settings(&self) -> anyhow::Result<TrialSettings> {
        if self.max_half_dimension == 0 {
            bail!("--max-half-dimension must be at least 1");
        }
        if self.min_value > self.max_value {
            bail!(
                "--min-value ({}) is greater than --max-value ({})",
                self.min_value,
                self.max_value
            );
        }

        let config = match self.threads {
            Some(threads) => Config { threads },
            None => Config::from_env()?,
        };

        Ok(TrialSettings {
            config,
            max_half_dimension: self.max_half_dimension,
            values: self.min_value..=self.max_value,
            verify: self.verify,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.verbosity.setup()?;

    let settings = cli.settings()?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let file = File::create(&cli.log)
        .with_context(|| format!("failed to create log file {}", cli.log.display()))?;
    let mut trial_log = TrialLog::new(BufWriter::new(file));

    log::info!(
        "running {} trials with {} worker threads",
        cli.trials,
        settings.config.threads
    );

    let mut records = Vec::with_capacity(cli.trials);
    for n in 1..=cli.trials {
        let record = run_trial(&settings, &mut rng).with_context(|| format!("trial #{n} failed"))?;
        trial_log
            .append(&record)
            .with_context(|| format!("failed to write {}", cli.log.display()))?;

        log::debug!("trial #{n}: {:.2}x speedup", record.speedup());
        records.push(record);
    }

    trial_log
        .finish()
        .with_context(|| format!("failed to flush {}", cli.log.display()))?;

    let summary = Summary::from_records(&records);
    log::info!(
        "{} trials: sequential mean {:?}, threaded mean {:?}",
        summary.trials,
        summary.mean_sequential,
        summary.mean_threaded
    );
    log::info!("log written to {}", cli.log.display());

    Ok(())
}
