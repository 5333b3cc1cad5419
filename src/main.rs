use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ez_diffusion::io::{
    ensure_outdir, write_report_json, write_results_csv, write_summary_csv, RecoveryReport,
};
use ez_diffusion::recovery::{run_trials, RecoveryConfig};
use ez_diffusion::summary::{summarize, RecoverySummary};

#[derive(Debug, Parser)]
#[command(name = "ez-diffusion")]
#[command(about = "Simulate-and-recover validation for the EZ-diffusion model")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "output-ez-diffusion")]
    outdir: PathBuf,

    #[arg(long)]
    iterations: Option<usize>,

    #[arg(long)]
    sample_sizes: Option<String>,

    #[arg(long)]
    seed: Option<u64>,
}

fn resolve_default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("configs").join("default.toml");
    if local.exists() {
        return Some(local);
    }

    let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("configs")
        .join("default.toml");
    bundled.exists().then_some(bundled)
}

fn resolve_run_output_dir(base_outdir: &Path) -> Result<PathBuf> {
    ensure_outdir(base_outdir)?;

    let output = Command::new("date")
        .arg("-u")
        .arg("+%Y%m%d_%H%M%S")
        .output()
        .context("failed to execute date command for run timestamp")?;

    if !output.status.success() {
        bail!("date command failed while creating output run directory");
    }

    let stamp = String::from_utf8(output.stdout)
        .context("date command produced non-UTF8 output")?
        .trim()
        .to_string();
    if stamp.is_empty() {
        bail!("date command returned empty timestamp");
    }

    let mut candidate = base_outdir.join(&stamp);
    let mut suffix = 1usize;
    while candidate.exists() {
        if suffix > 999 {
            bail!(
                "failed to allocate unique run output directory under {}",
                base_outdir.display()
            );
        }
        candidate = base_outdir.join(format!("{stamp}_{suffix:03}"));
        suffix += 1;
    }

    ensure_outdir(&candidate)?;
    Ok(candidate)
}

fn parse_sample_sizes(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .with_context(|| format!("invalid sample size: {s}"))
        })
        .collect()
}

fn print_summary(summaries: &[RecoverySummary]) {
    println!("\nSummary of results:");
    for summary in summaries {
        println!(
            "N = {} ({} trials, {} failed)",
            summary.sample_size, summary.n_trials, summary.n_failed
        );
        for (label, stats) in [
            ("drift", &summary.drift),
            ("boundary", &summary.boundary),
            ("nondecision", &summary.nondecision),
        ] {
            println!(
                "  {label:<12} bias mean {:>10.6}  bias std {:>10.6}  mse {:>10.6}",
                stats.bias_mean, stats.bias_std, stats.mse
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if let Some(path) = &cli.config {
        RecoveryConfig::from_toml_file(path)?
    } else if let Some(path) = resolve_default_config_path() {
        RecoveryConfig::from_toml_file(&path)?
    } else {
        RecoveryConfig::default()
    };

    if let Some(iterations) = cli.iterations {
        config.n_iterations = iterations;
    }
    if let Some(raw) = &cli.sample_sizes {
        config.sample_sizes = parse_sample_sizes(raw)?;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate()?;

    let run_outdir = resolve_run_output_dir(&cli.outdir)?;

    println!(
        "Running simulate-and-recover with {} iterations for each sample size",
        config.n_iterations
    );

    let start = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.total_trials());

    for &sample_size in &config.sample_sizes {
        println!("Processing sample size N = {sample_size}");
        run_trials(&mut rng, sample_size, config.n_iterations, &mut records);
        println!(
            "  finished {} iterations (elapsed {:.2}s)",
            config.n_iterations,
            start.elapsed().as_secs_f64()
        );
    }

    let summaries = summarize(&records);

    write_results_csv(&run_outdir.join("results.csv"), &records)?;
    write_summary_csv(&run_outdir.join("summary.csv"), &summaries)?;
    write_report_json(
        &run_outdir,
        &RecoveryReport {
            n_iterations: config.n_iterations,
            sample_sizes: config.sample_sizes.clone(),
            seed: config.seed,
            summaries: summaries.clone(),
        },
    )?;

    print_summary(&summaries);
    println!("\nwrote outputs to {}", run_outdir.display());
    Ok(())
}
