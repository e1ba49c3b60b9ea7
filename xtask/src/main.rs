//! Build automation tasks for the relay selector
//!
//! Run with: cargo xtask <command>

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Relay selector build automation")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Run the workspace tests
    Test,

    /// Run clippy with warnings denied
    Lint,

    /// Check formatting
    Fmt,

    /// Formatting, lints and tests, in that order
    Ci,

    /// Run the selection benchmarks
    Bench,

    /// Run a fuzz target for a limited time (requires cargo-fuzz and nightly)
    Fuzz {
        /// One of fuzz_catalog_json, fuzz_constraint_parse, fuzz_selection
        target: String,

        /// Time limit in seconds
        #[arg(long, default_value_t = 60)]
        seconds: u64,
    },

    /// Check a relay list with `relay-select validate`
    ValidateRelays {
        /// Relay list JSON file
        path: PathBuf,
    },

    /// Build API documentation
    Doc,
}

const FUZZ_TARGETS: [&str; 3] = ["fuzz_catalog_json", "fuzz_constraint_parse", "fuzz_selection"];

impl Task {
    /// Cargo invocations making up the task
    fn steps(&self) -> anyhow::Result<Vec<Vec<String>>> {
        let steps = match self {
            Self::Test => vec![args(&["test", "--workspace"])],
            Self::Lint => vec![args(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])],
            Self::Fmt => vec![args(&["fmt", "--all", "--check"])],
            Self::Ci => [Self::Fmt, Self::Lint, Self::Test]
                .iter()
                .map(Self::steps)
                .collect::<anyhow::Result<Vec<_>>>()?
                .concat(),
            Self::Bench => vec![args(&["bench", "-p", "relay-integration-tests"])],
            Self::Fuzz { target, seconds } => {
                if !FUZZ_TARGETS.contains(&target.as_str()) {
                    anyhow::bail!(
                        "Unknown fuzz target {}. Expected one of: {}",
                        target,
                        FUZZ_TARGETS.join(", ")
                    );
                }
                let mut step = args(&["+nightly", "fuzz", "run", target.as_str(), "--"]);
                step.push(format!("-max_total_time={seconds}"));
                vec![step]
            }
            Self::ValidateRelays { path } => {
                let mut step = args(&["run", "-p", "relay-cli", "--", "validate", "--catalog"]);
                step.push(path.display().to_string());
                vec![step]
            }
            Self::Doc => vec![args(&["doc", "--workspace", "--no-deps"])],
        };
        Ok(steps)
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| (*part).to_string()).collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    for step in cli.command.steps()? {
        println!("cargo {}", step.join(" "));
        let status = Command::new("cargo").args(&step).status()?;
        if !status.success() {
            anyhow::bail!("cargo {} failed ({})", step.join(" "), status);
        }
    }

    Ok(())
}
