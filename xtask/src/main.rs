use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for geomrep")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run the replicator benchmarks in release mode
    Bench,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the demo field and run wind through the CLI
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Bench => run_bench()?,
        Commands::Doc => run_doc()?,
        Commands::Demo => run_demo()?,
    }

    Ok(())
}

/// Run `cargo <args>`, failing with `what` if it exits unsuccessfully.
fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("cargo fmt check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "cargo clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn run_tests() -> Result<()> {
    cargo("cargo test", &["test", "--workspace"])
}

fn run_bench() -> Result<()> {
    cargo(
        "replicator bench",
        &["bench", "--package", "geomrep-replicator", "--bench", "bench_replicate"],
    )
}

fn run_doc() -> Result<()> {
    cargo("cargo doc", &["doc", "--workspace", "--no-deps"])
}

fn run_demo() -> Result<()> {
    cargo(
        "replicate demo",
        &["run", "--release", "--package", "geomrep-cli", "--", "replicate"],
    )?;
    cargo(
        "wind demo",
        &["run", "--release", "--package", "geomrep-cli", "--", "wind", "--pause-halfway"],
    )
}
