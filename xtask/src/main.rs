//! Development automation tasks for the erpbridge workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! Output is meant for a developer terminal, hence plain `println!`.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::{bail, Context};

/// Crates whose tests hit a mock HTTP server.
const NETWORK_TEST_CRATES: &[&str] = &["erpbridge-infra"];

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("test-offline") => run_test_offline(),
        Some("doc") => run_doc(),
        Some("deny") => run_deny(),
        Some("audit") => run_audit(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("erpbridge Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci            Run all CI checks (fmt, clippy, test, doc, deny, audit)");
    println!("    fmt           Check Rust code formatting");
    println!("    clippy        Run Clippy lints on every target");
    println!("    test          Run all workspace tests");
    println!("    test-offline  Run tests of crates that need no local sockets");
    println!("    doc           Build docs and run doctests");
    println!("    deny          Check dependencies with cargo-deny");
    println!("    audit         Audit dependencies for security vulnerabilities");
    println!("    help          Show this help message");
}

/// Run all CI checks in sequence
fn run_ci() -> anyhow::Result<()> {
    let steps: [(&str, fn() -> anyhow::Result<()>); 6] = [
        ("Checking format", run_fmt),
        ("Running Clippy", run_clippy),
        ("Running tests", run_test),
        ("Building docs", run_doc),
        ("Checking dependencies", run_deny),
        ("Auditing dependencies", run_audit),
    ];

    for (index, (label, step)) in steps.iter().enumerate() {
        println!("\n==> Step {}/{}: {label}...", index + 1, steps.len());
        step()?;
    }

    println!("\n✓ All CI checks passed!");
    Ok(())
}

fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "Format check failed. Run 'cargo fmt --all' to fix.")
}

fn run_clippy() -> anyhow::Result<()> {
    cargo(
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        "Clippy run failed. See output above.",
    )
}

fn run_test() -> anyhow::Result<()> {
    cargo(&["test", "--workspace"], "Tests failed")
}

/// Everything except the wiremock-backed suites.
fn run_test_offline() -> anyhow::Result<()> {
    let mut args = vec!["test", "--workspace"];
    for krate in NETWORK_TEST_CRATES {
        args.extend(["--exclude", krate]);
    }
    cargo(&args, "Offline tests failed")
}

fn run_doc() -> anyhow::Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"], "Documentation build failed")?;
    cargo(&["test", "--workspace", "--doc"], "Doctests failed")
}

fn run_deny() -> anyhow::Result<()> {
    ensure_subcommand("deny")?;
    cargo(&["deny", "check"], "cargo-deny found issues")
}

fn run_audit() -> anyhow::Result<()> {
    ensure_subcommand("audit")?;
    cargo(&["audit"], "cargo-audit found vulnerabilities")
}

/// Run `cargo <args>` and bail with `failure` on a non-zero exit.
fn cargo(args: &[&str], failure: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("Failed to spawn cargo {}", args.join(" ")))?;

    if !status.success() {
        bail!("{failure}");
    }
    Ok(())
}

/// Fail early with an install hint when `cargo <name>` is unavailable.
fn ensure_subcommand(name: &str) -> anyhow::Result<()> {
    let installed = Command::new("cargo")
        .args([name, "--version"])
        .output()
        .is_ok_and(|output| output.status.success());

    if !installed {
        eprintln!("cargo-{name} is not installed.");
        eprintln!("Install it with: cargo install cargo-{name}");
        bail!("cargo-{name} not found");
    }
    Ok(())
}
