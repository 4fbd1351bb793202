use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};

const PREFIX: &str = "Could use plot in ";

/// True when an `R` with a working png device is on PATH.
fn r_can_render_png() -> bool {
    Command::new("R")
        .args(["--slave", "--vanilla", "-e", "cat(capabilities('png'))"])
        .output()
        .map(|o| o.status.success() && String::from_utf8_lossy(&o.stdout).trim() == "TRUE")
        .unwrap_or(false)
}

fn run_rplot(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_rplot"))
        .args(args)
        .env("R_BINARY", "R")
        .env_remove("RPLOT_CURVE")
        .output()?)
}

fn announced_path(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.trim_end();
    assert!(line.starts_with(PREFIX), "unexpected stdout: {line:?}");
    line[PREFIX.len()..].to_string()
}

#[test]
fn plot_without_arguments_reports_and_removes_file() -> Result<()> {
    if !r_can_render_png() {
        println!("R with png support not found; skipping");
        return Ok(());
    }

    let output = run_rplot(&[])?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let path = announced_path(&output);
    assert!(path.contains("curve"));
    assert!(!Path::new(&path).exists());
    Ok(())
}

#[test]
fn consecutive_runs_do_not_collide() -> Result<()> {
    if !r_can_render_png() {
        println!("R with png support not found; skipping");
        return Ok(());
    }

    let first = run_rplot(&["--curve", "cubic"])?;
    let second = run_rplot(&["--curve", "cubic"])?;
    assert!(first.status.success() && second.status.success());
    assert_ne!(announced_path(&first), announced_path(&second));
    Ok(())
}

#[test]
fn broken_expression_fails_the_process() -> Result<()> {
    if !r_can_render_png() {
        println!("R with png support not found; skipping");
        return Ok(());
    }

    let output = run_rplot(&["--curve", "x +* )"])?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn missing_interpreter_fails_the_process() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_rplot"))
        .env("R_BINARY", "rplot-no-such-interpreter")
        .output()?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("rplot-no-such-interpreter"));
    Ok(())
}
