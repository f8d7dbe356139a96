#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use traitgraft::TypeName;

pub fn name(raw: &str) -> TypeName {
    TypeName::parse(raw).expect("fixture names are valid")
}

pub fn graft_traits_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_graft-traits"))
}

pub fn write_fixture(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    fs::write(&path, contents).with_context(|| format!("writing fixture {}", path.display()))?;
    Ok(path)
}

/// Run `cmd` with `stdin` piped in, returning the output whatever the status.
pub fn run_with_stdin(mut cmd: Command, stdin: &str) -> Result<Output> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn command: {:?}", cmd))?;
    child
        .stdin
        .take()
        .context("child stdin unavailable")?
        .write_all(stdin.as_bytes())?;
    child
        .wait_with_output()
        .with_context(|| format!("failed to wait for command: {:?}", cmd))
}

/// Like `run_with_stdin`, but a non-zero exit is an error.
pub fn run_command(cmd: Command, stdin: &str) -> Result<Output> {
    let debug = format!("{:?}", cmd);
    let output = run_with_stdin(cmd, stdin)?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {} failed: status {:?}\nstdout: {}\nstderr: {}",
            debug,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
