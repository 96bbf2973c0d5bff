//! Running the external fuel-cycle simulator.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PROGRAM: &str = "cyclus";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorRun {
    pub program: String,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

impl SimulatorRun {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            input: input.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// `<program> <input> [-o <output>]`
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.input);
        if let Some(output) = &self.output {
            cmd.arg("-o").arg(output);
        }
        cmd
    }
}

/// Run to completion. Returns the simulator's stdout.
pub fn run_simulator(run: &SimulatorRun) -> AppResult<String> {
    if !run.input.exists() {
        return Err(AppError::InvalidInput(format!(
            "simulator input not found: {}",
            run.input.display()
        )));
    }

    tracing::info!(
        program = %run.program,
        input = %run.input.display(),
        output = ?run.output.as_deref().map(Path::display),
        "starting simulator"
    );

    let output = run
        .command()
        .output()
        .map_err(|source| AppError::SimulatorLaunch {
            program: run.program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(AppError::Simulator {
            program: run.program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tracing::info!(program = %run.program, "simulator finished");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
