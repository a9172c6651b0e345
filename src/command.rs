//! External tool invocations.
//!
//! Every call to `ffmpeg`/`ffprobe` is described by an [`FfCommand`] and handed
//! to a [`ToolRunner`]. [`SystemRunner`] spawns the real binaries.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::{get_stdout, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
}

impl Tool {
    pub fn name(self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
        }
    }

    /// Location of the binary, `<dir>/<name><EXE_SUFFIX>`. Without a directory
    /// the bare name is returned and left to `PATH` lookup.
    pub fn path(self, dir: Option<&Path>) -> PathBuf {
        let file = format!("{}{}", self.name(), std::env::consts::EXE_SUFFIX);
        match dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfCommand {
    pub tool: Tool,
    pub args: Vec<String>,
}

impl FfCommand {
    pub fn new(tool: Tool, args: Vec<String>) -> Self {
        FfCommand { tool, args }
    }
}

impl fmt::Display for FfCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool.name())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

pub trait ToolRunner {
    /// Runs the command to completion; a non-zero exit is an error.
    fn run(&mut self, command: &FfCommand) -> Result<()>;

    /// Runs the command to completion and returns what it wrote to stdout.
    fn capture(&mut self, command: &FfCommand) -> Result<String>;
}

pub struct SystemRunner {
    ff_dir: Option<PathBuf>,
    debug_ffmpeg: bool,
}

impl SystemRunner {
    pub fn new(ff_dir: Option<PathBuf>, debug_ffmpeg: bool) -> Self {
        SystemRunner {
            ff_dir,
            debug_ffmpeg,
        }
    }

    fn command(&self, command: &FfCommand) -> Command {
        let program = command.tool.path(self.ff_dir.as_deref());
        debug!("Executing: {} ({})", command, program.display());
        let mut cmd = Command::new(program);
        cmd.args(&command.args).stdin(Stdio::null());
        cmd
    }
}

impl ToolRunner for SystemRunner {
    fn run(&mut self, command: &FfCommand) -> Result<()> {
        let status = self
            .command(command)
            .stdout(get_stdout(self.debug_ffmpeg))
            .stderr(get_stdout(self.debug_ffmpeg))
            .status()
            .map_err(|source| spawn_error(command, source))?;
        if !status.success() {
            return Err(Error::ToolFailed {
                tool: command.tool.name().to_string(),
                status,
            });
        }
        Ok(())
    }

    fn capture(&mut self, command: &FfCommand) -> Result<String> {
        let output = self
            .command(command)
            .stdout(Stdio::piped())
            .stderr(get_stdout(self.debug_ffmpeg))
            .output()
            .map_err(|source| spawn_error(command, source))?;
        if !output.status.success() {
            return Err(Error::ToolFailed {
                tool: command.tool.name().to_string(),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn spawn_error(command: &FfCommand, source: std::io::Error) -> Error {
    Error::ToolSpawn {
        tool: command.tool.name().to_string(),
        source,
    }
}
