use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("you must enter the valid path")]
    InvalidMode { code: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {detail}")]
    ConfigParseError { path: PathBuf, detail: String },

    #[error("Repetition count must be at least 1")]
    ZeroRepetitions,

    #[error("Failed to walk sample directory {path}: {source}")]
    WalkError {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Case '{case}' failed: {source}")]
    ToolFailed {
        case: String,
        source: ProcessError,
    },
}

/// Failure reported by a [`crate::launcher::Launcher`].
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("\n\n  RAN: {command}\n\n  STATUS: {status}\n\n  STDOUT:\n{stdout}\n\n  STDERR:\n{stderr}")]
    NonZeroExit {
        command: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}
