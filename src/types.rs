use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::errors::BenchError;

/// Which compiler output of the samples to benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Emcc,
    Binaryen,
    O3,
}

impl Mode {
    /// Parses the short command-line code (`e`, `b` or `o`).
    pub fn from_code(code: &str) -> Result<Mode, BenchError> {
        match code {
            "e" => Ok(Mode::Emcc),
            "b" => Ok(Mode::Binaryen),
            "o" => Ok(Mode::O3),
            _ => Err(BenchError::InvalidMode {
                code: code.to_string(),
            }),
        }
    }

    /// Subdirectory of the sample root holding this mode's artifacts.
    pub fn dir_name(self) -> &'static str {
        match self {
            Mode::Emcc => "emcc",
            Mode::Binaryen => "emcc-binaryen",
            Mode::O3 => "emcc-O3",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A discovered artifact, named by its file name without the extension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    pub name: String,
    pub path: PathBuf,
}

/// Flags passed to the analysis tool after the artifact path.
pub const TOOL_FLAGS: [&str; 4] = ["-s", "--onlyfunc", "main", "--need_mapper"];

/// One execution of the analysis tool against one candidate.
///
/// Program and arguments stay as `OsString` so artifact paths that are not
/// valid UTF-8 reach the tool unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub case: String,
    /// Program to spawn, followed by its arguments.
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(candidate: &Candidate, tool: &str, interpreter: Option<&str>) -> Self {
        let mut argv: Vec<OsString> = vec![
            tool.into(),
            "-f".into(),
            candidate.path.clone().into_os_string(),
        ];
        argv.extend(TOOL_FLAGS.iter().map(OsString::from));

        let (program, args) = match interpreter {
            Some(interp) => (OsString::from(interp), argv),
            None => {
                let program = argv.remove(0);
                (program, argv)
            }
        };

        Invocation {
            case: candidate.name.clone(),
            program,
            args,
        }
    }

    /// Lossy, space-joined rendering for logs and `--dry-run`.
    pub fn command_line(&self) -> String {
        describe(&self.program, &self.args)
    }
}

pub(crate) fn describe(program: &OsStr, args: &[OsString]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, path: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn valid_codes_map_to_directories() {
        assert_eq!(Mode::from_code("e").unwrap().dir_name(), "emcc");
        assert_eq!(Mode::from_code("b").unwrap().dir_name(), "emcc-binaryen");
        assert_eq!(Mode::from_code("o").unwrap().dir_name(), "emcc-O3");
    }

    #[test]
    fn each_code_selects_a_distinct_mode() {
        let modes: Vec<Mode> = ["e", "b", "o"]
            .iter()
            .map(|c| Mode::from_code(c).unwrap())
            .collect();
        assert_eq!(modes, [Mode::Emcc, Mode::Binaryen, Mode::O3]);
    }

    #[test]
    fn invalid_codes_rejected_with_fixed_message() {
        for code in ["x", "", "E", "emcc", "eb", " e"] {
            let err = Mode::from_code(code).unwrap_err();
            assert_eq!(err.to_string(), "you must enter the valid path");
            assert!(matches!(err, BenchError::InvalidMode { code: c } if c == code));
        }
    }

    #[test]
    fn invocation_runs_tool_directly() {
        let inv = Invocation::new(&candidate("a", "/s/emcc/a.wasm"), "eunomia_entry", None);
        assert_eq!(inv.case, "a");
        assert_eq!(inv.program, OsString::from("eunomia_entry"));
        assert_eq!(
            inv.args,
            ["-f", "/s/emcc/a.wasm", "-s", "--onlyfunc", "main", "--need_mapper"]
                .map(OsString::from)
        );
    }

    #[test]
    fn invocation_with_interpreter_keeps_tool_first() {
        let inv = Invocation::new(
            &candidate("a", "/s/emcc/a.wasm"),
            "eunomia_entry",
            Some("/usr/bin/python3"),
        );
        assert_eq!(inv.program, OsString::from("/usr/bin/python3"));
        assert_eq!(inv.args[0], OsString::from("eunomia_entry"));
        assert_eq!(inv.args[1..3], ["-f", "/s/emcc/a.wasm"].map(OsString::from));
    }

    #[test]
    fn command_line_joins_with_spaces() {
        let inv = Invocation::new(&candidate("a", "d/a.wasm"), "tool", None);
        assert_eq!(
            inv.command_line(),
            "tool -f d/a.wasm -s --onlyfunc main --need_mapper"
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_artifact_path_passed_through_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from("/s/emcc").join(OsStr::from_bytes(b"bomb_\xff.wasm"));
        let inv = Invocation::new(
            &Candidate {
                name: "bomb_\u{fffd}".to_string(),
                path: path.clone(),
            },
            "tool",
            None,
        );
        assert_eq!(inv.args[1], path.into_os_string());
        assert!(inv.command_line().contains("bomb_\u{fffd}.wasm"));
    }
}
