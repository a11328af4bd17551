use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::runner::{ResultTable, format_seconds};
use crate::types::{Invocation, Mode};

pub const BANNER: &str = r"
 _____
|   __|_ _ ___ ___ ___ ___ ___
|__   | | |  _|  _| -_|_ -|_ -|
|_____|___|___|___|___|___|___|
";

/// Progress line printed as each case starts: `Case:  <name>`, two spaces,
/// matching the older Python harness output.
pub fn format_case_line(invocation: &Invocation) -> String {
    format!(
        "{}  {}",
        "Case:".if_supports_color(Stream::Stdout, |s| s.cyan()),
        invocation.case
    )
}

/// One `case,time1,time2,...` line per row, in table order.
pub fn format_table(table: &ResultTable) -> String {
    let mut out = String::new();
    for (case, samples) in table.rows() {
        out.push_str(case);
        for sample in samples {
            out.push(',');
            out.push_str(&format_seconds(*sample));
        }
        out.push('\n');
    }
    out
}

pub fn format_banner() -> String {
    BANNER
        .if_supports_color(Stream::Stdout, |s| s.green())
        .to_string()
}

/// Command lines for `--dry-run`, one per invocation.
pub fn format_plan(invocations: &[Invocation]) -> String {
    let mut out = String::new();
    for invocation in invocations {
        out.push_str(&invocation.command_line());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonRow<'a> {
    case: &'a str,
    times: Vec<String>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    mode: &'static str,
    directory: String,
    repetitions: u32,
    started_at: String,
    results: Vec<JsonRow<'a>>,
    failed: Option<&'a str>,
}

/// Everything the JSON report needs besides the table.
pub struct ReportMeta<'a> {
    pub mode: Mode,
    pub directory: &'a std::path::Path,
    pub repetitions: u32,
    pub started_at: DateTime<Utc>,
}

pub fn format_json(meta: &ReportMeta<'_>, table: &ResultTable, failed: Option<&str>) -> String {
    let report = JsonReport {
        mode: meta.mode.dir_name(),
        directory: meta.directory.to_string_lossy().into_owned(),
        repetitions: meta.repetitions,
        started_at: meta.started_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        results: table
            .rows()
            .map(|(case, samples)| JsonRow {
                case,
                times: samples.iter().map(|s| format_seconds(*s)).collect(),
            })
            .collect(),
        failed,
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-02-18T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample_table() -> ResultTable {
        let mut table = ResultTable::new();
        table.record("a", Duration::from_millis(1500));
        table.record("a", Duration::from_millis(20));
        table.record("b", Duration::from_millis(7));
        table
    }

    #[test]
    fn table_lines_are_comma_separated() {
        assert_eq!(format_table(&sample_table()), "a,1.500,0.020\nb,0.007\n");
    }

    #[test]
    fn empty_table_prints_nothing() {
        assert_eq!(format_table(&ResultTable::new()), "");
    }

    #[test]
    fn every_time_has_three_decimals() {
        let out = format_table(&sample_table());
        for line in out.lines() {
            for field in line.split(',').skip(1) {
                let (whole, frac) = field.split_once('.').unwrap();
                assert!(whole.parse::<u64>().is_ok(), "bad field {field}");
                assert_eq!(frac.len(), 3, "bad field {field}");
            }
        }
    }

    #[test]
    fn banner_spells_success() {
        assert!(BANNER.contains("|_____|___|___|___|___|___|___|"));
        assert!(BANNER.starts_with('\n'));
    }

    #[test]
    fn case_line_names_case() {
        let inv = Invocation::new(
            &Candidate {
                name: "loop_bomb".to_string(),
                path: PathBuf::from("x/loop_bomb.wasm"),
            },
            "tool",
            None,
        );
        let line = format_case_line(&inv);
        assert!(line.ends_with("  loop_bomb"), "got: {line:?}");
        assert!(line.contains("Case:"));
    }

    #[test]
    fn plan_lists_command_lines() {
        let inv = Invocation::new(
            &Candidate {
                name: "a".to_string(),
                path: PathBuf::from("d/a.wasm"),
            },
            "eunomia_entry",
            None,
        );
        assert_eq!(
            format_plan(&[inv]),
            "eunomia_entry -f d/a.wasm -s --onlyfunc main --need_mapper\n"
        );
    }

    #[test]
    fn json_report_fields() {
        let meta = ReportMeta {
            mode: Mode::Binaryen,
            directory: Path::new("/samples/emcc-binaryen"),
            repetitions: 2,
            started_at: fixed_now(),
        };
        let out = format_json(&meta, &sample_table(), None);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["mode"], "emcc-binaryen");
        assert_eq!(parsed["directory"], "/samples/emcc-binaryen");
        assert_eq!(parsed["repetitions"], 2);
        assert_eq!(parsed["started_at"], "2026-02-18T00:00:00Z");
        assert!(parsed["failed"].is_null());

        let results = parsed["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["case"], "a");
        assert_eq!(results[0]["times"], serde_json::json!(["1.500", "0.020"]));
        assert_eq!(results[1]["case"], "b");
    }

    #[test]
    fn json_report_records_failed_case() {
        let meta = ReportMeta {
            mode: Mode::Emcc,
            directory: Path::new("s/emcc"),
            repetitions: 1,
            started_at: fixed_now(),
        };
        let out = format_json(&meta, &ResultTable::new(), Some("b"));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["failed"], "b");
        assert!(parsed["results"].as_array().unwrap().is_empty());
    }
}
