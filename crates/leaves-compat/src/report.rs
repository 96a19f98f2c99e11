//! Markdown compatibility report.
//!
//! One section per library, one row per case, one column per version:
//!
//! ```text
//! ## LIGHTGBM
//!
//! |        Case        |2.2.3|2.3.0|
//! |--------------------|-----|-----|
//! |LGBinaryBreastCancer|  V  |  X  |
//! ```

use crate::runner::Outcome;
use chrono::{Local, NaiveDateTime};
use leaves_venv::LibraryVariant;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

pub const PASSED: &str = "V";
pub const FAILED: &str = "X";
pub const NOT_RUN: &str = "-";

/// Renders collected outcomes as a markdown document.
pub struct ReportFormatter<'a> {
    outcomes: &'a [Outcome],
}

impl<'a> ReportFormatter<'a> {
    pub fn new(outcomes: &'a [Outcome]) -> Self {
        Self { outcomes }
    }

    pub fn head_text() -> &'static str {
        "\nThis file is autogenerated by [leaves-compat](crates/leaves-compat-cli)\n"
    }

    pub fn tail_text(generated: NaiveDateTime) -> String {
        format!(
            "\n\n## Details\n\nX - not passed, V - passed, - - not run\n\nGenerated {}\n",
            generated.format("%Y-%m-%d %H:%M")
        )
    }

    /// Render the report stamped with the current local time.
    pub fn report(&self) -> String {
        self.report_at(Local::now().naive_local())
    }

    /// Render the report stamped with `generated`.
    pub fn report_at(&self, generated: NaiveDateTime) -> String {
        let mut md = Self::head_text().to_string();

        let mut by_library: BTreeMap<LibraryVariant, Vec<&Outcome>> = BTreeMap::new();
        for outcome in self.outcomes {
            by_library
                .entry(outcome.env.library)
                .or_default()
                .push(outcome);
        }

        for (library, outcomes) in by_library {
            md.push_str(&format!("\n## {}\n\n", library.name()));
            md.push_str(&markdown_table(&library_grid(&outcomes)));
        }

        md.push_str(&Self::tail_text(generated));
        md
    }
}

/// Header row plus one row per case for a single library's outcomes.
fn library_grid(outcomes: &[&Outcome]) -> Vec<Vec<String>> {
    let cases: BTreeSet<&str> = outcomes.iter().map(|o| o.case.as_str()).collect();
    let mut versions: Vec<&str> = outcomes
        .iter()
        .map(|o| o.env.version.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    versions.sort_by(|a, b| compare_versions(a, b));

    // Later outcomes overwrite earlier ones for the same cell.
    let mut cells: HashMap<(&str, &str), bool> = HashMap::new();
    for o in outcomes {
        let key = (o.case.as_str(), o.env.version.as_str());
        if cells.insert(key, o.is_success).is_some() {
            warn!(case = %o.case, version = %o.env.version, "Duplicate outcome, keeping the latest");
        }
    }

    let mut rows = Vec::with_capacity(cases.len() + 1);
    let mut header = vec!["Case".to_string()];
    header.extend(versions.iter().map(|v| v.to_string()));
    rows.push(header);

    for case in cases {
        let mut row = vec![case.to_string()];
        row.extend(versions.iter().map(|version| {
            let mark = match cells.get(&(case, *version)) {
                Some(true) => PASSED,
                Some(false) => FAILED,
                None => NOT_RUN,
            };
            mark.to_string()
        }));
        rows.push(row);
    }
    rows
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum VersionPart<'a> {
    Num(u64),
    Text(&'a str),
}

/// Order version strings by their dot-separated components, numerically.
///
/// `1.10` sorts after `1.2`. Non-numeric components sort after numeric ones
/// and compare as text.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    fn parts(v: &str) -> Vec<VersionPart<'_>> {
        v.split('.')
            .map(|p| match p.parse() {
                Ok(n) => VersionPart::Num(n),
                Err(_) => VersionPart::Text(p),
            })
            .collect()
    }
    parts(a).cmp(&parts(b)).then_with(|| a.cmp(b))
}

/// Fixed-width markdown table; each column is as wide as its widest cell and
/// values are centered. The first row is the header.
pub fn markdown_table(rows: &[Vec<String>]) -> String {
    let Some(header) = rows.first() else {
        return "\n".to_string();
    };

    let mut widths = vec![0; header.len()];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| {
        let mut line = String::from("|");
        for (cell, width) in row.iter().zip(&widths) {
            line.push_str(&format!("{:^width$}|", cell, width = *width));
        }
        line.push('\n');
        line
    };

    let outline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut table = format_row(header);
    table.push_str(&format_row(&outline));
    for row in &rows[1..] {
        table.push_str(&format_row(row));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use leaves_venv::Environment;
    use std::path::Path;

    fn outcome(library: LibraryVariant, case: &str, version: &str, ok: bool) -> Outcome {
        Outcome {
            env: Environment::describe(Path::new("/envs"), library, version),
            case: case.to_string(),
            is_success: ok,
            reason: String::new(),
        }
    }

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap()
    }

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_markdown_table_centering() {
        let table = markdown_table(&strings(&[&["a", "gggg"], &["abc", "X"], &["c", "V"]]));
        assert_eq!(table, "| a |gggg|\n|---|----|\n|abc| X  |\n| c | V  |\n");
    }

    #[test]
    fn test_markdown_table_empty() {
        assert_eq!(markdown_table(&[]), "\n");
    }

    #[test]
    fn test_version_ordering_is_numeric() {
        let mut versions = vec!["1.2", "1.10", "0.9"];
        versions.sort_by(|a, b| compare_versions(a, b));
        assert_eq!(versions, vec!["0.9", "1.2", "1.10"]);
    }

    #[test]
    fn test_version_ordering_mixed_components() {
        let mut versions = vec!["1.0.0", "1.0", "1.0rc1", "0.90", "0.82"];
        versions.sort_by(|a, b| compare_versions(a, b));
        assert_eq!(versions, vec!["0.82", "0.90", "1.0", "1.0.0", "1.0rc1"]);
    }

    #[test]
    fn test_report_section_layout() {
        let outcomes = vec![
            outcome(LibraryVariant::LightGBM, "CaseName", "2.0", false),
            outcome(LibraryVariant::LightGBM, "CaseName", "1.0", true),
        ];
        let report = ReportFormatter::new(&outcomes).report_at(stamp());

        let expected = format!(
            "{}\n## LIGHTGBM\n\n|  Case  |1.0|2.0|\n|--------|---|---|\n|CaseName| V | X |\n{}",
            ReportFormatter::head_text(),
            ReportFormatter::tail_text(stamp())
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_columns_sorted_numerically() {
        let outcomes = vec![
            outcome(LibraryVariant::LightGBM, "Case", "1.2", true),
            outcome(LibraryVariant::LightGBM, "Case", "1.10", false),
            outcome(LibraryVariant::LightGBM, "Case", "0.9", true),
        ];
        let report = ReportFormatter::new(&outcomes).report_at(stamp());
        assert!(report.contains("|Case|0.9|1.2|1.10|\n"), "{report}");
        assert!(report.contains("|Case| V | V | X  |\n"), "{report}");
    }

    #[test]
    fn test_missing_cells_render_dash() {
        let outcomes = vec![
            outcome(LibraryVariant::XGBoost, "Alpha", "0.82", true),
            outcome(LibraryVariant::XGBoost, "Beta", "0.90", false),
        ];
        let report = ReportFormatter::new(&outcomes).report_at(stamp());
        assert!(report.contains("|Alpha| V  | -  |\n"));
        assert!(report.contains("|Beta | -  | X  |\n"));
    }

    #[test]
    fn test_sections_follow_library_order() {
        let outcomes = vec![
            outcome(LibraryVariant::Sklearn, "S", "0.21.3", true),
            outcome(LibraryVariant::LightGBM, "L", "2.3.0", true),
            outcome(LibraryVariant::XGBoost, "X", "0.90", true),
        ];
        let report = ReportFormatter::new(&outcomes).report_at(stamp());
        let xg = report.find("## XGBOOST").unwrap();
        let lg = report.find("## LIGHTGBM").unwrap();
        let sk = report.find("## SKLEARN").unwrap();
        assert!(xg < lg && lg < sk);
    }

    #[test]
    fn test_cases_sorted_lexicographically() {
        let outcomes = vec![
            outcome(LibraryVariant::LightGBM, "Zeta", "1.0", true),
            outcome(LibraryVariant::LightGBM, "Alpha", "1.0", true),
        ];
        let report = ReportFormatter::new(&outcomes).report_at(stamp());
        assert!(report.find("|Alpha|").unwrap() < report.find("|Zeta |").unwrap());
    }

    #[test]
    fn test_last_outcome_wins() {
        let outcomes = vec![
            outcome(LibraryVariant::LightGBM, "CaseName", "1.0", true),
            outcome(LibraryVariant::LightGBM, "CaseName", "1.0", false),
        ];
        let report = ReportFormatter::new(&outcomes).report_at(stamp());
        assert!(report.contains("|CaseName| X |\n"));
    }

    #[test]
    fn test_tail_timestamp_format() {
        let tail = ReportFormatter::tail_text(stamp());
        assert!(tail.ends_with("Generated 2024-03-09 07:05\n"));
        assert!(tail.contains("X - not passed, V - passed, - - not run"));
    }

    #[test]
    fn test_empty_report_has_no_sections() {
        let report = ReportFormatter::new(&[]).report_at(stamp());
        assert!(!report.contains("## XGBOOST"));
        assert!(report.starts_with(ReportFormatter::head_text()));
    }
}
