//! Plain-text rendering of sync results and batch outcomes.

use modsync_schema::SyncResult;
use std::fmt::Write;

use super::BatchReport;

const HEADERS: [&str; 6] = ["Module", "JSON", "DB", "Status", "Action", "Message"];

fn flag(value: Option<bool>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// Table of every result; unresolved conflicts are listed last.
pub fn render_sync_table(results: &[SyncResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let ordered = results
        .iter()
        .filter(|r| !r.is_conflict())
        .chain(results.iter().filter(|r| r.is_conflict()));
    let rows: Vec<[String; 6]> = ordered
        .map(|r| {
            [
                r.module.clone(),
                flag(r.descriptor_enabled),
                flag(r.state_enabled),
                r.status.to_string(),
                r.action.to_string(),
                r.message.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let border = widths
        .iter()
        .fold(String::from("+"), |mut acc, w| {
            acc.push_str(&"-".repeat(w + 2));
            acc.push('+');
            acc
        });
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .fold(String::from("|"), |mut acc, (cell, w)| {
                let _ = write!(acc, " {cell:<width$} |", width = *w);
                acc
            })
    };

    let mut out = String::new();
    let headers = HEADERS.map(String::from);
    let _ = writeln!(out, "{border}");
    let _ = writeln!(out, "{}", line(&headers));
    let _ = writeln!(out, "{border}");
    for row in &rows {
        let _ = writeln!(out, "{}", line(row));
    }
    let _ = writeln!(out, "{border}");
    out
}

/// How to resolve conflicts, when any are left unresolved.
pub fn conflict_guidance(results: &[SyncResult]) -> Option<String> {
    let conflicts: Vec<&str> = results
        .iter()
        .filter(|r| r.is_conflict())
        .map(|r| r.module.as_str())
        .collect();
    if conflicts.is_empty() {
        return None;
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Conflicts detected in {}. Use one of these options to resolve:",
        conflicts.join(", ")
    );
    let _ = writeln!(out, "  --db-priority     : Update JSON files to match database state");
    let _ = writeln!(out, "  --json-priority   : Update database to match JSON files");
    let _ = writeln!(out, "  --force           : Same as --db-priority");
    let _ = writeln!(out, "  --dry-run         : Preview changes without applying them");
    let _ = writeln!(out, "Example: modsync sync --db-priority");
    Some(out)
}

/// One line per module of an enable/disable batch.
pub fn render_batch(report: &BatchReport) -> String {
    let mut out = String::new();
    for o in &report.outcomes {
        let mark = if o.outcome.is_success() { "ok" } else { "!!" };
        let _ = writeln!(out, "[{mark}] {}: {}", o.module, o.outcome);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{LifecycleOutcome, ModuleOutcome};
    use modsync_schema::{SyncAction, SyncStatus};
    use pretty_assertions::assert_eq;

    fn result(module: &str, status: SyncStatus, d: Option<bool>, s: Option<bool>) -> SyncResult {
        SyncResult {
            module: module.to_string(),
            status,
            action: SyncAction::None,
            message: "msg".to_string(),
            descriptor_enabled: d,
            state_enabled: s,
        }
    }

    #[test]
    fn table_puts_conflicts_last_and_marks_unknowns() {
        let results = vec![
            result("Shop", SyncStatus::Conflict, Some(true), Some(false)),
            result("Blog", SyncStatus::Error, None, None),
        ];
        let table = render_sync_table(&results);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[1],
            "| Module | JSON | DB    | Status   | Action | Message |"
        );
        assert_eq!(
            lines[3],
            "| Blog   | N/A  | N/A   | error    | none   | msg     |"
        );
        assert_eq!(
            lines[4],
            "| Shop   | true | false | conflict | none   | msg     |"
        );
        assert!(lines[0].starts_with("+--------+"));
    }

    #[test]
    fn empty_results_render_nothing() {
        assert!(render_sync_table(&[]).is_empty());
        assert!(conflict_guidance(&[]).is_none());
    }

    #[test]
    fn guidance_names_conflicting_modules_and_flags() {
        let results = vec![
            result("Shop", SyncStatus::Conflict, Some(true), Some(false)),
            result("Blog", SyncStatus::Synced, Some(true), Some(true)),
        ];
        let text = conflict_guidance(&results).unwrap();
        assert!(text.starts_with("Conflicts detected in Shop."));
        for flag in ["--db-priority", "--json-priority", "--force", "--dry-run"] {
            assert!(text.contains(flag), "missing {flag}");
        }
    }

    #[test]
    fn batch_lines_flag_failures() {
        let report = BatchReport {
            outcomes: vec![
                ModuleOutcome {
                    module: "Blog".to_string(),
                    outcome: LifecycleOutcome::Enabled,
                },
                ModuleOutcome {
                    module: "Shop".to_string(),
                    outcome: LifecycleOutcome::Aborted {
                        reason: "declined".to_string(),
                    },
                },
            ],
        };
        assert_eq!(
            render_batch(&report),
            "[ok] Blog: enabled\n[!!] Shop: aborted: declined\n"
        );
        assert!(!report.success());
    }
}
