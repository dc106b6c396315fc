use std::fmt::Write;

use comfy_table::Cell;

use crate::providers::gitlab::{Action, RunOutcome, RunReport};

use super::styling::{bright, bright_green, bright_yellow, cyan, dim};
use super::tables::{action_cell, create_table, cyan_header};

const SHORT_SHA_LEN: usize = 8;

/// Prints what the run did to stdout.
///
/// A completed run gets an overview followed by one table row per running
/// pipeline, in the order GitLab returned them.
pub fn print_summary(outcome: &RunOutcome) {
    println!("{}", render_summary(outcome));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn short_sha(sha: &str) -> &str {
    sha.get(..SHORT_SHA_LEN).unwrap_or(sha)
}

fn count(report: &RunReport, predicate: impl Fn(&Action) -> bool) -> usize {
    report.entries.iter().filter(|entry| predicate(&entry.action)).count()
}

fn render_summary(outcome: &RunOutcome) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "🧹", "Summary");

    let report = match outcome {
        RunOutcome::NothingToCancel { reference } => {
            let _ = writeln!(
                output,
                "  {} {}\n  {}",
                dim("Ref:"),
                cyan(reference),
                bright_green("No running pipelines, nothing to cancel.")
            );
            return output;
        }
        RunOutcome::Completed(report) => report,
    };

    let canceled = count(report, |action| matches!(action, Action::Canceled { .. }));
    let would_cancel = count(report, |action| matches!(action, Action::WouldCancel));
    let ignored = count(report, |action| matches!(action, Action::Ignored(_)));

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Ref:"),
        cyan(&report.reference),
        dim("Latest sha:"),
        cyan(&report.latest_sha),
        dim("Running pipelines:"),
        bright_yellow(report.entries.len()),
        dim("Cancel requests sent:"),
        bright_yellow(canceled),
        dim("Ignored:"),
        bright_yellow(ignored),
    );

    if would_cancel > 0 {
        let _ = writeln!(
            output,
            "  {}\n",
            bright_yellow(format!("Dry run: {would_cancel} pipeline(s) would be canceled"))
        );
    }

    let mut table = create_table();
    table.set_header(cyan_header(&["Pipeline", "Sha", "Action", "Link"]));

    for entry in &report.entries {
        table.add_row(vec![
            Cell::new(entry.pipeline_id),
            Cell::new(short_sha(&entry.sha)),
            action_cell(&entry.action),
            Cell::new(entry.web_url.as_deref().unwrap_or("N/A")),
        ]);
    }

    let _ = writeln!(output, "{table}");

    output
}
