use std::time::Duration;

use colored::*;
use probr_common::config::Config;
use probr_core::probe::ProbeExit;
use probr_core::report::{Report, ReportSection, ScanOutcome, Summary};

use crate::mprint;
use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

pub fn print_report(report: &Report, cfg: &Config) {
    print::header("scan report", cfg.quiet);

    for (idx, section) in report.sections.iter().enumerate() {
        print_section(section);
        if idx + 1 != report.sections.len() {
            mprint!();
        }
    }

    print_summary(&report.summary(), report.elapsed, cfg);
}

fn print_section(section: &ReportSection) {
    print::tree_head(section.index, section.target.as_str());
    print::as_tree_one_level(section_details(section));

    match &section.outcome {
        ScanOutcome::Parsed(value) => {
            let pretty: String =
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            print::indented_block(&pretty);
        }
        ScanOutcome::UnparsedRaw(raw) => print::indented_block(raw),
        ScanOutcome::Empty => print::no_results(section.target.as_str()),
    }
}

fn section_details(section: &ReportSection) -> Vec<Detail> {
    vec![
        ("Probe".to_string(), exit_to_colored(&section.exit)),
        ("Time".to_string(), duration_to_colored(section.elapsed)),
        ("Result".to_string(), outcome_to_colored(&section.outcome)),
    ]
}

fn exit_to_colored(exit: &ProbeExit) -> ColoredString {
    let text: String = exit.to_string();
    match exit {
        ProbeExit::Exited { code: 0 } => text.color(colors::TEXT_DEFAULT),
        ProbeExit::Exited { .. } => text.yellow(),
        _ => text.red(),
    }
}

fn duration_to_colored(elapsed: Duration) -> ColoredString {
    format!("{:.2}s", elapsed.as_secs_f64()).color(colors::TEXT_DEFAULT)
}

fn outcome_to_colored(outcome: &ScanOutcome) -> ColoredString {
    match outcome {
        ScanOutcome::Parsed(_) => "structured".color(colors::PARSED),
        ScanOutcome::UnparsedRaw(_) => "raw text (not valid JSON)".color(colors::UNPARSED),
        ScanOutcome::Empty => "no results".color(colors::EMPTY),
    }
}

fn print_summary(summary: &Summary, total_time: Duration, cfg: &Config) {
    let parsed: ColoredString = format!("{} parsed", summary.parsed).bold().green();
    let unparsed: ColoredString = format!("{} raw", summary.unparsed).bold().yellow();
    let empty: ColoredString = format!("{} empty", summary.empty).bold().red();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!(
        "Scan Complete: {} targets ({parsed}, {unparsed}, {empty}) in {total_time}",
        summary.total()
    );

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            mprint!();
            mprint!(&output);
        }
    }
}
