//! Console rendering for run reports.

use console::style;
use vitrina::{RunReport, ScenarioRecord, ScenarioStatus};

/// One line for a scenario reaching a terminal state
#[must_use]
pub fn scenario_line(group: &str, record: &ScenarioRecord) -> String {
    let mark = match record.status {
        ScenarioStatus::Passed => style("✓").green().to_string(),
        ScenarioStatus::Failed => style("✗").red().bold().to_string(),
        ScenarioStatus::Skipped => style("-").yellow().to_string(),
        ScenarioStatus::Pending | ScenarioStatus::Running => "?".to_string(),
    };
    let mut line = format!("{mark} {} › {}", style(group).dim(), record.name);
    if let Some(ref error) = record.error {
        let note = if record.attempted { "" } else { " (not run)" };
        line.push_str(&format!("\n    {}{note}", style(error).red()));
    }
    if let Some(ref reason) = record.skip_reason {
        line.push_str(&format!("\n    {}", style(format!("skipped: {reason}")).yellow()));
    }
    line
}

/// Final summary block for a run
pub fn print_summary(report: &RunReport) {
    println!();
    for group in &report.groups {
        if let Some(ref error) = group.teardown_error {
            println!(
                "{} {} teardown failed: {}",
                style("!").yellow().bold(),
                style(&group.name).dim(),
                error
            );
        }
    }

    let passed = style(format!("{} passed", report.passed_count())).green();
    let failed = if report.failed_count() > 0 {
        style(format!("{} failed", report.failed_count())).red().bold()
    } else {
        style(format!("{} failed", report.failed_count())).dim()
    };
    let skipped = style(format!("{} skipped", report.skipped_count())).yellow();
    println!(
        "{passed}, {failed}, {skipped} ({} total) in {:.2}s",
        report.total(),
        report.duration.as_secs_f64()
    );

    if !report.all_green() {
        println!();
        println!("{}", style("Failures:").red().bold());
        for (group, record) in report.failures() {
            let note = if record.attempted { "" } else { " (not run)" };
            println!(
                "  {} › {}{note}: {}",
                group,
                record.name,
                record.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
