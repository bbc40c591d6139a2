// wildtrack-cli/src/output.rs
//
// Text rendering of command results.

use console::style;
use std::fmt::Display;

use wildtrack_core::{BatchReport, JobReport, SessionManifest, SessionState, SingleVideoReport};

/// Print a section heading.
pub fn print_section(text: &str) {
    println!("\n{}", style(text).bold().cyan());
}

/// Print an aligned label/value line.
pub fn print_status<T: Display>(label: &str, value: T) {
    println!("  {:<12} {}", style(format!("{}:", label)).bold(), value);
}

fn job_line(job: &JobReport) -> String {
    match (&job.failure, job.detected) {
        (Some(failure), _) => format!(
            "{} {}",
            style("FAILED").red().bold(),
            failure.reason
        ),
        (None, Some(true)) => {
            let counts = job
                .counts
                .iter()
                .map(|(label, n)| format!("{} x{}", label, n))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} {}", style("DETECTED").green().bold(), counts)
        }
        _ => style("no animals").dim().to_string(),
    }
}

pub fn print_single_report(report: &SingleVideoReport) {
    print_section("RESULT");
    print_status("Video", &report.video_name);
    let status = if report.detected {
        style(&report.status).green().bold()
    } else {
        style(&report.status).dim()
    };
    print_status("Status", status);
    println!("  {}", report.message);
    if !report.summary.counts.is_empty() {
        print_section("ANIMALS");
        for (label, count) in &report.summary.counts {
            print_status(label, count);
        }
    }
    if !report.artifacts.is_empty() {
        print_section("ARTIFACTS");
        for (name, path) in &report.artifacts {
            print_status(name, path.display());
        }
    }
}

pub fn print_batch_report(report: &BatchReport) {
    print_section("SESSION");
    print_status("Session", &report.session_id);
    let state = match report.state {
        SessionState::Complete => style(report.state.to_string()).green().bold(),
        _ => style(report.state.to_string()).red().bold(),
    };
    print_status("State", state);
    if let Some(archive) = &report.archive {
        print_status("Archive", archive.path.display());
        print_status("Size", format!("{} bytes", archive.size_bytes));
    }
    if let Some(reason) = &report.packaging_error {
        print_status("Packaging", style(reason).red());
    }

    print_section("JOBS");
    for job in &report.jobs {
        println!("  {}. {}  {}", job.slot + 1, job.video_name, job_line(job));
    }

    print_section("GROUPS");
    for (group, names) in &report.groups {
        let listed = if names.is_empty() {
            style("(none)".to_string()).dim().to_string()
        } else {
            names.join(", ")
        };
        print_status(group.dir_name(), listed);
    }
}

pub fn print_manifest(manifest: &SessionManifest) {
    print_section("SESSION");
    print_status("Session", &manifest.session_id);
    print_status("Created", manifest.created_at.format("%Y-%m-%d %H:%M:%S"));
    print_status("State", manifest.state);
    print_status("Stride", manifest.frame_stride);
    print_status("Preferences", &manifest.preferences);
    print_status("Archive", format!("{} bytes", manifest.archive_size));
    print_status("SHA-256", &manifest.archive_sha256);

    print_section("JOBS");
    for job in &manifest.jobs {
        let outcome = match (&job.error, job.detected) {
            (Some(error), _) => format!("{} {}", style("FAILED").red().bold(), error),
            (None, Some(true)) => style("animals detected").green().to_string(),
            _ => style("no animals").dim().to_string(),
        };
        println!("  {}  {}", job.video_name, outcome);
        for artifact in &job.artifacts {
            println!("      {}", artifact);
        }
    }
}
