//! Session progress reporting.
//!
//! The coordinator reports batch milestones through [`SessionReporter`].
//! Workers call it concurrently, so implementations are `Send + Sync`.
//! [`TerminalReporter`] renders a progress bar with one line per finished
//! job; [`JsonReporter`] emits one JSON object per event.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::model::SessionState;

/// Batch start metadata.
#[derive(Clone, Debug)]
pub struct BatchStartInfo {
    pub session_id: String,
    pub videos: Vec<String>,
    pub workers: usize,
}

/// A job reaching a terminal state.
#[derive(Clone, Debug)]
pub struct JobFinishedInfo {
    pub slot: usize,
    pub video_name: String,
    /// `None` when the job failed.
    pub detected: Option<bool>,
    pub categories: Vec<String>,
    pub error: Option<String>,
}

/// Final state of a session.
#[derive(Clone, Debug)]
pub struct SessionFinishedInfo {
    pub session_id: String,
    pub state: SessionState,
    pub done: usize,
    pub failed: usize,
    pub detected: usize,
    pub elapsed: Duration,
}

/// Reporter interface implemented by both human-readable and JSON reporters.
pub trait SessionReporter: Send + Sync {
    fn batch_started(&self, _info: &BatchStartInfo) {}
    fn job_finished(&self, _info: &JobFinishedInfo) {}
    fn session_finished(&self, _info: &SessionFinishedInfo) {}
    fn warning(&self, _message: &str) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl SessionReporter for NullReporter {}

/// Human-friendly reporter that prints concise text output.
pub struct TerminalReporter {
    progress: Mutex<Option<ProgressBar>>,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(None),
        }
    }

    fn println(&self, line: String) {
        match self.progress.lock() {
            Ok(guard) if guard.is_some() => {
                if let Some(pb) = guard.as_ref() {
                    pb.println(line);
                }
            }
            _ => println!("{}", line),
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl SessionReporter for TerminalReporter {
    fn batch_started(&self, info: &BatchStartInfo) {
        println!("\n{}", style("BATCH").bold().cyan());
        println!("  {:<9} {}", style("Session:").bold(), info.session_id);
        println!(
            "  {:<9} {} video(s), {} worker(s)",
            style("Jobs:").bold(),
            info.videos.len(),
            info.workers
        );
        for (idx, name) in info.videos.iter().enumerate() {
            println!("  {}. {}", idx + 1, name);
        }

        let pb = ProgressBar::new(info.videos.len() as u64);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("Processing [{bar:40}] {pos}/{len} | {elapsed_precise}")
        {
            pb.set_style(bar_style.progress_chars("=> "));
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut guard) = self.progress.lock() {
            *guard = Some(pb);
        }
    }

    fn job_finished(&self, info: &JobFinishedInfo) {
        let status = match (info.detected, &info.error) {
            (Some(true), _) => style(format!("detected: {}", info.categories.join(", ")))
                .green()
                .to_string(),
            (Some(false), _) => style("no animals".to_string()).dim().to_string(),
            (None, Some(error)) => style(format!("failed: {}", error)).red().to_string(),
            (None, None) => style("failed".to_string()).red().to_string(),
        };
        self.println(format!("  {} {} ({})", style("›").magenta(), info.video_name, status));
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn session_finished(&self, info: &SessionFinishedInfo) {
        self.finish_progress();
        println!("\n{}", style("SESSION SUMMARY").bold().cyan());
        let state = match info.state {
            SessionState::Complete => style(info.state.to_string()).green().bold(),
            _ => style(info.state.to_string()).red().bold(),
        };
        println!("  {:<9} {} ({})", style("Session:").bold(), info.session_id, state);
        println!(
            "  {} of {} job(s) done, {} with animals, {} failed",
            info.done,
            info.done + info.failed,
            info.detected,
            info.failed
        );
        println!("  Time: {:.1}s", info.elapsed.as_secs_f64());
    }

    fn warning(&self, message: &str) {
        self.println(style(format!("WARN: {}", message)).yellow().bold().to_string());
    }
}

/// JSON-lines reporter for machine consumers.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_value(&self, value: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
            let _ = writer.flush();
        }
    }
}

impl SessionReporter for JsonReporter {
    fn batch_started(&self, info: &BatchStartInfo) {
        self.write_value(json!({
            "type": "batch_started",
            "session_id": info.session_id,
            "videos": info.videos,
            "workers": info.workers,
            "timestamp": Self::timestamp(),
        }));
    }

    fn job_finished(&self, info: &JobFinishedInfo) {
        self.write_value(json!({
            "type": "job_finished",
            "slot": info.slot,
            "video_name": info.video_name,
            "detected": info.detected,
            "categories": info.categories,
            "error": info.error,
            "timestamp": Self::timestamp(),
        }));
    }

    fn session_finished(&self, info: &SessionFinishedInfo) {
        self.write_value(json!({
            "type": "session_finished",
            "session_id": info.session_id,
            "state": info.state,
            "done": info.done,
            "failed": info.failed,
            "detected": info.detected,
            "elapsed_seconds": info.elapsed.as_secs_f64(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn warning(&self, message: &str) {
        self.write_value(json!({
            "type": "warning",
            "message": message,
            "timestamp": Self::timestamp(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_reporter_writes_one_line_per_event() {
        let buffer = SharedBuffer::default();
        let reporter = JsonReporter::with_writer(Box::new(buffer.clone()));
        reporter.job_finished(&JobFinishedInfo {
            slot: 1,
            video_name: "clip.mp4".to_string(),
            detected: None,
            categories: Vec::new(),
            error: Some("corrupt".to_string()),
        });
        reporter.warning("slow detector");

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "job_finished");
        assert_eq!(lines[0]["error"], "corrupt");
        assert_eq!(lines[1]["message"], "slow detector");
    }
}
