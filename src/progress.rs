use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Stamped phase announcements for one comparison run. Everything goes to
/// stderr; stdout stays reserved for report JSON, so piping the report never
/// mixes streams.
pub struct ConsoleProgress {
    enabled: bool,
    started: Instant,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started: Instant::now(),
        }
    }

    pub fn quiet() -> Self {
        Self::new(false)
    }

    /// `role` is "template" or "draft"; both documents announce the same way.
    pub fn reading(&self, role: &str, path: &Path) {
        self.emit(format_args!("Reading {role}: {}", path.display()));
    }

    pub fn config_file(&self, path: &Path) {
        self.emit(format_args!("Config: {}", path.display()));
    }

    pub fn segmented(&self, template_sections: usize, draft_sections: usize) {
        self.emit(format_args!(
            "Segmented: {template_sections} template / {draft_sections} draft section(s)"
        ));
    }

    pub fn aligned(&self, matched: usize, new: usize, removed: usize) {
        self.emit(format_args!(
            "Aligned: {matched} matched, {new} new, {removed} removed"
        ));
    }

    /// One line per reviewed section; the reviewer dominates wall time, so
    /// this is where a long run shows life.
    pub fn review_step(&self, done: usize, total: usize) {
        self.emit(format_args!(
            "Review {done}/{total} ({:5.1}%)",
            percent(done, total)
        ));
    }

    fn emit(&self, line: impl Display) {
        if !self.enabled {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{}] {line}", stamp(self.started.elapsed()));
    }
}

fn stamp(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (h, m, s) = (total / 3600, total % 3600 / 60, total % 60);
    match h {
        0 => format!("{m:02}:{s:02}"),
        _ => format!("{h:02}:{m:02}:{s:02}"),
    }
}

fn percent(done: usize, total: usize) -> f64 {
    let total = total.max(1);
    (done.min(total) as f64 / total as f64) * 100.0
}
