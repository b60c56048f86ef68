//! Seed progress reporting.
//!
//! Reports what `docsense seed` is doing per version: discovering markdown
//! files, then sectioning them one by one. Progress goes to **stderr** so
//! stdout stays parseable for scripts.

use std::io::Write;

/// A single progress event for seeding one version.
#[derive(Clone, Debug)]
pub enum SeedProgressEvent {
    /// Walking the extracted docs folder. Total unknown.
    Discovering { version: String },
    /// `n` of `total` files sectioned.
    Indexing { version: String, n: u64, total: u64 },
    /// Rows written to the index for this version.
    Stored { version: String, rows: u64 },
}

pub trait SeedProgressReporter: Send + Sync {
    fn report(&self, event: SeedProgressEvent);
}

/// Human-friendly progress on stderr: "seed 12.x  indexing  42 / 97 files".
pub struct StderrProgress;

impl SeedProgressReporter for StderrProgress {
    fn report(&self, event: SeedProgressEvent) {
        let line = match &event {
            SeedProgressEvent::Discovering { version } => {
                format!("seed {}  discovering...\n", version)
            }
            SeedProgressEvent::Indexing { version, n, total } => format!(
                "seed {}  indexing  {} / {} files\n",
                version,
                format_number(*n),
                format_number(*total)
            ),
            SeedProgressEvent::Stored { version, rows } => {
                format!("seed {}  stored  {} sections\n", version, format_number(*rows))
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// One JSON object per line on stderr.
pub struct JsonProgress;

impl SeedProgressReporter for JsonProgress {
    fn report(&self, event: SeedProgressEvent) {
        let obj = match &event {
            SeedProgressEvent::Discovering { version } => serde_json::json!({
                "event": "progress",
                "version": version,
                "phase": "discovering"
            }),
            SeedProgressEvent::Indexing { version, n, total } => serde_json::json!({
                "event": "progress",
                "version": version,
                "phase": "indexing",
                "n": n,
                "total": total
            }),
            SeedProgressEvent::Stored { version, rows } => serde_json::json!({
                "event": "progress",
                "version": version,
                "phase": "stored",
                "rows": rows
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

pub struct NoProgress;

impl SeedProgressReporter for NoProgress {
    fn report(&self, _event: SeedProgressEvent) {}
}

/// Collects events in memory.
#[derive(Default)]
pub struct RecordingProgress {
    events: std::sync::Mutex<Vec<SeedProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<SeedProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl SeedProgressReporter for RecordingProgress {
    fn report(&self, event: SeedProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// `--progress off|human|json`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "off" => Some(ProgressMode::Off),
            "human" => Some(ProgressMode::Human),
            "json" => Some(ProgressMode::Json),
            _ => None,
        }
    }

    pub fn reporter(&self) -> Box<dyn SeedProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
