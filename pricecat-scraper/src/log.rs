use std::path::Path;

use pricecat_core::{CandidateId, ImageOrigin};

/// A single entry in the enrichment log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    Downloaded {
        id: CandidateId,
        name: String,
        origin: ImageOrigin,
        url: String,
    },
    Skipped {
        id: CandidateId,
        name: String,
    },
    Failed {
        id: CandidateId,
        name: String,
        /// The URL whose download failed, if resolution got that far.
        url: Option<String>,
        message: String,
    },
}

/// Collects enrichment results and writes a log file.
#[derive(Debug, Default)]
pub struct EnrichLog {
    entries: Vec<LogEntry>,
}

impl EnrichLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> EnrichSummary {
        let mut summary = EnrichSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Downloaded { origin, .. } => {
                    summary.downloaded += 1;
                    match origin {
                        ImageOrigin::Primary => summary.from_search += 1,
                        ImageOrigin::Fallback => summary.from_placeholder += 1,
                    }
                }
                LogEntry::Skipped { .. } => summary.skipped += 1,
                LogEntry::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Enrichment Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(
            file,
            "Downloaded: {} (search: {}, placeholder: {})",
            summary.downloaded, summary.from_search, summary.from_placeholder
        )?;
        writeln!(file, "Already present: {}", summary.skipped)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Downloaded {
                    id,
                    name,
                    origin,
                    url,
                } => {
                    writeln!(file, "[OK] {} \"{}\" (via {})", id, name, origin)?;
                    writeln!(file, "     Source: {}", url)?;
                }
                LogEntry::Skipped { id, name } => {
                    writeln!(file, "[SKIP] {} \"{}\" (image exists)", id, name)?;
                }
                LogEntry::Failed {
                    id,
                    name,
                    url,
                    message,
                } => {
                    writeln!(file, "[FAILED] {} \"{}\"", id, name)?;
                    if let Some(url) = url {
                        writeln!(file, "     Source: {}", url)?;
                    }
                    writeln!(file, "     Error: {}", message)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichSummary {
    pub downloaded: usize,
    pub from_search: usize,
    pub from_placeholder: usize,
    pub skipped: usize,
    pub failed: usize,
}
