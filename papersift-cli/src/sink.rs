//! Writes a finished report under a date-partitioned output tree:
//!
//! ```text
//! <root>/json/YYYY-MM/YYYY-MM-DD-output.json
//! <root>/debug/YYYY-MM/YYYY-MM-DD/{rejected,unresolved,scored_batches,cost,config}.json
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use papersift_core::PaperSiftError;
use papersift_filter::{PipelineReport, ReportSink};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct JsonReportSink {
    root: PathBuf,
    date: NaiveDate,
    dump_json: bool,
    dump_debug: bool,
    config_snapshot: Option<serde_json::Value>,
}

impl JsonReportSink {
    pub fn new(root: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            root: root.into(),
            date,
            dump_json: true,
            dump_debug: false,
            config_snapshot: None,
        }
    }

    pub fn dump_json(mut self, enabled: bool) -> Self {
        self.dump_json = enabled;
        self
    }

    pub fn dump_debug(mut self, enabled: bool) -> Self {
        self.dump_debug = enabled;
        self
    }

    /// Written as `config.json` next to the other debug files.
    pub fn with_config_snapshot(mut self, config: serde_json::Value) -> Self {
        self.config_snapshot = Some(config);
        self
    }

    pub fn output_file(&self) -> PathBuf {
        self.root
            .join("json")
            .join(self.date.format("%Y-%m").to_string())
            .join(format!("{}-output.json", self.date.format("%Y-%m-%d")))
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.root
            .join("debug")
            .join(self.date.format("%Y-%m").to_string())
            .join(self.date.format("%Y-%m-%d").to_string())
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PaperSiftError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes).await?;
    tracing::debug!(path = %path.display(), "wrote report file");
    Ok(())
}

#[async_trait::async_trait]
impl ReportSink for JsonReportSink {
    async fn publish(&self, report: &PipelineReport) -> Result<(), PaperSiftError> {
        if self.dump_json {
            let path = self.output_file();
            write_json(&path, &report.accepted).await?;
            tracing::info!(path = %path.display(), papers = report.accepted.len(), "wrote report");
        }

        if self.dump_debug {
            let dir = self.debug_dir();
            write_json(&dir.join("rejected.json"), &report.rejected).await?;
            write_json(&dir.join("unresolved.json"), &report.unresolved).await?;
            write_json(&dir.join("scored_batches.json"), &report.scored_batches).await?;
            write_json(&dir.join("cost.json"), &report.cost).await?;
            if let Some(config) = &self.config_snapshot {
                write_json(&dir.join("config.json"), config).await?;
            }
            tracing::info!(dir = %dir.display(), "wrote debug files");
        }

        Ok(())
    }
}
