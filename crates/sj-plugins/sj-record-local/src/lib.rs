//! # sj-record-local
//!
//! Local filesystem implementation of `SightingRecorder`.
//! One CSV file per community under a root directory, appended row by row.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use sj_core::models::SightingRow;
use sj_core::traits::SightingRecorder;
use sj_core::validate_community_name;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const HEADER: &str = "location,time,posted_at,permalink\n";

pub struct LocalSightingRecorder {
    /// Root directory for all sheets (e.g., "./data/sightings")
    root_path: PathBuf,
}

impl LocalSightingRecorder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root_path: root.into() }
    }

    /// `<root>/<community>.csv`, lowercased so one community never splits across files.
    pub fn sheet_path(&self, community: &str) -> PathBuf {
        self.root_path
            .join(format!("{}.csv", community.to_lowercase()))
    }
}

#[async_trait]
impl SightingRecorder for LocalSightingRecorder {
    async fn append_row(&self, community: &str, row: SightingRow) -> anyhow::Result<()> {
        validate_community_name(community)?;
        fs::create_dir_all(&self.root_path)
            .await
            .with_context(|| format!("creating {}", self.root_path.display()))?;

        let path = self.sheet_path(community);
        let is_new = !exists(&path).await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;

        let mut line = String::new();
        if is_new {
            line.push_str(HEADER);
        }
        line.push_str(&csv_line(&row.cells()));
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(community, path = %path.display(), "appended sighting row");
        Ok(())
    }
}

async fn exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

fn csv_line(cells: &[&str]) -> String {
    let mut line = cells.iter().map(|c| escape(c)).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

// RFC 4180: quote cells holding separators, quotes or line breaks; double inner quotes.
fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(location: &str) -> SightingRow {
        SightingRow {
            location: location.to_string(),
            time: "December 9, 2025 at 10:30 PM".to_string(),
            posted_at: "2025-12-09 22:30:00".to_string(),
            permalink: "https://www.reddit.com/r/ufos/comments/abc/orb/".to_string(),
        }
    }

    #[test]
    fn test_escape_quotes_only_when_needed() {
        assert_eq!(escape("Reno"), "Reno");
        assert_eq!(escape("Phoenix, Arizona"), "\"Phoenix, Arizona\"");
        assert_eq!(escape("the \"big\" one"), "\"the \"\"big\"\" one\"");
    }

    #[tokio::test]
    async fn test_rows_append_under_single_header() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = LocalSightingRecorder::new(dir.path().join("sightings"));

        recorder.append_row("UFOs", row("Reno")).await.unwrap();
        recorder.append_row("ufos", row("Phoenix, Arizona")).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("sightings/ufos.csv")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER.trim_end());
        assert!(lines[1].starts_with("Reno,December 9, 2025"));
        assert!(lines[2].starts_with("\"Phoenix, Arizona\","));
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = LocalSightingRecorder::new(dir.path());
        assert!(recorder.append_row("../etc", row("x")).await.is_err());
    }
}
