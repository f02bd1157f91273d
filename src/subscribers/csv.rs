//! # CsvRecorder: completed entities as CSV rows.
//!
//! Appends one row per completed entity as each tick is reported, so the file
//! is usable even when the run is interrupted.
//!
//! ```text
//! Id_no,Name,Surname,Email,Registered,Assigned,Completed
//! 1,Anna,Nowak,Anna.Nowak@gmail.com,1,1,4
//! ```
//!
//! Columns `Registered`, `Assigned` and `Completed` hold tick numbers. Write
//! failures are logged and never stop the simulation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::entity::Entity;
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// First line of every output file.
pub const HEADER: &str = "Id_no,Name,Surname,Email,Registered,Assigned,Completed";

/// Writes completed entities to a CSV file.
pub struct CsvRecorder {
    path: PathBuf,
    file: Mutex<File>,
}

impl CsvRecorder {
    /// Creates (truncates) `path` and writes the header.
    pub async fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path).await?;
        file.write_all(HEADER.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, rows: &str) -> std::io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(rows.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl Subscribe for CsvRecorder {
    async fn on_event(&self, e: &Event) {
        if e.kind != EventKind::TickCompleted || e.finished.is_empty() {
            return;
        }
        let rows: String = e.finished.iter().map(encode_row).collect();
        if let Err(err) = self.append(&rows).await {
            tracing::error!(
                path = %self.path.display(),
                tick = ?e.tick,
                rows = e.finished.len(),
                error = %err,
                "failed to write completed entities"
            );
        }
    }

    fn name(&self) -> &'static str {
        "csv"
    }

    fn queue_capacity(&self) -> usize {
        8192
    }
}

/// Encodes one entity as a newline-terminated CSV row.
pub fn encode_row(e: &Entity) -> String {
    let tick = |t: Option<u64>| t.map(|t| t.to_string()).unwrap_or_default();
    format!(
        "{},{},{},{},{},{},{}\n",
        e.id.get(),
        escape(&e.name),
        escape(&e.surname),
        escape(&e.email),
        tick(e.registered_at),
        tick(e.assigned_at),
        tick(e.completed_at),
    )
}

/// Quotes a field when it contains a separator, a quote or a line break.
fn escape(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{TickOutcome, TickSummary};

    fn finished(seq: u64, name: &str, surname: &str) -> Entity {
        let mut e = Entity::new(seq, name, surname, "gmail.com", 2);
        e.register(1);
        e.assign(1);
        e.complete(3);
        e
    }

    fn tick_event(tick: u64, done: Vec<Entity>) -> Event {
        let summary = TickSummary {
            tick,
            added: 0,
            finished: done.len(),
            promoted: 0,
            assigned: 0,
            limit: 1,
            awaiting: 0,
            completed_total: done.len() as u64,
        };
        Event::tick_completed(TickOutcome {
            summary,
            finished: done,
        })
    }

    #[test]
    fn test_escape_quotes_special_fields() {
        assert_eq!(escape("Anna"), "Anna");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_encode_row() {
        let e = finished(7, "Anna", "Nowak");
        assert_eq!(encode_row(&e), "7,Anna,Nowak,Anna.Nowak@gmail.com,1,1,3\n");
    }

    #[tokio::test]
    async fn test_rows_are_appended_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("completed.csv");
        let rec = CsvRecorder::create(&path).await.unwrap();

        rec.on_event(&Event::new(EventKind::RunStarted)).await;
        rec.on_event(&tick_event(3, vec![finished(1, "Anna", "Nowak")]))
            .await;
        rec.on_event(&tick_event(4, Vec::new())).await;
        rec.on_event(&tick_event(5, vec![finished(2, "Jan", "Kowal,ski")]))
            .await;

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,Anna,Nowak,Anna.Nowak@gmail.com,1,1,3");
        assert_eq!(
            lines[2],
            "2,Jan,\"Kowal,ski\",\"Jan.Kowal,ski@gmail.com\",1,1,3"
        );
        assert_eq!(lines.len(), 3);
    }

    #[tokio::test]
    async fn test_create_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(CsvRecorder::create(&path).await.is_err());
    }
}
