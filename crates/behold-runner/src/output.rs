//! Feed output.
//!
//! Streams every published post to `feed.jsonl` as it appears, and writes
//! the session summary and the final population when the run ends.
//!
//! # Output Files
//!
//! - `feed.jsonl` - One news post per line, in publication order
//! - `summary.json` - Session counters and file index
//! - `population.json` - The arena population at the end of the run

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use behold_core::{SessionSummary, SimulationState};
use behold_events::NewsPost;

/// Errors that can occur during output operations.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct FeedWriter {
    output_dir: PathBuf,
    feed_writer: BufWriter<File>,
    posts_written: u64,
}

impl FeedWriter {
    /// Creates the directory if needed and truncates `feed.jsonl`.
    pub fn new(output_dir: &Path) -> Result<Self, FeedError> {
        fs::create_dir_all(output_dir)?;
        let feed_file = File::create(output_dir.join("feed.jsonl"))?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            feed_writer: BufWriter::new(feed_file),
            posts_written: 0,
        })
    }

    pub fn write_post(&mut self, post: &NewsPost) -> Result<(), FeedError> {
        let line = post.to_jsonl()?;
        writeln!(self.feed_writer, "{}", line)?;
        self.posts_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), FeedError> {
        self.feed_writer.flush()?;
        Ok(())
    }

    pub fn posts_written(&self) -> u64 {
        self.posts_written
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `summary.json` and `population.json`.
    pub fn write_summary(
        &self,
        summary: &SessionSummary,
        state: &SimulationState,
    ) -> Result<(), FeedError> {
        let document = serde_json::json!({
            "session": summary,
            "posts_written": self.posts_written,
            "files": {
                "feed": "feed.jsonl",
                "population": "population.json"
            }
        });

        let file = File::create(self.output_dir.join("summary.json"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &document)?;

        fs::write(self.output_dir.join("population.json"), state.to_json()?)?;
        Ok(())
    }
}
