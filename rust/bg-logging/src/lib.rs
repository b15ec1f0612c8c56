//! bg-logging: NDJSON event logs and match manifests.
//!
//! Append-only NDJSON so that a crashed run still leaves every completed line readable.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Match manifest schema version.
pub const MATCH_MANIFEST_VERSION: u32 = 1;

/// Identifies the rules the events were produced under.
pub const RULESET_ID: &str = "backgammon_cube_v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchManifestV1 {
    pub match_manifest_version: u32,

    pub match_id: String,
    pub created_ts_ms: u64,
    pub ruleset_id: String,

    // Reproducibility.
    pub config_hash: Option<String>,
    pub chance_kind: String,
    pub seed: u64,

    // Layout.
    pub events_path: Option<String>,

    // Result, filled in once the match is over.
    pub winning_score: u32,
    pub rounds: u32,
    pub final_scores: Option<[u32; 2]>,
    pub winner: Option<String>,
    pub finished_ts_ms: Option<u64>,
}

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn read_manifest(path: impl AsRef<Path>) -> Result<MatchManifestV1, NdjsonError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<MatchManifestV1>(&bytes)?)
}

pub fn write_manifest_atomic(
    path: impl AsRef<Path>,
    m: &MatchManifestV1,
) -> Result<(), NdjsonError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(m)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Schema fields stamped on every logged line.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfoV1 {
    pub crate_version: &'static str,
    pub ruleset_id: &'static str,
}

impl VersionInfoV1 {
    pub fn current() -> Self {
        Self {
            crate_version: VERSION,
            ruleset_id: RULESET_ID,
        }
    }
}

/// One logged line: envelope fields plus the flattened event payload.
#[derive(Serialize)]
pub struct EventLineV1<'a, T: Serialize> {
    pub ts_ms: u64,
    pub v: VersionInfoV1,
    pub match_id: &'a str,
    #[serde(flatten)]
    pub payload: &'a T,
}

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("ndjson io error: {0}")]
    Io(#[from] io::Error),
    #[error("ndjson encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
