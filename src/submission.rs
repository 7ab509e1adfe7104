//! Signed score submission
//!
//! At game over the session builds a [`ScoreData`] record, signs its JSON
//! encoding with HMAC-SHA256 and hands it to a [`ScoreSink`]. Submissions
//! are fire-and-forget: sink errors are logged by the caller and dropped.

use std::io::Write;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{BarrageError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Submissions further than this from the verifier's clock are rejected by [`verify`]
pub const MAX_SUBMISSION_AGE_MS: u64 = 5 * 60 * 1000;

/// Per-session telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameplayData {
    pub shots_fired: u32,
    pub enemies_destroyed: u32,
    pub powerups_collected: u32,
    /// Milliseconds between the first and last frame of the session
    pub play_duration: u64,
    /// Wall-clock time of submission (unix ms)
    pub timestamp: u64,
}

/// The signed payload. Field order defines the canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreData {
    pub score: u64,
    /// Player identifier
    pub fid: u64,
    pub user_name: String,
    pub display_name: String,
    pub pfp_url: String,
    pub gameplay_data: GameplayData,
}

impl ScoreData {
    /// Bytes covered by the signature
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub data: ScoreData,
    /// Lowercase hex HMAC-SHA256 of the canonical bytes
    pub signature: String,
}

fn mac(key: &[u8], data: &ScoreData) -> Result<HmacSha256> {
    if key.is_empty() {
        return Err(BarrageError::MissingSigningKey);
    }
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| BarrageError::MissingSigningKey)?;
    mac.update(&data.canonical_bytes()?);
    Ok(mac)
}

/// Sign a score record
pub fn sign(data: ScoreData, key: &[u8]) -> Result<ScoreSubmission> {
    let tag = mac(key, &data)?.finalize().into_bytes();
    Ok(ScoreSubmission {
        data,
        signature: hex::encode(tag),
    })
}

/// Check a submission's signature and freshness against `now_ms`
pub fn verify(submission: &ScoreSubmission, key: &[u8], now_ms: u64) -> Result<()> {
    let tag = hex::decode(&submission.signature).map_err(|_| BarrageError::SignatureMismatch)?;
    mac(key, &submission.data)?
        .verify_slice(&tag)
        .map_err(|_| BarrageError::SignatureMismatch)?;

    // Clock skew counts in either direction
    let age_ms = now_ms.abs_diff(submission.data.gameplay_data.timestamp);
    if age_ms > MAX_SUBMISSION_AGE_MS {
        return Err(BarrageError::StaleSubmission { age_ms });
    }
    Ok(())
}

/// Receives finished submissions (leaderboard API, file, stdout)
pub trait ScoreSink {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<()>;
}

/// Keeps submissions in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub submissions: Vec<ScoreSubmission>,
}

impl ScoreSink for MemorySink {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<()> {
        self.submissions.push(submission.clone());
        Ok(())
    }
}

/// Writes one JSON object per line
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScoreSink for JsonLinesSink<W> {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<()> {
        serde_json::to_writer(&mut self.writer, submission)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
