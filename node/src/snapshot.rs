//! Bincode snapshots of [`EstateState`].
//!
//! A snapshot is written to a temporary sibling file and renamed into place,
//! so a crash mid-write never leaves a truncated snapshot behind.

use estate_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::state::EstateState;
use crate::NodeError;

/// Bumped whenever the encoded layout of [`EstateState`] changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    taken_at: Timestamp,
    state: EstateState,
}

pub fn encode_snapshot(state: &EstateState, taken_at: Timestamp) -> Result<Vec<u8>, NodeError> {
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        taken_at,
        state: state.clone(),
    };
    bincode::serialize(&file).map_err(|e| NodeError::Snapshot(e.to_string()))
}

/// Decode snapshot bytes, returning the state and when it was taken.
pub fn decode_snapshot(bytes: &[u8]) -> Result<(EstateState, Timestamp), NodeError> {
    let file: SnapshotFile =
        bincode::deserialize(bytes).map_err(|e| NodeError::Snapshot(e.to_string()))?;
    if file.version != SNAPSHOT_VERSION {
        return Err(NodeError::Snapshot(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            file.version
        )));
    }
    Ok((file.state, file.taken_at))
}

pub fn save_snapshot(path: &Path, state: &EstateState, taken_at: Timestamp) -> Result<(), NodeError> {
    let bytes = encode_snapshot(state, taken_at)?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), bytes = bytes.len(), records = state.registry.record_count(), "snapshot written");
    Ok(())
}

/// Load a snapshot if one exists at `path`.
pub fn load_snapshot(path: &Path) -> Result<Option<EstateState>, NodeError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    let (state, taken_at) = decode_snapshot(&bytes)?;
    info!(path = %path.display(), %taken_at, records = state.registry.record_count(), "snapshot loaded");
    Ok(Some(state))
}
