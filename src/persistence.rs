//! Saving and loading complete games.
//!
//! A save file is a small JSON envelope around the serialized
//! [`GameState`]:
//!
//! ```json
//! { "format": "hexreign-save", "version": 1, "state": { ... } }
//! ```
//!
//! Tiles store their kingdom id and kingdoms store their tile set, so the
//! back-references come back exactly as saved. The per-tile neighbor cache
//! is not stored; the map rebuilds it while deserializing. A loaded state is
//! checked against the structural invariants before it is handed out.

use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{check_invariants, GameState};

/// Tag written into every save file.
pub const SAVE_FORMAT: &str = "hexreign-save";

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Error type for saving and loading.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Not valid JSON, or not shaped like a save.
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    /// The envelope names a different format.
    #[error("not a hexreign save (format tag {0:?})")]
    WrongFormat(String),
    /// Written by an incompatible version.
    #[error("unsupported save version {found} (expected {SAVE_VERSION})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
    },
    /// The state parsed but violates a structural invariant.
    #[error("corrupt save: {0}")]
    Corrupt(String),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'a str,
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    state: GameState,
}

/// Serialize a state to JSON text.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(state: &GameState) -> Result<String, PersistError> {
    let envelope = EnvelopeRef {
        format: SAVE_FORMAT,
        version: SAVE_VERSION,
        state,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse a state from JSON text and validate it.
///
/// # Errors
///
/// Returns an error if the text is not a save of the current version or the
/// state it holds is inconsistent.
pub fn from_json(text: &str) -> Result<GameState, PersistError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    open(envelope)
}

/// Write a state to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(state: &GameState, path: &Path) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let envelope = EnvelopeRef {
        format: SAVE_FORMAT,
        version: SAVE_VERSION,
        state,
    };
    serde_json::to_writer_pretty(&mut writer, &envelope)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    tracing::debug!(path = %path.display(), turn = state.turn, "save.written");
    Ok(())
}

/// Read a state from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a save of the current
/// version, or holds an inconsistent state.
pub fn load(path: &Path) -> Result<GameState, PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(io_err)?;
    let mut text = String::new();
    BufReader::new(file).read_to_string(&mut text).map_err(io_err)?;
    let state = from_json(&text)?;
    tracing::debug!(path = %path.display(), turn = state.turn, "save.loaded");
    Ok(state)
}

fn open(envelope: Envelope) -> Result<GameState, PersistError> {
    if envelope.format != SAVE_FORMAT {
        return Err(PersistError::WrongFormat(envelope.format));
    }
    if envelope.version != SAVE_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    let state = envelope.state;
    if let Some(first) = check_invariants(&state).into_iter().next() {
        return Err(PersistError::Corrupt(first.message));
    }
    Ok(state)
}
