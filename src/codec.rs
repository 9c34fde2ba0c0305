//! Compact text encoding of a [`TacticState`] for share links and saved records.
//!
//! Layout: JSON, LZ4 block compression with a little-endian size prefix, then URL-safe base64
//! without padding. The output only uses `[A-Za-z0-9_-]`.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::foundation::error::{TacticError, TacticResult};
use crate::model::tactic::TacticState;

/// Encode a tactic into its share/storage string.
pub fn encode(state: &TacticState) -> TacticResult<String> {
    let json =
        serde_json::to_vec(state).map_err(|e| TacticError::serde(format!("tactic json: {e}")))?;
    let packed = lz4_flex::compress_prepend_size(&json);
    Ok(URL_SAFE_NO_PAD.encode(packed))
}

/// Decode a share/storage string.
///
/// Fails with [`TacticError::Decode`] for bad base64, a corrupt LZ4 block, empty content,
/// malformed JSON or a state that does not validate.
pub fn decode(data: &str) -> TacticResult<TacticState> {
    let data = data.trim();
    if data.is_empty() {
        return Err(TacticError::decode("empty payload"));
    }
    let packed = URL_SAFE_NO_PAD
        .decode(data)
        .map_err(|e| TacticError::decode(format!("base64: {e}")))?;
    let json = lz4_flex::decompress_size_prepended(&packed)
        .map_err(|e| TacticError::decode(format!("lz4: {e}")))?;
    if json.is_empty() {
        return Err(TacticError::decode("empty payload"));
    }
    let state: TacticState =
        serde_json::from_slice(&json).map_err(|e| TacticError::decode(format!("json: {e}")))?;
    state
        .validate()
        .map_err(|e| TacticError::decode(e.to_string()))?;
    Ok(state)
}

/// Decode, falling back to the default (full court, no frames) on any failure.
pub fn decode_or_default(data: &str) -> TacticState {
    match decode(data) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "failed to decode tactic; using default state");
            TacticState::default()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/codec.rs"]
mod tests;
