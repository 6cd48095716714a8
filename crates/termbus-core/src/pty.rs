//! Terminal output stream updates.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// An incremental slice of a command's terminal output.
///
/// `pty_pos` is the byte offset of this chunk within the command's output
/// stream and only moves forward. `pty_data64` holds the chunk base64-encoded;
/// `pty_data_len` is its decoded length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtyDataUpdate {
    /// Session the command belongs to.
    #[serde(rename = "sessionid", default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    /// Command producing the output.
    #[serde(rename = "cmdid", default, skip_serializing_if = "String::is_empty")]
    pub cmd_id: String,
    /// Remote the command runs on.
    #[serde(rename = "remoteid", default, skip_serializing_if = "String::is_empty")]
    pub remote_id: String,
    /// Byte offset of this chunk within the output stream.
    #[serde(rename = "ptypos")]
    pub pty_pos: i64,
    /// Base64-encoded chunk.
    #[serde(rename = "ptydata64")]
    pub pty_data64: String,
    /// Decoded length of the chunk in bytes.
    #[serde(rename = "ptydatalen")]
    pub pty_data_len: i64,
}

impl PtyDataUpdate {
    /// Build an update from a raw output chunk, encoding it and recording its length.
    #[must_use]
    pub fn from_bytes(
        session_id: impl Into<String>,
        cmd_id: impl Into<String>,
        remote_id: impl Into<String>,
        pty_pos: i64,
        data: &[u8],
    ) -> Self {
        Self {
            session_id: session_id.into(),
            cmd_id: cmd_id.into(),
            remote_id: remote_id.into(),
            pty_pos,
            pty_data64: STANDARD.encode(data),
            pty_data_len: data.len() as i64,
        }
    }

    /// Decode the chunk back into raw bytes.
    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.pty_data64)
    }

    /// Offset one past the last byte of this chunk.
    pub fn end_pos(&self) -> i64 {
        self.pty_pos + self.pty_data_len
    }
}
