//! Facet records carried inside a [`ModelUpdate`](crate::ModelUpdate).
//!
//! These are data-only summaries produced by the session, window and command
//! managers. The bus never looks inside them. Field names on the wire are the
//! flat lowercase keys the front-ends already decode (`sessionid`, `cmdid`, ...).

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Sessions and remotes
// ─────────────────────────────────────────────────────────────────────────────

/// Summary of one session as shown in the session list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session ID.
    #[serde(rename = "sessionid")]
    pub session_id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Unread notification counter. `-1` means "not yet computed".
    #[serde(rename = "notifynum", default)]
    pub notify_num: i64,
    /// Remote instances attached to this session.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<RemoteInstance>,
}

impl SessionSummary {
    /// A fresh summary whose notification count has not been computed yet.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            notify_num: -1,
            ..Self::default()
        }
    }
}

/// A remote connection instantiated inside a session or window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteInstance {
    /// Remote instance ID.
    #[serde(rename = "riid")]
    pub ri_id: String,
    /// Instance name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Owning session.
    #[serde(rename = "sessionid")]
    pub session_id: String,
    /// Owning window (empty for session-wide instances).
    #[serde(rename = "windowid", default, skip_serializing_if = "String::is_empty")]
    pub window_id: String,
    /// Owner of the remote, if not the local user.
    #[serde(rename = "remoteownerid", default, skip_serializing_if = "String::is_empty")]
    pub remote_owner_id: String,
    /// Remote ID.
    #[serde(rename = "remoteid")]
    pub remote_id: String,
    /// Opaque remote shell state.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub state: Value,
}

/// Pointer to a remote, optionally owned by another user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePtr {
    /// Owner user ID (empty for the local user).
    #[serde(rename = "ownerid", default, skip_serializing_if = "String::is_empty")]
    pub owner_id: String,
    /// Remote ID.
    #[serde(rename = "remoteid")]
    pub remote_id: String,
    /// Named sub-instance of the remote.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Windows, lines, commands
// ─────────────────────────────────────────────────────────────────────────────

/// Summary of a window's current state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Session ID.
    #[serde(rename = "sessionid")]
    pub session_id: String,
    /// Window ID.
    #[serde(rename = "windowid")]
    pub window_id: String,
    /// Remote the window's command line currently targets.
    #[serde(rename = "curremote", default)]
    pub cur_remote: RemotePtr,
}

/// A single line in a window's history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSummary {
    /// Session ID.
    #[serde(rename = "sessionid")]
    pub session_id: String,
    /// Window ID.
    #[serde(rename = "windowid")]
    pub window_id: String,
    /// Line ID.
    #[serde(rename = "lineid")]
    pub line_id: String,
    /// Position of the line within its window.
    #[serde(rename = "linenum", default)]
    pub line_num: i64,
    /// Line kind (`"cmd"`, `"text"`, ...).
    #[serde(rename = "linetype", default)]
    pub line_type: String,
    /// Literal text for text lines.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Command this line runs, for command lines.
    #[serde(rename = "cmdid", default, skip_serializing_if = "String::is_empty")]
    pub cmd_id: String,
}

/// Summary of a command's execution state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CmdSummary {
    /// Session ID.
    #[serde(rename = "sessionid")]
    pub session_id: String,
    /// Command ID.
    #[serde(rename = "cmdid")]
    pub cmd_id: String,
    /// Remote the command runs on.
    pub remote: RemotePtr,
    /// Command text as typed.
    #[serde(rename = "cmdstr", default)]
    pub cmd_str: String,
    /// Execution status (`"running"`, `"done"`, ...).
    #[serde(default)]
    pub status: String,
}

/// An edit to apply to the client's command line input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdLineEdit {
    /// Characters to insert.
    #[serde(rename = "insertchars")]
    pub insert_chars: String,
    /// Cursor position to insert at.
    #[serde(rename = "insertpos")]
    pub insert_pos: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Info and history
// ─────────────────────────────────────────────────────────────────────────────

/// Human-readable status or error surfaced to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoMsg {
    /// Title line.
    #[serde(rename = "infotitle", default)]
    pub info_title: String,
    /// Error text, if this message reports a failure.
    #[serde(rename = "infoerror", default, skip_serializing_if = "String::is_empty")]
    pub info_error: String,
    /// Message body.
    #[serde(rename = "infomsg", default, skip_serializing_if = "String::is_empty")]
    pub info_msg: String,
    /// Completion candidates.
    #[serde(rename = "infocomps", default, skip_serializing_if = "Vec::is_empty")]
    pub info_comps: Vec<String>,
    /// More completions exist than were sent.
    #[serde(
        rename = "infocompssmore",
        default,
        skip_serializing_if = "crate::model::is_false"
    )]
    pub info_comps_more: bool,
    /// Pre-formatted output lines.
    #[serde(rename = "infolines", default, skip_serializing_if = "Vec::is_empty")]
    pub info_lines: Vec<String>,
    /// Auto-dismiss after this many milliseconds (0 = sticky).
    #[serde(rename = "timeoutms", default, skip_serializing_if = "crate::model::is_zero")]
    pub timeout_ms: i64,
}

/// A history listing requested by the client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryInfo {
    /// Listing scope (`"window"`, `"session"`, `"global"`).
    #[serde(rename = "historytype")]
    pub history_type: String,
    /// Session filter.
    #[serde(rename = "sessionid", default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    /// Window filter.
    #[serde(rename = "windowid", default, skip_serializing_if = "String::is_empty")]
    pub window_id: String,
    /// History entries.
    #[serde(default)]
    pub items: Vec<HistoryItem>,
    /// Whether the client should open its history view.
    #[serde(default)]
    pub show: bool,
}

/// One recorded command in the history listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// History entry ID.
    #[serde(rename = "historyid")]
    pub history_id: String,
    /// Unix timestamp in milliseconds.
    pub ts: i64,
    /// User that ran the command.
    #[serde(rename = "userid", default)]
    pub user_id: String,
    /// Session ID.
    #[serde(rename = "sessionid")]
    pub session_id: String,
    /// Screen ID.
    #[serde(rename = "screenid", default)]
    pub screen_id: String,
    /// Window ID.
    #[serde(rename = "windowid")]
    pub window_id: String,
    /// Line ID.
    #[serde(rename = "lineid")]
    pub line_id: String,
    /// Command ID.
    #[serde(rename = "cmdid", default)]
    pub cmd_id: String,
    /// Command text.
    #[serde(rename = "cmdstr")]
    pub cmd_str: String,
    /// Remote the command ran on.
    pub remote: RemotePtr,
    /// Whether the command exited with an error.
    #[serde(rename = "haderror", default)]
    pub had_error: bool,
}
