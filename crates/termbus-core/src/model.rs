//! Sparse model updates.
//!
//! A [`ModelUpdate`] is the one general-purpose delta sent to front-ends.
//! Every facet is independently optional: an empty list, `None` or `false`
//! means "no change to this facet" and is left off the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::facets::{
    CmdLineEdit, CmdSummary, HistoryInfo, InfoMsg, LineSummary, RemoteInstance, SessionSummary,
    WindowSummary,
};
use crate::update::HistoryData;

/// A sparse state delta for the client-side model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelUpdate {
    /// Session summaries to merge into the client's session list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<SessionSummary>,
    /// Session to make active.
    #[serde(rename = "activesessionid", default, skip_serializing_if = "Option::is_none")]
    pub active_session_id: Option<String>,
    /// Window state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowSummary>,
    /// A new or changed line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineSummary>,
    /// Command state for the line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<CmdSummary>,
    /// Command line edit to apply.
    #[serde(rename = "cmdline", default, skip_serializing_if = "Option::is_none")]
    pub cmd_line: Option<CmdLineEdit>,
    /// Informational message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoMsg>,
    /// Opaque remote state snapshots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<Value>,
    /// History listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryInfo>,
    /// The update answers an interactive request.
    #[serde(default)]
    pub interactive: bool,
    /// Full-state snapshot sent on (re)connect.
    #[serde(default, skip_serializing_if = "is_false")]
    pub connect: bool,
}

impl ModelUpdate {
    /// An update carrying only an informational message.
    ///
    /// See [`info_msg_update!`](crate::info_msg_update) for the formatting variant.
    #[must_use]
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            info: Some(InfoMsg {
                info_msg: msg.into(),
                ..InfoMsg::default()
            }),
            ..Self::default()
        }
    }

    /// An update listing a single, freshly initialized session.
    ///
    /// Used when a session is created: the creator fills in the entry through
    /// [`sole_session_mut`](Self::sole_session_mut), then both returns the update
    /// to its caller and broadcasts it to everyone else.
    #[must_use]
    pub fn single_session(session_id: impl Into<String>) -> Self {
        Self {
            sessions: vec![SessionSummary::new(session_id)],
            ..Self::default()
        }
    }

    /// Mutable access to the session entry of a single-session update.
    ///
    /// Returns `None` unless the session list holds exactly one entry.
    pub fn sole_session_mut(&mut self) -> Option<&mut SessionSummary> {
        match self.sessions.as_mut_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Line ID, command ID and remote pointer for history recording.
    ///
    /// `None` when there is no line facet. The remote is only present when a
    /// command facet rides along with the line.
    pub fn history_data(&self) -> Option<HistoryData<'_>> {
        let line = self.line.as_ref()?;
        Some(HistoryData {
            line_id: &line.line_id,
            cmd_id: &line.cmd_id,
            remote: self.cmd.as_ref().map(|cmd| &cmd.remote),
        })
    }

    /// True when no facet is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Build a [`ModelUpdate`] carrying only a formatted info message.
///
/// ```ignore
/// let update = info_msg_update!("count={}", 5);
/// ```
#[macro_export]
macro_rules! info_msg_update {
    ($($arg:tt)*) => {
        $crate::ModelUpdate::info(::std::format!($($arg)*))
    };
}

/// A one-entry session list announcing a remote instance attached to a session.
#[must_use]
pub fn sessions_update_for_remote(
    session_id: impl Into<String>,
    remote: RemoteInstance,
) -> Vec<SessionSummary> {
    vec![SessionSummary {
        session_id: session_id.into(),
        remotes: vec![remote],
        ..SessionSummary::default()
    }]
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_zero(n: &i64) -> bool {
    *n == 0
}
