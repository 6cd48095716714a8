//! The closed set of update payloads.

use serde::{Deserialize, Serialize};

use crate::facets::RemotePtr;
use crate::model::ModelUpdate;
use crate::pty::PtyDataUpdate;

/// Type tag of [`Update::PtyData`].
pub const PTY_DATA_UPDATE_TYPE: &str = "pty";
/// Type tag of [`Update::Model`].
pub const MODEL_UPDATE_TYPE: &str = "model";

/// A state-change notification pushed to attached clients.
///
/// Serialized as an internally tagged object: the `type` field carries the
/// same string as [`update_type`](Self::update_type), and consumers must switch
/// on it before decoding the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Update {
    /// Incremental terminal output.
    #[serde(rename = "pty")]
    PtyData(PtyDataUpdate),
    /// Sparse model delta.
    #[serde(rename = "model")]
    Model(ModelUpdate),
}

impl Update {
    /// Stable type tag for this variant.
    pub fn update_type(&self) -> &'static str {
        match self {
            Self::PtyData(_) => PTY_DATA_UPDATE_TYPE,
            Self::Model(_) => MODEL_UPDATE_TYPE,
        }
    }

    /// History fields of a model update that carries a line.
    ///
    /// `None` for stream-data updates and for model updates without a line facet.
    pub fn history_data(&self) -> Option<HistoryData<'_>> {
        match self {
            Self::Model(model) => model.history_data(),
            Self::PtyData(_) => None,
        }
    }
}

impl From<PtyDataUpdate> for Update {
    fn from(update: PtyDataUpdate) -> Self {
        Self::PtyData(update)
    }
}

impl From<ModelUpdate> for Update {
    fn from(update: ModelUpdate) -> Self {
        Self::Model(update)
    }
}

/// Line ID, command ID and remote pointer read from a model update.
///
/// Either all of it is present or the caller got `None`; there is no partial result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryData<'a> {
    /// Line ID.
    pub line_id: &'a str,
    /// Command ID recorded on the line.
    pub cmd_id: &'a str,
    /// Remote the command ran on, when a command facet is present.
    pub remote: Option<&'a RemotePtr>,
}
