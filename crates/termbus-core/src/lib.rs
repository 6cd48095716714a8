//! # termbus-core
//!
//! Update payload types pushed from the session engine to attached clients.
//!
//! - **Updates**: [`update::Update`], the closed set of payload shapes, each
//!   carrying its own type tag ([`update::Update::update_type`])
//! - **Stream data**: [`pty::PtyDataUpdate`], an incremental slice of terminal output
//! - **Model deltas**: [`model::ModelUpdate`], a sparse record of optional facets
//! - **Facets**: session, window, line, command, history and info records in [`facets`]
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `termbus-server`, which fans updates out
//! to subscribers without inspecting them.

#![deny(unsafe_code)]

pub mod facets;
pub mod model;
pub mod pty;
pub mod update;

pub use facets::{
    CmdLineEdit, CmdSummary, HistoryInfo, HistoryItem, InfoMsg, LineSummary, RemoteInstance,
    RemotePtr, SessionSummary, WindowSummary,
};
pub use model::{ModelUpdate, sessions_update_for_remote};
pub use pty::PtyDataUpdate;
pub use update::{HistoryData, MODEL_UPDATE_TYPE, PTY_DATA_UPDATE_TYPE, Update};
