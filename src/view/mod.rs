//! View models derived from orchestrator state.
//!
//! Pure mappings, no I/O. Renderers (the CLI, a UI) consume these instead of
//! reading `VersionControlState` directly.
//! - `panel`: status panel with grouped, capped change lists
//! - `history`: history drawer entries and selected commit detail
//! - `time`: relative-time formatting

pub mod history;
pub mod panel;
pub mod time;

pub use history::{history, CommitDetailView, HistoryEntry, HistoryView};
pub use panel::{panel, pending_changes, ChangeEntry, ChangeKind, PanelView, PendingChangesView};
pub use time::format_relative_time;
