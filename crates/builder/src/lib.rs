//! Builder
//!
//! Drives one operator's editing of page sections around the [`preview`] pipeline:
//! - loads and saves section records through a [`SectionStore`]
//! - guards the editor against load replies for sections the operator has left
//! - regenerates component source from config and previews it
//! - reports outcomes as [`Notice`]s
//! - packages sections for download
//!
//! The primary type is [`Session`].

mod error;
pub mod export;
mod notice;
mod session;
pub mod store;

pub use error::{Error, Result};
pub use export::{ExportBundle, ExportFormat, ExportOptions, ExportedSection, export};
pub use notice::{Notice, NoticeDispatcher, NoticeKind};
pub use session::{Applied, Editor, LoadReply, Session, Ticket};
pub use store::{FsStore, MemoryStore, SectionId, SectionStore, StoredSection};
