//! The builder's editing session: one current section, its editor state and live preview.
//!
//! Loads run on background tasks and come back as [`LoadReply`] values. Every selection issues a
//! fresh [`Ticket`]; a reply is applied only while its ticket is still the current one, so a
//! slow load for a section the operator has already left can never overwrite the editor.

use std::sync::Arc;

use preview::{
    Preview, RenderResult, SectionConfig, SectionKind,
    gallery::GalleryTemplate,
    templates::{default_config, generate},
};
use serde_json::Value;
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    Notice, NoticeDispatcher, Result,
    export::{ExportBundle, ExportOptions, export},
    store::{SectionId, SectionStore, StoredSection},
};

/// Identifies one selection. Only the reply carrying the current ticket is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Monotonic selection counter.
    pub epoch: u64,
    /// The section the selection was for.
    pub section: SectionId,
}

/// The outcome of a background load, tagged with the selection it answers.
#[derive(Debug)]
pub struct LoadReply {
    /// Selection this reply answers.
    pub ticket: Ticket,
    /// What the store returned.
    pub outcome: Result<StoredSection>,
}

/// What applying a load reply did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The stored record was loaded into the editor.
    Loaded,
    /// The load failed; the editor holds the kind's sample config instead.
    Defaulted,
    /// The reply was for a superseded selection and was dropped.
    Stale,
    /// No load was outstanding, so nothing was applied.
    Idle,
}

/// Editable state of the current section.
#[derive(Debug, Clone)]
pub struct Editor {
    /// Section being edited.
    pub section: SectionId,
    /// Built-in kind, when the id names one.
    pub kind: Option<SectionKind>,
    /// Current config.
    pub config: SectionConfig,
    /// Current component source.
    pub code: String,
    /// Custom CSS.
    pub css: Option<String>,
    /// A load for this section is outstanding.
    pub loading: bool,
}

impl Editor {
    /// Empty placeholder state shown while `section` loads.
    fn placeholder(section: SectionId) -> Self {
        Self {
            kind: section.kind(),
            section,
            config: SectionConfig::new(),
            code: String::new(),
            css: None,
            loading: true,
        }
    }

    /// The record this editor would save.
    pub fn to_stored(&self) -> StoredSection {
        StoredSection {
            config: self.config.clone(),
            code: self.code.clone(),
            css: self.css.clone(),
        }
    }
}

/// One operator's editing session.
pub struct Session {
    /// Section storage.
    store: Arc<dyn SectionStore>,
    /// Operator notices.
    notices: NoticeDispatcher,
    /// Last issued selection counter.
    epoch: u64,
    /// Ticket of the current selection.
    current: Ticket,
    /// Editor state for the current section.
    editor: Editor,
    /// Live preview of the editor state.
    preview: Preview,
    /// Sender handed to load tasks.
    replies_tx: UnboundedSender<LoadReply>,
    /// Load replies, in completion order.
    replies_rx: UnboundedReceiver<LoadReply>,
}

impl Session {
    /// A session with `initial` selected but not yet loaded. Call [`Session::select`] to load.
    pub fn new(store: Arc<dyn SectionStore>, notices: NoticeDispatcher, initial: SectionId) -> Self {
        let (replies_tx, replies_rx) = unbounded_channel();
        let mut editor = Editor::placeholder(initial.clone());
        editor.loading = false;
        Self {
            store,
            notices,
            epoch: 0,
            current: Ticket {
                epoch: 0,
                section: initial,
            },
            editor,
            preview: Preview::new(),
            replies_tx,
            replies_rx,
        }
    }

    /// The current selection.
    pub fn ticket(&self) -> &Ticket {
        &self.current
    }

    /// Editor state of the current section.
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Read access to the live preview.
    pub fn preview_state(&self) -> &Preview {
        &self.preview
    }

    /// Issue a new ticket for `section`, invalidating any outstanding load.
    fn bump(&mut self, section: SectionId) -> Ticket {
        self.epoch += 1;
        self.current = Ticket {
            epoch: self.epoch,
            section,
        };
        self.current.clone()
    }

    /// Best-effort notice delivery. A closed channel is logged, never fatal.
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.notices.send(notice) {
            warn!(error = %e, "notice dropped");
        }
    }

    /// Select `section` and start loading it in the background.
    ///
    /// The editor switches to an empty placeholder immediately and the preview resets.
    pub fn select(&mut self, section: SectionId) -> Ticket {
        let ticket = self.bump(section.clone());
        self.editor = Editor::placeholder(section.clone());
        self.preview.reset();

        let store = self.store.clone();
        let tx = self.replies_tx.clone();
        let reply_ticket = ticket.clone();
        tokio::spawn(async move {
            let outcome = store.load(&section).await;
            if tx
                .send(LoadReply {
                    ticket: reply_ticket,
                    outcome,
                })
                .is_err()
            {
                debug!(section = %section, "session gone before load finished");
            }
        });
        debug!(epoch = ticket.epoch, section = %ticket.section, "section selected");
        ticket
    }

    /// Apply a load reply if it answers the current selection.
    pub fn apply(&mut self, reply: LoadReply) -> Applied {
        if reply.ticket != self.current {
            debug!(
                reply_epoch = reply.ticket.epoch,
                reply_section = %reply.ticket.section,
                current_epoch = self.current.epoch,
                "dropping stale load reply"
            );
            return Applied::Stale;
        }

        self.editor.loading = false;
        match reply.outcome {
            Ok(stored) => {
                self.editor.config = stored.config;
                self.editor.code = stored.code;
                self.editor.css = stored.css;
                Applied::Loaded
            }
            Err(e) => {
                warn!(section = %reply.ticket.section, error = %e, "section load failed");
                self.notify(Notice::error(
                    "Load failed",
                    format!("Failed to load section data: {}", e),
                ));
                self.editor.config = self.editor.kind.map(default_config).unwrap_or_default();
                self.editor.code = self
                    .editor
                    .kind
                    .map(|kind| generate(kind, &self.editor.config))
                    .unwrap_or_default();
                self.editor.css = None;
                Applied::Defaulted
            }
        }
    }

    /// Wait for the next load reply, whichever selection it answers.
    pub async fn next_reply(&mut self) -> Option<LoadReply> {
        self.replies_rx.recv().await
    }

    /// Apply replies as they arrive until the current selection has loaded.
    ///
    /// Returns [`Applied::Idle`] at once when nothing is outstanding.
    pub async fn settle(&mut self) -> Applied {
        while self.editor.loading {
            let Some(reply) = self.replies_rx.recv().await else {
                break;
            };
            match self.apply(reply) {
                Applied::Stale => continue,
                applied => return applied,
            }
        }
        Applied::Idle
    }

    /// Replace the whole config.
    pub fn set_config(&mut self, config: SectionConfig) {
        self.editor.config = config;
    }

    /// Set one config field.
    pub fn set_field(&mut self, key: &str, value: Value) {
        self.editor.config.set(key, value);
    }

    /// Replace the component source.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.editor.code = code.into();
    }

    /// Replace the custom CSS.
    pub fn set_css(&mut self, css: Option<String>) {
        self.editor.css = css;
    }

    /// Regenerate the component source from the config. Returns false for custom sections.
    pub fn generate_code(&mut self) -> bool {
        let Some(kind) = self.editor.kind else {
            self.notify(Notice::warn(
                "Generation unavailable",
                format!("No generator for section '{}'", self.editor.section),
            ));
            return false;
        };
        self.editor.code = generate(kind, &self.editor.config);
        self.notify(Notice::success(
            "Code Generated",
            "Fresh code generated based on your configuration!",
        ));
        true
    }

    /// Render the editor state, reusing the cached result when nothing changed.
    pub fn preview(&mut self) -> &RenderResult {
        self.preview.update(&self.editor.code, &self.editor.config)
    }

    /// Save the editor state on a background task. Outcome is reported as a notice.
    ///
    /// The in-memory editor is never touched, whatever the outcome.
    pub fn save(&self) -> JoinHandle<Result<()>> {
        let store = self.store.clone();
        let notices = self.notices.clone();
        let id = self.editor.section.clone();
        let record = self.editor.to_stored();
        tokio::spawn(async move {
            let result = store.save(&id, &record).await;
            let notice = match &result {
                Ok(()) => Notice::success("Saved", format!("Section {} saved successfully!", id)),
                Err(e) => Notice::error("Save failed", format!("Failed to save section {}: {}", id, e)),
            };
            if let Err(e) = notices.send(notice) {
                warn!(error = %e, "notice dropped");
            }
            result
        })
    }

    /// Load a gallery template into the editor, superseding any outstanding load.
    pub fn apply_template(&mut self, template: &GalleryTemplate) -> Ticket {
        let ticket = self.bump(SectionId::from(template.kind));
        self.editor = Editor {
            section: ticket.section.clone(),
            kind: Some(template.kind),
            config: template.config(),
            code: template.code(),
            css: None,
            loading: false,
        };
        self.notify(Notice::info(
            "Template Loaded",
            format!("{} template has been loaded for editing", template.name),
        ));
        ticket
    }

    /// Export the current section.
    pub fn export(&self, options: &ExportOptions) -> ExportBundle {
        export(options, &[(self.editor.section.clone(), self.editor.to_stored())])
    }
}
