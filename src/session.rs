//! Session state as a value.
//!
//! Every transition consumes the session and returns the next one; nothing
//! is mutated in place. The presentation shows exactly one of: nothing, a
//! spinner, a result, or an error message.

use std::sync::Arc;

use crate::error::AnalysisFailure;
use crate::orchestrator::Ticket;
use crate::request::{InputMode, SelectedFile, UserInput};
use crate::view::ViewModel;

#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Idle,
    Loading { ticket: Ticket },
    Showing(Box<ViewModel>),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    mode: InputMode,
    file: Option<Arc<SelectedFile>>,
    /// Ticket of the latest submission this session started.
    generation: Ticket,
    presentation: Presentation,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            mode: InputMode::default(),
            file: None,
            generation: 0,
            presentation: Presentation::Idle,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_deref()
    }

    pub fn generation(&self) -> Ticket {
        self.generation
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.presentation, Presentation::Loading { .. })
    }

    /// Switching mode hides whatever was shown. A pending result for the old
    /// mode will no longer be accepted by [`Session::settle`].
    pub fn with_mode(self, mode: InputMode) -> Self {
        Self {
            mode,
            presentation: Presentation::Idle,
            ..self
        }
    }

    /// Replace the selected file. The previous one is dropped.
    pub fn with_file(self, file: SelectedFile) -> Self {
        Self {
            file: Some(Arc::new(file)),
            ..self
        }
    }

    pub fn without_file(self) -> Self {
        Self { file: None, ..self }
    }

    /// File-mode input built from the currently selected file.
    pub fn file_input(&self) -> UserInput {
        UserInput::File(self.file.as_deref().cloned())
    }

    pub fn begin(self, ticket: Ticket) -> Self {
        Self {
            generation: ticket,
            presentation: Presentation::Loading { ticket },
            ..self
        }
    }

    /// Apply the outcome of submission `ticket`. Outcomes for any ticket
    /// other than the one currently loading are ignored, as is `Superseded`.
    pub fn settle(self, ticket: Ticket, outcome: Result<ViewModel, AnalysisFailure>) -> Self {
        let pending = matches!(self.presentation, Presentation::Loading { ticket: t } if t == ticket);
        if !pending {
            return self;
        }
        let presentation = match outcome {
            Ok(vm) => Presentation::Showing(Box::new(vm)),
            Err(AnalysisFailure::Superseded) => return self,
            Err(e) => Presentation::Failed {
                message: e.user_message(),
            },
        };
        Self {
            presentation,
            ..self
        }
    }

    /// Back to idle, keeping mode and file.
    pub fn reset(self) -> Self {
        Self {
            presentation: Presentation::Idle,
            ..self
        }
    }
}
