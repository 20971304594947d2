//! Validator/binder widget.
//!
//! One widget per input field. Each holds only transient state for the current
//! input session; the code list itself lives in the shared [`CodeRepository`].
//! All visible UI comes out of [`Widget::render`].

pub mod view;

use std::fmt;
use std::sync::Arc;

use crate::dto::BindRequest;
use crate::errors::ApiError;
use crate::prompt::{Prompter, SELECT_GAME_ALERT};
use crate::services::CodeRepository;
use crate::utils::Code;

pub use view::{Icon, ResultPanel, SelectorView, WidgetView};

/// The two input variants on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Account,
    Guard,
}

impl WidgetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Guard => "guard",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the widget stands in the validate/bind flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// No input
    #[default]
    Empty,
    /// Input edited since the last validation
    Pending,
    /// Neither listed nor bound
    Invalid,
    /// Listed and free to bind
    ValidUnbound,
    /// Permanently bound
    ValidBound { game: String },
}

/// Result of [`Widget::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Empty,
    Invalid { code: Code },
    Unbound { code: Code },
    Bound { code: Code, game: String },
}

/// Why a bind request never reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindRefusal {
    EmptyInput,
    NoGameSelected,
    /// The current input is not the code that last validated correct
    NotValidated,
    /// The code disappeared between validation and the request
    InvalidCode,
    /// The selector is locked: the code is bound or a bind was already attempted
    Locked,
}

/// Result of [`Widget::request_bind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    Refused(BindRefusal),
    /// Someone else bound it first; the selector now shows their game
    AlreadyBound { game: String },
    /// The server confirmed the binding
    Bound { code: Code, game: String },
    /// The server refused or was unreachable, but the UI shows the binding anyway
    BoundOptimistically {
        code: Code,
        game: String,
        error: ApiError,
    },
}

#[derive(Debug)]
pub struct Widget {
    kind: WidgetKind,
    repository: Arc<CodeRepository>,
    input: String,
    selected_game: Option<String>,
    phase: Phase,
    last_validation_was_correct: bool,
    current_valid_code: Option<Code>,
    result: ResultPanel,
}

impl Widget {
    #[must_use]
    pub fn new(kind: WidgetKind, repository: Arc<CodeRepository>) -> Self {
        Self {
            kind,
            repository,
            input: String::new(),
            selected_game: None,
            phase: Phase::Empty,
            last_validation_was_correct: false,
            current_valid_code: None,
            result: ResultPanel::Placeholder,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        self.kind
    }

    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The code that last validated correct in this input session, if any.
    #[must_use]
    pub fn validated_code(&self) -> Option<&Code> {
        if self.last_validation_was_correct {
            self.current_valid_code.as_ref()
        } else {
            None
        }
    }

    #[must_use]
    pub const fn result(&self) -> &ResultPanel {
        &self.result
    }

    /// Replace the raw input text. Starts a new input session.
    pub fn set_input(&mut self, raw: &str) {
        self.input = raw.to_string();
        self.last_validation_was_correct = false;
        self.current_valid_code = None;
        self.selected_game = None;
        self.phase = if raw.is_empty() {
            Phase::Empty
        } else {
            Phase::Pending
        };
    }

    /// Pick a game in the selector. Returns `false` while the selector is locked.
    pub fn select_game(&mut self, game: &str) -> bool {
        if self.selector_locked() {
            tracing::debug!(widget = %self.kind, "Ignoring game selection on locked selector");
            return false;
        }
        let game = game.trim();
        self.selected_game = (!game.is_empty()).then(|| game.to_string());
        true
    }

    /// Check the current input against a freshly fetched snapshot.
    pub async fn validate(&mut self) -> Validation {
        let Some(code) = Code::parse(&self.input) else {
            self.phase = Phase::Empty;
            return Validation::Empty;
        };

        let snapshot = self.repository.snapshot_fresh().await;
        let bound_game = snapshot.bound_game(&code).map(ToString::to_string);
        let is_valid = snapshot.is_listed(&code) || bound_game.is_some();

        self.last_validation_was_correct = is_valid;
        self.current_valid_code = is_valid.then(|| code.clone());

        let validation = match bound_game {
            Some(game) => {
                self.phase = Phase::ValidBound { game: game.clone() };
                self.selected_game = Some(game.clone());
                self.result = ResultPanel::Bound {
                    code: code.clone(),
                    game: game.clone(),
                };
                Validation::Bound { code, game }
            }
            None if is_valid => {
                self.phase = Phase::ValidUnbound;
                self.selected_game = None;
                self.result = ResultPanel::ChooseGame;
                Validation::Unbound { code }
            }
            None => {
                self.phase = Phase::Invalid;
                self.selected_game = None;
                self.result = ResultPanel::InvalidCode;
                Validation::Invalid { code }
            }
        };

        tracing::info!(widget = %self.kind, outcome = ?validation, "Validated code");
        validation
    }

    /// Ask the server to bind the validated code to the selected game.
    ///
    /// Once the request is sent the widget locks regardless of the answer: a
    /// binding is treated as irreversible as soon as it has been attempted.
    pub async fn request_bind(&mut self, prompter: &dyn Prompter) -> BindOutcome {
        let Some(code) = Code::parse(&self.input) else {
            return self.refuse(BindRefusal::EmptyInput);
        };
        let Some(game) = self.selected_game.clone() else {
            prompter.alert(SELECT_GAME_ALERT).await;
            return self.refuse(BindRefusal::NoGameSelected);
        };
        if self.validated_code() != Some(&code) {
            return self.refuse(BindRefusal::NotValidated);
        }
        if self.phase != Phase::ValidUnbound {
            return self.refuse(BindRefusal::Locked);
        }

        let snapshot = self.repository.snapshot_cached().await;
        if !snapshot.is_valid(&code) {
            return self.refuse(BindRefusal::InvalidCode);
        }
        if let Some(existing) = snapshot.bound_game(&code) {
            tracing::info!(widget = %self.kind, %code, game = existing, "Code already bound");
            self.lock_to(existing.to_string());
            return BindOutcome::AlreadyBound {
                game: existing.to_string(),
            };
        }

        let request = BindRequest {
            code: code.to_string(),
            game: game.clone(),
        };
        let response = self.repository.api().bind(&request).await;

        // Lock first: the binding is shown as permanent whatever the server said.
        self.lock_to(game.clone());
        self.result = ResultPanel::Bound {
            code: code.clone(),
            game: game.clone(),
        };

        match response {
            Ok(_) => {
                tracing::info!(widget = %self.kind, %code, %game, "Binding successful");
                self.repository.snapshot_fresh().await;
                BindOutcome::Bound { code, game }
            }
            Err(error) => {
                // Fail-open: shown as bound even though the server never stored it.
                tracing::warn!(
                    widget = %self.kind,
                    %code,
                    %game,
                    "Binding failed, showing it as bound anyway: {error}"
                );
                BindOutcome::BoundOptimistically { code, game, error }
            }
        }
    }

    /// Derive everything visible from the current state.
    #[must_use]
    pub fn render(&self) -> WidgetView {
        let icon = match self.phase {
            Phase::Empty | Phase::Pending => Icon::Blank,
            Phase::Invalid => Icon::Wrong,
            Phase::ValidUnbound | Phase::ValidBound { .. } => Icon::Correct,
        };
        let selector = match &self.phase {
            Phase::ValidBound { game } => SelectorView {
                value: Some(game.clone()),
                locked: true,
            },
            _ => SelectorView {
                value: self.selected_game.clone(),
                locked: false,
            },
        };

        WidgetView {
            kind: self.kind,
            input: self.input.clone(),
            icon,
            selector,
            bind_enabled: self.phase == Phase::ValidUnbound,
            result: self.result.clone(),
        }
    }

    /// Back to a blank input with nothing validated.
    pub fn reset(&mut self) {
        self.set_input("");
        self.result = ResultPanel::Placeholder;
    }

    const fn selector_locked(&self) -> bool {
        matches!(self.phase, Phase::ValidBound { .. })
    }

    fn lock_to(&mut self, game: String) {
        self.selected_game = Some(game.clone());
        self.phase = Phase::ValidBound { game };
    }

    fn refuse(&self, reason: BindRefusal) -> BindOutcome {
        tracing::debug!(widget = %self.kind, ?reason, "Bind request ignored");
        BindOutcome::Refused(reason)
    }
}
