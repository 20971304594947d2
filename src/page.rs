//! The page: two widgets, one shared repository, one shared result area.

use std::sync::Arc;

use crate::dto::DeleteBindingRequest;
use crate::errors::ApiError;
use crate::prompt::{DELETE_CONFIRM, DELETE_ERROR_ALERT, DELETE_FAILED_ALERT, Prompter};
use crate::services::{CodeApi, CodeRepository};
use crate::utils::normalize_code;
use crate::widget::{BindOutcome, ResultPanel, Validation, Widget, WidgetKind, WidgetView};

/// Result of [`Page::delete_binding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user backed out at the confirmation
    Cancelled,
    /// The binding is gone and the page was rebuilt
    Deleted,
    /// The server refused or was unreachable; nothing changed
    Failed(ApiError),
}

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub active: WidgetKind,
    pub account: WidgetView,
    pub guard: WidgetView,
    pub result: ResultPanel,
}

#[derive(Debug)]
pub struct Page {
    repository: Arc<CodeRepository>,
    account: Widget,
    guard: Widget,
    active: WidgetKind,
    result_owner: Option<WidgetKind>,
}

impl Page {
    /// Build a page whose widgets share one repository over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn CodeApi>) -> Self {
        Self::with_repository(Arc::new(CodeRepository::new(api)))
    }

    #[must_use]
    pub fn with_repository(repository: Arc<CodeRepository>) -> Self {
        Self {
            account: Widget::new(WidgetKind::Account, Arc::clone(&repository)),
            guard: Widget::new(WidgetKind::Guard, Arc::clone(&repository)),
            repository,
            active: WidgetKind::Account,
            result_owner: None,
        }
    }

    #[must_use]
    pub const fn active(&self) -> WidgetKind {
        self.active
    }

    /// Switch the visible section.
    pub fn show_section(&mut self, kind: WidgetKind) {
        self.active = kind;
    }

    #[must_use]
    pub const fn widget(&self, kind: WidgetKind) -> &Widget {
        match kind {
            WidgetKind::Account => &self.account,
            WidgetKind::Guard => &self.guard,
        }
    }

    pub const fn widget_mut(&mut self, kind: WidgetKind) -> &mut Widget {
        match kind {
            WidgetKind::Account => &mut self.account,
            WidgetKind::Guard => &mut self.guard,
        }
    }

    /// Both widgets at once, for driving them concurrently.
    pub const fn widgets_mut(&mut self) -> (&mut Widget, &mut Widget) {
        (&mut self.account, &mut self.guard)
    }

    pub fn set_input(&mut self, kind: WidgetKind, raw: &str) {
        self.widget_mut(kind).set_input(raw);
    }

    pub fn select_game(&mut self, kind: WidgetKind, game: &str) -> bool {
        self.widget_mut(kind).select_game(game)
    }

    pub async fn validate(&mut self, kind: WidgetKind) -> Validation {
        let validation = self.widget_mut(kind).validate().await;
        if validation != Validation::Empty {
            self.result_owner = Some(kind);
        }
        validation
    }

    pub async fn request_bind(&mut self, kind: WidgetKind, prompter: &dyn Prompter) -> BindOutcome {
        let outcome = self.widget_mut(kind).request_bind(prompter).await;
        if matches!(
            outcome,
            BindOutcome::Bound { .. } | BindOutcome::BoundOptimistically { .. }
        ) {
            self.result_owner = Some(kind);
        }
        outcome
    }

    /// Administrative removal of a binding.
    ///
    /// Asks for confirmation first. On success the whole page is rebuilt from
    /// scratch; on any failure the user is alerted and nothing changes.
    pub async fn delete_binding(&mut self, raw_code: &str, prompter: &dyn Prompter) -> DeleteOutcome {
        if !prompter.confirm(DELETE_CONFIRM).await {
            return DeleteOutcome::Cancelled;
        }

        let request = DeleteBindingRequest {
            code: normalize_code(raw_code),
        };
        match self.repository.api().delete_binding(&request).await {
            Ok(_) => {
                tracing::info!(code = %request.code, "Binding deleted");
                self.reload().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                tracing::error!(code = %request.code, "Delete failed: {err}");
                let alert = if err.is_rejection() {
                    DELETE_FAILED_ALERT
                } else {
                    DELETE_ERROR_ALERT
                };
                prompter.alert(alert).await;
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// Drop all transient state and start over with a fresh snapshot.
    pub async fn reload(&mut self) {
        self.account.reset();
        self.guard.reset();
        self.active = WidgetKind::Account;
        self.result_owner = None;
        self.repository.clear().await;
        self.repository.snapshot_fresh().await;
    }

    #[must_use]
    pub fn render(&self) -> PageView {
        let result = self
            .result_owner
            .map(|kind| self.widget(kind).result().clone())
            .unwrap_or_default();

        PageView {
            active: self.active,
            account: self.account.render(),
            guard: self.guard.render(),
            result,
        }
    }
}
