//! User-facing confirmations and alerts.

use async_trait::async_trait;

/// Shown when a bind is requested with no game chosen.
pub const SELECT_GAME_ALERT: &str = "Please select a game";
/// Asked before deleting a binding.
pub const DELETE_CONFIRM: &str = "Are you sure you want to delete this binding?";
/// Server refused the delete.
pub const DELETE_FAILED_ALERT: &str = "Deleting the binding failed.";
/// Server could not be reached for the delete.
pub const DELETE_ERROR_ALERT: &str = "An error occurred while deleting the binding.";

/// Blocking questions and notices addressed to the person at the keyboard.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question. Anything but an explicit yes is a no.
    async fn confirm(&self, message: &str) -> bool;

    /// Show a notice that needs no answer.
    async fn alert(&self, message: &str);
}
