use std::fmt;

use crate::utils::Code;
use crate::widget::WidgetKind;

/// Validation icon next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Icon {
    #[default]
    Blank,
    Correct,
    Wrong,
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Correct => f.write_str("✓"),
            Self::Wrong => f.write_str("✗"),
        }
    }
}

/// Game selector: current value and whether the user may change it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorView {
    pub value: Option<String>,
    pub locked: bool,
}

/// Contents of the result area shared by both widgets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultPanel {
    /// Nothing validated yet
    #[default]
    Placeholder,
    /// Valid, unbound code: pick a game and request the bind
    ChooseGame,
    /// Code is neither listed nor bound
    InvalidCode,
    /// Permanent binding
    Bound { code: Code, game: String },
}

impl fmt::Display for ResultPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("Enter a code and press Validate"),
            Self::ChooseGame => f.write_str("Choose a game and press Request"),
            Self::InvalidCode => f.write_str("❌ Invalid code"),
            Self::Bound { code, game } => {
                writeln!(f, "✓ SUCCESSFUL - Code linked to game!")?;
                writeln!(f, "Code: {code}")?;
                writeln!(f, "Game: {game}")?;
                f.write_str("This binding is permanent. It can only be changed on the server.")
            }
        }
    }
}

/// Everything a widget shows, derived from its state in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub kind: WidgetKind,
    pub input: String,
    pub icon: Icon,
    pub selector: SelectorView,
    pub bind_enabled: bool,
    pub result: ResultPanel,
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selector = self.selector.value.as_deref().unwrap_or("-");
        let lock = if self.selector.locked { " (locked)" } else { "" };
        let bind = if self.bind_enabled { "enabled" } else { "disabled" };
        write!(
            f,
            "[{}] code: {:?} {} | game: {selector}{lock} | request: {bind}",
            self.kind, self.input, self.icon
        )
    }
}
