//! Cart panel visibility.

use serde::{Deserialize, Serialize};

/// Whether the cart side panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartPanel {
    #[default]
    Closed,
    Open,
}

/// Events that move the panel between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelTrigger {
    /// An item was added to the cart.
    AddToCart,
    /// The cart icon in the header was clicked.
    CartIcon,
    /// The panel's close button was clicked.
    CloseButton,
    /// Escape was pressed anywhere on the page.
    EscapeKey,
}

impl CartPanel {
    /// State after `trigger`.
    #[must_use]
    pub const fn on(self, trigger: PanelTrigger) -> Self {
        match trigger {
            PanelTrigger::AddToCart | PanelTrigger::CartIcon => Self::Open,
            PanelTrigger::CloseButton | PanelTrigger::EscapeKey => Self::Closed,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}
