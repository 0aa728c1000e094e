use serde::{Deserialize, Serialize};

use super::{AuthMode, Panel, Tab};

/// User intents forwarded by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    SelectTab { tab: Tab },
    SelectCategory { category: String },
    SetSearchTerm { term: String },
    OpenDetail { id: String },
    CloseDetail,
    /// Load the collection again; a still-pending load is superseded
    Reload,
    TogglePanel { panel: Panel },
    OpenAuthDialog { mode: AuthMode },
    SwitchAuthMode,
    CloseAuthDialog,
    ToggleDarkMode,
}
