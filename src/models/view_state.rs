use serde::{Deserialize, Serialize};

use super::{CategoryFilter, Tab};

/// Header panel currently open; at most one at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    #[default]
    Closed,
    /// Side navigation menu
    Menu,
    Notifications,
    UserMenu,
    Contact,
    About,
}

impl Panel {
    /// Opens `target`, or closes it when it is already the open panel
    pub fn toggled(self, target: Panel) -> Panel {
        if self == target {
            Panel::Closed
        } else {
            target
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
}

impl AuthMode {
    pub fn switched(self) -> AuthMode {
        match self {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
        }
    }
}

/// Sign-in / sign-up form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthDialog {
    pub mode: AuthMode,
    /// A request to the auth service is in flight
    pub pending: bool,
    /// Last auth service error, verbatim
    pub error: Option<String>,
}

impl AuthDialog {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// Every user-visible choice and transient fetch flag of the browsing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub active_tab: Tab,
    pub category: CategoryFilter,
    pub search_term: String,
    /// Id of the record shown in the detail view
    pub selected: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub panel: Panel,
    pub auth_dialog: Option<AuthDialog>,
    pub dark_mode: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_tab: Tab::All,
            category: CategoryFilter::All,
            search_term: String::new(),
            selected: None,
            loading: true,
            error: None,
            panel: Panel::Closed,
            auth_dialog: None,
            dark_mode: false,
        }
    }
}
