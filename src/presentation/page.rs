use serde::Serialize;

use crate::{
    models::{AuthMode, Panel, Tab, User, KNOWN_CATEGORIES},
    services::ViewController,
};

use super::{DetailView, GridView};

/// Whole browsing page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageView {
    pub header: HeaderView,
    pub tabs: Vec<TabView>,
    pub categories: Vec<CategoryOption>,
    pub search_term: String,
    pub body: Body,
    pub detail: Option<DetailView>,
    pub auth_dialog: Option<AuthDialogView>,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeaderView {
    pub user: Option<UserView>,
    pub panel: Panel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub email: Option<String>,
    pub role_label: &'static str,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            role_label: user.role_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TabView {
    pub tab: Tab,
    pub label: &'static str,
    pub active: bool,
}

/// Category selector entry; only the fixed list is offered
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Main content area
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Body {
    Loading,
    Error { message: String },
    /// Filters matched nothing; not an error
    Empty,
    Grid(GridView),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthDialogView {
    pub mode: AuthMode,
    pub title: &'static str,
    pub submit_label: &'static str,
    pub switch_label: &'static str,
    pub pending: bool,
    pub error: Option<String>,
}

/// Builds the page from the controller's current state
pub fn render(controller: &ViewController) -> PageView {
    let state = controller.state();

    let tabs = Tab::ALL
        .into_iter()
        .map(|tab| TabView {
            tab,
            label: tab.label(),
            active: tab == state.active_tab,
        })
        .collect();

    let categories = std::iter::once(("all", "Toutes les catégories"))
        .chain(KNOWN_CATEGORIES.iter().map(|c| (*c, *c)))
        .map(|(value, label)| CategoryOption {
            value: value.to_string(),
            label: label.to_string(),
            selected: state.category.as_str() == value,
        })
        .collect();

    let body = if state.loading {
        Body::Loading
    } else if let Some(message) = &state.error {
        Body::Error {
            message: message.clone(),
        }
    } else {
        let visible = controller.visible();
        if visible.is_empty() {
            Body::Empty
        } else {
            Body::Grid(GridView::new(&visible))
        }
    };

    let auth_dialog = state.auth_dialog.as_ref().map(|dialog| {
        let (title, submit_label, switch_label) = match dialog.mode {
            AuthMode::Login => ("Connexion", "Se connecter", "Pas de compte ? S'inscrire"),
            AuthMode::SignUp => ("Créer un compte", "S'inscrire", "Déjà un compte ? Se connecter"),
        };
        AuthDialogView {
            mode: dialog.mode,
            title,
            submit_label: if dialog.pending { "Chargement..." } else { submit_label },
            switch_label,
            pending: dialog.pending,
            error: dialog.error.clone(),
        }
    });

    PageView {
        header: HeaderView {
            user: controller.user().map(UserView::from),
            panel: state.panel,
        },
        tabs,
        categories,
        search_term: state.search_term.clone(),
        body,
        detail: controller
            .selected_recommendation()
            .map(|rec| DetailView::new(rec, controller.user().is_some())),
        auth_dialog,
        dark_mode: state.dark_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::{CategoryFilter, Recommendation};
    use crate::services::providers::static_source::mock_recommendations;

    fn loaded_with(recs: Vec<Recommendation>) -> ViewController {
        let mut controller = ViewController::new();
        let ticket = controller.begin_fetch();
        controller.fetch_complete(ticket, Ok(recs));
        controller
    }

    fn card_ids(page: &PageView) -> Vec<&str> {
        match &page.body {
            Body::Grid(grid) => grid.cards.iter().map(|c| c.id.as_str()).collect(),
            other => panic!("expected grid, got {:?}", other),
        }
    }

    #[test]
    fn test_loading_body() {
        let page = render(&ViewController::new());
        assert_eq!(page.body, Body::Loading);
        assert!(page.detail.is_none());
    }

    #[test]
    fn test_error_body() {
        let mut controller = ViewController::new();
        let ticket = controller.begin_fetch();
        controller.fetch_complete(ticket, Err(FetchError::Decode("eof".to_string())));

        let page = render(&controller);
        assert!(matches!(page.body, Body::Error { .. }));
    }

    #[test]
    fn test_grid_follows_pipeline() {
        let mut controller = loaded_with(mock_recommendations());
        controller.select_tab(Tab::Top);
        let page = render(&controller);
        assert_eq!(card_ids(&page), vec!["5", "1", "3", "4", "2", "6"]);
        assert!(page.tabs.iter().any(|t| t.tab == Tab::Top && t.active));
        assert_eq!(page.tabs.iter().filter(|t| t.active).count(), 1);
    }

    #[test]
    fn test_no_results_is_empty_not_error() {
        let mut controller = loaded_with(mock_recommendations());
        controller.set_search_term("astronomie");
        let page = render(&controller);
        assert_eq!(page.body, Body::Empty);
    }

    #[test]
    fn test_category_options_are_fixed() {
        let mut recs = mock_recommendations();
        recs[0].category = "Jardinage".to_string();
        let mut controller = loaded_with(recs);
        controller.select_category("Science").unwrap();

        let page = render(&controller);
        let values: Vec<&str> = page.categories.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["all", "Education", "Technologie", "Science", "Marketing"]);
        assert_eq!(page.categories[0].label, "Toutes les catégories");
        assert!(page.categories[3].selected);
        assert_eq!(controller.state().category, CategoryFilter::Only("Science".to_string()));
    }

    #[test]
    fn test_detail_requires_user_to_like() {
        let mut controller = loaded_with(mock_recommendations());
        controller.open_detail("3").unwrap();

        let page = render(&controller);
        let detail = page.detail.unwrap();
        assert_eq!(detail.card.id, "3");
        assert!(!detail.can_like);
    }

    #[test]
    fn test_auth_dialog_labels() {
        let mut controller = loaded_with(mock_recommendations());
        controller.open_auth_dialog(AuthMode::SignUp);
        controller.auth_started();

        let dialog = render(&controller).auth_dialog.unwrap();
        assert_eq!(dialog.title, "Créer un compte");
        assert_eq!(dialog.submit_label, "Chargement...");
        assert_eq!(dialog.switch_label, "Déjà un compte ? Se connecter");
    }

    #[test]
    fn test_body_wire_format() {
        let json = serde_json::to_value(Body::Error {
            message: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"state": "error", "message": "x"}));
        assert_eq!(
            serde_json::to_value(Body::Empty).unwrap(),
            serde_json::json!({"state": "empty"})
        );
    }
}
