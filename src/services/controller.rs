//! View state controller
//!
//! Owns the `ViewState`, the loaded collection and the signed-in user. Every
//! user intent is a synchronous transition here; suspending work (fetches,
//! auth calls, likes) happens outside and reports back through the
//! `*_complete`/`*_finished` methods.
use serde::Serialize;
use tokio::sync::broadcast;

use crate::{
    error::{AppError, AppResult, AuthError, FetchError, IntentError, PersistError},
    models::{
        AuthDialog, AuthMode, CategoryFilter, Intent, Panel, Recommendation, Tab, User, ViewState,
    },
    services::pipeline::{filter_recommendations, Filters},
};

/// Inline message shown when the collection cannot be loaded
pub const FETCH_FAILED_MESSAGE: &str = "Impossible de charger les recommandations.";

const NOTICE_CAPACITY: usize = 32;

/// Identifies one fetch; only the latest ticket may complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Follow-up work the caller must run after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
}

/// Outcome events the UI can subscribe to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    FetchFailed { message: String },
    AuthFailed { message: String },
    LikeRecorded { recommendation_id: String },
    LikeFailed { recommendation_id: String, message: String },
}

impl Notice {
    /// Snake-case name, matching the serialized `kind`
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::FetchFailed { .. } => "fetch_failed",
            Notice::AuthFailed { .. } => "auth_failed",
            Notice::LikeRecorded { .. } => "like_recorded",
            Notice::LikeFailed { .. } => "like_failed",
        }
    }
}

pub struct ViewController {
    state: ViewState,
    recommendations: Vec<Recommendation>,
    user: Option<User>,
    generation: u64,
    notices: broadcast::Sender<Notice>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            state: ViewState::default(),
            recommendations: Vec::new(),
            user: None,
            generation: 0,
            notices,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn filters(&self) -> Filters {
        Filters {
            tab: self.state.active_tab,
            category: self.state.category.clone(),
            search_term: self.state.search_term.clone(),
        }
    }

    /// Current pipeline output
    pub fn visible(&self) -> Vec<&Recommendation> {
        filter_recommendations(&self.recommendations, &self.filters())
    }

    pub fn selected_recommendation(&self) -> Option<&Recommendation> {
        let id = self.state.selected.as_deref()?;
        self.find(id)
    }

    fn find(&self, id: &str) -> Option<&Recommendation> {
        self.recommendations.iter().find(|rec| rec.id == id)
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine
        let _ = self.notices.send(notice);
    }

    // ─────────────────────────────────────────────────────────
    // Filter intents
    // ─────────────────────────────────────────────────────────

    pub fn select_tab(&mut self, tab: Tab) {
        self.state.active_tab = tab;
    }

    pub fn select_category(&mut self, category: &str) -> Result<(), IntentError> {
        self.state.category = CategoryFilter::parse_known(category)?;
        Ok(())
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
    }

    // ─────────────────────────────────────────────────────────
    // Detail view
    // ─────────────────────────────────────────────────────────

    /// Selects a record; it must be part of the current results
    pub fn open_detail(&mut self, id: &str) -> Result<(), IntentError> {
        if !self.visible().iter().any(|rec| rec.id == id) {
            return Err(IntentError::NotVisible(id.to_string()));
        }
        self.state.selected = Some(id.to_string());
        Ok(())
    }

    pub fn close_detail(&mut self) -> Result<(), IntentError> {
        self.state
            .selected
            .take()
            .map(|_| ())
            .ok_or(IntentError::NothingSelected)
    }

    // ─────────────────────────────────────────────────────────
    // Fetch lifecycle
    // ─────────────────────────────────────────────────────────

    /// Starts a new fetch generation; earlier tickets become stale
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state.loading = true;
        self.state.error = None;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies a fetch result. Returns false when the result was discarded.
    ///
    /// Intents issued while the fetch was pending never invalidate it: the
    /// arriving collection replaces the previous one.
    pub fn fetch_complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Recommendation>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation || !self.state.loading {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale fetch result"
            );
            return false;
        }

        self.state.loading = false;

        match result {
            Ok(recommendations) => {
                tracing::info!(count = recommendations.len(), "Recommendations loaded");
                self.recommendations = recommendations;
                self.state.error = None;
                self.drop_missing_selection();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load recommendations");
                self.state.error = Some(FETCH_FAILED_MESSAGE.to_string());
                self.notify(Notice::FetchFailed {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                });
            }
        }

        true
    }

    /// A selection whose record left the collection closes the detail view
    fn drop_missing_selection(&mut self) {
        let missing = match self.state.selected.as_deref() {
            Some(id) => self.find(id).is_none(),
            None => false,
        };
        if missing {
            tracing::debug!(selected = ?self.state.selected, "Selected record no longer loaded");
            self.state.selected = None;
        }
    }

    // ─────────────────────────────────────────────────────────
    // Header and auth dialog
    // ─────────────────────────────────────────────────────────

    pub fn toggle_panel(&mut self, panel: Panel) {
        self.state.panel = self.state.panel.toggled(panel);
    }

    pub fn open_auth_dialog(&mut self, mode: AuthMode) {
        self.state.auth_dialog = Some(AuthDialog::new(mode));
        if self.state.panel == Panel::UserMenu {
            self.state.panel = Panel::Closed;
        }
    }

    pub fn switch_auth_mode(&mut self) {
        if let Some(dialog) = self.state.auth_dialog.as_mut() {
            dialog.mode = dialog.mode.switched();
            dialog.error = None;
        }
    }

    pub fn close_auth_dialog(&mut self) {
        self.state.auth_dialog = None;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.state.dark_mode = !self.state.dark_mode;
    }

    /// Marks the auth form as submitting
    pub fn auth_started(&mut self) {
        if let Some(dialog) = self.state.auth_dialog.as_mut() {
            dialog.pending = true;
            dialog.error = None;
        }
    }

    /// Closes the form on success, otherwise keeps it open with the message
    pub fn auth_finished(&mut self, result: &Result<(), AuthError>) {
        match result {
            Ok(()) => self.state.auth_dialog = None,
            Err(e) => {
                let message = e.to_string();
                if let Some(dialog) = self.state.auth_dialog.as_mut() {
                    dialog.pending = false;
                    dialog.error = Some(message.clone());
                }
                self.notify(Notice::AuthFailed { message });
            }
        }
    }

    /// Replaces the user reference; recommendation state is untouched
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    // ─────────────────────────────────────────────────────────
    // Likes
    // ─────────────────────────────────────────────────────────

    /// Resolves `(user_id, recommendation_id)` for a like
    pub fn like_target(&self, recommendation_id: &str) -> AppResult<(String, String)> {
        let user = self.user.as_ref().ok_or(AppError::Unauthorized)?;
        let rec = self
            .find(recommendation_id)
            .ok_or_else(|| AppError::NotFound(format!("recommendation {}", recommendation_id)))?;
        Ok((user.id.clone(), rec.id.clone()))
    }

    pub fn like_finished(&self, recommendation_id: &str, result: &Result<(), PersistError>) {
        let notice = match result {
            Ok(()) => Notice::LikeRecorded {
                recommendation_id: recommendation_id.to_string(),
            },
            Err(e) => Notice::LikeFailed {
                recommendation_id: recommendation_id.to_string(),
                message: e.to_string(),
            },
        };
        self.notify(notice);
    }

    /// Applies one intent
    pub fn apply(&mut self, intent: Intent) -> Result<Option<Effect>, IntentError> {
        tracing::debug!(?intent, "Applying intent");

        match intent {
            Intent::SelectTab { tab } => self.select_tab(tab),
            Intent::SelectCategory { category } => self.select_category(&category)?,
            Intent::SetSearchTerm { term } => self.set_search_term(term),
            Intent::OpenDetail { id } => self.open_detail(&id)?,
            Intent::CloseDetail => self.close_detail()?,
            Intent::Reload => return Ok(Some(Effect::Fetch(self.begin_fetch()))),
            Intent::TogglePanel { panel } => self.toggle_panel(panel),
            Intent::OpenAuthDialog { mode } => self.open_auth_dialog(mode),
            Intent::SwitchAuthMode => self.switch_auth_mode(),
            Intent::CloseAuthDialog => self.close_auth_dialog(),
            Intent::ToggleDarkMode => self.toggle_dark_mode(),
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::static_source::mock_recommendations;

    fn loaded() -> ViewController {
        let mut controller = ViewController::new();
        let ticket = controller.begin_fetch();
        assert!(controller.fetch_complete(ticket, Ok(mock_recommendations())));
        controller
    }

    fn visible_ids(controller: &ViewController) -> Vec<&str> {
        controller.visible().iter().map(|rec| rec.id.as_str()).collect()
    }

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: Some("ana@example.com".to_string()),
            role: None,
        }
    }

    #[test]
    fn test_starts_loading_with_defaults() {
        let controller = ViewController::new();
        assert!(controller.state().loading);
        assert!(controller.visible().is_empty());
        assert_eq!(controller.filters(), Filters::default());
    }

    #[test]
    fn test_fetch_success_stores_collection() {
        let controller = loaded();
        assert!(!controller.state().loading);
        assert!(controller.state().error.is_none());
        assert_eq!(controller.recommendations().len(), 6);
    }

    #[test]
    fn test_fetch_failure_sets_generic_error() {
        let mut controller = ViewController::new();
        let mut notices = controller.subscribe();
        let ticket = controller.begin_fetch();

        let applied = controller.fetch_complete(
            ticket,
            Err(FetchError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        );

        assert!(applied);
        assert!(!controller.state().loading);
        assert_eq!(controller.state().error.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert!(controller.recommendations().is_empty());
        assert_eq!(
            notices.try_recv().unwrap(),
            Notice::FetchFailed {
                message: FETCH_FAILED_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut controller = ViewController::new();
        let first = controller.begin_fetch();
        let second = controller.begin_fetch();

        assert!(!controller.fetch_complete(first, Ok(mock_recommendations())));
        assert!(controller.state().loading);
        assert!(controller.recommendations().is_empty());

        assert!(controller.fetch_complete(second, Ok(Vec::new())));
        assert!(!controller.state().loading);
    }

    #[test]
    fn test_completed_ticket_cannot_apply_twice() {
        let mut controller = ViewController::new();
        let ticket = controller.begin_fetch();
        assert!(controller.fetch_complete(ticket, Ok(mock_recommendations())));
        assert!(!controller.fetch_complete(ticket, Ok(Vec::new())));
        assert_eq!(controller.recommendations().len(), 6);
    }

    #[test]
    fn test_intents_during_fetch_do_not_invalidate_it() {
        let mut controller = ViewController::new();
        let ticket = controller.begin_fetch();

        controller.set_search_term("data");
        controller.select_tab(Tab::Top);

        assert!(controller.fetch_complete(ticket, Ok(mock_recommendations())));
        assert_eq!(visible_ids(&controller), vec!["3"]);
    }

    #[test]
    fn test_notice_kind_matches_serialized_tag() {
        let notices = [
            Notice::FetchFailed {
                message: FETCH_FAILED_MESSAGE.to_string(),
            },
            Notice::AuthFailed {
                message: "Invalid login credentials".to_string(),
            },
            Notice::LikeRecorded {
                recommendation_id: "1".to_string(),
            },
            Notice::LikeFailed {
                recommendation_id: "1".to_string(),
                message: "boom".to_string(),
            },
        ];
        for notice in notices {
            let json = serde_json::to_value(&notice).unwrap();
            assert_eq!(json["kind"], notice.kind());
        }
    }

    #[test]
    fn test_reload_clears_selection_of_dropped_record() {
        let mut controller = loaded();
        controller.open_detail("4").unwrap();

        let ticket = controller.begin_fetch();
        let without_four: Vec<Recommendation> = mock_recommendations()
            .into_iter()
            .filter(|rec| rec.id != "4")
            .collect();
        assert!(controller.fetch_complete(ticket, Ok(without_four)));

        assert_eq!(controller.state().selected, None);
        assert!(controller.selected_recommendation().is_none());
    }

    #[test]
    fn test_reload_keeps_selection_of_surviving_record() {
        let mut controller = loaded();
        controller.open_detail("4").unwrap();

        let ticket = controller.begin_fetch();
        assert!(controller.fetch_complete(ticket, Ok(mock_recommendations())));

        assert_eq!(controller.state().selected.as_deref(), Some("4"));
    }

    #[test]
    fn test_reload_returns_fetch_effect() {
        let mut controller = loaded();
        let effect = controller.apply(Intent::Reload).unwrap();

        let Some(Effect::Fetch(ticket)) = effect else {
            panic!("expected fetch effect");
        };
        assert_eq!(ticket.generation(), 2);
        assert!(controller.state().loading);
        // Previous collection stays until the new one arrives
        assert_eq!(controller.recommendations().len(), 6);
    }

    #[test]
    fn test_select_tab_and_category() {
        let mut controller = loaded();
        controller.apply(Intent::SelectTab { tab: Tab::Trending }).unwrap();
        assert_eq!(visible_ids(&controller), vec!["1", "2", "5"]);

        controller
            .apply(Intent::SelectCategory {
                category: "Education".to_string(),
            })
            .unwrap();
        assert_eq!(visible_ids(&controller), vec!["1", "5"]);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut controller = loaded();
        let err = controller
            .apply(Intent::SelectCategory {
                category: "Jardinage".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, IntentError::UnknownCategory("Jardinage".to_string()));
        assert_eq!(controller.state().category, CategoryFilter::All);
    }

    #[test]
    fn test_search_term_any_string() {
        let mut controller = loaded();
        controller
            .apply(Intent::SetSearchTerm {
                term: "CYBER".to_string(),
            })
            .unwrap();
        assert_eq!(visible_ids(&controller), vec!["4"]);
    }

    #[test]
    fn test_open_detail_requires_visible_record() {
        let mut controller = loaded();
        controller.select_tab(Tab::Trending);

        assert_eq!(
            controller.open_detail("3"),
            Err(IntentError::NotVisible("3".to_string()))
        );
        assert!(controller.state().selected.is_none());

        controller.open_detail("2").unwrap();
        assert_eq!(controller.selected_recommendation().map(|r| r.id.as_str()), Some("2"));
    }

    #[test]
    fn test_close_detail_requires_selection() {
        let mut controller = loaded();
        assert_eq!(controller.close_detail(), Err(IntentError::NothingSelected));

        controller.open_detail("1").unwrap();
        controller.apply(Intent::CloseDetail).unwrap();
        assert!(controller.state().selected.is_none());
    }

    #[test]
    fn test_panels_are_mutually_exclusive() {
        let mut controller = loaded();
        controller.apply(Intent::TogglePanel { panel: Panel::Menu }).unwrap();
        controller
            .apply(Intent::TogglePanel {
                panel: Panel::Notifications,
            })
            .unwrap();
        assert_eq!(controller.state().panel, Panel::Notifications);

        controller
            .apply(Intent::TogglePanel {
                panel: Panel::Notifications,
            })
            .unwrap();
        assert_eq!(controller.state().panel, Panel::Closed);
    }

    #[test]
    fn test_open_auth_dialog_closes_user_menu() {
        let mut controller = loaded();
        controller.toggle_panel(Panel::UserMenu);
        controller
            .apply(Intent::OpenAuthDialog {
                mode: AuthMode::SignUp,
            })
            .unwrap();

        assert_eq!(controller.state().panel, Panel::Closed);
        assert_eq!(
            controller.state().auth_dialog.as_ref().map(|d| d.mode),
            Some(AuthMode::SignUp)
        );

        controller.apply(Intent::SwitchAuthMode).unwrap();
        assert_eq!(
            controller.state().auth_dialog.as_ref().map(|d| d.mode),
            Some(AuthMode::Login)
        );

        controller.apply(Intent::CloseAuthDialog).unwrap();
        assert!(controller.state().auth_dialog.is_none());
    }

    #[test]
    fn test_auth_failure_kept_verbatim() {
        let mut controller = loaded();
        let mut notices = controller.subscribe();
        controller.open_auth_dialog(AuthMode::Login);
        controller.auth_started();
        assert!(controller.state().auth_dialog.as_ref().unwrap().pending);

        controller.auth_finished(&Err(AuthError::Rejected(
            "Invalid login credentials".to_string(),
        )));

        let dialog = controller.state().auth_dialog.as_ref().unwrap();
        assert!(!dialog.pending);
        assert_eq!(dialog.error.as_deref(), Some("Invalid login credentials"));
        assert_eq!(
            notices.try_recv().unwrap(),
            Notice::AuthFailed {
                message: "Invalid login credentials".to_string()
            }
        );
    }

    #[test]
    fn test_auth_success_closes_dialog() {
        let mut controller = loaded();
        controller.open_auth_dialog(AuthMode::Login);
        controller.auth_started();
        controller.auth_finished(&Ok(()));
        assert!(controller.state().auth_dialog.is_none());
    }

    #[test]
    fn test_set_user_leaves_recommendation_state() {
        let mut controller = loaded();
        controller.select_tab(Tab::Top);
        let before = controller.state().clone();

        controller.set_user(Some(user()));
        assert_eq!(controller.state(), &before);
        assert_eq!(controller.user().map(|u| u.id.as_str()), Some("u-1"));
    }

    #[test]
    fn test_dark_mode_toggle() {
        let mut controller = loaded();
        controller.apply(Intent::ToggleDarkMode).unwrap();
        assert!(controller.state().dark_mode);
    }

    #[test]
    fn test_like_target_requires_user() {
        let controller = loaded();
        assert!(matches!(
            controller.like_target("1"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_like_target_requires_known_record() {
        let mut controller = loaded();
        controller.set_user(Some(user()));
        assert!(matches!(
            controller.like_target("42"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(
            controller.like_target("4").unwrap(),
            ("u-1".to_string(), "4".to_string())
        );
    }

    #[test]
    fn test_like_failure_published() {
        let controller = loaded();
        let mut notices = controller.subscribe();
        controller.like_finished(
            "4",
            &Err(PersistError::Rejected {
                status: 401,
                body: "JWT expired".to_string(),
            }),
        );

        match notices.try_recv().unwrap() {
            Notice::LikeFailed {
                recommendation_id,
                message,
            } => {
                assert_eq!(recommendation_id, "4");
                assert!(message.contains("JWT expired"));
            }
            other => panic!("unexpected notice {:?}", other),
        }
    }
}
