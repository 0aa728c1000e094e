pub mod filters;
pub mod intent;
pub mod recommendation;
pub mod session;
pub mod view_state;

pub use filters::{CategoryFilter, Tab, KNOWN_CATEGORIES};
pub use intent::Intent;
pub use recommendation::Recommendation;
pub use session::{Session, User};
pub use view_state::{AuthDialog, AuthMode, Panel, ViewState};
