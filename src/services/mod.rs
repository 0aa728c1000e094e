pub mod controller;
pub mod likes;
pub mod pipeline;
pub mod providers;
pub mod recommendations;
pub mod session;

pub use controller::{Effect, FetchTicket, Notice, ViewController};
pub use likes::{LikeStore, RestLikeStore};
pub use providers::{RecommendationSource, RestSource, StaticSource};
pub use session::{HostedAuthClient, SessionProvider};
