//! View models handed to the front-end
//!
//! Everything here is derived from a `ViewController` snapshot and carries no
//! state of its own. User actions come back as `Intent` values.
pub mod card;
pub mod page;

pub use card::{CardView, DetailView, GridView};
pub use page::{
    render, AuthDialogView, Body, CategoryOption, HeaderView, PageView, TabView, UserView,
};
