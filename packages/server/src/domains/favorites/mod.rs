//! Favorites domain - per-member bookmarked dictionary entries

pub mod actions;
pub mod data;
pub mod models;

pub use data::FavoritePage;
pub use models::{Favorite, FavoriteEntry};
