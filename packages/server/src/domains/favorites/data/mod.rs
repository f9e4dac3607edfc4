use serde::{Deserialize, Serialize};

use crate::domains::favorites::models::FavoriteEntry;

/// One page of a member's favorites, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePage {
    pub items: Vec<FavoriteEntry>,
    pub page: i64,
    pub size: i64,
    pub total: i64,
}
