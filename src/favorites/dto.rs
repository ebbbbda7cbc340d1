use serde::{Deserialize, Serialize};

use crate::users::repo::Favorite;

/// Request body for add/check/remove: an email plus the restaurant pair.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub email: String,
    pub restaurant: Favorite,
}

#[derive(Debug, Deserialize)]
pub struct FavoritesListRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}
