use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{
    error::{internal, ApiError},
    state::AppState,
    users::dto::MessageResponse,
    users::repo::Favorite,
};

use super::dto::{ExistsResponse, FavoriteRequest, FavoritesListRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add-favorite", post(add_favorite))
        .route("/check-favorite", post(check_favorite))
        .route("/get-favorites", post(get_favorites))
        .route("/remove-favorite", post(remove_favorite))
}

const USER_NOT_FOUND: &str = "No account found for that email";

/// Read-modify-write on the whole list; concurrent edits are last-write-wins.
#[instrument(skip(state, body))]
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(mut user) = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(internal("Failed to add the favorite"))?
    else {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    };

    user.favorites.push(body.restaurant);
    state
        .users
        .set_favorites(&user.email, &user.favorites)
        .await
        .map_err(internal("Failed to add the favorite"))?;

    info!(email = %user.email, "favorite added");
    Ok(Json(MessageResponse::new("Favorite added")))
}

/// Degrades to `exists: false` for an unknown user instead of 404.
#[instrument(skip(state, body))]
pub async fn check_favorite(
    State(state): State<AppState>,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<ExistsResponse>, ApiError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(internal("Failed to check the favorite"))?;

    let exists = user
        .map(|u| u.favorites.contains(&body.restaurant))
        .unwrap_or(false);
    Ok(Json(ExistsResponse { exists }))
}

#[instrument(skip(state, body))]
pub async fn get_favorites(
    State(state): State<AppState>,
    Json(body): Json<FavoritesListRequest>,
) -> Result<Json<Vec<Favorite>>, ApiError> {
    let Some(user) = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(internal("Failed to load favorites"))?
    else {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    };

    Ok(Json(user.favorites))
}

/// Removes every entry matching the (name, address) pair, duplicates included.
#[instrument(skip(state, body))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(mut user) = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(internal("Failed to remove the favorite"))?
    else {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    };

    user.favorites.retain(|f| *f != body.restaurant);
    state
        .users
        .set_favorites(&user.email, &user.favorites)
        .await
        .map_err(internal("Failed to remove the favorite"))?;

    info!(email = %user.email, "favorite removed");
    Ok(Json(MessageResponse::new("Favorite removed")))
}
