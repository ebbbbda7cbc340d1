use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use rand::seq::SliceRandom;
use tracing::instrument;

use crate::{
    error::{internal, ApiError},
    state::AppState,
};

use super::dto::RecommendRequest;
use super::filter;
use super::repo::FoodRecord;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recommend-foods", post(recommend_foods))
        .route("/random-food", get(random_food))
}

#[instrument(skip(state))]
pub async fn recommend_foods(
    State(state): State<AppState>,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<Vec<FoodRecord>>, ApiError> {
    let catalog = state
        .catalog
        .load()
        .await
        .map_err(internal("Failed to load the food catalog"))?;

    let picks = filter::recommend(catalog, &body.into());
    if picks.is_empty() {
        return Err(ApiError::not_found("No foods match the given criteria"));
    }
    Ok(Json(picks))
}

#[instrument(skip(state))]
pub async fn random_food(State(state): State<AppState>) -> Result<Json<FoodRecord>, ApiError> {
    let catalog = state
        .catalog
        .load()
        .await
        .map_err(internal("Failed to load the food catalog"))?;

    let pick = catalog
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| ApiError::not_found("The food catalog is empty"))?;
    Ok(Json(pick))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::foods::repo::{FoodRecord, MemoryCatalog};
    use crate::state::AppState;
    use crate::users::repo::MemoryUserStore;

    fn food(category: &str, price_tier: i32) -> FoodRecord {
        FoodRecord {
            category: category.into(),
            price_tier,
            cooking_type: "soup".into(),
            spiciness: "mild".into(),
        }
    }

    fn app_with_catalog(foods: Vec<FoodRecord>) -> Router {
        let state = AppState::fake_with(
            Arc::new(MemoryCatalog(foods)),
            Arc::new(MemoryUserStore::default()),
        );
        build_app(state)
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn recommend_returns_only_matching_foods() {
        let app = app_with_catalog(vec![food("korean", 1), food("korean", 3), food("japanese", 1)]);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/recommend-foods",
            Some(json!({ "category": "korean", "price": 2 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let picks = body.as_array().expect("array body");
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0]["category"], "korean");
        assert_eq!(picks[0]["price_tier"], 1);
    }

    #[tokio::test]
    async fn recommend_caps_results_at_three() {
        let app = app_with_catalog((1..=6).map(|i| food("korean", i)).collect());
        let (status, body) = send(app, Method::POST, "/api/recommend-foods", Some(json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().expect("array body").len(), 3);
    }

    #[tokio::test]
    async fn recommend_signals_not_found_on_zero_matches() {
        let app = app_with_catalog(vec![food("korean", 1)]);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/recommend-foods",
            Some(json!({ "category": "italian" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn random_food_is_a_catalog_member() {
        let foods = vec![food("korean", 1), food("japanese", 2), food("chinese", 3)];
        let app = app_with_catalog(foods.clone());
        let (status, body) = send(app, Method::GET, "/api/random-food", None).await;

        assert_eq!(status, StatusCode::OK);
        let pick: FoodRecord = serde_json::from_value(body).expect("food record body");
        assert!(foods.contains(&pick));
    }

    #[tokio::test]
    async fn random_food_on_empty_catalog_is_not_found() {
        let app = app_with_catalog(Vec::new());
        let (status, _) = send(app, Method::GET, "/api/random-food", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
