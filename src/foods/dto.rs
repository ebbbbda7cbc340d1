use serde::Deserialize;

use super::filter::Criteria;

/// Request body for POST /api/recommend-foods. All fields optional.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub category: Option<String>,
    pub price: Option<i32>,
    pub cooking_type: Option<String>,
    pub spiciness: Option<String>,
}

impl From<RecommendRequest> for Criteria {
    fn from(body: RecommendRequest) -> Self {
        Self {
            category: body.category,
            max_price: body.price,
            cooking_type: body.cooking_type,
            spiciness: body.spiciness,
        }
    }
}
