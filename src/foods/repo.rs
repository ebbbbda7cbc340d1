use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};

/// One entry of the reference catalog. Immutable data, loaded wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub category: String,
    pub price_tier: i32,
    pub cooking_type: String,
    pub spiciness: String,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns the full catalog array.
    async fn load(&self) -> anyhow::Result<Vec<FoodRecord>>;
}

/// Catalog persisted as a single JSONB document holding the whole array.
pub struct PgCatalogStore {
    db: PgPool,
}

impl PgCatalogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn load(&self) -> anyhow::Result<Vec<FoodRecord>> {
        let doc: Option<Json<Vec<FoodRecord>>> =
            sqlx::query_scalar(r#"SELECT foods FROM food_catalog ORDER BY id LIMIT 1"#)
                .fetch_optional(&self.db)
                .await?;
        Ok(doc.map(|Json(foods)| foods).unwrap_or_default())
    }
}

/// In-memory catalog used by `AppState::fake` and handler tests.
#[derive(Debug, Default)]
pub struct MemoryCatalog(pub Vec<FoodRecord>);

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn load(&self) -> anyhow::Result<Vec<FoodRecord>> {
        Ok(self.0.clone())
    }
}
