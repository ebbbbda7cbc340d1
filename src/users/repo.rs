use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A saved restaurant. Identity is the (name, address) pair; there is no
/// dedicated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
    pub profile_image: String,
    pub favorites: Vec<Favorite>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub email: String,
    pub profile_image: String,
}

/// Data access for user records. Held in `AppState` as a trait object so
/// handlers stay independent of the backing store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Inserts unconditionally; email uniqueness is not enforced here.
    async fn insert(&self, user: NewUser) -> anyhow::Result<User>;

    /// Returns whether a record was removed.
    async fn delete_by_email(&self, email: &str) -> anyhow::Result<bool>;

    /// Replaces the whole favorites list. Callers do read-modify-write;
    /// concurrent edits are last-write-wins. Returns whether the user exists.
    async fn set_favorites(&self, email: &str, favorites: &[Favorite]) -> anyhow::Result<bool>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    nickname: String,
    email: String,
    profile_image: String,
    favorites: Json<Vec<Favorite>>,
    created_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            nickname: row.nickname,
            email: row.email,
            profile_image: row.profile_image,
            favorites: row.favorites.0,
            created_at: row.created_at,
        }
    }
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, nickname, email, profile_image, favorites, created_at
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> anyhow::Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (nickname, email, profile_image)
            VALUES ($1, $2, $3)
            RETURNING id, nickname, email, profile_image, favorites, created_at
            "#,
        )
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.profile_image)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn delete_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE email = $1"#)
            .bind(email)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_favorites(&self, email: &str, favorites: &[Favorite]) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"UPDATE users SET favorites = $2 WHERE email = $1"#)
            .bind(email)
            .bind(Json(favorites))
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory store used by `AppState::fake` and handler tests.
#[derive(Debug, Default)]
pub struct MemoryUserStore(Mutex<Vec<User>>);

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.0.lock().expect("user store lock");
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> anyhow::Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            nickname: user.nickname,
            email: user.email,
            profile_image: user.profile_image,
            favorites: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        let mut users = self.0.lock().expect("user store lock");
        users.push(user.clone());
        Ok(user)
    }

    async fn delete_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let mut users = self.0.lock().expect("user store lock");
        let before = users.len();
        users.retain(|u| u.email != email);
        Ok(users.len() < before)
    }

    async fn set_favorites(&self, email: &str, favorites: &[Favorite]) -> anyhow::Result<bool> {
        let mut users = self.0.lock().expect("user store lock");
        match users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.favorites = favorites.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
