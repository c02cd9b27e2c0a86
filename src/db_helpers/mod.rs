use sqlx::{Sqlite, SqlitePool};

use crate::{
    errors::RequestError,
    models::{Post, Tag, User},
};

mod post_helpers;
mod tag_helpers;
mod user_helpers;

pub use post_helpers::*;
pub use tag_helpers::*;
pub use user_helpers::*;

// ----------------- Helper Functions -----------------

fn id_list(ids: &[i64]) -> String {
    let ids = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();
    format!("({})", ids.join(", "))
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.is_empty() {
        return Err(RequestError::ConstraintViolation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<User, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, User>(
        "SELECT id, first_name, last_name, image_url FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut tx)
    .await?;
    tx.commit().await?;
    match result {
        Some(user) => Ok(user),
        None => Err(RequestError::NotFound("User not found")),
    }
}

pub async fn get_post_by_id(pool: &SqlitePool, id: i64) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, Post>(
        "SELECT id, title, content, created_at, user_id FROM posts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut tx)
    .await?;
    tx.commit().await?;
    match result {
        Some(post) => Ok(post),
        None => Err(RequestError::NotFound("Post not found")),
    }
}

pub async fn get_tag_by_id(pool: &SqlitePool, id: i64) -> Result<Tag, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, Tag>("SELECT id, name FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    match result {
        Some(tag) => Ok(tag),
        None => Err(RequestError::NotFound("Tag not found")),
    }
}
