use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::request::{NewUserRequest, UpdateUserRequest},
    errors::RequestError,
    models::{User, DEFAULT_IMAGE_URL},
};

use super::require_non_empty;

fn image_url_or_default(image_url: Option<String>) -> String {
    match image_url {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_IMAGE_URL.to_owned(),
    }
}

pub async fn list_users_in_db(pool: &SqlitePool) -> Result<Vec<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, User>(
        r#"
        SELECT id, first_name, last_name, image_url FROM users
        ORDER BY last_name, first_name, id
        "#,
    )
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn insert_user(
    pool: &SqlitePool,
    NewUserRequest {
        first_name,
        last_name,
        image_url,
    }: NewUserRequest,
) -> Result<User, RequestError> {
    require_non_empty("first_name", &first_name)?;
    require_non_empty("last_name", &last_name)?;
    let image_url = image_url_or_default(image_url);

    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<Sqlite, User>(
        r#"
        INSERT INTO users (first_name, last_name, image_url)
        VALUES ($1, $2, $3)
        RETURNING id, first_name, last_name, image_url
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(image_url)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(user)
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateUserRequest {
        first_name,
        last_name,
        image_url,
    }: UpdateUserRequest,
) -> Result<User, RequestError> {
    require_non_empty("first_name", &first_name)?;
    require_non_empty("last_name", &last_name)?;
    let image_url = image_url_or_default(image_url);

    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<Sqlite, User>(
        "SELECT id, first_name, last_name, image_url FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut tx)
    .await?;
    let user = match user {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    sqlx::query("UPDATE users SET first_name = $1, last_name = $2, image_url = $3 WHERE id = $4")
        .bind(&first_name)
        .bind(&last_name)
        .bind(&image_url)
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;

    Ok(User {
        first_name,
        last_name,
        image_url,
        ..user
    })
}

pub async fn delete_user_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let user = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    if user.is_none() {
        return Err(RequestError::NotFound("User not found"));
    }

    // Join rows first, then the posts, then the user row. One transaction:
    // the cascade commits as a whole or not at all.
    sqlx::query("DELETE FROM posts_tags WHERE post_id IN (SELECT id FROM posts WHERE user_id = $1)")
        .bind(id)
        .execute(&mut tx)
        .await?;
    sqlx::query("DELETE FROM posts WHERE user_id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
