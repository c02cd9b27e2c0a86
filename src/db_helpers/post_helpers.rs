use std::collections::HashSet;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data_formats::request::{NewPostRequest, UpdatePostRequest};
use crate::errors::RequestError;
use crate::models::{Post, PostTag};

use super::{id_list, require_non_empty};

const POST_QUERY: &str = "SELECT id, title, content, created_at, user_id FROM posts WHERE id = $1";

pub async fn list_posts_in_db(pool: &SqlitePool) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, Post>(
        r#"
        SELECT id, title, content, created_at, user_id FROM posts
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn list_posts_by_user_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let user = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut tx)
        .await?;
    if user.is_none() {
        return Err(RequestError::NotFound("User not found"));
    }
    let result = sqlx::query_as::<Sqlite, Post>(
        r#"
        SELECT id, title, content, created_at, user_id FROM posts
        WHERE user_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn list_posts_by_tag_in_db(
    pool: &SqlitePool,
    tag_id: i64,
) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let tag = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM tags WHERE id = $1")
        .bind(tag_id)
        .fetch_optional(&mut tx)
        .await?;
    if tag.is_none() {
        return Err(RequestError::NotFound("Tag not found"));
    }
    let result = sqlx::query_as::<Sqlite, Post>(
        r#"
        SELECT posts.id, posts.title, posts.content, posts.created_at, posts.user_id
        FROM posts
        JOIN posts_tags ON posts_tags.post_id = posts.id
        WHERE posts_tags.tag_id = $1
        ORDER BY posts.created_at, posts.id
        "#,
    )
    .bind(tag_id)
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn insert_post(
    pool: &SqlitePool,
    user_id: i64,
    NewPostRequest {
        title,
        content,
        tags,
    }: NewPostRequest,
) -> Result<Post, RequestError> {
    require_non_empty("title", &title)?;
    require_non_empty("content", &content)?;

    let mut tx = pool.begin().await?;
    // A missing user trips the foreign key here, so nothing is persisted.
    let post = sqlx::query_as::<Sqlite, Post>(
        r#"
        INSERT INTO posts (title, content, user_id)
        VALUES ($1, $2, $3)
        RETURNING id, title, content, created_at, user_id
        "#,
    )
    .bind(&title)
    .bind(&content)
    .bind(user_id)
    .fetch_one(&mut tx)
    .await?;

    if let Some(tag_ids) = tags {
        replace_post_tags(&mut tx, post.id, &tag_ids).await?;
    }
    tx.commit().await?;
    Ok(post)
}

pub async fn update_post_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdatePostRequest {
        title,
        content,
        tags,
    }: UpdatePostRequest,
) -> Result<Post, RequestError> {
    require_non_empty("title", &title)?;
    require_non_empty("content", &content)?;

    let mut tx = pool.begin().await?;
    let post = sqlx::query_as::<Sqlite, Post>(POST_QUERY)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    let post = match post {
        Some(post) => post,
        None => return Err(RequestError::NotFound("Post not found")),
    };

    // created_at is set once at insert time and never rewritten.
    sqlx::query("UPDATE posts SET title = $1, content = $2 WHERE id = $3")
        .bind(&title)
        .bind(&content)
        .bind(id)
        .execute(&mut tx)
        .await?;

    if let Some(tag_ids) = tags {
        replace_post_tags(&mut tx, id, &tag_ids).await?;
    }
    tx.commit().await?;

    Ok(Post {
        title,
        content,
        ..post
    })
}

pub async fn delete_post_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let post = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    if post.is_none() {
        return Err(RequestError::NotFound("Post not found"));
    }

    sqlx::query("DELETE FROM posts_tags WHERE post_id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn set_post_tags_in_db(
    pool: &SqlitePool,
    post_id: i64,
    tag_ids: &[i64],
) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;
    let post = sqlx::query_as::<Sqlite, Post>(POST_QUERY)
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?;
    let post = match post {
        Some(post) => post,
        None => return Err(RequestError::NotFound("Post not found")),
    };

    replace_post_tags(&mut tx, post_id, tag_ids).await?;
    tx.commit().await?;
    Ok(post)
}

// Reconciles the stored association set with the given one: rows leaving the
// set are deleted, rows entering it are inserted, the intersection is left
// untouched. Ids that match no tag are dropped, not errors.
async fn replace_post_tags(
    tx: &mut Transaction<'_, Sqlite>,
    post_id: i64,
    tag_ids: &[i64],
) -> Result<(), RequestError> {
    let resolved: HashSet<i64> = if tag_ids.is_empty() {
        HashSet::new()
    } else {
        let query = format!("SELECT id FROM tags WHERE id IN {}", id_list(tag_ids));
        sqlx::query_scalar::<Sqlite, i64>(&query)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .collect()
    };

    let current: HashSet<i64> =
        sqlx::query_as::<Sqlite, PostTag>("SELECT post_id, tag_id FROM posts_tags WHERE post_id = $1")
            .bind(post_id)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(|row| row.tag_id)
            .collect();

    for tag_id in current.difference(&resolved) {
        sqlx::query("DELETE FROM posts_tags WHERE post_id = $1 AND tag_id = $2")
            .bind(post_id)
            .bind(*tag_id)
            .execute(&mut *tx)
            .await?;
    }
    for tag_id in resolved.difference(&current) {
        sqlx::query("INSERT INTO posts_tags (post_id, tag_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(*tag_id)
            .execute(&mut *tx)
            .await?;
    }
    Ok(())
}
