use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::request::{NewTagRequest, UpdateTagRequest},
    errors::RequestError,
    models::Tag,
};

use super::require_non_empty;

pub async fn list_tags_in_db(pool: &SqlitePool) -> Result<Vec<Tag>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, Tag>("SELECT id, name FROM tags ORDER BY name")
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn insert_tag(
    pool: &SqlitePool,
    NewTagRequest { name }: NewTagRequest,
) -> Result<Tag, RequestError> {
    require_non_empty("name", &name)?;

    let mut tx = pool.begin().await?;
    // Duplicate names trip the UNIQUE constraint on tags.name.
    let tag = sqlx::query_as::<Sqlite, Tag>(
        r#"
        INSERT INTO tags (name)
        VALUES ($1)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(tag)
}

pub async fn update_tag_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateTagRequest { name }: UpdateTagRequest,
) -> Result<Tag, RequestError> {
    require_non_empty("name", &name)?;

    let mut tx = pool.begin().await?;
    let tag = sqlx::query_as::<Sqlite, Tag>("SELECT id, name FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    let tag = match tag {
        Some(tag) => tag,
        None => return Err(RequestError::NotFound("Tag not found")),
    };

    sqlx::query("UPDATE tags SET name = $1 WHERE id = $2")
        .bind(&name)
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;

    Ok(Tag { name, ..tag })
}

pub async fn delete_tag_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let tag = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    if tag.is_none() {
        return Err(RequestError::NotFound("Tag not found"));
    }

    // The tag's associations go with it; the posts they pointed at stay.
    sqlx::query("DELETE FROM posts_tags WHERE tag_id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn list_tags_for_post_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<Tag>, RequestError> {
    let mut tx = pool.begin().await?;
    let post = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?;
    if post.is_none() {
        return Err(RequestError::NotFound("Post not found"));
    }
    let result = sqlx::query_as::<Sqlite, Tag>(
        r#"
        SELECT tags.id, tags.name
        FROM tags
        JOIN posts_tags ON posts_tags.tag_id = tags.id
        WHERE posts_tags.post_id = $1
        ORDER BY tags.name
        "#,
    )
    .bind(post_id)
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn list_unattached_tags_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<Tag>, RequestError> {
    let mut tx = pool.begin().await?;
    let post = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?;
    if post.is_none() {
        return Err(RequestError::NotFound("Post not found"));
    }
    let result = sqlx::query_as::<Sqlite, Tag>(
        r#"
        SELECT id, name FROM tags
        WHERE id NOT IN (SELECT tag_id FROM posts_tags WHERE post_id = $1)
        ORDER BY name
        "#,
    )
    .bind(post_id)
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}
