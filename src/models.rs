use chrono::NaiveDateTime;

pub const DEFAULT_IMAGE_URL: &str =
    "https://cdn.britannica.com/66/183466-050-78C1C9CB/spider-monkey-Venezuela-South-America.jpg";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub user_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostTag {
    pub post_id: i64,
    pub tag_id: i64,
}
