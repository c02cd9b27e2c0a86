use serde::{Deserialize, Serialize};

use crate::models::{Post, Tag, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub user_id: i64,
    pub tags: Vec<TagResponse>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

impl UserResponse {
    pub fn new(
        User {
            id,
            first_name,
            last_name,
            image_url,
        }: User,
    ) -> Self {
        UserResponse {
            id,
            first_name,
            last_name,
            image_url,
        }
    }
}

impl PostResponse {
    pub fn new(
        Post {
            id,
            title,
            content,
            created_at,
            user_id,
        }: Post,
        tags: Vec<Tag>,
    ) -> Self {
        PostResponse {
            id,
            title,
            content,
            created_at: created_at.to_string(),
            user_id,
            tags: tags.into_iter().map(TagResponse::new).collect(),
        }
    }
}

impl TagResponse {
    pub fn new(Tag { id, name }: Tag) -> Self {
        TagResponse { id, name }
    }
}
