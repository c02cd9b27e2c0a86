use serde::{Deserialize, Serialize};

use super::response::{PostResponse, TagResponse, UserResponse};

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostWrapper<T> {
    pub post: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TagWrapper<T> {
    pub tag: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleUsersWrapper {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultiplePostsWrapper {
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleTagsWrapper {
    pub tags: Vec<TagResponse>,
}
