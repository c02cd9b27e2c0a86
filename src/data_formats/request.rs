use serde::{Deserialize, Serialize};

// ----------------- User Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct NewUserRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ----------------- Post Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct NewPostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostTagsRequest {
    pub tags: Vec<i64>,
}

// ----------------- Tag Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct NewTagRequest {
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UpdateTagRequest {
    pub name: String,
}
