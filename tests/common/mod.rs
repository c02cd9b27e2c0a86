use std::time::Duration;

use blogly::{
    get_random_free_port, init_test_db, make_router, serve_app, PostResponse, PostWrapper,
    TagResponse, TagWrapper, UserResponse, UserWrapper,
};
use serde_json::json;
use sqlx::SqlitePool;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub db: SqlitePool,
}

pub async fn spawn_app() -> TestApp {
    let db = init_test_db().await.expect("Failed to set up test database");
    let (_, address) = get_random_free_port();
    let server_db = db.clone();
    tokio::spawn(async move {
        serve_app(make_router(), address, server_db)
            .await
            .expect("Server stopped unexpectedly");
    });

    let client = reqwest::Client::new();
    let address = format!("http://{}", address);
    wait_until_alive(&client, &address).await;
    TestApp {
        address,
        client,
        db,
    }
}

async fn wait_until_alive(client: &reqwest::Client, address: &str) {
    for _ in 0..50 {
        if let Ok(response) = client.get(format!("{}/check_health", address)).send().await {
            if response.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Server at {} never became healthy", address);
}

pub async fn create_user(
    app: &TestApp,
    first_name: &str,
    last_name: &str,
    image_url: &str,
) -> UserResponse {
    let response = app
        .client
        .post(format!("{}/users", app.address))
        .json(&json!({
            "user": {
                "first_name": first_name,
                "last_name": last_name,
                "image_url": image_url,
            }
        }))
        .send()
        .await
        .expect("Failed to send create user request");
    assert!(response.status().is_success());
    response
        .json::<UserWrapper<UserResponse>>()
        .await
        .expect("Failed to parse user response")
        .user
}

pub async fn create_post(app: &TestApp, user_id: i64, title: &str, content: &str) -> PostResponse {
    let response = app
        .client
        .post(format!("{}/users/{}/posts", app.address, user_id))
        .json(&json!({
            "post": {
                "title": title,
                "content": content,
            }
        }))
        .send()
        .await
        .expect("Failed to send create post request");
    assert!(response.status().is_success());
    response
        .json::<PostWrapper<PostResponse>>()
        .await
        .expect("Failed to parse post response")
        .post
}

pub async fn create_tag(app: &TestApp, name: &str) -> TagResponse {
    let response = app
        .client
        .post(format!("{}/tags", app.address))
        .json(&json!({ "tag": { "name": name } }))
        .send()
        .await
        .expect("Failed to send create tag request");
    assert!(response.status().is_success());
    response
        .json::<TagWrapper<TagResponse>>()
        .await
        .expect("Failed to parse tag response")
        .tag
}

pub async fn set_post_tags(app: &TestApp, post_id: i64, tags: &[i64]) -> PostResponse {
    let response = app
        .client
        .put(format!("{}/posts/{}/tags", app.address, post_id))
        .json(&json!({ "tags": tags }))
        .send()
        .await
        .expect("Failed to send set tags request");
    assert!(response.status().is_success());
    response
        .json::<PostWrapper<PostResponse>>()
        .await
        .expect("Failed to parse post response")
        .post
}

pub async fn get_post_tag_ids(app: &TestApp, post_id: i64) -> Vec<i64> {
    let tags = app
        .client
        .get(format!("{}/posts/{}/tags", app.address, post_id))
        .send()
        .await
        .expect("Failed to fetch post tags")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse tags response");
    let mut ids = tags["tags"]
        .as_array()
        .expect("tags field should be an array")
        .iter()
        .map(|tag| tag["id"].as_i64().expect("tag id should be an integer"))
        .collect::<Vec<_>>();
    ids.sort();
    ids
}
