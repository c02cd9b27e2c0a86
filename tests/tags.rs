mod common;

use blogly::{MultiplePostsWrapper, MultipleTagsWrapper, TagResponse, TagWrapper};
use common::*;
use reqwest::StatusCode;
use serde_json::json;
use sqlx::Sqlite;

#[tokio::test]
async fn test_create_and_list_tags_ordered_by_name() {
    let app = spawn_app().await;

    create_tag(&app, "zeta").await;
    create_tag(&app, "alpha").await;
    create_tag(&app, "middle").await;

    let tags = app
        .client
        .get(format!("{}/tags", app.address))
        .send()
        .await
        .expect("Failed to send request")
        .json::<MultipleTagsWrapper>()
        .await
        .expect("Failed to parse tags response")
        .tags;

    let names = tags.iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["alpha", "middle", "zeta"]);
}

#[tokio::test]
async fn test_duplicate_tag_name_rejected() {
    let app = spawn_app().await;

    let original = create_tag(&app, "news").await;

    let response = app
        .client
        .post(format!("{}/tags", app.address))
        .json(&json!({ "tag": { "name": "news" } }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let tags = app
        .client
        .get(format!("{}/tags", app.address))
        .send()
        .await
        .expect("Failed to send request")
        .json::<MultipleTagsWrapper>()
        .await
        .expect("Failed to parse tags response")
        .tags;
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, original.id);
    assert_eq!(tags[0].name, "news");
}

#[tokio::test]
async fn test_create_tag_rejects_blank_name() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(format!("{}/tags", app.address))
        .json(&json!({ "tag": { "name": "" } }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_tag_renames() {
    let app = spawn_app().await;

    let tag = create_tag(&app, "olds").await;
    let taken = create_tag(&app, "news").await;

    let response = app
        .client
        .put(format!("{}/tags/{}", app.address, tag.id))
        .json(&json!({ "tag": { "name": "history" } }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let renamed = response
        .json::<TagWrapper<TagResponse>>()
        .await
        .expect("Failed to parse tag response")
        .tag;
    assert_eq!(renamed.id, tag.id);
    assert_eq!(renamed.name, "history");

    // Renaming onto a name that is already taken is refused.
    let clash = app
        .client
        .put(format!("{}/tags/{}", app.address, tag.id))
        .json(&json!({ "tag": { "name": taken.name } }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(clash.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_tag_detaches_but_keeps_posts() {
    let app = spawn_app().await;
    let user = create_user(&app, "Ada", "Lovelace", "").await;
    let post = create_post(&app, user.id, "Notes", "Body").await;
    let tag = create_tag(&app, "analysis").await;
    set_post_tags(&app, post.id, &[tag.id]).await;

    let response = app
        .client
        .delete(format!("{}/tags/{}", app.address, tag.id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let get_tag = app
        .client
        .get(format!("{}/tags/{}", app.address, tag.id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(get_tag.status(), StatusCode::NOT_FOUND);

    // The post survives, just without the tag.
    let get_post = app
        .client
        .get(format!("{}/posts/{}", app.address, post.id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(get_post.status(), StatusCode::OK);
    assert!(get_post_tag_ids(&app, post.id).await.is_empty());

    let join_rows = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT COUNT(*) FROM posts_tags WHERE tag_id = $1",
    )
    .bind(tag.id)
    .fetch_one(&app.db)
    .await
    .expect("Failed to count join rows");
    assert_eq!(join_rows, 0);
}

#[tokio::test]
async fn test_set_tags_replaces_association_set() {
    let app = spawn_app().await;
    let user = create_user(&app, "Ada", "Lovelace", "").await;
    let post = create_post(&app, user.id, "Notes", "Body").await;

    let first = create_tag(&app, "first").await;
    let second = create_tag(&app, "second").await;
    let third = create_tag(&app, "third").await;

    set_post_tags(&app, post.id, &[]).await;
    assert!(get_post_tag_ids(&app, post.id).await.is_empty());

    set_post_tags(&app, post.id, &[first.id, second.id]).await;
    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(get_post_tag_ids(&app, post.id).await, expected);

    // Replacing with an overlapping set keeps the overlap and swaps the rest:
    // the result is exactly the new set, not the union.
    set_post_tags(&app, post.id, &[second.id, third.id]).await;
    let mut expected = vec![second.id, third.id];
    expected.sort();
    assert_eq!(get_post_tag_ids(&app, post.id).await, expected);

    // The empty set clears the associations.
    set_post_tags(&app, post.id, &[]).await;
    assert!(get_post_tag_ids(&app, post.id).await.is_empty());
}

#[tokio::test]
async fn test_set_tags_drops_unknown_ids() {
    let app = spawn_app().await;
    let user = create_user(&app, "Ada", "Lovelace", "").await;
    let post = create_post(&app, user.id, "Notes", "Body").await;
    let tag = create_tag(&app, "analysis").await;

    let response = app
        .client
        .put(format!("{}/posts/{}/tags", app.address, post.id))
        .json(&json!({ "tags": [9999, tag.id] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(get_post_tag_ids(&app, post.id).await, vec![tag.id]);
}

#[tokio::test]
async fn test_set_tags_is_idempotent() {
    let app = spawn_app().await;
    let user = create_user(&app, "Ada", "Lovelace", "").await;
    let post = create_post(&app, user.id, "Notes", "Body").await;
    let first = create_tag(&app, "first").await;
    let second = create_tag(&app, "second").await;

    set_post_tags(&app, post.id, &[first.id, second.id]).await;
    set_post_tags(&app, post.id, &[first.id, second.id]).await;

    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(get_post_tag_ids(&app, post.id).await, expected);

    let join_rows = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT COUNT(*) FROM posts_tags WHERE post_id = $1",
    )
    .bind(post.id)
    .fetch_one(&app.db)
    .await
    .expect("Failed to count join rows");
    assert_eq!(join_rows, 2);
}

#[tokio::test]
async fn test_unattached_tags_reflect_attachments() {
    let app = spawn_app().await;
    let user = create_user(&app, "Ada", "Lovelace", "").await;
    let post = create_post(&app, user.id, "Notes", "Body").await;

    let alpha = create_tag(&app, "alpha").await;
    let beta = create_tag(&app, "beta").await;
    let gamma = create_tag(&app, "gamma").await;

    set_post_tags(&app, post.id, &[alpha.id]).await;
    let unattached = app
        .client
        .get(format!("{}/posts/{}/tags/unattached", app.address, post.id))
        .send()
        .await
        .expect("Failed to send request")
        .json::<MultipleTagsWrapper>()
        .await
        .expect("Failed to parse tags response")
        .tags;
    let ids = unattached.iter().map(|tag| tag.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![beta.id, gamma.id]);

    // A fresh attachment shows up in the very next read.
    set_post_tags(&app, post.id, &[alpha.id, beta.id]).await;
    let unattached = app
        .client
        .get(format!("{}/posts/{}/tags/unattached", app.address, post.id))
        .send()
        .await
        .expect("Failed to send request")
        .json::<MultipleTagsWrapper>()
        .await
        .expect("Failed to parse tags response")
        .tags;
    let ids = unattached.iter().map(|tag| tag.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![gamma.id]);
}

#[tokio::test]
async fn test_list_tag_posts() {
    let app = spawn_app().await;
    let user = create_user(&app, "Ada", "Lovelace", "").await;
    let tagged = create_post(&app, user.id, "Tagged", "Body").await;
    create_post(&app, user.id, "Plain", "Body").await;
    let tag = create_tag(&app, "analysis").await;
    let bare = create_tag(&app, "unused").await;
    set_post_tags(&app, tagged.id, &[tag.id]).await;

    let posts = app
        .client
        .get(format!("{}/tags/{}/posts", app.address, tag.id))
        .send()
        .await
        .expect("Failed to send request")
        .json::<MultiplePostsWrapper>()
        .await
        .expect("Failed to parse posts response")
        .posts;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, tagged.id);

    let empty = app
        .client
        .get(format!("{}/tags/{}/posts", app.address, bare.id))
        .send()
        .await
        .expect("Failed to send request")
        .json::<MultiplePostsWrapper>()
        .await
        .expect("Failed to parse posts response")
        .posts;
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_missing_tag_and_post_lookups_not_found() {
    let app = spawn_app().await;

    let get = app
        .client
        .get(format!("{}/tags/4242", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let put = app
        .client
        .put(format!("{}/tags/4242", app.address))
        .json(&json!({ "tag": { "name": "ghost" } }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(put.status(), StatusCode::NOT_FOUND);

    let delete = app
        .client
        .delete(format!("{}/tags/4242", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    let tag_posts = app
        .client
        .get(format!("{}/tags/4242/posts", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(tag_posts.status(), StatusCode::NOT_FOUND);

    let set_on_missing_post = app
        .client
        .put(format!("{}/posts/4242/tags", app.address))
        .json(&json!({ "tags": [1] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(set_on_missing_post.status(), StatusCode::NOT_FOUND);

    let unattached_on_missing_post = app
        .client
        .get(format!("{}/posts/4242/tags/unattached", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(unattached_on_missing_post.status(), StatusCode::NOT_FOUND);
}
