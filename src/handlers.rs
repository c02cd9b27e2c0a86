use std::sync::Arc;

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::Redirect,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    db_helpers::{
        delete_post_in_db, delete_tag_in_db, delete_user_in_db, get_post_by_id, get_tag_by_id,
        get_user_by_id, insert_post, insert_tag, insert_user, list_posts_by_tag_in_db,
        list_posts_by_user_in_db, list_posts_in_db, list_tags_for_post_in_db, list_tags_in_db,
        list_unattached_tags_in_db, list_users_in_db, set_post_tags_in_db, update_post_in_db,
        update_tag_in_db, update_user_in_db,
    },
    errors::RequestError,
    models::Post,
    MultiplePostsWrapper, MultipleTagsWrapper, MultipleUsersWrapper, NewPostRequest,
    NewTagRequest, NewUserRequest, PostResponse, PostTagsRequest, PostWrapper, TagResponse,
    TagWrapper, UpdatePostRequest, UpdateTagRequest, UpdateUserRequest, UserResponse, UserWrapper,
};

type UserJson = UserWrapper<UserResponse>;
type PostJson = PostWrapper<PostResponse>;
type TagJson = TagWrapper<TagResponse>;

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn redirect_to_users() -> Redirect {
    Redirect::to("/users")
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

async fn posts_with_tags(
    pool: &SqlitePool,
    posts: Vec<Post>,
) -> Result<Vec<PostResponse>, RequestError> {
    let mut result = Vec::with_capacity(posts.len());
    for post in posts {
        let tags = list_tags_for_post_in_db(pool, post.id).await?;
        result.push(PostResponse::new(post, tags));
    }
    Ok(result)
}

// ----------------- User Handlers -----------------
pub async fn list_users(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleUsersWrapper> {
    let users = list_users_in_db(&pool).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(UserResponse::new).collect(),
    }))
}

pub async fn create_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user }): Json<UserWrapper<NewUserRequest>>,
) -> JsonResult<UserJson> {
    let user = insert_user(&pool, user).await?;
    Ok(Json(UserWrapper {
        user: UserResponse::new(user),
    }))
}

pub async fn get_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(user_id): Path<i64>,
) -> JsonResult<UserJson> {
    let user = get_user_by_id(&pool, user_id).await?;
    Ok(Json(UserWrapper {
        user: UserResponse::new(user),
    }))
}

pub async fn update_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(user_id): Path<i64>,
    Json(UserWrapper { user }): Json<UserWrapper<UpdateUserRequest>>,
) -> JsonResult<UserJson> {
    let user = update_user_in_db(&pool, user_id, user).await?;
    Ok(Json(UserWrapper {
        user: UserResponse::new(user),
    }))
}

pub async fn delete_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_user_in_db(&pool, user_id).await?;
    Ok(StatusCode::OK)
}

pub async fn list_user_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(user_id): Path<i64>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts = list_posts_by_user_in_db(&pool, user_id).await?;
    Ok(Json(MultiplePostsWrapper {
        posts: posts_with_tags(&pool, posts).await?,
    }))
}

// ----------------- Post Handlers -----------------
pub async fn create_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(user_id): Path<i64>,
    Json(PostWrapper { post }): Json<PostWrapper<NewPostRequest>>,
) -> JsonResult<PostJson> {
    let post = insert_post(&pool, user_id, post).await?;
    let tags = list_tags_for_post_in_db(&pool, post.id).await?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post, tags),
    }))
}

pub async fn list_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts = list_posts_in_db(&pool).await?;
    Ok(Json(MultiplePostsWrapper {
        posts: posts_with_tags(&pool, posts).await?,
    }))
}

pub async fn get_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<PostJson> {
    let post = get_post_by_id(&pool, post_id).await?;
    let tags = list_tags_for_post_in_db(&pool, post_id).await?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post, tags),
    }))
}

pub async fn update_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
    Json(PostWrapper { post }): Json<PostWrapper<UpdatePostRequest>>,
) -> JsonResult<PostJson> {
    let post = update_post_in_db(&pool, post_id, post).await?;
    let tags = list_tags_for_post_in_db(&pool, post.id).await?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post, tags),
    }))
}

pub async fn delete_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_post_in_db(&pool, post_id).await?;
    Ok(StatusCode::OK)
}

pub async fn get_post_tags(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<MultipleTagsWrapper> {
    let tags = list_tags_for_post_in_db(&pool, post_id).await?;
    Ok(Json(MultipleTagsWrapper {
        tags: tags.into_iter().map(TagResponse::new).collect(),
    }))
}

pub async fn set_post_tags(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
    Json(PostTagsRequest { tags }): Json<PostTagsRequest>,
) -> JsonResult<PostJson> {
    let post = set_post_tags_in_db(&pool, post_id, &tags).await?;
    let tags = list_tags_for_post_in_db(&pool, post.id).await?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post, tags),
    }))
}

pub async fn list_unattached_tags(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<MultipleTagsWrapper> {
    let tags = list_unattached_tags_in_db(&pool, post_id).await?;
    Ok(Json(MultipleTagsWrapper {
        tags: tags.into_iter().map(TagResponse::new).collect(),
    }))
}

// ----------------- Tag Handlers -----------------
pub async fn list_tags(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleTagsWrapper> {
    let tags = list_tags_in_db(&pool).await?;
    Ok(Json(MultipleTagsWrapper {
        tags: tags.into_iter().map(TagResponse::new).collect(),
    }))
}

pub async fn create_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(TagWrapper { tag }): Json<TagWrapper<NewTagRequest>>,
) -> JsonResult<TagJson> {
    let tag = insert_tag(&pool, tag).await?;
    Ok(Json(TagWrapper {
        tag: TagResponse::new(tag),
    }))
}

pub async fn get_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(tag_id): Path<i64>,
) -> JsonResult<TagJson> {
    let tag = get_tag_by_id(&pool, tag_id).await?;
    Ok(Json(TagWrapper {
        tag: TagResponse::new(tag),
    }))
}

pub async fn update_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(tag_id): Path<i64>,
    Json(TagWrapper { tag }): Json<TagWrapper<UpdateTagRequest>>,
) -> JsonResult<TagJson> {
    let tag = update_tag_in_db(&pool, tag_id, tag).await?;
    Ok(Json(TagWrapper {
        tag: TagResponse::new(tag),
    }))
}

pub async fn delete_tag(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(tag_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_tag_in_db(&pool, tag_id).await?;
    Ok(StatusCode::OK)
}

pub async fn list_tag_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(tag_id): Path<i64>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts = list_posts_by_tag_in_db(&pool, tag_id).await?;
    Ok(Json(MultiplePostsWrapper {
        posts: posts_with_tags(&pool, posts).await?,
    }))
}
