use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{AuthorRef, PostResponse};
use super::repo::{Post, PostWithAuthor};
use crate::auth::claims::SessionClaims;
use crate::auth::extractors::AuthSession;
use crate::auth::MessageResponse;
use crate::error::{ApiError, FieldError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // The index listing shares the creation path; kept for the
        // existing client.
        .route("/createPost", post(create_post).get(list_posts))
        .route(
            "/blogPost/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

/// A post may only be edited by the user it references as author.
fn is_author(claims: &SessionClaims, post: &Post) -> bool {
    claims.id == post.author_id
}

/// Multipart body shared by create and update: three text fields plus an
/// optional cover image.
#[derive(Default)]
struct PostForm {
    title: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    file: Option<(String, Bytes)>,
}

impl PostForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(ApiError::internal)? {
            let name = field.name().map(|s| s.to_string());
            match name.as_deref() {
                Some("title") => form.title = Some(field.text().await.map_err(ApiError::internal)?),
                Some("summary") => {
                    form.summary = Some(field.text().await.map_err(ApiError::internal)?)
                }
                Some("content") => {
                    form.content = Some(field.text().await.map_err(ApiError::internal)?)
                }
                Some("file") => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let body = field.bytes().await.map_err(ApiError::internal)?;
                    form.file = Some((file_name, body));
                }
                _ => {}
            }
        }
        Ok(form)
    }
}

#[instrument(skip(state, multipart))]
async fn create_post(
    State(state): State<AppState>,
    AuthSession(claims): AuthSession,
    multipart: Multipart,
) -> Result<Json<PostResponse>, ApiError> {
    let form = PostForm::read(multipart).await?;
    let (file_name, body) = form.file.ok_or_else(|| {
        ApiError::Validation(vec![FieldError {
            field: "file",
            message: "Cover image file is required",
        }])
    })?;

    let cover = state
        .storage
        .store(&file_name, body)
        .await
        .map_err(ApiError::internal)?;

    let post = Post::create(
        &state.db,
        claims.id,
        form.title,
        form.summary,
        form.content,
        &cover,
    )
    .await
    .map_err(ApiError::internal)?;

    info!(post_id = %post.id, author_id = %claims.id, "post created");
    Ok(Json(PostResponse::from_post(
        post,
        AuthorRef {
            id: claims.id,
            name: claims.name,
        },
    )))
}

#[instrument(skip(state))]
async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = PostWithAuthor::list_recent(&state.db)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state))]
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = PostWithAuthor::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Post not found"))?;
    Ok(Json(post.into()))
}

#[instrument(skip(state, multipart))]
async fn update_post(
    State(state): State<AppState>,
    AuthSession(claims): AuthSession,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<PostResponse>, ApiError> {
    let form = PostForm::read(multipart).await?;

    let post = Post::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Post not found"))?;

    if !is_author(&claims, &post) {
        warn!(post_id = %id, user_id = %claims.id, "update by non-author rejected");
        return Err(ApiError::Forbidden("You are not the author of this post"));
    }

    // A new cover replaces the old reference; otherwise the existing one
    // is kept.
    let cover = match form.file {
        Some((file_name, body)) => Some(
            state
                .storage
                .store(&file_name, body)
                .await
                .map_err(ApiError::internal)?,
        ),
        None => None,
    };

    let updated = Post::update(
        &state.db,
        id,
        form.title,
        form.summary,
        form.content,
        cover,
    )
    .await
    .map_err(ApiError::internal)?;

    info!(post_id = %id, author_id = %claims.id, "post updated");
    Ok(Json(PostResponse::from_post(
        updated,
        AuthorRef {
            id: claims.id,
            name: claims.name,
        },
    )))
}

#[instrument(skip(state))]
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    // NOTE: unlike update, delete is not gated on authorship.
    let deleted = Post::delete(&state.db, id)
        .await
        .map_err(ApiError::internal)?;
    if !deleted {
        return Err(ApiError::NotFound("Post not found"));
    }

    info!(post_id = %id, "post deleted");
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn claims_for(id: Uuid) -> SessionClaims {
        SessionClaims {
            id,
            email: "ann@x.com".into(),
            name: "Ann".into(),
            iat: 0,
            exp: usize::MAX,
        }
    }

    fn post_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: Some("First".into()),
            summary: None,
            content: None,
            cover_image: Some("uploads/a.png".into()),
            author_id,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn the_author_passes_the_ownership_check() {
        let author = Uuid::new_v4();
        assert!(is_author(&claims_for(author), &post_by(author)));
    }

    #[test]
    fn anyone_else_fails_the_ownership_check() {
        assert!(!is_author(&claims_for(Uuid::new_v4()), &post_by(Uuid::new_v4())));
    }
}
