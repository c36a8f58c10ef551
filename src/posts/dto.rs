use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{Post, PostWithAuthor};

/// Author reference embedded in post bodies; display name only, no email.
#[derive(Debug, Serialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author: AuthorRef,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PostResponse {
    /// For write paths, where the author is already known from the session.
    pub fn from_post(post: Post, author: AuthorRef) -> Self {
        Self {
            id: post.id,
            title: post.title,
            summary: post.summary,
            content: post.content,
            cover_image: post.cover_image,
            author,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<PostWithAuthor> for PostResponse {
    fn from(row: PostWithAuthor) -> Self {
        Self {
            id: row.id,
            title: row.title,
            summary: row.summary,
            content: row.content,
            cover_image: row.cover_image,
            author: AuthorRef {
                id: row.author_id,
                name: row.author_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_author_name_but_no_email() {
        let row = PostWithAuthor {
            id: Uuid::new_v4(),
            title: Some("First".into()),
            summary: None,
            content: Some("body".into()),
            cover_image: Some("uploads/a.png".into()),
            author_id: Uuid::new_v4(),
            author_name: "Ann".into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_value(PostResponse::from(row)).expect("serialize");
        assert_eq!(json["author"]["name"], "Ann");
        assert_eq!(json["title"], "First");
        assert!(json["author"].get("email").is_none());
    }
}
