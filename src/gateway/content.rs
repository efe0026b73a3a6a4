//! Content API client: feeds, posts, comments, and votes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::bus::PostEvents;
use crate::error::ApiError;
use crate::models::{Comment, Post, VoteKind, VoteUpdate};

use super::Gateway;

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentRequest<'a> {
    post_id: i64,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetVoteRequest {
    vote_type: VoteKind,
}

/// Format a feed cursor for the query string.
///
/// The pagination contract is a single `before` time cursor: the server
/// returns posts strictly older than it, newest first.
fn cursor_param(before: DateTime<Utc>) -> String {
    urlencoding::encode(&before.to_rfc3339_opts(SecondsFormat::Millis, true)).into_owned()
}

/// Client for the `/feed` and `/post` endpoints.
///
/// Owns the new-post broadcast bus: a successful `create_post` announces
/// the new id so feeds can splice the post in.
#[derive(Clone)]
pub struct ContentClient {
    gateway: Arc<Gateway>,
    events: PostEvents,
}

impl ContentClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            events: PostEvents::new(),
        }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// The new-post notification bus.
    pub fn events(&self) -> &PostEvents {
        &self.events
    }

    /// Public feed: posts older than `before`, newest first.
    pub async fn public_feed(&self, before: DateTime<Utc>) -> Result<Vec<Post>, ApiError> {
        let path = format!("/feed/public?before={}", cursor_param(before));
        self.gateway.get_json(&path).await
    }

    /// Following feed of the logged-in user.
    pub async fn private_feed(&self, before: DateTime<Utc>) -> Result<Vec<Post>, ApiError> {
        let path = format!("/feed/private?before={}", cursor_param(before));
        self.gateway.get_json(&path).await
    }

    /// Feed of a single user's posts.
    pub async fn user_feed(
        &self,
        before: DateTime<Utc>,
        username: &str,
    ) -> Result<Vec<Post>, ApiError> {
        let path = format!(
            "/feed/user/{}?before={}",
            urlencoding::encode(username),
            cursor_param(before)
        );
        self.gateway.get_json(&path).await
    }

    /// Fetch a single post, fully hydrated (author, counts, viewer vote).
    pub async fn retrieve_post(&self, post_id: i64) -> Result<Post, ApiError> {
        let path = format!("/post/{}", post_id);
        self.gateway.get_json(&path).await
    }

    /// Create a post. The server answers with just the new post's id,
    /// which is also broadcast on [`events`](Self::events); display data
    /// must be re-fetched via [`retrieve_post`](Self::retrieve_post).
    pub async fn create_post(&self, content: &str) -> Result<i64, ApiError> {
        let id: i64 = self
            .gateway
            .post_json("/post", &CreatePostRequest { content })
            .await?;
        self.events.post_created(id);
        Ok(id)
    }

    /// Delete a post (own post, or any post with moderation authority).
    pub async fn delete_post(&self, post_id: i64) -> Result<(), ApiError> {
        let path = format!("/post/{}", post_id);
        self.gateway.delete_unit(&path).await
    }

    /// All comments of a post, oldest first. Comments are never
    /// paginated; callers replace their list wholesale.
    pub async fn comments_for(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        let path = format!("/post/comments?postId={}", post_id);
        self.gateway.get_json(&path).await
    }

    /// Add a comment to a post. Callers reload the comment list.
    pub async fn create_comment(&self, post_id: i64, content: &str) -> Result<(), ApiError> {
        self.gateway
            .post_unit("/post/comment", &CreateCommentRequest { post_id, content })
            .await
    }

    /// Set the viewer's vote on a post. Replaces any previous vote.
    pub async fn set_vote(&self, post_id: i64, vote: VoteKind) -> Result<VoteUpdate, ApiError> {
        let path = format!("/post/{}/vote", post_id);
        self.gateway
            .put_json(&path, &SetVoteRequest { vote_type: vote })
            .await
    }

    /// Remove the viewer's vote. "No vote" is a resource deletion on the
    /// wire, not a value.
    pub async fn remove_vote(&self, post_id: i64) -> Result<VoteUpdate, ApiError> {
        let path = format!("/post/{}/vote", post_id);
        self.gateway.delete_json(&path).await
    }
}
