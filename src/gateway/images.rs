//! Image API client: avatar and post image uploads.

use bytes::Bytes;
use std::sync::Arc;

use crate::error::ApiError;
use crate::traits::FilePart;

use super::{user_segment, Gateway};

/// Form field name the backend expects for uploads.
const IMAGE_FIELD: &str = "image";

/// Client for the `/image` endpoints.
///
/// Uploads are multipart PUTs; the server answers with the public URL of
/// the stored image. Removal is a plain DELETE.
#[derive(Clone)]
pub struct ImageClient {
    gateway: Arc<Gateway>,
}

impl ImageClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    fn part(file_name: &str, content_type: &str, bytes: Bytes) -> FilePart {
        FilePart {
            field: IMAGE_FIELD.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    /// Upload an avatar for the logged-in user (or another user, with
    /// moderation authority). Returns the image URL.
    pub async fn upload_avatar(
        &self,
        username: Option<&str>,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, ApiError> {
        let path = format!("/image/user/{}", user_segment(username));
        self.gateway
            .put_multipart(&path, Self::part(file_name, content_type, bytes))
            .await
    }

    /// Remove a user's avatar.
    pub async fn delete_avatar(&self, username: Option<&str>) -> Result<(), ApiError> {
        let path = format!("/image/user/{}", user_segment(username));
        self.gateway.delete_unit(&path).await
    }

    /// Attach an image to a post. Returns the image URL.
    pub async fn upload_post_image(
        &self,
        post_id: i64,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, ApiError> {
        let path = format!("/image/post/{}", post_id);
        self.gateway
            .put_multipart(&path, Self::part(file_name, content_type, bytes))
            .await
    }

    /// Remove a post's image.
    pub async fn delete_post_image(&self, post_id: i64) -> Result<(), ApiError> {
        let path = format!("/image/post/{}", post_id);
        self.gateway.delete_unit(&path).await
    }
}
