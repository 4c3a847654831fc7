use entity::prelude::*;
use tracing::{debug, error};

use crate::{
    boards::{Boards, BOARDS_PATH},
    response::IntoResponse as _,
    BoardClientError, Client,
};

impl Boards for Client {
    async fn fetch_all(&self) -> Result<Vec<PostEntity>, BoardClientError> {
        let text = self.get(BOARDS_PATH).await.inspect_err(|e| {
            error!(task = "fetch all posts", err = e.to_string());
        })?;

        let posts = serde_json::from_str::<Vec<PostEntity>>(&text)
            .into_response("failed to parse posts")?;
        debug!(task = "fetch all posts", count = posts.len());

        Ok(posts)
    }

    async fn create(
        &self,
        post: NewPostEntity,
    ) -> Result<PostEntity, BoardClientError> {
        let text = self.post(BOARDS_PATH, &post).await.inspect_err(|e| {
            error!(task = "create post", err = e.to_string());
        })?;

        let created = serde_json::from_str::<PostEntity>(&text)
            .into_response("failed to parse created post")?;
        debug!(task = "create post", id = created.id);

        Ok(created)
    }
}
