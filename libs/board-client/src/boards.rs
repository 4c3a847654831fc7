pub mod implementation;

use entity::prelude::*;

use crate::BoardClientError;

pub static BOARDS_PATH: &str = "api/boards";

/// The two calls the feed makes against the board service. No retries
/// happen at this layer.
pub trait Boards {
    /// Returns the whole collection in server order.
    fn fetch_all(
        &self,
    ) -> impl std::future::Future<
        Output = Result<Vec<PostEntity>, BoardClientError>,
    > + Send;

    /// Returns the service's copy of the created post. The post is not
    /// guaranteed to show up in the next `fetch_all`.
    fn create(
        &self,
        post: NewPostEntity,
    ) -> impl std::future::Future<Output = Result<PostEntity, BoardClientError>>
           + Send;
}
