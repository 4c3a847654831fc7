pub mod post;

pub mod prelude {
    pub use crate::post::{
        Category, NewPost as NewPostEntity, Post as PostEntity,
        UNSELECTED_CATEGORY,
    };
}
