use entity::prelude::*;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Canonical newest-first sequence of fetched posts plus the prefix length
/// currently exposed for rendering.
///
/// `visible_count <= posts.len()` holds after every method.
#[derive(Debug, Clone)]
pub struct Feed {
    posts: Vec<PostEntity>,
    visible_count: usize,
    page_size: usize,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Feed {
    /// `page_size` of zero is bumped to one so `reveal_more` always moves.
    pub fn new(page_size: usize) -> Self {
        Self {
            posts: vec![],
            visible_count: 0,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the sequence with `raw` (server order) reversed and resets the
    /// cursor to the first page.
    pub fn initialize(&mut self, mut raw: Vec<PostEntity>) {
        raw.reverse();
        self.posts = raw;
        self.visible_count = self.page_size.min(self.posts.len());
    }

    /// Advances the cursor by one page. Returns false at the ceiling.
    pub fn reveal_more(&mut self) -> bool {
        let next = (self.visible_count + self.page_size).min(self.posts.len());
        if next == self.visible_count {
            return false;
        }
        self.visible_count = next;
        true
    }

    pub fn visible_slice(&self) -> &[PostEntity] {
        &self.posts[..self.visible_count]
    }

    pub fn has_more(&self) -> bool {
        self.visible_count < self.posts.len()
    }

    /// Inserts a locally created post at the head. Ignored when a post with
    /// the same id is already present.
    pub fn prepend(&mut self, post: PostEntity) -> bool {
        if self.posts.iter().any(|p| p.id == post.id) {
            return false;
        }
        self.posts.insert(0, post);
        self.visible_count += 1;
        true
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn posts(&self) -> &[PostEntity] {
        &self.posts
    }
}
