use toml::{map::Map, Value};

use crate::pagination::DEFAULT_PAGE_SIZE;

/// What a successful submission does to the local feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Leave the feed alone; the post shows up on the next fetch.
    #[default]
    AwaitRefresh,
    /// Put the created post at the head right away.
    Prepend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub page_size: usize,
    pub policy: ReconcilePolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            policy: ReconcilePolicy::default(),
        }
    }
}

/// Reads the optional `[feed]` section.
pub fn init_config(config: &Map<String, Value>) -> anyhow::Result<FeedConfig> {
    if !config.contains_key("feed") {
        return Ok(FeedConfig::default());
    }

    let page_size = util::get_integer_or(
        config,
        "feed",
        "page_size",
        DEFAULT_PAGE_SIZE as i64,
    )?;
    anyhow::ensure!(page_size > 0, "page_size must be positive");

    let prepend =
        util::get_bool_or(config, "feed", "optimistic_prepend", false)?;

    Ok(FeedConfig {
        page_size: page_size as usize,
        policy: if prepend {
            ReconcilePolicy::Prepend
        } else {
            ReconcilePolicy::AwaitRefresh
        },
    })
}
