pub mod config;
pub mod driver;
pub mod pagination;
pub mod submission;
pub mod theme;
pub mod view;
pub mod viewport;

pub use config::{init_config, FeedConfig, ReconcilePolicy};
pub use driver::{run, Intent, Render};
pub use pagination::{Feed, DEFAULT_PAGE_SIZE};
pub use submission::{
    Draft, Field, Reconciler, SubmissionState, SubmitError, MAX_TITLE_CHARS,
};
pub use theme::Theme;
pub use view::{FeedView, FetchOutcome, FetchTicket, ViewModel};
pub use viewport::{
    Intersection, ManualViewport, RegionId, SubscriptionHandle, Viewport,
    ViewportTrigger, FULLY_VISIBLE,
};
