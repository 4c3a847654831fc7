use std::fmt;

use board_client::{BoardClientError, Boards};
use chrono::Utc;
use entity::prelude::*;
use tracing::{error, info, warn};

/// The form's stated title limit.
pub const MAX_TITLE_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Name,
    Password,
    Categories,
}

impl Field {
    /// Maps a form input id to its field.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "title" => Some(Field::Title),
            "description" => Some(Field::Description),
            "name" => Some(Field::Name),
            "password" => Some(Field::Password),
            "categories" => Some(Field::Categories),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Name => "name",
            Field::Password => "password",
            Field::Categories => "categories",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("validation rejected: {}: {}", field, message)]
    ValidationRejected { field: Field, message: String },

    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("no submission is in flight")]
    NotSubmitting,

    #[error("view was torn down")]
    Unmounted,

    #[error("remote unavailable: {}", source)]
    RemoteUnavailable {
        #[from]
        source: BoardClientError,
    },
}

fn rejected(field: Field, message: &str) -> SubmitError {
    SubmitError::ValidationRejected {
        field,
        message: message.to_string(),
    }
}

/// Local form state. `category` is `None` while the tag select still shows
/// its "none" option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub name: String,
    pub password: String,
    pub category: Option<Category>,
}

impl Draft {
    /// Applies one input edit. Picking the "none" tag option leaves the
    /// current category untouched.
    pub fn set_field(
        &mut self,
        field: Field,
        value: &str,
    ) -> Result<(), SubmitError> {
        match field {
            Field::Title => self.title = value.to_string(),
            Field::Description => self.description = value.to_string(),
            Field::Name => self.name = value.to_string(),
            Field::Password => self.password = value.to_string(),
            Field::Categories => {
                if value == UNSELECTED_CATEGORY {
                    return Ok(());
                }
                let category = Category::parse_label(value)
                    .map_err(|e| rejected(field, &e.to_string()))?;
                self.category = Some(category);
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<NewPostEntity, SubmitError> {
        let Some(category) = self.category else {
            return Err(rejected(Field::Categories, "no tag selected"));
        };

        for (field, value) in [
            (Field::Title, &self.title),
            (Field::Name, &self.name),
            (Field::Password, &self.password),
            (Field::Description, &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(rejected(field, "must not be empty"));
            }
        }

        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(rejected(Field::Title, "longer than 20 characters"));
        }

        Ok(NewPostEntity {
            title: self.title.clone(),
            description: self.description.clone(),
            name: self.name.clone(),
            password: self.password.clone(),
            categories: category,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Drives one submission at a time: `Idle -> Submitting -> Succeeded | Failed`.
///
/// The draft survives every outcome so a failed post can be resent as is.
/// Success only raises the acknowledgment; the posted entry reaches the feed
/// through the next fetch unless the caller prepends it.
#[derive(Debug, Default)]
pub struct Reconciler {
    draft: Draft,
    state: SubmissionState,
    last_error: Option<String>,
}

impl Reconciler {
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Applies one edit. A rejected edit leaves the draft as it was and is
    /// kept as the last error.
    pub fn set_field(
        &mut self,
        field: Field,
        value: &str,
    ) -> Result<(), SubmitError> {
        self.draft.set_field(field, value).inspect_err(|e| {
            warn!(task = "edit draft", err = e.to_string());
            self.last_error = Some(e.to_string());
        })
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.state == SubmissionState::Succeeded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validates the draft and enters `Submitting`. On rejection nothing
    /// should be sent and the state falls back to `Idle`, dropping any
    /// earlier acknowledgment.
    pub fn begin(&mut self) -> Result<NewPostEntity, SubmitError> {
        if self.is_submitting() {
            warn!(task = "submit post", err = "already submitting");
            return Err(SubmitError::AlreadySubmitting);
        }

        let post = self.draft.validate().inspect_err(|e| {
            warn!(task = "submit post", err = e.to_string());
            self.state = SubmissionState::Idle;
            self.last_error = Some(e.to_string());
        })?;

        self.state = SubmissionState::Submitting;
        self.last_error = None;
        Ok(post)
    }

    pub fn finish(
        &mut self,
        result: Result<PostEntity, BoardClientError>,
    ) -> Result<PostEntity, SubmitError> {
        if !self.is_submitting() {
            return Err(SubmitError::NotSubmitting);
        }

        match result {
            Ok(post) => {
                info!(task = "submit post", id = post.id);
                self.state = SubmissionState::Succeeded;
                Ok(post)
            }
            Err(e) => {
                error!(task = "submit post", err = e.to_string());
                self.state = SubmissionState::Failed;
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn submit<B: Boards>(
        &mut self,
        boards: &B,
    ) -> Result<PostEntity, SubmitError> {
        let post = self.begin()?;
        let result = boards.create(post).await;
        self.finish(result)
    }
}
