//! Create/update/delete round trips to the bookmark host.
//!
//! Validation happens locally before the host is contacted. The caller is
//! responsible for the follow-up (toast, closing the modal, full reload).

use thiserror::Error;

use super::host::{BookmarkHost, NewBookmark, DEFAULT_PARENT_ID};
use crate::i18n::Localizer;

/// Which mutation was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Remove,
}

impl MutationKind {
    /// Translation key for the success toast.
    pub fn success_key(self) -> &'static str {
        match self {
            MutationKind::Create => "toast.bookmarkCreated",
            MutationKind::Update => "toast.bookmarkUpdated",
            MutationKind::Remove => "toast.bookmarkDeleted",
        }
    }

    /// Translation key for the failure toast; takes a `message` placeholder.
    pub fn error_key(self) -> &'static str {
        match self {
            MutationKind::Create => "toast.bookmarkCreateError",
            MutationKind::Update => "toast.bookmarkUpdateError",
            MutationKind::Remove => "toast.bookmarkDeleteError",
        }
    }
}

/// Why a mutation did not happen.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    /// Title or url empty after trimming. The host was not contacted.
    #[error("title and url are required")]
    Validation,

    /// The host refused the operation.
    #[error("{kind:?} failed: {message}")]
    Host { kind: MutationKind, message: String },
}

impl MutationError {
    /// The localized, user-facing toast text.
    pub fn toast_message(&self, loc: &Localizer) -> String {
        match self {
            MutationError::Validation => loc.t("toast.fillTitleAndUrl"),
            MutationError::Host { kind, message } => {
                loc.translate(kind.error_key(), &[("message", message.as_str())])
            }
        }
    }
}

fn validate(title: &str, url: &str) -> Result<(String, String), MutationError> {
    let title = title.trim();
    let url = url.trim();
    if title.is_empty() || url.is_empty() {
        return Err(MutationError::Validation);
    }
    Ok((title.to_string(), url.to_string()))
}

/// Create a bookmark in `folder_id`, or in the bookmarks bar when none is given.
pub fn create(
    host: &mut dyn BookmarkHost,
    title: &str,
    url: &str,
    folder_id: Option<&str>,
) -> Result<MutationKind, MutationError> {
    let (title, url) = validate(title, url)?;
    let parent_id = folder_id
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_PARENT_ID)
        .to_string();
    host.create(NewBookmark {
        parent_id,
        title,
        url,
    })
    .map(|_| MutationKind::Create)
    .map_err(|e| MutationError::Host {
        kind: MutationKind::Create,
        message: e.to_string(),
    })
}

/// Change a bookmark's title and url.
pub fn update(
    host: &mut dyn BookmarkHost,
    id: &str,
    title: &str,
    url: &str,
) -> Result<MutationKind, MutationError> {
    let (title, url) = validate(title, url)?;
    host.update(id, &title, &url)
        .map(|_| MutationKind::Update)
        .map_err(|e| MutationError::Host {
            kind: MutationKind::Update,
            message: e.to_string(),
        })
}

/// Delete a bookmark (or folder, with everything below it).
pub fn remove(host: &mut dyn BookmarkHost, id: &str) -> Result<MutationKind, MutationError> {
    host.remove(id)
        .map(|_| MutationKind::Remove)
        .map_err(|e| MutationError::Host {
            kind: MutationKind::Remove,
            message: e.to_string(),
        })
}
