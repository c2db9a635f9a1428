//! Pod change events

use std::fmt;

use k8s_openapi::api::core::v1::Pod;

/// One event from the resource store's change stream
#[derive(Debug, Clone)]
pub enum ResourceEvent {
    /// A pod was created (or listed when the stream started)
    Added(Pod),
    /// A pod changed
    Modified(Pod),
    /// A pod was removed
    Deleted(Pod),
    /// Progress marker carrying only a resource version
    Bookmark {
        /// Resource version the stream has reached
        resource_version: String,
    },
    /// The server reported an error inside the stream
    Error(String),
}

impl ResourceEvent {
    /// Kind of this event
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Added(_) => EventKind::Added,
            Self::Modified(_) => EventKind::Modified,
            Self::Deleted(_) => EventKind::Deleted,
            Self::Bookmark { .. } => EventKind::Bookmark,
            Self::Error(_) => EventKind::Error,
        }
    }
}

/// Event kinds as reported by the API server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `ADDED`
    Added,
    /// `MODIFIED`
    Modified,
    /// `DELETED`
    Deleted,
    /// `BOOKMARK`
    Bookmark,
    /// `ERROR`
    Error,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "ADDED"),
            Self::Modified => write!(f, "MODIFIED"),
            Self::Deleted => write!(f, "DELETED"),
            Self::Bookmark => write!(f, "BOOKMARK"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}
