use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque continuation token returned by a paged data source
///
/// The engine never interprets the value. It may be an offset, a cursor
/// string or a URL. An empty cursor means "first page" before the first
/// fetch of a session and "no more pages" after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The cursor used to request the first page of a session
    pub fn start() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One batch of items returned by a single fetch call
///
/// A page envelope may carry both a forward and a backward continuation
/// cursor. Which one drives the next request depends on the merge direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Cursor,
    #[serde(default)]
    pub previous_cursor: Cursor,
}

impl<T> Page<T> {
    /// Create a page with a forward cursor only
    pub fn new(items: Vec<T>, next_cursor: impl Into<Cursor>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.into(),
            previous_cursor: Cursor::default(),
        }
    }

    /// A page with no items, which ends the session
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: Cursor::default(),
            previous_cursor: Cursor::default(),
        }
    }

    #[must_use]
    pub fn with_previous_cursor(mut self, cursor: impl Into<Cursor>) -> Self {
        self.previous_cursor = cursor.into();
        self
    }

    /// Select the cursor for the following request
    ///
    /// Forward cursor by default, backward cursor for reversed (chat-style) feeds.
    pub fn continuation(&self, reversed: bool) -> &Cursor {
        if reversed {
            &self.previous_cursor
        } else {
            &self.next_cursor
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
