//! Domain types
//!
//! This module contains the plain data exchanged between the pagination
//! engine and its collaborators:
//! - Continuation cursors and page envelopes
//! - Scroll samples from the list binding layer
//! - Page load outcomes

pub mod outcome;
pub mod page;
pub mod scroll;

pub use outcome::PageLoadOutcome;
pub use page::{Cursor, Page};
pub use scroll::ScrollSample;
