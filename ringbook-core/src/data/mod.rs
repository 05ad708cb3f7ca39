//! Market data plumbing between an external feed decoder and the books
//!
//! - `event`: the add / update / delete shape every book consumes
//! - `synthetic`: seeded random-walk generator standing in for a live feed

pub mod event;
pub mod synthetic;

pub use event::{Applied, BookEvent, UpdateAction};
pub use synthetic::{ladder, SyntheticFeed, SyntheticFeedConfig};
