//! Floating comment overlay scheduling for game pages.
//!
//! An [`OverlayScheduler`] maintains a bounded, continuously updating set of
//! timed "floating comment" instances over one hover target, fed by an
//! injected asynchronous [`CommentSource`]. Hovering a game activates a
//! session: the comment pool is fetched once (and cached per target), an
//! initial burst of comments spawns in quick stagger, then a steady-state
//! loop trickles one more at a randomized interval until `end_hover`.
//!
//! The render surface subscribes to [`ActiveList`] snapshots via
//! [`OverlayScheduler::subscribe`] and only draws; nothing it does feeds
//! back into scheduling. Fetch failures are non-fatal: the session aborts
//! quietly and the next hover retries.
//!
//! All randomized picks (comment, lane, duration band, font size, steady
//! delay) live in [`style`] as pure functions over an explicit random
//! source, so the whole scheduler runs deterministically under
//! [`OverlayScheduler::with_seed`].

mod comment;
mod config;
mod scheduler;
mod source;
pub mod style;

pub use comment::{ActiveList, Comment, CommentId, FloatingComment, SpawnKey, TargetId};
pub use config::{ConfigError, OverlayConfig};
pub use scheduler::{OverlayScheduler, OverlayStats, Phase, StartOutcome};
pub use source::{CommentSource, SourceError};
