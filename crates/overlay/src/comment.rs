//! Comment data model shared with the review catalog boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a comment in the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl std::fmt::Display for CommentId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for CommentId {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

/// Identity of a hover target (a game page).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl std::fmt::Display for TargetId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TargetId {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

/// One persistent comment as delivered by the comment source.
///
/// Immutable once fetched; identity is `id`. The same comment may back
/// several concurrently floating instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
	pub id: CommentId,
	pub content: String,
	pub created_at: DateTime<Utc>,
}

/// Unique identity of one spawned floating instance.
///
/// Distinct from [`CommentId`]: spawning the same comment twice yields two
/// different keys, each with an independent lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnKey(pub u64);

impl std::fmt::Display for SpawnKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Monotonic key allocator for spawn instances.
#[derive(Debug, Default)]
pub(crate) struct SpawnClock {
	next: AtomicU64,
}

impl SpawnClock {
	/// Returns the next spawn key.
	pub fn next(&self) -> SpawnKey {
		SpawnKey(self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
	}
}

/// One on-screen floating instance of a comment.
#[derive(Debug, Clone)]
pub struct FloatingComment {
	/// Unique per spawn, not per comment.
	pub key: SpawnKey,
	/// Horizontal display track, in `[0, total_lanes)`.
	pub lane: u16,
	/// On-screen lifetime, excluding the animation end buffer.
	pub duration: Duration,
	/// Font size in logical pixels.
	pub font_size: u16,
	/// The underlying comment data.
	pub comment: Comment,
}

/// Snapshot of all currently floating comments, published on every change.
pub type ActiveList = Arc<[FloatingComment]>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spawn_clock_is_monotonic_and_unique() {
		let clock = SpawnClock::default();
		let a = clock.next();
		let b = clock.next();
		let c = clock.next();
		assert!(a.0 < b.0 && b.0 < c.0);
	}
}
