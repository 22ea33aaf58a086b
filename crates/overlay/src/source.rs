//! Comment source boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::comment::{Comment, TargetId};

/// Errors a comment source can report.
///
/// The scheduler treats every variant the same way: the hover session has
/// no comments and aborts quietly. Variants exist so sources can log and
/// callers can distinguish transport trouble from bad payloads.
#[derive(Debug, Error)]
pub enum SourceError {
	/// The backing service could not be reached or answered with an error.
	#[error("comment source unavailable: {0}")]
	Unavailable(String),

	/// The payload could not be decoded into comments.
	#[error("comment payload malformed: {0}")]
	Decode(String),
}

/// Asynchronous provider of the comment pool for a hover target.
///
/// Injected into the scheduler at construction; implementations typically
/// wrap the review API client. May resolve to an empty list, which the
/// scheduler treats as "nothing to show".
#[async_trait]
pub trait CommentSource: Send + Sync {
	/// Fetches all comments for one target.
	async fn fetch(&self, target: &TargetId) -> Result<Vec<Comment>, SourceError>;
}
