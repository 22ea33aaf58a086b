//! Overlay scheduling configuration.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when validating overlay configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// `max_display` must allow at least one floating comment.
	#[error("max_display must be > 0")]
	ZeroMaxDisplay,

	/// `total_lanes` must provide at least one display track.
	#[error("total_lanes must be > 0")]
	ZeroLanes,

	/// `initial_burst` must spawn at least one comment.
	#[error("initial_burst must be > 0")]
	ZeroBurst,

	/// The steady-state delay range is inverted.
	#[error("steady delay range inverted: min {min:?} > max {max:?}")]
	InvertedDelayRange {
		/// Configured lower bound.
		min: Duration,
		/// Configured upper bound.
		max: Duration,
	},
}

/// Tuning knobs for one overlay scheduler.
///
/// All fields have defaults; use the builder setters to override.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
	/// Upper bound on concurrently floating comments.
	pub(crate) max_display: usize,
	/// Number of horizontal display tracks.
	pub(crate) total_lanes: u16,
	/// Spawns fired back-to-back when a hover session activates.
	pub(crate) initial_burst: usize,
	/// Stagger between burst spawns.
	pub(crate) burst_interval: Duration,
	/// Lower bound of the randomized steady-state spawn delay.
	pub(crate) steady_min_delay: Duration,
	/// Upper bound of the randomized steady-state spawn delay.
	pub(crate) steady_max_delay: Duration,
	/// Grace period past `duration` before a floating comment is removed.
	pub(crate) end_buffer: Duration,
}

impl Default for OverlayConfig {
	fn default() -> Self {
		Self {
			max_display: 20,
			total_lanes: 20,
			initial_burst: 10,
			burst_interval: Duration::from_millis(100),
			steady_min_delay: Duration::from_millis(500),
			steady_max_delay: Duration::from_millis(1500),
			end_buffer: Duration::from_secs(1),
		}
	}
}

impl OverlayConfig {
	/// Creates the default configuration.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the bound on concurrently floating comments.
	#[must_use]
	pub fn max_display(mut self, max: usize) -> Self {
		self.max_display = max;
		self
	}

	/// Sets the number of display lanes.
	#[must_use]
	pub fn total_lanes(mut self, lanes: u16) -> Self {
		self.total_lanes = lanes;
		self
	}

	/// Sets the initial burst size.
	#[must_use]
	pub fn initial_burst(mut self, burst: usize) -> Self {
		self.initial_burst = burst;
		self
	}

	/// Sets the stagger between burst spawns.
	#[must_use]
	pub fn burst_interval(mut self, interval: Duration) -> Self {
		self.burst_interval = interval;
		self
	}

	/// Sets the steady-state spawn delay range.
	#[must_use]
	pub fn steady_delay(mut self, min: Duration, max: Duration) -> Self {
		self.steady_min_delay = min;
		self.steady_max_delay = max;
		self
	}

	/// Sets the removal grace period appended to each comment's duration.
	#[must_use]
	pub fn end_buffer(mut self, buffer: Duration) -> Self {
		self.end_buffer = buffer;
		self
	}

	/// Validates bounds and ranges.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_display == 0 {
			return Err(ConfigError::ZeroMaxDisplay);
		}
		if self.total_lanes == 0 {
			return Err(ConfigError::ZeroLanes);
		}
		if self.initial_burst == 0 {
			return Err(ConfigError::ZeroBurst);
		}
		if self.steady_min_delay > self.steady_max_delay {
			return Err(ConfigError::InvertedDelayRange {
				min: self.steady_min_delay,
				max: self.steady_max_delay,
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		assert!(OverlayConfig::default().validate().is_ok());
	}

	#[test]
	fn rejects_zero_bounds() {
		assert!(matches!(
			OverlayConfig::new().max_display(0).validate(),
			Err(ConfigError::ZeroMaxDisplay)
		));
		assert!(matches!(OverlayConfig::new().total_lanes(0).validate(), Err(ConfigError::ZeroLanes)));
		assert!(matches!(OverlayConfig::new().initial_burst(0).validate(), Err(ConfigError::ZeroBurst)));
	}

	#[test]
	fn rejects_inverted_delay_range() {
		let config = OverlayConfig::new().steady_delay(Duration::from_millis(900), Duration::from_millis(300));
		assert!(matches!(config.validate(), Err(ConfigError::InvertedDelayRange { .. })));
	}
}
