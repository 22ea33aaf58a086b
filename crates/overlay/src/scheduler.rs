//! Hover-session scheduling core.
//!
//! One [`OverlayScheduler`] is bound to one hover target family (typically
//! one per game grid); independent schedulers share nothing. A session runs
//! from `start_hover` to `end_hover`: it fetches the comment pool once,
//! fires an initial burst of floating comments, then trickles more at
//! randomized intervals until cancelled. Subscribers observe every change
//! to the active set through a watch channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::comment::{ActiveList, Comment, FloatingComment, SpawnClock, TargetId};
use crate::config::{ConfigError, OverlayConfig};
use crate::source::CommentSource;

mod driver;

/// Lifecycle phase of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// No session; no timers running; active set empty.
	Idle,
	/// Pool fetch in flight; re-entrant activation is suppressed.
	Loading,
	/// Burst or steady-state spawn loop running.
	Active,
}

/// What a `start_hover` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
	/// A new session was activated.
	Started,
	/// A session was already active; the call was a no-op.
	AlreadyActive,
	/// A pool fetch was already in flight; the call was a no-op.
	FetchInFlight,
	/// The fetch failed or returned nothing; the session aborted quietly.
	NoComments,
	/// `end_hover` arrived while the fetch was in flight.
	Interrupted,
	/// Reduced motion is enabled; activation is suppressed.
	ReducedMotion,
}

/// Monotonic counters for one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayStats {
	/// Sessions activated.
	pub sessions: u64,
	/// Floating comments spawned.
	pub spawned: u64,
	/// Spawns dropped because the active set was full.
	pub dropped: u64,
	/// Floating comments removed by their lifetime timer.
	pub expired: u64,
}

#[derive(Debug, Default)]
struct Counters {
	sessions: AtomicU64,
	spawned: AtomicU64,
	dropped: AtomicU64,
	expired: AtomicU64,
}

/// Mutable scheduler state, guarded by the core mutex.
struct State {
	phase: Phase,
	/// Bumped by `end_hover`; invalidates activations still awaiting a fetch.
	epoch: u64,
	/// Generation of the live session, `0` when none. Removal timers compare
	/// against this before touching the active set.
	generation: u64,
	cancel: Option<CancellationToken>,
	active: Vec<FloatingComment>,
	pool_cache: HashMap<TargetId, Arc<[Comment]>>,
	rng: SmallRng,
	reduced_motion: bool,
}

/// Shared core behind every scheduler handle.
struct Inner {
	config: OverlayConfig,
	source: Arc<dyn CommentSource>,
	state: Mutex<State>,
	spawn_clock: SpawnClock,
	session_clock: AtomicU64,
	counters: Counters,
	active_tx: watch::Sender<ActiveList>,
}

impl Inner {
	/// Publishes the current active set to subscribers.
	fn publish(&self, state: &State) {
		self.active_tx.send_replace(state.active.clone().into());
	}
}

/// Schedules floating comment overlays for one hover target family.
///
/// Cheap to clone; all clones share one core.
#[derive(Clone)]
pub struct OverlayScheduler {
	inner: Arc<Inner>,
}

impl OverlayScheduler {
	/// Creates a scheduler with an entropy-seeded random source.
	pub fn new(config: OverlayConfig, source: Arc<dyn CommentSource>) -> Result<Self, ConfigError> {
		Self::build(config, source, SmallRng::from_entropy())
	}

	/// Creates a scheduler with a fixed random seed, for deterministic runs.
	pub fn with_seed(config: OverlayConfig, source: Arc<dyn CommentSource>, seed: u64) -> Result<Self, ConfigError> {
		Self::build(config, source, SmallRng::seed_from_u64(seed))
	}

	fn build(config: OverlayConfig, source: Arc<dyn CommentSource>, rng: SmallRng) -> Result<Self, ConfigError> {
		config.validate()?;
		let (active_tx, _) = watch::channel(ActiveList::from(Vec::new()));
		Ok(Self {
			inner: Arc::new(Inner {
				config,
				source,
				state: Mutex::new(State {
					phase: Phase::Idle,
					epoch: 0,
					generation: 0,
					cancel: None,
					active: Vec::new(),
					pool_cache: HashMap::new(),
					rng,
					reduced_motion: false,
				}),
				spawn_clock: SpawnClock::default(),
				session_clock: AtomicU64::new(0),
				counters: Counters::default(),
				active_tx,
			}),
		})
	}

	/// Subscribes to active-set snapshots.
	///
	/// The receiver sees the current snapshot immediately and every change
	/// afterwards. Pure output: nothing a subscriber does feeds back into
	/// scheduling.
	pub fn subscribe(&self) -> watch::Receiver<ActiveList> {
		self.inner.active_tx.subscribe()
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.inner.state.lock().phase
	}

	/// Snapshot of the monotonic counters.
	pub fn stats(&self) -> OverlayStats {
		let c = &self.inner.counters;
		OverlayStats {
			sessions: c.sessions.load(Ordering::Relaxed),
			spawned: c.spawned.load(Ordering::Relaxed),
			dropped: c.dropped.load(Ordering::Relaxed),
			expired: c.expired.load(Ordering::Relaxed),
		}
	}

	/// Drops the cached comment pool for one target.
	pub fn invalidate(&self, target: &TargetId) {
		self.inner.state.lock().pool_cache.remove(target);
	}

	/// Drops every cached comment pool.
	pub fn invalidate_all(&self) {
		self.inner.state.lock().pool_cache.clear();
	}

	/// Forwards the host's reduced-motion preference.
	///
	/// Enabling ends any live session immediately and suppresses activation
	/// until disabled.
	pub fn set_reduced_motion(&self, enabled: bool) {
		self.inner.state.lock().reduced_motion = enabled;
		if enabled {
			tracing::debug!("overlay.reduced_motion.on");
			self.end_hover();
		}
	}

	/// Activates a hover session for `target`.
	///
	/// Idempotent while a session is loading or active. Fetches the pool at
	/// most once per target until invalidated; a failed or empty fetch aborts
	/// activation quietly and the next call retries. Never returns an error:
	/// every failure degrades to "nothing shown".
	pub async fn start_hover(&self, target: TargetId) -> StartOutcome {
		let fetch_epoch = {
			let mut state = self.inner.state.lock();
			if state.reduced_motion {
				return StartOutcome::ReducedMotion;
			}
			match state.phase {
				Phase::Loading => return StartOutcome::FetchInFlight,
				Phase::Active => return StartOutcome::AlreadyActive,
				Phase::Idle => {}
			}
			if let Some(pool) = state.pool_cache.get(&target) {
				let pool = Arc::clone(pool);
				drop(state);
				return self.activate(target, pool);
			}
			state.phase = Phase::Loading;
			state.epoch
		};

		let fetched = self.inner.source.fetch(&target).await;

		let pool = {
			let mut state = self.inner.state.lock();
			if state.epoch != fetch_epoch {
				// end_hover (or reduced motion) raced the fetch; whoever bumped
				// the epoch already owns the phase.
				tracing::debug!(game = %target, "overlay.fetch.interrupted");
				return StartOutcome::Interrupted;
			}
			match fetched {
				Err(err) => {
					state.phase = Phase::Idle;
					drop(state);
					tracing::warn!(game = %target, error = %err, "overlay.fetch.failed");
					return StartOutcome::NoComments;
				}
				// Empty pools are not cached: the next hover refetches.
				Ok(comments) if comments.is_empty() => {
					state.phase = Phase::Idle;
					drop(state);
					tracing::debug!(game = %target, "overlay.fetch.empty");
					return StartOutcome::NoComments;
				}
				Ok(comments) => {
					let pool: Arc<[Comment]> = comments.into();
					state.pool_cache.insert(target.clone(), Arc::clone(&pool));
					pool
				}
			}
		};

		self.activate(target, pool)
	}

	/// Transitions into `Active` and launches the session driver.
	fn activate(&self, target: TargetId, pool: Arc<[Comment]>) -> StartOutcome {
		let (generation, cancel) = {
			let mut state = self.inner.state.lock();
			if state.reduced_motion {
				state.phase = Phase::Idle;
				return StartOutcome::ReducedMotion;
			}
			if state.phase == Phase::Active {
				return StartOutcome::AlreadyActive;
			}
			let generation = self.inner.session_clock.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
			let cancel = CancellationToken::new();
			state.phase = Phase::Active;
			state.generation = generation;
			state.cancel = Some(cancel.clone());
			(generation, cancel)
		};

		self.inner.counters.sessions.fetch_add(1, Ordering::Relaxed);
		tracing::debug!(game = %target, generation, pool = pool.len(), "overlay.session.start");
		tokio::spawn(driver::run_session(Arc::clone(&self.inner), generation, pool, cancel));
		StartOutcome::Started
	}

	/// Ends the live session, if any.
	///
	/// Cancels pending spawns, clears the active set immediately, and resets
	/// to `Idle`. Idempotent; removal timers that fire afterwards are no-ops.
	pub fn end_hover(&self) {
		let was_active = {
			let mut state = self.inner.state.lock();
			state.epoch = state.epoch.wrapping_add(1);
			let was_active = state.phase == Phase::Active;
			state.phase = Phase::Idle;
			state.generation = 0;
			if let Some(cancel) = state.cancel.take() {
				cancel.cancel();
			}
			if !state.active.is_empty() {
				state.active.clear();
				self.inner.publish(&state);
			}
			was_active
		};
		if was_active {
			tracing::debug!("overlay.session.end");
		}
	}
}
