//! Per-session spawn loop and removal timers.
//!
//! One driver task runs per hover session: the burst phase spawns
//! back-to-back with a fixed stagger, then the steady-state loop waits a
//! randomized delay and spawns one comment per iteration. Both phases race
//! the session's cancellation token; each spawned comment gets its own
//! removal timer guarded by `(generation, key)` membership.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio_util::sync::CancellationToken;

use super::{Inner, Phase};
use crate::comment::{Comment, FloatingComment, SpawnKey};
use crate::style;

pub(super) async fn run_session(inner: Arc<Inner>, generation: u64, pool: Arc<[Comment]>, cancel: CancellationToken) {
	for n in 0..inner.config.initial_burst {
		if n > 0 {
			tokio::select! {
				biased;
				_ = cancel.cancelled() => return,
				_ = tokio::time::sleep(inner.config.burst_interval) => {}
			}
		}
		if cancel.is_cancelled() {
			return;
		}
		spawn_one(&inner, generation, &pool, &cancel);
	}

	// Steady state: strictly serialized, one delay then one spawn.
	loop {
		let delay = {
			let mut state = inner.state.lock();
			style::steady_delay(&mut state.rng, inner.config.steady_min_delay, inner.config.steady_max_delay)
		};
		tokio::select! {
			biased;
			_ = cancel.cancelled() => return,
			_ = tokio::time::sleep(delay) => {}
		}
		spawn_one(&inner, generation, &pool, &cancel);
	}
}

/// Spawns one floating comment, or drops the spawn when the active set is
/// already at capacity.
fn spawn_one(inner: &Arc<Inner>, generation: u64, pool: &Arc<[Comment]>, cancel: &CancellationToken) {
	let (key, lifetime) = {
		let mut state = inner.state.lock();
		if state.generation != generation || state.phase != Phase::Active {
			return;
		}
		if state.active.len() >= inner.config.max_display {
			inner.counters.dropped.fetch_add(1, Ordering::Relaxed);
			tracing::trace!(generation, "overlay.spawn.dropped");
			return;
		}

		let comment = pool[style::pick_index(&mut state.rng, pool.len())].clone();
		let mut occupied = vec![false; inner.config.total_lanes as usize];
		for floating in &state.active {
			if let Some(slot) = occupied.get_mut(floating.lane as usize) {
				*slot = true;
			}
		}
		let lane = style::pick_lane(&mut state.rng, &occupied);
		let duration = style::duration_for(&comment.content);
		let font_size = style::pick_font_size(&mut state.rng);
		let key = inner.spawn_clock.next();

		state.active.push(FloatingComment {
			key,
			lane,
			duration,
			font_size,
			comment,
		});
		inner.publish(&state);
		inner.counters.spawned.fetch_add(1, Ordering::Relaxed);
		tracing::trace!(generation, key = %key, lane, "overlay.spawn");
		(key, duration + inner.config.end_buffer)
	};

	let inner = Arc::clone(inner);
	let cancel = cancel.clone();
	tokio::spawn(async move {
		tokio::select! {
			biased;
			// end_hover already cleared the active set; nothing to remove.
			_ = cancel.cancelled() => {}
			_ = tokio::time::sleep(lifetime) => remove_expired(&inner, generation, key),
		}
	});
}

/// Removes one floating comment whose lifetime elapsed.
fn remove_expired(inner: &Inner, generation: u64, key: SpawnKey) {
	let mut state = inner.state.lock();
	// The timer may outlive its session; membership is checked by key, never
	// assumed from list shape.
	if state.generation != generation {
		return;
	}
	let Some(pos) = state.active.iter().position(|floating| floating.key == key) else {
		return;
	};
	state.active.remove(pos);
	inner.counters.expired.fetch_add(1, Ordering::Relaxed);
	inner.publish(&state);
	tracing::trace!(generation, key = %key, "overlay.expire");
}
