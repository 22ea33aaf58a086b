//! Pure presentation picks for floating comments.
//!
//! Every randomized choice takes an explicit random source so the scheduler
//! can run deterministically under a seeded generator.

use std::time::Duration;

use rand::Rng;

/// Font sizes floating comments are drawn at, in logical pixels.
pub const FONT_PALETTE: [u16; 6] = [14, 16, 18, 20, 24, 28];

/// Picks a pool index uniformly, with replacement across calls.
///
/// # Panics
///
/// Panics if `len` is zero; callers never spawn from an empty pool.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
	assert!(len > 0, "comment pool must be non-empty");
	rng.gen_range(0..len)
}

/// Picks a display lane, preferring unoccupied lanes.
///
/// `occupied[i]` marks lane `i` as taken. When every lane is taken the pick
/// falls back to a uniform draw over all lanes, so the result is always in
/// `[0, occupied.len())`.
pub fn pick_lane<R: Rng + ?Sized>(rng: &mut R, occupied: &[bool]) -> u16 {
	let free: Vec<u16> = occupied
		.iter()
		.enumerate()
		.filter(|(_, taken)| !**taken)
		.map(|(lane, _)| lane as u16)
		.collect();
	if free.is_empty() {
		rng.gen_range(0..occupied.len()) as u16
	} else {
		free[rng.gen_range(0..free.len())]
	}
}

/// On-screen lifetime for a comment, monotone in its text length.
///
/// Lengths are counted in characters, not bytes, so CJK comments band the
/// same way latin ones do.
pub fn duration_for(content: &str) -> Duration {
	let chars = content.chars().count();
	let secs = match chars {
		0..=10 => 12,
		11..=20 => 18,
		21..=30 => 24,
		_ => 30,
	};
	Duration::from_secs(secs)
}

/// Picks a font size from the fixed palette.
pub fn pick_font_size<R: Rng + ?Sized>(rng: &mut R) -> u16 {
	FONT_PALETTE[rng.gen_range(0..FONT_PALETTE.len())]
}

/// Picks a steady-state spawn delay uniformly in `[min, max]`.
pub fn steady_delay<R: Rng + ?Sized>(rng: &mut R, min: Duration, max: Duration) -> Duration {
	if min >= max {
		return min;
	}
	Duration::from_millis(rng.gen_range(min.as_millis() as u64..=max.as_millis() as u64))
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn duration_bands() {
		assert_eq!(duration_for(""), Duration::from_secs(12));
		assert_eq!(duration_for("短い"), Duration::from_secs(12));
		assert_eq!(duration_for(&"a".repeat(20)), Duration::from_secs(18));
		assert_eq!(duration_for(&"a".repeat(30)), Duration::from_secs(24));
		assert_eq!(duration_for(&"a".repeat(31)), Duration::from_secs(30));
	}

	#[test]
	fn lane_prefers_free() {
		let mut rng = SmallRng::seed_from_u64(7);
		// Lane 2 is the only free lane.
		for _ in 0..32 {
			assert_eq!(pick_lane(&mut rng, &[true, true, false, true]), 2);
		}
	}

	#[test]
	fn lane_falls_back_when_full() {
		let mut rng = SmallRng::seed_from_u64(7);
		for _ in 0..32 {
			let lane = pick_lane(&mut rng, &[true, true, true]);
			assert!(lane < 3);
		}
	}

	#[test]
	fn font_sizes_come_from_palette() {
		let mut rng = SmallRng::seed_from_u64(42);
		for _ in 0..64 {
			assert!(FONT_PALETTE.contains(&pick_font_size(&mut rng)));
		}
	}

	proptest! {
		#[test]
		fn duration_is_monotone(a in 0usize..200, b in 0usize..200) {
			let (short, long) = if a <= b { (a, b) } else { (b, a) };
			prop_assert!(duration_for(&"x".repeat(short)) <= duration_for(&"x".repeat(long)));
		}

		#[test]
		fn duration_stays_in_sane_bounds(len in 0usize..10_000) {
			let d = duration_for(&"x".repeat(len));
			prop_assert!(d >= Duration::from_secs(6) && d <= Duration::from_secs(30));
		}

		#[test]
		fn lane_is_always_in_range(seed in any::<u64>(), occupied in proptest::collection::vec(any::<bool>(), 1..16)) {
			let mut rng = SmallRng::seed_from_u64(seed);
			let lane = pick_lane(&mut rng, &occupied);
			prop_assert!((lane as usize) < occupied.len());
		}

		#[test]
		fn steady_delay_is_bounded(seed in any::<u64>(), lo in 0u64..2_000, hi in 0u64..2_000) {
			let (min, max) = (Duration::from_millis(lo.min(hi)), Duration::from_millis(lo.max(hi)));
			let mut rng = SmallRng::seed_from_u64(seed);
			let delay = steady_delay(&mut rng, min, max);
			prop_assert!(delay >= min && delay <= max);
		}
	}
}
