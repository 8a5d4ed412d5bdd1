//! Cyclic rainbow ramp used to tell shards apart.

use std::f64::consts::PI;

// Cubehelix basis vectors (Green, 2011).
const A: f64 = -0.14861;
const B: f64 = 1.78277;
const C: f64 = -0.29227;
const D: f64 = -0.90649;
const E: f64 = 1.97294;

fn cubehelix_rgb(hue_deg: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
	let h = (hue_deg + 120.0) * PI / 180.0;
	let amp = saturation * lightness * (1.0 - lightness);
	let (cos_h, sin_h) = (h.cos(), h.sin());
	let channel = |v: f64| (255.0 * v).round().clamp(0.0, 255.0) as u8;
	(
		channel(lightness + amp * (A * cos_h + B * sin_h)),
		channel(lightness + amp * (C * cos_h + D * sin_h)),
		channel(lightness + amp * (E * cos_h)),
	)
}

/// Samples the rainbow at `t`; values outside `[0, 1]` wrap around.
pub fn rainbow(t: f64) -> String {
	let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
	let ts = (t - 0.5).abs();
	let (r, g, b) = cubehelix_rgb(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts);
	format!("rgb({r}, {g}, {b})")
}

/// Fill color of a shard. With no positive shard every block gets the ramp's start color.
pub fn color_for_shard(shard: u64, max_shard: u64) -> String {
	if max_shard == 0 {
		return rainbow(0.0);
	}
	rainbow(shard as f64 / max_shard as f64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ramp_is_cyclic() {
		assert_eq!(rainbow(0.0), rainbow(1.0));
		assert_eq!(rainbow(0.25), rainbow(1.25));
		assert_eq!(rainbow(-0.75), rainbow(0.25));
	}

	#[test]
	fn ramp_endpoints() {
		assert_eq!(rainbow(0.0), "rgb(110, 64, 170)");
		assert_eq!(rainbow(0.5), "rgb(175, 240, 91)");
	}

	#[test]
	fn shards_spread_over_ramp() {
		assert_eq!(color_for_shard(2, 4), rainbow(0.5));
		assert_ne!(color_for_shard(1, 4), color_for_shard(2, 4));
		assert_eq!(color_for_shard(4, 4), color_for_shard(0, 4));
	}

	#[test]
	fn zero_max_shard_is_fixed() {
		assert_eq!(color_for_shard(0, 0), rainbow(0.0));
		assert_eq!(color_for_shard(3, 0), rainbow(0.0));
	}
}
