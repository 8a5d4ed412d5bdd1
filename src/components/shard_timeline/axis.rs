//! Tick placement and labels for the time and shard axes.

use super::scale::LinearScale;

/// Ticks the time axis asks for; the actual count follows the 1-2-5 step.
pub const DEFAULT_TICK_COUNT: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
	/// Pixel offset along the axis.
	pub offset: f64,
	pub label: String,
}

/// A 1, 2 or 5 times a power of ten step giving roughly `count` intervals over `[start, stop]`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
	let raw = (stop - start).abs() / count.max(1) as f64;
	if raw == 0.0 || !raw.is_finite() {
		return 0.0;
	}
	let base = 10f64.powi(raw.log10().floor() as i32);
	let error = raw / base;
	let factor = if error >= 50f64.sqrt() {
		10.0
	} else if error >= 10f64.sqrt() {
		5.0
	} else if error >= 2f64.sqrt() {
		2.0
	} else {
		1.0
	};
	factor * base
}

/// Round values within `[start, stop]` (either order), ascending.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
	let (lo, hi) = if start <= stop {
		(start, stop)
	} else {
		(stop, start)
	};
	let step = tick_step(lo, hi, count);
	if step == 0.0 {
		return if lo.is_finite() { vec![lo] } else { vec![] };
	}
	if step < 1.0 {
		// Divide by the reciprocal so fractional ticks come out as exact decimals.
		let inverse = (1.0 / step).round();
		let (first, last) = ((lo * inverse).ceil() as i64, (hi * inverse).floor() as i64);
		(first..=last).map(|i| i as f64 / inverse).collect()
	} else {
		let (first, last) = ((lo / step).ceil() as i64, (hi / step).floor() as i64);
		(first..=last).map(|i| i as f64 * step).collect()
	}
}

/// Fixed-point label with thousands separators, precise enough to tell adjacent ticks apart.
pub fn format_tick(value: f64, step: f64) -> String {
	let decimals = if step > 0.0 && step < 1.0 {
		(-step.log10().floor()) as usize
	} else {
		0
	};
	let text = format!("{:.*}", decimals, value.abs());
	let (int_part, frac_part) = match text.split_once('.') {
		Some((i, f)) => (i, Some(f)),
		None => (text.as_str(), None),
	};

	let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
	if value < 0.0 && text.chars().any(|c| c != '0' && c != '.') {
		grouped.push('−');
	}
	for (i, c) in int_part.chars().enumerate() {
		if i > 0 && (int_part.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(c);
	}
	if let Some(frac) = frac_part {
		grouped.push('.');
		grouped.push_str(frac);
	}
	grouped
}

/// Ticks of the bottom time axis for the currently visible domain.
pub fn time_ticks(scale: &LinearScale) -> Vec<Tick> {
	let (d0, d1) = scale.domain;
	let step = tick_step(d0.min(d1), d0.max(d1), DEFAULT_TICK_COUNT);
	ticks(d0, d1, DEFAULT_TICK_COUNT)
		.into_iter()
		.map(|v| Tick {
			offset: scale.apply(v),
			label: format_tick(v, step),
		})
		.collect()
}

/// One integer-labelled tick per shard, `1..=max_shard`.
pub fn shard_ticks(scale: &LinearScale, max_shard: u64) -> Vec<Tick> {
	(1..=max_shard)
		.map(|shard| Tick {
			offset: scale.apply(shard as f64),
			label: shard.to_string(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn steps_follow_1_2_5() {
		assert_eq!(tick_step(0.0, 10.0, 10), 1.0);
		assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
		assert_eq!(tick_step(0.0, 17.0, 10), 2.0);
		assert_eq!(tick_step(0.0, 40.0, 10), 5.0);
		assert_eq!(tick_step(0.0, 1.0, 10), 0.1);
	}

	#[test]
	fn ticks_are_round_and_inside() {
		assert_eq!(
			ticks(1.0, 5.0, 10),
			vec![1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]
		);
		assert_eq!(ticks(12.0, 47.0, 3), vec![20.0, 30.0, 40.0]);
		assert_eq!(ticks(47.0, 12.0, 3), vec![20.0, 30.0, 40.0]);
		assert_eq!(ticks(0.0, 0.3, 3), vec![0.0, 0.1, 0.2, 0.3]);
	}

	#[test]
	fn collapsed_domain_has_single_tick() {
		assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
	}

	#[test]
	fn labels_group_thousands() {
		assert_eq!(format_tick(1_600_000_000.0, 100.0), "1,600,000,000");
		assert_eq!(format_tick(999.0, 1.0), "999");
		assert_eq!(format_tick(1500.5, 0.5), "1,500.5");
		assert_eq!(format_tick(-2000.0, 1000.0), "−2,000");
		assert_eq!(format_tick(0.25, 0.05), "0.25");
	}

	#[test]
	fn shard_ticks_are_integers() {
		let scale = LinearScale::new((3.0, 0.0), (100.0, 700.0));
		let ticks = shard_ticks(&scale, 3);
		let labels: Vec<_> = ticks.iter().map(|t| t.label.as_str()).collect();
		assert_eq!(labels, ["1", "2", "3"]);
		assert_eq!(ticks[2].offset, 100.0);
		assert!(shard_ticks(&scale, 0).is_empty());
	}

	#[test]
	fn time_ticks_land_on_scale() {
		let scale = LinearScale::new((0.0, 10.0), (150.0, 900.0));
		let ticks = time_ticks(&scale);
		assert_eq!(ticks.len(), 11);
		assert_eq!(ticks[0].offset, 150.0);
		assert_eq!(ticks[10].offset, 900.0);
		assert_eq!(ticks[5].label, "5");
	}
}
