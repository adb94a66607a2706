//! Heading computation from raw axis counts.
//!
//! Calibration is the running min/max of each horizontal axis. Every sample
//! is centred on the midpoint of its axis range and scaled by the span, so
//! a sensor rotated through a full circle ends up roughly on the unit
//! circle regardless of hard-iron offset.

use log::trace;

/// One X/Y/Z reading in raw counts
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
	pub x: i16,
	pub y: i16,
	pub z: i16,
}

impl RawSample {
	/// Decodes the six output registers, LSB first, in X, Y, Z order.
	pub fn from_le_bytes(buf: &[u8; 6]) -> Self {
		RawSample {
			x: i16::from_le_bytes([buf[0], buf[1]]),
			y: i16::from_le_bytes([buf[2], buf[3]]),
			z: i16::from_le_bytes([buf[4], buf[5]]),
		}
	}
}

/// Observed extrema of the X and Y axes.
///
/// Starts inverted so that the first sample sets both bounds. The range
/// only ever widens; an outlier stays in the extrema for the life of the
/// value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
	pub x_min: i16,
	pub x_max: i16,
	pub y_min: i16,
	pub y_max: i16,
}

impl Default for Calibration {
	fn default() -> Self {
		Calibration {
			x_min: i16::MAX,
			x_max: i16::MIN,
			y_min: i16::MAX,
			y_max: i16::MIN,
		}
	}
}

impl Calibration {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn update(&mut self, x: i16, y: i16) {
		self.x_min = self.x_min.min(x);
		self.x_max = self.x_max.max(x);
		self.y_min = self.y_min.min(y);
		self.y_max = self.y_max.max(y);
	}

	/// Width of the X and Y ranges, zero before any sample.
	pub fn span(&self) -> (u16, u16) {
		(
			axis_span(self.x_min, self.x_max),
			axis_span(self.y_min, self.y_max),
		)
	}

	/// Both axes have seen at least two distinct values.
	pub fn is_ready(&self) -> bool {
		self.x_max > self.x_min && self.y_max > self.y_min
	}

	/// Maps raw counts to roughly [-1, 1] per axis, or `None` while either
	/// span is zero.
	pub fn normalize(&self, x: i16, y: i16) -> Option<(f32, f32)> {
		if !self.is_ready() {
			return None;
		}
		Some((
			normalize_axis(x, self.x_min, self.x_max),
			normalize_axis(y, self.y_min, self.y_max),
		))
	}
}

fn axis_span(min: i16, max: i16) -> u16 {
	if max < min {
		0
	} else {
		(max as i32 - min as i32) as u16
	}
}

// midpoint truncates toward zero before going to float
fn normalize_axis(raw: i16, min: i16, max: i16) -> f32 {
	let mid = (max as i32 + min as i32) / 2;
	(raw as i32 - mid) as f32 / (max as i32 - min as i32) as f32
}

/// Bearing in [0, 360) of a normalized vector, clockwise from the X axis.
pub fn bearing(x_norm: f32, y_norm: f32) -> f32 {
	let deg = libm::atan2f(y_norm, x_norm).to_degrees();
	if deg >= 0.0 {
		return deg;
	}
	// tiny negative angles round up to exactly 360 in f32
	let wrapped = deg + 360.0;
	if wrapped >= 360.0 {
		0.0
	} else {
		wrapped
	}
}

/// Calibrates samples and turns them into bearings. Owns no bus.
#[derive(Clone, Debug, Default)]
pub struct HeadingEngine {
	calibration: Calibration,
}

impl HeadingEngine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn calibration(&self) -> &Calibration {
		&self.calibration
	}

	/// Folds the sample into the calibration and returns its bearing, or
	/// `None` while calibration is still degenerate.
	pub fn update(&mut self, sample: &RawSample) -> Option<f32> {
		self.calibration.update(sample.x, sample.y);
		match self.calibration.normalize(sample.x, sample.y) {
			Some((x, y)) => Some(bearing(x, y)),
			None => {
				trace!(
					"calibration pending: x {}..{} y {}..{}",
					self.calibration.x_min,
					self.calibration.x_max,
					self.calibration.y_min,
					self.calibration.y_max
				);
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f32 = 1e-3;

	fn sample(x: i16, y: i16) -> RawSample {
		RawSample { x, y, z: 0 }
	}

	#[test]
	fn decodes_little_endian_pairs() {
		let s = RawSample::from_le_bytes(&[0x10, 0x00, 0x00, 0x10, 0xfe, 0xff]);
		assert_eq!(s, RawSample { x: 16, y: 4096, z: -2 });
	}

	#[test]
	fn first_sample_sets_both_bounds() {
		let mut cal = Calibration::new();
		assert_eq!(cal.span(), (0, 0));
		cal.update(-5, 7);
		assert_eq!(cal, Calibration { x_min: -5, x_max: -5, y_min: 7, y_max: 7 });
		assert!(!cal.is_ready());
	}

	#[test]
	fn span_never_shrinks() {
		let mut cal = Calibration::new();
		let mut last = cal.span();
		for &(x, y) in &[(0, 0), (100, -3), (-40, 12), (5, 5), (i16::MIN, i16::MAX), (i16::MAX, i16::MIN), (0, 0)] {
			cal.update(x, y);
			let span = cal.span();
			assert!(span.0 >= last.0 && span.1 >= last.1);
			assert!(cal.x_min <= cal.x_max && cal.y_min <= cal.y_max);
			last = span;
		}
		assert_eq!(cal.span(), (u16::MAX, u16::MAX));
	}

	#[test]
	fn invalid_until_both_axes_vary() {
		let mut engine = HeadingEngine::new();
		assert_eq!(engine.update(&sample(10, 10)), None);
		// only x moved
		assert_eq!(engine.update(&sample(20, 10)), None);
		assert!(engine.update(&sample(20, 30)).is_some());
		// a repeat of an earlier point is still valid
		assert!(engine.update(&sample(10, 10)).is_some());
	}

	#[test]
	fn regression_fixed_pair() {
		let mut engine = HeadingEngine::new();
		let a = RawSample::from_le_bytes(&[0x10, 0x00, 0x00, 0x10, 0, 0]);
		let b = RawSample::from_le_bytes(&[0xf0, 0xff, 0x00, 0xf0, 0, 0]);
		assert_eq!(b, sample(-16, -4096));

		assert_eq!(engine.update(&a), None);
		let hb = engine.update(&b).unwrap();
		assert!((hb - 225.0).abs() < EPS, "{}", hb);
		let ha = engine.update(&a).unwrap();
		assert!((ha - 45.0).abs() < EPS, "{}", ha);
	}

	#[test]
	fn midpoint_gives_zero_degrees() {
		let mut engine = HeadingEngine::new();
		engine.update(&sample(-16, -4096));
		engine.update(&sample(16, 4096));
		let h = engine.update(&sample(0, 0)).unwrap();
		assert_eq!(h, 0.0);
	}

	#[test]
	fn midpoint_truncates_toward_zero() {
		let mut cal = Calibration::new();
		cal.update(-3, -3);
		cal.update(0, 0);
		// (0 + -3) / 2 == -1, not -2
		let (x, _) = cal.normalize(-1, 0).unwrap();
		assert_eq!(x, 0.0);
	}

	#[test]
	fn extreme_range_does_not_overflow() {
		let mut cal = Calibration::new();
		cal.update(i16::MIN, i16::MIN);
		cal.update(i16::MAX, i16::MAX);
		let (x, y) = cal.normalize(i16::MAX, i16::MIN).unwrap();
		assert!((x - 0.5).abs() < EPS);
		assert!((y + 0.5).abs() < EPS);
	}

	#[test]
	fn constant_input_is_deterministic() {
		let mut engine = HeadingEngine::new();
		engine.update(&sample(-200, -150));
		engine.update(&sample(220, 180));
		let first = engine.update(&sample(37, -91)).unwrap();
		let second = engine.update(&sample(37, -91)).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn bearing_quadrants() {
		assert!((bearing(1.0, 0.0) - 0.0).abs() < EPS);
		assert!((bearing(0.0, 1.0) - 90.0).abs() < EPS);
		assert!((bearing(-1.0, 0.0) - 180.0).abs() < EPS);
		assert!((bearing(0.0, -1.0) - 270.0).abs() < EPS);
		let h = bearing(1.0, -1e-6);
		assert!(h >= 0.0 && h < 360.0);
		assert_eq!(bearing(1.0, -1e-12), 0.0);
	}
}
