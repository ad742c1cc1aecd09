//! Pan and zoom of the canvas.

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.4;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom change per unit of wheel delta.
pub const WHEEL_ZOOM_RATE: f64 = 0.001;

/// Screen = world * k + (x, y).
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Sets the zoom to `k` (clamped) keeping the world point under the
	/// screen point `(sx, sy)` in place.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, k: f64) {
		let new_k = k.clamp(MIN_ZOOM, MAX_ZOOM);
		let (wx, wy) = self.screen_to_world(sx, sy);
		self.x = sx - wx * new_k;
		self.y = sy - wy * new_k;
		self.k = new_k;
	}

	/// Wheel zoom anchored at the cursor; scrolling down zooms out.
	pub fn wheel_zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.zoom_at(sx, sy, self.k - delta_y * WHEEL_ZOOM_RATE);
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn zoom_percent(&self) -> u32 {
		(self.k * 100.0).round() as u32
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn assert_close(a: (f64, f64), b: (f64, f64)) {
		assert!((a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS, "{a:?} != {b:?}");
	}

	#[test]
	fn zoom_keeps_anchor_world_point() {
		let mut t = ViewTransform {
			x: 37.0,
			y: -12.5,
			k: 1.3,
		};
		for (sx, sy, k) in [(100.0, 200.0, 2.0), (0.0, 0.0, 0.5), (640.0, 360.0, 2.9), (3.0, 999.0, 1.0)] {
			let before = t.screen_to_world(sx, sy);
			t.zoom_at(sx, sy, k);
			assert_close(t.screen_to_world(sx, sy), before);
		}
	}

	#[test]
	fn clamped_zoom_still_keeps_anchor() {
		let mut t = ViewTransform::default();
		let before = t.screen_to_world(250.0, 80.0);
		t.zoom_at(250.0, 80.0, 50.0);
		assert_eq!(t.k, MAX_ZOOM);
		assert_close(t.screen_to_world(250.0, 80.0), before);
	}

	#[test]
	fn zoom_stays_in_range_under_any_wheel_input() {
		let mut t = ViewTransform::default();
		for _ in 0..500 {
			t.wheel_zoom(10.0, 10.0, -120.0);
			assert!((MIN_ZOOM..=MAX_ZOOM).contains(&t.k));
		}
		assert_eq!(t.k, MAX_ZOOM);
		for _ in 0..500 {
			t.wheel_zoom(10.0, 10.0, 300.0);
			assert!((MIN_ZOOM..=MAX_ZOOM).contains(&t.k));
		}
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn wheel_down_zooms_out() {
		let mut t = ViewTransform::default();
		t.wheel_zoom(0.0, 0.0, 100.0);
		assert!((t.k - 0.9).abs() < EPS);
		assert_eq!(t.zoom_percent(), 90);
	}

	#[test]
	fn screen_to_world_undoes_pan_and_zoom() {
		let t = ViewTransform {
			x: 15.0,
			y: 40.0,
			k: 2.5,
		};
		assert_close(t.screen_to_world(12.0 * 2.5 + 15.0, -3.0 * 2.5 + 40.0), (12.0, -3.0));
	}
}
