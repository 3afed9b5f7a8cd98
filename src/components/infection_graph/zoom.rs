use super::config::GraphConfig;
use super::geometry::Point;

/// Affine view transform: `view = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
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
	pub fn apply(&self, (wx, wy): Point) -> Point {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	pub fn invert(&self, (vx, vy): Point) -> Point {
		((vx - self.x) / self.k, (vy - self.y) / self.k)
	}
}

/// Bounds every transform so the scale stays within the configured range and
/// the visible window never leaves the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomBehavior {
	min_scale: f64,
	max_scale: f64,
	wheel_step: f64,
	viewport: (Point, Point),
	translate_extent: (Point, Point),
}

impl ZoomBehavior {
	pub fn new(config: &GraphConfig) -> Self {
		let bounds = ((0.0, 0.0), (config.width, config.height));
		Self {
			min_scale: config.zoom.min_scale,
			max_scale: config.zoom.max_scale,
			wheel_step: config.zoom.wheel_step,
			viewport: bounds,
			translate_extent: bounds,
		}
	}

	/// Scale by `factor` keeping the world point under `anchor` in place.
	pub fn scale_at(&self, t: ViewTransform, anchor: Point, factor: f64) -> ViewTransform {
		let k = (t.k * factor).clamp(self.min_scale, self.max_scale);
		let (wx, wy) = t.invert(anchor);
		self.constrain(ViewTransform {
			x: anchor.0 - wx * k,
			y: anchor.1 - wy * k,
			k,
		})
	}

	/// One wheel notch; positive `delta_y` zooms out.
	pub fn wheel_at(&self, t: ViewTransform, anchor: Point, delta_y: f64) -> ViewTransform {
		let factor = if delta_y > 0.0 {
			1.0 / self.wheel_step
		} else {
			self.wheel_step
		};
		self.scale_at(t, anchor, factor)
	}

	pub fn translate_to(&self, t: ViewTransform, x: f64, y: f64) -> ViewTransform {
		self.constrain(ViewTransform { x, y, k: t.k })
	}

	pub fn constrain(&self, t: ViewTransform) -> ViewTransform {
		let ((vx0, vy0), (vx1, vy1)) = self.viewport;
		let ((ex0, ey0), (ex1, ey1)) = self.translate_extent;
		let (ix0, iy0) = t.invert((vx0, vy0));
		let (ix1, iy1) = t.invert((vx1, vy1));
		let shift = |d0: f64, d1: f64| {
			if d1 > d0 {
				(d0 + d1) / 2.0
			} else if d0 < 0.0 {
				d0
			} else {
				d1.max(0.0)
			}
		};
		let (sx, sy) = (shift(ix0 - ex0, ix1 - ex1), shift(iy0 - ey0, iy1 - ey1));
		ViewTransform {
			x: t.x + t.k * sx,
			y: t.y + t.k * sy,
			k: t.k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn behavior() -> ZoomBehavior {
		ZoomBehavior::new(&GraphConfig::default())
	}

	fn window_inside_canvas(t: ViewTransform) -> bool {
		let (x0, y0) = t.invert((0.0, 0.0));
		let (x1, y1) = t.invert((1000.0, 400.0));
		let eps = 1e-9;
		x0 >= -eps && y0 >= -eps && x1 <= 1000.0 + eps && y1 <= 400.0 + eps
	}

	#[test]
	fn scale_is_clamped_to_range() {
		let zoom = behavior();
		let mut t = ViewTransform::default();
		for _ in 0..40 {
			t = zoom.wheel_at(t, (300.0, 100.0), -1.0);
		}
		assert_eq!(t.k, 5.0);
		for _ in 0..80 {
			t = zoom.wheel_at(t, (10.0, 390.0), 1.0);
		}
		assert_eq!(t.k, 1.0);
		assert_eq!(t, ViewTransform::default());
	}

	#[test]
	fn gestures_keep_window_inside_canvas() {
		let zoom = behavior();
		let mut t = ViewTransform::default();
		let anchors = [(0.0, 0.0), (999.0, 399.0), (500.0, 200.0), (120.0, 330.0)];
		for (i, anchor) in anchors.iter().cycle().take(30).enumerate() {
			t = zoom.wheel_at(t, *anchor, if i % 3 == 0 { 1.0 } else { -1.0 });
			assert!((1.0..=5.0).contains(&t.k));
			assert!(window_inside_canvas(t), "{t:?}");
			t = zoom.translate_to(t, t.x + 250.0, t.y - 90.0);
			assert!(window_inside_canvas(t), "{t:?}");
		}
	}

	#[test]
	fn zoom_keeps_anchor_fixed_when_unconstrained() {
		let zoom = behavior();
		let t = zoom.scale_at(ViewTransform::default(), (500.0, 200.0), 2.0);
		assert_eq!(t.k, 2.0);
		assert_eq!(t.invert((500.0, 200.0)), (500.0, 200.0));
	}

	#[test]
	fn panning_at_unit_scale_is_pinned() {
		let zoom = behavior();
		let t = zoom.translate_to(ViewTransform::default(), 80.0, -40.0);
		assert_eq!(t, ViewTransform::default());
	}
}
