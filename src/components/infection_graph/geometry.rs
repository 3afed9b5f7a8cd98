//! Edge and icon geometry recomputed on every simulation step.
//!
//! Links are drawn as circular arcs whose radius equals the chord length,
//! written as SVG path data so the canvas can replay them through `Path2d`.
//! The arrow sits on a second, shorter arc that stops at the apex of the
//! first one.

pub type Point = (f64, f64);

const EPSILON: f64 = 1e-9;

/// Top-left corner that centres an icon of the given size on `center`.
pub fn icon_origin(center: Point, width: f64, height: f64) -> Point {
	(center.0 - width / 2.0, center.1 - height / 2.0)
}

pub fn distance(a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	(dx * dx + dy * dy).sqrt()
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArcPath {
	pub start: Point,
	pub end: Point,
	pub radius: f64,
}

impl ArcPath {
	/// Clockwise minor arc from `start` to `end`. `None` when the endpoints
	/// coincide.
	pub fn new(start: Point, end: Point, radius: f64) -> Option<Self> {
		if distance(start, end) < EPSILON || radius < EPSILON {
			return None;
		}
		Some(Self { start, end, radius })
	}

	/// SVG path data: `M sx,sy A r,r 0 0,1 ex,ey`.
	pub fn to_path_data(&self) -> String {
		format!(
			"M{},{}A{},{} 0 0,1 {},{}",
			self.start.0, self.start.1, self.radius, self.radius, self.end.0, self.end.1
		)
	}

	pub fn center(&self) -> Point {
		let (x1, y1) = ((self.start.0 - self.end.0) / 2.0, (self.start.1 - self.end.1) / 2.0);
		let half_chord_sq = x1 * x1 + y1 * y1;
		// A radius shorter than half the chord is scaled up by the renderer.
		let coef = ((self.radius * self.radius - half_chord_sq) / half_chord_sq)
			.max(0.0)
			.sqrt();
		let (mx, my) = ((self.start.0 + self.end.0) / 2.0, (self.start.1 + self.end.1) / 2.0);
		(mx + coef * y1, my - coef * x1)
	}

	/// Unit direction of travel at the end of the arc.
	pub fn end_tangent(&self) -> Point {
		let (cx, cy) = self.center();
		let (rx, ry) = (self.end.0 - cx, self.end.1 - cy);
		let r = (rx * rx + ry * ry).sqrt();
		if r < EPSILON {
			let d = distance(self.start, self.end);
			return ((self.end.0 - self.start.0) / d, (self.end.1 - self.start.1) / d);
		}
		(-ry / r, rx / r)
	}
}

/// Arc from source to target with radius equal to their distance.
pub fn link_arc(source: Point, target: Point) -> Option<ArcPath> {
	ArcPath::new(source, target, distance(source, target))
}

/// Shorter arc along the same curve, ending near the middle of the link so
/// the arrowhead shows the direction of infection.
pub fn marker_arc(source: Point, target: Point) -> Option<ArcPath> {
	let (dx, dy) = (target.0 - source.0, target.1 - source.1);
	let dr = distance(source, target);
	if dr < EPSILON {
		return None;
	}
	let len = dr - (dr / 2.0) * 3f64.sqrt();
	let end = (
		(target.0 + source.0) / 2.0 + dy * len / dr,
		(target.1 + source.1) / 2.0 - dx * len / dr,
	);
	ArcPath::new(source, end, dr)
}

/// Triangle of an arrowhead whose base centre sits at `base` and which points
/// along the unit vector `dir`: tip, then the two base corners.
pub fn arrowhead(base: Point, dir: Point, length: f64, half_width: f64) -> [Point; 3] {
	let (px, py) = (-dir.1 * half_width, dir.0 * half_width);
	[
		(base.0 + dir.0 * length, base.1 + dir.1 * length),
		(base.0 + px, base.1 + py),
		(base.0 - px, base.1 - py),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: Point, b: Point) -> bool {
		(a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6
	}

	#[test]
	fn icon_is_centred_on_node() {
		assert_eq!(icon_origin((100.0, 40.0), 15.0, 15.0), (92.5, 32.5));
	}

	#[test]
	fn link_radius_is_endpoint_distance() {
		let arc = link_arc((10.0, 20.0), (13.0, 24.0)).unwrap();
		assert_eq!(arc.radius, 5.0);
		assert_eq!(arc.to_path_data(), "M10,20A5,5 0 0,1 13,24");
	}

	#[test]
	fn coincident_endpoints_have_no_path() {
		assert!(link_arc((1.0, 1.0), (1.0, 1.0)).is_none());
		assert!(marker_arc((1.0, 1.0), (1.0, 1.0)).is_none());
	}

	#[test]
	fn marker_ends_at_apex_of_link_arc() {
		let (source, target) = ((0.0, 0.0), (100.0, 0.0));
		let link = link_arc(source, target).unwrap();
		let marker = marker_arc(source, target).unwrap();
		let len = 100.0 - 50.0 * 3f64.sqrt();
		assert!(close(marker.end, (50.0, -len)));
		// Same circle as the full link.
		assert!(close(marker.center(), link.center()));
		assert!((distance(marker.end, link.center()) - 100.0).abs() < 1e-6);
	}

	#[test]
	fn arrow_at_apex_points_along_the_chord() {
		let marker = marker_arc((20.0, 30.0), (20.0, 90.0)).unwrap();
		assert!(close(marker.end_tangent(), (0.0, 1.0)));
	}

	#[test]
	fn clockwise_half_circle_heads_down_at_its_end() {
		let arc = ArcPath::new((0.0, 0.0), (2.0, 0.0), 1.0).unwrap();
		assert!(close(arc.center(), (1.0, 0.0)));
		assert!(close(arc.end_tangent(), (0.0, 1.0)));
	}

	#[test]
	fn arrowhead_tip_leads_the_base() {
		let [tip, left, right] = arrowhead((0.0, 0.0), (1.0, 0.0), 6.0, 3.0);
		assert_eq!(tip, (6.0, 0.0));
		assert_eq!(left, (0.0, 3.0));
		assert_eq!(right, (0.0, -3.0));
	}
}
