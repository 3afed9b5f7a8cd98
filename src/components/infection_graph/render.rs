use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement, Path2d};

use super::config::IconConfig;
use super::geometry;
use super::legend::{LABEL_BASELINE, LABEL_X, LEGEND_X, SWATCH_SIZE};
use super::state::{Frame, GraphState, LinkFrame, NodeFrame};
use super::types::Gender;

const ARROW_LENGTH: f64 = 6.0;
const ARROW_HALF_WIDTH: f64 = 3.0;

/// Gender icons drawn on top of each node.
pub struct Icons {
	male: HtmlImageElement,
	female: HtmlImageElement,
	width: f64,
	height: f64,
}

impl Icons {
	pub fn load(config: &IconConfig) -> Result<Self, JsValue> {
		let male = HtmlImageElement::new()?;
		male.set_src(&config.male);
		let female = HtmlImageElement::new()?;
		female.set_src(&config.female);
		Ok(Self {
			male,
			female,
			width: config.width,
			height: config.height,
		})
	}

	fn for_gender(&self, gender: Gender) -> &HtmlImageElement {
		match gender {
			Gender::Male => &self.male,
			Gender::Female => &self.female,
		}
	}
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d, icons: Option<&Icons>) {
	let frame = state.frame();
	let t = ease_out_cubic(state.hover.highlight_t);

	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.config.width, state.config.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(&frame, ctx, t);
	draw_nodes(&frame, ctx, t, state.config.node_radius, icons);
	ctx.restore();
	draw_legend(state, ctx);
}

fn link_style(link: &LinkFrame, t: f64) -> (String, f64) {
	if link.selected {
		let r = (214.0 * t) as u8;
		(format!("rgb({}, {}, {})", r, (39.0 * t) as u8, (40.0 * t) as u8), 1.0 + 1.5 * t)
	} else {
		(format!("rgba(0, 0, 0, {})", 1.0 - 0.75 * t), 1.0)
	}
}

fn draw_links(frame: &Frame, ctx: &CanvasRenderingContext2d, t: f64) {
	for link in &frame.links {
		let Some(arc) = &link.arc else {
			continue;
		};
		let Ok(path) = Path2d::new_with_path_string(&arc.to_path_data()) else {
			continue;
		};
		let (color, width) = link_style(link, t);
		ctx.set_stroke_style_str(&color);
		ctx.set_line_width(width);
		let dash = if link.kind.is_empty() {
			js_sys::Array::new()
		} else {
			js_sys::Array::of2(&JsValue::from_f64(4.0), &JsValue::from_f64(2.0))
		};
		let _ = ctx.set_line_dash(&dash);
		ctx.stroke_with_path(&path);

		// The marker arc itself is not stroked, only its arrowhead.
		if let Some(marker) = &link.marker {
			let [tip, left, right] = geometry::arrowhead(
				marker.end,
				marker.end_tangent(),
				ARROW_LENGTH,
				ARROW_HALF_WIDTH,
			);
			ctx.set_fill_style_str(&color);
			ctx.begin_path();
			ctx.move_to(tip.0, tip.1);
			ctx.line_to(left.0, left.1);
			ctx.line_to(right.0, right.1);
			ctx.close_path();
			ctx.fill();
		}
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(
	frame: &Frame,
	ctx: &CanvasRenderingContext2d,
	t: f64,
	radius: f64,
	icons: Option<&Icons>,
) {
	let has_highlight = frame.nodes.iter().any(|n| n.selected);

	for node in &frame.nodes {
		let alpha = if has_highlight && !node.selected {
			1.0 - 0.5 * t
		} else {
			1.0
		};
		ctx.set_global_alpha(alpha);
		if node.selected && t > 0.01 {
			draw_glow(node, ctx, t, radius);
		}

		let (x, y) = node.center;
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.fill);
		ctx.fill();

		if node.selected && t > 0.01 {
			ctx.set_stroke_style_str(&format!("rgba(0, 0, 0, {})", 0.8 * t));
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if let Some(icons) = icons {
			let image = icons.for_gender(node.gender);
			if image.complete() {
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					image,
					node.icon.0,
					node.icon.1,
					icons.width,
					icons.height,
				);
			}
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_glow(node: &NodeFrame, ctx: &CanvasRenderingContext2d, t: f64, radius: f64) {
	let (x, y) = node.center;
	let glow_radius = radius * (1.4 + 0.8 * t);
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, glow_radius) else {
		return;
	};
	let stops = [
		(0.0, format!("rgba(214, 39, 40, {})", 0.35 * t)),
		(0.6, format!("rgba(214, 39, 40, {})", 0.1 * t)),
		(1.0, "rgba(214, 39, 40, 0)".to_string()),
	];
	for (offset, color) in &stops {
		if gradient.add_color_stop(*offset, color).is_err() {
			return;
		}
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_legend(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font("10px Helvetica, sans-serif");
	ctx.set_text_align("start");
	for (top, entry) in state.legend().rows() {
		ctx.set_fill_style_str(entry.color);
		ctx.fill_rect(LEGEND_X, top, SWATCH_SIZE, SWATCH_SIZE);
		ctx.set_fill_style_str("#000000");
		let _ = ctx.fill_text(&entry.label, LABEL_X, top + LABEL_BASELINE);
	}
}
