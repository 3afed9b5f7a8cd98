use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::GraphConfig;
use super::geometry::Point;
use super::render::{self, Icons};
use super::scale::LegendMode;
use super::state::{GraphState, Tooltip};
use super::types::Dataset;

const FRAME_SECONDS: f64 = 0.016;

/// Map a mouse event onto the logical canvas, undoing the CSS scaling.
fn pointer_position(
	canvas: Option<HtmlCanvasElement>,
	ev: &MouseEvent,
	width: f64,
	height: f64,
) -> Option<Point> {
	let rect = canvas?.get_bounding_client_rect();
	if rect.width() <= 0.0 || rect.height() <= 0.0 {
		return None;
	}
	Some((
		(ev.client_x() as f64 - rect.left()) * width / rect.width(),
		(ev.client_y() as f64 - rect.top()) * height / rect.height(),
	))
}

fn set_cursor(canvas: Option<HtmlCanvasElement>, cursor: &str) {
	if let Some(canvas) = canvas {
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Cleared when the component unmounts; the animation loop stops scheduling
/// frames once it sees that.
#[derive(Clone, Debug, Default)]
struct LoopGuard(Arc<AtomicBool>);

impl LoopGuard {
	fn stop(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	fn running(&self) -> bool {
		!self.0.load(Ordering::Relaxed)
	}
}

/// Force-directed infection chain drawn on a canvas, with a legend-mode
/// radio group and a hover tooltip.
#[component]
pub fn InfectionGraph(
	/// Cases and links to lay out.
	dataset: Dataset,
	/// Canvas size, forces, zoom and icons; defaults when omitted.
	#[prop(optional)]
	config: Option<GraphConfig>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let (width, height) = (config.width, config.height);
	let (canvas_w, canvas_h) = (width as u32, height as u32);
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let mode = RwSignal::new(config.initial_mode);
	let tooltip = RwSignal::new(None::<Tooltip>);
	let guard = LoopGuard::default();
	let (state_init, animate_init, guard_init) = (state.clone(), animate.clone(), guard.clone());
	let mut pending = Some((dataset, config));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some((data, config)) = pending.take() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			error!("no window to animate in");
			return;
		};
		canvas.set_width(config.width as u32);
		canvas.set_height(config.height as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("canvas has no 2d context");
				return;
			}
		};
		let icons = Icons::load(&config.icons)
			.inspect_err(|e| warn!("gender icons unavailable: {e:?}"))
			.ok();
		debug!(
			"building graph for {} cases and {} links",
			data.cases.len(),
			data.links.len()
		);
		*state_init.borrow_mut() = Some(GraphState::new(data, config));

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let guard = guard_init.clone();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !guard.running() {
				debug!("animation loop stopped");
				state_anim.borrow_mut().take();
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(FRAME_SECONDS);
				render::render(s, &ctx, icons.as_ref());
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	on_cleanup(move || guard.stop());

	let state_mode = state.clone();
	Effect::new(move |_| {
		let selected = mode.get();
		if let Some(ref mut s) = *state_mode.borrow_mut() {
			if s.mode() != selected {
				s.select_mode(selected);
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(p) = pointer_position(canvas_ref.get(), &ev, width, height) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			match s.node_at(p) {
				Some(case) => s.drag_start(case, p),
				None => s.pan_start(p),
			}
			set_cursor(canvas_ref.get(), s.cursor());
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(p) = pointer_position(canvas_ref.get(), &ev, width, height) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active() {
				s.drag_to_pointer(p);
			} else if s.pan.active {
				s.pan_move(p);
			} else if s.hover_at(p) {
				tooltip.set(s.tooltip(ev.page_x() as f64, ev.page_y() as f64));
				set_cursor(canvas_ref.get(), s.cursor());
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.drag_end();
			s.pan_end();
			set_cursor(canvas_ref.get(), s.cursor());
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.release_all();
			set_cursor(canvas_ref.get(), s.cursor());
		}
		tooltip.set(None);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(p) = pointer_position(canvas_ref.get(), &ev, width, height) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(p, ev.delta_y());
		}
	};

	view! {
		<div class="infection-graph">
			<div class="legend-modes">
				{LegendMode::ALL
					.into_iter()
					.map(|m| {
						view! {
							<label>
								<input
									type="radio"
									name="radio"
									id=m.input_id()
									value=m.input_value()
									prop:checked=move || mode.get() == m
									on:change=move |ev| {
										mode.set(LegendMode::from_input_value(&event_target_value(&ev)))
									}
								/>
								{m.label()}
							</label>
						}
					})
					.collect_view()}
			</div>
			<canvas
				node_ref=canvas_ref
				class="infection-graph-canvas"
				width=canvas_w
				height=canvas_h
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; width: 100%; height: auto; cursor: grab;"
			/>
			<div
				class="tooltip"
				style:left=move || {
					tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.x)).unwrap_or_default())
				}
				style:top=move || {
					tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.y)).unwrap_or_default())
				}
				style:visibility=move || {
					if tooltip.with(Option::is_some) { "visible" } else { "hidden" }
				}
			>
				{move || {
					tooltip
						.get()
						.map(|t| {
							t.lines.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()
						})
				}}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stopping_any_clone_stops_the_loop() {
		let guard = LoopGuard::default();
		let in_frame = guard.clone();
		assert!(in_frame.running());
		guard.stop();
		assert!(!in_frame.running());
	}
}
