//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and forwards mouse and wheel
//! events to an [`InteractionController`]. An animation loop runs via
//! `requestAnimationFrame`, advancing the controller and redrawing each frame.
//! Zoom buttons and a search box sit in an overlay above the canvas.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::config::GraphOptions;
use super::interaction::InteractionController;
use super::render;
use super::theme::Theme;
use super::types::GraphData;

type Shared = Rc<RefCell<Option<InteractionController>>>;

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn now() -> f64 {
	js_sys::Date::now()
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. A viewport configured
/// in `options` overrides automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] options: GraphOptions,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let controller: Shared = Rc::new(RefCell::new(None));
	let hovered: Rc<Cell<Option<usize>>> = Rc::new(Cell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let load_error = RwSignal::new(None::<String>);
	let search = RwSignal::new(String::new());

	let (controller_init, animate_init, resize_cb_init) =
		(controller.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let measured = if fullscreen {
			viewport_size(&window)
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
		};
		let options = match measured {
			Some((w, h)) if w > 0.0 && h > 0.0 => options.clone().with_viewport(w, h),
			_ => options.clone(),
		};
		let (w, h) = options.viewport();
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("canvas 2d context unavailable");
				return;
			}
		};

		match InteractionController::new(&data.get(), options) {
			Ok(c) => {
				*controller_init.borrow_mut() = Some(c.with_theme(theme.clone().unwrap_or_default()));
				load_error.set(None);
			}
			Err(e) => {
				warn!("failed to load graph: {e}");
				load_error.set(Some(e.to_string()));
				*controller_init.borrow_mut() = None;
				return;
			}
		}

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (controller_resize, canvas_resize) = (controller_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *controller_resize.borrow_mut() {
					c.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// Listeners and the frame loop outlive data changes; only the controller is swapped.
		if animate_init.borrow().is_some() {
			return;
		}
		let (controller_anim, animate_inner) = (controller_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *controller_anim.borrow_mut() {
				c.frame(now());
				render::render(c, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let controller_md = controller.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *controller_md.borrow_mut() {
			match c.node_at(x, y) {
				Some(idx) => c.on_drag_start(idx, x, y),
				None => c.on_pan_start(x, y),
			}
		}
	};

	let (controller_mm, hovered_mm) = (controller.clone(), hovered.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *controller_mm.borrow_mut() {
			if c.is_dragging() {
				c.on_drag_move(x, y);
			} else if c.is_panning() {
				c.on_pan_move(x, y);
			} else {
				let hit = c.node_at(x, y);
				match (hovered_mm.get(), hit) {
					(prev, Some(idx)) if prev != Some(idx) => c.on_pointer_enter(idx),
					(Some(_), None) => c.on_pointer_leave(),
					_ => {}
				}
				hovered_mm.set(hit);
			}
		}
	};

	let controller_mu = controller.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *controller_mu.borrow_mut() {
			c.on_drag_end();
			c.on_pan_end();
		}
	};

	let (controller_ml, hovered_ml) = (controller.clone(), hovered.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *controller_ml.borrow_mut() {
			c.cancel_gestures();
		}
		hovered_ml.set(None);
	};

	let controller_dc = controller.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *controller_dc.borrow_mut() {
			if let Some(idx) = c.node_at(x, y) {
				c.on_double_click(idx);
			}
		}
	};

	let controller_wh = controller.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *controller_wh.borrow_mut() {
			c.on_wheel(x, y, ev.delta_y());
		}
	};

	let controller_zi = controller.clone();
	let zoom_in = move |_: MouseEvent| {
		if let Some(ref mut c) = *controller_zi.borrow_mut() {
			c.zoom_in(now());
		}
	};
	let controller_zo = controller.clone();
	let zoom_out = move |_: MouseEvent| {
		if let Some(ref mut c) = *controller_zo.borrow_mut() {
			c.zoom_out(now());
		}
	};
	let controller_zr = controller.clone();
	let zoom_reset = move |_: MouseEvent| {
		if let Some(ref mut c) = *controller_zr.borrow_mut() {
			c.zoom_reset(now());
		}
	};

	let controller_search = controller.clone();
	let submit_search = Rc::new(move || {
		let query = search.get_untracked();
		if query.trim().is_empty() {
			return;
		}
		let found = match *controller_search.borrow_mut() {
			Some(ref mut c) => c.focus_by_id(&query),
			None => return,
		};
		if !found {
			if let Some(win) = web_sys::window() {
				let _ = win.alert_with_message(&format!("Node {} not found", query.trim()));
			}
		}
	});
	let (submit_key, submit_click) = (submit_search.clone(), submit_search);
	let on_search_key = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			submit_key();
		}
	};
	let on_search_click = move |_: MouseEvent| submit_click();

	let controller_clear = controller.clone();
	let on_search_clear = move |_: MouseEvent| {
		search.set(String::new());
		if let Some(ref mut c) = *controller_clear.borrow_mut() {
			c.clear_focus();
		}
	};

	view! {
		<div class="force-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:dblclick=on_dblclick
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-search" style="position: absolute; top: 10px; left: 10px;">
				<input
					type="text"
					placeholder="Node id"
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
					on:keydown=on_search_key
				/>
				<button on:click=on_search_click>"Focus"</button>
				<button on:click=on_search_clear>"Clear"</button>
			</div>
			<div class="graph-zoom" style="position: absolute; top: 10px; right: 10px;">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"-"</button>
				<button title="Reset zoom" on:click=zoom_reset>"⟲"</button>
			</div>
			{move || {
				load_error
					.get()
					.map(|msg| view! { <p class="graph-error">{format!("Could not load graph: {msg}")}</p> })
			}}
		</div>
	}
}
