//! Canvas rendering for the force graph.
//!
//! Draws one frame from the controller's snapshots. Rendering uses three
//! passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links (world space)
//! 3. Nodes, then labels of focused nodes on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::interaction::InteractionController;
use super::scale::ScaledValues;
use super::snapshot::{LinkSnapshot, NodeSnapshot};
use super::theme::Theme;

/// Renders the complete graph to the canvas.
pub fn render(controller: &InteractionController, ctx: &CanvasRenderingContext2d) {
	let theme = controller.theme();
	let (width, height) = controller.options().viewport();
	let transform = controller.transform();
	let scale = controller.scaled_values();

	draw_background(ctx, theme, width, height);

	ctx.save();
	let _ = ctx.translate(transform.translate_x, transform.translate_y);
	let _ = ctx.scale(transform.scale, transform.scale);

	draw_links(ctx, theme, &controller.links_snapshot());
	let nodes = controller.nodes_snapshot();
	draw_nodes(ctx, &nodes);
	draw_labels(ctx, theme, &scale, &nodes);

	ctx.restore();
	ctx.set_global_alpha(1.0);
}

fn draw_background(ctx: &CanvasRenderingContext2d, theme: &Theme, width: f64, height: f64) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_links(ctx: &CanvasRenderingContext2d, theme: &Theme, links: &[LinkSnapshot]) {
	ctx.set_stroke_style_str(&theme.edge.to_css());
	for link in links {
		ctx.set_global_alpha(link.opacity);
		ctx.set_line_width(link.stroke_width);
		ctx.begin_path();
		ctx.move_to(link.source_x, link.source_y);
		ctx.line_to(link.target_x, link.target_y);
		ctx.stroke();
	}
}

fn draw_nodes(ctx: &CanvasRenderingContext2d, nodes: &[NodeSnapshot<'_>]) {
	// Focused node last so it sits above its neighbours.
	for node in nodes.iter().filter(|n| !n.is_focused).chain(nodes.iter().filter(|n| n.is_focused)) {
		ctx.set_global_alpha(node.opacity);
		ctx.set_fill_style_str(&node.color.to_css());
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_labels(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	scale: &ScaledValues,
	nodes: &[NodeSnapshot<'_>],
) {
	ctx.set_global_alpha(1.0);
	ctx.set_font(&scale.label_font);
	ctx.set_fill_style_str(&theme.label.to_css());
	for node in nodes.iter().filter(|n| n.label_visible) {
		let _ = ctx.fill_text(
			node.label,
			node.x + node.radius + 4.0 * scale.inverse,
			node.y + 3.0 * scale.inverse,
		);
	}
}
