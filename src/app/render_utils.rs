use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use super::highlight::FocusState;
use crate::network::{EdgeRecord, NodeKind, NodeRecord};

pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(0xF5, 0xA5, 0xA9);
const BASE_NODE_RADIUS: f32 = 6.0;
const DIMMED_NODE_OPACITY: f32 = 0.1;
const DIMMED_EDGE_OPACITY: f32 = 0.08;
const RESTING_EDGE_OPACITY: f32 = 0.8;

pub(super) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Musician => Color32::from_rgb(0x3a, 0x86, 0xff),
        NodeKind::School => Color32::from_rgb(0x4e, 0xcd, 0xc4),
        NodeKind::Orchestra => Color32::from_rgb(0xff, 0x6b, 0x6b),
    }
}

pub(super) fn kind_radius(kind: NodeKind) -> f32 {
    BASE_NODE_RADIUS
        * match kind {
            NodeKind::Orchestra => 1.75,
            NodeKind::School => 1.35,
            NodeKind::Musician => 1.0,
        }
}

pub(super) fn node_opacity(focus: &FocusState, index: usize) -> f32 {
    if focus.focused_node().is_none() || focus.is_highlighted(index) {
        1.0
    } else {
        DIMMED_NODE_OPACITY
    }
}

pub(super) fn edge_opacity(focus: &FocusState, edge: &EdgeRecord) -> f32 {
    match focus.focused_node() {
        None => RESTING_EDGE_OPACITY,
        Some(focused) if edge.touches(focused) => 1.0,
        Some(_) => DIMMED_EDGE_OPACITY,
    }
}

pub(super) fn shows_label(focus: &FocusState, index: usize, zoom: f32, filtered: bool) -> bool {
    zoom > 2.0 || (filtered && zoom > 1.5) || focus.is_highlighted(index)
}

/// On-screen radius of a node with world radius `radius`.
pub(super) fn screen_radius(radius: f32, zoom: f32) -> f32 {
    (radius * zoom).clamp(1.5, 60.0)
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)) as u8)
}

/// How one node is painted this frame. Positions are in world space.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct NodeDirective {
    pub index: usize,
    pub position: Vec2,
    pub radius: f32,
    pub fill: Color32,
    pub opacity: f32,
    pub label: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct EdgeDirective {
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

#[derive(Clone, Copy)]
pub(super) struct DirectiveContext<'a> {
    pub focus: &'a FocusState,
    pub zoom: f32,
    pub filtered: bool,
}

pub(super) fn node_directive(
    context: DirectiveContext<'_>,
    index: usize,
    node: &NodeRecord,
    position: Vec2,
) -> NodeDirective {
    NodeDirective {
        index,
        position,
        radius: kind_radius(node.kind),
        fill: kind_color(node.kind),
        opacity: node_opacity(context.focus, index),
        label: shows_label(context.focus, index, context.zoom, context.filtered)
            .then(|| node.label.clone()),
    }
}

pub(super) fn edge_directive(
    context: DirectiveContext<'_>,
    edge: &EdgeRecord,
    from: Vec2,
    to: Vec2,
) -> EdgeDirective {
    EdgeDirective {
        from,
        to,
        opacity: edge_opacity(context.focus, edge),
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}
