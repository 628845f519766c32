use eframe::egui::{self, Align2, Color32, FontId, PointerButton, Sense, Stroke, Ui, vec2};

use crate::query::{OVERSIZE_NODE_LIMIT, SubgraphStatus};

use super::super::highlight::Focus;
use super::super::layout::SimulationParams;
use super::super::render_utils::{
    DirectiveContext, EDGE_COLOR, draw_background, edge_directive, edge_visible, kind_radius,
    node_directive, screen_radius, screen_to_world, with_opacity, world_to_screen,
};
use super::super::{RenderGraph, ViewModel};
use super::CameraTarget;

enum CanvasAction {
    NodeClicked(usize),
    BackgroundClicked,
}

fn draw_notice(ui: &mut Ui, heading: &str, detail: &str, busy: bool) {
    ui.vertical_centered(|ui| {
        ui.add_space(120.0);
        ui.heading(heading);
        ui.add_space(6.0);
        ui.label(detail);
        if busy {
            ui.add_space(8.0);
            ui.spinner();
        }
    });
}

impl ViewModel {
    fn update_screen_space(&self, rect: egui::Rect, cache: &mut RenderGraph) {
        let scratch = &mut cache.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_radii.clear();
        for &node in &cache.nodes {
            let world = self.layout.position(node);
            scratch
                .screen_positions
                .push(world_to_screen(rect, self.pan, self.zoom, world));
            let kind = self.graph.nodes()[node].kind;
            scratch
                .screen_radii
                .push(screen_radius(kind_radius(kind), self.zoom));
        }

        Self::visible_indices_into(
            rect,
            &scratch.screen_positions,
            &scratch.screen_radii,
            &mut scratch.visible_indices,
        );
        scratch.visible_mask.clear();
        scratch.visible_mask.resize(cache.nodes.len(), false);
        for &local in &scratch.visible_indices {
            scratch.visible_mask[local] = true;
        }
    }

    fn sync_hover(&mut self, hovered: Option<usize>) {
        if self.layout.dragging().is_some() {
            return;
        }
        match hovered {
            Some(node) if self.focus.focus() != Focus::Hovered(node) => {
                self.focus.pointer_enter(&self.graph, node);
            }
            None => self.focus.pointer_leave(),
            Some(_) => {}
        }
    }

    fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: egui::Rect,
        response: &egui::Response,
        hovered: Option<usize>,
    ) {
        if response.drag_started_by(PointerButton::Primary)
            && let Some(node) = hovered
        {
            self.layout.begin_drag(node);
        }

        let Some(node) = self.layout.dragging() else {
            return;
        };
        if response.dragged_by(PointerButton::Primary)
            && let Some(pointer) = ui.input(|input| input.pointer.interact_pos())
        {
            let world = screen_to_world(rect, self.pan, self.zoom, pointer);
            self.layout.drag_to(node, world);
        }
        if response.drag_stopped() {
            self.layout.end_drag(node);
        }
    }

    fn apply_canvas_action(&mut self, action: CanvasAction, now: f64) {
        match action {
            CanvasAction::NodeClicked(node) => {
                self.focus.click_node(&self.graph, node);
                if self.focus.selected() == Some(node) {
                    self.sidebar_node = Some(node);
                    self.animate_camera(CameraTarget::focus_on(self.layout.position(node)), now);
                } else {
                    self.sidebar_node = None;
                    self.animate_camera(CameraTarget::home(), now);
                }
            }
            CanvasAction::BackgroundClicked => {
                let had_selection = self.focus.selected().is_some();
                self.focus.click_background();
                if had_selection {
                    self.sidebar_node = None;
                    self.animate_camera(CameraTarget::home(), now);
                }
            }
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, now: f64) {
        if self.resolve_timer.is_pending() {
            draw_notice(ui, "Updating network...", "Applying the current criteria.", true);
            return;
        }
        match self.subgraph.status() {
            SubgraphStatus::Oversize => {
                draw_notice(
                    ui,
                    "Network too large",
                    &format!(
                        "{} nodes match; add criteria to bring it under {OVERSIZE_NODE_LIMIT}.",
                        self.subgraph.node_count()
                    ),
                    false,
                );
                return;
            }
            SubgraphStatus::Empty => {
                draw_notice(
                    ui,
                    "No matching nodes",
                    "Nobody satisfies the current criteria. Try removing one or switching to OR.",
                    false,
                );
                return;
            }
            SubgraphStatus::Normal => {}
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_size = rect.size();
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let Some(mut cache) = self.graph_cache.take() else {
            return;
        };

        let delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let params = SimulationParams::for_view(self.is_filtered(), rect.size(), delta_seconds);
        let moving = self.layout.tick(now, &cache.nodes, &cache.links, params);

        self.update_screen_space(rect, &mut cache);
        let hovered = Self::hovered_index(
            ui,
            &cache.view_scratch.visible_indices,
            &cache.view_scratch.screen_positions,
            &cache.view_scratch.screen_radii,
        )
        .map(|local| cache.nodes[local]);

        self.handle_node_drag(ui, rect, &response, hovered);
        self.update_screen_space(rect, &mut cache);
        self.sync_hover(hovered);

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let action = if response.clicked_by(PointerButton::Primary) {
            Some(match hovered {
                Some(node) => CanvasAction::NodeClicked(node),
                None => CanvasAction::BackgroundClicked,
            })
        } else {
            None
        };

        self.paint(&painter, rect, &cache);
        self.graph_cache = Some(cache);

        if let Some(action) = action {
            self.apply_canvas_action(action, now);
        }
        if moving || self.layout.dragging().is_some() {
            ui.ctx().request_repaint();
        }
    }

    fn paint(&self, painter: &egui::Painter, rect: egui::Rect, cache: &RenderGraph) {
        let context = DirectiveContext {
            focus: &self.focus,
            zoom: self.zoom,
            filtered: self.is_filtered(),
        };
        let scratch = &cache.view_scratch;
        let edge_width = (1.2 * self.zoom.sqrt()).clamp(0.5, 3.0);

        for edge in &cache.edges {
            let record = &self.graph.edges()[edge.edge_index];
            let directive = edge_directive(
                context,
                record,
                self.layout.position(record.source),
                self.layout.position(record.target),
            );
            let start = world_to_screen(rect, self.pan, self.zoom, directive.from);
            let end = world_to_screen(rect, self.pan, self.zoom, directive.to);
            if !scratch.visible_mask[edge.from]
                && !scratch.visible_mask[edge.to]
                && !edge_visible(rect, start, end, 2.5)
            {
                continue;
            }
            painter.line_segment(
                [start, end],
                Stroke::new(edge_width, with_opacity(EDGE_COLOR, directive.opacity)),
            );
        }

        // Highlighted nodes are painted last so they sit on top.
        let (dimmed, lit): (Vec<usize>, Vec<usize>) = scratch
            .visible_indices
            .iter()
            .copied()
            .partition(|&local| !self.focus.is_highlighted(cache.nodes[local]));

        for local in dimmed.into_iter().chain(lit) {
            let index = cache.nodes[local];
            let node = &self.graph.nodes()[index];
            let directive = node_directive(context, index, node, self.layout.position(index));
            let position = world_to_screen(rect, self.pan, self.zoom, directive.position);
            let radius = screen_radius(directive.radius, self.zoom);

            painter.circle_filled(position, radius, with_opacity(directive.fill, directive.opacity));
            if self.focus.selected() == Some(directive.index) {
                painter.circle_stroke(position, radius + 3.0, Stroke::new(2.0, Color32::WHITE));
            } else {
                painter.circle_stroke(
                    position,
                    radius,
                    Stroke::new(
                        1.0,
                        with_opacity(Color32::from_rgb(15, 15, 15), directive.opacity * 0.75),
                    ),
                );
            }

            if let Some(label) = directive.label {
                painter.text(
                    position + vec2(radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    label,
                    FontId::proportional(12.0),
                    with_opacity(Color32::from_gray(238), directive.opacity),
                );
            }
        }
    }
}
