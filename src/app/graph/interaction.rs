use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::ViewModel;
use super::super::render_utils::{circle_visible, screen_to_world};

pub(in crate::app) const MIN_ZOOM: f32 = 0.05;
pub(in crate::app) const MAX_ZOOM: f32 = 6.0;
const FOCUS_ZOOM: f32 = 2.5;
const HOME_ZOOM: f32 = 1.5;
const FRAME_PADDING: f32 = 50.0;
const FRAME_ZOOM_FACTOR: f32 = 1.2;
const TRANSITION_SECS: f64 = 1.0;

/// Where the camera should end up: a world point at the canvas centre and a
/// zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct CameraTarget {
    pub center: Vec2,
    pub zoom: f32,
}

impl CameraTarget {
    pub(in crate::app) fn focus_on(position: Vec2) -> Self {
        Self {
            center: position,
            zoom: FOCUS_ZOOM,
        }
    }

    pub(in crate::app) fn home() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: HOME_ZOOM,
        }
    }

    /// Fits `points` plus padding into a canvas of `canvas_size`.
    pub(in crate::app) fn frame_bounds(points: &[Vec2], canvas_size: Vec2) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((first, first), |(min, max), point| (min.min(*point), max.max(*point)));

        let width = (max.x - min.x) + FRAME_PADDING * 2.0;
        let height = (max.y - min.y) + FRAME_PADDING * 2.0;
        let zoom = (canvas_size.x / width).min(canvas_size.y / height) * FRAME_ZOOM_FACTOR;

        Some(Self {
            center: (min + max) * 0.5,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        })
    }

    pub(in crate::app) fn pan(self) -> Vec2 {
        -self.center * self.zoom
    }
}

/// Eased camera move between two (pan, zoom) pairs.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ViewTransition {
    from_pan: Vec2,
    from_zoom: f32,
    to_pan: Vec2,
    to_zoom: f32,
    started_at: f64,
}

impl ViewTransition {
    pub(in crate::app) fn new(pan: Vec2, zoom: f32, target: CameraTarget, now: f64) -> Self {
        Self {
            from_pan: pan,
            from_zoom: zoom,
            to_pan: target.pan(),
            to_zoom: target.zoom,
            started_at: now,
        }
    }

    /// Camera state at `now` and whether the move has finished.
    pub(in crate::app) fn sample(&self, now: f64) -> (Vec2, f32, bool) {
        let t = ((now - self.started_at) / TRANSITION_SECS).clamp(0.0, 1.0) as f32;
        let eased = t * t * (3.0 - 2.0 * t);
        let pan = self.from_pan + (self.to_pan - self.from_pan) * eased;
        let zoom = self.from_zoom + (self.to_zoom - self.from_zoom) * eased;
        (pan, zoom, t >= 1.0)
    }
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        self.transition = None;
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.transition = None;
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn animate_camera(&mut self, target: CameraTarget, now: f64) {
        self.transition = Some(ViewTransition::new(self.pan, self.zoom, target, now));
    }

    /// Applies the running camera move. Returns whether it is still running.
    pub(in crate::app) fn advance_camera(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let (pan, zoom, done) = transition.sample(now);
        self.pan = pan;
        self.zoom = zoom;
        if done {
            self.transition = None;
        }
        !done
    }

    /// Frames `index` and its neighbours inside the current subgraph.
    pub(in crate::app) fn frame_neighborhood(&mut self, index: usize, now: f64) {
        let points = std::iter::once(index)
            .chain(
                self.graph
                    .neighbors(index)
                    .iter()
                    .copied()
                    .filter(|&neighbor| self.subgraph.contains(neighbor)),
            )
            .map(|node| self.layout.position(node))
            .collect::<Vec<_>>();
        if let Some(target) = CameraTarget::frame_bounds(&points, self.canvas_size) {
            self.animate_camera(target, now);
        }
    }

    pub(in crate::app) fn visible_indices_into(
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
        visible: &mut Vec<usize>,
    ) {
        visible.clear();
        visible.extend(
            (0..screen_positions.len())
                .filter(|&index| circle_visible(rect, screen_positions[index], screen_radii[index])),
        );
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        visible_indices: &[usize],
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        visible_indices
            .iter()
            .filter_map(|&index| {
                let distance = screen_positions[index].distance(pointer);
                // 3px of pointer slack.
                (distance <= screen_radii[index] + 3.0).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
