use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use tracing::{debug, info};

use crate::network::{NetworkGraph, NodeKind};
use crate::query::{PredicateKind, PredicateSet, SubgraphStatus, pivot_predicates, resolve_subgraph};
use crate::search::SearchIndex;
use crate::timer::DeferredTimer;

use super::super::graph::CameraTarget;
use super::super::highlight::FocusState;
use super::super::layout::LayoutDriver;
use super::super::physics::BarnesHutSimulation;
use super::super::{SidebarTab, ViewModel};

impl ViewModel {
    pub(in crate::app) const DEBOUNCE_SECS: f64 = 0.1;
    pub(in crate::app) const DEFAULTS_DELAY_SECS: f64 = 0.5;

    pub(in crate::app) fn new(graph: NetworkGraph, now: f64) -> Self {
        let predicates = PredicateSet::default();
        let subgraph = resolve_subgraph(&graph, &predicates);
        let mut layout = LayoutDriver::new(&graph, Box::new(BarnesHutSimulation::default()));
        layout.on_predicate_set_changed(now);
        let mut defaults_timer = DeferredTimer::default();
        defaults_timer.schedule(now, Self::DEFAULTS_DELAY_SECS);

        let mut model = Self {
            search_index: SearchIndex::new(&graph),
            graph,
            resolved_revision: predicates.revision(),
            predicates,
            subgraph,
            resolve_timer: DeferredTimer::default(),
            defaults_timer,
            focus: FocusState::default(),
            sidebar_node: None,
            layout,
            pan: Vec2::ZERO,
            zoom: 1.0,
            transition: None,
            canvas_size: Vec2::new(1000.0, 800.0),
            tab: SidebarTab::Query,
            query_kind: PredicateKind::Instrument,
            query_text: String::new(),
            search_text: String::new(),
            search_timer: DeferredTimer::default(),
            search_results: Vec::new(),
            pivot_candidate: None,
            graph_cache: None,
        };
        model.rebuild_render_graph();
        model
    }

    pub(in crate::app) fn is_filtered(&self) -> bool {
        !self.predicates.is_empty()
    }

    /// Call after any mutation of `predicates`. Resolution itself waits for
    /// the debounce window.
    pub(in crate::app) fn predicates_changed(&mut self, now: f64, removed: bool) {
        info!(
            predicates = self.predicates.len(),
            combinator = self.predicates.combinator().label(),
            "predicate set changed"
        );
        self.focus.clear();
        self.sidebar_node = None;
        self.pivot_candidate = None;
        self.resolve_timer.schedule(now, Self::DEBOUNCE_SECS);
        if removed {
            self.animate_camera(CameraTarget::home(), now);
        }
    }

    fn resolve_now(&mut self, now: f64) {
        self.subgraph = resolve_subgraph(&self.graph, &self.predicates);
        self.resolved_revision = self.predicates.revision();
        info!(
            nodes = self.subgraph.node_count(),
            edges = self.subgraph.edge_count(),
            status = ?self.subgraph.status(),
            "network resolved"
        );
        self.rebuild_render_graph();
        self.layout.on_predicate_set_changed(now);
    }

    fn pump_timers(&mut self, now: f64) {
        if self.defaults_timer.poll(now) {
            // Criteria the user already edited are left alone.
            if self.predicates.revision() == 0 {
                self.predicates = PredicateSet::with_defaults();
                self.predicates_changed(now, false);
            } else {
                debug!("criteria already edited; defaults skipped");
            }
        }
        if self.resolve_timer.poll(now) && self.predicates.revision() != self.resolved_revision {
            self.resolve_now(now);
        }
        if self.search_timer.poll(now) {
            self.search_results = self.search_index.search(&self.search_text);
        }
    }

    fn next_deadline(&self, now: f64) -> Option<f64> {
        [
            self.defaults_timer.remaining(now),
            self.resolve_timer.remaining(now),
            self.search_timer.remaining(now),
        ]
        .into_iter()
        .flatten()
        .reduce(f64::min)
    }

    /// Selection from a search result or a sidebar link.
    pub(in crate::app) fn focus_node(&mut self, index: usize, now: f64) {
        if self.subgraph.status() != SubgraphStatus::Normal || !self.subgraph.contains(index) {
            self.pivot_candidate = Some(index);
            return;
        }
        self.focus.select(&self.graph, index);
        self.sidebar_node = Some(index);
        self.frame_neighborhood(index, now);
    }

    /// Replaces the predicates with the ones that rebuild the network around
    /// `index` and shows it in the sidebar. Musicians also become the
    /// selected node.
    pub(in crate::app) fn pivot_to(&mut self, index: usize, now: f64) {
        let criteria = pivot_predicates(&self.graph, index);
        if criteria.is_empty() {
            return;
        }
        info!(node = index, predicates = criteria.len(), "generating network around node");
        self.predicates.replace_all(criteria);
        self.predicates_changed(now, false);
        self.sidebar_node = Some(index);

        if self
            .graph
            .node(index)
            .is_some_and(|node| node.kind == NodeKind::Musician)
        {
            self.focus.select(&self.graph, index);
        }
    }

    fn draw_pivot_popup(&mut self, ctx: &Context, now: f64) {
        let Some(index) = self.pivot_candidate else {
            return;
        };
        let Some(node) = self.graph.node(index) else {
            self.pivot_candidate = None;
            return;
        };
        let label = node.label.clone();

        let mut open = true;
        let mut generate = false;
        egui::Window::new("Not in the current network")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("{label} is filtered out by the active criteria."));
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Generate network").clicked() {
                        generate = true;
                    }
                    if ui.button("Cancel").clicked() {
                        self.pivot_candidate = None;
                    }
                });
            });

        if generate {
            self.pivot_candidate = None;
            self.pivot_to(index, now);
        } else if !open {
            self.pivot_candidate = None;
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let now = ctx.input(|input| input.time);
        self.pump_timers(now);
        let camera_moving = self.advance_camera(now);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Ensemble Explorer");
                    ui.separator();
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "showing {} nodes, {} edges",
                            self.subgraph.node_count(),
                            self.subgraph.edge_count()
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui, now));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui, now));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui, now));

        self.draw_pivot_popup(ctx, now);

        if camera_moving || (self.layout.is_active() && self.graph_cache.is_some()) {
            ctx.request_repaint();
        } else if let Some(remaining) = self.next_deadline(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(remaining));
        }
    }
}
