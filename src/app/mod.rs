use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};
use tracing::{error, info};

use crate::network::{NetworkGraph, load_network};
use crate::query::{PredicateKind, PredicateSet, Subgraph};
use crate::search::SearchIndex;
use crate::timer::DeferredTimer;

mod graph;
mod highlight;
mod layout;
mod physics;
mod render_utils;
mod ui;

use graph::ViewTransition;
use highlight::FocusState;
use layout::LayoutDriver;

pub struct NetworkExplorerApp {
    data_path: PathBuf,
    state: AppState,
}

enum AppState {
    /// `rx` is dropped once the loader reports a failure; the loading screen
    /// then stays up.
    Loading {
        rx: Option<Receiver<Result<NetworkGraph, String>>>,
    },
    Ready(Box<ViewModel>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SidebarTab {
    Query,
    Search,
}

struct ViewModel {
    graph: NetworkGraph,
    search_index: SearchIndex,
    predicates: PredicateSet,
    /// `predicates.revision()` that `subgraph` was resolved from.
    resolved_revision: u64,
    subgraph: Subgraph,
    resolve_timer: DeferredTimer,
    defaults_timer: DeferredTimer,
    focus: FocusState,
    sidebar_node: Option<usize>,
    layout: LayoutDriver,
    pan: Vec2,
    zoom: f32,
    transition: Option<ViewTransition>,
    canvas_size: Vec2,
    tab: SidebarTab,
    query_kind: PredicateKind,
    query_text: String,
    search_text: String,
    search_timer: DeferredTimer,
    search_results: Vec<usize>,
    pivot_candidate: Option<usize>,
    graph_cache: Option<RenderGraph>,
}

/// Draw lists for the mounted subgraph. Local slots index `nodes`.
struct RenderGraph {
    nodes: Vec<usize>,
    edges: Vec<RenderEdge>,
    /// Edge endpoints as node indices, handed to the layout driver.
    links: Vec<(usize, usize)>,
    view_scratch: ViewScratch,
}

#[derive(Clone, Copy, Debug)]
struct RenderEdge {
    from: usize,
    to: usize,
    edge_index: usize,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
    visible_mask: Vec<bool>,
}

impl NetworkExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf) -> Self {
        let state = AppState::Loading {
            rx: Some(Self::spawn_load(data_path.clone())),
        };
        Self { data_path, state }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<Result<NetworkGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_network(&data_path).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }
}

impl eframe::App for NetworkExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Some(receiver) = rx.as_ref() {
                    match receiver.try_recv() {
                        Ok(Ok(graph)) => {
                            let now = ctx.input(|input| input.time);
                            info!(path = %self.data_path.display(), "network ready");
                            transition =
                                Some(AppState::Ready(Box::new(ViewModel::new(graph, now))));
                        }
                        Ok(Err(message)) => {
                            error!(%message, "network failed to load");
                            *rx = None;
                        }
                        Err(TryRecvError::Empty) => ctx.request_repaint(),
                        Err(TryRecvError::Disconnected) => {
                            error!("background load worker disconnected");
                            *rx = None;
                        }
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
