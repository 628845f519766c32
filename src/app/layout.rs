use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::network::{NetworkGraph, NodeKind};
use crate::timer::DeferredTimer;
use crate::util::stable_pair;

/// Length of the free-movement window after the predicate set changes.
pub(in crate::app) const SETTLE_WINDOW_SECS: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct KindForces {
    pub repulsion: f32,
    pub repulsion_range: f32,
    pub collision_radius: f32,
    pub collision_strength: f32,
}

impl KindForces {
    pub(in crate::app) fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Orchestra => Self {
                repulsion: 200.0,
                repulsion_range: 800.0,
                collision_radius: 40.0,
                collision_strength: 0.8,
            },
            NodeKind::School => Self {
                repulsion: 100.0,
                repulsion_range: 600.0,
                collision_radius: 25.0,
                collision_strength: 0.5,
            },
            NodeKind::Musician => Self {
                repulsion: 30.0,
                repulsion_range: 400.0,
                collision_radius: 15.0,
                collision_strength: 0.3,
            },
        }
    }
}

/// Parameters handed to the simulation on every step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct SimulationParams {
    pub center_strength: f32,
    pub collision_iterations: usize,
    /// Nodes are kept within this distance of the origin.
    pub bound_radius: f32,
    pub delta_seconds: f32,
}

impl SimulationParams {
    pub(in crate::app) fn for_view(filtered: bool, canvas_size: Vec2, delta_seconds: f32) -> Self {
        let smaller_side = canvas_size.x.min(canvas_size.y).max(200.0);
        Self {
            center_strength: if filtered { 1.0 } else { 0.02 },
            collision_iterations: if filtered { 4 } else { 1 },
            bound_radius: smaller_side * if filtered { 0.3 } else { 0.6 },
            delta_seconds,
        }
    }
}

/// One node as seen by the simulation. `pinned` bodies do not move.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct SimBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub pinned: bool,
    pub forces: KindForces,
}

/// The physics collaborator the layout driver delegates to.
pub(in crate::app) trait ForceSimulation {
    /// Advances one tick. `links` index into `bodies`. Returns whether any
    /// body is still moving.
    fn step(
        &mut self,
        bodies: &mut [SimBody],
        links: &[(usize, usize)],
        params: SimulationParams,
    ) -> bool;
}

#[derive(Clone, Copy, Debug)]
struct NodePlacement {
    position: Vec2,
    velocity: Vec2,
    pinned: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LayoutPhase {
    Active,
    Inactive,
}

/// Owns every node's position; the renderer only reads it.
pub(in crate::app) struct LayoutDriver {
    placements: Vec<NodePlacement>,
    kinds: Vec<NodeKind>,
    phase: LayoutPhase,
    settle_timer: DeferredTimer,
    dragging: Option<usize>,
    simulation: Box<dyn ForceSimulation>,
    bodies: Vec<SimBody>,
    local_links: Vec<(usize, usize)>,
    local_index: Vec<usize>,
}

impl LayoutDriver {
    const INITIAL_SPREAD: f32 = 420.0;

    pub(in crate::app) fn new(graph: &NetworkGraph, simulation: Box<dyn ForceSimulation>) -> Self {
        let placements = graph
            .nodes()
            .iter()
            .map(|node| {
                let (jx, jy) = stable_pair(&node.id);
                NodePlacement {
                    position: vec2(jx, jy) * Self::INITIAL_SPREAD,
                    velocity: Vec2::ZERO,
                    pinned: None,
                }
            })
            .collect();

        Self {
            placements,
            kinds: graph.nodes().iter().map(|node| node.kind).collect(),
            phase: LayoutPhase::Inactive,
            settle_timer: DeferredTimer::default(),
            dragging: None,
            simulation,
            bodies: Vec::new(),
            local_links: Vec::new(),
            local_index: vec![usize::MAX; graph.node_count()],
        }
    }

    pub(in crate::app) fn is_active(&self) -> bool {
        self.phase == LayoutPhase::Active
    }

    pub(in crate::app) fn position(&self, index: usize) -> Vec2 {
        self.placements
            .get(index)
            .map(|placement| placement.pinned.unwrap_or(placement.position))
            .unwrap_or(Vec2::ZERO)
    }

    #[cfg(test)]
    pub(in crate::app) fn is_pinned(&self, index: usize) -> bool {
        self.placements
            .get(index)
            .is_some_and(|placement| placement.pinned.is_some())
    }

    /// Releases every node and opens the settle window.
    pub(in crate::app) fn on_predicate_set_changed(&mut self, now: f64) {
        for placement in &mut self.placements {
            placement.pinned = None;
        }
        self.phase = LayoutPhase::Active;
        self.settle_timer.schedule(now, SETTLE_WINDOW_SECS);
        debug!("layout active");
    }

    fn pin_all(&mut self) {
        for placement in &mut self.placements {
            placement.pinned = Some(placement.position);
            placement.velocity = Vec2::ZERO;
        }
        self.phase = LayoutPhase::Inactive;
        debug!("layout settled; nodes pinned");
    }

    /// Steps the simulation over `nodes` while active. `edges` holds pairs
    /// of node indices. Returns whether anything moved.
    pub(in crate::app) fn tick(
        &mut self,
        now: f64,
        nodes: &[usize],
        edges: &[(usize, usize)],
        params: SimulationParams,
    ) -> bool {
        if self.settle_timer.poll(now) {
            self.pin_all();
            return false;
        }
        if self.phase == LayoutPhase::Inactive || nodes.is_empty() {
            return false;
        }

        self.bodies.clear();
        for &index in nodes {
            let Some(placement) = self.placements.get(index) else {
                continue;
            };
            self.local_index[index] = self.bodies.len();
            self.bodies.push(SimBody {
                position: placement.pinned.unwrap_or(placement.position),
                velocity: placement.velocity,
                pinned: placement.pinned.is_some(),
                forces: KindForces::for_kind(self.kinds[index]),
            });
        }

        self.local_links.clear();
        for &(source, target) in edges {
            let (Some(&from), Some(&to)) = (self.local_index.get(source), self.local_index.get(target))
            else {
                continue;
            };
            if from < self.bodies.len() && to < self.bodies.len() {
                self.local_links.push((from, to));
            }
        }

        let moving = self
            .simulation
            .step(&mut self.bodies, &self.local_links, params);

        for &index in nodes {
            let Some(&local) = self.local_index.get(index) else {
                continue;
            };
            if let Some(body) = self.bodies.get(local) {
                let placement = &mut self.placements[index];
                if placement.pinned.is_none() {
                    placement.position = body.position;
                    placement.velocity = body.velocity;
                }
            }
            self.local_index[index] = usize::MAX;
        }

        moving
    }

    pub(in crate::app) fn begin_drag(&mut self, index: usize) {
        if let Some(placement) = self.placements.get_mut(index) {
            placement.pinned = Some(placement.pinned.unwrap_or(placement.position));
            self.dragging = Some(index);
        }
    }

    pub(in crate::app) fn drag_to(&mut self, index: usize, world: Vec2) {
        if self.dragging != Some(index) {
            return;
        }
        if let Some(placement) = self.placements.get_mut(index) {
            placement.position = world;
            placement.velocity = Vec2::ZERO;
            placement.pinned = Some(world);
        }
    }

    /// Inactive layouts keep the node pinned where it was dropped; active
    /// ones hand it back to the simulation.
    pub(in crate::app) fn end_drag(&mut self, index: usize) {
        if self.dragging.take() != Some(index) {
            return;
        }
        if self.phase == LayoutPhase::Active
            && let Some(placement) = self.placements.get_mut(index)
        {
            placement.pinned = None;
        }
    }

    pub(in crate::app) fn dragging(&self) -> Option<usize> {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fixtures::sample;

    /// Moves every free body one unit right.
    struct Drift;

    impl ForceSimulation for Drift {
        fn step(
            &mut self,
            bodies: &mut [SimBody],
            _links: &[(usize, usize)],
            _params: SimulationParams,
        ) -> bool {
            for body in bodies.iter_mut().filter(|body| !body.pinned) {
                body.position.x += 1.0;
            }
            true
        }
    }

    fn params() -> SimulationParams {
        SimulationParams::for_view(true, vec2(800.0, 600.0), 1.0 / 60.0)
    }

    fn all_nodes(graph: &NetworkGraph) -> Vec<usize> {
        (0..graph.node_count()).collect()
    }

    #[test]
    fn settles_and_pins_after_window() {
        let graph = sample();
        let nodes = all_nodes(&graph);
        let mut driver = LayoutDriver::new(&graph, Box::new(Drift));

        driver.on_predicate_set_changed(0.0);
        assert!(driver.is_active());
        let start = driver.position(0);

        assert!(driver.tick(0.5, &nodes, &[], params()));
        assert_eq!(driver.position(0).x, start.x + 1.0);

        assert!(!driver.tick(SETTLE_WINDOW_SECS + 0.01, &nodes, &[], params()));
        assert!(!driver.is_active());
        assert!((0..graph.node_count()).all(|index| driver.is_pinned(index)));

        let settled = driver.position(0);
        driver.tick(5.0, &nodes, &[], params());
        assert_eq!(driver.position(0), settled);
    }

    #[test]
    fn predicate_change_unpins_and_restarts_window() {
        let graph = sample();
        let nodes = all_nodes(&graph);
        let mut driver = LayoutDriver::new(&graph, Box::new(Drift));

        driver.on_predicate_set_changed(0.0);
        driver.tick(2.5, &nodes, &[], params());
        assert!(driver.is_pinned(1));

        driver.on_predicate_set_changed(3.0);
        assert!(!driver.is_pinned(1));
        driver.tick(3.0 + SETTLE_WINDOW_SECS - 0.5, &nodes, &[], params());
        assert!(driver.is_active());
    }

    #[test]
    fn drag_while_inactive_repins_at_drop() {
        let graph = sample();
        let nodes = all_nodes(&graph);
        let mut driver = LayoutDriver::new(&graph, Box::new(Drift));
        driver.on_predicate_set_changed(0.0);
        driver.tick(2.5, &nodes, &[], params());

        driver.begin_drag(2);
        driver.drag_to(2, vec2(40.0, -12.0));
        driver.end_drag(2);

        assert!(driver.is_pinned(2));
        assert_eq!(driver.position(2), vec2(40.0, -12.0));
        assert_eq!(driver.dragging(), None);
    }

    #[test]
    fn drag_while_active_releases_to_simulation() {
        let graph = sample();
        let nodes = all_nodes(&graph);
        let mut driver = LayoutDriver::new(&graph, Box::new(Drift));
        driver.on_predicate_set_changed(0.0);

        driver.begin_drag(2);
        driver.drag_to(2, vec2(10.0, 10.0));
        driver.tick(0.1, &nodes, &[], params());
        assert_eq!(driver.position(2), vec2(10.0, 10.0));

        driver.end_drag(2);
        assert!(!driver.is_pinned(2));
        driver.tick(0.2, &nodes, &[], params());
        assert_eq!(driver.position(2), vec2(11.0, 10.0));
    }

    #[test]
    fn per_kind_forces_are_ordered() {
        let orchestra = KindForces::for_kind(NodeKind::Orchestra);
        let school = KindForces::for_kind(NodeKind::School);
        let musician = KindForces::for_kind(NodeKind::Musician);

        assert!(orchestra.repulsion > school.repulsion && school.repulsion > musician.repulsion);
        assert!(
            orchestra.collision_radius > school.collision_radius
                && school.collision_radius > musician.collision_radius
        );
        assert!(orchestra.repulsion_range > musician.repulsion_range);
    }

    #[test]
    fn filtered_views_pull_tighter() {
        let filtered = SimulationParams::for_view(true, vec2(1000.0, 800.0), 0.016);
        let full = SimulationParams::for_view(false, vec2(1000.0, 800.0), 0.016);

        assert_eq!(filtered.collision_iterations, 4);
        assert_eq!(full.collision_iterations, 1);
        assert!(filtered.center_strength > full.center_strength);
        assert!((filtered.bound_radius - 240.0).abs() < 1e-3);
        assert!((full.bound_radius - 480.0).abs() < 1e-3);
    }
}
