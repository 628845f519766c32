mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::layout::{ForceSimulation, SimBody, SimulationParams};
use forces::{BodyInputs, accumulate_collision_pairs, accumulate_repulsion_for_body};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.72;
const CHARGE_SCALE: f32 = 400.0;
const SOFTENING: f32 = 620.0;
const LINK_GAP: f32 = 30.0;
const SPRING_STRENGTH: f32 = 0.016;
const SPRING_DAMPING: f32 = 0.22;
const VELOCITY_DAMPING: f32 = 0.88;
const MAX_FORCE: f32 = 255.0;
const MAX_SPEED: f32 = 26.0;

#[derive(Default)]
struct PhysicsScratch {
    forces: Vec<Vec2>,
    corrections: Vec<Vec2>,
    positions: Vec<Vec2>,
    charges: Vec<f32>,
    ranges: Vec<f32>,
    radii: Vec<f32>,
    strengths: Vec<f32>,
}

impl PhysicsScratch {
    fn load(&mut self, bodies: &[SimBody]) {
        self.positions.clear();
        self.charges.clear();
        self.ranges.clear();
        self.radii.clear();
        self.strengths.clear();
        for body in bodies {
            self.positions.push(body.position);
            self.charges.push(body.forces.repulsion * CHARGE_SCALE);
            self.ranges.push(body.forces.repulsion_range);
            self.radii.push(body.forces.collision_radius);
            self.strengths.push(body.forces.collision_strength);
        }
        self.forces.clear();
        self.forces.resize(bodies.len(), Vec2::ZERO);
    }

    fn refresh_positions(&mut self, bodies: &[SimBody]) {
        for (slot, body) in self.positions.iter_mut().zip(bodies) {
            *slot = body.position;
        }
    }
}

/// Barnes-Hut force layout. Pinned bodies never move; everything else is
/// pulled back inside `bound_radius` after each step.
#[derive(Default)]
pub(in crate::app) struct BarnesHutSimulation {
    scratch: PhysicsScratch,
}

impl BarnesHutSimulation {
    fn accumulate_repulsion(&mut self) {
        let scratch = &mut self.scratch;
        let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges, &scratch.radii)
        else {
            return;
        };
        let inputs = BodyInputs {
            positions: &scratch.positions,
            charges: &scratch.charges,
            ranges: &scratch.ranges,
            radii: &scratch.radii,
            strengths: &scratch.strengths,
        };
        for (index, force) in scratch.forces.iter_mut().enumerate() {
            accumulate_repulsion_for_body(
                &tree,
                index,
                &inputs,
                SOFTENING,
                BARNES_HUT_THETA,
                force,
            );
        }
    }

    fn accumulate_links(&mut self, bodies: &[SimBody], links: &[(usize, usize)]) {
        let count = bodies.len();
        for &(from, to) in links {
            if from >= count || to >= count || from == to {
                continue;
            }

            let delta = bodies[from].position - bodies[to].position;
            let distance_sq = delta.length_sq();
            if distance_sq <= 0.0001 * 0.0001 {
                continue;
            }
            let distance = distance_sq.sqrt();
            let direction = delta / distance;

            let preferred = bodies[from].forces.collision_radius
                + bodies[to].forces.collision_radius
                + LINK_GAP;
            let spring = (distance - preferred) * SPRING_STRENGTH;
            let relative_velocity = bodies[from].velocity - bodies[to].velocity;
            let damping_force = relative_velocity.dot(direction) * SPRING_DAMPING;
            let correction = direction * (spring + damping_force);

            self.scratch.forces[from] -= correction;
            self.scratch.forces[to] += correction;
        }
    }

    fn resolve_collisions(&mut self, bodies: &mut [SimBody], iterations: usize) {
        for _ in 0..iterations {
            self.scratch.refresh_positions(bodies);
            self.scratch.corrections.clear();
            self.scratch.corrections.resize(bodies.len(), Vec2::ZERO);

            let scratch = &mut self.scratch;
            let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges, &scratch.radii)
            else {
                return;
            };
            let inputs = BodyInputs {
                positions: &scratch.positions,
                charges: &scratch.charges,
                ranges: &scratch.ranges,
                radii: &scratch.radii,
                strengths: &scratch.strengths,
            };
            accumulate_collision_pairs(&tree, &tree, true, &inputs, &mut scratch.corrections);

            for (body, correction) in bodies.iter_mut().zip(&scratch.corrections) {
                if !body.pinned {
                    body.position += *correction;
                }
            }
        }
    }
}

fn recenter(bodies: &mut [SimBody], strength: f32) {
    if strength <= 0.0 || bodies.is_empty() {
        return;
    }
    let centroid =
        bodies.iter().fold(Vec2::ZERO, |sum, body| sum + body.position) / bodies.len() as f32;
    if centroid.length_sq() <= 0.000_001 {
        return;
    }
    let shift = centroid * strength.min(1.0);
    for body in bodies.iter_mut().filter(|body| !body.pinned) {
        body.position -= shift;
    }
}

fn clamp_to_bound(bodies: &mut [SimBody], bound_radius: f32) {
    for body in bodies.iter_mut().filter(|body| !body.pinned) {
        let distance = body.position.length();
        if distance > bound_radius && distance > 0.0 {
            body.position *= bound_radius / distance;
        }
    }
}

impl ForceSimulation for BarnesHutSimulation {
    fn step(
        &mut self,
        bodies: &mut [SimBody],
        links: &[(usize, usize)],
        params: SimulationParams,
    ) -> bool {
        if bodies.is_empty() {
            return false;
        }

        self.scratch.load(bodies);
        self.accumulate_repulsion();
        self.accumulate_links(bodies, links);

        let time_step_scale = (params.delta_seconds * 60.0).clamp(0.25, 3.0);
        let damping_factor = VELOCITY_DAMPING.powf(time_step_scale);
        let max_force_sq = MAX_FORCE * MAX_FORCE;
        let max_speed_sq = MAX_SPEED * MAX_SPEED;
        let min_sleep_speed_sq = 0.02 * 0.02;
        let min_sleep_force_sq = 0.08 * 0.08;
        let mut any_motion = false;

        for (body, force_value) in bodies.iter_mut().zip(&self.scratch.forces) {
            if body.pinned {
                body.velocity = Vec2::ZERO;
                continue;
            }

            let mut force = *force_value;
            let force_sq = force.length_sq();
            if force_sq > max_force_sq {
                force *= MAX_FORCE / force_sq.sqrt();
            }

            let mut velocity = (body.velocity + (force * (0.055 * time_step_scale))) * damping_factor;
            let mut speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= MAX_SPEED / speed_sq.sqrt();
                speed_sq = max_speed_sq;
            }

            if speed_sq < min_sleep_speed_sq && force_sq < min_sleep_force_sq {
                velocity = Vec2::ZERO;
                speed_sq = 0.0;
            }

            body.velocity = velocity;
            body.position += velocity * time_step_scale;
            if speed_sq > 0.000_001 {
                any_motion = true;
            }
        }

        self.resolve_collisions(bodies, params.collision_iterations);
        recenter(bodies, params.center_strength);
        clamp_to_bound(bodies, params.bound_radius);

        any_motion
    }
}
