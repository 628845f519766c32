use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

/// Per-body inputs to the force passes, indexed like the bodies.
pub(super) struct BodyInputs<'a> {
    pub(super) positions: &'a [Vec2],
    pub(super) charges: &'a [f32],
    pub(super) ranges: &'a [f32],
    pub(super) radii: &'a [f32],
    pub(super) strengths: &'a [f32],
}

fn separation_direction(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    }
}

fn repulsion_from(point: Vec2, source: Vec2, charge: f32, range: f32, softening: f32) -> Vec2 {
    let delta = point - source;
    let distance_sq = delta.length_sq();
    if distance_sq > range * range {
        return Vec2::ZERO;
    }
    let distance = distance_sq.sqrt();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        vec2(1.0, 0.0)
    };
    direction * (charge / (distance_sq + softening))
}

/// Barnes-Hut repulsion felt by body `index`. Sources further away than the
/// receiving body's range are ignored.
pub(super) fn accumulate_repulsion_for_body(
    node: &QuadNode,
    index: usize,
    inputs: &BodyInputs<'_>,
    softening: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if node.charge <= 0.0 {
        return;
    }

    let point = inputs.positions[index];
    let range = inputs.ranges[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            *force += repulsion_from(
                point,
                inputs.positions[other],
                inputs.charges[other],
                range,
                softening,
            );
        }
        return;
    }

    let delta = point - node.center_of_charge;
    let distance = delta.length_sq().max(0.0001).sqrt();
    let can_approximate =
        !node.bounds.contains(point) && (node.bounds.side_length() / distance) < theta;

    if can_approximate {
        *force += repulsion_from(point, node.center_of_charge, node.charge, range, softening);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_body(child, index, inputs, softening, theta, force);
    }
}

fn separate_pair(from: usize, to: usize, inputs: &BodyInputs<'_>, corrections: &mut [Vec2]) {
    let delta = inputs.positions[from] - inputs.positions[to];
    let distance = delta.length();
    let min_distance = inputs.radii[from] + inputs.radii[to];
    if distance >= min_distance {
        return;
    }

    let direction = separation_direction(delta, distance, from, to);
    let overlap = (min_distance - distance) * 0.5;
    corrections[from] += direction * overlap * inputs.strengths[from];
    corrections[to] -= direction * overlap * inputs.strengths[to];
}

/// Collects position corrections for every overlapping pair of bodies.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    inputs: &BodyInputs<'_>,
    corrections: &mut [Vec2],
) {
    let reach = node_a.max_radius + node_b.max_radius;
    if node_a.bounds.distance_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (i, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[(i + 1)..] {
                    separate_pair(from, to, inputs, corrections);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    separate_pair(from, to, inputs, corrections);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, inputs, corrections);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(child_a, child_b, false, inputs, corrections);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, inputs, corrections);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, inputs, corrections);
        }
    }
}
