use eframe::egui::{Vec2, vec2};

use crate::graph::WorkingGraph;
use crate::util::stable_pair;

/// Rest length of the edge spring.
pub const LINK_DISTANCE: f32 = 120.0;
/// Pairwise repulsion strength.
const CHARGE_STRENGTH: f32 = 400.0;
/// Weak independent pull toward the panel center on each axis.
const CENTER_STRENGTH: f32 = 0.05;
/// Fraction of velocity retained per tick.
const VELOCITY_RETAIN: f32 = 0.6;
/// Cooling floor; the simulation parks once alpha relaxes below this.
const ALPHA_MIN: f32 = 0.001;
/// Cooling target while a drag is in progress.
const REHEAT_ALPHA: f32 = 0.3;
/// Radius of the initial jitter cloud around the panel center.
const SEED_SPREAD: f32 = 80.0;

/// Alpha-cooled force simulation over one working graph.
///
/// Owns every node position exclusively; renderers and hit tests borrow
/// positions read-only, and the drag handler reaches in only through
/// [`Simulation::pin_at`] / [`Simulation::release`]. Stepping happens
/// only while [`Simulation::is_running`], driven by the frame loop, so
/// replacing or dropping the simulation is all it takes to cancel
/// ticking.
pub struct Simulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    pinned: Vec<Option<Vec2>>,
    degrees: Vec<usize>,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    running: bool,
    ticks: u64,
    signature: u64,
    forces: Vec<Vec2>,
}

impl Simulation {
    pub fn new(working: &WorkingGraph) -> Self {
        let count = working.node_count();
        let positions = working
            .nodes
            .iter()
            .map(|node| {
                let (jx, jy) = stable_pair(&node.id);
                vec2(jx, jy) * SEED_SPREAD
            })
            .collect::<Vec<_>>();

        Self {
            positions,
            velocities: vec![Vec2::ZERO; count],
            pinned: vec![None; count],
            degrees: working.neighbors.iter().map(Vec::len).collect(),
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            // An empty working graph never starts simulating.
            running: count > 0,
            ticks: 0,
            signature: working.signature,
            forces: vec![Vec2::ZERO; count],
        }
    }

    /// Re-point at a rebuilt working graph. An unchanged identity
    /// signature keeps all motion state (the recolor path); anything
    /// else discards positions and velocities and starts over.
    pub fn rebuild(&mut self, working: &WorkingGraph) {
        if self.signature != working.signature {
            *self = Self::new(working);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied()
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.get(index).is_some_and(Option::is_some)
    }

    /// Hold a node at a fixed world position. It keeps exerting forces
    /// on its neighbors but no longer integrates.
    pub fn pin_at(&mut self, index: usize, world: Vec2) {
        if let Some(slot) = self.pinned.get_mut(index) {
            *slot = Some(world);
            if let Some(position) = self.positions.get_mut(index) {
                *position = world;
            }
        }
    }

    /// Free a previously pinned node so subsequent ticks move it again.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.pinned.get_mut(index) {
            *slot = None;
        }
    }

    /// Raise the cooling target so the layout visibly relaxes around a
    /// manual reposition.
    pub fn reheat(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        self.alpha_target = REHEAT_ALPHA;
        self.alpha = self.alpha.max(REHEAT_ALPHA);
        self.running = true;
    }

    /// Let alpha decay back to rest after an interaction ends.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// One integration tick. Cost is O(n^2 + e); the document cap
    /// upstream keeps n in the low hundreds. Returns false once parked.
    pub fn step(&mut self, working: &WorkingGraph) -> bool {
        if !self.running || self.positions.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        let count = self.positions.len();
        self.forces.resize(count, Vec2::ZERO);
        self.forces.fill(Vec2::ZERO);

        // Pairwise charge repulsion, inverse-distance falloff.
        for i in 0..count {
            for j in (i + 1)..count {
                let delta = self.positions[j] - self.positions[i];
                let distance_sq = delta.length_sq().max(1.0);
                let push = delta * (CHARGE_STRENGTH * self.alpha / distance_sq);
                self.forces[i] -= push;
                self.forces[j] += push;
            }
        }

        // Edge springs toward the rest length, weighted by endpoint
        // degree so hubs stay put and leaves do the travelling.
        for &(source, target) in &working.edges {
            if source >= count || target >= count {
                continue;
            }
            let delta = self.positions[target] + self.velocities[target]
                - self.positions[source]
                - self.velocities[source];
            let distance = delta.length().max(1e-3);
            let source_degree = self.degrees.get(source).copied().unwrap_or(1).max(1) as f32;
            let target_degree = self.degrees.get(target).copied().unwrap_or(1).max(1) as f32;
            let strength = 1.0 / source_degree.min(target_degree);
            let stretch = (distance - LINK_DISTANCE) / distance * self.alpha * strength;
            let correction = delta * stretch;
            let bias = source_degree / (source_degree + target_degree);
            self.forces[target] -= correction * bias;
            self.forces[source] += correction * (1.0 - bias);
        }

        // Weak centering on both axes independently.
        for (force, position) in self.forces.iter_mut().zip(&self.positions) {
            *force -= *position * (CENTER_STRENGTH * self.alpha);
        }

        for index in 0..count {
            if let Some(held) = self.pinned[index] {
                self.positions[index] = held;
                self.velocities[index] = Vec2::ZERO;
                continue;
            }
            let velocity = (self.velocities[index] + self.forces[index]) * VELOCITY_RETAIN;
            self.velocities[index] = velocity;
            self.positions[index] += velocity;
        }

        self.ticks += 1;

        if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
            self.running = false;
        }
        true
    }
}
