use eframe::egui::{Pos2, Vec2};

use super::simulation::Simulation;

/// Manual-drag gesture over a node: pin on start, track the pointer in
/// world space while held, free the node on release. Selection is
/// untouched throughout; dragging and selecting are independent
/// gestures.
#[derive(Default)]
pub struct DragHandler {
    active: Option<usize>,
}

impl DragHandler {
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn on_start(&mut self, simulation: &mut Simulation, index: usize) {
        let Some(position) = simulation.position(index) else {
            return;
        };
        self.active = Some(index);
        simulation.pin_at(index, position);
        simulation.reheat();
    }

    /// Pointer coordinates arrive already converted through the inverse
    /// view transform, so the pin lands correctly at any zoom.
    pub fn on_move(&mut self, simulation: &mut Simulation, world: Vec2) {
        if let Some(index) = self.active {
            simulation.pin_at(index, world);
        }
    }

    pub fn on_end(&mut self, simulation: &mut Simulation) {
        if let Some(index) = self.active.take() {
            simulation.release(index);
            simulation.cool();
        }
    }

    /// Forget the gesture without touching the simulation; used when the
    /// working graph under the pointer is replaced mid-drag.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

/// Smallest node whose screen-space circle contains the pointer, closest
/// center winning on overlap.
pub fn node_at(
    screen_positions: &[Pos2],
    pointer: Pos2,
    hit_radius: f32,
) -> Option<usize> {
    screen_positions
        .iter()
        .enumerate()
        .filter_map(|(index, position)| {
            let distance = position.distance(pointer);
            (distance <= hit_radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
