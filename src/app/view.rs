use std::collections::HashSet;

use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2,
};

use crate::util::ellipsize;

use super::ViewModel;
use super::interaction::node_at;
use super::search::pseudo_matches;
use super::viewport::Transform;

pub(super) const NODE_RADIUS: f32 = 10.0;
const MIN_HIT_RADIUS: f32 = 8.0;
const LABEL_MAX_CHARS: usize = 28;

/// The d3 category-10 palette; groups map onto it by first-seen order,
/// wrapping past ten groups.
const GROUP_PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

const EDGE_COLOR: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
const PSEUDO_MATCH_TINT: Color32 = Color32::from_rgb(0x67, 0xc4, 0xff);

pub(super) fn group_color(palette_slot: usize) -> Color32 {
    GROUP_PALETTE[palette_slot % GROUP_PALETTE.len()]
}

fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;
    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;
    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

fn draw_background(painter: &Painter, rect: Rect, transform: Transform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + transform.pan;
    let grid = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], grid);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], grid);
        y += step;
    }
}

impl ViewModel {
    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.working_dirty {
            self.rebuild_working();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.viewport.transform());

        if self.working.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Run an analysis to see the causal network here.",
                FontId::proportional(14.0),
                Color32::from_gray(140),
            );
            return;
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let pointer = ui
                    .input(|input| input.pointer.hover_pos())
                    .unwrap_or_else(|| rect.center());
                self.viewport.zoom_at(rect, pointer, scroll);
            }
        }

        let zoom = self.viewport.zoom();
        let node_radius = NODE_RADIUS * zoom;
        let hit_radius = node_radius.max(MIN_HIT_RADIUS);

        // Hit testing uses last tick's positions; one frame of slack is
        // invisible at interaction speed.
        let screen_positions = self.screen_positions(rect);
        let hovered = response
            .hover_pos()
            .and_then(|pointer| node_at(&screen_positions, pointer, hit_radius));

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            self.drag.on_start(&mut self.simulation, index);
        }

        if self.drag.active().is_some() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let world = self.viewport.screen_to_world(rect, pointer);
                self.drag.on_move(&mut self.simulation, world);
            }
            if response.drag_stopped_by(egui::PointerButton::Primary) {
                self.drag.on_end(&mut self.simulation);
            }
        } else if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.viewport.pan_by(response.drag_delta());
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            self.selection.click(&self.working, hovered);
        }
        self.selection.set_hover(&self.working, hovered);

        if hovered.is_some() || self.drag.active().is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let dt = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let simulating = self.simulation.step(&self.working);
        let focusing = self.viewport.animate(dt);
        if simulating || focusing || response.dragged() {
            ui.ctx().request_repaint();
        }

        let screen_positions = self.screen_positions(rect);
        let pseudo = if self.selection.selected().is_none() {
            pseudo_matches(&self.working, &self.search)
        } else {
            HashSet::new()
        };

        self.draw_edges(&painter, rect, &screen_positions, node_radius, zoom);
        self.draw_nodes(&painter, rect, &screen_positions, node_radius, zoom, &pseudo);

        if let Some((id, group)) = self.selection.tooltip(&self.working) {
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                format!("{}\nGroup: {group}", ellipsize(id, 60)),
                FontId::proportional(12.0),
                Color32::from_gray(235),
            );
        }
    }

    fn screen_positions(&self, rect: Rect) -> Vec<Pos2> {
        self.simulation
            .positions()
            .iter()
            .map(|&world| self.viewport.world_to_screen(rect, world))
            .collect()
    }

    fn draw_edges(
        &self,
        painter: &Painter,
        rect: Rect,
        screen_positions: &[Pos2],
        node_radius: f32,
        zoom: f32,
    ) {
        let stroke_width = (1.5 * zoom).clamp(0.5, 4.0);
        let wing = 8.0 * zoom.clamp(0.4, 2.5);

        for &(source, target) in &self.working.edges {
            let start = screen_positions[source];
            let end = screen_positions[target];
            if !edge_visible(rect, start, end, stroke_width + wing) {
                continue;
            }

            let length = start.distance(end);
            if length <= node_radius {
                continue;
            }
            let direction = (end - start) / length;
            let tip = end - direction * (node_radius + 2.0);

            let color = with_opacity(EDGE_COLOR, self.selection.edge_opacity((source, target)));
            painter.line_segment([start, tip], Stroke::new(stroke_width, color));

            let base = tip - direction * wing;
            let perp = vec2(-direction.y, direction.x) * (wing * 0.5);
            painter.add(Shape::convex_polygon(
                vec![tip, base + perp, base - perp],
                color,
                Stroke::NONE,
            ));
        }
    }

    fn draw_nodes(
        &self,
        painter: &Painter,
        rect: Rect,
        screen_positions: &[Pos2],
        node_radius: f32,
        zoom: f32,
        pseudo: &HashSet<usize>,
    ) {
        let outline_width = (1.5 * zoom).clamp(0.5, 4.0);
        let label_font = FontId::proportional((10.0 * zoom).clamp(6.0, 26.0));

        for (index, node) in self.working.nodes.iter().enumerate() {
            let position = screen_positions[index];
            if !circle_visible(rect, position, node_radius + 60.0) {
                continue;
            }

            let opacity = self.selection.node_emphasis(index).opacity();
            let mut fill = group_color(node.palette_slot);
            if pseudo.contains(&index) {
                fill = blend_color(fill, PSEUDO_MATCH_TINT, 0.55);
            }

            painter.circle_filled(position, node_radius, with_opacity(fill, opacity));
            painter.circle_stroke(
                position,
                node_radius,
                Stroke::new(outline_width, with_opacity(Color32::WHITE, opacity)),
            );

            painter.text(
                position - vec2(0.0, node_radius + 5.0),
                Align2::CENTER_BOTTOM,
                ellipsize(&node.id, LABEL_MAX_CHARS),
                label_font.clone(),
                with_opacity(Color32::from_gray(230), opacity),
            );
        }
    }
}
