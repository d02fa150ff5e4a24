use eframe::egui::{Pos2, Rect, Vec2};

pub const FOCUS_ZOOM: f32 = 1.5;
pub const FOCUS_DURATION_SECS: f32 = 0.75;
const ZOOM_MIN: f32 = 0.05;
const ZOOM_MAX: f32 = 6.0;

/// The 2D view transform: `screen = rect.center() + pan + world * zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

struct FocusAnimation {
    from: Transform,
    to: Transform,
    elapsed: f32,
    duration: f32,
}

/// Pan/zoom state for one graph panel.
///
/// Mutated only through the gesture entry points and the focus
/// animation; it survives simulation restarts and display-mode flips and
/// resets only when the panel's data source is replaced.
#[derive(Default)]
pub struct Viewport {
    transform: Transform,
    focus: Option<FocusAnimation>,
}

impl Default for FocusAnimation {
    fn default() -> Self {
        Self {
            from: Transform::default(),
            to: Transform::default(),
            elapsed: 0.0,
            duration: FOCUS_DURATION_SECS,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn zoom(&self) -> f32 {
        self.transform.zoom
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.transform.pan + world * self.transform.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.transform.pan) / self.transform.zoom
    }

    /// Accumulate a pan gesture. A manual gesture takes the wheel from
    /// any in-flight focus animation.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.focus = None;
        self.transform.pan += delta;
    }

    /// Wheel zoom anchored at the pointer so the world point under the
    /// cursor stays put.
    pub fn zoom_at(&mut self, rect: Rect, pointer: Pos2, scroll: f32) {
        if scroll.abs() <= f32::EPSILON {
            return;
        }
        self.focus = None;
        let world_before = self.screen_to_world(rect, pointer);
        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.transform.zoom = (self.transform.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        self.transform.pan = pointer - rect.center() - (world_before * self.transform.zoom);
    }

    /// Glide the transform so `world` lands on the panel center at the
    /// given zoom, over a bounded duration rather than snapping.
    pub fn focus_on(&mut self, world: Vec2, zoom: f32) {
        let zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.focus = Some(FocusAnimation {
            from: self.transform,
            to: Transform {
                pan: -world * zoom,
                zoom,
            },
            ..FocusAnimation::default()
        });
    }

    pub fn is_animating(&self) -> bool {
        self.focus.is_some()
    }

    /// Advance the focus animation. Returns true while more frames are
    /// needed.
    pub fn animate(&mut self, dt: f32) -> bool {
        let Some(focus) = &mut self.focus else {
            return false;
        };
        focus.elapsed += dt.max(0.0);
        let t = (focus.elapsed / focus.duration).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        self.transform = Transform {
            pan: focus.from.pan + (focus.to.pan - focus.from.pan) * eased,
            zoom: focus.from.zoom + (focus.to.zoom - focus.from.zoom) * eased,
        };
        if t >= 1.0 {
            self.focus = None;
        }
        self.focus.is_some()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn panel() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))
    }

    #[test]
    fn screen_world_round_trip() {
        let mut viewport = Viewport::new();
        viewport.pan_by(vec2(35.0, -12.0));
        viewport.zoom_at(panel(), pos2(200.0, 200.0), 80.0);

        let world = vec2(17.5, -40.25);
        let screen = viewport.world_to_screen(panel(), world);
        let back = viewport.screen_to_world(panel(), screen);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn wheel_zoom_keeps_pointer_anchor() {
        let mut viewport = Viewport::new();
        let pointer = pos2(150.0, 450.0);
        let anchor = viewport.screen_to_world(panel(), pointer);
        viewport.zoom_at(panel(), pointer, 120.0);
        let after = viewport.screen_to_world(panel(), pointer);
        assert!((after - anchor).length() < 1e-3);
        assert!(viewport.zoom() > 1.0);
    }

    #[test]
    fn focus_animates_to_center_on_target() {
        let mut viewport = Viewport::new();
        let target = vec2(120.0, -60.0);
        viewport.focus_on(target, FOCUS_ZOOM);
        assert!(viewport.is_animating());

        let mut frames = 0;
        while viewport.animate(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 1_000, "focus animation never settled");
        }

        assert!(!viewport.is_animating());
        assert!((viewport.zoom() - FOCUS_ZOOM).abs() < 1e-4);
        let landed = viewport.world_to_screen(panel(), target);
        assert!((landed - panel().center()).length() < 1e-2);
        // Roughly 750ms of 60fps frames.
        assert!((40..=50).contains(&frames));
    }

    #[test]
    fn gesture_cancels_focus_animation() {
        let mut viewport = Viewport::new();
        viewport.focus_on(vec2(500.0, 500.0), 2.0);
        viewport.animate(0.1);
        viewport.pan_by(vec2(5.0, 5.0));
        assert!(!viewport.is_animating());
        assert!(!viewport.animate(0.1));
    }

    #[test]
    fn transform_persists_until_reset() {
        let mut viewport = Viewport::new();
        viewport.pan_by(vec2(10.0, 20.0));
        assert_ne!(viewport.transform(), Transform::default());
        viewport.reset();
        assert_eq!(viewport.transform(), Transform::default());
    }
}
