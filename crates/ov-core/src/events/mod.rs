//! Input events consumed by the view state
//!
//! The windowing shell translates its native pointer/wheel input into these
//! events and applies them between frames. Events only ever move view-state
//! targets; the data model never sees them.

use egui::{Pos2, Vec2};

/// A discrete pointer or wheel event, timestamped in milliseconds since
/// application start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown { pos: Pos2, time_ms: f64 },
    /// Pointer motion with no button held; drives hover tracking.
    PointerMoved { pos: Pos2, time_ms: f64 },
    /// Pointer motion with the primary button held.
    PointerDragged { pos: Pos2, delta: Vec2, time_ms: f64 },
    /// Primary button released.
    PointerUp { pos: Pos2, time_ms: f64 },
    /// Vertical wheel movement at a pointer position. Positive delta zooms
    /// out (scroll-down convention).
    Wheel { pos: Pos2, delta: f32, time_ms: f64 },
}

impl InputEvent {
    pub fn time_ms(&self) -> f64 {
        match *self {
            InputEvent::PointerDown { time_ms, .. }
            | InputEvent::PointerMoved { time_ms, .. }
            | InputEvent::PointerDragged { time_ms, .. }
            | InputEvent::PointerUp { time_ms, .. }
            | InputEvent::Wheel { time_ms, .. } => time_ms,
        }
    }
}
