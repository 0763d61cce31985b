//! Cursor proxy for the particle force model.
//!
//! Tracks the pointer in normalized device coordinates (origin at the window
//! center, y up). Leaving the window parks the proxy at a sentinel far
//! outside the field, which makes the repulsion term a no-op without any
//! special-casing in the force model.

use glam::{Vec2, Vec3};
use winit::event::WindowEvent;

/// NDC value the proxy rests at while the pointer is outside the window.
pub const CURSOR_SENTINEL: Vec2 = Vec2::new(-100.0, -100.0);

/// Pointer state owned by the animation session.
#[derive(Debug)]
pub struct CursorTracker {
    ndc: Vec2,
    window_size: (u32, u32),
}

impl CursorTracker {
    /// Create a tracker with the pointer at the sentinel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            ndc: CURSOR_SENTINEL,
            window_size: (width, height),
        }
    }

    /// Pointer position in normalized device coordinates (-1 to 1, y up),
    /// or [`CURSOR_SENTINEL`] while the pointer is away.
    #[inline]
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Whether the pointer is currently over the window.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.ndc != CURSOR_SENTINEL
    }

    /// The proxy lifted onto the frontal interaction plane of a field:
    /// NDC scaled by `field_scale` in x/y, at `plane_z` in front of the
    /// field's center.
    pub fn field_point(&self, field_scale: f32, plane_z: f32) -> Vec3 {
        Vec3::new(self.ndc.x * field_scale, self.ndc.y * field_scale, plane_z)
    }

    /// Update the window size used for the NDC conversion.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (w, h) = self.window_size;
                if w > 0 && h > 0 {
                    self.ndc = Vec2::new(
                        (position.x as f32 / w as f32) * 2.0 - 1.0,
                        1.0 - (position.y as f32 / h as f32) * 2.0, // y flipped
                    );
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.ndc = CURSOR_SENTINEL;
            }
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }
            _ => {}
        }
    }
}
