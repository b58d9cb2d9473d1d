//! Cursor overlay and tap-to-activate dispatch.
//!
//! The cursor is drawn into a small overlay in overlay pixels, while
//! activations are dispatched in full viewport pixels so downstream picking
//! sees the same coordinates as an ordinary mouse double-click.

use crate::{
    config::CursorConfig,
    constants::{CURSOR_INNER_RADIUS, CURSOR_OUTER_RADIUS, NUM_HAND_LANDMARKS},
    controller::GestureObserver,
    landmarks::{HandObservation, Point2D, HAND_CONNECTIONS},
    utils::safe_cast::normalized_to_pixel,
};
use std::{cell::RefCell, rc::Rc, time::Instant};

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPoint {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

/// Paint styles the overlay uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Brush {
    /// Outlined cursor disc
    CursorRing,
    /// Cursor center dot
    CursorDot,
    /// Hand landmark joint
    Joint,
    /// Hand skeleton bone
    Bone,
}

/// Drawing surface of the cursor overlay
pub trait OverlaySurface {
    /// Erase everything
    fn clear(&mut self);

    /// Fill a circle
    fn fill_circle(&mut self, center: PixelPoint, radius: i32, brush: Brush);

    /// Draw a straight line
    fn line(&mut self, from: PixelPoint, to: PixelPoint, brush: Brush);
}

impl<S: OverlaySurface> OverlaySurface for Rc<RefCell<S>> {
    fn clear(&mut self) {
        self.borrow_mut().clear();
    }

    fn fill_circle(&mut self, center: PixelPoint, radius: i32, brush: Brush) {
        self.borrow_mut().fill_circle(center, radius, brush);
    }

    fn line(&mut self, from: PixelPoint, to: PixelPoint, brush: Brush) {
        self.borrow_mut().line(from, to, brush);
    }
}

/// One recorded drawing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// Surface cleared
    Clear,
    /// Circle filled
    Circle {
        /// Center
        center: PixelPoint,
        /// Radius in pixels
        radius: i32,
        /// Style
        brush: Brush,
    },
    /// Line drawn
    Line {
        /// Start
        from: PixelPoint,
        /// End
        to: PixelPoint,
        /// Style
        brush: Brush,
    },
}

/// Surface that records the commands of the current overlay frame
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl CommandBuffer {
    /// Commands drawn since the last clear
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// How often the surface was cleared
    #[must_use]
    pub const fn clears(&self) -> usize {
        self.clears
    }

    /// Center of the last cursor ring drawn, if any
    #[must_use]
    pub fn cursor(&self) -> Option<PixelPoint> {
        self.commands.iter().rev().find_map(|command| match command {
            DrawCommand::Circle {
                center,
                brush: Brush::CursorRing,
                ..
            } => Some(*center),
            _ => None,
        })
    }
}

impl OverlaySurface for CommandBuffer {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: PixelPoint, radius: i32, brush: Brush) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            brush,
        });
    }

    fn line(&mut self, from: PixelPoint, to: PixelPoint, brush: Brush) {
        self.commands.push(DrawCommand::Line { from, to, brush });
    }
}

/// Receiver of synthesized pointer events
pub trait PointerSink {
    /// Double-click at viewport pixel coordinates
    fn double_click(&mut self, x: i32, y: i32);
}

impl<F: FnMut(i32, i32)> PointerSink for F {
    fn double_click(&mut self, x: i32, y: i32) {
        self(x, y);
    }
}

/// Draws the cursor and dispatches activations
pub struct CursorLayer<S, P> {
    surface: S,
    sink: P,
    overlay: (u32, u32),
    viewport: (u32, u32),
}

impl<S: OverlaySurface, P: PointerSink> CursorLayer<S, P> {
    /// Create a layer with overlay and viewport sizes from configuration
    pub fn new(config: &CursorConfig, surface: S, sink: P) -> Self {
        Self {
            surface,
            sink,
            overlay: (config.overlay_width, config.overlay_height),
            viewport: (config.viewport_width, config.viewport_height),
        }
    }

    /// Normalized position in overlay pixels
    #[must_use]
    pub fn to_overlay(&self, position: Point2D) -> PixelPoint {
        PixelPoint {
            x: normalized_to_pixel(position.x, self.overlay.0),
            y: normalized_to_pixel(position.y, self.overlay.1),
        }
    }

    /// Normalized position in viewport pixels
    #[must_use]
    pub fn to_viewport(&self, position: Point2D) -> PixelPoint {
        PixelPoint {
            x: normalized_to_pixel(position.x, self.viewport.0),
            y: normalized_to_pixel(position.y, self.viewport.1),
        }
    }

    /// Draw the cursor glyph at a mirrored normalized position
    pub fn draw_cursor(&mut self, position: Point2D) {
        let center = self.to_overlay(position);
        self.surface
            .fill_circle(center, CURSOR_OUTER_RADIUS, Brush::CursorRing);
        self.surface
            .fill_circle(center, CURSOR_INNER_RADIUS, Brush::CursorDot);
    }

    /// Draw a hand skeleton, mirrored like the cursor
    pub fn draw_hand(&mut self, hand: &HandObservation) {
        let mut joints = [PixelPoint::default(); NUM_HAND_LANDMARKS];
        for (joint, point) in joints.iter_mut().zip(hand.landmarks.points()) {
            *joint = self.to_overlay(point.mirrored());
        }
        for (start, end) in HAND_CONNECTIONS {
            self.surface.line(joints[start], joints[end], Brush::Bone);
        }
        for joint in joints {
            self.surface.fill_circle(joint, 1, Brush::Joint);
        }
    }
}

impl<S: OverlaySurface, P: PointerSink> GestureObserver for CursorLayer<S, P> {
    fn on_hands(&mut self, hands: &[HandObservation]) {
        self.surface.clear();
        for hand in hands {
            self.draw_hand(hand);
        }
    }

    fn on_cursor_moved(&mut self, position: Point2D) {
        self.draw_cursor(position);
    }

    fn on_activate(&mut self, position: Point2D, _at: Instant) {
        let pixel = self.to_viewport(position);
        log::info!(
            "Activation at ({:.3}, {:.3}) -> viewport ({}, {})",
            position.x,
            position.y,
            pixel.x,
            pixel.y
        );
        self.sink.double_click(pixel.x, pixel.y);
    }
}
