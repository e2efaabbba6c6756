//! Draw and select gestures on the viewer surface.
//!
//! Only modifier-qualified presses start a draw; everything else belongs to
//! the surface's own pan/zoom handling. Gestures are single-pointer: while a
//! draw is in progress, presses and releases from other pointers are ignored.

use crate::geometry::{ImagePoint, ViewportPoint};
use crate::transform::ViewTransform;
use cosmoscope_atoms::labels::NormRect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Key that turns a press into a draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawModifier {
    #[default]
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl DrawModifier {
    pub fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Shift => modifiers.shift,
            Self::Ctrl => modifiers.ctrl,
            Self::Alt => modifiers.alt,
            Self::Meta => modifiers.meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub position: ViewportPoint,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(pointer_id: u32, position: ViewportPoint, modifiers: Modifiers) -> Self {
        Self {
            pointer_id,
            position,
            modifiers,
        }
    }
}

/// A click as reported by the surface, with how far the pointer moved between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub position: ViewportPoint,
    pub travel_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Minimum normalized width and height of a drawn rectangle.
    pub min_rect_size: f64,
    /// Pointer travel beyond which a click is treated as a pan.
    pub click_tolerance_px: f64,
    pub draw_modifier: DrawModifier,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_rect_size: 0.002,
            click_tolerance_px: 5.0,
            draw_modifier: DrawModifier::Shift,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Drawing {
        pointer_id: u32,
        anchor: ImagePoint,
        anchor_px: ViewportPoint,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// Left to the surface's own handling.
    Ignored,
    DrawStarted { anchor: ImagePoint },
    /// A finished rectangle, already clamped to the image.
    RectDrawn(NormRect),
    /// Too small to be intentional.
    DrawDiscarded(NormRect),
}

#[derive(Debug)]
pub struct InteractionController {
    config: InteractionConfig,
    state: GestureState,
    swallow_next_click: bool,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            swallow_next_click: false,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, GestureState::Drawing { .. })
    }

    pub fn handle_press(&mut self, event: PointerEvent, transform: &ViewTransform) -> InteractionEvent {
        if self.is_drawing() {
            return InteractionEvent::Ignored;
        }
        if !self.config.draw_modifier.is_held(event.modifiers) {
            // A plain press starts a fresh gesture, so a click owed to an earlier draw is void.
            self.swallow_next_click = false;
            return InteractionEvent::Ignored;
        }

        let anchor = transform.to_normalized(event.position);
        self.state = GestureState::Drawing {
            pointer_id: event.pointer_id,
            anchor,
            anchor_px: event.position,
        };
        self.swallow_next_click = false;
        tracing::debug!(pointer_id = event.pointer_id, x = anchor.x, y = anchor.y, "draw started");
        InteractionEvent::DrawStarted { anchor }
    }

    pub fn handle_release(&mut self, event: PointerEvent, transform: &ViewTransform) -> InteractionEvent {
        let GestureState::Drawing { pointer_id, anchor, .. } = self.state else {
            return InteractionEvent::Ignored;
        };
        if pointer_id != event.pointer_id {
            return InteractionEvent::Ignored;
        }

        self.state = GestureState::Idle;
        self.swallow_next_click = true;

        let end = transform.to_normalized(event.position);
        let rect = NormRect::from_corners(anchor.x, anchor.y, end.x, end.y).clamp_to_unit();

        if rect.w < self.config.min_rect_size || rect.h < self.config.min_rect_size {
            tracing::debug!(w = rect.w, h = rect.h, "draw discarded below minimum size");
            return InteractionEvent::DrawDiscarded(rect);
        }

        tracing::debug!(x = rect.x, y = rect.y, w = rect.w, h = rect.h, "rectangle drawn");
        InteractionEvent::RectDrawn(rect)
    }

    /// Decides whether a click may select a marker; returns the point to hit-test.
    pub fn handle_click(&mut self, click: ClickEvent) -> Option<ViewportPoint> {
        if std::mem::take(&mut self.swallow_next_click) {
            return None;
        }
        if self.is_drawing() || click.travel_px > self.config.click_tolerance_px {
            return None;
        }
        Some(click.position)
    }

    /// Abandons a draw in progress, e.g. when the pointer leaves the surface.
    pub fn cancel(&mut self) {
        if self.is_drawing() {
            tracing::debug!("draw cancelled");
        }
        self.state = GestureState::Idle;
        self.swallow_next_click = false;
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}
