use crate::categories::SpaceCategory;
use serde::{Deserialize, Serialize};

/// Rectangle in normalized image space: every component is a fraction of
/// the owning asset's full width (x, w) or height (y, h).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct NormRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl NormRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Min/max bounding box of two corners, in either order.
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        let x = ax.min(bx);
        let y = ay.min(by);
        Self {
            x,
            y,
            w: ax.max(bx) - x,
            h: ay.max(by) - y,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// True when the whole rectangle lies inside [0,1]².
    pub fn is_within_unit_square(&self) -> bool {
        const EPS: f64 = 1e-9;
        self.is_finite()
            && self.x >= -EPS
            && self.y >= -EPS
            && self.w >= 0.0
            && self.h >= 0.0
            && self.right() <= 1.0 + EPS
            && self.bottom() <= 1.0 + EPS
    }

    /// Intersects the rectangle with [0,1]²; empty intersections collapse to zero size.
    pub fn clamp_to_unit(&self) -> Self {
        let x0 = self.x.clamp(0.0, 1.0);
        let y0 = self.y.clamp(0.0, 1.0);
        let x1 = self.right().clamp(0.0, 1.0);
        let y1 = self.bottom().clamp(0.0, 1.0);
        Self::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub asset_id: String,
    #[serde(flatten)]
    pub rect: NormRect,
    pub title: String,
    pub note: Option<String>,
    #[serde(default)]
    pub category: SpaceCategory,
    pub confidence: f64,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelPayload {
    pub asset_id: String,
    #[serde(flatten)]
    pub rect: NormRect,
    pub title: String,
    pub note: Option<String>,
    #[serde(default)]
    pub category: SpaceCategory,
    pub confidence: Option<f64>,
}

/// Human-drawn labels carry full confidence unless told otherwise.
pub const DEFAULT_CONFIDENCE: f64 = 1.0;
