//! Mapping between viewport pixels and normalized image coordinates.

use crate::error::{ViewerError, ViewerResult};
use crate::geometry::{ImagePoint, PixelRect, ViewportPoint, ViewportSize};
use cosmoscope_atoms::labels::NormRect;

/// Zoom bounds for interactive zooming, relative to the fitted home view.
pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 4096.0;

/// Current pan/zoom of the viewer surface.
///
/// `pan` is the pixel position of the image's top-left corner; `base` is the
/// on-screen size of the whole image at zoom 1. A normalized point `p` lands
/// at `pan + p * base * zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pan: ViewportPoint,
    zoom: f64,
    base: ViewportSize,
}

impl ViewTransform {
    pub fn new(pan: ViewportPoint, zoom: f64, base: ViewportSize) -> ViewerResult<Self> {
        if !pan.x.is_finite() || !pan.y.is_finite() {
            return Err(ViewerError::InvalidTransform(format!("pan {:?} is not finite", pan)));
        }
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(ViewerError::InvalidTransform(format!("zoom {} must be positive", zoom)));
        }
        if !base.is_valid() {
            return Err(ViewerError::InvalidTransform(format!("image size {:?} must be positive", base)));
        }
        Ok(Self { pan, zoom, base })
    }

    /// Home view: the whole image letterboxed and centered in the viewport at zoom 1.
    /// `aspect` is image width over height.
    pub fn fit(viewport: ViewportSize, aspect: f64) -> ViewerResult<Self> {
        if !viewport.is_valid() {
            return Err(ViewerError::InvalidTransform(format!("viewport {:?} must be positive", viewport)));
        }
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(ViewerError::InvalidTransform(format!("aspect ratio {} must be positive", aspect)));
        }

        let base = if viewport.width / viewport.height > aspect {
            ViewportSize::new(viewport.height * aspect, viewport.height)
        } else {
            ViewportSize::new(viewport.width, viewport.width / aspect)
        };
        let pan = ViewportPoint::new(
            (viewport.width - base.width) / 2.0,
            (viewport.height - base.height) / 2.0,
        );
        Self::new(pan, 1.0, base)
    }

    pub fn pan(&self) -> ViewportPoint {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn base(&self) -> ViewportSize {
        self.base
    }

    fn scale(&self) -> (f64, f64) {
        (self.base.width * self.zoom, self.base.height * self.zoom)
    }

    pub fn to_normalized(&self, point: ViewportPoint) -> ImagePoint {
        let (sx, sy) = self.scale();
        ImagePoint::new((point.x - self.pan.x) / sx, (point.y - self.pan.y) / sy)
    }

    pub fn to_viewport(&self, point: ImagePoint) -> ViewportPoint {
        let (sx, sy) = self.scale();
        ViewportPoint::new(self.pan.x + point.x * sx, self.pan.y + point.y * sy)
    }

    pub fn rect_to_viewport(&self, rect: &NormRect) -> PixelRect {
        let (sx, sy) = self.scale();
        let origin = self.to_viewport(ImagePoint::new(rect.x, rect.y));
        PixelRect::new(origin.x, origin.y, rect.w * sx, rect.h * sy)
    }

    pub fn rect_to_normalized(&self, rect: &PixelRect) -> NormRect {
        let (sx, sy) = self.scale();
        let origin = self.to_normalized(ViewportPoint::new(rect.x, rect.y));
        NormRect::new(origin.x, origin.y, rect.width / sx, rect.height / sy)
    }

    /// Multiplies the zoom, keeping the image point under `anchor` where it is.
    /// The result is clamped to `MIN_ZOOM..=MAX_ZOOM`.
    pub fn zoom_by(&mut self, factor: f64, anchor: ViewportPoint) -> ViewerResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewerError::InvalidTransform(format!("zoom factor {} must be positive", factor)));
        }
        let target = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let applied = target / self.zoom;
        self.pan = ViewportPoint::new(
            anchor.x - (anchor.x - self.pan.x) * applied,
            anchor.y - (anchor.y - self.pan.y) * applied,
        );
        self.zoom = target;
        Ok(())
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan = ViewportPoint::new(self.pan.x + dx, self.pan.y + dy);
        }
    }

    /// Moves the view so `point` sits at `target` without changing zoom.
    pub fn center_on(&mut self, point: ImagePoint, target: ViewportPoint) {
        let (sx, sy) = self.scale();
        self.pan = ViewportPoint::new(target.x - point.x * sx, target.y - point.y * sy);
    }

    /// Re-fits to a resized viewport, keeping zoom and the centered image point.
    pub fn resize(&mut self, old: ViewportSize, new: ViewportSize, aspect: f64) -> ViewerResult<()> {
        let center = self.to_normalized(old.center());
        let fitted = Self::fit(new, aspect)?;
        self.base = fitted.base;
        self.center_on(center, new.center());
        Ok(())
    }
}
