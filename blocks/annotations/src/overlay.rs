//! Label markers placed over the zoom surface.

use crate::geometry::{PixelRect, ViewportPoint};
use crate::transform::ViewTransform;
use cosmoscope_atoms::categories::SpaceCategory;
use cosmoscope_atoms::labels::Label;
use std::collections::HashMap;
use std::fmt;

/// Fill alpha for marker backgrounds; borders are opaque.
const FILL_ALPHA: u8 = 0x15;

/// Opaque key of one overlay on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlayId(String);

impl OverlayId {
    pub fn for_label(label_id: &str) -> Self {
        Self(format!("label-{}", label_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Overlay primitive of the external deep-zoom viewer.
pub trait OverlaySurface {
    fn add_overlay(&mut self, id: &OverlayId, rect: PixelRect, style: &MarkerStyle);
    fn update_overlay(&mut self, id: &OverlayId, rect: PixelRect);
    fn remove_overlay(&mut self, id: &OverlayId);
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub category: SpaceCategory,
    pub border_color: String,
    pub fill_color: String,
    pub caption: String,
    pub icon: &'static str,
}

impl MarkerStyle {
    pub fn for_label(label: &Label) -> Self {
        let color = label.category.color();
        Self {
            category: label.category,
            border_color: color.hex(),
            fill_color: color.hex_with_alpha(FILL_ALPHA),
            caption: label.title.clone(),
            icon: label.category.icon(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub label: Label,
    pub overlay_id: OverlayId,
    pub style: MarkerStyle,
    pub screen_rect: PixelRect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
}

/// Keeps one marker per label of a single asset in step with the surface.
///
/// Labels are only ever projected in the coordinate space of `asset_id`;
/// labels belonging to another asset are refused.
#[derive(Debug)]
pub struct OverlayRenderer {
    asset_id: String,
    markers: HashMap<String, Marker>,
    // Insertion order; later markers sit on top for hit testing.
    order: Vec<String>,
}

impl OverlayRenderer {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            markers: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker(&self, label_id: &str) -> Option<&Marker> {
        self.markers.get(label_id)
    }

    /// Markers bottom to top.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.order.iter().filter_map(|id| self.markers.get(id))
    }

    /// Adds a marker, or replaces it when the stored label differs.
    /// Returns false when the label belongs to another asset or is already shown unchanged.
    pub fn add_label<S: OverlaySurface + ?Sized>(
        &mut self,
        surface: &mut S,
        transform: &ViewTransform,
        label: Label,
    ) -> bool {
        if label.asset_id != self.asset_id {
            tracing::warn!(
                label_id = %label.id,
                label_asset = %label.asset_id,
                shown_asset = %self.asset_id,
                "refusing to project label of another asset"
            );
            return false;
        }

        if let Some(existing) = self.markers.get(&label.id) {
            if existing.label == label {
                return false;
            }
            self.remove_label(surface, &label.id);
        }

        let overlay_id = OverlayId::for_label(&label.id);
        let style = MarkerStyle::for_label(&label);
        let screen_rect = transform.rect_to_viewport(&label.rect);
        surface.add_overlay(&overlay_id, screen_rect, &style);

        self.order.push(label.id.clone());
        self.markers.insert(
            label.id.clone(),
            Marker {
                label,
                overlay_id,
                style,
                screen_rect,
            },
        );
        true
    }

    pub fn remove_label<S: OverlaySurface + ?Sized>(&mut self, surface: &mut S, label_id: &str) -> Option<Label> {
        let marker = self.markers.remove(label_id)?;
        self.order.retain(|id| id != label_id);
        surface.remove_overlay(&marker.overlay_id);
        Some(marker.label)
    }

    /// Brings the marker set in line with `labels`, touching only what changed.
    pub fn sync_labels<S: OverlaySurface + ?Sized>(
        &mut self,
        surface: &mut S,
        transform: &ViewTransform,
        labels: &[Label],
    ) -> SyncStats {
        let mut stats = SyncStats::default();

        let stale: Vec<String> = self
            .order
            .iter()
            .filter(|id| !labels.iter().any(|l| &l.id == *id))
            .cloned()
            .collect();
        for id in stale {
            if self.remove_label(surface, &id).is_some() {
                stats.removed += 1;
            }
        }

        for label in labels {
            if self.markers.get(&label.id).is_some_and(|m| &m.label == label) {
                stats.kept += 1;
            } else if self.add_label(surface, transform, label.clone()) {
                stats.added += 1;
            }
        }

        tracing::debug!(asset_id = %self.asset_id, ?stats, "overlay sync");
        stats
    }

    /// Re-projects every marker after a pan, zoom or resize.
    pub fn reproject<S: OverlaySurface + ?Sized>(&mut self, surface: &mut S, transform: &ViewTransform) {
        for id in &self.order {
            if let Some(marker) = self.markers.get_mut(id) {
                let rect = transform.rect_to_viewport(&marker.label.rect);
                if rect != marker.screen_rect {
                    marker.screen_rect = rect;
                    surface.update_overlay(&marker.overlay_id, rect);
                }
            }
        }
    }

    pub fn clear<S: OverlaySurface + ?Sized>(&mut self, surface: &mut S) {
        for id in self.order.drain(..) {
            if let Some(marker) = self.markers.remove(&id) {
                surface.remove_overlay(&marker.overlay_id);
            }
        }
    }

    /// Topmost marker under `point`.
    pub fn hit_test(&self, point: ViewportPoint) -> Option<&Label> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.markers.get(id))
            .find(|m| m.screen_rect.contains(point))
            .map(|m| &m.label)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::ViewportSize;
    use cosmoscope_atoms::labels::NormRect;

    /// Surface double that records overlay calls.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub overlays: HashMap<OverlayId, (PixelRect, MarkerStyle)>,
        pub adds: usize,
        pub updates: usize,
        pub removes: usize,
    }

    impl OverlaySurface for RecordingSurface {
        fn add_overlay(&mut self, id: &OverlayId, rect: PixelRect, style: &MarkerStyle) {
            self.adds += 1;
            self.overlays.insert(id.clone(), (rect, style.clone()));
        }

        fn update_overlay(&mut self, id: &OverlayId, rect: PixelRect) {
            self.updates += 1;
            if let Some(entry) = self.overlays.get_mut(id) {
                entry.0 = rect;
            }
        }

        fn remove_overlay(&mut self, id: &OverlayId) {
            self.removes += 1;
            self.overlays.remove(id);
        }
    }

    pub(crate) fn label(id: &str, asset_id: &str, rect: NormRect, category: SpaceCategory) -> Label {
        Label {
            id: id.to_string(),
            asset_id: asset_id.to_string(),
            rect,
            title: format!("Label {}", id),
            note: None,
            category,
            confidence: 0.9,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        }
    }

    fn unit_transform() -> ViewTransform {
        ViewTransform::new(ViewportPoint::new(0.0, 0.0), 1.0, ViewportSize::new(1000.0, 1000.0)).unwrap()
    }

    #[test]
    fn zooming_repositions_marker_without_duplicating() {
        let mut surface = RecordingSurface::default();
        let mut transform = unit_transform();
        let mut renderer = OverlayRenderer::new("A");
        let galaxy = label("L1", "A", NormRect::new(0.2, 0.3, 0.4, 0.3), SpaceCategory::Galaxy);

        renderer.sync_labels(&mut surface, &transform, &[galaxy.clone()]);
        assert_eq!(surface.overlays.len(), 1);
        let (rect, style) = surface.overlays[&OverlayId::for_label("L1")].clone();
        assert_eq!(style.border_color, "#8A2BE2");
        assert_eq!(style.icon, SpaceCategory::Galaxy.icon());
        assert!((rect.x - 200.0).abs() < 1e-9);

        transform.zoom_by(2.0, ViewportPoint::new(0.0, 0.0)).unwrap();
        renderer.reproject(&mut surface, &transform);

        assert_eq!(surface.overlays.len(), 1);
        assert_eq!(surface.adds, 1);
        assert_eq!(surface.updates, 1);
        let rect = surface.overlays[&OverlayId::for_label("L1")].0;
        assert!((rect.x - 400.0).abs() < 1e-9);
        assert!((rect.width - 800.0).abs() < 1e-9);
    }

    #[test]
    fn sync_only_touches_changed_markers() {
        let mut surface = RecordingSurface::default();
        let transform = unit_transform();
        let mut renderer = OverlayRenderer::new("A");
        let a = label("a", "A", NormRect::new(0.1, 0.1, 0.1, 0.1), SpaceCategory::Star);
        let b = label("b", "A", NormRect::new(0.5, 0.5, 0.1, 0.1), SpaceCategory::Moon);
        let c = label("c", "A", NormRect::new(0.7, 0.1, 0.1, 0.1), SpaceCategory::Comet);

        renderer.sync_labels(&mut surface, &transform, &[a.clone(), b.clone()]);
        let stats = renderer.sync_labels(&mut surface, &transform, &[b.clone(), c.clone()]);

        assert_eq!(stats, SyncStats { added: 1, removed: 1, kept: 1 });
        assert_eq!(surface.adds, 3);
        assert_eq!(surface.removes, 1);
        assert!(renderer.marker("a").is_none());
        assert!(renderer.marker("c").is_some());
    }

    #[test]
    fn labels_of_other_assets_are_refused() {
        let mut surface = RecordingSurface::default();
        let mut renderer = OverlayRenderer::new("A");
        let foreign = label("x", "B", NormRect::new(0.1, 0.1, 0.1, 0.1), SpaceCategory::Planet);

        assert!(!renderer.add_label(&mut surface, &unit_transform(), foreign));
        assert!(renderer.is_empty());
        assert_eq!(surface.adds, 0);
    }

    #[test]
    fn unrecognized_category_uses_fallback_style() {
        let mut surface = RecordingSurface::default();
        let mut renderer = OverlayRenderer::new("A");
        let plain = label("p", "A", NormRect::new(0.1, 0.1, 0.1, 0.1), SpaceCategory::parse("Quasar"));

        renderer.add_label(&mut surface, &unit_transform(), plain);
        let style = &renderer.marker("p").unwrap().style;
        assert_eq!(style.border_color, "#00FF00");
        assert_eq!(style.fill_color, "#00FF0015");
        assert_eq!(style.icon, "\u{1F50D}");
    }

    #[test]
    fn hit_test_prefers_topmost_marker() {
        let mut surface = RecordingSurface::default();
        let transform = unit_transform();
        let mut renderer = OverlayRenderer::new("A");
        let under = label("under", "A", NormRect::new(0.1, 0.1, 0.5, 0.5), SpaceCategory::Galaxy);
        let over = label("over", "A", NormRect::new(0.2, 0.2, 0.1, 0.1), SpaceCategory::Star);
        renderer.sync_labels(&mut surface, &transform, &[under, over]);

        assert_eq!(renderer.hit_test(ViewportPoint::new(250.0, 250.0)).unwrap().id, "over");
        assert_eq!(renderer.hit_test(ViewportPoint::new(500.0, 500.0)).unwrap().id, "under");
        assert!(renderer.hit_test(ViewportPoint::new(900.0, 900.0)).is_none());
    }

    #[test]
    fn clear_removes_every_overlay() {
        let mut surface = RecordingSurface::default();
        let transform = unit_transform();
        let mut renderer = OverlayRenderer::new("A");
        renderer.sync_labels(
            &mut surface,
            &transform,
            &[
                label("a", "A", NormRect::new(0.1, 0.1, 0.1, 0.1), SpaceCategory::Star),
                label("b", "A", NormRect::new(0.3, 0.3, 0.1, 0.1), SpaceCategory::Nebula),
            ],
        );
        renderer.clear(&mut surface);
        assert!(renderer.is_empty());
        assert!(surface.overlays.is_empty());
    }
}
