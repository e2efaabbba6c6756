//! One annotation viewer instance: a loaded asset, its markers, gestures and
//! the handlers registered for it.

use crate::client::{with_timeout, CatalogClient};
use crate::error::{FetchError, ViewerError, ViewerResult};
use crate::geometry::ViewportSize;
use crate::interaction::{ClickEvent, InteractionConfig, InteractionController, InteractionEvent, PointerEvent};
use crate::overlay::{OverlayRenderer, OverlaySurface};
use crate::transform::ViewTransform;
use crate::{ApplyOutcome, DeliveryStatus};
use cosmoscope_atoms::assets::{Asset, AssetDetail};
use cosmoscope_atoms::categories::SpaceCategory;
use cosmoscope_atoms::labels::service::validate_new_label;
use cosmoscope_atoms::labels::{CreateLabelPayload, Label, NormRect};
use std::time::Duration;

const ZOOM_IN_FACTOR: f64 = 1.5;
const ZOOM_OUT_FACTOR: f64 = 0.5;

pub type SelectHandler = Box<dyn FnMut(&Label) + Send>;
pub type CreateHandler = Box<dyn FnMut(NormRect) + Send>;

#[derive(Debug, Clone, PartialEq)]
pub enum AssetLoadState {
    Empty,
    Loading { asset_id: String },
    Ready,
    NotFound { asset_id: String },
    Failed { message: String, retryable: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTicket {
    generation: u64,
    asset_id: String,
}

impl AssetTicket {
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub async fn fetch<C: CatalogClient + ?Sized>(&self, client: &C, limit: Duration) -> Result<AssetDetail, FetchError> {
        with_timeout(limit, client.fetch_asset(&self.asset_id)).await
    }
}

/// A drawn label waiting for the server.
#[derive(Debug, Clone)]
pub struct PendingLabel {
    pub local_id: u64,
    pub payload: CreateLabelPayload,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone)]
pub struct LabelTicket {
    local_id: u64,
    payload: CreateLabelPayload,
}

impl LabelTicket {
    pub fn local_id(&self) -> u64 {
        self.local_id
    }

    pub async fn send<C: CatalogClient + ?Sized>(&self, client: &C, limit: Duration) -> Result<Label, FetchError> {
        with_timeout(limit, client.create_label(self.payload.clone())).await
    }
}

pub struct AnnotationViewer<S: OverlaySurface> {
    surface: S,
    viewport: ViewportSize,
    aspect: f64,
    transform: ViewTransform,
    renderer: Option<OverlayRenderer>,
    controller: InteractionController,
    asset: Option<Asset>,
    load_state: AssetLoadState,
    generation: u64,
    pending_labels: Vec<PendingLabel>,
    next_local_id: u64,
    on_select: Option<SelectHandler>,
    on_create: Option<CreateHandler>,
}

impl<S: OverlaySurface> AnnotationViewer<S> {
    pub fn new(surface: S, viewport: ViewportSize, config: InteractionConfig) -> ViewerResult<Self> {
        Ok(Self {
            surface,
            viewport,
            aspect: 1.0,
            transform: ViewTransform::fit(viewport, 1.0)?,
            renderer: None,
            controller: InteractionController::new(config),
            asset: None,
            load_state: AssetLoadState::Empty,
            generation: 0,
            pending_labels: Vec::new(),
            next_local_id: 1,
            on_select: None,
            on_create: None,
        })
    }

    /// Called with the full label when a marker is clicked.
    pub fn on_select(&mut self, handler: impl FnMut(&Label) + Send + 'static) {
        self.on_select = Some(Box::new(handler));
    }

    /// Called with each rectangle drawn over the loaded asset.
    pub fn on_create(&mut self, handler: impl FnMut(NormRect) + Send + 'static) {
        self.on_create = Some(Box::new(handler));
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn load_state(&self) -> &AssetLoadState {
        &self.load_state
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    pub fn renderer(&self) -> Option<&OverlayRenderer> {
        self.renderer.as_ref()
    }

    pub fn labels(&self) -> Vec<&Label> {
        self.renderer
            .as_ref()
            .map(|r| r.markers().map(|m| &m.label).collect())
            .unwrap_or_default()
    }

    pub fn pending_labels(&self) -> &[PendingLabel] {
        &self.pending_labels
    }

    pub fn is_drawing(&self) -> bool {
        self.controller.is_drawing()
    }

    pub fn begin_load(&mut self, asset_id: impl Into<String>) -> AssetTicket {
        let asset_id = asset_id.into();
        self.generation += 1;
        self.controller.cancel();
        self.load_state = AssetLoadState::Loading {
            asset_id: asset_id.clone(),
        };
        AssetTicket {
            generation: self.generation,
            asset_id,
        }
    }

    pub fn apply_asset(&mut self, ticket: &AssetTicket, result: Result<AssetDetail, FetchError>) -> ViewerResult<ApplyOutcome> {
        if ticket.generation != self.generation {
            tracing::warn!(asset_id = %ticket.asset_id, "discarding stale asset response");
            return Ok(ApplyOutcome::Stale);
        }

        match result {
            Ok(detail) => self.show_asset(detail)?,
            Err(FetchError::NotFound) => {
                self.unload();
                self.load_state = AssetLoadState::NotFound {
                    asset_id: ticket.asset_id.clone(),
                };
            }
            Err(err) => {
                tracing::warn!(asset_id = %ticket.asset_id, error = %err, "asset load failed");
                self.unload();
                self.load_state = AssetLoadState::Failed {
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                };
            }
        }
        Ok(ApplyOutcome::Applied)
    }

    fn show_asset(&mut self, detail: AssetDetail) -> ViewerResult<()> {
        let AssetDetail { asset, labels } = detail;
        let same_asset = self.asset.as_ref().is_some_and(|a| a.id == asset.id);
        if !same_asset {
            self.unload();
            self.aspect = aspect_of(&asset);
            self.transform = ViewTransform::fit(self.viewport, self.aspect)?;
        }

        let renderer = self.renderer.get_or_insert_with(|| OverlayRenderer::new(asset.id.clone()));
        renderer.sync_labels(&mut self.surface, &self.transform, &labels);

        tracing::info!(asset_id = %asset.id, labels = labels.len(), "asset displayed");
        self.asset = Some(asset);
        self.load_state = AssetLoadState::Ready;
        Ok(())
    }

    /// Input only reaches an asset that finished loading and is still current.
    fn is_interactive(&self) -> bool {
        self.asset.is_some() && self.load_state == AssetLoadState::Ready
    }

    fn unload(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.clear(&mut self.surface);
        }
        self.asset = None;
        self.pending_labels.clear();
    }

    /// Starts a load and waits for it.
    pub async fn load<C: CatalogClient + ?Sized>(
        &mut self,
        client: &C,
        asset_id: &str,
        limit: Duration,
    ) -> ViewerResult<ApplyOutcome> {
        let ticket = self.begin_load(asset_id);
        let result = ticket.fetch(client, limit).await;
        self.apply_asset(&ticket, result)
    }

    pub fn zoom_in(&mut self) -> ViewerResult<()> {
        self.zoom_by(ZOOM_IN_FACTOR)
    }

    pub fn zoom_out(&mut self) -> ViewerResult<()> {
        self.zoom_by(ZOOM_OUT_FACTOR)
    }

    /// Zooms about the viewport center.
    pub fn zoom_by(&mut self, factor: f64) -> ViewerResult<()> {
        self.transform.zoom_by(factor, self.viewport.center())?;
        self.reproject();
        Ok(())
    }

    pub fn go_home(&mut self) -> ViewerResult<()> {
        self.transform = ViewTransform::fit(self.viewport, self.aspect)?;
        self.reproject();
        Ok(())
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.transform.pan_by(dx, dy);
        self.reproject();
    }

    pub fn resize(&mut self, viewport: ViewportSize) -> ViewerResult<()> {
        self.transform.resize(self.viewport, viewport, self.aspect)?;
        self.viewport = viewport;
        self.reproject();
        Ok(())
    }

    fn reproject(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.reproject(&mut self.surface, &self.transform);
        }
    }

    pub fn press(&mut self, event: PointerEvent) -> InteractionEvent {
        if !self.is_interactive() {
            return InteractionEvent::Ignored;
        }
        self.controller.handle_press(event, &self.transform)
    }

    pub fn release(&mut self, event: PointerEvent) -> InteractionEvent {
        let outcome = self.controller.handle_release(event, &self.transform);
        if let InteractionEvent::RectDrawn(rect) = outcome {
            if let Some(handler) = self.on_create.as_mut() {
                handler(rect);
            }
        }
        outcome
    }

    /// Selects the topmost marker under a click, if the click is a selection at all.
    pub fn click(&mut self, click: ClickEvent) -> Option<Label> {
        let point = self.controller.handle_click(click)?;
        let label = self.renderer.as_ref()?.hit_test(point)?.clone();
        tracing::debug!(label_id = %label.id, "label selected");
        if let Some(handler) = self.on_select.as_mut() {
            handler(&label);
        }
        Some(label)
    }

    /// Queues a new label on the loaded asset. Invalid input never leaves the viewer.
    pub fn stage_label(
        &mut self,
        rect: NormRect,
        title: &str,
        note: Option<String>,
        category: SpaceCategory,
    ) -> ViewerResult<LabelTicket> {
        let asset_id = self
            .asset
            .as_ref()
            .filter(|_| self.load_state == AssetLoadState::Ready)
            .map(|a| a.id.clone())
            .ok_or_else(|| ViewerError::Validation("No asset loaded".to_string()))?;

        let payload = CreateLabelPayload {
            asset_id,
            rect,
            title: title.trim().to_string(),
            note: note.filter(|n| !n.trim().is_empty()),
            category,
            confidence: None,
        };
        validate_new_label(&payload)?;

        let local_id = self.next_local_id;
        self.next_local_id += 1;
        self.pending_labels.push(PendingLabel {
            local_id,
            payload: payload.clone(),
            status: DeliveryStatus::Pending,
        });
        Ok(LabelTicket { local_id, payload })
    }

    /// Records the server's answer for a staged label; confirmed labels become markers.
    pub fn confirm_label(&mut self, ticket: &LabelTicket, result: Result<Label, FetchError>) -> ApplyOutcome {
        let Some(index) = self.pending_labels.iter().position(|p| p.local_id == ticket.local_id) else {
            return ApplyOutcome::Stale;
        };

        match result {
            Ok(label) => {
                self.pending_labels.remove(index);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.add_label(&mut self.surface, &self.transform, label);
                }
            }
            Err(err) => {
                tracing::warn!(local_id = ticket.local_id, error = %err, "label creation failed");
                self.pending_labels[index].status = DeliveryStatus::Failed;
            }
        }
        ApplyOutcome::Applied
    }

    pub fn retry_label(&mut self, local_id: u64) -> Option<LabelTicket> {
        let pending = self
            .pending_labels
            .iter_mut()
            .find(|p| p.local_id == local_id && p.status == DeliveryStatus::Failed)?;
        pending.status = DeliveryStatus::Pending;
        Some(LabelTicket {
            local_id,
            payload: pending.payload.clone(),
        })
    }
}

/// Width over height from capture metadata, square when unknown.
fn aspect_of(asset: &Asset) -> f64 {
    match (asset.capture.width, asset.capture.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => f64::from(w) / f64::from(h),
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ViewportPoint;
    use crate::interaction::Modifiers;
    use crate::overlay::tests::{label, RecordingSurface};
    use crate::overlay::OverlayId;
    use async_trait::async_trait;
    use cosmoscope_atoms::assets::CaptureInfo;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn asset(id: &str) -> Asset {
        Asset {
            id: id.to_string(),
            title: format!("Asset {}", id),
            image_descriptor_path: format!("/tiles/{}.dzi", id),
            thumbnail_path: format!("/thumbs/{}.jpg", id),
            capture: CaptureInfo {
                width: Some(2000),
                height: Some(1000),
                ..CaptureInfo::default()
            },
            meta: None,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeCatalog {
        assets: HashMap<String, AssetDetail>,
        label_error: Mutex<Option<FetchError>>,
    }

    impl FakeCatalog {
        fn with_asset(mut self, id: &str, labels: Vec<Label>) -> Self {
            self.assets.insert(id.to_string(), AssetDetail { asset: asset(id), labels });
            self
        }
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        async fn fetch_asset(&self, asset_id: &str) -> Result<AssetDetail, FetchError> {
            self.assets.get(asset_id).cloned().ok_or(FetchError::NotFound)
        }

        async fn create_label(&self, payload: CreateLabelPayload) -> Result<Label, FetchError> {
            if let Some(err) = self.label_error.lock().unwrap().clone() {
                return Err(err);
            }
            let mut created = label("new", &payload.asset_id, payload.rect, payload.category);
            created.title = payload.title;
            Ok(created)
        }
    }

    fn galaxy_catalog() -> FakeCatalog {
        FakeCatalog::default().with_asset(
            "A",
            vec![label("L1", "A", NormRect::new(0.2, 0.3, 0.4, 0.3), SpaceCategory::Galaxy)],
        )
    }

    fn viewer() -> AnnotationViewer<RecordingSurface> {
        AnnotationViewer::new(
            RecordingSurface::default(),
            ViewportSize::new(1000.0, 1000.0),
            InteractionConfig::default(),
        )
        .unwrap()
    }

    const LIMIT: Duration = Duration::from_secs(1);

    fn shift(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(1, ViewportPoint::new(x, y), Modifiers::SHIFT)
    }

    fn click_at(x: f64, y: f64) -> ClickEvent {
        ClickEvent {
            position: ViewportPoint::new(x, y),
            travel_px: 0.0,
        }
    }

    #[tokio::test]
    async fn loading_places_markers_in_the_letterboxed_image() {
        let mut viewer = viewer();
        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();

        assert_eq!(viewer.load_state(), &AssetLoadState::Ready);
        let rect = viewer.surface().overlays[&OverlayId::for_label("L1")].0;
        // 2:1 image in a square viewport sits 250px down.
        assert!((rect.x - 200.0).abs() < 1e-9);
        assert!((rect.y - 400.0).abs() < 1e-9);
        assert!((rect.width - 400.0).abs() < 1e-9);
        assert!((rect.height - 150.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn zoom_controls_move_markers_and_home_restores() {
        let mut viewer = viewer();
        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();

        viewer.zoom_in().unwrap();
        let zoomed = viewer.surface().overlays[&OverlayId::for_label("L1")].0;
        assert!((zoomed.x - 50.0).abs() < 1e-9);
        assert!((zoomed.width - 600.0).abs() < 1e-9);
        assert_eq!(viewer.surface().overlays.len(), 1);
        assert_eq!(viewer.surface().adds, 1);

        viewer.zoom_out().unwrap();
        viewer.go_home().unwrap();
        let home = viewer.surface().overlays[&OverlayId::for_label("L1")].0;
        assert!((home.x - 200.0).abs() < 1e-9);
        assert!((viewer.transform().zoom() - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn stale_asset_response_is_discarded() {
        let catalog = galaxy_catalog().with_asset(
            "B",
            vec![label("LB", "B", NormRect::new(0.5, 0.5, 0.1, 0.1), SpaceCategory::Planet)],
        );
        let mut viewer = viewer();
        let first = viewer.begin_load("A");
        let second = viewer.begin_load("B");

        let b = second.fetch(&catalog, LIMIT).await;
        assert_eq!(viewer.apply_asset(&second, b).unwrap(), ApplyOutcome::Applied);
        let a = first.fetch(&catalog, LIMIT).await;
        assert_eq!(viewer.apply_asset(&first, a).unwrap(), ApplyOutcome::Stale);

        assert_eq!(viewer.asset().map(|a| a.id.as_str()), Some("B"));
        let labels = viewer.labels();
        let ids: Vec<&str> = labels.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["LB"]);
        assert!(!viewer.surface().overlays.contains_key(&OverlayId::for_label("L1")));
    }

    #[tokio::test]
    async fn switching_assets_clears_previous_markers() {
        let catalog = galaxy_catalog().with_asset("B", Vec::new());
        let mut viewer = viewer();
        viewer.load(&catalog, "A", LIMIT).await.unwrap();
        viewer.load(&catalog, "B", LIMIT).await.unwrap();
        assert!(viewer.surface().overlays.is_empty());
    }

    #[tokio::test]
    async fn missing_asset_shows_not_found() {
        let mut viewer = viewer();
        viewer.load(&galaxy_catalog(), "nope", LIMIT).await.unwrap();
        assert_eq!(
            viewer.load_state(),
            &AssetLoadState::NotFound {
                asset_id: "nope".to_string()
            }
        );
        assert!(viewer.asset().is_none());
    }

    #[tokio::test]
    async fn drawing_reports_rectangles_to_this_viewer_only() {
        let drawn_a = Arc::new(Mutex::new(Vec::new()));
        let drawn_b = Arc::new(Mutex::new(Vec::new()));

        let mut viewer_a = viewer();
        let mut viewer_b = viewer();
        let sink = drawn_a.clone();
        viewer_a.on_create(move |rect| sink.lock().unwrap().push(rect));
        let sink = drawn_b.clone();
        viewer_b.on_create(move |rect| sink.lock().unwrap().push(rect));

        viewer_a.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();
        viewer_b.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();

        viewer_a.press(shift(100.0, 300.0));
        assert!(viewer_a.is_drawing());
        viewer_a.release(shift(500.0, 450.0));
        assert!(!viewer_a.is_drawing());

        // Too small to count.
        viewer_a.press(shift(100.0, 300.0));
        viewer_a.release(shift(101.0, 301.0));

        let drawn = drawn_a.lock().unwrap();
        assert_eq!(drawn.len(), 1);
        assert!((drawn[0].x - 0.1).abs() < 1e-9);
        assert!((drawn[0].y - 0.1).abs() < 1e-9);
        assert!((drawn[0].w - 0.4).abs() < 1e-9);
        assert!((drawn[0].h - 0.3).abs() < 1e-9);
        assert!(drawn_b.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_switch_leaves_nothing_to_annotate() {
        let drawn = Arc::new(Mutex::new(Vec::new()));
        let mut viewer = viewer();
        let sink = drawn.clone();
        viewer.on_create(move |rect| sink.lock().unwrap().push(rect));
        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();

        let ticket = viewer.begin_load("B");
        let outcome = viewer
            .apply_asset(&ticket, Err(FetchError::Transient("503".to_string())))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(matches!(viewer.load_state(), AssetLoadState::Failed { retryable: true, .. }));
        assert!(viewer.asset().is_none());
        assert!(viewer.surface().overlays.is_empty());

        assert_eq!(viewer.press(shift(100.0, 300.0)), InteractionEvent::Ignored);
        viewer.release(shift(500.0, 450.0));
        assert!(drawn.lock().unwrap().is_empty());
        assert!(matches!(
            viewer.stage_label(NormRect::new(0.1, 0.1, 0.2, 0.2), "Jet", None, SpaceCategory::Galaxy),
            Err(ViewerError::Validation(_))
        ));
        assert!(viewer.pending_labels().is_empty());
    }

    #[tokio::test]
    async fn input_waits_while_another_asset_loads() {
        let mut viewer = viewer();
        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();
        viewer.begin_load("B");

        assert_eq!(viewer.press(shift(100.0, 300.0)), InteractionEvent::Ignored);
        assert!(viewer
            .stage_label(NormRect::new(0.1, 0.1, 0.2, 0.2), "Jet", None, SpaceCategory::Galaxy)
            .is_err());
    }

    #[tokio::test]
    async fn press_before_load_is_ignored() {
        let mut viewer = viewer();
        assert_eq!(viewer.press(shift(10.0, 10.0)), InteractionEvent::Ignored);
        assert!(!viewer.is_drawing());
    }

    #[tokio::test]
    async fn clicking_a_marker_selects_its_label() {
        let selected = Arc::new(Mutex::new(Vec::new()));
        let mut viewer = viewer();
        let sink = selected.clone();
        viewer.on_select(move |label: &Label| sink.lock().unwrap().push(label.id.clone()));
        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();

        let hit = viewer.click(click_at(300.0, 450.0));
        assert_eq!(hit.map(|l| l.category), Some(SpaceCategory::Galaxy));
        assert!(viewer.click(click_at(900.0, 900.0)).is_none());
        assert_eq!(selected.lock().unwrap().as_slice(), ["L1".to_string()]);
    }

    #[tokio::test]
    async fn click_ending_a_drag_over_a_marker_does_not_select() {
        let selected = Arc::new(Mutex::new(0usize));
        let mut viewer = viewer();
        let sink = selected.clone();
        viewer.on_select(move |_: &Label| *sink.lock().unwrap() += 1);
        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();

        viewer.press(shift(250.0, 420.0));
        viewer.release(shift(350.0, 500.0));
        assert!(viewer.click(click_at(350.0, 500.0)).is_none());
        assert_eq!(*selected.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn confirmed_label_becomes_a_marker() {
        let catalog = galaxy_catalog();
        let mut viewer = viewer();
        viewer.load(&catalog, "A", LIMIT).await.unwrap();

        let ticket = viewer
            .stage_label(NormRect::new(0.6, 0.6, 0.2, 0.2), " Dust lane ", None, SpaceCategory::Nebula)
            .unwrap();
        assert_eq!(viewer.pending_labels()[0].status, DeliveryStatus::Pending);

        let result = ticket.send(&catalog, LIMIT).await;
        assert_eq!(viewer.confirm_label(&ticket, result), ApplyOutcome::Applied);
        assert!(viewer.pending_labels().is_empty());
        assert_eq!(viewer.surface().overlays.len(), 2);
        let created = viewer.renderer().unwrap().marker("new").unwrap();
        assert_eq!(created.label.title, "Dust lane");
    }

    #[tokio::test]
    async fn failed_label_is_kept_for_retry() {
        let catalog = galaxy_catalog();
        *catalog.label_error.lock().unwrap() = Some(FetchError::Transient("503".to_string()));
        let mut viewer = viewer();
        viewer.load(&catalog, "A", LIMIT).await.unwrap();

        let ticket = viewer
            .stage_label(NormRect::new(0.6, 0.6, 0.2, 0.2), "Dust lane", None, SpaceCategory::Nebula)
            .unwrap();
        let result = ticket.send(&catalog, LIMIT).await;
        viewer.confirm_label(&ticket, result);
        assert_eq!(viewer.pending_labels()[0].status, DeliveryStatus::Failed);

        *catalog.label_error.lock().unwrap() = None;
        let retry = viewer.retry_label(ticket.local_id()).unwrap();
        let result = retry.send(&catalog, LIMIT).await;
        viewer.confirm_label(&retry, result);
        assert!(viewer.pending_labels().is_empty());
    }

    #[tokio::test]
    async fn invalid_labels_are_not_staged() {
        let mut viewer = viewer();
        assert!(matches!(
            viewer.stage_label(NormRect::new(0.1, 0.1, 0.1, 0.1), "x", None, SpaceCategory::Star),
            Err(ViewerError::Validation(_))
        ));

        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();
        assert!(viewer
            .stage_label(NormRect::new(0.9, 0.9, 0.2, 0.2), "Overhang", None, SpaceCategory::Star)
            .is_err());
        assert!(viewer
            .stage_label(NormRect::new(0.1, 0.1, 0.1, 0.1), "  ", None, SpaceCategory::Star)
            .is_err());
        assert!(viewer.pending_labels().is_empty());
    }

    #[tokio::test]
    async fn resize_keeps_markers_attached() {
        let mut viewer = viewer();
        viewer.load(&galaxy_catalog(), "A", LIMIT).await.unwrap();
        viewer.resize(ViewportSize::new(2000.0, 1000.0)).unwrap();

        let rect = viewer.surface().overlays[&OverlayId::for_label("L1")].0;
        let expected = viewer.transform().rect_to_viewport(&NormRect::new(0.2, 0.3, 0.4, 0.3));
        assert_eq!(rect, expected);
        assert_eq!(viewer.surface().overlays.len(), 1);
    }
}
