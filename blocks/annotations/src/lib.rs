//! Headless annotation viewer.
//!
//! Everything here sits between an external deep-zoom surface (which owns
//! tiles, pixels and raw pointer input) and the catalog API. The surface is
//! reached only through [`overlay::OverlaySurface`]; the API only through the
//! traits in [`client`].

pub mod client;
pub mod discussion;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod overlay;
pub mod transform;
pub mod viewer;

pub use client::{CatalogClient, CommentClient, StoreClient};
pub use discussion::{DiscussionConfig, DiscussionThread, FetchTicket, PostTicket, ThreadEntry, ThreadStatus};
pub use error::{FetchError, ViewerError, ViewerResult};
pub use geometry::{ImagePoint, PixelRect, ViewportPoint, ViewportSize};
pub use interaction::{
    ClickEvent, DrawModifier, InteractionConfig, InteractionController, InteractionEvent, Modifiers, PointerEvent,
};
pub use overlay::{MarkerStyle, OverlayId, OverlayRenderer, OverlaySurface};
pub use transform::ViewTransform;
pub use viewer::{AnnotationViewer, AssetLoadState, AssetTicket, LabelTicket};

/// Whether a locally created record has been acknowledged by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Confirmed,
    Failed,
}

/// Result of handing a response back to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The response belonged to a scope that is no longer displayed.
    Stale,
}
