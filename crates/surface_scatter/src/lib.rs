#![forbid(unsafe_code)]
//! surface_scatter: brush-driven scattering of assets onto arbitrary 3D surfaces.
//!
//! Modules:
//! - geometry: rays, tangent frames, slope and orientation helpers
//! - brush: brush configuration, asset sets, weighted selection
//! - sampling: random sources and the stable disc sample generator
//! - projection: spatial queries, surface projection, reference surfaces
//! - session: the event-driven placement state machine and commit path
pub mod brush;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod sampling;
pub mod session;

/// Convenient re-exports for common types. Import with `use surface_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::brush::assets::{AssetEntry, AssetLibrary, AssetRef, AssetSet};
    pub use crate::brush::selection::{renormalize, select_weighted};
    pub use crate::brush::{BrushConfig, MIN_RADIUS};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::frame::TangentFrame;
    pub use crate::geometry::{align_to_normal, slope_degrees, Ray};
    pub use crate::projection::surfaces::{HeightfieldSurface, PlaneSurface, SurfaceStack};
    pub use crate::projection::{
        PlacementResult, SpatialQuery, SurfaceHit, SurfaceMask, SurfacePlacement,
        SurfaceProjector,
    };
    pub use crate::sampling::samples::{PlacementSample, SampleGenerator};
    pub use crate::sampling::RandomSource;
    pub use crate::session::commit::{CommitTarget, CommittedInstance, Instantiator};
    pub use crate::session::events::{EventSink, FnSink, SessionEvent, VecSink};
    pub use crate::session::{CycleReport, InputEvent, PlacementSession, SessionState};
}
