//! Rectpad Core Library
//!
//! Platform-agnostic data structures and gesture logic for the Rectpad
//! rectangle canvas.

pub mod config;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod store;
pub mod surface;
pub mod transform;

pub use config::SurfaceConfig;
pub use input::{InputState, MouseButton, PointerEvent};
pub use selection::{Corner, Edge, Handle, HandleKind, Selection};
pub use shapes::{RectId, Rectangle, StrokeColor};
pub use store::{DiscardReason, Discarded, RectStore, SweepOutcome};
pub use surface::{
    CanvasSurface, CursorKind, LiveNode, PointerTarget, SurfaceError, SurfaceEvent, SurfaceWarning,
    reconcile_selection,
};
pub use transform::{TransformEnd, Transformer};
