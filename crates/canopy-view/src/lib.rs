//! Per-view controller bridging a remotely rendered page and a native
//! window.
//!
//! [`ViewSurface`] owns the native window and composes the components:
//! [`BackingStoreCache`], [`TooltipController`], [`ImeController`],
//! [`FocusCoordinator`], [`PluginWindowEmbedder`] and [`InputRouter`].
//! [`ViewHost`] is the thin adapter the native event loop talks to.

pub mod backing_store;
pub mod channel;
pub mod focus;
pub mod host;
pub mod ime;
pub mod input;
pub mod metrics;
pub mod parent;
pub mod plugins;
pub mod process;
pub mod surface;
pub mod tasks;
pub mod tooltip;

pub use backing_store::BackingStoreCache;
pub use channel::{
    AccessibleHandle, CompositionCommand, RecordingRemote, RemoteLog, RemoteMessage,
    RemoteSlot, RemoteWidget, TextDirection,
};
pub use focus::FocusCoordinator;
pub use host::{Disposition, NativeEvent, ViewHost};
pub use ime::{Composition, CompositionUpdate, ImeControl, ImeController};
pub use input::{ConsumedBy, InputOutcome, InputRouter};
pub use parent::{ParentContainer, RecordingParent};
pub use plugins::{ClipGeometry, PluginGeometry, PluginWindowEmbedder};
pub use process::ProcessContext;
pub use surface::{MouseActivation, PaintOutcome, ViewSurface, Visibility};
pub use tooltip::TooltipController;
