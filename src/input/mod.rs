//! Controller input handling.
//!
//! This module translates raw controller events (button edges, stick
//! deflection, laser pointer hover/click) into calls on the surface tool,
//! the sketch world and the host, and relays tool notifications to listeners.

pub mod dispatcher;
pub mod events;
pub mod relay;
pub mod strategy;

// Re-export commonly used types at module level
pub use dispatcher::{DispatcherSettings, Ignored, InputDispatcher, Intent, Outcome};
pub use events::{
    Action, ButtonEdge, Hand, InputEvent, PointerPhase, PointerTarget, SourceId, SurfaceId,
};
pub use relay::{ListenerId, Listeners};
pub use strategy::{CurveStrategy, STRATEGY_ORDER, StrategyCycle};
