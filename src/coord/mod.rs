//! The coordinator actor and the pieces it drives.
//!
//! - **event**: the single queue all producers feed
//! - **lifecycle**: mount, attach and teardown of one session binding
//! - **bridge**: PTY output into the engine, engine replies back to the PTY
//! - **geometry**: debounced grid-size sync
//! - **scheduler**: fixed-interval repaint
//! - **coordinator**: the loop tying it together

pub mod bridge;
pub mod coordinator;
pub mod event;
pub mod geometry;
pub mod lifecycle;
pub mod scheduler;

pub use bridge::{FlushStats, OutputBridge};
pub use coordinator::Coordinator;
pub use event::{channel, Event, EventSender, OutputSink};
pub use geometry::GeometrySync;
pub use lifecycle::{Collaborators, CoordinatorError, LifecycleState, SessionHandle};
pub use scheduler::RenderScheduler;
