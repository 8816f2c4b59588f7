//! Device-side input handling.
//!
//! - **input**: normalized keyboard/mouse/wheel/paste/focus events
//! - **encoder**: routes device events through the engine to the PTY
//! - **selection**: drag-to-select tracking in linear cell indices
//! - **clipboard**: system clipboard access
//! - **surface**: the display surface and its crossterm implementation

pub mod clipboard;
pub mod encoder;
pub mod input;
pub mod selection;
pub mod surface;

pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use encoder::{InputEncoder, KeyOutcome};
pub use input::{DeviceEvent, InputEvent, KeyInput, Modifiers, PointerInput, WheelInput};
pub use selection::{Selection, SelectionTracker};
pub use surface::{CrosstermSurface, Surface};
