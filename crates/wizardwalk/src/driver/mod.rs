//! The seam between the harness and whatever resolves and drives real controls.
//!
//! A [`UiDriver`] wraps a GUI-object-recognition backend: it turns symbolic
//! [`Descriptor`]s into opaque element handles and performs the primitive
//! actions against them. Resolution blocks the calling thread until the
//! control is found or the timeout elapses; the async [`crate::Locator`] wraps
//! those blocking calls in `spawn_blocking`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::descriptor::Descriptor;
use crate::errors::AutomationError;

pub mod mock;

/// Opaque handle to a resolved control. Only meaningful to the driver that
/// produced it, and only as long as the control stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Handle to one application context of the host. Hosts normally have exactly
/// one, but creation flows have been observed to spawn a transient second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub u32);

/// Native keys the harness is allowed to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Tab,
}

pub trait UiDriver: Send + Sync {
    /// Block until a control matching `descriptor` is present, or the timeout
    /// elapses. Timing out reports `ElementNotFound`.
    fn find_element(
        &self,
        descriptor: &Descriptor,
        timeout: Duration,
    ) -> Result<ElementId, AutomationError>;

    /// Non-waiting presence check.
    fn exists(&self, descriptor: &Descriptor) -> bool;

    fn click(&self, element: ElementId) -> Result<(), AutomationError>;

    fn set_text(&self, element: ElementId, text: &str) -> Result<(), AutomationError>;

    fn read_text(&self, element: ElementId) -> Result<String, AutomationError>;

    fn is_enabled(&self, element: ElementId) -> Result<bool, AutomationError>;

    /// Row count of a table or item count of a list control.
    fn row_count(&self, element: ElementId) -> Result<usize, AutomationError>;

    /// Inject a native key press into the focused window.
    fn press_key(&self, key: Key) -> Result<(), AutomationError>;

    fn current_context(&self) -> ContextId;

    /// Re-pin execution to a previously captured application context.
    fn activate_context(&self, context: ContextId) -> Result<(), AutomationError>;
}
