use std::fmt;
use std::sync::Arc;

use crate::descriptor::Descriptor;
use crate::driver::{ElementId, UiDriver};
use crate::errors::AutomationError;

/// A resolved control handle bound to the driver that produced it.
///
/// Cloning is cheap; the handle stays valid only as long as the control stays
/// on screen, and actions on a vanished control report `ElementNotFound`.
#[derive(Clone)]
pub struct UiElement {
    driver: Arc<dyn UiDriver>,
    id: ElementId,
    descriptor: Descriptor,
}

impl UiElement {
    pub(crate) fn new(driver: Arc<dyn UiDriver>, id: ElementId, descriptor: Descriptor) -> Self {
        Self {
            driver,
            id,
            descriptor,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The descriptor this element was resolved from.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn click(&self) -> Result<(), AutomationError> {
        self.driver.click(self.id)
    }

    pub fn set_text(&self, text: &str) -> Result<(), AutomationError> {
        self.driver.set_text(self.id, text)
    }

    pub fn text(&self) -> Result<String, AutomationError> {
        self.driver.read_text(self.id)
    }

    pub fn is_enabled(&self) -> Result<bool, AutomationError> {
        self.driver.is_enabled(self.id)
    }

    pub fn row_count(&self) -> Result<usize, AutomationError> {
        self.driver.row_count(self.id)
    }
}

impl fmt::Debug for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiElement")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor.to_string())
            .finish()
    }
}
