use std::sync::Arc;
use std::time::Duration;

use tokio::task;
use tracing::{debug, instrument};

use crate::descriptor::Descriptor;
use crate::driver::UiDriver;
use crate::element::UiElement;
use crate::errors::AutomationError;

// Default timeout if none is specified on the locator itself
const DEFAULT_LOCATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// A high-level API for waiting on and resolving a single control.
///
/// The underlying driver call is blocking (it polls until the control shows
/// up), so [`Locator::wait`] runs it on a blocking-safe thread rather than
/// stalling the async runtime.
#[derive(Clone)]
pub struct Locator {
    driver: Arc<dyn UiDriver>,
    descriptor: Descriptor,
    timeout: Duration, // Default timeout for this locator instance
}

impl Locator {
    pub(crate) fn new(driver: Arc<dyn UiDriver>, descriptor: Descriptor) -> Self {
        Self {
            driver,
            descriptor,
            timeout: DEFAULT_LOCATOR_TIMEOUT,
        }
    }

    /// Set a default timeout for waiting operations on this locator instance.
    /// Used whenever no specific timeout is passed to [`Locator::wait`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scope the descriptor to a container control.
    pub fn within(mut self, container: Descriptor) -> Self {
        self.descriptor = self.descriptor.within(container);
        self
    }

    /// Pick the n-th (1-based) matching sibling.
    pub fn occurrence(mut self, index: u32) -> Self {
        self.descriptor = self.descriptor.occurrence(index);
        self
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Non-waiting presence check.
    pub fn exists(&self) -> bool {
        self.driver.exists(&self.descriptor)
    }

    /// Wait for a matching control to appear, up to the specified timeout.
    /// If no timeout is provided, uses the locator's default timeout.
    #[instrument(level = "debug", skip(self, timeout))]
    pub async fn wait(&self, timeout: Option<Duration>) -> Result<UiElement, AutomationError> {
        let effective_timeout = timeout.unwrap_or(self.timeout);
        debug!(
            descriptor = %self.descriptor,
            ?effective_timeout,
            "waiting for control"
        );

        // The driver's find_element already polls with its own deadline, so it
        // must not be wrapped in another async loop; run it on a blocking
        // thread instead.
        let driver = self.driver.clone();
        let descriptor = self.descriptor.clone();
        let label = self.descriptor.to_string();

        let id = task::spawn_blocking(move || driver.find_element(&descriptor, effective_timeout))
            .await
            .map_err(|e| AutomationError::BackendError(format!("task join error: {e}")))?
            .map_err(|e| {
                // The driver reports ElementNotFound when its deadline passes;
                // surface that as the more specific Timeout.
                if let AutomationError::ElementNotFound(inner) = e {
                    AutomationError::Timeout(format!(
                        "timed out after {effective_timeout:?} waiting for {label}: {inner}"
                    ))
                } else {
                    e
                }
            })?;

        Ok(UiElement::new(
            self.driver.clone(),
            id,
            self.descriptor.clone(),
        ))
    }
}
