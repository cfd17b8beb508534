//! Driving multi-page IDE wizard flows through accessibility automation
//!
//! This crate walks an IDE extension's project-creation wizard across every
//! listed template: it resolves controls through symbolic descriptors,
//! simulates the clicks and keystrokes, invokes caller-supplied checks on
//! each wizard page, and guarantees the wizard is closed again before the
//! next template, whether the template's checks passed or not.
//!
//! The actual GUI backend is behind the [`driver::UiDriver`] seam;
//! [`driver::mock::MockHost`] ships a scripted in-memory host so the full
//! traversal is exercisable without a desktop session.

use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod descriptor;
pub mod driver;
pub mod element;
pub mod errors;
pub mod locator;
pub mod names;
pub mod registry;
pub mod report;
pub mod suite;
pub mod templates;
pub mod version;
pub mod walker;

pub use config::{QtDir, WalkerConfig};
pub use descriptor::{ControlType, Descriptor, TextMatch};
pub use driver::{ContextId, ElementId, Key, UiDriver};
pub use element::UiElement;
pub use errors::AutomationError;
pub use locator::Locator;
pub use report::{Reporter, RunReport};
pub use templates::Template;
pub use version::HostVersion;
pub use walker::{NoChecks, RunSummary, WizardObserver, WizardWalker};

/// How often [`Session::wait_until`] re-evaluates its predicate.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The entry point: a handle on one running host application.
///
/// Cloning is cheap; all clones share the underlying driver.
#[derive(Clone)]
pub struct Session {
    driver: Arc<dyn UiDriver>,
}

impl Session {
    pub fn new(driver: Arc<dyn UiDriver>) -> Self {
        Self { driver }
    }

    /// A locator for the given descriptor, carrying this session's driver.
    pub fn locator(&self, descriptor: Descriptor) -> Locator {
        Locator::new(self.driver.clone(), descriptor)
    }

    /// Non-waiting presence check.
    pub fn exists(&self, descriptor: &Descriptor) -> bool {
        self.driver.exists(descriptor)
    }

    /// Inject a native key press into the focused window.
    pub fn press_key(&self, key: Key) -> Result<(), AutomationError> {
        self.driver.press_key(key)
    }

    pub fn current_context(&self) -> ContextId {
        self.driver.current_context()
    }

    /// Re-pin execution to a previously captured application context.
    pub fn activate_context(&self, context: ContextId) -> Result<(), AutomationError> {
        self.driver.activate_context(context)
    }

    /// Poll `predicate` until it holds or `timeout` elapses. Returns whether
    /// it held.
    pub async fn wait_until<F>(&self, predicate: F, timeout: Duration) -> bool
    where
        F: Fn() -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if predicate() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}
