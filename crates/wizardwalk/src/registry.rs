//! Setup and teardown of the host's SDK version registry.
//!
//! Both paths go through the modal version-management dialog and are
//! responsible for leaving it closed, confirmed or cancelled, before
//! returning.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::config::QtDir;
use crate::descriptor::Descriptor;
use crate::errors::AutomationError;
use crate::names;
use crate::report::Reporter;
use crate::Session;

const MENU_TIMEOUT: Duration = Duration::from_secs(5);
const DIALOG_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);
const EDIT_SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct QtVersionRegistry {
    session: Session,
    reporter: Reporter,
}

impl QtVersionRegistry {
    pub fn new(session: Session, reporter: Reporter) -> Self {
        Self { session, reporter }
    }

    /// Add every entry of `qt_dirs` to the version registry, verifying the
    /// table grows by one row per addition, then confirm the dialog.
    ///
    /// The table must be empty on entry: leftover rows mean state from an
    /// earlier run and must not be silently tolerated. In that case the
    /// dialog is cancelled, nothing is added, and the caller gets a
    /// `PreconditionViolation` to abort the run with.
    #[instrument(skip_all, fields(count = qt_dirs.len()))]
    pub async fn configure(&self, qt_dirs: &[QtDir]) -> Result<(), AutomationError> {
        self.open_version_manager().await?;
        let table = self
            .session
            .locator(names::VERSION_TABLE.clone())
            .wait(None)
            .await?;

        let rows = table.row_count()?;
        self.reporter.compare(
            rows,
            0,
            "version table is empty before any version is added",
        );
        if rows != 0 {
            self.reporter.fatal_with(
                "unexpected version table state",
                "either leftover configuration from an earlier run or a changed host UI",
            );
            self.click(&names::OPTIONS_CANCEL_BUTTON).await?;
            self.wait_dialog_closed().await?;
            return Err(AutomationError::PreconditionViolation(format!(
                "version table held {rows} rows at setup start"
            )));
        }

        for (index, qt_dir) in qt_dirs.iter().enumerate() {
            self.click(&names::ADD_VERSION_BUTTON).await?;
            self.type_to_edit(&names::VERSION_LOCATION_EDIT, &qt_dir.path)
                .await?;
            self.type_to_edit(&names::VERSION_NAME_EDIT, &qt_dir.name)
                .await?;
            let added = index + 1;
            self.reporter.compare(
                table.row_count()?,
                added,
                format!("version table has {added} rows after adding {added} versions"),
            );
        }

        self.click(&names::OPTIONS_OK_BUTTON).await?;
        self.wait_dialog_closed().await
    }

    /// Remove every row from the version registry and confirm the dialog.
    /// Mirrors setup; the first (default) entry can only be removed once a
    /// non-default row has been selected.
    #[instrument(skip_all)]
    pub async fn clear(&self) -> Result<(), AutomationError> {
        self.open_version_manager().await?;
        let table = self
            .session
            .locator(names::VERSION_TABLE.clone())
            .wait(None)
            .await?;

        let rows = table.row_count()?;
        debug!(rows, "clearing version registry");
        if rows > 1 {
            self.session
                .locator(names::version_table_cell(1, 1))
                .wait(None)
                .await?
                .click()?;
        }
        for _ in 0..rows {
            self.click(&names::REMOVE_VERSION_BUTTON).await?;
        }
        self.reporter.compare(
            table.row_count()?,
            0,
            "version table is empty after removing all versions",
        );

        self.click(&names::OPTIONS_OK_BUTTON).await?;
        self.wait_dialog_closed().await
    }

    async fn open_version_manager(&self) -> Result<(), AutomationError> {
        self.click(&names::EXTENSIONS_MENU).await?;
        self.session
            .locator(names::TOOLS_MENU_ITEM.clone())
            .wait(Some(MENU_TIMEOUT))
            .await?
            .click()?;
        self.click(&names::QT_VERSIONS_MENU_ITEM).await
    }

    async fn click(&self, descriptor: &Descriptor) -> Result<(), AutomationError> {
        self.session
            .locator(descriptor.clone())
            .wait(None)
            .await?
            .click()
    }

    /// Click into an edit, replace its text, and wait until the control
    /// actually holds it; hosts have been seen to drop keystrokes while a
    /// row is still settling.
    async fn type_to_edit(&self, descriptor: &Descriptor, text: &str) -> Result<(), AutomationError> {
        let edit = self.session.locator(descriptor.clone()).wait(None).await?;
        edit.click()?;
        edit.set_text(text)?;
        let settled = self
            .session
            .wait_until(
                || edit.text().map(|t| t == text).unwrap_or(false),
                EDIT_SETTLE_TIMEOUT,
            )
            .await;
        if !settled {
            return Err(AutomationError::Timeout(format!(
                "edit {} did not take the typed text",
                edit.descriptor()
            )));
        }
        Ok(())
    }

    async fn wait_dialog_closed(&self) -> Result<(), AutomationError> {
        let closed = self
            .session
            .wait_until(
                || !self.session.exists(&names::OPTIONS_DIALOG),
                DIALOG_CLOSE_TIMEOUT,
            )
            .await;
        if !closed {
            return Err(AutomationError::Timeout(
                "version-management dialog did not close".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_qt_dirs;
    use crate::driver::mock::MockHost;

    fn registry(host: &std::sync::Arc<MockHost>) -> (QtVersionRegistry, Reporter) {
        let reporter = Reporter::new();
        let session = Session::new(host.clone());
        (
            QtVersionRegistry::new(session, reporter.clone()),
            reporter,
        )
    }

    #[tokio::test]
    async fn configure_then_clear_round_trips_to_an_empty_table() {
        let host = MockHost::with_defaults();
        let (registry, reporter) = registry(&host);
        let dirs = parse_qt_dirs("C:\\Qt\\6.5.0:msvc2019;C:\\Qt\\6.8.0:msvc2022_64");

        registry.configure(&dirs).await.unwrap();
        assert_eq!(host.version_names(), ["msvc2019", "msvc2022_64"]);
        assert_eq!(
            host.version_paths(),
            ["C:\\Qt\\6.5.0:msvc2019", "C:\\Qt\\6.8.0:msvc2022_64"]
        );
        assert!(!host.options_dialog_open());

        registry.clear().await.unwrap();
        assert_eq!(host.version_row_count(), 0);
        assert!(!host.options_dialog_open());
        assert!(!reporter.report().has_failures());
    }

    #[tokio::test]
    async fn single_entry_round_trip() {
        let host = MockHost::with_defaults();
        let (registry, reporter) = registry(&host);
        let dirs = parse_qt_dirs("C:\\Qt\\6.5.0:msvc2019");

        registry.configure(&dirs).await.unwrap();
        assert_eq!(host.version_row_count(), 1);
        registry.clear().await.unwrap();
        assert_eq!(host.version_row_count(), 0);
        assert!(!reporter.report().has_failures());
    }

    #[tokio::test]
    async fn nonempty_table_at_setup_start_aborts_without_additions() {
        let host = MockHost::builder()
            .preexisting_version("stale", "C:\\Qt\\stale")
            .build();
        let (registry, reporter) = registry(&host);
        let dirs = parse_qt_dirs("C:\\Qt\\6.5.0:msvc2019");

        let err = registry.configure(&dirs).await.unwrap_err();
        assert!(matches!(err, AutomationError::PreconditionViolation(_)));
        // the dialog was cancelled, nothing was added
        assert!(!host.options_dialog_open());
        assert_eq!(host.version_names(), ["stale"]);
        assert!(reporter.report().fatals > 0);
    }
}
