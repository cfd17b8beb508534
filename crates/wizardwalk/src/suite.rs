//! Stock observers: the page checks shipped with the harness.
//!
//! [`NewProjectChecks`] verifies the defaults the host and the wizard derive
//! from a template; [`MissingQtChecks`] verifies the wizard's behavior when
//! no SDK has been registered at all.

use async_trait::async_trait;

use crate::config::QtDir;
use crate::errors::AutomationError;
use crate::names;
use crate::report::Reporter;
use crate::templates;
use crate::version::HostVersion;
use crate::walker::WizardObserver;
use crate::Session;

/// Verifies the names and defaults every page derives from the selected
/// template.
pub struct NewProjectChecks {
    reporter: Reporter,
    host_version: HostVersion,
}

impl NewProjectChecks {
    pub fn new(reporter: Reporter, host_version: HostVersion) -> Self {
        Self {
            reporter,
            host_version,
        }
    }
}

#[async_trait]
impl WizardObserver for NewProjectChecks {
    async fn on_new_project_dialog(
        &self,
        session: &Session,
        template: &str,
        expected_name: &str,
    ) -> Result<(), AutomationError> {
        let shown_template = session
            .locator(names::TEMPLATE_NAME_LABEL.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.compare(
            shown_template.as_str(),
            template,
            "host dialog shows the selected template name",
        );

        let project_name = session
            .locator(names::PROJECT_NAME_EDIT.clone())
            .wait(None)
            .await?
            .text()?;
        let solution_name = session
            .locator(names::SOLUTION_NAME_EDIT.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.verify(
            project_name.starts_with(expected_name),
            "project name is based on the template name",
        );
        self.reporter.verify(
            solution_name.starts_with(expected_name),
            "solution name is based on the template name",
        );
        self.reporter.compare(
            project_name.as_str(),
            solution_name.as_str(),
            "project name and solution name are the same",
        );

        // Older hosts lay this page out without the output-path preview;
        // skip the check there.
        if self.host_version.has_unified_project_flow() {
            let location = session
                .locator(names::PROJECT_LOCATION_EDIT.clone())
                .wait(None)
                .await?
                .text()?;
            let output_path = session
                .locator(names::OUTPUT_PATH_LABEL.clone())
                .wait(None)
                .await?
                .text()?;
            self.reporter.compare(
                output_path,
                format!(
                    "Project will be created in \"{location}\\{solution_name}\\{project_name}\\\""
                ),
                "output path is derived from location, solution and project",
            );
        }
        Ok(())
    }

    async fn on_wizard_page1(
        &self,
        session: &Session,
        greeting: &str,
        template: &str,
    ) -> Result<(), AutomationError> {
        let title = session
            .locator(names::WIZARD_WINDOW.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.compare(
            title,
            format!("{template} Wizard"),
            "wizard window title names the template",
        );
        let welcome = session
            .locator(names::WIZARD_WELCOME_LABEL.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.verify(
            welcome.starts_with(greeting),
            "first page greets with the template name",
        );
        Ok(())
    }

    async fn on_wizard_page2(
        &self,
        session: &Session,
        greeting: &str,
        qt_dirs: &[QtDir],
    ) -> Result<(), AutomationError> {
        let welcome = session
            .locator(names::WIZARD_WELCOME_LABEL.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.verify(
            welcome.starts_with(greeting),
            "second page greets with the template name",
        );

        let project_model = session
            .locator(names::PROJECT_MODEL_COMBO.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.compare(
            project_model.as_str(),
            "Qt Visual Studio Project (Qt/MSBuild)",
            "default project model is preselected",
        );

        let config_table = session
            .locator(names::WIZARD_CONFIG_TABLE.clone())
            .wait(None)
            .await?;
        let rows_ok = self
            .reporter
            .compare(config_table.row_count()?, 2, "two build configurations");
        if rows_ok {
            for (row, expected) in [(0, "Debug"), (1, "Release")] {
                let cell = session
                    .locator(names::config_table_cell_edit(row, 0))
                    .wait(None)
                    .await?
                    .text()?;
                self.reporter.compare(
                    cell.as_str(),
                    expected,
                    format!("configuration row {row} is {expected}"),
                );
            }
        }

        let selected = session
            .locator(names::SELECTED_VERSION_EDIT.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.verify(
            qt_dirs.iter().any(|dir| dir.name == selected),
            format!("selected Qt version {selected:?} is one of the configured versions"),
        );
        Ok(())
    }

    async fn on_wizard_page3(
        &self,
        session: &Session,
        _template: &str,
        greeting: &str,
        project_name: &str,
    ) -> Result<(), AutomationError> {
        let welcome = session
            .locator(names::WIZARD_WELCOME_LABEL.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.verify(
            welcome.starts_with(greeting),
            "third page greets with the template name",
        );

        let class_name = session
            .locator(names::CLASS_NAME_EDIT.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.compare(
            class_name.as_str(),
            project_name,
            "class name defaults to the project name",
        );
        let header = session
            .locator(names::CLASS_HEADER_EDIT.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.compare(
            header,
            format!("{project_name}.h"),
            "header file defaults to the project name",
        );
        let source = session
            .locator(names::CLASS_SOURCE_EDIT.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.compare(
            source,
            format!("{project_name}.cpp"),
            "source file defaults to the project name",
        );
        Ok(())
    }
}

/// Verifies the wizard refuses to proceed when no SDK version is registered.
/// Meant for runs with `perform_qt_version_setup` off.
pub struct MissingQtChecks {
    reporter: Reporter,
}

impl MissingQtChecks {
    pub fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }
}

#[async_trait]
impl WizardObserver for MissingQtChecks {
    async fn on_wizard_page2(
        &self,
        session: &Session,
        _greeting: &str,
        _qt_dirs: &[QtDir],
    ) -> Result<(), AutomationError> {
        let config_table = session
            .locator(names::WIZARD_CONFIG_TABLE.clone())
            .wait(None)
            .await?;
        self.reporter.compare(
            config_table.row_count()?,
            0,
            "no build configurations without a registered Qt version",
        );

        let error_label = session
            .locator(names::NO_VERSION_LABEL.clone())
            .wait(None)
            .await?
            .text()?;
        self.reporter.compare(
            error_label.as_str(),
            templates::NO_VERSION_MESSAGE,
            "wizard points at the version registration dialog",
        );

        let next = session
            .locator(names::WIZARD_NEXT_BUTTON.clone())
            .wait(None)
            .await?;
        self.reporter.verify(
            !next.is_enabled()?,
            "Next is disabled when there are no Qt versions",
        );
        let finish = session
            .locator(names::WIZARD_FINISH_BUTTON.clone())
            .wait(None)
            .await?;
        self.reporter.verify(
            !finish.is_enabled()?,
            "Finish is disabled when there are no Qt versions",
        );
        Ok(())
    }
}
