//! A scripted in-memory host application.
//!
//! `MockHost` models just enough of the host IDE to exercise the whole
//! traversal: the version-management dialog with its table, the New Project
//! flow with a filterable template list, and the extension wizard with its
//! page enablement rules. Builder toggles reproduce the known host defects
//! (a transient second application context after Create, an unresolvable
//! wizard Cancel button) and let tests pre-populate the version table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::descriptor::{ControlType, Descriptor};
use crate::driver::{ContextId, ElementId, Key, UiDriver};
use crate::errors::AutomationError;
use crate::names;
use crate::templates;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const PRIMARY_CONTEXT: u32 = 1;
const TRANSIENT_CONTEXT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct VersionRow {
    path: String,
    name: String,
}

#[derive(Debug, Default)]
struct NewProjectState {
    filtered: bool,
    selected: Option<usize>,
    configure_page: bool,
    project_name: Option<String>,
}

#[derive(Debug)]
struct WizardState {
    template: String,
    project_name: String,
    page: u8,
}

/// What a resolved handle points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    HostWindow,
    FileMenu,
    ExtensionsMenu,
    NewMenuItem,
    ProjectMenuItem,
    ExitMenuItem,
    ToolsMenuItem,
    VersionsMenuItem,
    OptionsDialog,
    OptionsOk,
    OptionsCancel,
    VersionTable,
    VersionCell { row: usize },
    AddVersion,
    RemoveVersion,
    VersionLocationEdit,
    VersionNameEdit,
    FilterCombo,
    FilterQtItem,
    TemplateList,
    TemplateItem(u32),
    TemplateItemLabel(u32),
    HostNext,
    HostCreate,
    HostBack,
    HostClose,
    TemplateNameLabel,
    ProjectNameEdit,
    SolutionNameEdit,
    ProjectLocationEdit,
    OutputPathLabel,
    WizardWindow,
    WizardWelcome,
    WizardNext,
    WizardFinish,
    WizardCancel,
    ProjectModelCombo,
    ConfigTable,
    ConfigCellEdit { row: usize, column: usize },
    SelectedVersionEdit,
    NoVersionLabel,
    ClassNameEdit,
    ClassHeaderEdit,
    ClassSourceEdit,
}

struct Inner {
    running: bool,
    host_title: String,
    project_location: String,
    templates: Vec<String>,

    version_rows: Vec<VersionRow>,
    options_open: bool,
    options_snapshot: Option<Vec<VersionRow>>,
    nondefault_row_selected: bool,

    new_project: Option<NewProjectState>,
    new_project_opens: u32,
    wizard: Option<WizardState>,

    current_context: u32,
    spawn_second_context_on_create: bool,
    unresolvable_cancel_button: bool,
    pressed_keys: Vec<Key>,

    handles: HashMap<u64, Control>,
    next_handle: u64,
}

impl Inner {
    fn qt_configured(&self) -> bool {
        !self.version_rows.is_empty()
    }

    fn wizard_visible(&self) -> bool {
        self.wizard.is_some() && self.current_context == PRIMARY_CONTEXT
    }

    fn wizard_page(&self) -> u8 {
        self.wizard.as_ref().map(|w| w.page).unwrap_or(0)
    }
}

pub struct MockHostBuilder {
    templates: Vec<String>,
    preexisting_versions: Vec<VersionRow>,
    project_location: String,
    spawn_second_context_on_create: bool,
    unresolvable_cancel_button: bool,
}

impl Default for MockHostBuilder {
    fn default() -> Self {
        Self {
            templates: vec![
                "Qt Empty Application".into(),
                "Qt Widgets Application".into(),
                "Qt Class Library".into(),
            ],
            preexisting_versions: Vec::new(),
            project_location: "C:\\dev\\source".into(),
            spawn_second_context_on_create: false,
            unresolvable_cancel_button: false,
        }
    }
}

impl MockHostBuilder {
    pub fn templates(mut self, names: &[&str]) -> Self {
        self.templates = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Start with a row already in the version table, as a crashed earlier
    /// run would leave behind.
    pub fn preexisting_version(mut self, name: &str, path: &str) -> Self {
        self.preexisting_versions.push(VersionRow {
            path: path.into(),
            name: name.into(),
        });
        self
    }

    /// Reproduce the host defect where Create spawns a transient second
    /// application context that hides the wizard window.
    pub fn second_context_defect(mut self) -> Self {
        self.spawn_second_context_on_create = true;
        self
    }

    /// Make the wizard's Cancel button unresolvable, forcing the cancel-key
    /// fallback.
    pub fn unresolvable_cancel_button(mut self) -> Self {
        self.unresolvable_cancel_button = true;
        self
    }

    pub fn build(self) -> Arc<MockHost> {
        Arc::new(MockHost {
            inner: Mutex::new(Inner {
                running: true,
                host_title: "Start Page - Microsoft Visual Studio".into(),
                project_location: self.project_location,
                templates: self.templates,
                version_rows: self.preexisting_versions,
                options_open: false,
                options_snapshot: None,
                nondefault_row_selected: false,
                new_project: None,
                new_project_opens: 0,
                wizard: None,
                current_context: PRIMARY_CONTEXT,
                spawn_second_context_on_create: self.spawn_second_context_on_create,
                unresolvable_cancel_button: self.unresolvable_cancel_button,
                pressed_keys: Vec::new(),
                handles: HashMap::new(),
                next_handle: 1,
            }),
        })
    }
}

pub struct MockHost {
    inner: Mutex<Inner>,
}

impl MockHost {
    pub fn builder() -> MockHostBuilder {
        MockHostBuilder::default()
    }

    pub fn with_defaults() -> Arc<Self> {
        Self::builder().build()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // --- introspection for tests ---

    pub fn host_running(&self) -> bool {
        self.lock().running
    }

    pub fn options_dialog_open(&self) -> bool {
        self.lock().options_open
    }

    pub fn version_row_count(&self) -> usize {
        self.lock().version_rows.len()
    }

    pub fn version_names(&self) -> Vec<String> {
        self.lock()
            .version_rows
            .iter()
            .map(|row| row.name.clone())
            .collect()
    }

    pub fn version_paths(&self) -> Vec<String> {
        self.lock()
            .version_rows
            .iter()
            .map(|row| row.path.clone())
            .collect()
    }

    pub fn wizard_open(&self) -> bool {
        self.lock().wizard.is_some()
    }

    pub fn new_project_opens(&self) -> u32 {
        self.lock().new_project_opens
    }

    pub fn pressed_keys(&self) -> Vec<Key> {
        self.lock().pressed_keys.clone()
    }
}

/// Map a descriptor to the control it denotes, if that control is currently
/// on screen.
fn resolve(inner: &Inner, d: &Descriptor) -> Option<Control> {
    let control = identify(inner, d)?;
    visible(inner, control).then_some(control)
}

/// Attribute-based identification, independent of current visibility.
fn identify(inner: &Inner, d: &Descriptor) -> Option<Control> {
    match d.control {
        ControlType::Window => {
            if let Some(wizard) = &inner.wizard {
                if d.text_matches(&format!("{} Wizard", wizard.template)) {
                    return Some(Control::WizardWindow);
                }
            }
            d.text_matches(&inner.host_title).then_some(Control::HostWindow)
        }
        ControlType::Dialog => d.text_matches("Options").then_some(Control::OptionsDialog),
        ControlType::MenuItem => match d.text.as_ref()? {
            m if m.matches("File") => Some(Control::FileMenu),
            m if m.matches("Extensions") => Some(Control::ExtensionsMenu),
            m if m.matches("New") => Some(Control::NewMenuItem),
            m if m.matches("Project") => Some(Control::ProjectMenuItem),
            m if m.matches("Exit") => Some(Control::ExitMenuItem),
            m if m.matches("Qt VS Tools") => Some(Control::ToolsMenuItem),
            m if m.matches("Qt Versions") => Some(Control::VersionsMenuItem),
            _ => None,
        },
        ControlType::Button => {
            if d.automation_id.as_deref() == Some("buttonClose") {
                return Some(Control::HostClose);
            }
            let container = d.container.as_deref()?;
            let text = d.text.as_ref()?;
            if *container == *names::OPTIONS_DIALOG {
                match text {
                    m if m.matches("OK") => Some(Control::OptionsOk),
                    m if m.matches("Cancel") => Some(Control::OptionsCancel),
                    m if m.matches("Add") => Some(Control::AddVersion),
                    m if m.matches("Remove") => Some(Control::RemoveVersion),
                    _ => None,
                }
            } else if *container == *names::WIZARD_WINDOW {
                match text {
                    m if m.matches("Next >") => Some(Control::WizardNext),
                    m if m.matches("Finish") => Some(Control::WizardFinish),
                    m if m.matches("Cancel") => Some(Control::WizardCancel),
                    _ => None,
                }
            } else if *container == *names::HOST_WINDOW {
                match text {
                    m if m.matches("Next") => Some(Control::HostNext),
                    m if m.matches("Create") => Some(Control::HostCreate),
                    m if m.matches("Back") => Some(Control::HostBack),
                    _ => None,
                }
            } else {
                None
            }
        }
        ControlType::Edit => {
            if let Some(id) = d.automation_id.as_deref() {
                return match id {
                    "versionLocation" => Some(Control::VersionLocationEdit),
                    "versionName" => Some(Control::VersionNameEdit),
                    "projectNameText" => Some(Control::ProjectNameEdit),
                    "solutionNameText" => Some(Control::SolutionNameEdit),
                    "projectLocationText" => Some(Control::ProjectLocationEdit),
                    "versionComboText" => Some(Control::SelectedVersionEdit),
                    "className" => Some(Control::ClassNameEdit),
                    "classHeaderFile" => Some(Control::ClassHeaderEdit),
                    "classSourceFile" => Some(Control::ClassSourceEdit),
                    _ => None,
                };
            }
            // Edit inside a configuration-table cell.
            let cell = d.container.as_deref()?;
            if cell.control == ControlType::TableCell
                && cell.container.as_deref() == Some(&*names::WIZARD_CONFIG_TABLE)
            {
                return Some(Control::ConfigCellEdit {
                    row: cell.row?,
                    column: cell.column?,
                });
            }
            None
        }
        ControlType::Label => {
            if let Some(id) = d.automation_id.as_deref() {
                return match id {
                    "templateNameText" => Some(Control::TemplateNameLabel),
                    "outputPathText" => Some(Control::OutputPathLabel),
                    "welcomeText" => Some(Control::WizardWelcome),
                    "versionErrorText" => Some(Control::NoVersionLabel),
                    _ => None,
                };
            }
            // Name label inside a template list item.
            let item = d.container.as_deref()?;
            if item.control == ControlType::ListItem
                && item.container.as_deref() == Some(&*names::TEMPLATE_LIST)
            {
                let occurrence = item.occurrence?;
                if occurrence >= 1 && (occurrence as usize) <= inner.templates.len() {
                    return Some(Control::TemplateItemLabel(occurrence));
                }
            }
            None
        }
        ControlType::Table => match d.name.as_deref()? {
            "VersionGrid" => Some(Control::VersionTable),
            "ConfigTable" => Some(Control::ConfigTable),
            _ => None,
        },
        ControlType::TableCell => {
            let container = d.container.as_deref()?;
            if *container == *names::VERSION_TABLE {
                Some(Control::VersionCell { row: d.row? })
            } else {
                None
            }
        }
        ControlType::ComboBox => match d.automation_id.as_deref()? {
            "projectTypeFilter" => Some(Control::FilterCombo),
            "projectModelSelection" => Some(Control::ProjectModelCombo),
            _ => None,
        },
        ControlType::ComboBoxItem => {
            d.text_matches("Qt").then_some(Control::FilterQtItem)
        }
        ControlType::List => {
            (d.name.as_deref() == Some("TemplateList")).then_some(Control::TemplateList)
        }
        ControlType::ListItem => {
            if d.container.as_deref() == Some(&*names::TEMPLATE_LIST) {
                let occurrence = d.occurrence?;
                (occurrence >= 1 && (occurrence as usize) <= inner.templates.len())
                    .then_some(Control::TemplateItem(occurrence))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn visible(inner: &Inner, control: Control) -> bool {
    if !inner.running {
        return false;
    }
    let npd = inner.new_project.as_ref();
    let on_list_page = npd.is_some_and(|n| !n.configure_page);
    let on_configure_page = npd.is_some_and(|n| n.configure_page);
    match control {
        Control::HostWindow
        | Control::FileMenu
        | Control::ExtensionsMenu
        | Control::NewMenuItem
        | Control::ProjectMenuItem
        | Control::ExitMenuItem
        | Control::ToolsMenuItem
        | Control::VersionsMenuItem => true,
        Control::OptionsDialog
        | Control::OptionsOk
        | Control::OptionsCancel
        | Control::VersionTable
        | Control::AddVersion
        | Control::RemoveVersion => inner.options_open,
        Control::VersionCell { row } => inner.options_open && row < inner.version_rows.len(),
        Control::VersionLocationEdit | Control::VersionNameEdit => {
            inner.options_open && !inner.version_rows.is_empty()
        }
        Control::FilterCombo | Control::FilterQtItem | Control::TemplateList => on_list_page,
        Control::TemplateItem(occurrence) | Control::TemplateItemLabel(occurrence) => {
            on_list_page
                && npd.is_some_and(|n| n.filtered)
                && occurrence >= 1
                && (occurrence as usize) <= inner.templates.len()
        }
        Control::HostNext => on_list_page,
        Control::HostBack | Control::HostClose => npd.is_some(),
        Control::HostCreate
        | Control::TemplateNameLabel
        | Control::ProjectNameEdit
        | Control::SolutionNameEdit
        | Control::ProjectLocationEdit
        | Control::OutputPathLabel => on_configure_page,
        Control::WizardWindow | Control::WizardWelcome | Control::WizardNext
        | Control::WizardFinish => inner.wizard_visible(),
        Control::WizardCancel => inner.wizard_visible() && !inner.unresolvable_cancel_button,
        Control::ProjectModelCombo | Control::ConfigTable => {
            inner.wizard_visible() && inner.wizard_page() == 2
        }
        Control::ConfigCellEdit { row, .. } => {
            inner.wizard_visible() && inner.wizard_page() == 2 && inner.qt_configured() && row < 2
        }
        Control::SelectedVersionEdit => {
            inner.wizard_visible() && inner.wizard_page() == 2 && inner.qt_configured()
        }
        Control::NoVersionLabel => {
            inner.wizard_visible() && inner.wizard_page() == 2 && !inner.qt_configured()
        }
        Control::ClassNameEdit | Control::ClassHeaderEdit | Control::ClassSourceEdit => {
            inner.wizard_visible() && inner.wizard_page() == 3
        }
    }
}

impl MockHost {
    fn with_control<T>(
        &self,
        element: ElementId,
        f: impl FnOnce(&mut Inner, Control) -> Result<T, AutomationError>,
    ) -> Result<T, AutomationError> {
        let mut inner = self.lock();
        let control = *inner
            .handles
            .get(&element.0)
            .ok_or_else(|| AutomationError::BackendError(format!("stale handle {element:?}")))?;
        if !visible(&inner, control) {
            return Err(AutomationError::ElementNotFound(format!(
                "control behind {element:?} went away"
            )));
        }
        f(&mut inner, control)
    }
}

impl UiDriver for MockHost {
    fn find_element(
        &self,
        descriptor: &Descriptor,
        timeout: Duration,
    ) -> Result<ElementId, AutomationError> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let mut inner = self.lock();
                if let Some(control) = resolve(&inner, descriptor) {
                    let id = inner.next_handle;
                    inner.next_handle += 1;
                    inner.handles.insert(id, control);
                    debug!(%descriptor, ?control, "resolved");
                    return Ok(ElementId(id));
                }
            }
            if Instant::now() >= deadline {
                return Err(AutomationError::ElementNotFound(format!(
                    "no control matching {descriptor}"
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn exists(&self, descriptor: &Descriptor) -> bool {
        resolve(&self.lock(), descriptor).is_some()
    }

    fn click(&self, element: ElementId) -> Result<(), AutomationError> {
        self.with_control(element, |inner, control| {
            debug!(?control, "click");
            match control {
                Control::ProjectMenuItem => {
                    inner.new_project = Some(NewProjectState::default());
                    inner.new_project_opens += 1;
                }
                Control::ExitMenuItem => inner.running = false,
                Control::VersionsMenuItem => {
                    inner.options_open = true;
                    inner.options_snapshot = Some(inner.version_rows.clone());
                    inner.nondefault_row_selected = false;
                }
                Control::OptionsOk => {
                    inner.options_open = false;
                    inner.options_snapshot = None;
                }
                Control::OptionsCancel => {
                    if let Some(snapshot) = inner.options_snapshot.take() {
                        inner.version_rows = snapshot;
                    }
                    inner.options_open = false;
                }
                Control::AddVersion => inner.version_rows.push(VersionRow {
                    path: String::new(),
                    name: String::new(),
                }),
                Control::RemoveVersion => {
                    // The default (first) row can only be removed while it is
                    // the last one left; otherwise a non-default row must
                    // have been selected.
                    if inner.version_rows.len() == 1 || inner.nondefault_row_selected {
                        inner.version_rows.pop();
                        if inner.version_rows.len() <= 1 {
                            inner.nondefault_row_selected = false;
                        }
                    }
                }
                Control::VersionCell { row } => {
                    if row >= 1 {
                        inner.nondefault_row_selected = true;
                    }
                }
                Control::FilterQtItem => {
                    if let Some(npd) = inner.new_project.as_mut() {
                        npd.filtered = true;
                    }
                }
                Control::TemplateItem(occurrence) => {
                    if let Some(npd) = inner.new_project.as_mut() {
                        npd.selected = Some(occurrence as usize - 1);
                    }
                }
                Control::HostNext => {
                    let template = {
                        let npd = inner.new_project.as_ref();
                        npd.and_then(|n| n.selected).map(|i| inner.templates[i].clone())
                    };
                    let template = template.ok_or_else(|| {
                        AutomationError::BackendError("no template selected".into())
                    })?;
                    let name = format!("{}1", templates::expected_project_name(&template));
                    if let Some(npd) = inner.new_project.as_mut() {
                        npd.configure_page = true;
                        npd.project_name = Some(name);
                    }
                }
                Control::HostCreate => {
                    let npd = inner
                        .new_project
                        .as_ref()
                        .ok_or_else(|| AutomationError::BackendError("no project flow".into()))?;
                    let template = npd
                        .selected
                        .map(|i| inner.templates[i].clone())
                        .ok_or_else(|| {
                            AutomationError::BackendError("no template selected".into())
                        })?;
                    let project_name = npd.project_name.clone().unwrap_or_default();
                    inner.wizard = Some(WizardState {
                        template,
                        project_name,
                        page: 1,
                    });
                    if inner.spawn_second_context_on_create {
                        inner.current_context = TRANSIENT_CONTEXT;
                    }
                }
                Control::HostBack => {
                    if let Some(npd) = inner.new_project.as_mut() {
                        npd.configure_page = false;
                        npd.selected = None;
                        npd.project_name = None;
                    }
                }
                Control::HostClose => inner.new_project = None,
                Control::WizardNext => {
                    let enabled = wizard_next_enabled(inner);
                    let wizard = inner
                        .wizard
                        .as_mut()
                        .ok_or_else(|| AutomationError::BackendError("no wizard".into()))?;
                    if !enabled {
                        return Err(AutomationError::BackendError(
                            "wizard Next is disabled".into(),
                        ));
                    }
                    wizard.page += 1;
                }
                // Finishing is known-broken in the host; the click lands but
                // nothing happens.
                Control::WizardFinish => {}
                Control::WizardCancel => inner.wizard = None,
                _ => {}
            }
            Ok(())
        })
    }

    fn set_text(&self, element: ElementId, text: &str) -> Result<(), AutomationError> {
        self.with_control(element, |inner, control| match control {
            Control::VersionLocationEdit => {
                let row = inner.version_rows.last_mut().ok_or_else(|| {
                    AutomationError::BackendError("no version row to edit".into())
                })?;
                row.path = text.to_string();
                Ok(())
            }
            Control::VersionNameEdit => {
                let row = inner.version_rows.last_mut().ok_or_else(|| {
                    AutomationError::BackendError("no version row to edit".into())
                })?;
                row.name = text.to_string();
                Ok(())
            }
            other => Err(AutomationError::BackendError(format!(
                "{other:?} is not editable"
            ))),
        })
    }

    fn read_text(&self, element: ElementId) -> Result<String, AutomationError> {
        self.with_control(element, |inner, control| {
            let text = match control {
                Control::HostWindow => inner.host_title.clone(),
                Control::WizardWindow => {
                    let wizard = inner.wizard.as_ref().ok_or_else(no_wizard)?;
                    format!("{} Wizard", wizard.template)
                }
                Control::WizardWelcome => {
                    let wizard = inner.wizard.as_ref().ok_or_else(no_wizard)?;
                    format!(
                        "{}. This wizard will create a new project skeleton.",
                        templates::greeting(&wizard.template)
                    )
                }
                Control::TemplateItemLabel(occurrence) => {
                    inner.templates[occurrence as usize - 1].clone()
                }
                Control::TemplateNameLabel => {
                    let npd = inner.new_project.as_ref().ok_or_else(no_project_flow)?;
                    let index = npd.selected.ok_or_else(no_project_flow)?;
                    inner.templates[index].clone()
                }
                Control::ProjectNameEdit | Control::SolutionNameEdit => {
                    let npd = inner.new_project.as_ref().ok_or_else(no_project_flow)?;
                    npd.project_name.clone().ok_or_else(no_project_flow)?
                }
                Control::ProjectLocationEdit => inner.project_location.clone(),
                Control::OutputPathLabel => {
                    let npd = inner.new_project.as_ref().ok_or_else(no_project_flow)?;
                    let name = npd.project_name.clone().ok_or_else(no_project_flow)?;
                    format!(
                        "Project will be created in \"{}\\{name}\\{name}\\\"",
                        inner.project_location
                    )
                }
                Control::ProjectModelCombo => "Qt Visual Studio Project (Qt/MSBuild)".into(),
                Control::ConfigCellEdit { row, column } => match (row, column) {
                    (0, 0) => "Debug".into(),
                    (1, 0) => "Release".into(),
                    _ => String::new(),
                },
                Control::SelectedVersionEdit => inner
                    .version_rows
                    .first()
                    .map(|row| row.name.clone())
                    .unwrap_or_default(),
                Control::NoVersionLabel => templates::NO_VERSION_MESSAGE.into(),
                Control::ClassNameEdit => {
                    inner.wizard.as_ref().ok_or_else(no_wizard)?.project_name.clone()
                }
                Control::ClassHeaderEdit => {
                    format!("{}.h", inner.wizard.as_ref().ok_or_else(no_wizard)?.project_name)
                }
                Control::ClassSourceEdit => {
                    format!("{}.cpp", inner.wizard.as_ref().ok_or_else(no_wizard)?.project_name)
                }
                Control::VersionLocationEdit => inner
                    .version_rows
                    .last()
                    .map(|row| row.path.clone())
                    .unwrap_or_default(),
                Control::VersionNameEdit => inner
                    .version_rows
                    .last()
                    .map(|row| row.name.clone())
                    .unwrap_or_default(),
                Control::VersionCell { row } => inner
                    .version_rows
                    .get(row)
                    .map(|r| r.name.clone())
                    .unwrap_or_default(),
                other => {
                    return Err(AutomationError::BackendError(format!(
                        "{other:?} has no text"
                    )))
                }
            };
            Ok(text)
        })
    }

    fn is_enabled(&self, element: ElementId) -> Result<bool, AutomationError> {
        self.with_control(element, |inner, control| {
            Ok(match control {
                Control::WizardNext => wizard_next_enabled(inner),
                Control::WizardFinish => inner.qt_configured(),
                _ => true,
            })
        })
    }

    fn row_count(&self, element: ElementId) -> Result<usize, AutomationError> {
        self.with_control(element, |inner, control| match control {
            Control::VersionTable => Ok(inner.version_rows.len()),
            Control::ConfigTable => Ok(if inner.qt_configured() { 2 } else { 0 }),
            Control::TemplateList => {
                let filtered = inner
                    .new_project
                    .as_ref()
                    .is_some_and(|npd| npd.filtered);
                Ok(if filtered { inner.templates.len() } else { 0 })
            }
            other => Err(AutomationError::BackendError(format!(
                "{other:?} has no rows"
            ))),
        })
    }

    fn press_key(&self, key: Key) -> Result<(), AutomationError> {
        let mut inner = self.lock();
        inner.pressed_keys.push(key);
        if key == Key::Escape && inner.wizard.is_some() {
            inner.wizard = None;
        }
        Ok(())
    }

    fn current_context(&self) -> ContextId {
        ContextId(self.lock().current_context)
    }

    fn activate_context(&self, context: ContextId) -> Result<(), AutomationError> {
        self.lock().current_context = context.0;
        Ok(())
    }
}

fn wizard_next_enabled(inner: &Inner) -> bool {
    match inner.wizard.as_ref() {
        Some(wizard) => match wizard.page {
            1 => true,
            2 => inner.qt_configured() && templates::has_class_page(&wizard.template),
            _ => false,
        },
        None => false,
    }
}

fn no_wizard() -> AutomationError {
    AutomationError::BackendError("no wizard open".into())
}

fn no_project_flow() -> AutomationError {
    AutomationError::BackendError("no project flow open".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names;

    fn find(host: &MockHost, d: &Descriptor) -> ElementId {
        host.find_element(d, Duration::from_millis(100)).unwrap()
    }

    #[test]
    fn template_labels_resolve_after_filtering() {
        let host = MockHost::with_defaults();
        let project = find(&host, &names::PROJECT_MENU_ITEM);
        host.click(project).unwrap();
        let qt = find(&host, &names::QT_FILTER_ITEM);
        host.click(qt).unwrap();

        let list = find(&host, &names::TEMPLATE_LIST);
        assert_eq!(host.row_count(list).unwrap(), 3);
        let label = find(&host, &names::template_item_label(names::template_item(1)));
        assert_eq!(host.read_text(label).unwrap(), "Qt Empty Application");
    }

    #[test]
    fn unfiltered_list_shows_no_extension_templates() {
        let host = MockHost::with_defaults();
        let project = find(&host, &names::PROJECT_MENU_ITEM);
        host.click(project).unwrap();
        let list = find(&host, &names::TEMPLATE_LIST);
        assert_eq!(host.row_count(list).unwrap(), 0);
        assert!(!host.exists(&names::template_item(1)));
    }

    #[test]
    fn escape_closes_the_wizard() {
        let host = MockHost::with_defaults();
        let project = find(&host, &names::PROJECT_MENU_ITEM);
        host.click(project).unwrap();
        host.click(find(&host, &names::QT_FILTER_ITEM)).unwrap();
        host.click(find(&host, &names::template_item(1))).unwrap();
        host.click(find(&host, &names::HOST_NEXT_BUTTON)).unwrap();
        host.click(find(&host, &names::HOST_CREATE_BUTTON)).unwrap();
        assert!(host.wizard_open());

        host.press_key(Key::Escape).unwrap();
        assert!(!host.wizard_open());
        assert_eq!(host.pressed_keys(), vec![Key::Escape]);
    }

    #[test]
    fn second_context_defect_hides_the_wizard_until_repinned() {
        let host = MockHost::builder().second_context_defect().build();
        let primary = host.current_context();
        host.click(find(&host, &names::PROJECT_MENU_ITEM)).unwrap();
        host.click(find(&host, &names::QT_FILTER_ITEM)).unwrap();
        host.click(find(&host, &names::template_item(1))).unwrap();
        host.click(find(&host, &names::HOST_NEXT_BUTTON)).unwrap();
        host.click(find(&host, &names::HOST_CREATE_BUTTON)).unwrap();

        assert!(!host.exists(&names::WIZARD_WINDOW));
        host.activate_context(primary).unwrap();
        assert!(host.exists(&names::WIZARD_WINDOW));
    }

    #[test]
    fn stale_handles_error_when_the_surface_closes() {
        let host = MockHost::with_defaults();
        host.click(find(&host, &names::QT_VERSIONS_MENU_ITEM)).unwrap();
        let ok = find(&host, &names::OPTIONS_OK_BUTTON);
        host.click(ok).unwrap();
        assert!(matches!(
            host.click(ok),
            Err(AutomationError::ElementNotFound(_))
        ));
    }
}
