//! The object-map catalog: one immutable descriptor per control the harness
//! touches, built once and referenced by key. No behavior depends on mutating
//! these.

use once_cell::sync::Lazy;

use crate::descriptor::{ControlType, Descriptor, TextMatch};

// --- host main window and menus ---

pub static HOST_WINDOW: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Window)
        .with_text_match(TextMatch::wildcard("*Microsoft Visual Studio"))
});

pub static MENU_BAR: Lazy<Descriptor> =
    Lazy::new(|| Descriptor::new(ControlType::MenuBar).within(HOST_WINDOW.clone()));

pub static FILE_MENU: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::MenuItem)
        .with_text("File")
        .within(MENU_BAR.clone())
});

pub static EXTENSIONS_MENU: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::MenuItem)
        .with_text("Extensions")
        .within(MENU_BAR.clone())
});

pub static MENU_POPUP: Lazy<Descriptor> =
    Lazy::new(|| Descriptor::new(ControlType::Popup).with_name("PART_Popup"));

pub static NEW_MENU_ITEM: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::MenuItem)
        .with_text("New")
        .within(MENU_POPUP.clone())
});

pub static PROJECT_MENU_ITEM: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::MenuItem)
        .with_text("Project")
        .within(MENU_POPUP.clone())
});

pub static EXIT_MENU_ITEM: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::MenuItem)
        .with_text("Exit")
        .within(MENU_POPUP.clone())
});

/// The extension's own submenu under Extensions.
pub static TOOLS_MENU_ITEM: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::MenuItem)
        .with_text("Qt VS Tools")
        .within(MENU_POPUP.clone())
});

pub static QT_VERSIONS_MENU_ITEM: Lazy<Descriptor> =
    Lazy::new(|| Descriptor::new(ControlType::MenuItem).with_text("Qt Versions"));

// --- version-management dialog ---

pub static OPTIONS_DIALOG: Lazy<Descriptor> =
    Lazy::new(|| Descriptor::new(ControlType::Dialog).with_text("Options"));

pub static OPTIONS_OK_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("OK")
        .within(OPTIONS_DIALOG.clone())
});

pub static OPTIONS_CANCEL_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Cancel")
        .within(OPTIONS_DIALOG.clone())
});

pub static VERSION_TABLE: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Table)
        .with_name("VersionGrid")
        .within(OPTIONS_DIALOG.clone())
});

pub static ADD_VERSION_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Add")
        .within(OPTIONS_DIALOG.clone())
});

pub static REMOVE_VERSION_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Remove")
        .within(OPTIONS_DIALOG.clone())
});

pub static VERSION_LOCATION_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("versionLocation")
        .within(OPTIONS_DIALOG.clone())
});

pub static VERSION_NAME_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("versionName")
        .within(OPTIONS_DIALOG.clone())
});

/// One cell of the version table.
pub fn version_table_cell(row: usize, column: usize) -> Descriptor {
    Descriptor::new(ControlType::TableCell)
        .at_cell(row, column)
        .within(VERSION_TABLE.clone())
}

// --- host "New Project" dialog ---

pub static PROJECT_TYPE_FILTER_COMBO: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::ComboBox)
        .with_automation_id("projectTypeFilter")
        .within(HOST_WINDOW.clone())
});

pub static QT_FILTER_ITEM: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::ComboBoxItem)
        .with_text("Qt")
        .within(PROJECT_TYPE_FILTER_COMBO.clone())
});

pub static TEMPLATE_LIST: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::List)
        .with_name("TemplateList")
        .within(HOST_WINDOW.clone())
});

/// The n-th (1-based) template entry in the list.
pub fn template_item(occurrence: u32) -> Descriptor {
    Descriptor::new(ControlType::ListItem)
        .within(TEMPLATE_LIST.clone())
        .occurrence(occurrence)
}

/// The name label inside a template entry.
pub fn template_item_label(item: Descriptor) -> Descriptor {
    Descriptor::new(ControlType::Label).within(item)
}

pub static HOST_NEXT_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Next")
        .within(HOST_WINDOW.clone())
});

pub static HOST_CREATE_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Create")
        .within(HOST_WINDOW.clone())
});

pub static HOST_BACK_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Back")
        .within(HOST_WINDOW.clone())
});

pub static HOST_CLOSE_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_automation_id("buttonClose")
        .within(HOST_WINDOW.clone())
});

pub static TEMPLATE_NAME_LABEL: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Label)
        .with_automation_id("templateNameText")
        .within(HOST_WINDOW.clone())
});

pub static PROJECT_NAME_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("projectNameText")
        .within(HOST_WINDOW.clone())
});

pub static SOLUTION_NAME_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("solutionNameText")
        .within(HOST_WINDOW.clone())
});

pub static PROJECT_LOCATION_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("projectLocationText")
        .within(HOST_WINDOW.clone())
});

pub static OUTPUT_PATH_LABEL: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Label)
        .with_automation_id("outputPathText")
        .within(HOST_WINDOW.clone())
});

// --- extension wizard ---

pub static WIZARD_WINDOW: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Window).with_text_match(TextMatch::wildcard("* Wizard"))
});

pub static WIZARD_WELCOME_LABEL: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Label)
        .with_automation_id("welcomeText")
        .within(WIZARD_WINDOW.clone())
});

pub static WIZARD_NEXT_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Next >")
        .within(WIZARD_WINDOW.clone())
});

pub static WIZARD_FINISH_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Finish")
        .within(WIZARD_WINDOW.clone())
});

pub static WIZARD_CANCEL_BUTTON: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Button)
        .with_text("Cancel")
        .within(WIZARD_WINDOW.clone())
});

pub static PROJECT_MODEL_COMBO: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::ComboBox)
        .with_automation_id("projectModelSelection")
        .within(WIZARD_WINDOW.clone())
});

pub static WIZARD_CONFIG_TABLE: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Table)
        .with_name("ConfigTable")
        .within(WIZARD_WINDOW.clone())
});

/// The edit inside one configuration-table cell.
pub fn config_table_cell_edit(row: usize, column: usize) -> Descriptor {
    Descriptor::new(ControlType::Edit).within(
        Descriptor::new(ControlType::TableCell)
            .at_cell(row, column)
            .within(WIZARD_CONFIG_TABLE.clone()),
    )
}

pub static SELECTED_VERSION_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("versionComboText")
        .within(WIZARD_WINDOW.clone())
});

pub static NO_VERSION_LABEL: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Label)
        .with_automation_id("versionErrorText")
        .within(WIZARD_WINDOW.clone())
});

pub static CLASS_NAME_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("className")
        .within(WIZARD_WINDOW.clone())
});

pub static CLASS_HEADER_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("classHeaderFile")
        .within(WIZARD_WINDOW.clone())
});

pub static CLASS_SOURCE_EDIT: Lazy<Descriptor> = Lazy::new(|| {
    Descriptor::new(ControlType::Edit)
        .with_automation_id("classSourceFile")
        .within(WIZARD_WINDOW.clone())
});
