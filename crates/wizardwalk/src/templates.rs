//! Project templates as discovered from the host's template list, plus the
//! fixed knowledge the harness has about them.

use crate::descriptor::Descriptor;

/// One listed project template: its displayed name and the list-item
/// descriptor it can be selected through. Templates are discovered live from
/// the host at traversal time, never predefined.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub item: Descriptor,
}

/// Message the wizard shows in place of the version list when no SDK has
/// been registered.
pub const NO_VERSION_MESSAGE: &str =
    "Register at least one Qt version using \"Qt VS Tools\" -> \"Qt Options\".";

/// Templates whose wizard has a third (class setup) page.
const CLASS_PAGE_TEMPLATES: [&str; 5] = [
    "Qt ActiveQt Server",
    "Qt Class Library",
    "Qt Designer Custom Widget",
    "Qt Test Application",
    "Qt Widgets Application",
];

/// The default project name the host derives from a template name. A few
/// templates have hand-picked names; everything else drops the spaces.
/// The fallback is a heuristic without a correctness guarantee for future
/// template names.
pub fn expected_project_name(template_name: &str) -> String {
    match template_name {
        "Qt ActiveQt Server" => "ActiveQtServer".to_string(),
        "Qt Designer Custom Widget" => "QtDesignerWidget".to_string(),
        "Qt Empty Application" => "QtApplication".to_string(),
        "Qt Test Application" => "QtTest".to_string(),
        other => other.replace(' ', ""),
    }
}

/// The greeting shown on top of every wizard page.
pub fn greeting(template_name: &str) -> String {
    format!("Welcome to the {template_name} Wizard")
}

pub fn has_class_page(template_name: &str) -> bool {
    CLASS_PAGE_TEMPLATES.contains(&template_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_cased_templates_use_the_table() {
        assert_eq!(expected_project_name("Qt Empty Application"), "QtApplication");
        assert_eq!(expected_project_name("Qt ActiveQt Server"), "ActiveQtServer");
        assert_eq!(
            expected_project_name("Qt Designer Custom Widget"),
            "QtDesignerWidget"
        );
        assert_eq!(expected_project_name("Qt Test Application"), "QtTest");
    }

    #[test]
    fn unlisted_templates_strip_spaces() {
        assert_eq!(
            expected_project_name("Qt Widgets Application"),
            "QtWidgetsApplication"
        );
        assert_eq!(
            expected_project_name("Qt Quick Application"),
            "QtQuickApplication"
        );
    }

    #[test]
    fn class_page_subset_is_fixed() {
        assert!(has_class_page("Qt Widgets Application"));
        assert!(has_class_page("Qt Class Library"));
        assert!(!has_class_page("Qt Empty Application"));
        assert!(!has_class_page("Qt Quick Application"));
    }

    #[test]
    fn greeting_embeds_the_template_name() {
        assert_eq!(
            greeting("Qt Empty Application"),
            "Welcome to the Qt Empty Application Wizard"
        );
    }
}
