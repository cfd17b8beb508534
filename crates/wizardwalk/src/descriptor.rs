use std::fmt;

use regex::Regex;

/// How a text-valued descriptor attribute is compared against a live control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextMatch {
    /// Match the exact string.
    Exact(String),
    /// Glob-style match where `*` stands for any run of characters.
    Wildcard(String),
    /// Match against a regular expression (anchored by the pattern itself).
    Pattern(String),
}

impl TextMatch {
    pub fn exact(text: impl Into<String>) -> Self {
        TextMatch::Exact(text.into())
    }

    pub fn wildcard(pattern: impl Into<String>) -> Self {
        TextMatch::Wildcard(pattern.into())
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        TextMatch::Pattern(pattern.into())
    }

    /// Whether `actual` satisfies this matcher. An unparseable pattern never matches.
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => expected == actual,
            TextMatch::Wildcard(pattern) => match Regex::new(&wildcard_to_regex(pattern)) {
                Ok(re) => re.is_match(actual),
                Err(_) => false,
            },
            TextMatch::Pattern(pattern) => match Regex::new(pattern) {
                Ok(re) => re.is_match(actual),
                Err(_) => false,
            },
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatch::Exact(text) => write!(f, "{text:?}"),
            TextMatch::Wildcard(pattern) => write!(f, "~{pattern:?}"),
            TextMatch::Pattern(pattern) => write!(f, "/{pattern}/"),
        }
    }
}

/// Translate a `*` glob into an anchored regex, escaping everything else.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    for (i, part) in pattern.split('*').enumerate() {
        if i > 0 {
            out.push_str(".*");
        }
        out.push_str(&regex::escape(part));
    }
    out.push('$');
    out
}

/// The accessibility role of a control, as exposed by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    Window,
    Dialog,
    Button,
    MenuBar,
    MenuItem,
    Popup,
    Label,
    Edit,
    Table,
    TableCell,
    ComboBox,
    ComboBoxItem,
    List,
    ListItem,
    CheckBox,
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlType::Window => "Window",
            ControlType::Dialog => "Dialog",
            ControlType::Button => "Button",
            ControlType::MenuBar => "MenuBar",
            ControlType::MenuItem => "MenuItem",
            ControlType::Popup => "Popup",
            ControlType::Label => "Label",
            ControlType::Edit => "Edit",
            ControlType::Table => "Table",
            ControlType::TableCell => "TableCell",
            ControlType::ComboBox => "ComboBox",
            ControlType::ComboBoxItem => "ComboBoxItem",
            ControlType::List => "List",
            ControlType::ListItem => "ListItem",
            ControlType::CheckBox => "CheckBox",
        };
        write!(f, "{name}")
    }
}

/// A symbolic, attribute-based specification used to locate a UI control.
///
/// Descriptors are pure data: resolving one against the live UI is the
/// driver's job. They nest through [`Descriptor::within`] container chains and
/// disambiguate repeated siblings with a 1-based [`Descriptor::occurrence`]
/// index.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub control: ControlType,
    /// Displayed text (button caption, window title, label contents).
    pub text: Option<TextMatch>,
    /// Accessibility name of the control, where the toolkit exposes one.
    pub name: Option<String>,
    /// Toolkit automation id.
    pub automation_id: Option<String>,
    /// Table coordinates, for `TableCell` controls.
    pub row: Option<usize>,
    pub column: Option<usize>,
    /// 1-based index among matching siblings.
    pub occurrence: Option<u32>,
    pub container: Option<Box<Descriptor>>,
}

impl Descriptor {
    pub fn new(control: ControlType) -> Self {
        Self {
            control,
            text: None,
            name: None,
            automation_id: None,
            row: None,
            column: None,
            occurrence: None,
            container: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(TextMatch::Exact(text.into()));
        self
    }

    pub fn with_text_match(mut self, text: TextMatch) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_automation_id(mut self, id: impl Into<String>) -> Self {
        self.automation_id = Some(id.into());
        self
    }

    pub fn at_cell(mut self, row: usize, column: usize) -> Self {
        self.row = Some(row);
        self.column = Some(column);
        self
    }

    pub fn occurrence(mut self, index: u32) -> Self {
        self.occurrence = Some(index);
        self
    }

    pub fn within(mut self, container: Descriptor) -> Self {
        self.container = Some(Box::new(container));
        self
    }

    /// Convenience for matching the `text` attribute against a live value.
    pub fn text_matches(&self, actual: &str) -> bool {
        self.text.as_ref().is_some_and(|m| m.matches(actual))
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.control)?;
        if let Some(text) = &self.text {
            write!(f, " {text}")?;
        }
        if let Some(name) = &self.name {
            write!(f, " name={name:?}")?;
        }
        if let Some(id) = &self.automation_id {
            write!(f, " id={id:?}")?;
        }
        if let (Some(row), Some(column)) = (self.row, self.column) {
            write!(f, " [{row},{column}]")?;
        }
        if let Some(occurrence) = self.occurrence {
            write!(f, " #{occurrence}")?;
        }
        if let Some(container) = &self.container {
            write!(f, " in {container}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_compares_whole_string() {
        let m = TextMatch::exact("Cancel");
        assert!(m.matches("Cancel"));
        assert!(!m.matches("Cancel All"));
    }

    #[test]
    fn wildcard_match_allows_prefix_and_suffix() {
        let m = TextMatch::wildcard("*Microsoft Visual Studio");
        assert!(m.matches("Start Page - Microsoft Visual Studio"));
        assert!(m.matches("Microsoft Visual Studio"));
        assert!(!m.matches("Microsoft Visual Studio - Preview"));
    }

    #[test]
    fn wildcard_escapes_regex_metacharacters() {
        let m = TextMatch::wildcard("main.(cpp|qml)*");
        assert!(m.matches("main.(cpp|qml) [modified]"));
        assert!(!m.matches("main.cpp"));
    }

    #[test]
    fn pattern_match_uses_regex() {
        let m = TextMatch::pattern(r".+\.(cpp|qml)$");
        assert!(m.matches("widget.cpp"));
        assert!(m.matches("view.qml"));
        assert!(!m.matches(".cpp"));
    }

    #[test]
    fn invalid_pattern_never_matches() {
        let m = TextMatch::pattern("(unclosed");
        assert!(!m.matches("(unclosed"));
    }

    #[test]
    fn display_includes_container_chain() {
        let dialog = Descriptor::new(ControlType::Dialog).with_text("Options");
        let button = Descriptor::new(ControlType::Button)
            .with_text("OK")
            .within(dialog);
        assert_eq!(button.to_string(), "Button \"OK\" in Dialog \"Options\"");
    }
}
