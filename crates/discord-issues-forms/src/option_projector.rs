/// Discord's hard limit on options offered by one select menu.
pub const MAX_SELECT_OPTIONS: usize = 25;
/// Discord's limit on select option label, value, and description length.
pub const MAX_OPTION_TEXT_CHARS: usize = 100;

/// Trait contract for records that can be offered as select options.
pub trait OptionSource {
    fn display_name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Value submitted back by the platform when this option is chosen.
    fn option_value(&self) -> String {
        self.display_name().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOption {
    pub display_name: String,
    pub description: Option<String>,
    pub value: String,
}

impl FormOption {
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            value: display_name.clone(),
            display_name,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

impl OptionSource for FormOption {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn option_value(&self) -> String {
        self.value.clone()
    }
}

/// Project heterogeneous option records into form options, keeping source
/// order and the first [`MAX_SELECT_OPTIONS`] entries. Blank entries within
/// that window are dropped rather than replaced.
pub fn project_options<T: OptionSource>(sources: &[T]) -> Vec<FormOption> {
    sources
        .iter()
        .take(MAX_SELECT_OPTIONS)
        .filter(|source| !source.display_name().trim().is_empty())
        .map(|source| FormOption {
            display_name: truncate_chars(source.display_name().trim(), MAX_OPTION_TEXT_CHARS),
            description: source
                .description()
                .map(str::trim)
                .filter(|description| !description.is_empty())
                .map(|description| truncate_chars(description, MAX_OPTION_TEXT_CHARS)),
            value: truncate_chars(&source.option_value(), MAX_OPTION_TEXT_CHARS),
        })
        .collect()
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
