//! Static category table shared by command routing and issue submission.

const COMMAND_NAME_PREFIX: &str = "To Github ";
const FORM_ID_PREFIX: &str = "create github issue ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Enumerates the issue categories offered as message commands.
pub enum IssueCategory {
    Bug,
    FeatureRequest,
    Task,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 3] = [Self::Bug, Self::FeatureRequest, Self::Task];

    /// Human-facing label used in command names, form ids, and titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::FeatureRequest => "Feature Request",
            Self::Task => "Task",
        }
    }

    /// Issue type name in the tracker's vocabulary.
    pub fn tracker_type(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::FeatureRequest => "Feature",
            Self::Task => "Task",
        }
    }

    pub fn command_name(self) -> String {
        format!("{COMMAND_NAME_PREFIX}{}", self.label())
    }

    pub fn form_id(self) -> String {
        format!("{FORM_ID_PREFIX}{}", self.label())
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == label)
    }

    /// Match `To Github <label>` exactly.
    pub fn from_command_name(command_name: &str) -> Option<Self> {
        command_name
            .strip_prefix(COMMAND_NAME_PREFIX)
            .and_then(Self::from_label)
    }

    /// Match `create github issue <label>` exactly.
    pub fn from_form_id(form_id: &str) -> Option<Self> {
        form_id
            .strip_prefix(FORM_ID_PREFIX)
            .and_then(Self::from_label)
    }
}
