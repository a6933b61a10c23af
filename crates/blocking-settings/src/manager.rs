//! Blocking backends selectable from the settings screen.

use std::sync::Arc;

use blocking_prefs::{MANAGER_CODE_CALL_CONTROL, MANAGER_CODE_QKSMS, MANAGER_CODE_SIA};

/// Resolves a blocking backend to the label shown on the manager row.
pub type ManagerLabeler = Arc<dyn Fn(ManagerKind) -> String + Send + Sync>;

/// Backend used to detect and block unwanted messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ManagerKind {
    /// Built-in number and content blocking.
    #[default]
    Qksms,
    /// Call Control companion app.
    CallControl,
    /// Should I Answer companion app.
    Sia,
}

impl ManagerKind {
    /// Every backend, in stored-code order.
    pub const ALL: [Self; 3] = [Self::Qksms, Self::CallControl, Self::Sia];

    /// Map a stored code to a backend; unknown codes fall back to the built-in one.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            MANAGER_CODE_CALL_CONTROL => Self::CallControl,
            MANAGER_CODE_SIA => Self::Sia,
            _ => Self::Qksms,
        }
    }

    /// Code written to the `blocking_manager` preference.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Qksms => MANAGER_CODE_QKSMS,
            Self::CallControl => MANAGER_CODE_CALL_CONTROL,
            Self::Sia => MANAGER_CODE_SIA,
        }
    }

    /// English label used when no localized labeler is supplied.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Qksms => "QKSMS",
            Self::CallControl => "Call Control",
            Self::Sia => "Should I Answer?",
        }
    }
}

/// Labeler backed by [`ManagerKind::default_label`].
#[must_use]
pub fn default_labeler() -> ManagerLabeler {
    Arc::new(|kind: ManagerKind| kind.default_label().to_string())
}
