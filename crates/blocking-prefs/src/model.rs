//! Preference keys, value kinds, and their defaults.
//!
//! # Design
//! - Keys form a closed set; index keys and their derived value keys are
//!   distinct so writing a derived value never notifies an index observer.
//! - Values are untagged on the wire so the preference file reads naturally.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Stored code for the built-in blocking manager.
pub const MANAGER_CODE_QKSMS: i64 = 0;
/// Stored code for the Call Control blocking manager.
pub const MANAGER_CODE_CALL_CONTROL: i64 = 1;
/// Stored code for the Should I Answer blocking manager.
pub const MANAGER_CODE_SIA: i64 = 2;

/// Named preference slots used by the blocking settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefKey {
    /// Active blocking backend code.
    BlockingManager,
    /// Drop blocked messages instead of storing them.
    Drop,
    /// Spam filter master switch.
    SpamSwitch,
    /// Selected index into the queue size table.
    QueueSize,
    /// Selected index into the receive window table.
    ReceiveWindow,
    /// Selected index into the pause time table.
    PauseTime,
    /// Queue size resolved from the selected index.
    QueueSizeValue,
    /// Receive window resolved from the selected index.
    ReceiveWindowValue,
    /// Pause time resolved from the selected index.
    PauseTimeValue,
}

impl PrefKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::BlockingManager,
        Self::Drop,
        Self::SpamSwitch,
        Self::QueueSize,
        Self::ReceiveWindow,
        Self::PauseTime,
        Self::QueueSizeValue,
        Self::ReceiveWindowValue,
        Self::PauseTimeValue,
    ];

    /// Stable name used in logs and the preference file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlockingManager => "blocking_manager",
            Self::Drop => "drop",
            Self::SpamSwitch => "spam_switch",
            Self::QueueSize => "queue_size",
            Self::ReceiveWindow => "receive_window",
            Self::PauseTime => "pause_time",
            Self::QueueSizeValue => "queue_size_value",
            Self::ReceiveWindowValue => "receive_window_value",
            Self::PauseTimeValue => "pause_time_value",
        }
    }

    /// Kind of value the key accepts.
    #[must_use]
    pub const fn kind(self) -> PrefKind {
        match self {
            Self::Drop | Self::SpamSwitch => PrefKind::Bool,
            _ => PrefKind::Int,
        }
    }

    /// Value a fresh store holds for the key.
    #[must_use]
    pub const fn default_value(self) -> PrefValue {
        match self {
            Self::BlockingManager => PrefValue::Int(MANAGER_CODE_QKSMS),
            Self::Drop | Self::SpamSwitch => PrefValue::Bool(false),
            _ => PrefValue::Int(0),
        }
    }
}

impl Display for PrefKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Kinds of values a preference can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefKind {
    /// Boolean switch.
    Bool,
    /// Signed integer.
    Int,
}

/// A single preference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    /// Boolean switch value.
    Bool(bool),
    /// Integer value (codes, indices, resolved amounts).
    Int(i64),
}

impl PrefValue {
    /// Kind of the held value.
    #[must_use]
    pub const fn kind(self) -> PrefKind {
        match self {
            Self::Bool(_) => PrefKind::Bool,
            Self::Int(_) => PrefKind::Int,
        }
    }

    /// Boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            Self::Int(_) => None,
        }
    }

    /// Integer payload, if this is an integer.
    #[must_use]
    pub const fn as_int(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            Self::Bool(_) => None,
        }
    }
}

impl Display for PrefValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_declared_kinds() {
        for key in PrefKey::ALL {
            assert_eq!(key.default_value().kind(), key.kind(), "{key}");
        }
    }

    #[test]
    fn key_names_match_serde_names() -> Result<(), serde_json::Error> {
        for key in PrefKey::ALL {
            let encoded = serde_json::to_string(&key)?;
            assert_eq!(encoded, format!("\"{}\"", key.as_str()));
        }
        Ok(())
    }

    #[test]
    fn untagged_values_decode_by_shape() -> Result<(), serde_json::Error> {
        assert_eq!(
            serde_json::from_str::<PrefValue>("true")?,
            PrefValue::Bool(true)
        );
        assert_eq!(serde_json::from_str::<PrefValue>("42")?, PrefValue::Int(42));
        assert!(serde_json::from_str::<PrefValue>("\"42\"").is_err());
        Ok(())
    }

    #[test]
    fn accessors_reject_the_other_kind() {
        assert_eq!(PrefValue::Bool(true).as_int(), None);
        assert_eq!(PrefValue::Int(3).as_bool(), None);
        assert_eq!(PrefValue::Int(3).to_string(), "3");
    }
}
