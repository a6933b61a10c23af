//! Spam filter tuning tables.
//!
//! # Design
//! - Each tunable threshold is picked from a fixed, non-empty list of labeled
//!   options; the selected index and the resolved value live in separate keys.
//! - Tables are immutable once built and shared between sessions.

use blocking_prefs::PrefKey;

use crate::error::{SettingsError, SettingsResult};
use crate::surface::DialogKind;

/// The three spam filter thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TuningKind {
    /// Number of messages remembered per sender.
    QueueSize,
    /// Window in which repeated messages count as spam.
    ReceiveWindow,
    /// How long a sender stays blocked.
    PauseTime,
}

impl TuningKind {
    /// Every threshold, in screen order.
    pub const ALL: [Self; 3] = [Self::QueueSize, Self::ReceiveWindow, Self::PauseTime];

    /// Table name used in errors and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::QueueSize => "queue_size",
            Self::ReceiveWindow => "receive_window",
            Self::PauseTime => "pause_time",
        }
    }

    /// Key holding the selected index.
    #[must_use]
    pub const fn index_key(self) -> PrefKey {
        match self {
            Self::QueueSize => PrefKey::QueueSize,
            Self::ReceiveWindow => PrefKey::ReceiveWindow,
            Self::PauseTime => PrefKey::PauseTime,
        }
    }

    /// Key receiving the value resolved from the selected index.
    #[must_use]
    pub const fn value_key(self) -> PrefKey {
        match self {
            Self::QueueSize => PrefKey::QueueSizeValue,
            Self::ReceiveWindow => PrefKey::ReceiveWindowValue,
            Self::PauseTime => PrefKey::PauseTimeValue,
        }
    }

    /// Threshold whose index is stored under `key`.
    #[must_use]
    pub const fn from_index_key(key: PrefKey) -> Option<Self> {
        match key {
            PrefKey::QueueSize => Some(Self::QueueSize),
            PrefKey::ReceiveWindow => Some(Self::ReceiveWindow),
            PrefKey::PauseTime => Some(Self::PauseTime),
            _ => None,
        }
    }

    /// Selection dialog for the threshold.
    #[must_use]
    pub const fn dialog(self) -> DialogKind {
        match self {
            Self::QueueSize => DialogKind::QueueSize,
            Self::ReceiveWindow => DialogKind::ReceiveWindow,
            Self::PauseTime => DialogKind::PauseTime,
        }
    }
}

/// One labeled option of a tuning table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuningOption {
    /// Text shown in the dialog and as the row summary.
    pub label: String,
    /// Value written to the derived preference when selected.
    pub stored_value: i64,
}

impl TuningOption {
    /// Build an option from a label and its stored value.
    #[must_use]
    pub fn new(label: impl Into<String>, stored_value: i64) -> Self {
        Self {
            label: label.into(),
            stored_value,
        }
    }
}

/// Ordered, non-empty list of options for one threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuningTable {
    kind: TuningKind,
    options: Vec<TuningOption>,
}

impl TuningTable {
    /// Build a table for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EmptyTable`] when `options` is empty.
    pub fn new(kind: TuningKind, options: Vec<TuningOption>) -> SettingsResult<Self> {
        if options.is_empty() {
            return Err(SettingsError::EmptyTable { table: kind.name() });
        }
        Ok(Self { kind, options })
    }

    /// Build a table from `(label, stored_value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EmptyTable`] when `pairs` is empty.
    pub fn from_pairs<'a>(
        kind: TuningKind,
        pairs: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> SettingsResult<Self> {
        Self::new(
            kind,
            pairs
                .into_iter()
                .map(|(label, value)| TuningOption::new(label, value))
                .collect(),
        )
    }

    /// Threshold this table configures.
    #[must_use]
    pub const fn kind(&self) -> TuningKind {
        self.kind
    }

    /// Number of options.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.options.len()
    }

    /// Always `false`; tables are never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[TuningOption] {
        &self.options
    }

    /// Option stored at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IndexOutOfRange`] when `index` is negative or
    /// past the end of the table.
    pub fn option(&self, index: i64) -> SettingsResult<(usize, &TuningOption)> {
        usize::try_from(index)
            .ok()
            .and_then(|position| self.options.get(position).map(|option| (position, option)))
            .ok_or(SettingsError::IndexOutOfRange {
                table: self.kind.name(),
                index,
                len: self.options.len(),
            })
    }
}

/// The three tables supplied to the synchronizer at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuningTables {
    queue_size: TuningTable,
    receive_window: TuningTable,
    pause_time: TuningTable,
}

impl TuningTables {
    /// Bundle three tables.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MisplacedTable`] when a table configures a
    /// different threshold than the slot it is passed in.
    pub fn new(
        queue_size: TuningTable,
        receive_window: TuningTable,
        pause_time: TuningTable,
    ) -> SettingsResult<Self> {
        ensure_slot(TuningKind::QueueSize, &queue_size)?;
        ensure_slot(TuningKind::ReceiveWindow, &receive_window)?;
        ensure_slot(TuningKind::PauseTime, &pause_time)?;
        Ok(Self {
            queue_size,
            receive_window,
            pause_time,
        })
    }

    /// Default option lists shipped with the app.
    ///
    /// Receive window and pause time values are milliseconds.
    #[must_use]
    pub fn standard() -> Self {
        let table = |kind: TuningKind, pairs: &[(&str, i64)]| TuningTable {
            kind,
            options: pairs
                .iter()
                .map(|(label, value)| TuningOption::new(*label, *value))
                .collect(),
        };
        Self {
            queue_size: table(
                TuningKind::QueueSize,
                &[("3", 3), ("5", 5), ("10", 10), ("20", 20)],
            ),
            receive_window: table(
                TuningKind::ReceiveWindow,
                &[
                    ("1 minute", 60_000),
                    ("5 minutes", 300_000),
                    ("15 minutes", 900_000),
                    ("1 hour", 3_600_000),
                ],
            ),
            pause_time: table(
                TuningKind::PauseTime,
                &[
                    ("15 minutes", 900_000),
                    ("1 hour", 3_600_000),
                    ("6 hours", 21_600_000),
                    ("1 day", 86_400_000),
                ],
            ),
        }
    }

    /// Table for `kind`.
    #[must_use]
    pub const fn get(&self, kind: TuningKind) -> &TuningTable {
        match kind {
            TuningKind::QueueSize => &self.queue_size,
            TuningKind::ReceiveWindow => &self.receive_window,
            TuningKind::PauseTime => &self.pause_time,
        }
    }
}

fn ensure_slot(slot: TuningKind, table: &TuningTable) -> SettingsResult<()> {
    if table.kind() == slot {
        Ok(())
    } else {
        Err(SettingsError::MisplacedTable {
            slot: slot.name(),
            table: table.kind().name(),
        })
    }
}
