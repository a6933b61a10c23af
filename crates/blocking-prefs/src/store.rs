//! Observable preference store with one unbounded channel per observer.
//!
//! # Design
//! - Each key keeps the senders of its observers; observers receive the
//!   current value first and then every later write in order, without loss.
//! - Senders whose stream was dropped are pruned on the next write.
//! - The current value is captured under the same lock as the subscription,
//!   so no write can fall between the replay and the live feed.
//! - Writes are never suppressed, even when the value is unchanged.

use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::trace;

use crate::error::{PrefsError, PrefsResult};
use crate::model::{PrefKey, PrefKind, PrefValue};

/// Abstraction over preference backends consumed by the settings screen.
pub trait PreferenceStore: Send + Sync {
    /// Current value for `key`.
    fn get(&self, key: PrefKey) -> PrefValue;

    /// Replace the value stored under `key` and notify its observers.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::TypeMismatch`] when `value` does not match the
    /// kind declared by `key`.
    fn set(&self, key: PrefKey, value: PrefValue) -> PrefsResult<()>;

    /// Observe `key`, starting with its current value.
    fn observe(&self, key: PrefKey) -> PreferenceStream;
}

/// Typed helpers layered over any [`PreferenceStore`].
pub trait PreferenceStoreExt: PreferenceStore {
    /// Read a boolean preference.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::TypeMismatch`] when the key holds an integer.
    fn get_bool(&self, key: PrefKey) -> PrefsResult<bool> {
        let value = self.get(key);
        value.as_bool().ok_or(PrefsError::TypeMismatch {
            key,
            expected: PrefKind::Bool,
            found: value.kind(),
        })
    }

    /// Read an integer preference.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::TypeMismatch`] when the key holds a boolean.
    fn get_int(&self, key: PrefKey) -> PrefsResult<i64> {
        let value = self.get(key);
        value.as_int().ok_or(PrefsError::TypeMismatch {
            key,
            expected: PrefKind::Int,
            found: value.kind(),
        })
    }

    /// Write a boolean preference.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::TypeMismatch`] when the key is not boolean.
    fn set_bool(&self, key: PrefKey, value: bool) -> PrefsResult<()> {
        self.set(key, PrefValue::Bool(value))
    }

    /// Write an integer preference.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::TypeMismatch`] when the key is not an integer.
    fn set_int(&self, key: PrefKey, value: i64) -> PrefsResult<()> {
        self.set(key, PrefValue::Int(value))
    }

    /// Flip a boolean preference and return the value written.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::TypeMismatch`] when the key is not boolean.
    fn toggle(&self, key: PrefKey) -> PrefsResult<bool> {
        let next = !self.get_bool(key)?;
        self.set_bool(key, next)?;
        Ok(next)
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStoreExt for T {}

struct Slot {
    value: PrefValue,
    observers: Vec<mpsc::UnboundedSender<PrefValue>>,
}

impl Slot {
    const fn new(value: PrefValue) -> Self {
        Self {
            value,
            observers: Vec::new(),
        }
    }
}

/// In-process preference store shared across the application.
#[derive(Clone)]
pub struct MemoryPreferences {
    slots: Arc<Mutex<BTreeMap<PrefKey, Slot>>>,
}

impl MemoryPreferences {
    /// Construct a store holding the default value of every key.
    #[must_use]
    pub fn new() -> Self {
        let slots = PrefKey::ALL
            .into_iter()
            .map(|key| (key, Slot::new(key.default_value())))
            .collect();
        Self {
            slots: Arc::new(Mutex::new(slots)),
        }
    }

    /// Construct a store seeded with `values`; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::TypeMismatch`] for the first value whose kind
    /// does not match its key.
    pub fn with_values(
        values: impl IntoIterator<Item = (PrefKey, PrefValue)>,
    ) -> PrefsResult<Self> {
        let store = Self::new();
        {
            let mut slots = store.lock_slots();
            for (key, value) in values {
                ensure_kind(key, value)?;
                if let Some(slot) = slots.get_mut(&key) {
                    slot.value = value;
                }
            }
        }
        Ok(store)
    }

    /// Current value of every key.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<PrefKey, PrefValue> {
        self.lock_slots()
            .iter()
            .map(|(key, slot)| (*key, slot.value))
            .collect()
    }

    /// Number of live observers for `key`.
    #[must_use]
    pub fn subscriber_count(&self, key: PrefKey) -> usize {
        self.lock_slots()
            .get(&key)
            .map_or(0, |slot| {
                slot.observers
                    .iter()
                    .filter(|observer| !observer.is_closed())
                    .count()
            })
    }

    fn lock_slots(&self) -> MutexGuard<'_, BTreeMap<PrefKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: PrefKey) -> PrefValue {
        self.lock_slots()
            .get(&key)
            .map_or_else(|| key.default_value(), |slot| slot.value)
    }

    fn set(&self, key: PrefKey, value: PrefValue) -> PrefsResult<()> {
        ensure_kind(key, value)?;
        let mut slots = self.lock_slots();
        let slot = slots
            .entry(key)
            .or_insert_with(|| Slot::new(key.default_value()));
        slot.value = value;
        slot.observers
            .retain(|observer| observer.send(value).is_ok());
        let observers = slot.observers.len();
        drop(slots);
        trace!(key = %key, value = %value, observers, "preference written");
        Ok(())
    }

    fn observe(&self, key: PrefKey) -> PreferenceStream {
        let mut slots = self.lock_slots();
        let slot = slots
            .entry(key)
            .or_insert_with(|| Slot::new(key.default_value()));
        let current = slot.value;
        let (sender, receiver) = mpsc::unbounded_channel();
        slot.observers.push(sender);
        drop(slots);
        PreferenceStream {
            key,
            pending: Some(current),
            inner: UnboundedReceiverStream::new(receiver),
        }
    }
}

fn ensure_kind(key: PrefKey, value: PrefValue) -> PrefsResult<()> {
    let expected = key.kind();
    let found = value.kind();
    if expected == found {
        Ok(())
    } else {
        Err(PrefsError::TypeMismatch {
            key,
            expected,
            found,
        })
    }
}

/// Stream of values written to a single key, starting with its current value.
///
/// Dropping the stream releases the subscription.
pub struct PreferenceStream {
    key: PrefKey,
    pending: Option<PrefValue>,
    inner: UnboundedReceiverStream<PrefValue>,
}

impl PreferenceStream {
    /// Key this stream observes.
    #[must_use]
    pub const fn key(&self) -> PrefKey {
        self.key
    }
}

impl Stream for PreferenceStream {
    type Item = PrefValue;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(value) = self.pending.take() {
            return Poll::Ready(Some(value));
        }
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
