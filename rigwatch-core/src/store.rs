//! Reactive UI store with selector-scoped subscriptions.
//!
//! This is the low-frequency half of the state split. Every mutation is one
//! atomic state transition, and subscribers are only woken when a field
//! their selector names actually changed. Everything visible outside the 3D
//! scene (connection badge, alerts, selection, subsystem health) hangs off
//! this store.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};
use rigwatch_types::{Alert, AlertDraft, Health, Severity, Subsystem, SystemStatus};

/// Default bound on the alert queue.
pub const DEFAULT_MAX_ALERTS: usize = 10;

/// The observable UI state, cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Whether the telemetry feed is live.
    pub connected: bool,
    /// Last connection failure, mutually exclusive with `connected`.
    pub connection_error: Option<String>,
    /// Instant of the most recent accepted sample, ms since the Unix epoch.
    pub last_update_ms: Option<u64>,
    /// The rig under inspection, if any. At most one at a time.
    pub selected_rig: Option<String>,
    pub show_debug: bool,
    pub paused: bool,
    /// Active alerts, newest first, bounded by the store's `max_alerts`.
    pub alerts: VecDeque<Alert>,
    pub system_status: SystemStatus,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            connected: false,
            connection_error: None,
            last_update_ms: None,
            selected_rig: None,
            show_debug: false,
            paused: false,
            alerts: VecDeque::new(),
            system_status: SystemStatus::default(),
        }
    }
}

/// One observable field of [`UiState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    Connected,
    ConnectionError,
    LastUpdate,
    SelectedRig,
    ShowDebug,
    Paused,
    Alerts,
    SystemStatus,
}

impl StateField {
    const COUNT: u16 = 8;

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A set of [`StateField`]s.
///
/// Used both as a subscription selector and as the change set a mutation
/// reports. A subscriber fires only when its selector intersects the
/// change set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet(u16);

impl FieldSet {
    pub const EMPTY: FieldSet = FieldSet(0);

    /// The set containing the given fields.
    pub fn of(fields: &[StateField]) -> Self {
        let mut set = Self::EMPTY;
        for field in fields {
            set.insert(*field);
        }
        set
    }

    /// The set containing every field.
    pub fn all() -> Self {
        FieldSet((1 << StateField::COUNT) - 1)
    }

    pub fn insert(&mut self, field: StateField) {
        self.0 |= field.bit();
    }

    pub fn contains(self, field: StateField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn intersects(self, other: FieldSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<StateField> for FieldSet {
    fn from(field: StateField) -> Self {
        FieldSet(field.bit())
    }
}

type Callback = Arc<dyn Fn(&UiState, FieldSet) + Send + Sync>;

struct Subscriber {
    id: u64,
    selector: FieldSet,
    callback: Callback,
}

/// Token returned by [`UiStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// The reactive store backing every non-3D panel.
///
/// Mutation operations are atomic with respect to observers: each is
/// applied as a single state transition under one lock, so concurrent
/// callers serialize cleanly and no read-modify-write can interleave.
/// Notification happens after the transition with a snapshot of the new
/// state, so callbacks may call further mutations (they will observe the
/// store post-transition).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use rigwatch_core::{FieldSet, StateField, UiStore};
///
/// let store = UiStore::new();
/// let fired = Arc::new(AtomicUsize::new(0));
///
/// let counter = fired.clone();
/// store.subscribe(FieldSet::of(&[StateField::Connected]), move |state, _| {
///     if state.connected {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }
/// });
///
/// store.set_connected(true);
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
pub struct UiStore {
    state: Mutex<UiState>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_subscriber_id: AtomicU64,
    next_alert_id: AtomicU64,
    max_alerts: usize,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    /// Create a store bounded at [`DEFAULT_MAX_ALERTS`].
    pub fn new() -> Self {
        Self::with_max_alerts(DEFAULT_MAX_ALERTS)
    }

    /// Create a store with an explicit alert queue bound.
    pub fn with_max_alerts(max_alerts: usize) -> Self {
        Self {
            state: Mutex::new(UiState::default()),
            subscribers: RwLock::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(0),
            // Seeded from the wall clock so ids stay monotonic across runs.
            next_alert_id: AtomicU64::new(now_ms()),
            max_alerts,
        }
    }

    /// The configured alert queue bound.
    pub fn max_alerts(&self) -> usize {
        self.max_alerts
    }

    /// Copy out the current full state.
    pub fn get(&self) -> UiState {
        self.state.lock().clone()
    }

    /// Register a callback for mutations touching any field in `selector`.
    ///
    /// The callback receives the post-mutation state and the set of fields
    /// that changed. Keep callbacks light; heavy consumers should set a
    /// flag or send on a channel and do their work elsewhere.
    pub fn subscribe<F>(&self, selector: impl Into<FieldSet>, callback: F) -> SubscriptionId
    where
        F: Fn(&UiState, FieldSet) + Send + Sync + 'static,
    {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().push(Subscriber {
            id,
            selector: selector.into(),
            callback: Arc::new(callback),
        });
        SubscriptionId(id)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id.0);
        subscribers.len() != before
    }

    /// Mark the feed live. Clears any previous connection error.
    pub fn set_connected(&self, connected: bool) {
        self.mutate(|state| {
            let mut changed = FieldSet::EMPTY;
            if state.connected != connected {
                state.connected = connected;
                changed.insert(StateField::Connected);
            }
            if state.connection_error.is_some() {
                state.connection_error = None;
                changed.insert(StateField::ConnectionError);
            }
            changed
        });
    }

    /// Record a connection failure. Implies `connected = false`; the last
    /// good telemetry is retained so panels can show stale-but-last-known
    /// values while disconnected.
    pub fn set_connection_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.mutate(|state| {
            let mut changed = FieldSet::EMPTY;
            if state.connected {
                state.connected = false;
                changed.insert(StateField::Connected);
            }
            if state.connection_error.as_deref() != Some(message.as_str()) {
                state.connection_error = Some(message.clone());
                changed.insert(StateField::ConnectionError);
            }
            changed
        });
    }

    /// Record the instant of the most recent accepted sample.
    pub fn set_last_update(&self, timestamp_ms: u64) {
        self.mutate(|state| {
            if state.last_update_ms == Some(timestamp_ms) {
                FieldSet::EMPTY
            } else {
                state.last_update_ms = Some(timestamp_ms);
                StateField::LastUpdate.into()
            }
        });
    }

    /// Put a rig under inspection. At most one rig is selected at a time;
    /// selecting replaces any previous selection.
    pub fn set_selected_rig(&self, rig_id: impl Into<String>) {
        let rig_id = rig_id.into();
        self.mutate(|state| {
            if state.selected_rig.as_deref() == Some(rig_id.as_str()) {
                FieldSet::EMPTY
            } else {
                state.selected_rig = Some(rig_id.clone());
                StateField::SelectedRig.into()
            }
        });
    }

    /// Clear the inspection selection.
    pub fn clear_selected_rig(&self) {
        self.mutate(|state| {
            if state.selected_rig.is_none() {
                FieldSet::EMPTY
            } else {
                state.selected_rig = None;
                StateField::SelectedRig.into()
            }
        });
    }

    pub fn toggle_debug(&self) {
        self.mutate(|state| {
            state.show_debug = !state.show_debug;
            StateField::ShowDebug.into()
        });
    }

    pub fn toggle_pause(&self) {
        self.mutate(|state| {
            state.paused = !state.paused;
            StateField::Paused.into()
        });
    }

    /// Insert an alert at the front of the queue, assigning `id` and
    /// `timestamp_ms` if the draft does not carry them, then truncate to
    /// the configured bound (the oldest entries are evicted).
    ///
    /// Returns the stored alert.
    pub fn add_alert(&self, draft: AlertDraft) -> Alert {
        let fallback_id = self.next_alert_id.fetch_add(1, Ordering::Relaxed);
        let alert = draft.finalize(fallback_id, now_ms());
        let stored = alert.clone();

        self.mutate(move |state| {
            state.alerts.push_front(alert);
            state.alerts.truncate(self.max_alerts);
            StateField::Alerts.into()
        });

        stored
    }

    /// Empty the alert queue.
    pub fn clear_alerts(&self) {
        self.mutate(|state| {
            if state.alerts.is_empty() {
                FieldSet::EMPTY
            } else {
                state.alerts.clear();
                StateField::Alerts.into()
            }
        });
    }

    /// Remove the alert with the given id, wherever it sits in the queue.
    /// A no-op if no such alert exists.
    pub fn dismiss_alert(&self, id: u64) {
        self.mutate(|state| {
            let before = state.alerts.len();
            state.alerts.retain(|a| a.id != id);
            if state.alerts.len() == before {
                FieldSet::EMPTY
            } else {
                StateField::Alerts.into()
            }
        });
    }

    /// Set the health label for one subsystem, leaving the others alone.
    pub fn set_system_status(&self, subsystem: Subsystem, health: Health) {
        self.mutate(|state| {
            if state.system_status.get(subsystem) == health {
                FieldSet::EMPTY
            } else {
                state.system_status.set(subsystem, health);
                StateField::SystemStatus.into()
            }
        });
    }

    /// Number of active alerts.
    pub fn alert_count(&self) -> usize {
        self.state.lock().alerts.len()
    }

    /// Whether any active alert is critical.
    pub fn has_critical_alerts(&self) -> bool {
        self.state
            .lock()
            .alerts
            .iter()
            .any(|a| a.severity == Severity::Critical)
    }

    /// Apply one atomic state transition, then notify matching subscribers
    /// with a snapshot of the new state.
    fn mutate<F>(&self, transition: F)
    where
        F: FnOnce(&mut UiState) -> FieldSet,
    {
        let (snapshot, changed) = {
            let mut state = self.state.lock();
            let changed = transition(&mut state);
            if changed.is_empty() {
                return;
            }
            (state.clone(), changed)
        };

        // Clone the matching callbacks out so subscribers can be added or
        // removed from inside a callback without deadlocking.
        let callbacks: Vec<Callback> = self
            .subscribers
            .read()
            .iter()
            .filter(|s| s.selector.intersects(changed))
            .map(|s| s.callback.clone())
            .collect();

        for callback in callbacks {
            callback(&snapshot, changed);
        }
    }
}

impl std::fmt::Debug for UiStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiStore")
            .field("max_alerts", &self.max_alerts)
            .field("subscribers", &self.subscribers.read().len())
            .finish()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigwatch_types::Severity;
    use std::sync::atomic::AtomicUsize;

    fn draft(machine: &str, n: u64) -> AlertDraft {
        AlertDraft::new(machine, format!("alert #{n}"), Severity::Warning)
            .score(0.6)
            .method("zscore")
            .timestamp_ms(n)
    }

    #[test]
    fn connection_error_forces_disconnected() {
        let store = UiStore::new();
        store.set_connected(true);

        store.set_connection_error("broker unreachable");

        let state = store.get();
        assert!(!state.connected);
        assert_eq!(state.connection_error.as_deref(), Some("broker unreachable"));
    }

    #[test]
    fn reconnecting_clears_the_error() {
        let store = UiStore::new();
        store.set_connection_error("broker unreachable");

        store.set_connected(true);

        let state = store.get();
        assert!(state.connected);
        assert_eq!(state.connection_error, None);
    }

    #[test]
    fn connected_and_error_are_never_held_together() {
        let store = UiStore::new();
        let assert_exclusive = |store: &UiStore| {
            let state = store.get();
            assert!(
                !(state.connected && state.connection_error.is_some()),
                "connected=true with error={:?}",
                state.connection_error
            );
        };

        // Exercise every transition between the two operations and check
        // the invariant after each.
        store.set_connected(true);
        assert_exclusive(&store);
        store.set_connection_error("lost");
        assert_exclusive(&store);
        store.set_connected(true);
        assert_exclusive(&store);
        store.set_connected(false);
        assert_exclusive(&store);
        store.set_connection_error("lost again");
        assert_exclusive(&store);
    }

    #[test]
    fn alerts_are_newest_first_and_bounded() {
        let store = UiStore::with_max_alerts(10);

        for n in 1..=12u64 {
            store.add_alert(draft("A", n));
            assert!(store.alert_count() <= 10);
        }

        let state = store.get();
        assert_eq!(state.alerts.len(), 10);
        // Alerts #3..=#12 remain, newest first; the two oldest were evicted.
        let messages: Vec<&str> = state.alerts.iter().map(|a| a.message.as_str()).collect();
        let expected: Vec<String> = (3..=12).rev().map(|n| format!("alert #{n}")).collect();
        assert_eq!(messages, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn dismiss_removes_exactly_one_and_keeps_order() {
        let store = UiStore::new();
        let kept_a = store.add_alert(draft("A", 1));
        let victim = store.add_alert(draft("B", 2));
        let kept_b = store.add_alert(draft("C", 3));

        store.dismiss_alert(victim.id);

        let state = store.get();
        let ids: Vec<u64> = state.alerts.iter().map(|a| a.id).collect();
        assert_eq!(ids, [kept_b.id, kept_a.id]);
    }

    #[test]
    fn dismissing_an_absent_id_is_a_no_op() {
        let store = UiStore::new();
        store.add_alert(draft("A", 1));
        let before = store.get();

        store.dismiss_alert(u64::MAX);

        assert_eq!(store.get(), before);
    }

    #[test]
    fn clear_alerts_empties_the_queue() {
        let store = UiStore::new();
        store.add_alert(draft("A", 1));
        store.add_alert(draft("B", 2));

        store.clear_alerts();

        assert_eq!(store.alert_count(), 0);
    }

    #[test]
    fn alert_ids_are_unique_and_monotonic() {
        let store = UiStore::new();

        let ids: Vec<u64> = (0..50).map(|n| store.add_alert(draft("A", n)).id).collect();

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "ids must be unique");
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be monotonic");
    }

    #[test]
    fn draft_identity_is_respected() {
        let store = UiStore::new();
        let alert = store.add_alert(draft("A", 1).id(99).timestamp_ms(12345));

        assert_eq!(alert.id, 99);
        assert_eq!(alert.timestamp_ms, 12345);
    }

    #[test]
    fn selection_is_single_and_clearable() {
        let store = UiStore::new();

        store.set_selected_rig("A");
        store.set_selected_rig("B");
        assert_eq!(store.get().selected_rig.as_deref(), Some("B"));

        store.clear_selected_rig();
        assert_eq!(store.get().selected_rig, None);
    }

    #[test]
    fn toggles_flip_their_flags() {
        let store = UiStore::new();

        store.toggle_debug();
        store.toggle_pause();
        let state = store.get();
        assert!(state.show_debug);
        assert!(state.paused);

        store.toggle_debug();
        assert!(!store.get().show_debug);
    }

    #[test]
    fn system_status_merges_per_subsystem() {
        let store = UiStore::new();

        store.set_system_status(Subsystem::Database, Health::Ok);
        store.set_system_status(Subsystem::Scoring, Health::Down);

        let status = store.get().system_status;
        assert_eq!(status.database, Health::Ok);
        assert_eq!(status.scoring, Health::Down);
        assert_eq!(status.broker, Health::Unknown);
    }

    #[test]
    fn subscriber_only_fires_for_selected_fields() {
        let store = UiStore::new();
        let connected_fires = Arc::new(AtomicUsize::new(0));
        let alert_fires = Arc::new(AtomicUsize::new(0));

        let counter = connected_fires.clone();
        store.subscribe(FieldSet::of(&[StateField::Connected]), move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = alert_fires.clone();
        store.subscribe(FieldSet::of(&[StateField::Alerts]), move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.add_alert(draft("A", 1));
        assert_eq!(connected_fires.load(Ordering::SeqCst), 0);
        assert_eq!(alert_fires.load(Ordering::SeqCst), 1);

        store.set_connected(true);
        assert_eq!(connected_fires.load(Ordering::SeqCst), 1);
        assert_eq!(alert_fires.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_sees_the_changed_fields() {
        let store = UiStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        store.subscribe(FieldSet::all(), move |_, changed| {
            sink.lock().push(changed);
        });

        store.set_connection_error("down");

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains(StateField::ConnectionError));
        // connected was already false, so only the error field changed
        assert!(!seen[0].contains(StateField::Connected));
    }

    #[test]
    fn no_change_means_no_notification() {
        let store = UiStore::new();
        let fires = Arc::new(AtomicUsize::new(0));

        let counter = fires.clone();
        store.subscribe(FieldSet::all(), move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.set_connected(false); // already false, no error set
        store.clear_selected_rig(); // already none
        store.clear_alerts(); // already empty
        store.dismiss_alert(1); // absent

        assert_eq!(fires.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = UiStore::new();
        let fires = Arc::new(AtomicUsize::new(0));

        let counter = fires.clone();
        let id = store.subscribe(FieldSet::all(), move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.set_connected(true);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_connected(false);

        assert_eq!(fires.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callbacks_may_mutate_the_store() {
        let store = Arc::new(UiStore::new());

        // Losing the connection clears the selection, from inside a callback.
        let inner = store.clone();
        store.subscribe(FieldSet::of(&[StateField::Connected]), move |state, _| {
            if !state.connected {
                inner.clear_selected_rig();
            }
        });

        store.set_selected_rig("A");
        store.set_connected(true);
        store.set_connection_error("gone");

        assert_eq!(store.get().selected_rig, None);
    }

    #[test]
    fn concurrent_add_alert_never_exceeds_the_bound() {
        use std::thread;

        let store = Arc::new(UiStore::with_max_alerts(10));

        let mut handles = Vec::new();
        for t in 0..8u64 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                for n in 0..100u64 {
                    store.add_alert(draft("A", t * 100 + n));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.alert_count(), 10);
    }

    #[test]
    fn has_critical_alerts_checks_severity() {
        let store = UiStore::new();
        store.add_alert(draft("A", 1));
        assert!(!store.has_critical_alerts());

        store.add_alert(AlertDraft::new("B", "bad", Severity::Critical).score(0.9));
        assert!(store.has_critical_alerts());
    }
}
