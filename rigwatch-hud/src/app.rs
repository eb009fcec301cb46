//! Application state for the HUD.
//!
//! `App` is the composition root on the read side: it subscribes to the
//! reactive store for everything change-driven, owns the polling readers
//! for the numeric panels, and exposes the methods the key handler maps
//! input onto. It never mutates the telemetry table.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rigwatch_core::{
    DisplayReader, FieldSet, ReaderConfig, ReaderHandle, TelemetryTable, UiState, UiStore,
};
use rigwatch_types::RigSnapshot;
use tokio::sync::watch;

use crate::readout::DisplayThresholds;
use crate::ui::Theme;

/// How long a transient status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The running inspection reader for one rig.
struct DetailReader {
    rig_id: String,
    rows: watch::Receiver<Vec<(String, RigSnapshot)>>,
    handle: ReaderHandle,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    store: Arc<UiStore>,
    table: Arc<TelemetryTable>,

    /// Latest reactive state, refreshed only when the subscription fires.
    pub ui: UiState,
    dirty: Arc<AtomicBool>,

    /// Latest aggregate rows from the 500 ms summary reader.
    pub stats: Vec<(String, RigSnapshot)>,
    summary_rows: watch::Receiver<Vec<(String, RigSnapshot)>>,
    _summary_reader: ReaderHandle,

    /// Latest detail row from the 100 ms reader over the selected rig.
    pub inspected: Option<(String, RigSnapshot)>,
    detail: Option<DetailReader>,
    detail_interval: Duration,

    pub thresholds: DisplayThresholds,
    pub theme: Theme,

    status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app and start the aggregate summary reader.
    ///
    /// Must be called within a tokio runtime (the readers spawn tasks).
    pub fn new(
        store: Arc<UiStore>,
        table: Arc<TelemetryTable>,
        thresholds: DisplayThresholds,
        summary_interval: Duration,
        detail_interval: Duration,
    ) -> Self {
        // The overlay only re-reads the reactive state when a field it
        // shows actually changed; the subscription just flips a flag.
        let dirty = Arc::new(AtomicBool::new(false));
        let flag = dirty.clone();
        store.subscribe(FieldSet::all(), move |_, _| {
            flag.store(true, Ordering::Relaxed);
        });

        let (summary_reader, summary_rows) =
            DisplayReader::channel(table.clone(), ReaderConfig::all(summary_interval));

        let ui = store.get();
        Self {
            running: true,
            show_help: false,
            store,
            table,
            ui,
            dirty,
            stats: Vec::new(),
            summary_rows,
            _summary_reader: summary_reader,
            inspected: None,
            detail: None,
            detail_interval,
            thresholds,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Per-frame upkeep: refresh reactive state if the subscription fired,
    /// and pull the latest reader rows unless paused.
    pub fn tick(&mut self) {
        if self.dirty.swap(false, Ordering::Relaxed) {
            self.sync_ui();
        }

        if !self.ui.paused {
            self.stats = self.summary_rows.borrow().clone();
            if let Some(detail) = &self.detail {
                self.inspected = detail
                    .rows
                    .borrow()
                    .first()
                    .map(|(id, snapshot)| (id.clone(), snapshot.clone()));
            }
        }
    }

    /// Re-read the store and react to a selection change by restarting the
    /// inspection reader.
    fn sync_ui(&mut self) {
        let next = self.store.get();
        if next.selected_rig != self.ui.selected_rig {
            self.restart_detail_reader(next.selected_rig.clone());
        }
        self.ui = next;
    }

    /// Stop the old inspection reader (releasing its timer) and start one
    /// for the newly selected rig, if any.
    fn restart_detail_reader(&mut self, rig_id: Option<String>) {
        if let Some(detail) = self.detail.take() {
            detail.handle.stop();
        }
        self.inspected = None;

        if let Some(rig_id) = rig_id {
            let (handle, rows) = DisplayReader::channel(
                self.table.clone(),
                ReaderConfig::one(self.detail_interval, rig_id.clone()),
            );
            self.detail = Some(DetailReader {
                rig_id,
                rows,
                handle,
            });
        }
    }

    /// The rig the inspection reader is currently polling.
    pub fn inspected_rig(&self) -> Option<&str> {
        self.detail.as_ref().map(|d| d.rig_id.as_str())
    }

    /// The known rig ids, in display order.
    pub fn rig_ids(&self) -> Vec<String> {
        self.table.rig_ids().map(String::from).collect()
    }

    /// Select the nth rig (0-based). Out-of-range indices are ignored.
    pub fn select_rig_at(&mut self, index: usize) {
        let ids = self.rig_ids();
        if let Some(id) = ids.get(index) {
            self.store.set_selected_rig(id.clone());
        }
    }

    /// Cycle the selection through the known rigs, starting inspection on
    /// the first rig when nothing is selected.
    pub fn cycle_selection(&mut self) {
        let ids = self.rig_ids();
        if ids.is_empty() {
            return;
        }
        // Read the store, not the render-loop cache: consecutive cycles
        // within one frame must each advance.
        let current = self.store.get().selected_rig;
        let next = match current.as_deref() {
            None => 0,
            Some(current) => ids
                .iter()
                .position(|id| id == current)
                .map_or(0, |i| (i + 1) % ids.len()),
        };
        self.store.set_selected_rig(ids[next].clone());
    }

    /// Close the inspection panel.
    pub fn clear_selection(&mut self) {
        self.store.clear_selected_rig();
    }

    /// Dismiss the newest alert.
    pub fn dismiss_front_alert(&mut self) {
        let state = self.store.get();
        if let Some(alert) = state.alerts.front() {
            self.store.dismiss_alert(alert.id);
            self.set_status_message(format!("dismissed alert for rig {}", alert.machine_id));
        }
    }

    pub fn clear_alerts(&mut self) {
        self.store.clear_alerts();
    }

    pub fn toggle_debug(&mut self) {
        self.store.toggle_debug();
    }

    pub fn toggle_pause(&mut self) {
        self.store.toggle_pause();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set a temporary status message shown in the controls line.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// The current status message, if it has not expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((message, since)) if since.elapsed() < STATUS_MESSAGE_TTL => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigwatch_core::IngestionBridge;
    use rigwatch_types::{RigPatch, SampleEvent};

    fn fixture() -> (App, Arc<UiStore>, Arc<TelemetryTable>) {
        let store = Arc::new(UiStore::new());
        let table = Arc::new(TelemetryTable::with_defaults(["A", "B", "C"]));
        let app = App::new(
            store.clone(),
            table.clone(),
            DisplayThresholds::default(),
            Duration::from_millis(500),
            Duration::from_millis(100),
        );
        (app, store, table)
    }

    #[tokio::test(start_paused = true)]
    async fn stats_follow_the_summary_reader() {
        let (mut app, _store, table) = fixture();

        table.merge("A", &RigPatch::new().rpm(3333.0)).unwrap();
        tokio::time::sleep(Duration::from_millis(501)).await;
        app.tick();

        assert_eq!(app.stats.len(), 3);
        assert_eq!(app.stats[0].1.rpm, 3333.0);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_starts_and_stops_the_detail_reader() {
        let (mut app, store, _table) = fixture();
        assert_eq!(app.inspected_rig(), None);

        store.set_selected_rig("B");
        app.tick();
        assert_eq!(app.inspected_rig(), Some("B"));

        tokio::time::sleep(Duration::from_millis(101)).await;
        app.tick();
        let (id, _) = app.inspected.clone().expect("detail row present");
        assert_eq!(id, "B");

        store.clear_selected_rig();
        app.tick();
        assert_eq!(app.inspected_rig(), None);
        assert_eq!(app.inspected, None);
    }

    #[tokio::test(start_paused = true)]
    async fn changing_selection_restarts_the_reader_for_the_new_rig() {
        let (mut app, store, _table) = fixture();

        store.set_selected_rig("A");
        app.tick();
        store.set_selected_rig("C");
        app.tick();

        assert_eq!(app.inspected_rig(), Some("C"));
        tokio::time::sleep(Duration::from_millis(101)).await;
        app.tick();
        assert_eq!(app.inspected.as_ref().unwrap().0, "C");
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_selection_walks_the_fleet() {
        let (mut app, _store, _table) = fixture();

        app.cycle_selection();
        app.tick();
        assert_eq!(app.ui.selected_rig.as_deref(), Some("A"));

        app.cycle_selection();
        app.tick();
        assert_eq!(app.ui.selected_rig.as_deref(), Some("B"));

        app.cycle_selection();
        app.cycle_selection();
        app.tick();
        assert_eq!(app.ui.selected_rig.as_deref(), Some("A"));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_the_panels_but_not_ingestion() {
        let (mut app, store, table) = fixture();
        let bridge = IngestionBridge::new(table.clone(), store.clone());

        tokio::time::sleep(Duration::from_millis(501)).await;
        app.tick();
        let before = app.stats.clone();

        app.toggle_pause();
        app.tick();
        assert!(app.ui.paused);

        // Ingestion keeps flowing while paused.
        bridge
            .on_sample(&SampleEvent::new("A", RigPatch::new().rpm(4000.0)))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(501)).await;
        app.tick();

        assert_eq!(app.stats, before, "panels are frozen while paused");
        assert_eq!(table.read("A").unwrap().rpm, 4000.0);

        app.toggle_pause();
        app.tick();
        assert_eq!(app.stats[0].1.rpm, 4000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_front_alert_targets_the_newest() {
        let (mut app, store, _table) = fixture();
        use rigwatch_types::{AlertDraft, Severity};

        let old = store.add_alert(AlertDraft::new("A", "older", Severity::Warning));
        store.add_alert(AlertDraft::new("B", "newest", Severity::Critical));
        app.tick();

        app.dismiss_front_alert();
        app.tick();

        let ids: Vec<u64> = app.ui.alerts.iter().map(|a| a.id).collect();
        assert_eq!(ids, [old.id]);
        assert!(app.get_status_message().unwrap().contains("rig B"));
    }
}
