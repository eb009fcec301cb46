//! Transient telemetry buffer for high-frequency samples.
//!
//! The [`TelemetryTable`] is the write-hot half of the state split: samples
//! land here tens of times per second via in-place merges, and nothing is
//! notified. Consumers poll on their own schedule and copy snapshots out,
//! so the write rate never forces a render or a re-computation anywhere.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use rigwatch_types::{RigPatch, RigSnapshot};

use crate::error::IngestError;

/// A keyed table of per-rig measurement snapshots.
///
/// The set of known rigs is fixed at construction and every rig starts from
/// a default snapshot, so readers never observe a missing entry. Writes go
/// through [`merge`](TelemetryTable::merge) only; reads copy the snapshot
/// out, so a returned value can never change under the caller.
///
/// # Example
///
/// ```rust
/// use rigwatch_core::TelemetryTable;
/// use rigwatch_types::RigPatch;
///
/// let table = TelemetryTable::with_defaults(["A", "B", "C"]);
/// table.merge("A", &RigPatch::new().rpm(3000.0)).unwrap();
///
/// let snapshot = table.read("A").unwrap();
/// assert_eq!(snapshot.rpm, 3000.0);
/// ```
#[derive(Debug)]
pub struct TelemetryTable {
    rigs: BTreeMap<String, RwLock<RigSnapshot>>,
}

impl TelemetryTable {
    /// Create a table with an explicit default snapshot per rig.
    pub fn new<I, S>(rigs: I) -> Self
    where
        I: IntoIterator<Item = (S, RigSnapshot)>,
        S: Into<String>,
    {
        Self {
            rigs: rigs
                .into_iter()
                .map(|(id, snapshot)| (id.into(), RwLock::new(snapshot)))
                .collect(),
        }
    }

    /// Create a table where every rig starts from [`RigSnapshot::default`].
    pub fn with_defaults<I, S>(rig_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(rig_ids.into_iter().map(|id| (id, RigSnapshot::default())))
    }

    /// Whether `rig_id` is in the known set.
    pub fn contains(&self, rig_id: &str) -> bool {
        self.rigs.contains_key(rig_id)
    }

    /// The known rig ids, in sorted order.
    pub fn rig_ids(&self) -> impl Iterator<Item = &str> {
        self.rigs.keys().map(String::as_str)
    }

    /// Number of known rigs.
    pub fn len(&self) -> usize {
        self.rigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rigs.is_empty()
    }

    /// Copy out the current snapshot for a rig.
    ///
    /// Never fails for a known rig: before any sample has arrived this
    /// returns the rig's default snapshot. Returns `None` only for rigs
    /// outside the known set.
    pub fn read(&self, rig_id: &str) -> Option<RigSnapshot> {
        self.rigs.get(rig_id).map(|slot| slot.read().clone())
    }

    /// Copy out every rig's current snapshot, in sorted id order.
    pub fn read_all(&self) -> Vec<(String, RigSnapshot)> {
        self.rigs
            .iter()
            .map(|(id, slot)| (id.clone(), slot.read().clone()))
            .collect()
    }

    /// Merge a partial update into the snapshot for `rig_id`.
    ///
    /// The merge is field-by-field: fields absent from the patch keep their
    /// current values. A sample for an unknown rig is rejected whole with
    /// [`IngestError::UnknownRig`] and nothing is applied.
    pub fn merge(&self, rig_id: &str, patch: &RigPatch) -> Result<(), IngestError> {
        let slot = self
            .rigs
            .get(rig_id)
            .ok_or_else(|| IngestError::UnknownRig(rig_id.to_string()))?;
        slot.write().apply(patch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_before_any_merge_returns_the_default() {
        let table = TelemetryTable::with_defaults(["A", "B", "C"]);

        for id in ["A", "B", "C"] {
            assert_eq!(table.read(id), Some(RigSnapshot::default()));
        }
    }

    #[test]
    fn merge_is_partial_not_replace() {
        let table = TelemetryTable::with_defaults(["A"]);
        let before = table.read("A").unwrap();

        table
            .merge("A", &RigPatch::new().temperature(90.0))
            .unwrap();

        let after = table.read("A").unwrap();
        assert_eq!(after.temperature, 90.0);
        assert_eq!(after.rpm, before.rpm);
        assert_eq!(after.vibration, before.vibration);
        assert_eq!(after.is_running, before.is_running);
    }

    #[test]
    fn merge_unknown_rig_is_rejected() {
        let table = TelemetryTable::with_defaults(["A"]);

        let err = table.merge("Z", &RigPatch::new().rpm(1.0)).unwrap_err();
        assert_eq!(err, IngestError::UnknownRig("Z".to_string()));

        // Nothing was applied anywhere.
        assert_eq!(table.read("A"), Some(RigSnapshot::default()));
        assert_eq!(table.read("Z"), None);
    }

    #[test]
    fn successive_merges_accumulate() {
        let table = TelemetryTable::with_defaults(["A"]);

        table.merge("A", &RigPatch::new().rpm(3000.0)).unwrap();
        table
            .merge("A", &RigPatch::new().anomaly_score(0.8))
            .unwrap();

        let snapshot = table.read("A").unwrap();
        assert_eq!(snapshot.rpm, 3000.0);
        assert_eq!(snapshot.anomaly_score, 0.8);
    }

    #[test]
    fn read_returns_a_copy_not_a_reference() {
        let table = TelemetryTable::with_defaults(["A"]);

        let copy = table.read("A").unwrap();
        table.merge("A", &RigPatch::new().rpm(9.0)).unwrap();

        // The copy taken before the merge is unaffected.
        assert_eq!(copy.rpm, RigSnapshot::default().rpm);
        assert_eq!(table.read("A").unwrap().rpm, 9.0);
    }

    #[test]
    fn read_all_is_sorted_by_rig_id() {
        let table = TelemetryTable::with_defaults(["C", "A", "B"]);

        let ids: Vec<String> = table.read_all().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn per_rig_defaults_are_independent() {
        let mut hot = RigSnapshot::default();
        hot.temperature = 95.0;
        let table = TelemetryTable::new([("A", RigSnapshot::default()), ("B", hot.clone())]);

        assert_eq!(table.read("B").unwrap(), hot);
        assert_eq!(table.read("A").unwrap(), RigSnapshot::default());
    }

    #[test]
    fn concurrent_merges_and_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        // Start from a snapshot where the paired fields already agree.
        let table = Arc::new(TelemetryTable::new([(
            "A",
            RigSnapshot {
                rpm: 0.0,
                pressure: 0.0,
                ..RigSnapshot::default()
            },
        )]));

        let writer = {
            let table = table.clone();
            thread::spawn(move || {
                for i in 0..1000u32 {
                    let v = f64::from(i);
                    // rpm and pressure always move together
                    table
                        .merge("A", &RigPatch::new().rpm(v).pressure(v))
                        .unwrap();
                }
            })
        };

        let reader = {
            let table = table.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    let snapshot = table.read("A").unwrap();
                    // A copy is internally consistent: never a torn pair.
                    assert_eq!(snapshot.rpm, snapshot.pressure);
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
    }
}
