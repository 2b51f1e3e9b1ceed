use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::info;

use crate::plan::model::{PlanPayload, SessionConfig};
use crate::store::json_store::JsonStore;
use crate::store::schema::{SAVED_PLANS_SLOT, SavedPlanRecord, SavedPlans};

/// Sole owner of the saved-plan slot. Every mutation reads the whole
/// collection, changes it in memory and writes it back.
pub struct PlanStore {
    store: JsonStore,
}

impl PlanStore {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Newest first. A missing or corrupt slot lists as empty.
    pub fn list(&self) -> SavedPlans {
        self.store.load(SAVED_PLANS_SLOT)
    }

    pub fn get(&self, index: usize) -> Option<SavedPlanRecord> {
        self.list().into_iter().nth(index)
    }

    pub fn save(&self, config: &SessionConfig, payload: &PlanPayload) -> Result<SavedPlanRecord> {
        self.save_at(config, payload, Local::now())
    }

    pub fn save_at(
        &self,
        config: &SessionConfig,
        payload: &PlanPayload,
        now: DateTime<Local>,
    ) -> Result<SavedPlanRecord> {
        let mut plans = self.list();
        let newest = plans.iter().map(|p| p.id).max().unwrap_or(i64::MIN);
        let record = SavedPlanRecord {
            id: now.timestamp_millis().max(newest.saturating_add(1)),
            topic: config.topic.clone(),
            date: now.format("%-m/%-d/%Y").to_string(),
            data: payload.clone(),
        };

        plans.insert(0, record.clone());
        self.store.save(SAVED_PLANS_SLOT, &plans)?;
        info!(id = record.id, topic = %record.topic, total = plans.len(), "saved plan");
        Ok(record)
    }

    /// Remove the record at `index`. Out of range leaves storage untouched.
    pub fn delete(&self, index: usize) -> Result<Option<SavedPlanRecord>> {
        let mut plans = self.list();
        if index >= plans.len() {
            return Ok(None);
        }
        let removed = plans.remove(index);
        self.store.save(SAVED_PLANS_SLOT, &plans)?;
        info!(id = removed.id, topic = %removed.topic, total = plans.len(), "deleted plan");
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, PlanStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, PlanStore::new(store))
    }

    fn config(topic: &str) -> SessionConfig {
        SessionConfig {
            topic: topic.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let (_dir, store) = make_test_store();
        assert!(store.list().is_empty());
        assert!(store.get(0).is_none());
    }

    #[test]
    fn test_saved_plan_listed_first() {
        let (_dir, store) = make_test_store();
        store.save(&config("Physics"), &PlanPayload::default()).unwrap();
        let record = store.save(&config("Calculus"), &PlanPayload::default()).unwrap();

        let plans = store.list();
        assert_eq!(plans[0], record);
        assert_eq!(plans[0].topic, "Calculus");
    }

    #[test]
    fn test_list_is_reverse_save_order() {
        let (_dir, store) = make_test_store();
        let topics = ["a", "b", "c", "d", "e"];
        for topic in topics {
            store.save(&config(topic), &PlanPayload::default()).unwrap();
        }
        let listed: Vec<String> = store.list().into_iter().map(|p| p.topic).collect();
        assert_eq!(listed, vec!["e", "d", "c", "b", "a"]);
    }

    #[test]
    fn test_ids_increase_within_same_millisecond() {
        let (_dir, store) = make_test_store();
        let now = Local.with_ymd_and_hms(2026, 3, 7, 9, 30, 0).unwrap();
        let first = store.save_at(&config("a"), &PlanPayload::default(), now).unwrap();
        let second = store.save_at(&config("a"), &PlanPayload::default(), now).unwrap();
        assert_eq!(first.id, now.timestamp_millis());
        assert!(second.id > first.id);
        assert_eq!(first.date, "3/7/2026");
    }

    #[test]
    fn test_delete_keeps_relative_order() {
        let (_dir, store) = make_test_store();
        for topic in ["a", "b", "c", "d"] {
            store.save(&config(topic), &PlanPayload::default()).unwrap();
        }
        // Listed as d, c, b, a.
        let removed = store.delete(1).unwrap().unwrap();
        assert_eq!(removed.topic, "c");
        let listed: Vec<String> = store.list().into_iter().map(|p| p.topic).collect();
        assert_eq!(listed, vec!["d", "b", "a"]);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let (_dir, store) = make_test_store();
        store.save(&config("a"), &PlanPayload::default()).unwrap();
        assert!(store.delete(5).unwrap().is_none());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_corrupt_slot_lists_empty_and_recovers_on_save() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join(SAVED_PLANS_SLOT), "[{\"id\":").unwrap();
        assert!(store.list().is_empty());

        store.save(&config("fresh"), &PlanPayload::default()).unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_payload_round_trips_through_storage() {
        let (_dir, store) = make_test_store();
        let payload: PlanPayload = serde_json::from_value(json!({
            "plan": [{ "unit_title": "Unit 1", "duration": "2h", "important": true }],
            "focus_areas": ["Limits"]
        }))
        .unwrap();
        store.save(&config("Calculus"), &payload).unwrap();
        assert_eq!(store.get(0).unwrap().data, payload);
    }
}
