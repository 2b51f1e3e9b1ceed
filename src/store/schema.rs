use serde::{Deserialize, Serialize};

use crate::plan::model::PlanPayload;

/// File holding the saved-plan collection, newest first.
pub const SAVED_PLANS_SLOT: &str = "study_plans.json";

/// A user-saved snapshot of one generated plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedPlanRecord {
    /// Creation time in epoch milliseconds, bumped past the newest existing id
    /// when two saves land in the same millisecond.
    pub id: i64,
    pub topic: String,
    /// Local creation date as `M/D/YYYY`.
    pub date: String,
    pub data: PlanPayload,
}

pub type SavedPlans = Vec<SavedPlanRecord>;
