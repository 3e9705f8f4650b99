//! Generated prep plans and their on-disk JSON format.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlanError, PlanResult};

/// Id prefix marking a plan that only exists on this machine and was
/// never stored by the backend. Pushes inline the plan body instead of
/// referencing it by id.
pub const EPHEMERAL_PLAN_PREFIX: &str = "plan-";

/// A multi-day preparation plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    /// Server-resident id, or an ephemeral `plan-` id assigned at load time.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub duration_days: u32,

    #[serde(default)]
    pub days: Vec<DayPlan>,
}

/// One day of a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day number. Optional in the file; consumers fall back to
    /// the day's position in the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,

    #[serde(default)]
    pub tasks: Vec<DayTask>,
}

/// A single task within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayTask {
    pub title: String,

    /// Kind tag, e.g. "study" or "practice".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,

    /// Task length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    /// Skill-gap label this task addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,

    /// Study material pointers. Kept local, never pushed to the calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<String>,
}

impl GeneratedPlan {
    /// Load a plan from a JSON file.
    ///
    /// Plans without an id get a fresh ephemeral one so the push path
    /// can tell them apart from server-resident plans.
    pub fn load(path: &Path) -> PlanResult<Self> {
        if !path.exists() {
            return Err(PlanError::PlanNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut plan: GeneratedPlan =
            serde_json::from_str(&contents).map_err(|e| PlanError::PlanParse(e.to_string()))?;

        if plan.id.is_empty() {
            plan.id = ephemeral_id();
        }

        Ok(plan)
    }

    /// Whether the plan only exists locally (id carries the ephemeral prefix).
    pub fn is_ephemeral(&self) -> bool {
        self.id.starts_with(EPHEMERAL_PLAN_PREFIX)
    }
}

/// Fresh id for a plan that was never stored by the backend.
pub fn ephemeral_id() -> String {
    format!("{}{}", EPHEMERAL_PLAN_PREFIX, Uuid::new_v4())
}
