//! Wire types for the calendar API.
//!
//! Field names follow the backend's JSON casing. Every field of the
//! error envelope is tolerated as absent so a half-formed body still
//! deserializes.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::plan::{DayTask, GeneratedPlan};
use crate::preview::TASKS_PER_DAY;

/// Completion signal sent by the authorization flow once the account is
/// connected. The callback listener matches on exactly this value.
pub const CONNECTED_SIGNAL: &str = "jj:google-connected";

/// Error code the backend uses when the connected account is missing
/// calendar scopes and a step-up authorization is required.
pub const NEEDS_SCOPES_CODE: &str = "NEEDS_SCOPES";

/// Hour slots (local to the event timezone) that pushed tasks cycle
/// through within a day.
pub const DEFAULT_START_HOURS: [u8; 3] = [9, 13, 18];

pub const DEFAULT_EVENT_DURATION_MINUTES: u32 = 60;

/// Used when the machine's timezone cannot be resolved.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Whether a calendar account is linked.
/// Re-fetched on every use; never cached across runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub connected: bool,

    #[serde(default)]
    pub email: Option<String>,
}

/// Response from `GET /calendar/oauth/url`.
#[derive(Debug, Deserialize)]
pub struct OAuthUrlResponse {
    pub url: String,
}

/// Response from a successful `POST /calendar/push`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    #[serde(default)]
    pub created_count: u64,
}

/// Error envelope returned by the backend on failure.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub auth_url: Option<String>,
}

/// Scheduling parameters for a push.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub start_date: String,
    pub timezone: String,
    pub start_hours: [u8; 3],
    pub event_duration_minutes: u32,
}

/// Body of `POST /calendar/push`.
///
/// Exactly one of `plan_id` or `plan` serializes: server-resident plans
/// go by id, ephemeral plans are inlined.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub start_date: String,
    pub timezone: String,
    pub start_hours: [u8; 3],
    pub event_duration_minutes: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<PushDay>>,
}

/// One inlined day of an ephemeral plan.
#[derive(Debug, Clone, Serialize)]
pub struct PushDay {
    pub day: u32,
    pub tasks: Vec<PushTask>,
}

/// Task fields the calendar cares about. `resources` stays local.
#[derive(Debug, Clone, Serialize)]
pub struct PushTask {
    pub title: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
}

impl From<&DayTask> for PushTask {
    fn from(task: &DayTask) -> Self {
        PushTask {
            title: task.title.clone(),
            task_type: task.task_type.clone(),
            duration: task.duration,
            gap: task.gap.clone(),
        }
    }
}

impl PushRequest {
    /// Build a push body for `plan`.
    ///
    /// Fails when the schedule has no start date; nothing goes over the
    /// wire in that case.
    pub fn build(plan: &GeneratedPlan, schedule: &Schedule) -> PlanResult<Self> {
        if schedule.start_date.trim().is_empty() {
            return Err(PlanError::EmptyStartDate);
        }

        let (plan_id, inline) = if plan.is_ephemeral() {
            let days = plan
                .days
                .iter()
                .enumerate()
                .map(|(idx, d)| PushDay {
                    day: d.day.unwrap_or(idx as u32 + 1),
                    tasks: d.tasks.iter().take(TASKS_PER_DAY).map(PushTask::from).collect(),
                })
                .collect();
            (None, Some(days))
        } else {
            (Some(plan.id.clone()), None)
        };

        Ok(PushRequest {
            start_date: schedule.start_date.clone(),
            timezone: schedule.timezone.clone(),
            start_hours: schedule.start_hours,
            event_duration_minutes: schedule.event_duration_minutes,
            plan_id,
            plan: inline,
        })
    }
}
