use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use jjprep_core::error::PlanError;
use jjprep_core::plan::GeneratedPlan;
use jjprep_core::protocol::{
    DEFAULT_EVENT_DURATION_MINUTES, DEFAULT_START_HOURS, DEFAULT_TIMEZONE, PushRequest, Schedule,
};

use super::AUTH_TIMEOUT;
use crate::client::{ApiClient, PushOutcome};
use crate::oauth::AuthFlow;
use crate::render;

/// Web view opened after a successful push.
const CALENDAR_URL: &str = "https://calendar.google.com/calendar/r";

/// One step-up authorization per run. The backend asking for scopes
/// twice in a row means re-authorizing did not take; the user can run
/// the command again.
const MAX_STEP_UP_ROUNDS: usize = 1;

pub async fn run(
    client: &ApiClient,
    redirect_port: u16,
    plan_path: &Path,
    start_date: &str,
    timezone: Option<String>,
    event_duration: Option<Duration>,
) -> Result<()> {
    let plan = GeneratedPlan::load(plan_path)?;
    let schedule = build_schedule(start_date, timezone, event_duration)?;
    let request = PushRequest::build(&plan, &schedule)?;

    let authorizer = BrowserAuthorizer { redirect_port };
    let created = push_with_step_up(client, &request, &authorizer).await?;

    println!(
        "{}",
        format!("Added {} event(s) to your calendar.", created).green()
    );

    // Best effort; the push already succeeded.
    let _ = open::that(CALENDAR_URL);

    Ok(())
}

fn build_schedule(
    start_date: &str,
    timezone: Option<String>,
    event_duration: Option<Duration>,
) -> Result<Schedule> {
    let timezone = match timezone {
        Some(tz) => {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                return Err(PlanError::InvalidTimezone(tz).into());
            }
            tz
        }
        None => local_timezone(),
    };

    let event_duration_minutes = match event_duration {
        Some(duration) => (duration.as_secs() / 60).max(1) as u32,
        None => DEFAULT_EVENT_DURATION_MINUTES,
    };

    Ok(Schedule {
        start_date: start_date.to_string(),
        timezone,
        start_hours: DEFAULT_START_HOURS,
        event_duration_minutes,
    })
}

/// IANA name of the machine's timezone, or the default when it cannot
/// be resolved.
fn local_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string())
}

/// Runs one step-up authorization round against `auth_url`.
pub trait Authorizer {
    async fn authorize(&self, auth_url: &str) -> Result<()>;
}

struct BrowserAuthorizer {
    redirect_port: u16,
}

impl Authorizer for BrowserAuthorizer {
    async fn authorize(&self, auth_url: &str) -> Result<()> {
        println!("The calendar needs additional permissions.");

        let flow = AuthFlow::bind(self.redirect_port).await?;
        let auth_url = with_redirect_uri(auth_url, &flow.redirect_uri())?;
        flow.authorize(&auth_url, AUTH_TIMEOUT).await
    }
}

/// Tell the step-up completion page where the local callback listener is.
fn with_redirect_uri(auth_url: &str, redirect_uri: &str) -> Result<String> {
    let mut url = url::Url::parse(auth_url).context("Invalid authorization URL")?;
    url.query_pairs_mut().append_pair("redirect_uri", redirect_uri);
    Ok(url.to_string())
}

/// Submit the push, running at most one step-up authorization round
/// when the backend reports missing scopes. The retried request is the
/// same body as the original attempt.
pub async fn push_with_step_up<A: Authorizer>(
    client: &ApiClient,
    request: &PushRequest,
    authorizer: &A,
) -> Result<u64> {
    let mut rounds = 0;

    loop {
        let spinner = render::create_spinner("Pushing plan to calendar".to_string());
        let outcome = client.push(request).await;
        spinner.finish_and_clear();

        match outcome? {
            PushOutcome::Created { created_count } => return Ok(created_count),
            PushOutcome::NeedsScopes { auth_url } if rounds < MAX_STEP_UP_ROUNDS => {
                rounds += 1;
                authorizer.authorize(&auth_url).await?;
            }
            PushOutcome::NeedsScopes { .. } => {
                anyhow::bail!(
                    "The calendar still reports missing permissions after re-authorizing. \
                    Please try again."
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jjprep_core::plan::DayPlan;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::session::TokenSource;

    use super::*;

    struct NoToken;

    impl TokenSource for NoToken {
        fn bearer_token(&self) -> Option<String> {
            None
        }
    }

    #[derive(Default)]
    struct RecordingAuthorizer {
        calls: Mutex<Vec<String>>,
    }

    impl Authorizer for RecordingAuthorizer {
        async fn authorize(&self, auth_url: &str) -> Result<()> {
            self.calls.lock().unwrap().push(auth_url.to_string());
            Ok(())
        }
    }

    fn client(api_root: &str) -> ApiClient {
        ApiClient::new(api_root, Arc::new(NoToken)).unwrap()
    }

    fn request() -> PushRequest {
        let plan = GeneratedPlan {
            id: "plan-local".to_string(),
            duration_days: 1,
            days: vec![DayPlan { day: Some(1), tasks: vec![] }],
        };
        let schedule = Schedule {
            start_date: "2024-05-01".to_string(),
            timezone: "UTC".to_string(),
            start_hours: DEFAULT_START_HOURS,
            event_duration_minutes: DEFAULT_EVENT_DURATION_MINUTES,
        };
        PushRequest::build(&plan, &schedule).unwrap()
    }

    #[tokio::test]
    async fn step_up_retries_once_with_identical_body() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("POST"))
            .and(path("/calendar/push"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(403).set_body_json(serde_json::json!({
                        "error": {"code": "NEEDS_SCOPES", "authUrl": "https://x"}
                    }))
                } else {
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"createdCount": 5}))
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let authorizer = RecordingAuthorizer::default();
        let created = push_with_step_up(&client(&server.uri()), &request(), &authorizer)
            .await
            .unwrap();

        assert_eq!(created, 5);
        assert_eq!(*authorizer.calls.lock().unwrap(), vec!["https://x".to_string()]);

        // The resubmission carries the same body as the original attempt.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, requests[1].body);
    }

    #[tokio::test]
    async fn second_scope_shortfall_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendar/push"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": "NEEDS_SCOPES", "authUrl": "https://x"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let authorizer = RecordingAuthorizer::default();
        let err = push_with_step_up(&client(&server.uri()), &request(), &authorizer)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("missing permissions"));
        // One authorization round, not a loop.
        assert_eq!(authorizer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn hard_failure_never_authorizes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendar/push"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"message": "backend exploded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let authorizer = RecordingAuthorizer::default();
        let err = push_with_step_up(&client(&server.uri()), &request(), &authorizer)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("backend exploded"));
        assert!(authorizer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_with_redirect_uri_appends_param() {
        let url = with_redirect_uri(
            "https://accounts.example.com/step-up?scope=calendar",
            "http://localhost:8849/callback",
        )
        .unwrap();

        assert_eq!(
            url,
            "https://accounts.example.com/step-up?scope=calendar&redirect_uri=http%3A%2F%2Flocalhost%3A8849%2Fcallback"
        );
    }

    #[test]
    fn test_schedule_defaults() {
        let schedule = build_schedule("2024-05-01", None, None).unwrap();

        assert_eq!(schedule.start_hours, DEFAULT_START_HOURS);
        assert_eq!(schedule.event_duration_minutes, DEFAULT_EVENT_DURATION_MINUTES);
        assert!(!schedule.timezone.is_empty());
    }

    #[test]
    fn test_schedule_rejects_bogus_timezone() {
        let err = build_schedule("2024-05-01", Some("Not/AZone".to_string()), None).unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"));
    }

    #[test]
    fn test_schedule_converts_event_duration() {
        let schedule =
            build_schedule("2024-05-01", None, Some(Duration::from_secs(45 * 60))).unwrap();
        assert_eq!(schedule.event_duration_minutes, 45);

        // Sub-minute durations round up to one minute rather than zero.
        let schedule = build_schedule("2024-05-01", None, Some(Duration::from_secs(30))).unwrap();
        assert_eq!(schedule.event_duration_minutes, 1);
    }
}
