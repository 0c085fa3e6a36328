use async_trait::async_trait;
use cloudctl_core::domain::command::InvocationStatus;
use cloudctl_exec::{
    AttemptLimit, BoxError, CommandPayload, CommandSubmitter, JobHandle, JobPoller, JobStatus,
    PollObserver, PollPolicy, PollerError, StatusReport, StatusSource,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Control-plane fake replaying a fixed script of responses
///
/// Once the status script is exhausted every further query reports `Pending`.
struct ScriptedControlPlane {
    submit_response: Mutex<Option<Result<Option<String>, String>>>,
    statuses: Mutex<VecDeque<Result<StatusReport, String>>>,
    submitted: Mutex<Vec<(String, String, HashMap<String, Vec<String>>)>>,
    submits: AtomicU32,
    queries: AtomicU32,
}

impl ScriptedControlPlane {
    fn new(statuses: Vec<Result<StatusReport, String>>) -> Arc<Self> {
        Arc::new(Self {
            submit_response: Mutex::new(Some(Ok(Some("cmd-0001".to_string())))),
            statuses: Mutex::new(statuses.into()),
            submitted: Mutex::new(Vec::new()),
            submits: AtomicU32::new(0),
            queries: AtomicU32::new(0),
        })
    }

    fn with_submit_response(
        self: Arc<Self>,
        response: Result<Option<String>, String>,
    ) -> Arc<Self> {
        *self.submit_response.lock().unwrap() = Some(response);
        self
    }

    fn submits(&self) -> u32 {
        self.submits.load(Ordering::SeqCst)
    }

    fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandSubmitter for ScriptedControlPlane {
    async fn submit_command(
        &self,
        target: &str,
        document_id: &str,
        parameters: &HashMap<String, Vec<String>>,
    ) -> Result<Option<String>, BoxError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push((
            target.to_string(),
            document_id.to_string(),
            parameters.clone(),
        ));
        match self.submit_response.lock().unwrap().clone() {
            Some(Ok(handle)) => Ok(handle),
            Some(Err(message)) => Err(message.into()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl StatusSource for ScriptedControlPlane {
    async fn query_status(&self, _handle: &str, _target: &str) -> Result<StatusReport, BoxError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(report)) => Ok(report),
            Some(Err(message)) => Err(message.into()),
            None => Ok(StatusReport::running(InvocationStatus::Pending)),
        }
    }
}

#[derive(Default)]
struct RecordingObserver {
    submitted: Mutex<Vec<String>>,
    statuses: Mutex<Vec<(u32, JobStatus)>>,
}

impl PollObserver for RecordingObserver {
    fn on_submitted(&self, handle: &JobHandle, _target: &str) {
        self.submitted.lock().unwrap().push(handle.to_string());
    }

    fn on_status(&self, _handle: &JobHandle, attempt: u32, status: JobStatus) {
        self.statuses.lock().unwrap().push((attempt, status));
    }
}

fn pending() -> Result<StatusReport, String> {
    Ok(StatusReport::running(InvocationStatus::Pending))
}

fn in_progress() -> Result<StatusReport, String> {
    Ok(StatusReport::running(InvocationStatus::InProgress))
}

fn finished(status: InvocationStatus, stdout: &str, stderr: &str) -> Result<StatusReport, String> {
    Ok(StatusReport::finished(status, stdout, stderr))
}

fn handle() -> JobHandle {
    JobHandle::parse("cmd-0001").unwrap()
}

const TARGET: &str = "i-0123456789abcdef0";

// =============================================================================
// submit
// =============================================================================

#[tokio::test]
async fn submit_returns_handle_and_sends_shell_document() {
    let plane = ScriptedControlPlane::new(vec![]);
    let poller = JobPoller::from_client(plane.clone());

    let handle = poller
        .submit(TARGET, &CommandPayload::shell("uname -a"))
        .await
        .unwrap();

    assert_eq!(handle.as_str(), "cmd-0001");
    assert_eq!(plane.submits(), 1);
    assert_eq!(plane.queries(), 0);

    let submitted = plane.submitted.lock().unwrap();
    let (target, document, parameters) = &submitted[0];
    assert_eq!(target, TARGET);
    assert_eq!(document, "AWS-RunShellScript");
    assert_eq!(parameters["commands"], vec!["uname -a".to_string()]);
}

#[tokio::test]
async fn submit_without_handle_is_submission_error() {
    for response in [Ok(None), Ok(Some(String::new())), Ok(Some("  ".to_string()))] {
        let plane = ScriptedControlPlane::new(vec![]).with_submit_response(response);
        let poller = JobPoller::from_client(plane.clone());

        let err = poller
            .submit(TARGET, &CommandPayload::shell("ls"))
            .await
            .unwrap_err();

        assert!(err.is_submission(), "unexpected error: {}", err);
        assert_eq!(plane.submits(), 1);
    }
}

#[tokio::test]
async fn submit_failure_is_surfaced_without_retry() {
    let plane = ScriptedControlPlane::new(vec![])
        .with_submit_response(Err("access denied".to_string()));
    let poller = JobPoller::from_client(plane.clone());

    let err = poller
        .submit(TARGET, &CommandPayload::shell("ls"))
        .await
        .unwrap_err();

    assert!(err.is_submission());
    assert!(err.to_string().contains("access denied"));
    assert_eq!(plane.submits(), 1);
}

#[tokio::test]
async fn submit_rejects_invalid_input_before_calling_remote() {
    let plane = ScriptedControlPlane::new(vec![]);
    let poller = JobPoller::from_client(plane.clone());

    let err = poller
        .submit("", &CommandPayload::shell("ls"))
        .await
        .unwrap_err();
    assert!(matches!(err, PollerError::InvalidRequest(_)));

    let err = poller
        .submit(TARGET, &CommandPayload::shell(""))
        .await
        .unwrap_err();
    assert!(matches!(err, PollerError::InvalidRequest(_)));

    assert_eq!(plane.submits(), 0);
}

// =============================================================================
// await_completion
// =============================================================================

#[tokio::test(start_paused = true)]
async fn success_after_three_queries_without_trailing_sleep() {
    let plane = ScriptedControlPlane::new(vec![
        pending(),
        in_progress(),
        finished(InvocationStatus::Success, "hello\n", ""),
    ]);
    let poller = JobPoller::from_client(plane.clone());
    let start = Instant::now();

    let result = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(1),
            AttemptLimit::Limited(5),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.status, JobStatus::Success);
    assert_eq!(result.attempts, 3);
    assert_eq!(plane.queries(), 3);
    // Two suspensions: after the 1st and 2nd query only
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    let output = result.output.unwrap();
    assert_eq!(output.stdout, "hello\n");
    assert_eq!(output.stderr, "");
}

#[tokio::test(start_paused = true)]
async fn attempts_exhausted_yields_timed_out_without_output() {
    let plane = ScriptedControlPlane::new(vec![pending(), in_progress(), in_progress()]);
    let poller = JobPoller::from_client(plane.clone());
    let start = Instant::now();

    let result = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(1),
            AttemptLimit::Limited(3),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.is_timed_out());
    assert_ne!(result.status, JobStatus::Failed);
    assert_eq!(result.attempts, 3);
    assert!(result.output.is_none());
    assert_eq!(plane.queries(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn single_attempt_never_sleeps() {
    let plane = ScriptedControlPlane::new(vec![pending()]);
    let poller = JobPoller::from_client(plane.clone());
    let start = Instant::now();

    let result = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(30),
            AttemptLimit::Limited(1),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.is_timed_out());
    assert_eq!(plane.queries(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn status_query_error_stops_polling() {
    let plane = ScriptedControlPlane::new(vec![
        pending(),
        Err("throttled".to_string()),
        finished(InvocationStatus::Success, "never read", ""),
    ]);
    let poller = JobPoller::from_client(plane.clone());

    let err = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(1),
            AttemptLimit::Limited(10),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        PollerError::StatusQuery {
            handle, attempt, ..
        } => {
            assert_eq!(handle, "cmd-0001");
            assert_eq!(attempt, 2);
        }
        other => panic!("expected status query error, got {:?}", other),
    }
    assert_eq!(plane.queries(), 2);
}

#[tokio::test(start_paused = true)]
async fn no_query_after_terminal_status() {
    let plane = ScriptedControlPlane::new(vec![
        finished(InvocationStatus::Failed, "", "exit status 127"),
        finished(InvocationStatus::Success, "", ""),
    ]);
    let poller = JobPoller::from_client(plane.clone());

    let result = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(1),
            AttemptLimit::Limited(10),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.status, JobStatus::Failed);
    assert_eq!(result.output.unwrap().stderr, "exit status 127");
    assert_eq!(plane.queries(), 1);
}

#[tokio::test(start_paused = true)]
async fn remote_cancelled_is_terminal() {
    let plane = ScriptedControlPlane::new(vec![
        in_progress(),
        finished(InvocationStatus::Cancelled, "", ""),
    ]);
    let poller = JobPoller::from_client(plane.clone());

    let result = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(1),
            AttemptLimit::Limited(10),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.status, JobStatus::Cancelled);
    assert!(result.output.is_some());
    assert_eq!(plane.queries(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_first_iteration_issues_no_query() {
    let plane = ScriptedControlPlane::new(vec![finished(InvocationStatus::Success, "", "")]);
    let poller = JobPoller::from_client(plane.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();
    let start = Instant::now();

    let err = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(1),
            AttemptLimit::Limited(5),
            &cancel,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PollerError::Cancelled { attempts: 0, .. }));
    assert_eq!(plane.queries(), 0);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_suspension_returns_within_one_interval() {
    let plane = ScriptedControlPlane::new(vec![]);
    let poller = JobPoller::from_client(plane.clone());
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(10),
            AttemptLimit::Unbounded,
            &cancel,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PollerError::Cancelled { attempts: 1, .. }));
    assert_eq!(plane.queries(), 1);
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn unbounded_polls_until_terminal() {
    let mut statuses: Vec<_> = (0..50).map(|_| in_progress()).collect();
    statuses.push(finished(InvocationStatus::Success, "done", ""));
    let plane = ScriptedControlPlane::new(statuses);
    let poller = JobPoller::from_client(plane.clone());

    let result = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_millis(100),
            AttemptLimit::Unbounded,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.attempts, 51);
}

#[tokio::test]
async fn invalid_poll_parameters_are_rejected() {
    let plane = ScriptedControlPlane::new(vec![]);
    let poller = JobPoller::from_client(plane.clone());
    let cancel = CancellationToken::new();

    let err = poller
        .await_completion(&handle(), TARGET, Duration::ZERO, AttemptLimit::Limited(3), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, PollerError::InvalidRequest(_)));

    let err = poller
        .await_completion(
            &handle(),
            TARGET,
            Duration::from_secs(1),
            AttemptLimit::Limited(0),
            &cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PollerError::InvalidRequest(_)));

    assert_eq!(plane.queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn independent_jobs_poll_concurrently() {
    let first = ScriptedControlPlane::new(vec![
        pending(),
        pending(),
        finished(InvocationStatus::Success, "a", ""),
    ]);
    let second = ScriptedControlPlane::new(vec![
        pending(),
        pending(),
        finished(InvocationStatus::Success, "b", ""),
    ]);
    let first_poller = JobPoller::from_client(first.clone());
    let second_poller = JobPoller::from_client(second.clone());
    let cancel = CancellationToken::new();
    let handle = handle();
    let start = Instant::now();

    let (a, b) = tokio::join!(
        first_poller.await_completion(
            &handle,
            "i-a",
            Duration::from_secs(1),
            AttemptLimit::Limited(5),
            &cancel
        ),
        second_poller.await_completion(
            &handle,
            "i-b",
            Duration::from_secs(1),
            AttemptLimit::Limited(5),
            &cancel
        ),
    );

    assert_eq!(a.unwrap().output.unwrap().stdout, "a");
    assert_eq!(b.unwrap().output.unwrap().stdout, "b");
    // Suspensions overlap instead of adding up
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

// =============================================================================
// run
// =============================================================================

#[tokio::test(start_paused = true)]
async fn run_waits_settle_delay_then_polls() {
    let plane = ScriptedControlPlane::new(vec![
        in_progress(),
        finished(InvocationStatus::Success, "ok", ""),
    ]);
    let observer = Arc::new(RecordingObserver::default());
    let poller = JobPoller::from_client(plane.clone()).with_observer(observer.clone());
    let policy = PollPolicy::new(Duration::from_secs(1), AttemptLimit::Limited(5))
        .with_settle_delay(Duration::from_millis(1500));
    let start = Instant::now();

    let result = poller
        .run(
            TARGET,
            &CommandPayload::shell("echo ok"),
            &policy,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(start.elapsed(), Duration::from_millis(2500));
    assert_eq!(plane.submits(), 1);
    assert_eq!(plane.queries(), 2);
    assert_eq!(*observer.submitted.lock().unwrap(), vec!["cmd-0001".to_string()]);
    assert_eq!(
        *observer.statuses.lock().unwrap(),
        vec![(1, JobStatus::InProgress), (2, JobStatus::Success)]
    );
}

#[tokio::test]
async fn run_does_not_poll_after_failed_submission() {
    let plane = ScriptedControlPlane::new(vec![])
        .with_submit_response(Err("instance not registered".to_string()));
    let poller = JobPoller::from_client(plane.clone());

    let err = poller
        .run(
            TARGET,
            &CommandPayload::shell("ls"),
            &PollPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_submission());
    assert_eq!(plane.queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn run_cancelled_during_settle_delay() {
    let plane = ScriptedControlPlane::new(vec![]);
    let poller = JobPoller::from_client(plane.clone());
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let err = poller
        .run(TARGET, &CommandPayload::shell("ls"), &PollPolicy::default(), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(plane.submits(), 1);
    assert_eq!(plane.queries(), 0);
}
