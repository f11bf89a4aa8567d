// ── Status poller ──
//
// Fetch-and-render loop plus action mediation. A repeating refresh is a
// single spawned task that sleeps the poll interval after each completed
// read, so exactly one timer is outstanding per schedule. Actions always
// end in one non-repeating refresh.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use rose_api::RoseClient;

use crate::controls::ActionControl;
use crate::error::CoreError;
use crate::model::{ActionUrl, StatusSnapshot};
use crate::view::{StatusView, render};

// ── StatusSource ─────────────────────────────────────────────────

/// Where snapshots come from and where action requests go.
///
/// Implemented for [`RoseClient`]; tests substitute in-memory sources.
pub trait StatusSource: Send + Sync + 'static {
    /// Read the current status resource.
    fn fetch_status(&self) -> impl Future<Output = Result<StatusSnapshot, CoreError>> + Send;

    /// Request an action resource. Only completion matters.
    fn trigger(&self, url: &ActionUrl) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl StatusSource for RoseClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot, CoreError> {
        self.status()
            .await
            .map(StatusSnapshot::from)
            .map_err(CoreError::from)
    }

    async fn trigger(&self, url: &ActionUrl) -> Result<(), CoreError> {
        self.send_action(url.as_str())
            .await
            .map_err(CoreError::from)
    }
}

// ── Results ──────────────────────────────────────────────────────

/// Result of one [`Poller::refresh`] call.
#[derive(Debug)]
pub struct Refresh {
    /// The snapshot that was rendered, or why nothing was rendered.
    pub outcome: Result<StatusSnapshot, CoreError>,
    /// Handle to the repeating chain, present when `repeat_after` was set.
    pub schedule: Option<RefreshSchedule>,
}

/// Result of one [`Poller::trigger_action`] call.
#[derive(Debug)]
pub struct ActionOutcome {
    /// Whether the action request itself succeeded.
    pub action: Result<(), CoreError>,
    /// The follow-up one-shot refresh.
    pub refresh: Result<StatusSnapshot, CoreError>,
}

// ── RefreshSchedule ──────────────────────────────────────────────

/// Handle to a repeating refresh chain.
///
/// Dropping the handle detaches it; the chain keeps running until
/// [`cancel`](Self::cancel) or [`shutdown`](Self::shutdown) is called or
/// the runtime stops.
#[derive(Debug)]
pub struct RefreshSchedule {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshSchedule {
    /// Stop the chain after the in-flight refresh (if any) completes.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the chain is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the chain and wait for its task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "refresh schedule task failed");
        }
    }
}

// ── Poller ───────────────────────────────────────────────────────

/// Fetches snapshots from a [`StatusSource`] and renders them into a
/// [`StatusView`].
///
/// Cheaply cloneable; clones share the source and view. Pollers hold no
/// global state, so any number of them can run side by side.
pub struct Poller<S, V> {
    inner: Arc<PollerInner<S, V>>,
}

struct PollerInner<S, V> {
    source: S,
    view: Arc<V>,
    interval: Duration,
    /// Held for the whole render step so two snapshots never interleave
    /// their field writes. Never held across an await.
    render_lock: Mutex<()>,
}

impl<S, V> Clone for Poller<S, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, V> Poller<S, V>
where
    S: StatusSource,
    V: StatusView + 'static,
{
    /// Create a poller. `interval` is the delay between the completion of
    /// one repeating refresh and the start of the next.
    pub fn new(source: S, view: Arc<V>, interval: Duration) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                source,
                view,
                interval,
                render_lock: Mutex::new(()),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn view(&self) -> &Arc<V> {
        &self.inner.view
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Read the status resource and render the result.
    ///
    /// With `repeat_after`, a chain is armed once this read completes,
    /// whether it succeeded or not: every `interval` after the previous
    /// read finishes, another read-and-render runs.
    pub async fn refresh(&self, repeat_after: bool) -> Refresh {
        let outcome = self.fetch_and_render().await;
        let schedule = repeat_after.then(|| self.schedule_repeat());
        Refresh { outcome, schedule }
    }

    /// Request `url`, then run exactly one non-repeating refresh no matter
    /// how the request ended.
    pub async fn trigger_action(&self, url: &ActionUrl) -> ActionOutcome {
        let action = self.inner.source.trigger(url).await;
        match &action {
            Ok(()) => info!(%url, "action completed"),
            Err(e) => warn!(%url, error = %e, "action request failed"),
        }

        let refresh = self.refresh(false).await.outcome;
        ActionOutcome { action, refresh }
    }

    /// Fire a registered control.
    pub async fn activate(&self, control: &ActionControl) -> ActionOutcome {
        debug!(control = %control.kind, "control activated");
        self.trigger_action(&control.url).await
    }

    async fn fetch_and_render(&self) -> Result<StatusSnapshot, CoreError> {
        match self.inner.source.fetch_status().await {
            Ok(snapshot) => {
                self.render_snapshot(&snapshot);
                debug!(
                    decay = snapshot.decay,
                    max_decay = snapshot.max_decay,
                    battery = snapshot.battery,
                    display = ?snapshot.display,
                    "status rendered"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "status refresh failed");
                Err(e)
            }
        }
    }

    fn render_snapshot(&self, snapshot: &StatusSnapshot) {
        let _guard = self
            .inner
            .render_lock
            .lock()
            .expect("render lock poisoned");
        render(snapshot, self.inner.view.as_ref());
    }

    fn schedule_repeat(&self) -> RefreshSchedule {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(repeat_task(self.clone(), cancel.clone()));
        debug!(interval = ?self.interval(), "refresh schedule armed");
        RefreshSchedule { cancel, handle }
    }
}

// ── Background task ──────────────────────────────────────────────

/// Sleep, read-and-render, repeat. The sleep starts only after the
/// previous read has finished.
async fn repeat_task<S, V>(poller: Poller<S, V>, cancel: CancellationToken)
where
    S: StatusSource,
    V: StatusView + 'static,
{
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(poller.interval()) => {
                // Failures are logged inside; the chain continues regardless.
                let _ = poller.fetch_and_render().await;
            }
        }
    }
    debug!("refresh schedule stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use tokio::sync::mpsc;
    use tokio::time::Instant;

    use super::*;
    use crate::config::DEFAULT_POLL_INTERVAL;
    use crate::controls::ControlKind;
    use crate::view::StatusFields;

    // ── Fake source ─────────────────────────────────────────────────

    /// Serves scripted reads, then `fallback` forever. Reports the
    /// completion instant of every read on `read_tx`.
    struct FakeSource {
        reads: Mutex<VecDeque<Result<StatusSnapshot, CoreError>>>,
        fallback: StatusSnapshot,
        latency: Duration,
        read_tx: mpsc::UnboundedSender<Instant>,
        actions: Mutex<Vec<String>>,
        fail_actions: bool,
    }

    impl FakeSource {
        fn actions(&self) -> Vec<String> {
            self.actions.lock().unwrap().clone()
        }
    }

    impl StatusSource for FakeSource {
        async fn fetch_status(&self) -> Result<StatusSnapshot, CoreError> {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let next = self.reads.lock().unwrap().pop_front();
            let _ = self.read_tx.send(Instant::now());
            next.unwrap_or_else(|| Ok(self.fallback.clone()))
        }

        async fn trigger(&self, url: &ActionUrl) -> Result<(), CoreError> {
            self.actions.lock().unwrap().push(url.to_string());
            if self.fail_actions {
                Err(CoreError::Api {
                    message: "HTTP 500".into(),
                    status: Some(500),
                })
            } else {
                Ok(())
            }
        }
    }

    struct Fixture {
        reads: Vec<Result<StatusSnapshot, CoreError>>,
        latency: Duration,
        fail_actions: bool,
    }

    impl Default for Fixture {
        fn default() -> Self {
            Self {
                reads: Vec::new(),
                latency: Duration::ZERO,
                fail_actions: false,
            }
        }
    }

    impl Fixture {
        fn build(
            self,
        ) -> (
            Poller<FakeSource, StatusFields>,
            mpsc::UnboundedReceiver<Instant>,
        ) {
            let (read_tx, read_rx) = mpsc::unbounded_channel();
            let source = FakeSource {
                reads: Mutex::new(self.reads.into()),
                fallback: snapshot(12, 20, 87, None),
                latency: self.latency,
                read_tx,
                actions: Mutex::new(Vec::new()),
                fail_actions: self.fail_actions,
            };
            let poller = Poller::new(source, Arc::new(StatusFields::new()), DEFAULT_POLL_INTERVAL);
            (poller, read_rx)
        }
    }

    fn snapshot(decay: i64, max_decay: i64, battery: i64, display: Option<bool>) -> StatusSnapshot {
        StatusSnapshot {
            decay,
            max_decay,
            battery,
            display,
        }
    }

    fn unreachable() -> CoreError {
        CoreError::ConnectionFailed {
            url: "http://rose/rose/data".into(),
            reason: "connection refused".into(),
        }
    }

    /// Asserts that no further read happens within a day of virtual time.
    async fn assert_no_more_reads(reads: &mut mpsc::UnboundedReceiver<Instant>) {
        let next = tokio::time::timeout(Duration::from_secs(24 * 3600), reads.recv()).await;
        assert!(next.is_err(), "unexpected extra read");
    }

    fn assert_gap(earlier: Instant, later: Instant, expected: Duration) {
        let gap = later - earlier;
        assert!(
            gap >= expected && gap < expected + Duration::from_millis(10),
            "expected gap of {expected:?}, got {gap:?}"
        );
    }

    // ── refresh ─────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn one_shot_refresh_renders_and_schedules_nothing() {
        let (poller, mut reads) = Fixture::default().build();

        let refresh = poller.refresh(false).await;

        assert_eq!(refresh.outcome.unwrap(), snapshot(12, 20, 87, None));
        assert!(refresh.schedule.is_none());
        let fields = poller.view().current();
        assert_eq!(fields.decay, "12/20");
        assert_eq!(fields.battery, "87%");

        reads.recv().await.unwrap();
        assert_no_more_reads(&mut reads).await;
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_refresh_rearms_from_completion() {
        let latency = Duration::from_secs(5);
        let (poller, mut reads) = Fixture {
            latency,
            ..Fixture::default()
        }
        .build();

        let refresh = poller.refresh(true).await;
        let schedule = refresh.schedule.unwrap();
        assert!(schedule.is_active());

        let first = reads.recv().await.unwrap();
        let second = reads.recv().await.unwrap();
        let third = reads.recv().await.unwrap();

        // Each timer starts when the previous read finishes.
        assert_gap(first, second, DEFAULT_POLL_INTERVAL + latency);
        assert_gap(second, third, DEFAULT_POLL_INTERVAL + latency);

        schedule.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_read_still_rearms() {
        let (poller, mut reads) = Fixture {
            reads: vec![Err(unreachable()), Ok(snapshot(0, 20, 100, Some(true)))],
            ..Fixture::default()
        }
        .build();

        let refresh = poller.refresh(true).await;
        assert!(refresh.outcome.is_err());
        assert!(poller.view().current().is_blank());
        let schedule = refresh.schedule.unwrap();

        let failed = reads.recv().await.unwrap();
        let recovered = reads.recv().await.unwrap();
        assert_gap(failed, recovered, DEFAULT_POLL_INTERVAL);

        tokio::task::yield_now().await;
        let fields = poller.view().current();
        assert_eq!(fields.decay, "0/20");
        assert_eq!(fields.display, Some(crate::model::DisplayState::On));
        assert_eq!(fields.repaints, 1);

        schedule.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_schedule_stops_reading() {
        let (poller, mut reads) = Fixture::default().build();

        let schedule = poller.refresh(true).await.schedule.unwrap();
        reads.recv().await.unwrap();
        schedule.shutdown().await;

        assert_no_more_reads(&mut reads).await;
    }

    #[tokio::test(start_paused = true)]
    async fn pollers_are_independent() {
        let (a, mut a_reads) = Fixture::default().build();
        let (b, mut b_reads) = Fixture::default().build();

        let a_schedule = a.refresh(true).await.schedule.unwrap();
        let b_schedule = b.refresh(true).await.schedule.unwrap();
        a_reads.recv().await.unwrap();
        b_reads.recv().await.unwrap();

        a_schedule.shutdown().await;

        // b keeps polling after a stopped.
        b_reads.recv().await.unwrap();
        assert_no_more_reads(&mut a_reads).await;

        b_schedule.shutdown().await;
    }

    // ── render atomicity ────────────────────────────────────────────

    /// Records field writes and stalls inside `set_decay`, widening the
    /// window in which a second render could slip in.
    #[derive(Default)]
    struct SlowView {
        calls: Mutex<Vec<String>>,
    }

    impl StatusView for SlowView {
        fn set_decay(&self, text: &str) {
            self.calls.lock().unwrap().push(format!("decay={text}"));
            std::thread::sleep(Duration::from_millis(50));
        }
        fn set_battery(&self, text: &str) {
            self.calls.lock().unwrap().push(format!("battery={text}"));
        }
        fn set_display(&self, _state: crate::model::DisplayState) {}
        fn repaint_display(&self) {}
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_renders_do_not_interleave() {
        let (read_tx, _reads) = mpsc::unbounded_channel();
        let source = FakeSource {
            reads: Mutex::new(
                vec![Ok(snapshot(0, 14, 0, None)), Ok(snapshot(1, 14, 1, None))].into(),
            ),
            fallback: snapshot(9, 14, 9, None),
            latency: Duration::ZERO,
            read_tx,
            actions: Mutex::new(Vec::new()),
            fail_actions: false,
        };
        let poller = Poller::new(source, Arc::new(SlowView::default()), DEFAULT_POLL_INTERVAL);
        let url: ActionUrl = "/rose/decay".parse().unwrap();

        let refresh = tokio::spawn({
            let poller = poller.clone();
            async move { poller.refresh(false).await.outcome }
        });
        let action = tokio::spawn({
            let poller = poller.clone();
            async move { poller.trigger_action(&url).await.refresh }
        });
        refresh.await.unwrap().unwrap();
        action.await.unwrap().unwrap();

        let calls = poller.view().calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 4, "{calls:?}");
        for pair in calls.chunks(2) {
            let decay = pair[0].strip_prefix("decay=").unwrap();
            let battery = pair[1].strip_prefix("battery=").unwrap();
            // Both snapshots carry decay == battery, so a torn render shows
            // mismatched values within one pair.
            assert_eq!(
                decay.trim_end_matches("/14"),
                battery.trim_end_matches('%'),
                "{calls:?}"
            );
        }
    }

    // ── trigger_action ──────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn action_requests_once_then_refreshes_once() {
        let (poller, mut reads) = Fixture::default().build();
        let url: ActionUrl = "/rose/decay".parse().unwrap();

        let outcome = poller.trigger_action(&url).await;

        assert!(outcome.action.is_ok());
        assert!(outcome.refresh.is_ok());
        assert_eq!(poller.source().actions(), ["/rose/decay"]);
        reads.recv().await.unwrap();
        assert_no_more_reads(&mut reads).await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_action_still_refreshes_once() {
        let (poller, mut reads) = Fixture {
            fail_actions: true,
            ..Fixture::default()
        }
        .build();
        let url: ActionUrl = "/rose/revert".parse().unwrap();

        let outcome = poller.trigger_action(&url).await;

        assert!(matches!(outcome.action, Err(CoreError::Api { status: Some(500), .. })));
        assert_eq!(outcome.refresh.unwrap().decay, 12);
        assert_eq!(poller.view().current().battery, "87%");
        reads.recv().await.unwrap();
        assert_no_more_reads(&mut reads).await;
    }

    #[tokio::test(start_paused = true)]
    async fn action_with_failed_refresh_reports_both() {
        let (poller, _reads) = Fixture {
            reads: vec![Err(unreachable())],
            fail_actions: true,
            ..Fixture::default()
        }
        .build();
        let url: ActionUrl = "/rose/display".parse().unwrap();

        let outcome = poller.trigger_action(&url).await;

        assert!(outcome.action.is_err());
        assert!(matches!(outcome.refresh, Err(CoreError::ConnectionFailed { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn activate_fires_the_control_url() {
        let (poller, _reads) = Fixture::default().build();
        let control = ActionControl {
            kind: ControlKind::DisplayToggle,
            url: "/rose/display".parse().unwrap(),
        };

        poller.activate(&control).await;

        assert_eq!(poller.source().actions(), ["/rose/display"]);
    }
}
