//! Mock implementations for testing
//!
//! These mocks enable runtime tests without a real answering service.

use crate::query::{Answer, QueryError, QueryRequest, QueryService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Query Service
// ============================================================================

/// Mock query service that returns queued answers
pub struct MockQueryService {
    responses: Mutex<VecDeque<Result<Answer, QueryError>>>,
    healthy: bool,
    /// Record of all requests made
    pub requests: Mutex<Vec<QueryRequest>>,
}

impl MockQueryService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            healthy: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Queue a successful answer
    pub fn queue_answer(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Answer::text(text)));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: QueryError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockQueryService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, QueryError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QueryError::network("No mock response queued")))
    }

    async fn check_health(&self) -> bool {
        self.healthy
    }
}

// ============================================================================
// Delayed Mock Query Service (for in-flight testing)
// ============================================================================

/// Mock query service with configurable delay
pub struct DelayedMockQueryService {
    inner: MockQueryService,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockQueryService {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockQueryService::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_answer(&self, text: &str) {
        self.inner.queue_answer(text);
    }

    pub fn recorded_requests(&self) -> Vec<QueryRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl QueryService for DelayedMockQueryService {
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, QueryError> {
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.ask(request).await
    }

    async fn check_health(&self) -> bool {
        self.inner.check_health().await
    }
}

// ============================================================================
// Runtime Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Domain, LoggingQueryService};
    use crate::runtime::{spawn_widget, WidgetError, WidgetHandle, WidgetNotice};
    use crate::state_machine::{
        FileUpload, PanelState, Screen, Section, Sender, TransitionError, WidgetContext,
        ERROR_REPLY,
    };

    const WAIT: Duration = Duration::from_secs(2);

    fn fast_context() -> WidgetContext {
        WidgetContext::new("test-widget")
            .with_delays(Duration::from_millis(10), Duration::from_millis(10))
    }

    async fn open_section(widget: &WidgetHandle, section: Section) {
        widget.toggle_open().await.unwrap();
        widget.select_domain(section).await.unwrap();
        let state = widget
            .wait_for(|s| s.nav.active_section() == Some(section), WAIT)
            .await
            .expect("section should open after transition");
        assert!(state.back_button_visible());
        assert!(!state.is_transitioning());
    }

    /// Integration test: topic pick followed by a successful query
    #[tokio::test]
    async fn test_topic_query_round_trip() {
        let service = Arc::new(MockQueryService::new());
        service.queue_answer("12 days per year.");
        let widget = spawn_widget(fast_context(), LoggingQueryService::new(service.clone()));

        open_section(&widget, Section::Hr).await;

        widget.select_topic("Leave Rules").await.unwrap();
        let state = widget.snapshot();
        assert_eq!(
            state.messages.as_slice()[0].text(),
            Some("Ask your queries regarding leave rules.")
        );
        assert!(!state.session.show_options);

        widget.send_message("How many days do I get?").await.unwrap();
        let state = widget
            .wait_for(|s| !s.is_loading() && s.messages.len() == 3, WAIT)
            .await
            .expect("answer should arrive");

        let log: Vec<_> = state
            .rendered_messages()
            .into_iter()
            .map(|m| (m.sender, m.text().unwrap().to_string()))
            .collect();
        assert_eq!(
            log,
            vec![
                (
                    Sender::Assistant,
                    "Ask your queries regarding leave rules.".to_string()
                ),
                (Sender::User, "How many days do I get?".to_string()),
                (Sender::Assistant, "12 days per year.".to_string()),
            ]
        );
        assert_eq!(
            service.recorded_requests(),
            vec![QueryRequest::new(
                "Leave Rules: How many days do I get?",
                Domain::Hr
            )]
        );
    }

    /// Integration test: service failure becomes an apology message
    #[tokio::test]
    async fn test_query_failure_becomes_apology() {
        let service = Arc::new(MockQueryService::new());
        service.queue_error(QueryError::status(500, "boom"));
        let widget = spawn_widget(fast_context(), service.clone());

        open_section(&widget, Section::Financials).await;
        widget.send_message("Q3 budget?").await.unwrap();

        let state = widget
            .wait_for(|s| !s.is_loading() && s.messages.len() == 2, WAIT)
            .await
            .expect("apology should arrive");
        assert_eq!(state.messages.last().unwrap().text(), Some(ERROR_REPLY));
        assert_eq!(service.recorded_requests()[0].domain, Domain::Finance);

        // Still usable afterwards
        service.queue_answer("Approved.");
        widget.send_message("Again?").await.unwrap();
        let state = widget
            .wait_for(|s| s.messages.len() == 4, WAIT)
            .await
            .expect("second answer should arrive");
        assert_eq!(state.messages.last().unwrap().text(), Some("Approved."));
    }

    /// Integration test: second send while one is in flight is rejected
    #[tokio::test]
    async fn test_send_rejected_while_in_flight() {
        let service = Arc::new(DelayedMockQueryService::new(Duration::from_millis(200)));
        service.queue_answer("first answer");
        let widget = spawn_widget(fast_context(), service.clone());
        let mut notices = widget.notices();

        open_section(&widget, Section::Hr).await;
        widget.send_message("one").await.unwrap();

        let state = widget.snapshot();
        assert!(state.is_loading());
        assert_eq!(
            state
                .rendered_messages()
                .iter()
                .filter(|m| m.is_thinking())
                .count(),
            1
        );

        let second = widget.send_message("two").await;
        assert_eq!(
            second,
            Err(WidgetError::Rejected(TransitionError::QueryInFlight))
        );
        assert!(matches!(
            notices.recv().await.unwrap(),
            WidgetNotice::Rejected { .. }
        ));

        let state = widget
            .wait_for(|s| !s.is_loading(), WAIT)
            .await
            .expect("first answer should arrive");
        assert_eq!(state.messages.len(), 2);
        assert_eq!(service.recorded_requests().len(), 1);
    }

    /// Integration test: answer arriving after the widget closed is dropped
    #[tokio::test]
    async fn test_late_answer_after_close_is_discarded() {
        let service = Arc::new(DelayedMockQueryService::new(Duration::from_millis(150)));
        service.queue_answer("too late");
        let request_started = service.request_started.clone();
        let widget = spawn_widget(fast_context(), service.clone());

        open_section(&widget, Section::Hr).await;
        widget.send_message("hello").await.unwrap();
        tokio::time::timeout(WAIT, request_started.notified())
            .await
            .expect("query should start");

        widget.toggle_open().await.unwrap();
        assert!(!widget.snapshot().is_open());
        let closed = widget
            .wait_for(|s| s.panel == PanelState::Closed, WAIT)
            .await
            .expect("close animation should finish");
        assert!(closed.messages.is_empty());
        assert_eq!(closed.screen(), Screen::Entry);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let state = widget.snapshot();
        assert!(state.messages.is_empty());
        assert!(!state.is_loading());
        assert_eq!(service.recorded_requests().len(), 1);
    }

    /// Integration test: back without interaction goes straight to entry
    #[tokio::test]
    async fn test_back_without_interaction() {
        let widget = spawn_widget(fast_context(), MockQueryService::new());

        open_section(&widget, Section::Financials).await;
        widget.back_pressed().await.unwrap();
        assert!(!widget.snapshot().confirm_dialog_visible());

        let state = widget
            .wait_for(|s| s.screen() == Screen::Entry && s.epoch == 1, WAIT)
            .await
            .expect("should return to entry");
        assert!(!state.back_button_visible());
    }

    /// Integration test: confirm dialog, cancel, then confirm
    #[tokio::test]
    async fn test_confirm_back_flow() {
        let widget = spawn_widget(fast_context(), MockQueryService::new());
        open_section(&widget, Section::Hr).await;

        widget
            .upload_file(FileUpload::new("payslip.pdf", "application/pdf", vec![7u8; 16]))
            .await
            .unwrap();
        assert_eq!(widget.snapshot().files[0].size, 16);

        widget.back_pressed().await.unwrap();
        assert!(widget.snapshot().confirm_dialog_visible());

        widget.cancel_back().await.unwrap();
        let state = widget.snapshot();
        assert!(!state.confirm_dialog_visible());
        assert_eq!(state.screen(), Screen::Hr);

        // Idempotent
        widget.cancel_back().await.unwrap();
        assert_eq!(widget.snapshot(), state);

        widget.back_pressed().await.unwrap();
        widget.confirm_back().await.unwrap();
        let state = widget
            .wait_for(|s| s.screen() == Screen::Entry && !s.is_transitioning(), WAIT)
            .await
            .expect("should return to entry");
        assert!(state.files.is_empty());
        assert!(!state.session.has_interacted);
        assert!(state.is_open());
    }

    /// Integration test: rejected intents leave state untouched
    #[tokio::test]
    async fn test_rejected_intent_reports_error() {
        let widget = spawn_widget(fast_context(), MockQueryService::new());
        let before = widget.snapshot();

        let result = widget.select_topic("Leave Rules").await;
        assert_eq!(
            result,
            Err(WidgetError::Rejected(TransitionError::WrongSection))
        );
        assert_eq!(widget.snapshot(), before);

        // Blank input on the entry screen is silently ignored
        widget.send_message("   ").await.unwrap();
        assert_eq!(widget.snapshot(), before);
    }

    #[tokio::test]
    async fn test_health_probe_delegates_to_service() {
        let healthy = spawn_widget(fast_context(), MockQueryService::new());
        assert!(healthy.check_health().await);

        let unhealthy = spawn_widget(fast_context(), MockQueryService::unhealthy());
        assert!(!unhealthy.check_health().await);
    }
}
