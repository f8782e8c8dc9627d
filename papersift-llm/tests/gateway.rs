use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use papersift_core::{CompletionLlm, LlmRequest, LlmResponse, PaperSiftError, TokenUsage};
use papersift_llm::{Clock, LlmGateway, RateLimiter};

#[derive(Default)]
struct ManualClock {
    now: Mutex<Duration>,
    slept: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
        *self.now.lock().unwrap() += duration;
    }
}

struct Scripted {
    replies: Mutex<VecDeque<Result<LlmResponse, PaperSiftError>>>,
    requests: Mutex<Vec<LlmRequest>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(replies: Vec<Result<LlmResponse, PaperSiftError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl CompletionLlm for Scripted {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PaperSiftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PaperSiftError::LlmProvider("script exhausted".to_string())))
    }
}

fn ok(text: &str) -> Result<LlmResponse, PaperSiftError> {
    Ok(LlmResponse {
        content: text.to_string(),
        usage: TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 10,
            cached_tokens: 0,
        },
    })
}

fn transient() -> Result<LlmResponse, PaperSiftError> {
    Err(PaperSiftError::LlmProvider("503 Service Unavailable".to_string()))
}

fn gateway(llm: Arc<Scripted>, clock: Arc<ManualClock>, limit: i64) -> LlmGateway {
    LlmGateway::new(llm, RateLimiter::with_clock(limit, clock))
}

#[tokio::test]
async fn returns_text_and_usage_and_sends_deterministic_request() {
    let llm = Arc::new(Scripted::new(vec![ok("[\"2401.1\"]")]));
    let clock = Arc::new(ManualClock::default());
    let completion = gateway(llm.clone(), clock, 0)
        .call("prompt body", "gpt-4o-mini")
        .await
        .unwrap();

    assert_eq!(completion.text, "[\"2401.1\"]");
    assert_eq!(completion.usage.prompt_tokens, 100);

    let requests = llm.requests.lock().unwrap();
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[0].messages[0].content, "prompt body");
    assert_eq!(requests[0].temperature, 0.0);
    assert_eq!(requests[0].seed, 0);
}

#[tokio::test]
async fn retries_transient_failures_with_fixed_delay() {
    let llm = Arc::new(Scripted::new(vec![transient(), transient(), ok("done")]));
    let clock = Arc::new(ManualClock::default());
    let completion = gateway(llm.clone(), clock.clone(), 0)
        .call("p", "m")
        .await
        .unwrap();

    assert_eq!(completion.text, "done");
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        *clock.slept.lock().unwrap(),
        vec![Duration::from_secs(2), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn gives_up_after_three_attempts() {
    let llm = Arc::new(Scripted::new(vec![transient(), transient(), transient(), ok("late")]));
    let clock = Arc::new(ManualClock::default());
    let err = gateway(llm.clone(), clock, 0)
        .call("p", "m")
        .await
        .unwrap_err();

    match err {
        PaperSiftError::MaxRetriesExceeded { max, last } => {
            assert_eq!(max, 3);
            assert!(last.contains("503 Service Unavailable"), "{last}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn non_retryable_errors_are_returned_immediately() {
    let llm = Arc::new(Scripted::new(vec![Err(PaperSiftError::InvalidConfig(
        "no model".to_string(),
    ))]));
    let clock = Arc::new(ManualClock::default());
    let err = gateway(llm.clone(), clock.clone(), 0)
        .call("p", "")
        .await
        .unwrap_err();

    assert!(matches!(err, PaperSiftError::InvalidConfig(_)));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    assert!(clock.slept.lock().unwrap().is_empty());
}

#[tokio::test]
async fn every_attempt_takes_a_rate_limit_slot() {
    let llm = Arc::new(Scripted::new(vec![transient(), ok("a"), ok("b")]));
    let clock = Arc::new(ManualClock::default());
    let gateway = gateway(llm.clone(), clock.clone(), 2).with_retry_policy(3, Duration::ZERO);

    gateway.call("p", "m").await.unwrap();
    assert_eq!(clock.now(), Duration::ZERO);

    // Third request in the window has to wait for the rollover.
    gateway.call("p", "m").await.unwrap();
    assert_eq!(clock.now(), Duration::from_secs(61));
}

#[tokio::test]
async fn zero_attempt_policy_still_sends_one_request() {
    let llm = Arc::new(Scripted::new(vec![transient(), ok("unused")]));
    let clock = Arc::new(ManualClock::default());
    let err = gateway(llm.clone(), clock, 0)
        .with_retry_policy(0, Duration::ZERO)
        .call("p", "m")
        .await
        .unwrap_err();

    assert!(matches!(err, PaperSiftError::MaxRetriesExceeded { max: 1, .. }));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}
