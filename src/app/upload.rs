//! Upload controller: selected file, one request at a time, result/loading transitions

use crate::constants::UPLOAD_ERROR_MESSAGE;
use crate::service::ReviewService;
use crate::types::*;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

fn lock(state: &Mutex<UploadState>) -> MutexGuard<'_, UploadState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct UploadController {
    state: Arc<Mutex<UploadState>>,
    service: Arc<dyn ReviewService>,
}

impl UploadController {
    pub fn new(service: Arc<dyn ReviewService>) -> Self {
        Self {
            state: Arc::new(Mutex::new(UploadState::default())),
            service,
        }
    }

    pub fn set_service(&mut self, service: Arc<dyn ReviewService>) {
        self.service = service;
    }

    pub fn requires_prompt(&self) -> bool {
        self.service.requires_prompt()
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> UploadState {
        lock(&self.state).clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn select_file(&self, file: SelectedFile) {
        info!(name = %file.name, size = file.size(), "Resume selected");
        let mut s = lock(&self.state);
        s.file = Some(file);
        if s.result.is_some() {
            s.set_result(None);
        }
        if !s.loading {
            s.phase = UploadPhase::Idle;
        }
    }

    pub fn clear_file(&self) {
        debug!("Selection cleared");
        let mut s = lock(&self.state);
        s.file = None;
        s.prompt = None;
        if s.result.is_some() {
            s.set_result(None);
        }
        if !s.loading {
            s.phase = UploadPhase::Idle;
        }
    }

    pub fn set_prompt(&self, prompt: &str) {
        let mut s = lock(&self.state);
        s.prompt = Some(prompt.to_string()).filter(|p| !p.trim().is_empty());
    }

    /// Whether `submit` would start a request right now
    pub fn can_submit(&self) -> bool {
        let s = lock(&self.state);
        !s.loading && s.file.is_some() && (!self.requires_prompt() || s.prompt.is_some())
    }

    /// Start one review request on `runtime`. Returns `None` (and changes
    /// nothing) without a file, without a required prompt, or while a request
    /// is in flight. `on_settled` runs after the state has been updated.
    pub fn submit<F>(&self, runtime: &Handle, on_settled: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce() + Send + 'static,
    {
        let (file, prompt) = {
            let mut s = lock(&self.state);
            if s.loading {
                return None;
            }
            let file = s.file.clone()?;
            if self.requires_prompt() && s.prompt.is_none() {
                return None;
            }
            s.loading = true;
            s.phase = UploadPhase::Loading;
            (file, s.prompt.clone())
        };

        info!(name = %file.name, size = file.size(), "Submitting resume for review");

        let state = self.state.clone();
        let service = self.service.clone();
        Some(runtime.spawn(async move {
            let started = Instant::now();
            let outcome = service.review(&file, prompt.as_deref()).await;

            {
                let mut s = lock(&state);
                match outcome {
                    Ok(feedback) => {
                        info!(
                            bytes = feedback.len(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Review received"
                        );
                        s.set_result(Some(feedback));
                        s.phase = UploadPhase::Displayed;
                    }
                    Err(e) => {
                        warn!(error = %e, "Review failed");
                        s.set_result(Some(UPLOAD_ERROR_MESSAGE.to_string()));
                        s.phase = UploadPhase::Errored;
                    }
                }
                s.completed_at = Some(chrono::Local::now());
                s.loading = false;
            }

            on_settled();
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReviewError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Replies from a queue, each reply held back until `release` is notified
    struct FakeService {
        replies: Mutex<Vec<Result<String, ReviewError>>>,
        release: Arc<Notify>,
        calls: AtomicUsize,
        prompt_required: bool,
        last_prompt: Mutex<Option<String>>,
    }

    impl FakeService {
        fn new(mut replies: Vec<Result<String, ReviewError>>) -> Arc<Self> {
            replies.reverse();
            Arc::new(Self {
                replies: Mutex::new(replies),
                release: Arc::new(Notify::new()),
                calls: AtomicUsize::new(0),
                prompt_required: false,
                last_prompt: Mutex::new(None),
            })
        }

        fn with_prompt() -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(vec![Ok("ok".into())]),
                release: Arc::new(Notify::new()),
                calls: AtomicUsize::new(0),
                prompt_required: true,
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ReviewService for FakeService {
        async fn review(&self, _file: &SelectedFile, prompt: Option<&str>) -> Result<String, ReviewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.map(str::to_string);
            self.release.notified().await;
            self.replies.lock().unwrap().pop().expect("no reply queued")
        }

        fn requires_prompt(&self) -> bool {
            self.prompt_required
        }
    }

    fn resume() -> SelectedFile {
        SelectedFile::from_bytes("resume.pdf", b"%PDF-1.7".as_slice())
    }

    fn network_down() -> ReviewError {
        ReviewError::Io {
            path: "network".into(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        }
    }

    #[test]
    fn select_then_clear_returns_to_empty() {
        let controller = UploadController::new(FakeService::new(vec![]));
        controller.select_file(resume());
        controller.set_prompt("Be harsh");
        controller.clear_file();

        let s = controller.snapshot();
        assert_eq!(s.file, None);
        assert_eq!(s.prompt, None);
        assert_eq!(s.result, None);
        assert!(!s.loading);
        assert_eq!(s.phase, UploadPhase::Idle);
    }

    #[tokio::test]
    async fn submit_without_file_is_a_no_op() {
        let service = FakeService::new(vec![]);
        let controller = UploadController::new(service.clone());
        let before = controller.snapshot();

        assert!(controller.submit(&Handle::current(), || {}).is_none());

        assert_eq!(controller.snapshot(), before);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_stores_body_and_toggles_loading() {
        let service = FakeService::new(vec![Ok("## Feedback\n- Good structure".into())]);
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());

        let settled = Arc::new(AtomicUsize::new(0));
        let counter = settled.clone();
        let task = controller
            .submit(&Handle::current(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let during = controller.snapshot();
        assert!(during.loading);
        assert_eq!(during.phase, UploadPhase::Loading);
        assert_eq!(during.result, None);

        service.release.notify_one();
        task.await.unwrap();

        let after = controller.snapshot();
        assert!(!after.loading);
        assert_eq!(after.result.as_deref(), Some("## Feedback\n- Good structure"));
        assert_eq!(after.phase, UploadPhase::Displayed);
        assert!(after.completed_at.is_some());
        assert_eq!(settled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_stores_fixed_message() {
        let service = FakeService::new(vec![Err(network_down())]);
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());

        let task = controller.submit(&Handle::current(), || {}).unwrap();
        assert!(controller.is_loading());

        service.release.notify_one();
        task.await.unwrap();

        let after = controller.snapshot();
        assert!(!after.loading);
        assert_eq!(after.result.as_deref(), Some(UPLOAD_ERROR_MESSAGE));
        assert_eq!(after.phase, UploadPhase::Errored);
    }

    #[tokio::test]
    async fn second_submit_while_loading_is_ignored() {
        let service = FakeService::new(vec![Ok("first".into())]);
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());

        let task = controller.submit(&Handle::current(), || {}).unwrap();
        assert!(!controller.can_submit());
        assert!(controller.submit(&Handle::current(), || {}).is_none());

        service.release.notify_one();
        task.await.unwrap();
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert!(controller.can_submit());
    }

    #[tokio::test]
    async fn resubmission_overwrites_previous_result() {
        let service = FakeService::new(vec![Ok("first review".into()), Err(network_down())]);
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());

        let task = controller.submit(&Handle::current(), || {}).unwrap();
        service.release.notify_one();
        task.await.unwrap();
        let first = controller.snapshot();
        assert_eq!(first.result.as_deref(), Some("first review"));

        let task = controller.submit(&Handle::current(), || {}).unwrap();
        assert!(controller.is_loading());
        // the old result stays visible until the new one settles
        assert_eq!(controller.snapshot().result.as_deref(), Some("first review"));
        service.release.notify_one();
        task.await.unwrap();

        let second = controller.snapshot();
        assert_eq!(second.result.as_deref(), Some(UPLOAD_ERROR_MESSAGE));
        assert!(second.revision > first.revision);
        assert!(!second.loading);
    }

    #[tokio::test]
    async fn selecting_a_new_file_clears_the_result() {
        let service = FakeService::new(vec![Ok("review".into())]);
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());
        let task = controller.submit(&Handle::current(), || {}).unwrap();
        service.release.notify_one();
        task.await.unwrap();

        controller.select_file(SelectedFile::from_bytes("other.pdf", b"%PDF".as_slice()));
        let s = controller.snapshot();
        assert_eq!(s.result, None);
        assert_eq!(s.phase, UploadPhase::Idle);
        assert_eq!(s.file.map(|f| f.name), Some("other.pdf".to_string()));
    }

    #[tokio::test]
    async fn prompt_variant_needs_a_prompt() {
        let service = FakeService::with_prompt();
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());

        controller.set_prompt("   ");
        assert!(controller.submit(&Handle::current(), || {}).is_none());
        assert!(!controller.is_loading());

        controller.set_prompt("Is my summary too long?");
        let task = controller.submit(&Handle::current(), || {}).unwrap();
        service.release.notify_one();
        task.await.unwrap();
        assert_eq!(controller.snapshot().result.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn prompt_carries_over_to_a_new_file() {
        let service = FakeService::with_prompt();
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());
        controller.set_prompt("Is my summary too long?");

        controller.select_file(SelectedFile::from_bytes("updated.pdf", b"%PDF-1.7".as_slice()));
        let s = controller.snapshot();
        assert_eq!(s.prompt.as_deref(), Some("Is my summary too long?"));
        assert!(controller.can_submit());

        let task = controller.submit(&Handle::current(), || {}).unwrap();
        service.release.notify_one();
        task.await.unwrap();
        assert_eq!(
            service.last_prompt.lock().unwrap().as_deref(),
            Some("Is my summary too long?")
        );
    }

    #[tokio::test]
    async fn cleared_prompt_blocks_submit_after_file_change() {
        let service = FakeService::with_prompt();
        let controller = UploadController::new(service.clone());
        controller.select_file(resume());
        controller.set_prompt("old question");
        controller.select_file(SelectedFile::from_bytes("updated.pdf", b"%PDF-1.7".as_slice()));
        controller.set_prompt("");

        assert!(!controller.can_submit());
        assert!(controller.submit(&Handle::current(), || {}).is_none());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }
}
