//! Instrumented collaborators for service tests.
//!
//! [`RecordingGateway`] wraps a [`MemoryGateway`] and records every call, so
//! tests can assert how many fetches a search issued and that every scroll
//! it opened was cleared. [`CountingLabelResolver`] does the same for label
//! lookups. [`TestContext`] wires both into a [`LogService`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use bizlog_persistence::backends::MemoryGateway;
use bizlog_persistence::core::{
    DictionaryLabelResolver, LabelResolver, PersistenceGateway, ScrollHandle, ScrollPage,
    ScrollRequest, SnowflakeIdAllocator,
};
use bizlog_persistence::error::{BackendError, StorageResult};
use bizlog_persistence::types::{LogDocument, ScrollConfig};
use bizlog_persistence::LogService;

/// Behaviour tweaks for a [`RecordingGateway`].
#[derive(Debug, Clone, Default)]
pub struct GatewayFaults {
    /// Fail the n-th continuation (1-based).
    pub fail_continue_at: Option<usize>,
    /// Sleep this long before each continuation.
    pub continue_delay: Option<Duration>,
}

/// A gateway that counts and records every call.
pub struct RecordingGateway<D: LogDocument> {
    inner: MemoryGateway<D>,
    faults: GatewayFaults,
    starts: AtomicUsize,
    continues: AtomicUsize,
    clears: AtomicUsize,
    saves: AtomicUsize,
    save_alls: AtomicUsize,
    started: Mutex<Vec<ScrollHandle>>,
    cleared: Mutex<Vec<ScrollHandle>>,
    page_sizes: Mutex<Vec<u32>>,
}

impl<D: LogDocument> RecordingGateway<D> {
    /// Creates a well-behaved gateway.
    pub fn new() -> Self {
        Self::with_faults(GatewayFaults::default())
    }

    /// Creates a gateway that misbehaves as configured.
    pub fn with_faults(faults: GatewayFaults) -> Self {
        Self {
            inner: MemoryGateway::new(),
            faults,
            starts: AtomicUsize::new(0),
            continues: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            save_alls: AtomicUsize::new(0),
            started: Mutex::new(Vec::new()),
            cleared: Mutex::new(Vec::new()),
            page_sizes: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &MemoryGateway<D> {
        &self.inner
    }

    /// Number of scrolls opened.
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of continuation fetches.
    pub fn continues(&self) -> usize {
        self.continues.load(Ordering::SeqCst)
    }

    /// Number of fetches of any kind.
    pub fn fetches(&self) -> usize {
        self.starts() + self.continues()
    }

    /// Number of clear calls.
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Number of single saves.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of bulk saves.
    pub fn save_alls(&self) -> usize {
        self.save_alls.load(Ordering::SeqCst)
    }

    /// Handles returned by `start_scroll`, in order.
    pub fn started_handles(&self) -> Vec<ScrollHandle> {
        self.started.lock().clone()
    }

    /// Handles passed to `clear_scroll`, in order.
    pub fn cleared_handles(&self) -> Vec<ScrollHandle> {
        self.cleared.lock().clone()
    }

    /// Page sizes requested when opening scrolls.
    pub fn page_sizes(&self) -> Vec<u32> {
        self.page_sizes.lock().clone()
    }
}

#[async_trait]
impl<D: LogDocument> PersistenceGateway<D> for RecordingGateway<D> {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn save(&self, document: &D) -> StorageResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(document).await
    }

    async fn save_all(&self, documents: &[D]) -> StorageResult<()> {
        self.save_alls.fetch_add(1, Ordering::SeqCst);
        self.inner.save_all(documents).await
    }

    async fn delete_all(&self) -> StorageResult<()> {
        self.inner.delete_all().await
    }

    async fn start_scroll(
        &self,
        keep_alive: Duration,
        request: &ScrollRequest,
    ) -> StorageResult<ScrollPage<D>> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.page_sizes.lock().push(request.page_size);
        let page = self.inner.start_scroll(keep_alive, request).await?;
        self.started.lock().push(page.handle.clone());
        Ok(page)
    }

    async fn continue_scroll(
        &self,
        handle: &ScrollHandle,
        keep_alive: Duration,
    ) -> StorageResult<ScrollPage<D>> {
        let call = self.continues.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.faults.continue_delay {
            tokio::time::sleep(delay).await;
        }
        if self.faults.fail_continue_at == Some(call) {
            return Err(BackendError::Unavailable {
                backend_name: "recording".to_string(),
                message: format!("injected failure on continuation {}", call),
            }
            .into());
        }
        self.inner.continue_scroll(handle, keep_alive).await
    }

    async fn clear_scroll(&self, handle: &ScrollHandle) -> StorageResult<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.cleared.lock().push(handle.clone());
        self.inner.clear_scroll(handle).await
    }
}

/// A label resolver that counts how often it is consulted.
pub struct CountingLabelResolver {
    inner: DictionaryLabelResolver,
    single: AtomicUsize,
    all: AtomicUsize,
}

impl CountingLabelResolver {
    /// Creates a resolver over the given labels.
    pub fn new<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: DictionaryLabelResolver::new(labels),
            single: AtomicUsize::new(0),
            all: AtomicUsize::new(0),
        }
    }

    /// Number of `resolve_label` calls.
    pub fn single_calls(&self) -> usize {
        self.single.load(Ordering::SeqCst)
    }

    /// Number of `resolve_all_labels` calls.
    pub fn all_calls(&self) -> usize {
        self.all.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LabelResolver for CountingLabelResolver {
    async fn resolve_label(&self, code: &str) -> StorageResult<Option<String>> {
        self.single.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_label(code).await
    }

    async fn resolve_all_labels(&self) -> StorageResult<HashMap<String, String>> {
        self.all.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_all_labels().await
    }
}

/// A service wired to instrumented collaborators.
pub struct TestContext<D: LogDocument> {
    /// The service under test.
    pub service: LogService<D>,
    /// Its gateway.
    pub gateway: Arc<RecordingGateway<D>>,
    /// Its label resolver.
    pub labels: Arc<CountingLabelResolver>,
}

impl<D: LogDocument> TestContext<D> {
    /// Creates a context with the default scroll limits.
    pub fn new() -> Self {
        Self::with_config(ScrollConfig::default(), GatewayFaults::default())
    }

    /// Creates a context with a custom page cap.
    pub fn with_max_size(max_size: u32) -> Self {
        let config = ScrollConfig {
            max_size,
            ..ScrollConfig::default()
        };
        Self::with_config(config, GatewayFaults::default())
    }

    /// Creates a fully customised context.
    pub fn with_config(config: ScrollConfig, faults: GatewayFaults) -> Self {
        let gateway = Arc::new(RecordingGateway::with_faults(faults));
        let labels = Arc::new(CountingLabelResolver::new(operation_labels()));
        let service = LogService::new(
            gateway.clone(),
            labels.clone(),
            Arc::new(SnowflakeIdAllocator::new(1)),
            config,
        );
        Self {
            service,
            gateway,
            labels,
        }
    }

    /// Stores documents directly, bypassing the write path.
    pub async fn seed(&self, documents: &[D]) {
        self.gateway
            .inner()
            .save_all(documents)
            .await
            .expect("seeding failed");
    }
}

/// The operation type dictionary used by every test context.
pub fn operation_labels() -> Vec<(&'static str, &'static str)> {
    vec![("add", "Create"), ("edit", "Update"), ("del", "Delete")]
}
