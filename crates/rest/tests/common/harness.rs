//! RPC test harness.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;

use bizlog_persistence::backends::MemoryGateway;
use bizlog_persistence::core::{
    DictionaryLabelResolver, PersistenceGateway, ScrollHandle, ScrollPage, ScrollRequest,
    SnowflakeIdAllocator,
};
use bizlog_persistence::error::{BackendError, StorageResult};
use bizlog_persistence::types::{CustomerAccountLog, LogDocument, LogRecord};
use bizlog_rest::{LogServices, ServerConfig, create_app_with_config};

/// Page cap used by test servers.
pub const TEST_MAX_SIZE: u32 = 10;

/// A running test server and the stores behind it.
pub struct TestApp {
    /// The server.
    pub server: TestServer,
    /// Business log store.
    pub business: Arc<MemoryGateway<LogRecord>>,
    /// Customer account log store.
    pub accounts: Arc<MemoryGateway<CustomerAccountLog>>,
}

/// Creates a server over in-memory gateways with a page cap of
/// [`TEST_MAX_SIZE`].
pub fn create_test_app() -> TestApp {
    let config = ServerConfig {
        max_size: TEST_MAX_SIZE,
        ..ServerConfig::for_testing()
    };
    let business = Arc::new(MemoryGateway::new());
    let accounts = Arc::new(MemoryGateway::new());
    let services = LogServices::new(
        business.clone(),
        accounts.clone(),
        Arc::new(DictionaryLabelResolver::new([
            ("add", "Create"),
            ("edit", "Update"),
        ])),
        Arc::new(SnowflakeIdAllocator::new(3)),
        config.scroll_config(),
    );
    let app = create_app_with_config(services, config);
    let server = TestServer::new(app).expect("Failed to create test server");
    TestApp {
        server,
        business,
        accounts,
    }
}

/// Creates a server whose gateways fail every call.
pub fn create_failing_app() -> TestServer {
    let config = ServerConfig::for_testing();
    let services = LogServices::new(
        Arc::new(UnavailableGateway),
        Arc::new(UnavailableGateway),
        Arc::new(DictionaryLabelResolver::empty()),
        Arc::new(SnowflakeIdAllocator::new(3)),
        config.scroll_config(),
    );
    TestServer::new(create_app_with_config(services, config))
        .expect("Failed to create test server")
}

/// A gateway whose search engine is down.
pub struct UnavailableGateway;

fn unavailable<T>() -> StorageResult<T> {
    Err(BackendError::Unavailable {
        backend_name: "unavailable".to_string(),
        message: "connection refused".to_string(),
    }
    .into())
}

#[async_trait]
impl<D: LogDocument> PersistenceGateway<D> for UnavailableGateway {
    fn backend_name(&self) -> &'static str {
        "unavailable"
    }

    async fn save(&self, _document: &D) -> StorageResult<()> {
        unavailable()
    }

    async fn save_all(&self, _documents: &[D]) -> StorageResult<()> {
        unavailable()
    }

    async fn delete_all(&self) -> StorageResult<()> {
        unavailable()
    }

    async fn start_scroll(
        &self,
        _keep_alive: Duration,
        _request: &ScrollRequest,
    ) -> StorageResult<ScrollPage<D>> {
        unavailable()
    }

    async fn continue_scroll(
        &self,
        _handle: &ScrollHandle,
        _keep_alive: Duration,
    ) -> StorageResult<ScrollPage<D>> {
        unavailable()
    }

    async fn clear_scroll(&self, _handle: &ScrollHandle) -> StorageResult<()> {
        Ok(())
    }
}
