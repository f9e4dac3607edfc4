//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in a binary. Migrations run
//! once into a template database, and each test gets its own database cloned
//! from it, so tests can assert on exact dictionary contents.

use anyhow::{Context, Result};
use axum::Router;
use sqlx::{Connection, PgConnection, PgPool};
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use uuid::Uuid;
use vsl_core::domains::auth::JwtService;
use vsl_core::kernel::{MockGestureRecognizer, MockSearchIndex, ServerDeps, TestDependencies};
use vsl_core::server::build_app;

const TEMPLATE_DB: &str = "vsl_template";
pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_JWT_ISSUER: &str = "vsl-test";

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    server_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=300"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let server_url = format!("postgresql://postgres:postgres@{}:{}", pg_host, pg_port);

        let mut admin = PgConnection::connect(&format!("{}/postgres", server_url))
            .await
            .context("Failed to connect to Postgres")?;
        sqlx::query(&format!("CREATE DATABASE {}", TEMPLATE_DB))
            .execute(&mut admin)
            .await
            .context("Failed to create template database")?;

        // Migrate the template once; test databases are cloned from it.
        // Cloning requires that nothing stays connected to the template.
        let mut template = PgConnection::connect(&format!("{}/{}", server_url, TEMPLATE_DB))
            .await
            .context("Failed to connect to template database")?;
        // `run_direct` sidesteps sqlx's "`Acquire` is not general enough" error.
        sqlx::migrate!("./migrations")
            .run_direct(&mut template)
            .await
            .context("Failed to run migrations")?;
        template.close().await?;
        admin.close().await?;

        Ok(Self {
            server_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }

    async fn fresh_database(&self) -> Result<String> {
        let name = format!("vsl_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::connect(&format!("{}/postgres", self.server_url)).await?;
        sqlx::query(&format!("CREATE DATABASE {} TEMPLATE {}", name, TEMPLATE_DB))
            .execute(&mut admin)
            .await
            .with_context(|| format!("Failed to create test database {}", name))?;
        admin.close().await?;
        Ok(format!("{}/{}", self.server_url, name))
    }

    /// Fresh database initialized with the C locale, migrated from scratch.
    async fn fresh_c_locale_database(&self) -> Result<String> {
        let name = format!("vsl_test_c_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::connect(&format!("{}/postgres", self.server_url)).await?;
        sqlx::query(&format!(
            "CREATE DATABASE {} TEMPLATE template0 ENCODING 'UTF8' LC_COLLATE 'C' LC_CTYPE 'C'",
            name
        ))
        .execute(&mut admin)
        .await
        .with_context(|| format!("Failed to create C locale database {}", name))?;
        admin.close().await?;

        let url = format!("{}/{}", self.server_url, name);
        let mut conn = PgConnection::connect(&url).await?;
        // `run_direct` sidesteps sqlx's "`Acquire` is not general enough" error.
        sqlx::migrate!("./migrations")
            .run_direct(&mut conn)
            .await
            .context("Failed to run migrations on C locale database")?;
        conn.close().await?;
        Ok(url)
    }
}

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let entry = create_entry(&ctx.deps, "xin chào").await;
///     ctx.settle().await;
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
    pub deps: ServerDeps,
    pub search_index: Arc<MockSearchIndex>,
    pub gesture: Arc<MockGestureRecognizer>,
    pub jwt_service: Arc<JwtService>,
    sync_worker: JoinHandle<()>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.sync_worker.abort();
        self.db_pool.close().await;
    }
}

impl TestHarness {
    /// Creates a harness backed by a healthy in-memory search index.
    pub async fn new() -> Result<Self> {
        Self::with_dependencies(TestDependencies::new()).await
    }

    /// Creates a harness with custom mocks, on a fresh database.
    pub async fn with_dependencies(test_deps: TestDependencies) -> Result<Self> {
        let db_url = SharedTestInfra::get().await.fresh_database().await?;
        Self::on_database(&db_url, test_deps).await
    }

    /// Creates a harness on a database whose default collation is `C`.
    pub async fn with_c_locale() -> Result<Self> {
        let db_url = SharedTestInfra::get().await.fresh_c_locale_database().await?;
        Self::on_database(&db_url, TestDependencies::new()).await
    }

    async fn on_database(db_url: &str, test_deps: TestDependencies) -> Result<Self> {
        let db_pool = PgPool::connect(db_url)
            .await
            .context("Failed to connect to test database")?;

        let search_index = test_deps.search_index.clone();
        let gesture = test_deps.gesture.clone();
        let (deps, sync_worker) = test_deps.into_server_deps(db_pool.clone());

        Ok(Self {
            db_pool,
            deps,
            search_index,
            gesture,
            jwt_service: Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
            sync_worker,
        })
    }

    /// Router wired to this harness's dependencies.
    pub fn app(&self) -> Router {
        build_app(self.deps.clone(), self.jwt_service.clone(), &[])
    }

    /// Wait until every scheduled index propagation has finished.
    pub async fn settle(&self) {
        tokio::time::timeout(Duration::from_secs(10), self.deps.sync.wait_idle())
            .await
            .expect("search index propagation did not settle");
    }
}
