use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header, Response, StatusCode};
use serde_json::Value;

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use job_portal_api::config::AppConfig;
use job_portal_api::database::{DatabaseManager, DocumentStore, MemoryStore};
use job_portal_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process server over a fresh store. Each test gets its own, since every
/// `#[tokio::test]` runs on its own runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(test_config(), Arc::new(MemoryStore::new())).await
    }

    /// Server over Postgres at `DATABASE_URL`, inside a schema of its own
    pub async fn spawn_postgres() -> Result<Self> {
        let store = postgres_store().await?;
        Self::spawn_with(test_config(), Arc::new(store)).await
    }

    pub async fn spawn_with(config: AppConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let state = AppState::new(config, store);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn get_json(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        let status = res.status();
        Ok((status, res.json::<Value>().await?))
    }

    /// Insert a job and return its id
    pub async fn create_job(&self, job: Value) -> Result<String> {
        let res = self.post_json("/jobs", &job).await?;
        assert_eq!(res.status(), StatusCode::OK, "job insert failed");
        inserted_id(res).await
    }

    /// Insert an application and return its id
    pub async fn create_application(&self, application: Value) -> Result<String> {
        let res = self.post_json("/job-applications", &application).await?;
        assert_eq!(res.status(), StatusCode::OK, "application insert failed");
        inserted_id(res).await
    }

    /// Run POST /jwt and return the `token=...` pair to send back as a Cookie header
    pub async fn login(&self, claims: Value) -> Result<String> {
        let res = self.post_json("/jwt", &claims).await?;
        assert_eq!(res.status(), StatusCode::OK, "token issue failed");
        session_cookie(&res).context("no token cookie in /jwt response")
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.api.enable_request_logging = false;
    config.database.enable_query_logging = false;
    config
}

/// Fresh schema per server so runs never see each other's documents
async fn postgres_store() -> Result<DatabaseManager> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let schema = format!("job_portal_test_{}", Uuid::new_v4().simple());

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    sqlx::query(&format!("CREATE SCHEMA \"{}\"", schema))
        .execute(&admin)
        .await?;
    admin.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .after_connect(move |conn, _meta| {
            let set_path = format!("SET search_path TO \"{}\"", schema);
            Box::pin(async move {
                sqlx::query(&set_path).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await?;

    let store = DatabaseManager::from_pool(pool, true);
    store.ensure_tables().await?;
    Ok(store)
}

/// Run each listed check against the memory store, and against Postgres when
/// asked for with `cargo test -- --ignored` and `DATABASE_URL` set.
#[macro_export]
macro_rules! store_tests {
    ($($check:ident),* $(,)?) => {
        mod memory {
            $(
                #[tokio::test]
                async fn $check() -> anyhow::Result<()> {
                    let server = $crate::common::TestServer::spawn().await?;
                    super::$check(&server).await
                }
            )*
        }

        mod postgres {
            $(
                #[tokio::test]
                #[ignore = "requires DATABASE_URL"]
                async fn $check() -> anyhow::Result<()> {
                    let server = $crate::common::TestServer::spawn_postgres().await?;
                    super::$check(&server).await
                }
            )*
        }
    };
}

async fn inserted_id(res: Response) -> Result<String> {
    let body = res.json::<Value>().await?;
    assert_eq!(body["acknowledged"], true, "unexpected insert result: {}", body);
    body["insertedId"]
        .as_str()
        .map(str::to_string)
        .context("insert result without insertedId")
}

/// Raw `Set-Cookie` value for the session cookie, if any
pub fn set_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("token="))
        .map(str::to_string)
}

/// `token=...` pair from the session `Set-Cookie`, attributes stripped
pub fn session_cookie(res: &Response) -> Option<String> {
    set_cookie(res).and_then(|v| v.split(';').next().map(|pair| pair.trim().to_string()))
}
