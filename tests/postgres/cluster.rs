//! Database provisioning for `PostgreSQL` integration tests.

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tokio::runtime::Runtime;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Variable naming an externally managed scratch database.
pub const TEST_DATABASE_URL_ENV: &str = "TASKTRACKER_TEST_DATABASE_URL";

const EMBEDDED_DATABASE: &str = "tasktracker_test";

const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_tasks/up.sql");

static SHARED_DATABASE: OnceLock<Result<TestDatabase, String>> = OnceLock::new();
static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Migrated database shared by every test in the suite.
///
/// Tests isolate themselves by working under unique owner identities.
pub struct TestDatabase {
    url: String,
    _cluster: Option<EmbeddedCluster>,
}

impl TestDatabase {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Returns the shared database, provisioning it on first use.
///
/// Provisioning runs on its own thread so the embedded cluster can drive a
/// private runtime while the caller is inside `#[tokio::test]`.
pub fn shared_database() -> Result<&'static TestDatabase, BoxError> {
    SHARED_DATABASE
        .get_or_init(|| {
            std::thread::spawn(provision)
                .join()
                .map_err(|_| "database provisioning panicked".to_owned())
                .and_then(|result| result.map_err(|err| err.to_string()))
        })
        .as_ref()
        .map_err(|message| format!("PostgreSQL unavailable: {message}").into())
}

fn provision() -> Result<TestDatabase, BoxError> {
    let database = match env::var(TEST_DATABASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => TestDatabase {
            url,
            _cluster: None,
        },
        _ => {
            let cluster = EmbeddedCluster::start()?;
            cluster.ensure_database(EMBEDDED_DATABASE)?;
            TestDatabase {
                url: cluster.database_url(EMBEDDED_DATABASE),
                _cluster: Some(cluster),
            }
        }
    };
    apply_schema(database.url())?;
    Ok(database)
}

fn apply_schema(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_TASKS_SQL)
        .map_err(|err| Box::new(err) as BoxError)
}

/// Embedded cluster started in-process for an unprivileged test runner.
struct EmbeddedCluster {
    settings: Settings,
    runtime: Runtime,
    postgres: Option<PostgreSQL>,
}

impl EmbeddedCluster {
    fn start() -> Result<Self, BoxError> {
        let mut bootstrap = bootstrap_for_tests().map_err(|err| Box::new(err) as BoxError)?;
        if matches!(bootstrap.privileges, ExecutionPrivileges::Root) {
            return Err(format!(
                "embedded PostgreSQL needs an unprivileged user; set {TEST_DATABASE_URL_ENV} instead"
            )
            .into());
        }
        sync_password_from_file(&mut bootstrap.settings)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| Box::new(err) as BoxError)?;
        let env_guard = EnvVarGuard::set_many(&env_vars_to_os(&bootstrap.environment.to_env()));
        let mut postgres = PostgreSQL::new(bootstrap.settings.clone());
        runtime.block_on(async {
            postgres
                .setup()
                .await
                .map_err(|err| Box::new(err) as BoxError)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres
                    .start()
                    .await
                    .map_err(|err| Box::new(err) as BoxError)?;
            }
            Ok::<(), BoxError>(())
        })?;
        drop(env_guard);

        Ok(Self {
            settings: postgres.settings().clone(),
            runtime,
            postgres: Some(postgres),
        })
    }

    fn database_url(&self, database: &str) -> String {
        self.settings.url(database)
    }

    fn ensure_database(&self, db_name: &str) -> Result<(), BoxError> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut conn = PgConnection::establish(&self.database_url("postgres"))
            .map_err(|err| Box::new(err) as BoxError)?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(db_name)
        .get_result::<ExistsRow>(&mut conn)
        .map_err(|err| Box::new(err) as BoxError)?;
        if row.exists {
            return Ok(());
        }

        let sql = format!("CREATE DATABASE {}", quote_identifier(db_name));
        diesel::sql_query(sql)
            .execute(&mut conn)
            .map_err(|err| Box::new(err) as BoxError)?;
        Ok(())
    }
}

impl Drop for EmbeddedCluster {
    fn drop(&mut self) {
        if let Some(postgres) = self.postgres.take() {
            drop(self.runtime.block_on(postgres.stop()));
        }
    }
}

/// Applies environment changes and restores the previous values on drop.
struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
}

impl EnvVarGuard {
    fn set_many(changes: &[(OsString, Option<OsString>)]) -> Self {
        let lock = ENV_MUTEX.get_or_init(|| Mutex::new(()));
        let _guard = lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = changes
            .iter()
            .map(|(key, value)| {
                let old = env::var_os(key);
                apply_env(key, value.as_deref());
                (key.clone(), old)
            })
            .collect();
        Self { previous }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let lock = ENV_MUTEX.get_or_init(|| Mutex::new(()));
        let _guard = lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for (key, value) in self.previous.drain(..).rev() {
            apply_env(&key, value.as_deref());
        }
    }
}

fn apply_env(key: &OsStr, value: Option<&OsStr>) {
    // SAFETY: the global mutex serializes environment mutations in tests.
    unsafe {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}

fn env_vars_to_os(env_vars: &[(String, Option<String>)]) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let path = settings.password_file.as_path();
    let file_name = path.file_name().ok_or_else(|| {
        Box::new(std::io::Error::other("password path must include a file name")) as BoxError
    })?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| Box::new(err) as BoxError)?;
    match dir.read_to_string(file_name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(Box::new(err) as BoxError),
    }
    Ok(())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
