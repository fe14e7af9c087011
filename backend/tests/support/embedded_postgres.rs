//! Embedded PostgreSQL databases for the Diesel adapter suites.
//!
//! Every test gets its own temporary database on the process-wide shared
//! cluster. The schema comes from the crate's embedded migrations, applied
//! through the same `run_pending_migrations` entry point `library-admin
//! migrate` uses, so test schemas never drift from production.

use std::future::Future;
use std::time::Duration;

use library_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated temporary database with a connection pool.
///
/// The pool is declared first so its connections close before the temporary
/// database is dropped.
pub struct PgDatabase {
    pool: DbPool,
    runtime: Runtime,
    _database: TemporaryDatabase,
}

impl PgDatabase {
    /// Connection pool over the temporary database.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Drive an async repository call to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(error);
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Provision a temporary database, apply migrations and open a pool.
pub fn provision_database() -> Result<PgDatabase, String> {
    let runtime = Runtime::new().map_err(|err| format!("create runtime: {err}"))?;
    let cluster = shared_cluster_handle().map_err(|err| format!("shared cluster: {err:?}"))?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| format!("create database: {err:?}"))?;
    let database_url = database.url().to_string();

    runtime
        .block_on(run_pending_migrations(&database_url))
        .map_err(|err| format!("migrate: {err}"))?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgDatabase {
        pool,
        runtime,
        _database: database,
    })
}
