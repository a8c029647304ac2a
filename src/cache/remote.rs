//! Redis Backend Module
//!
//! Cache backend over a Redis server. The connection is opened lazily on
//! first use and dropped after a connection-level failure, so the process
//! starts (and keeps serving) while Redis is unreachable and picks the
//! connection back up once Redis returns.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, IntoConnectionInfo, RedisError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheBackend, DEFAULT_OP_TIMEOUT};
use crate::error::CacheResult;

/// Keys requested per SCAN round trip during prefix deletion
const SCAN_BATCH: usize = 200;

// == Keyspace Pages ==
/// The two round trips a family delete is made of.
#[async_trait]
trait KeyspacePages: Send {
    /// One `SCAN` step: the next cursor (0 when done) and the matching keys of this page.
    async fn scan_page(&mut self, cursor: u64, pattern: &str) -> Result<(u64, Vec<String>), RedisError>;

    /// Deletes `keys`, returning how many existed.
    async fn delete_keys(&mut self, keys: Vec<String>) -> Result<usize, RedisError>;
}

#[async_trait]
impl KeyspacePages for MultiplexedConnection {
    async fn scan_page(&mut self, cursor: u64, pattern: &str) -> Result<(u64, Vec<String>), RedisError> {
        redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_BATCH)
            .query_async(self)
            .await
    }

    async fn delete_keys(&mut self, keys: Vec<String>) -> Result<usize, RedisError> {
        let removed: i64 = redis::cmd("DEL").arg(keys).query_async(self).await?;
        Ok(removed.max(0) as usize)
    }
}

/// Bounds one round trip. A stalled round trip surfaces as an io error so
/// the connection is dropped and reopened.
async fn round_trip<T, F>(limit: Duration, fut: F) -> Result<T, RedisError>
where
    F: std::future::Future<Output = Result<T, RedisError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(RedisError::from(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("round trip exceeded {}ms", limit.as_millis()),
        ))),
    }
}

/// Walks the whole `SCAN` cursor for `prefix`, deleting each page as it arrives.
///
/// Every round trip is bounded by `limit`; the walk as a whole is not.
async fn drain_family<P: KeyspacePages>(pages: &mut P, prefix: &str, limit: Duration) -> Result<usize, RedisError> {
    let pattern = format!("{}*", glob_escape(prefix));
    let mut cursor: u64 = 0;
    let mut removed = 0usize;
    let mut round_trips = 0u32;

    loop {
        let (next, keys) = round_trip(limit, pages.scan_page(cursor, &pattern)).await?;
        round_trips += 1;

        if !keys.is_empty() {
            removed += round_trip(limit, pages.delete_keys(keys)).await?;
            round_trips += 1;
        }

        if next == 0 {
            break;
        }
        cursor = next;
    }

    debug!(prefix, removed, round_trips, "redis family drained");
    Ok(removed)
}

// == Redis Backend ==
pub struct RedisBackend {
    client: Client,
    conn: Mutex<Option<MultiplexedConnection>>,
    round_trip_timeout: Duration,
}

impl RedisBackend {
    // == Constructor ==
    /// Creates a backend for a `redis://` URL or a `redis::ConnectionInfo`.
    ///
    /// Only validates the settings; no connection is attempted until the first call.
    pub fn new<T: IntoConnectionInfo>(info: T) -> CacheResult<Self> {
        let client = Client::open(info)?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
            round_trip_timeout: DEFAULT_OP_TIMEOUT,
        })
    }

    /// Sets the bound on each round trip of a family delete.
    pub fn with_round_trip_timeout(mut self, limit: Duration) -> Self {
        self.round_trip_timeout = limit;
        self
    }

    async fn connection(&self) -> CacheResult<MultiplexedConnection> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        info!("Redis connected");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Forgets the shared connection after a transport-level error.
    async fn on_error(&self, err: RedisError) -> RedisError {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            warn!("Redis connection lost: {}", err);
            self.conn.lock().await.take();
        }
        err
    }
}

/// Escapes glob metacharacters so a key prefix matches literally in `SCAN MATCH`.
fn glob_escape(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len() + 4);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.on_error(err).await.into()),
        }
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let result: Result<(), RedisError> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self.on_error(err).await.into()),
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection().await?;
        match conn.del::<_, i64>(key).await {
            Ok(removed) => Ok(removed > 0),
            Err(err) => Err(self.on_error(err).await.into()),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> CacheResult<usize> {
        let mut conn = self.connection().await?;
        match drain_family(&mut conn, prefix, self.round_trip_timeout).await {
            Ok(removed) => Ok(removed),
            Err(err) => Err(self.on_error(err).await.into()),
        }
    }

    async fn close(&self) {
        if self.conn.lock().await.take().is_some() {
            info!("Redis connection closed");
        }
    }
}
