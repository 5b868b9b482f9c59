//! Redis-backed counter store.
//!
//! - One multiplexed connection, opened lazily on first use.
//! - Connect and command round-trips are each bounded by their own timeout.
//! - A connection-class failure discards the handle so the next call
//!   reconnects; store-level failures keep it.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};
use tokio::sync::Mutex;
use tokio::time::timeout;

use hitcount_core::error::{HitCountError, Result};

use super::CounterStore;
use crate::config::StoreSection;

pub struct RedisStore {
    client: redis::Client,
    host: String,
    port: u16,
    connect_timeout: Duration,
    socket_timeout: Duration,
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisStore {
    /// Build the client. Does not touch the network.
    pub fn new(cfg: &StoreSection) -> Result<Self> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(cfg.host.clone(), cfg.port),
            redis: RedisConnectionInfo {
                db: cfg.db,
                ..Default::default()
            },
        };
        let client = redis::Client::open(info)
            .map_err(|e| HitCountError::Config(format!("redis client: {e}")))?;

        Ok(Self {
            client,
            host: cfg.host.clone(),
            port: cfg.port,
            connect_timeout: cfg.connect_timeout(),
            socket_timeout: cfg.socket_timeout(),
            conn: Mutex::new(None),
        })
    }

    /// `host:port` this store connects to.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cached handle, or a fresh one. The slot lock is never held across the
    /// connect itself, so concurrent callers each wait at most one connect
    /// timeout; when several race, the first stored handle wins.
    async fn connection(&self) -> Result<MultiplexedConnection> {
        if let Some(conn) = self.conn.lock().await.as_ref() {
            return Ok(conn.clone());
        }

        let conn = match timeout(
            self.connect_timeout,
            self.client.get_multiplexed_tokio_connection(),
        )
        .await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(classify(e)),
            Err(_) => return Err(HitCountError::Timeout(self.connect_timeout)),
        };

        let mut slot = self.conn.lock().await;
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.clone());
        }
        tracing::debug!(endpoint = %self.endpoint(), "redis connected");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// Drop the cached handle after a connection-class failure.
    async fn discard_on(&self, err: &HitCountError) {
        if err.is_connection() {
            self.conn.lock().await.take();
        }
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.connection().await?;

        let res: std::result::Result<redis::RedisResult<i64>, _> =
            timeout(self.socket_timeout, conn.incr(key, 1)).await;
        let err = match res {
            Ok(Ok(n)) => return Ok(n),
            Ok(Err(e)) => classify(e),
            Err(_) => HitCountError::Timeout(self.socket_timeout),
        };

        self.discard_on(&err).await;
        Err(err)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        let res: std::result::Result<redis::RedisResult<String>, _> = timeout(
            self.socket_timeout,
            redis::cmd("PING").query_async(&mut conn),
        )
        .await;
        let err = match res {
            Ok(Ok(_)) => return Ok(()),
            Ok(Err(e)) => classify(e),
            Err(_) => HitCountError::Timeout(self.socket_timeout),
        };

        self.discard_on(&err).await;
        Err(err)
    }

    async fn close(&self) {
        if self.conn.lock().await.take().is_some() {
            tracing::debug!(endpoint = %self.endpoint(), "redis connection released");
        }
    }
}

/// Split redis client failures into connection-class and store-class.
///
/// `-LOADING` (dataset still loading after a restart) counts as
/// connection-class: the server is up but cannot serve yet.
fn classify(e: RedisError) -> HitCountError {
    if e.is_io_error()
        || e.is_connection_refusal()
        || e.is_connection_dropped()
        || e.is_timeout()
        || e.kind() == redis::ErrorKind::BusyLoadingError
    {
        HitCountError::Connection(e.to_string())
    } else {
        HitCountError::Store(e.to_string())
    }
}
