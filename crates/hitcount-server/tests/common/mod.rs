//! Test doubles shared by the integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use hitcount_core::error::{HitCountError, Result};
use hitcount_server::store::CounterStore;

/// In-process store whose next failures can be scripted.
#[derive(Default)]
pub struct ScriptedStore {
    value: AtomicI64,
    failures: Mutex<VecDeque<HitCountError>>,
    calls: AtomicU32,
    closed: AtomicBool,
}

impl ScriptedStore {
    pub fn starting_at(value: i64) -> Arc<Self> {
        Arc::new(Self {
            value: AtomicI64::new(value),
            ..Default::default()
        })
    }

    /// Make the next `n` increments fail with whatever `make` returns.
    pub fn fail_next(&self, n: usize, make: impl Fn() -> HitCountError) {
        let mut q = self.failures.lock().unwrap();
        for _ in 0..n {
            q.push_back(make());
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for ScriptedStore {
    async fn incr(&self, _key: &str) -> Result<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

pub fn refused() -> HitCountError {
    HitCountError::Connection("connection refused".into())
}

/// Minimal RESP2 server: INCR/INCRBY on one shared integer, PING, and `+OK`
/// for anything else (connection setup commands).
pub struct FakeRedis {
    pub addr: SocketAddr,
    pub value: Arc<AtomicI64>,
    pub incr_calls: Arc<AtomicU32>,
    pub connections: Arc<AtomicU32>,
}

/// How a [`FakeRedis`] misbehaves.
#[derive(Debug, Clone, Copy)]
enum Fault {
    None,
    /// Every increment answers `-WRONGTYPE`.
    WrongType,
    /// The first increment answers `-LOADING`, later ones succeed.
    LoadingOnce,
    /// The first `n` accepted connections read commands but never reply.
    Silent(u32),
}

struct Shared {
    value: Arc<AtomicI64>,
    incr_calls: Arc<AtomicU32>,
    connections: Arc<AtomicU32>,
    loading: AtomicBool,
    fault: Fault,
}

impl FakeRedis {
    pub async fn start(value: i64) -> Self {
        Self::start_with(value, Fault::None).await
    }

    pub async fn start_wrongtype() -> Self {
        Self::start_with(0, Fault::WrongType).await
    }

    /// Answers the first increment with `-LOADING`, as Redis does while it
    /// reads its dataset after a restart.
    pub async fn start_loading(value: i64) -> Self {
        Self::start_with(value, Fault::LoadingOnce).await
    }

    /// Accepts connections but leaves the first `silent` of them unanswered.
    pub async fn start_silent(value: i64, silent: u32) -> Self {
        Self::start_with(value, Fault::Silent(silent)).await
    }

    async fn start_with(value: i64, fault: Fault) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shared = Arc::new(Shared {
            value: Arc::new(AtomicI64::new(value)),
            incr_calls: Arc::new(AtomicU32::new(0)),
            connections: Arc::new(AtomicU32::new(0)),
            loading: AtomicBool::new(matches!(fault, Fault::LoadingOnce)),
            fault,
        });

        let accept = Arc::clone(&shared);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, Arc::clone(&accept)));
            }
        });

        Self {
            addr,
            value: Arc::clone(&shared.value),
            incr_calls: Arc::clone(&shared.incr_calls),
            connections: Arc::clone(&shared.connections),
        }
    }
}

async fn serve(stream: TcpStream, shared: Arc<Shared>) {
    let nth = shared.connections.fetch_add(1, Ordering::SeqCst);
    let silent = matches!(shared.fault, Fault::Silent(n) if nth < n);

    let (rd, mut wr) = stream.into_split();
    let mut rd = BufReader::new(rd);

    while let Some(args) = read_command(&mut rd).await {
        if silent {
            continue;
        }
        let reply = match args.first().map(|a| a.to_ascii_uppercase()).as_deref() {
            Some("PING") => "+PONG\r\n".to_string(),
            Some("INCR") | Some("INCRBY") => {
                shared.incr_calls.fetch_add(1, Ordering::SeqCst);
                if matches!(shared.fault, Fault::WrongType) {
                    "-WRONGTYPE Operation against a key holding the wrong kind of value\r\n".into()
                } else if shared.loading.swap(false, Ordering::SeqCst) {
                    "-LOADING Redis is loading the dataset in memory\r\n".into()
                } else {
                    let delta: i64 = args.get(2).and_then(|d| d.parse().ok()).unwrap_or(1);
                    format!(":{}\r\n", shared.value.fetch_add(delta, Ordering::SeqCst) + delta)
                }
            }
            _ => "+OK\r\n".to_string(),
        };
        if wr.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
    }
}

async fn read_command<R>(rd: &mut BufReader<R>) -> Option<Vec<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    if rd.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let n: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(n);
    for _ in 0..n {
        line.clear();
        rd.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut buf = vec![0u8; len + 2];
        rd.read_exact(&mut buf).await.ok()?;
        buf.truncate(len);
        args.push(String::from_utf8(buf).ok()?);
    }
    Some(args)
}

/// A localhost port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
