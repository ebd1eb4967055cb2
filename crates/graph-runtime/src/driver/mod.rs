//! # JSON-lines Driver
//!
//! Reads one command per line, dispatches it, and writes one reply per line.
//! Subscriptions are pumped by their own tasks and interleave their
//! notifications with ordinary replies; every output line goes through a
//! single writer task so lines never tear.
//!
//! ## Lifecycle
//!
//! 1. Lines are processed in arrival order until EOF or the shutdown future
//!    resolves.
//! 2. The bus is shut down. Open subscriptions drain what is buffered, emit
//!    `complete`, and end.
//! 3. The writer flushes and the run returns a [`DriverSummary`].

pub mod messages;

pub use messages::{Command, CompletionReason, IncomingRequest, Outgoing};

use dashmap::DashMap;
use ge_04_operation_dispatcher::{
    codes, DispatchOutcome, ErrorBody, LiveSubscription, OperationDispatcher,
};
use serde_json::Value;
use shared_bus::SubscriberId;
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Output lines buffered ahead of the writer.
pub const OUTPUT_BUFFER: usize = 1024;

/// Counters for one driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    /// Non-blank input lines read.
    pub lines_read: u64,
    /// Output lines written.
    pub lines_written: u64,
    /// Subscriptions opened during the run.
    pub subscriptions_opened: u64,
}

/// Serves one input/output pair against a dispatcher.
pub struct Driver {
    dispatcher: Arc<OperationDispatcher>,
    live: Arc<DashMap<SubscriberId, oneshot::Sender<()>>>,
    subscriptions_opened: AtomicU64,
    local_callers: bool,
}

impl Driver {
    pub fn new(dispatcher: Arc<OperationDispatcher>) -> Self {
        Self {
            dispatcher,
            live: Arc::new(DashMap::new()),
            subscriptions_opened: AtomicU64::new(0),
            local_callers: false,
        }
    }

    /// Treat every caller on this transport as local.
    ///
    /// Locality is a property of the transport; a `local` flag sent by the
    /// client is always overwritten.
    pub fn with_local_callers(mut self, local: bool) -> Self {
        self.local_callers = local;
        self
    }

    /// Subscriptions currently being pumped.
    pub fn live_subscriptions(&self) -> usize {
        self.live.len()
    }

    /// Serve until `input` reaches EOF or `shutdown` resolves.
    pub async fn run<R, W, S>(&self, input: R, output: W, shutdown: S) -> io::Result<DriverSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()>,
    {
        let (tx, rx) = mpsc::channel::<Outgoing>(OUTPUT_BUFFER);
        let writer = tokio::spawn(write_lines(rx, output));
        let mut pumps = JoinSet::new();
        let mut lines = input.lines();
        let mut lines_read = 0u64;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        lines_read += 1;
                        self.handle_line(&line, &tx, &mut pumps).await;
                    }
                    None => {
                        debug!("Input closed");
                        break;
                    }
                },
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        self.dispatcher.bus().shutdown();
        while let Some(joined) = pumps.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Subscription task failed");
            }
        }
        drop(tx);

        let lines_written = writer.await.map_err(io::Error::other)??;
        let summary = DriverSummary {
            lines_read,
            lines_written,
            subscriptions_opened: self.subscriptions_opened.load(Ordering::Relaxed),
        };
        info!(?summary, "Driver stopped");
        Ok(summary)
    }

    async fn handle_line(
        &self,
        line: &str,
        tx: &mpsc::Sender<Outgoing>,
        pumps: &mut JoinSet<()>,
    ) {
        let reply = match Command::parse(line) {
            Ok(Command::Cancel { cancel }) => self.cancel(cancel),
            Ok(Command::Request(incoming)) => self.dispatch(incoming, tx, pumps).await,
            Err(error) => {
                warn!(code = error.code, message = %error.message, "Rejected input line");
                Some(Outgoing::error(None, error))
            }
        };

        if let Some(reply) = reply {
            // The writer only stops once every sender is gone.
            let _ = tx.send(reply).await;
        }
    }

    async fn dispatch(
        &self,
        incoming: IncomingRequest,
        tx: &mpsc::Sender<Outgoing>,
        pumps: &mut JoinSet<()>,
    ) -> Option<Outgoing> {
        let IncomingRequest { id, mut request } = incoming;
        request.caller.local = self.local_callers;

        let reply = match self.dispatcher.dispatch(request).await {
            Ok(DispatchOutcome::Response(response)) => Outgoing::Response { id, response },
            Ok(DispatchOutcome::Live(live)) => self.open(id, live, tx, pumps),
            Err(err) => Outgoing::error(id, err.to_body()),
        };
        Some(reply)
    }

    fn open(
        &self,
        id: Option<Value>,
        live: LiveSubscription,
        tx: &mpsc::Sender<Outgoing>,
        pumps: &mut JoinSet<()>,
    ) -> Outgoing {
        let subscription = live.id();
        let reply = Outgoing::Subscribed {
            id,
            subscription,
            topic: live.topic().clone(),
            correlation_id: live.correlation_id(),
        };

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.live.insert(subscription, cancel_tx);
        self.subscriptions_opened.fetch_add(1, Ordering::Relaxed);
        pumps.spawn(pump(live, cancel_rx, tx.clone(), Arc::clone(&self.live)));

        reply
    }

    fn cancel(&self, subscription: SubscriberId) -> Option<Outgoing> {
        match self.live.remove(&subscription) {
            Some((_, stop)) => {
                debug!(subscription, "Cancelling subscription");
                // The pump reports completion itself.
                let _ = stop.send(());
                None
            }
            None => Some(Outgoing::error(
                None,
                ErrorBody::new(
                    codes::INVALID_PARAMS,
                    format!("no live subscription {subscription}"),
                ),
            )),
        }
    }
}

/// Forward one subscription's notifications until it is cancelled or ends.
async fn pump(
    mut live: LiveSubscription,
    mut stop: oneshot::Receiver<()>,
    tx: mpsc::Sender<Outgoing>,
    registry: Arc<DashMap<SubscriberId, oneshot::Sender<()>>>,
) {
    let subscription = live.id();

    let reason = loop {
        tokio::select! {
            _ = &mut stop => {
                live.cancel();
                break CompletionReason::Cancelled;
            }
            next = live.next() => match next {
                Some(Ok(data)) => {
                    if tx.send(Outgoing::Event { subscription, data }).await.is_err() {
                        break CompletionReason::Closed;
                    }
                }
                Some(Err(err)) => {
                    warn!(subscription, error = %err, "Subscription event failed to compose");
                    let error = err.to_body();
                    if tx.send(Outgoing::EventError { subscription, error }).await.is_err() {
                        break CompletionReason::Closed;
                    }
                }
                None => break CompletionReason::Closed,
            }
        }
    };

    registry.remove(&subscription);
    debug!(subscription, ?reason, dropped = live.dropped(), "Subscription pump finished");
    let _ = tx.send(Outgoing::Complete { subscription, reason }).await;
}

async fn write_lines<W>(mut rx: mpsc::Receiver<Outgoing>, mut output: W) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(message) = rx.recv().await {
        let mut line = message.to_line();
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
        written += 1;
    }
    output.shutdown().await?;
    Ok(written)
}
