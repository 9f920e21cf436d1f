//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The event sink ("message sender"): any collaborator that accepts a done record. Generalizes the
// source's broader `MatchingEngineEvent` bus down to the single contract SPEC_FULL.md §6 names,
// since the done record already carries everything a consumer needs per `process` call.
//--------------------------------------------------------------------------------------------------

use async_trait::async_trait;
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::domain::models::Done;

/// Receives one done record per accepted order, exactly once per `process` call.
#[async_trait]
pub trait DoneSink: Send + Sync {
    async fn send(&self, book: &str, done: &Done);
}

/// A sink that logs every done record through `tracing`. Useful standalone and in tests.
#[derive(Debug, Default)]
pub struct LoggingSink;

#[async_trait]
impl DoneSink for LoggingSink {
    async fn send(&self, book: &str, done: &Done) {
        debug!(
            book,
            order_id = %done.order_id,
            executed = %done.executed,
            remaining = %done.remaining,
            stored = done.stored,
            "done record emitted"
        );
    }
}

/// A sink that hands done records to a per-book FIFO (§5: release the write lock before a
/// potentially blocking send, while preserving emission order). The channel is unbounded and
/// backed by `crossbeam_channel`, matching the source's cross-thread messaging choice.
pub struct ChannelSink {
    tx: Sender<(String, Done)>,
}

impl ChannelSink {
    /// Creates a linked sink/receiver pair. The caller is responsible for draining the receiver
    /// (e.g. into a real transport, or simply dropped in tests that don't care about delivery).
    pub fn new() -> (Self, Receiver<(String, Done)>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DoneSink for ChannelSink {
    async fn send(&self, book: &str, done: &Done) {
        if self.tx.send((book.to_string(), done.clone())).is_err() {
            warn!(book, "done record receiver dropped; record discarded");
        }
    }
}

/// Builds a fresh sink for each newly created book. Constructor-injected into the registry so
/// tests can supply a mock and production can supply a real transport (§9 "injected sender
/// factory").
pub trait SinkFactory: Send + Sync {
    fn build(&self) -> Box<dyn DoneSink>;
}

/// The default factory: every book gets its own `LoggingSink`.
#[derive(Debug, Default)]
pub struct LoggingSinkFactory;

impl SinkFactory for LoggingSinkFactory {
    fn build(&self) -> Box<dyn DoneSink> {
        Box::new(LoggingSink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Decimal;
    use uuid::Uuid;

    fn sample_done() -> Done {
        Done::pending(Uuid::new_v4(), Decimal::from_i64(10), Decimal::from_i64(95))
    }

    #[tokio::test]
    async fn channel_sink_delivers_in_fifo_order() {
        let (sink, rx) = ChannelSink::new();
        let first = sample_done();
        let second = sample_done();
        let (first_id, second_id) = (first.order_id, second.order_id);

        sink.send("book-a", &first).await;
        sink.send("book-a", &second).await;

        let (_, got_first) = match rx.try_recv() {
            Ok(v) => v,
            Err(e) => panic!("expected a queued record: {:?}", e),
        };
        let (_, got_second) = match rx.try_recv() {
            Ok(v) => v,
            Err(e) => panic!("expected a queued record: {:?}", e),
        };
        assert_eq!(got_first.order_id, first_id);
        assert_eq!(got_second.order_id, second_id);
    }

    #[tokio::test]
    async fn logging_sink_never_panics_on_send() {
        let sink = LoggingSink;
        sink.send("book-a", &sample_done()).await;
    }
}
