//! Event loop driving a [`Converter`].
//!
//! User events are applied synchronously by the owner of the session. Rate
//! requests and the swap timer run as spawned tasks and post their completion
//! back through a channel, so every state change happens on the owning task.

use super::converter::{Converter, FetchTicket, Settlement, SpinToken};
use super::currency::{CurrencyCode, PairQuote, PairRateProvider};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info_span};

/// How long the swap animation runs.
pub const SPIN_DURATION: Duration = Duration::from_millis(500);

/// Input from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    AmountChanged(String),
    SourceChanged(CurrencyCode),
    TargetChanged(CurrencyCode),
    Swap,
}

/// Work posted back to the session by spawned tasks.
#[derive(Debug)]
pub enum Completion {
    Fetched {
        ticket: FetchTicket,
        result: Result<PairQuote>,
    },
    SpinElapsed(SpinToken),
}

/// Result of applying one [`Completion`].
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Fetch(Settlement),
    SpinStopped,
}

pub struct Session {
    converter: Converter,
    provider: Arc<dyn PairRateProvider>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    spin_duration: Duration,
}

impl Session {
    pub fn new(converter: Converter, provider: Arc<dyn PairRateProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            converter,
            provider,
            tx,
            rx,
            spin_duration: SPIN_DURATION,
        }
    }

    pub fn state(&self) -> &Converter {
        &self.converter
    }

    /// True when no request is outstanding and no animation is running.
    pub fn is_idle(&self) -> bool {
        !self.converter.is_loading() && !self.converter.is_spinning()
    }

    /// Applies a user event, spawning whatever work it requires.
    pub fn dispatch(&mut self, event: Event) {
        debug!(?event, "Dispatching event");
        let ticket = match event {
            Event::AmountChanged(raw) => self.converter.change_amount(&raw),
            Event::SourceChanged(code) => self.converter.change_source(code),
            Event::TargetChanged(code) => self.converter.change_target(code),
            Event::Swap => {
                let (token, ticket) = self.converter.swap();
                self.start_spin_timer(token);
                ticket
            }
        };

        if let Some(ticket) = ticket {
            self.start_fetch(ticket);
        }
    }

    /// Waits for the next spawned task to finish and applies its outcome.
    ///
    /// Cancel safe: nothing is lost if the returned future is dropped.
    pub async fn step(&mut self) -> Option<Applied> {
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    pub fn apply(&mut self, completion: Completion) -> Applied {
        match completion {
            Completion::Fetched { ticket, result } => {
                Applied::Fetch(self.converter.settle(&ticket, result))
            }
            Completion::SpinElapsed(token) => {
                self.converter.stop_spin(token);
                Applied::SpinStopped
            }
        }
    }

    /// Processes completions until the session is idle.
    pub async fn settle(&mut self) {
        while !self.is_idle() {
            if self.step().await.is_none() {
                break;
            }
        }
    }

    fn start_fetch(&self, ticket: FetchTicket) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let span = info_span!("PairFetch", seq = ticket.seq());
        tokio::spawn(
            async move {
                let result = provider
                    .fetch_pair(&ticket.from, &ticket.to, &ticket.amount)
                    .await;
                // The receiver lives as long as the session; a send error means it is gone.
                let _ = tx.send(Completion::Fetched { ticket, result });
            }
            .instrument(span),
        );
    }

    fn start_spin_timer(&self, token: SpinToken) {
        let tx = self.tx.clone();
        let duration = self.spin_duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tx.send(Completion::SpinElapsed(token));
        });
    }
}
