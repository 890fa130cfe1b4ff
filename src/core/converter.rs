//! Conversion state and its transitions.
//!
//! [`Converter`] owns every piece of session state and is mutated only by the
//! transition methods below. Transitions that require a rate lookup hand back a
//! [`FetchTicket`]; the caller performs the request and reports the outcome
//! through [`Converter::settle`]. Each ticket carries a sequence number so that
//! responses arriving after a newer request has been issued are discarded.

use super::amount::{self, AmountInput};
use super::currency::{CurrencyCode, PairQuote};
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

/// A rate lookup the caller must perform on behalf of the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: AmountInput,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Identifies one swap animation; only the newest token clears the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinToken(u64);

/// What happened when a fetch settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// The result panel was updated.
    Converted { converted_amount: String, rate: f64 },
    /// A newer request was issued before this one settled.
    Stale,
    /// The response was well formed but had no usable rate.
    MissingRate,
    /// The request or its decoding failed.
    Failed,
}

#[derive(Debug, Clone)]
pub struct Converter {
    amount: AmountInput,
    source: CurrencyCode,
    target: CurrencyCode,
    converted_amount: String,
    rate: Option<f64>,
    last_updated: Option<DateTime<Utc>>,
    in_flight: usize,
    issued_seq: u64,
    spinning: bool,
    spin_seq: u64,
}

impl Converter {
    pub fn new(source: CurrencyCode, target: CurrencyCode) -> Self {
        Self {
            amount: AmountInput::default(),
            source,
            target,
            converted_amount: String::new(),
            rate: None,
            last_updated: None,
            in_flight: 0,
            issued_seq: 0,
            spinning: false,
            spin_seq: 0,
        }
    }

    pub fn amount(&self) -> &AmountInput {
        &self.amount
    }

    pub fn source(&self) -> &CurrencyCode {
        &self.source
    }

    pub fn target(&self) -> &CurrencyCode {
        &self.target
    }

    /// `"<value> <target>"` of the latest accepted conversion, empty before any.
    pub fn converted_amount(&self) -> &str {
        &self.converted_amount
    }

    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Applies new amount text. Rejected input leaves all state untouched.
    pub fn change_amount(&mut self, raw: &str) -> Option<FetchTicket> {
        let Some(amount) = AmountInput::parse(raw) else {
            debug!(input = %raw, "Rejected non-numeric amount");
            return None;
        };
        self.amount = amount;
        Some(self.issue())
    }

    pub fn change_source(&mut self, code: CurrencyCode) -> Option<FetchTicket> {
        if code == self.source {
            return None;
        }
        self.source = code;
        self.pair_changed()
    }

    pub fn change_target(&mut self, code: CurrencyCode) -> Option<FetchTicket> {
        if code == self.target {
            return None;
        }
        self.target = code;
        self.pair_changed()
    }

    /// Exchanges source and target and starts the swap animation.
    pub fn swap(&mut self) -> (SpinToken, Option<FetchTicket>) {
        std::mem::swap(&mut self.source, &mut self.target);
        self.spinning = true;
        self.spin_seq += 1;
        let token = SpinToken(self.spin_seq);

        // Swapping two equal codes leaves the pair as it was.
        let ticket = if self.source == self.target {
            None
        } else {
            self.pair_changed()
        };
        (token, ticket)
    }

    /// Ends the swap animation if `token` belongs to the latest swap.
    pub fn stop_spin(&mut self, token: SpinToken) {
        if token.0 == self.spin_seq {
            self.spinning = false;
        }
    }

    /// Records the outcome of the request described by `ticket`.
    pub fn settle(&mut self, ticket: &FetchTicket, result: Result<PairQuote>) -> Settlement {
        self.in_flight = self.in_flight.saturating_sub(1);

        let quote = match result {
            Ok(quote) => quote,
            Err(e) => {
                error!(error = ?e, from = %ticket.from, to = %ticket.to, "Error fetching conversion rate");
                return Settlement::Failed;
            }
        };

        if ticket.seq < self.issued_seq {
            debug!(
                seq = ticket.seq,
                latest = self.issued_seq,
                "Discarding response superseded by a newer request"
            );
            return Settlement::Stale;
        }

        let Some(rate) = quote.usable_rate() else {
            warn!(
                error_type = ?quote.error_type,
                from = %ticket.from,
                to = %ticket.to,
                "Invalid response from the rate provider"
            );
            return Settlement::MissingRate;
        };

        let converted = amount::convert(rate, &ticket.amount);
        self.converted_amount = amount::format_converted(converted, &ticket.to);
        self.rate = Some(rate);
        if quote.time_last_update.is_some() {
            self.last_updated = quote.time_last_update;
        }
        debug!(converted = %self.converted_amount, rate, "Conversion updated");

        Settlement::Converted {
            converted_amount: self.converted_amount.clone(),
            rate,
        }
    }

    fn pair_changed(&mut self) -> Option<FetchTicket> {
        if self.amount.is_positive() {
            Some(self.issue())
        } else {
            None
        }
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.in_flight += 1;
        FetchTicket {
            seq: self.issued_seq,
            from: self.source.clone(),
            to: self.target.clone(),
            amount: self.amount.clone(),
        }
    }
}
