//! Core conversion logic and abstractions

pub mod amount;
pub mod config;
pub mod converter;
pub mod currency;
pub mod log;
pub mod session;
pub mod symbols;

// Re-export main types for cleaner imports
pub use converter::{Converter, Settlement};
pub use currency::{ApiCredential, CurrencyCode, PairQuote, PairRateProvider};
pub use session::{Event, Session};
pub use symbols::{BuiltinSymbols, SymbolLookup};
