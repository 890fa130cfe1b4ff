//! Currency symbol lookup

use super::currency::CurrencyCode;

pub trait SymbolLookup: Send + Sync {
    /// Display symbol for `code`, or `None` if unknown.
    fn symbol(&self, code: &CurrencyCode) -> Option<&'static str>;

    /// Symbol for `code`, falling back to the code itself.
    fn symbol_or_code(&self, code: &CurrencyCode) -> String {
        self.symbol(code)
            .map_or_else(|| code.to_string(), str::to_string)
    }
}

/// Small built-in table of common currencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinSymbols;

impl SymbolLookup for BuiltinSymbols {
    fn symbol(&self, code: &CurrencyCode) -> Option<&'static str> {
        let symbol = match code.as_str() {
            "AUD" | "CAD" | "HKD" | "MXN" | "NZD" | "SGD" | "USD" => "$",
            "BDT" => "৳",
            "BRL" => "R$",
            "CHF" => "CHF",
            "CNY" | "JPY" => "¥",
            "EUR" => "€",
            "GBP" => "£",
            "IDR" => "Rp",
            "ILS" => "₪",
            "INR" => "₹",
            "KRW" => "₩",
            "LKR" | "NPR" | "PKR" => "₨",
            "NGN" => "₦",
            "PHP" => "₱",
            "PLN" => "zł",
            "RUB" => "₽",
            "THB" => "฿",
            "TRY" => "₺",
            "UAH" => "₴",
            "VND" => "₫",
            "ZAR" => "R",
            _ => return None,
        };
        Some(symbol)
    }
}
