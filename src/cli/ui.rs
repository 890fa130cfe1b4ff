use crate::core::{Converter, SymbolLookup};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Text of the result panel, before styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLines {
    pub header: String,
    pub converted: String,
    pub rate: Option<String>,
    pub updated: Option<String>,
}

impl PanelLines {
    pub fn from_state(state: &Converter, symbols: &dyn SymbolLookup) -> Self {
        let from_symbol = symbols.symbol_or_code(state.source());
        let to_symbol = symbols.symbol_or_code(state.target());

        PanelLines {
            header: format!("{} {} =", from_symbol, state.amount()),
            converted: state.converted_amount().to_string(),
            rate: state
                .rate()
                .map(|rate| format!("1 {from_symbol} = {rate:.3} {to_symbol}")),
            updated: state
                .last_updated()
                .map(|ts| format!("Rates updated {}", ts.format("%Y-%m-%d %H:%M UTC"))),
        }
    }
}

/// Label shown next to the amount prompt, e.g. `AUD ($)`.
pub fn amount_label(state: &Converter, symbols: &dyn SymbolLookup) -> String {
    format!(
        "{} ({})",
        state.source(),
        symbols.symbol_or_code(state.source())
    )
}

/// Renders the result panel as a single-column table.
pub fn render_panel(lines: &PanelLines) -> Table {
    let mut table = new_styled_table();
    table.add_row(vec![Cell::new(&lines.header)]);
    table.add_row(vec![
        Cell::new(&lines.converted)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    if let Some(rate) = &lines.rate {
        table.add_row(vec![Cell::new(rate)]);
    }
    if let Some(updated) = &lines.updated {
        table.add_row(vec![Cell::new(updated).fg(Color::DarkGrey)]);
    }
    table
}

/// Spinner reflecting outstanding requests and the swap animation.
#[derive(Default)]
pub struct ActivityIndicator {
    bar: Option<ProgressBar>,
}

impl ActivityIndicator {
    pub fn sync(&mut self, state: &Converter) {
        let message = match (state.is_loading(), state.is_spinning()) {
            (true, true) => Some("swapping, fetching rate"),
            (true, false) => Some("fetching rate"),
            (false, true) => Some("swapping"),
            (false, false) => None,
        };

        match (message, self.bar.take()) {
            (Some(message), Some(bar)) => {
                bar.set_message(message);
                self.bar = Some(bar);
            }
            (Some(message), None) => self.bar = Some(new_spinner(message)),
            (None, Some(bar)) => bar.finish_and_clear(),
            (None, None) => {}
        }
    }
}

/// Creates a new `indicatif::ProgressBar` spinner with standard styling.
pub fn new_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuiltinSymbols, PairQuote};
    use chrono::{TimeZone, Utc};

    fn converter() -> Converter {
        Converter::new("AUD".parse().unwrap(), "NPR".parse().unwrap())
    }

    #[test]
    fn test_panel_before_first_conversion() {
        let state = converter();
        let lines = PanelLines::from_state(&state, &BuiltinSymbols);
        assert_eq!(lines.header, "$  =");
        assert_eq!(lines.converted, "");
        assert!(lines.rate.is_none());
        assert!(lines.updated.is_none());
        assert_eq!(amount_label(&state, &BuiltinSymbols), "AUD ($)");
    }

    #[test]
    fn test_panel_after_conversion() {
        let mut state = converter();
        let ticket = state.change_amount("100").unwrap();
        state.settle(
            &ticket,
            Ok(PairQuote {
                conversion_rate: Some(84.1234),
                time_last_update: Utc.timestamp_opt(1585267200, 0).single(),
                ..Default::default()
            }),
        );

        let lines = PanelLines::from_state(&state, &BuiltinSymbols);
        assert_eq!(lines.header, "$ 100 =");
        assert_eq!(lines.converted, "8412.34 NPR");
        assert_eq!(lines.rate.as_deref(), Some("1 $ = 84.123 ₨"));
        assert_eq!(
            lines.updated.as_deref(),
            Some("Rates updated 2020-03-27 00:00 UTC")
        );

        let rendered = render_panel(&lines).to_string();
        assert!(rendered.contains("8412.34 NPR"));
        assert!(rendered.contains("84.123"));
    }
}
