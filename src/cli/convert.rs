use super::ui;
use crate::core::amount::AmountInput;
use crate::core::{Event, Session, SymbolLookup};
use anyhow::{Result, bail};
use tracing::debug;

/// Converts a single amount and prints the result panel.
pub async fn run(mut session: Session, amount: &str, symbols: &dyn SymbolLookup) -> Result<()> {
    if AmountInput::parse(amount).is_none() {
        bail!("Invalid amount: {amount}. Expected a whole, non-negative number");
    }

    session.dispatch(Event::AmountChanged(amount.to_string()));

    let pb = ui::new_spinner("fetching rate");
    session.settle().await;
    pb.finish_and_clear();

    let state = session.state();
    debug!(converted = %state.converted_amount(), rate = ?state.rate(), "Conversion settled");

    let lines = ui::PanelLines::from_state(state, symbols);
    println!("{}", ui::render_panel(&lines));
    if state.rate().is_none() {
        println!(
            "{}",
            ui::style_text(
                "No rate available. Run with --verbose for details.",
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}
