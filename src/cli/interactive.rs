use super::ui;
use crate::core::session::Applied;
use crate::core::{CurrencyCode, Event, Session, Settlement, SymbolLookup};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
<digits>      set the amount (an empty line clears it)
from <CODE>   choose the source currency
to <CODE>     choose the target currency
swap          exchange source and target
show          print the result panel
help          show this message
quit          leave";

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Amount(String),
    From(CurrencyCode),
    To(CurrencyCode),
    Swap,
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(Command::Amount(String::new()));
    };

    let command = match first.to_ascii_lowercase().as_str() {
        "from" | "to" => {
            let code: CurrencyCode = words
                .next()
                .ok_or_else(|| anyhow!("Usage: {first} <CODE>"))?
                .parse()?;
            if first.eq_ignore_ascii_case("from") {
                Command::From(code)
            } else {
                Command::To(code)
            }
        }
        "swap" | "s" => Command::Swap,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        // Anything else is amount text; the converter decides whether it is valid.
        _ if !first.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            Command::Amount(line.to_string())
        }
        _ => return Err(anyhow!("Unknown command: {first}. Type `help` for commands")),
    };
    Ok(command)
}

fn print_panel(session: &Session, symbols: &dyn SymbolLookup) {
    let lines = ui::PanelLines::from_state(session.state(), symbols);
    println!("{}", ui::render_panel(&lines));
}

fn print_prompt(session: &Session, symbols: &dyn SymbolLookup) -> Result<()> {
    print!("{} > ", ui::amount_label(session.state(), symbols));
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Runs the converter against stdin until `quit` or end of input.
pub async fn run(mut session: Session, symbols: &dyn SymbolLookup) -> Result<()> {
    println!(
        "{}",
        ui::style_text("CURRENCY CONVERTER", ui::StyleType::Title)
    );
    println!("{}", ui::style_text(HELP, ui::StyleType::Subtle));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut indicator = ui::ActivityIndicator::default();
    print_prompt(&session, symbols)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Show) => print_panel(&session, symbols),
                    Ok(Command::Amount(raw)) => session.dispatch(Event::AmountChanged(raw)),
                    Ok(Command::From(code)) => session.dispatch(Event::SourceChanged(code)),
                    Ok(Command::To(code)) => session.dispatch(Event::TargetChanged(code)),
                    Ok(Command::Swap) => {
                        session.dispatch(Event::Swap);
                        print_panel(&session, symbols);
                    }
                    Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                }
                indicator.sync(session.state());
                print_prompt(&session, symbols)?;
            }
            Some(applied) = session.step() => {
                debug!(?applied, "Applied completion");
                indicator.sync(session.state());
                if let Applied::Fetch(Settlement::Converted { .. }) = applied {
                    println!();
                    print_panel(&session, symbols);
                    print_prompt(&session, symbols)?;
                }
            }
        }
    }

    indicator.sync(session.state());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("100").unwrap(),
            Command::Amount("100".to_string())
        );
        assert_eq!(parse_command("  ").unwrap(), Command::Amount(String::new()));
        assert_eq!(
            parse_command("1.5").unwrap(),
            Command::Amount("1.5".to_string())
        );
        assert_eq!(
            parse_command("from eur").unwrap(),
            Command::From("EUR".parse().unwrap())
        );
        assert_eq!(
            parse_command("TO usd").unwrap(),
            Command::To("USD".parse().unwrap())
        );
        assert_eq!(parse_command("swap").unwrap(), Command::Swap);
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
        assert_eq!(parse_command("?").unwrap(), Command::Help);
        assert_eq!(parse_command("show").unwrap(), Command::Show);
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("from").is_err());
        assert!(parse_command("to EURO").is_err());
        assert!(
            parse_command("convert")
                .unwrap_err()
                .to_string()
                .contains("Unknown command")
        );
    }
}
