//! Terminal command parsing.

use czk_core::{AppViewModel, Msg};

pub const HELP_TEXT: &str = "\
Commands:
  amount <czk>     set the CZK amount (no value clears it)
  select <code|#>  choose a currency by code or row number
  next | prev      move between table pages
  page <n>         jump to table page n
  rows <n>         show n rows per page (e.g. 10, 25, 100)
  refresh          fetch today's rates again
  help             show this help
  quit             exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Msg(Msg),
    Help,
    Quit,
    Invalid(String),
}

/// Turn one input line into a command, resolving references against the current view.
pub fn parse_command(line: &str, view: &AppViewModel) -> Command {
    let line = line.trim();
    let (keyword, arg) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "" => Command::Msg(Msg::NoOp),
        "amount" | "a" => Command::Msg(Msg::AmountChanged(arg.to_string())),
        "select" | "s" => select(arg, view),
        "next" | "n" => match view.page + 1 {
            page if page < view.page_count => Command::Msg(Msg::PageChanged(page)),
            _ => Command::Invalid("already on the last page".to_string()),
        },
        "prev" | "p" => match view.page.checked_sub(1) {
            Some(page) => Command::Msg(Msg::PageChanged(page)),
            None => Command::Invalid("already on the first page".to_string()),
        },
        "page" => match arg.parse::<usize>() {
            Ok(page) if (1..=view.page_count).contains(&page) => {
                Command::Msg(Msg::PageChanged(page - 1))
            }
            _ => Command::Invalid(format!("page must be between 1 and {}", view.page_count)),
        },
        "rows" => match arg.parse::<usize>() {
            Ok(rows) if rows > 0 => Command::Msg(Msg::RowsPerPageChanged(rows)),
            _ => Command::Invalid("rows must be a positive number".to_string()),
        },
        "refresh" | "r" => Command::Msg(Msg::RefreshClicked),
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command {other:?}; type help")),
    }
}

fn select(arg: &str, view: &AppViewModel) -> Command {
    if arg.is_empty() {
        return Command::Invalid("select needs a currency code or row number".to_string());
    }
    // Row numbers are shown 1-based in the table.
    if let Ok(row) = arg.parse::<usize>() {
        return match row.checked_sub(1).filter(|ordinal| *ordinal < view.options.len()) {
            Some(ordinal) => Command::Msg(Msg::CurrencySelected { ordinal }),
            None => Command::Invalid(format!("no currency in row {row}")),
        };
    }
    view.options
        .iter()
        .find(|option| option.code.eq_ignore_ascii_case(arg))
        .map(|option| {
            Command::Msg(Msg::CurrencySelected {
                ordinal: option.ordinal,
            })
        })
        .unwrap_or_else(|| Command::Invalid(format!("unknown currency {arg:?}")))
}
