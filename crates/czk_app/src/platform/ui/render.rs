use std::fmt::Write;

use czk_core::{AppViewModel, RateRowView};

const ROW_NUMBER_HEADER: &str = "#";

/// Render the whole screen as text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.title);
    if let Some(date) = &view.publication_date {
        let _ = writeln!(out, "{date}");
    }
    if let Some(status) = status_line(view) {
        let _ = writeln!(out, "{status}");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "[error] {error}");
    }

    let _ = writeln!(out, "{}", conversion_line(view));
    let _ = writeln!(out, "{}", "-".repeat(40));

    if view.total_rows == 0 {
        if !view.loading {
            let _ = writeln!(out, "(no rates)");
        }
        return out;
    }

    render_table(&mut out, view);
    let _ = writeln!(
        out,
        "Page {}/{} | {} rows per page (options: {}) | {} rates",
        view.page + 1,
        view.page_count,
        view.rows_per_page,
        view.rows_per_page_options
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        view.total_rows
    );
    out
}

fn status_line(view: &AppViewModel) -> Option<String> {
    if view.loading {
        return Some(match view.loading_bytes {
            Some(bytes) => format!("[info] Loading... ({bytes} B)"),
            None => "[info] Loading...".to_string(),
        });
    }
    view.fetched_at
        .as_ref()
        .map(|fetched_at| format!("Fetched at {fetched_at}"))
}

fn conversion_line(view: &AppViewModel) -> String {
    let amount = if view.amount_invalid {
        format!("{} (not a number)", view.amount_text.trim())
    } else if view.amount_text.trim().is_empty() {
        "-".to_string()
    } else {
        view.amount_text.trim().to_string()
    };
    let currency = view.selected_code.as_deref().unwrap_or("-");
    let result = view.converted.as_deref().unwrap_or("");
    format!("CZK amount: {amount} | Currency: {currency} | = {result}")
        .trim_end()
        .to_string()
}

fn render_table(out: &mut String, view: &AppViewModel) {
    let number_width = view
        .rows
        .iter()
        .map(|row| row_number(row).len())
        .chain([ROW_NUMBER_HEADER.len()])
        .max()
        .unwrap_or(1);

    let mut widths: Vec<usize> = view.columns.iter().map(|c| c.chars().count()).collect();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = format_cells(ROW_NUMBER_HEADER, number_width, view.columns, &widths);
    let _ = writeln!(out, "{header}");
    for row in &view.rows {
        let line = format_cells(&row_number(row), number_width, row.cells(), &widths);
        let _ = writeln!(out, "{line}");
    }
}

fn row_number(row: &RateRowView) -> String {
    (row.ordinal + 1).to_string()
}

fn format_cells(number: &str, number_width: usize, cells: [&str; 5], widths: &[usize]) -> String {
    let mut line = format!("{number:>number_width$}");
    for (cell, &width) in cells.iter().zip(widths) {
        let _ = write!(line, " | {cell:<width$}");
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use czk_core::{update, AppState, Effect, Msg};

    const FEED: &str = "31 Dec 2024 #251\nCountry|Currency|Amount|Code|Rate\nEMU|euro|1|EUR|25.2\nJapan|yen|100|JPY|15.5\n";

    fn loaded() -> AppState {
        let (state, effects) = update(AppState::new(), Msg::Startup);
        let Some(Effect::FetchFeed { request_id, .. }) = effects.into_iter().next() else {
            panic!("startup should fetch");
        };
        update(
            state,
            Msg::FeedFetched {
                request_id,
                text: FEED.to_string(),
                fetched_at: Some("2024-12-31 14:35:02".to_string()),
            },
        )
        .0
    }

    #[test]
    fn loading_screen_shows_status_without_table() {
        let (state, _) = update(AppState::new(), Msg::Startup);
        let text = render(&state.view());

        assert!(text.starts_with("CZK Converter\n"));
        assert!(text.contains("[info] Loading..."));
        assert!(!text.contains("country"));
        assert!(!text.contains("(no rates)"));
    }

    #[test]
    fn loaded_screen_shows_date_table_and_pager() {
        let text = render(&loaded().view());

        assert!(text.contains("31 Dec 2024 #251\n"));
        assert!(text.contains("Fetched at 2024-12-31 14:35:02"));
        assert!(text.contains("# | country | currency | amount | code | rate"));
        assert!(text.contains("1 | EMU     | euro     | 1      | EUR  | 25.2"));
        assert!(text.contains("2 | Japan   | yen      | 100    | JPY  | 15.5"));
        assert!(text.contains("Page 1/1 | 16 rows per page (options: 10, 25, 100) | 2 rates"));
    }

    #[test]
    fn conversion_line_shows_result_with_code() {
        let (state, _) = update(loaded(), Msg::CurrencySelected { ordinal: 1 });
        let (state, _) = update(state, Msg::AmountChanged("31".to_string()));
        let text = render(&state.view());

        assert!(text.contains("CZK amount: 31 | Currency: JPY | = 200 JPY"));
    }

    #[test]
    fn invalid_amount_and_error_are_flagged() {
        let (state, _) = update(loaded(), Msg::AmountChanged("abc".to_string()));
        let (state, _) = update(state, Msg::RefreshClicked);
        let (state, _) = update(
            state,
            Msg::FeedFailed {
                request_id: 2,
                message: "timeout".to_string(),
            },
        );
        let text = render(&state.view());

        assert!(text.contains("CZK amount: abc (not a number) | Currency: - | ="));
        assert!(text.contains("[error] timeout"));
        assert!(text.contains("EMU"));
    }

    #[test]
    fn empty_feed_says_so() {
        let (state, _) = update(AppState::new(), Msg::Startup);
        let (state, _) = update(
            state,
            Msg::FeedFetched {
                request_id: 1,
                text: "31 Dec\nheader\n".to_string(),
                fetched_at: None,
            },
        );
        assert!(render(&state.view()).contains("(no rates)"));
    }
}
