//! Text and JSON output helpers.

use anyhow::Result;
use serde::Serialize;
use time::OffsetDateTime;

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a padded column table with a header row.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    println!("{}", line(&header_cells).trim_end());
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for row in rows {
        println!("{}", line(row).trim_end());
    }
}

/// Date portion of a timestamp, ISO formatted.
pub fn format_date(date: OffsetDateTime) -> String {
    date.date().to_string()
}

/// Money formatting, two decimals.
pub fn format_money(amount: f64) -> String {
    format!("{amount:.2} €")
}

/// Optional text field for table cells.
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn date_formatting_is_iso() {
        assert_eq!(format_date(datetime!(2024-03-15 10:30 UTC)), "2024-03-15");
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money(74.361), "74.36 €");
        assert_eq!(format_money(5.0), "5.00 €");
    }

    #[test]
    fn missing_optionals_render_as_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("Total")), "Total");
    }
}
