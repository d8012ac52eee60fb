//! Ticker universe file.

use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tickerflow_core::error::ProviderError;
use tracing::debug;

/// Load ticker symbols from the first column of a CSV file.
///
/// A `ticker`/`symbol` header row is tolerated; symbols are trimmed,
/// uppercased, and deduplicated preserving first-seen order.
pub fn load_tickers(path: &Path) -> Result<Vec<String>, ProviderError> {
    let file = std::fs::File::open(path)
        .map_err(|e| ProviderError::Universe(format!("{}: {}", path.display(), e)))?;
    let tickers = parse_tickers(file)?;
    if tickers.is_empty() {
        return Err(ProviderError::Universe(format!(
            "no tickers found in {}",
            path.display()
        )));
    }
    debug!(tickers = tickers.len(), path = %path.display(), "Loaded ticker universe");
    Ok(tickers)
}

fn parse_tickers<R: Read>(reader: R) -> Result<Vec<String>, ProviderError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for (i, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| ProviderError::Universe(e.to_string()))?;
        let Some(field) = record.get(0) else {
            continue;
        };
        let symbol = field.trim().trim_matches('"').trim().to_uppercase();
        if symbol.is_empty() {
            continue;
        }
        // Header row, if present
        if i == 0 && (symbol == "TICKER" || symbol == "SYMBOL") {
            continue;
        }
        if seen.insert(symbol.clone()) {
            tickers.push(symbol);
        }
    }

    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headerless_list() {
        let input = "aapl\nmsft\ngoog\n";
        let tickers = parse_tickers(input.as_bytes()).unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "GOOG"]);
    }

    #[test]
    fn test_parse_skips_header_row() {
        let input = "ticker\nAAPL\nMSFT\n";
        let tickers = parse_tickers(input.as_bytes()).unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_parse_first_column_only() {
        let input = "symbol,name\nAAPL,Apple Inc.\nMSFT,Microsoft\n";
        let tickers = parse_tickers(input.as_bytes()).unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_parse_dedupes_preserving_order() {
        let input = "MSFT\nAAPL\nmsft\nAAPL\n";
        let tickers = parse_tickers(input.as_bytes()).unwrap();
        assert_eq!(tickers, vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn test_parse_strips_quotes_and_blanks() {
        let input = "\"AAPL\"\n\n  MSFT  \n";
        let tickers = parse_tickers(input.as_bytes()).unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_load_missing_file_is_universe_error() {
        let err = load_tickers(Path::new("/nonexistent/tickers.csv")).unwrap_err();
        assert!(matches!(err, ProviderError::Universe(_)));
    }
}
