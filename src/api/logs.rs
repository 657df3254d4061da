//! Interpretation of strategy log lines.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("BUY") {
            Some(TradeSide::Buy)
        } else if token.eq_ignore_ascii_case("SELL") {
            Some(TradeSide::Sell)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

/// A trade log line in the form `... BUY BTCUSDT qty 0.01 ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLogEntry {
    pub side: TradeSide,
    pub pair: String,
    /// Kept as text to show exactly what the bot logged
    pub qty: String,
}

/// Finds the first `<BUY|SELL> <pair> qty <number>` run in `line`, case-insensitively.
pub fn parse_trade_log(line: &str) -> Option<TradeLogEntry> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.windows(4).find_map(|w| {
        let side = TradeSide::parse(w[0])?;
        let pair = w[1];
        if pair.is_empty() || !pair.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        if !w[2].eq_ignore_ascii_case("qty") {
            return None;
        }
        let qty: String = w[3]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if qty.is_empty() {
            return None;
        }
        Some(TradeLogEntry {
            side,
            pair: pair.to_string(),
            qty,
        })
    })
}

/// Highlight class of a detail log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Confirmed,
    Error,
    Started,
    Plain,
}

/// `CONFIRMED` wins over `ERROR`, which wins over `started`. Matching is case-sensitive.
pub fn classify_detail(line: &str) -> DetailKind {
    if line.contains("CONFIRMED") {
        DetailKind::Confirmed
    } else if line.contains("ERROR") {
        DetailKind::Error
    } else if line.contains("started") {
        DetailKind::Started
    } else {
        DetailKind::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trade_line_anywhere_in_text() {
        let entry = parse_trade_log("2024-05-01 12:00 buy BTCUSDT QTY 0.015 at market").unwrap();
        assert_eq!(entry.side, TradeSide::Buy);
        assert_eq!(entry.pair, "BTCUSDT");
        assert_eq!(entry.qty, "0.015");
    }

    #[test]
    fn trailing_punctuation_is_not_part_of_qty() {
        let entry = parse_trade_log("SELL ETHUSDT qty 1.5,").unwrap();
        assert_eq!(entry.side, TradeSide::Sell);
        assert_eq!(entry.qty, "1.5");
    }

    #[test]
    fn lines_without_pattern_are_not_trades() {
        assert_eq!(parse_trade_log("Strategy started"), None);
        assert_eq!(parse_trade_log("BUY BTCUSDT amount 5"), None);
        assert_eq!(parse_trade_log("BUY BTC/USDT qty 5"), None);
        assert_eq!(parse_trade_log("SELL XRPUSDT qty abc"), None);
    }

    #[test]
    fn detail_lines_are_classified() {
        assert_eq!(classify_detail("Order CONFIRMED 123"), DetailKind::Confirmed);
        assert_eq!(classify_detail("ERROR insufficient balance"), DetailKind::Error);
        assert_eq!(classify_detail("Strategy started"), DetailKind::Started);
        assert_eq!(classify_detail("heartbeat"), DetailKind::Plain);
        assert_eq!(classify_detail("error lowercase"), DetailKind::Plain);
    }
}
