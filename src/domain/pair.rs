use serde::{Deserialize, Serialize};

/// A spot trading pair in exchange form, e.g. `BTCUSDT`.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct Pair {
    pub symbol: String,
}

impl Pair {
    /// Accepts `BTCUSDT`, `btcusdt` or the slashed display form `BTC/USDT`.
    pub fn new(text: &str) -> Self {
        Self {
            symbol: text.replace('/', "").trim().to_uppercase(),
        }
    }

    pub fn get_base(text: &str) -> Option<&str> {
        let quote = Self::get_quote(text)?;
        // If get_quote returned Some(quote), strip_suffix can still return None
        // if the quote is not at the end (e.g., malformed pair name).
        text.strip_suffix(quote).filter(|base| !base.is_empty())
    }

    // Finds the trading quote at the end of the pair name and returns it.
    // Returns None if no matching quote is found.
    pub fn get_quote(text: &str) -> Option<&str> {
        static PAIR_QUOTES: &[&str] = &["USDT", "USDC", "FDUSD", "BTC", "ETH"];
        PAIR_QUOTES
            .iter()
            .find(|&&ext| text.ends_with(ext))
            .copied()
    }

    /// Base asset, or the whole symbol when no known quote matches.
    pub fn base(&self) -> &str {
        Self::get_base(&self.symbol).unwrap_or(&self.symbol)
    }

    /// `BTC/USDT` style label used on buttons.
    pub fn display(&self) -> String {
        match (Self::get_base(&self.symbol), Self::get_quote(&self.symbol)) {
            (Some(base), Some(quote)) => format!("{}/{}", base, quote),
            _ => self.symbol.clone(),
        }
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_slashed_and_lowercase_input() {
        assert_eq!(Pair::new("btc/usdt").symbol, "BTCUSDT");
        assert_eq!(Pair::new("ETHUSDT").display(), "ETH/USDT");
    }

    #[test]
    fn base_falls_back_to_symbol() {
        assert_eq!(Pair::new("XRPUSDT").base(), "XRP");
        assert_eq!(Pair::new("FOO").base(), "FOO");
        assert_eq!(Pair::new("USDT").base(), "USDT");
    }
}
