use crate::models::Symbol;

/// Symbols the user is watching, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct WatchlistManager {
    symbols: Vec<Symbol>,
}

impl WatchlistManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add if absent, remove if present. Returns the new membership.
    pub fn toggle(&mut self, symbol: &str) -> bool {
        if let Some(idx) = self.symbols.iter().position(|s| s == symbol) {
            self.symbols.remove(idx);
            false
        } else {
            self.symbols.push(symbol.to_string());
            true
        }
    }

    pub fn is_watched(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_membership() {
        let mut watchlist = WatchlistManager::new();
        assert!(watchlist.toggle("GOOG"));
        assert!(watchlist.is_watched("GOOG"));
        assert!(!watchlist.toggle("GOOG"));
        assert!(!watchlist.is_watched("GOOG"));
        assert!(watchlist.is_empty());
    }

    #[test]
    fn test_insertion_order() {
        let mut watchlist = WatchlistManager::new();
        watchlist.toggle("TSLA");
        watchlist.toggle("GOOG");
        watchlist.toggle("NVDA");
        watchlist.toggle("GOOG");
        watchlist.toggle("GOOG");
        let order: Vec<&str> = watchlist.symbols().map(String::as_str).collect();
        assert_eq!(order, vec!["TSLA", "NVDA", "GOOG"]);
        assert_eq!(watchlist.size(), 3);
    }
}
