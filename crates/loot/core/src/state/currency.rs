//! Currency held by loot tokens and actors.

use std::collections::BTreeMap;

/// Ordered mapping from a currency code (e.g. `"gp"`) to a non-negative
/// amount. Codes are deployment-defined strings; the engine only ever adds,
/// drains, and compares amounts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CurrencyBag(BTreeMap<String, u64>);

impl CurrencyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bag with a zero entry for each of the given codes.
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(codes.into_iter().map(|code| (code.into(), 0)).collect())
    }

    pub fn set(&mut self, code: impl Into<String>, amount: u64) {
        self.0.insert(code.into(), amount);
    }

    /// Amount held for `code`; absent codes read as zero.
    pub fn get(&self, code: &str) -> u64 {
        self.0.get(code).copied().unwrap_or(0)
    }

    /// True when no code holds a non-zero amount.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|amount| *amount == 0)
    }

    /// Adds every amount in `other` to this bag, per code.
    pub fn merge(&mut self, other: &CurrencyBag) {
        for (code, amount) in &other.0 {
            *self.0.entry(code.clone()).or_insert(0) += amount;
        }
    }

    /// Zeroes this bag in place (codes are kept) and returns the non-zero
    /// amounts that were removed.
    pub fn drain(&mut self) -> CurrencyBag {
        let mut taken = CurrencyBag::new();
        for (code, amount) in &mut self.0 {
            if *amount > 0 {
                taken.set(code.clone(), *amount);
                *amount = 0;
            }
        }
        taken
    }

    /// A bag with the same codes, all zeroed.
    pub fn zeroed(&self) -> CurrencyBag {
        Self(self.0.keys().map(|code| (code.clone(), 0)).collect())
    }

    /// Iterates over codes holding a non-zero amount.
    pub fn non_zero(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(code, amount)| (code.as_str(), *amount))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(code, amount)| (code.as_str(), *amount))
    }
}

impl FromIterator<(String, u64)> for CurrencyBag {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_additive_per_code() {
        let mut actor = CurrencyBag::new();
        actor.set("gp", 5);
        let mut found = CurrencyBag::new();
        found.set("gp", 10);
        found.set("sp", 3);

        actor.merge(&found);

        assert_eq!(actor.get("gp"), 15);
        assert_eq!(actor.get("sp"), 3);
    }

    #[test]
    fn drain_zeroes_in_place_and_returns_taken() {
        let mut bag = CurrencyBag::with_codes(["gp", "sp"]);
        bag.set("gp", 10);

        let taken = bag.drain();

        assert_eq!(taken.get("gp"), 10);
        assert_eq!(taken.non_zero().count(), 1);
        assert!(bag.is_empty());
        // Codes survive draining so the persisted layout keeps its shape.
        assert_eq!(bag.iter().count(), 2);
    }

    #[test]
    fn zeroed_bag_is_empty() {
        let mut bag = CurrencyBag::with_codes(["pp", "gp", "ep", "sp", "cp"]);
        assert!(bag.is_empty());
        assert!(bag.drain().iter().count() == 0);
    }
}
