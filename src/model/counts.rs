use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Signals that a quantity no longer fits in `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Overflow;

/// Total quantity of each element symbol across a span of a formula.
///
/// Quantities are always at least 1; a symbol with no atoms is simply absent.
/// Iteration is in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AtomCounts {
    counts: BTreeMap<String, u64>,
}

impl AtomCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<u64> {
        self.counts.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.counts.contains_key(symbol)
    }

    /// Number of distinct element symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.counts.iter(),
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Sum of all quantities, saturating at `u64::MAX`.
    pub fn total_atoms(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &n| acc.saturating_add(n))
    }

    pub(crate) fn checked_add(&mut self, symbol: &str, quantity: u64) -> Result<(), Overflow> {
        if quantity == 0 {
            return Ok(());
        }
        match self.counts.get_mut(symbol) {
            Some(existing) => {
                *existing = existing.checked_add(quantity).ok_or(Overflow)?;
            }
            None => {
                self.counts.insert(symbol.to_string(), quantity);
            }
        }
        Ok(())
    }

    /// Adds `child` scaled by `multiplier` into `self`.
    ///
    /// On overflow `self` may be partially updated; callers abandon the
    /// whole parse in that case.
    pub(crate) fn checked_merge_scaled(
        &mut self,
        child: AtomCounts,
        multiplier: u64,
    ) -> Result<(), Overflow> {
        for (symbol, quantity) in child.counts {
            let scaled = quantity.checked_mul(multiplier).ok_or(Overflow)?;
            match self.counts.entry(symbol) {
                btree_map::Entry::Occupied(mut slot) => {
                    let sum = slot.get().checked_add(scaled).ok_or(Overflow)?;
                    *slot.get_mut() = sum;
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(scaled);
                }
            }
        }
        Ok(())
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, u64>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(s, &n)| (s.as_str(), n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a AtomCounts {
    type Item = (&'a str, u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for AtomCounts {
    /// Sums repeated symbols and drops zero quantities. Saturates instead of
    /// overflowing.
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for (symbol, quantity) in iter {
            if quantity == 0 {
                continue;
            }
            let slot = counts.entry(symbol.into()).or_insert(0);
            *slot = slot.saturating_add(quantity);
        }
        Self { counts }
    }
}

/// Compact form: ascending symbols, unit quantities omitted (`K4N2O14S4`).
impl fmt::Display for AtomCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, quantity) in self {
            f.write_str(symbol)?;
            if quantity != 1 {
                write!(f, "{quantity}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_per_symbol() {
        let mut counts = AtomCounts::new();
        counts.checked_add("H", 2).unwrap();
        counts.checked_add("O", 1).unwrap();
        counts.checked_add("H", 3).unwrap();

        assert_eq!(counts.get("H"), Some(5));
        assert_eq!(counts.get("O"), Some(1));
        assert_eq!(counts.get("N"), None);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total_atoms(), 6);
    }

    #[test]
    fn zero_quantity_is_never_stored() {
        let mut counts = AtomCounts::new();
        counts.checked_add("C", 0).unwrap();
        assert!(counts.is_empty());
        assert!(!counts.contains("C"));
    }

    #[test]
    fn add_reports_overflow() {
        let mut counts = AtomCounts::new();
        counts.checked_add("C", u64::MAX).unwrap();
        assert_eq!(counts.checked_add("C", 1), Err(Overflow));
    }

    #[test]
    fn merge_scales_every_entry() {
        let mut parent: AtomCounts = [("O", 1u64), ("N", 1)].into_iter().collect();
        let child: AtomCounts = [("S", 1u64), ("O", 3)].into_iter().collect();

        parent.checked_merge_scaled(child, 2).unwrap();

        assert_eq!(parent.get("N"), Some(1));
        assert_eq!(parent.get("O"), Some(7));
        assert_eq!(parent.get("S"), Some(2));
    }

    #[test]
    fn merge_reports_overflow_on_scaling() {
        let mut parent = AtomCounts::new();
        let child: AtomCounts = [("H", u64::MAX / 2 + 1)].into_iter().collect();
        assert_eq!(parent.checked_merge_scaled(child, 2), Err(Overflow));
    }

    #[test]
    fn iteration_is_alphabetical() {
        let counts: AtomCounts = [("O", 14u64), ("K", 4), ("S", 4), ("N", 2)]
            .into_iter()
            .collect();
        let order: Vec<_> = counts.symbols().collect();
        assert_eq!(order, vec!["K", "N", "O", "S"]);
    }

    #[test]
    fn display_omits_unit_quantities() {
        let counts: AtomCounts = [("Mg", 1u64), ("O", 2), ("H", 2)].into_iter().collect();
        assert_eq!(counts.to_string(), "H2MgO2");
        assert_eq!(AtomCounts::new().to_string(), "");
    }

    #[test]
    fn from_iter_sums_duplicates_and_skips_zero() {
        let counts: AtomCounts = [("C", 1u64), ("H", 0), ("C", 2)].into_iter().collect();
        assert_eq!(counts.get("C"), Some(3));
        assert!(!counts.contains("H"));
    }

    #[test]
    fn serializes_as_flat_table() {
        let counts: AtomCounts = [("H", 2u64), ("O", 1)].into_iter().collect();
        let text = toml::to_string(&counts).unwrap();
        assert_eq!(text, "H = 2\nO = 1\n");
    }
}
