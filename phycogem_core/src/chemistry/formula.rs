//! Parsing of element-count formulas (such as "C6H12O6") and classification of exchanged
//! metabolites as organic or inorganic.
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

static ELEMENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]*)(\d*)").unwrap());

/// Map of element symbols to the number of atoms of that element
///
/// Equality ignores ordering, two counts are equal when they have the same symbols with the same
/// values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementCounts {
    counts: HashMap<String, u32>,
}

impl ElementCounts {
    pub fn new() -> Self {
        ElementCounts::default()
    }

    /// Set the count for an element, replacing any previous count
    pub fn set(&mut self, symbol: &str, count: u32) {
        self.counts.insert(symbol.to_string(), count);
    }

    pub fn get(&self, symbol: &str) -> Option<u32> {
        self.counts.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.counts.contains_key(symbol)
    }

    pub fn has_carbon(&self) -> bool {
        self.contains("C")
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(symbol, count)| (symbol.as_str(), *count))
    }
}

impl<'a> FromIterator<(&'a str, u32)> for ElementCounts {
    fn from_iter<T: IntoIterator<Item = (&'a str, u32)>>(iter: T) -> Self {
        let mut counts = ElementCounts::new();
        iter.into_iter()
            .for_each(|(symbol, count)| counts.set(symbol, count));
        counts
    }
}

impl Display for ElementCounts {
    /// Writes the counts in Hill order (C, then H, then the rest alphabetically)
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut symbols: Vec<&String> = self.counts.keys().collect();
        let rank = |symbol: &str| match symbol {
            "C" => 0,
            "H" if self.has_carbon() => 1,
            _ => 2,
        };
        symbols.sort_by(|a, b| rank(a.as_str()).cmp(&rank(b.as_str())).then_with(|| a.cmp(b)));
        for symbol in symbols {
            match self.counts[symbol] {
                1 => write!(f, "{}", symbol)?,
                n => write!(f, "{}{}", symbol, n)?,
            }
        }
        Ok(())
    }
}

/// Parse a chemical formula into counts of each element
///
/// The formula is scanned for tokens made of one uppercase letter, any lowercase letters, and
/// an optional count. A missing count means a single atom. Anything between tokens (charges,
/// dots, brackets) is skipped, so malformed formulas give a partial, possibly empty, result
/// rather than an error.
///
/// # Note
/// A symbol appearing more than once keeps only its last count, "C1C2" parses to {C: 2}.
///
/// # Examples
/// ```rust
/// use phycogem_core::chemistry::formula::parse_formula;
/// let counts = parse_formula("C6H12O6");
/// assert_eq!(counts.get("C"), Some(6));
/// assert_eq!(counts.get("H"), Some(12));
/// ```
pub fn parse_formula(formula: &str) -> ElementCounts {
    let mut counts = ElementCounts::new();
    for token in ELEMENT_TOKEN.captures_iter(formula) {
        let digits = &token[2];
        let count = if digits.is_empty() {
            1
        } else {
            // Only digits can reach here, so the only failure is overflow
            digits.parse::<u32>().unwrap_or(u32::MAX)
        };
        counts.set(&token[1], count);
    }
    counts
}

/// Check whether the counts describe exactly CO2
pub fn is_co2(counts: &ElementCounts) -> bool {
    counts.len() == 2 && counts.get("C") == Some(1) && counts.get("O") == Some(2)
}

/// Check whether the counts describe exactly bicarbonate (HCO3)
pub fn is_bicarbonate(counts: &ElementCounts) -> bool {
    counts.len() == 3
        && counts.get("C") == Some(1)
        && counts.get("H") == Some(1)
        && counts.get("O") == Some(3)
}

/// Classification of the metabolite carried by an exchange reaction
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ExchangeClass {
    /// Carbon containing, and not CO2 or bicarbonate
    Organic,
    /// No carbon, or one of CO2 and bicarbonate
    Inorganic,
    /// The metabolite has no formula
    Unknown,
}

/// Classify a (possibly missing) formula as organic or inorganic
///
/// CO2 and bicarbonate count as inorganic even though they contain carbon. A missing or empty
/// formula is [`ExchangeClass::Unknown`].
pub fn classify_exchange(formula: Option<&str>) -> ExchangeClass {
    let formula = match formula {
        Some(f) if !f.is_empty() => f,
        _ => return ExchangeClass::Unknown,
    };
    let counts = parse_formula(formula);
    if is_co2(&counts) || is_bicarbonate(&counts) || !counts.has_carbon() {
        ExchangeClass::Inorganic
    } else {
        ExchangeClass::Organic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u32)]) -> ElementCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn parse_glucose() {
        assert_eq!(parse_formula("C6H12O6"), counts(&[("C", 6), ("H", 12), ("O", 6)]));
    }

    #[test]
    fn parse_implicit_counts() {
        let co2 = parse_formula("CO2");
        assert_eq!(co2, counts(&[("C", 1), ("O", 2)]));
        assert!(is_co2(&co2));
        assert!(!is_bicarbonate(&co2));

        let hco3 = parse_formula("HCO3");
        assert_eq!(hco3, counts(&[("H", 1), ("C", 1), ("O", 3)]));
        assert!(is_bicarbonate(&hco3));
        assert!(!is_co2(&hco3));
    }

    #[test]
    fn parse_two_letter_symbols() {
        let nadp = parse_formula("C21H26N7O17P3Na2");
        assert_eq!(nadp.get("Na"), Some(2));
        assert_eq!(nadp.get("N"), Some(7));
        assert_eq!(nadp.get("P"), Some(3));
        assert_eq!(nadp.len(), 6);
    }

    #[test]
    fn repeated_symbol_overwrites() {
        // Last token wins, counts are not summed
        assert_eq!(parse_formula("C1C2"), counts(&[("C", 2)]));
        assert_eq!(parse_formula("CH3COOH").get("O"), Some(1));
    }

    #[test]
    fn malformed_formulas() {
        assert!(parse_formula("").is_empty());
        assert!(parse_formula("glucose").is_empty());
        assert!(parse_formula("1234").is_empty());
        // Charges and hydrate dots are skipped
        assert_eq!(parse_formula("Fe+2"), counts(&[("Fe", 1)]));
        let hydrate = parse_formula("CuSO4.5H2O");
        assert_eq!(hydrate.get("Cu"), Some(1));
        assert_eq!(hydrate.get("H"), Some(2));
        assert_eq!(hydrate.get("O"), Some(1));
    }

    #[test]
    fn oversized_count_saturates() {
        assert_eq!(parse_formula("C99999999999").get("C"), Some(u32::MAX));
    }

    #[test]
    fn parse_is_repeatable() {
        assert_eq!(parse_formula("C10H16N5O13P3"), parse_formula("C10H16N5O13P3"));
    }

    #[test]
    fn co2_and_bicarbonate_are_exact() {
        assert!(!is_co2(&parse_formula("C1O2H1")));
        assert!(!is_co2(&parse_formula("C2O4")));
        assert!(!is_bicarbonate(&parse_formula("HCO3Na")));
        assert!(is_bicarbonate(&parse_formula("CHO3")));
    }

    #[test]
    fn classification() {
        assert_eq!(classify_exchange(Some("O2")), ExchangeClass::Inorganic);
        assert_eq!(classify_exchange(Some("H2O")), ExchangeClass::Inorganic);
        assert_eq!(classify_exchange(Some("CO2")), ExchangeClass::Inorganic);
        assert_eq!(classify_exchange(Some("HCO3")), ExchangeClass::Inorganic);
        assert_eq!(classify_exchange(Some("C6H12O6")), ExchangeClass::Organic);
        assert_eq!(classify_exchange(Some("CH4")), ExchangeClass::Organic);
        assert_eq!(classify_exchange(Some("")), ExchangeClass::Unknown);
        assert_eq!(classify_exchange(None), ExchangeClass::Unknown);
        // Lowercase "c" is not carbon
        assert_eq!(classify_exchange(Some("co")), ExchangeClass::Inorganic);
    }

    #[test]
    fn display_hill_order() {
        assert_eq!(parse_formula("O6H12C6").to_string(), "C6H12O6");
        assert_eq!(parse_formula("O4SH2").to_string(), "H2O4S");
        assert_eq!(parse_formula("CO2").to_string(), "CO2");
    }
}
