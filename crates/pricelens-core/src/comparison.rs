//! Price comparison for matched pairs.

use serde::Serialize;

use crate::matcher::MatchedPair;

/// Which side of a pair is the better deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LeftCheaper,
    RightCheaper,
    SamePrice,
}

/// Price difference between the two sides of a [`MatchedPair`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceComparison {
    pub verdict: Verdict,
    /// Absolute price difference; `0` for equal prices.
    pub savings: f64,
    /// `savings` as a percentage of the higher price; `0` if that price is `0`.
    pub percent_less: f64,
}

/// Compare the prices of `pair`.
pub fn compare_prices(pair: &MatchedPair) -> PriceComparison {
    let left = pair.left().price;
    let right = pair.right().price;
    let verdict = if left < right {
        Verdict::LeftCheaper
    } else if right < left {
        Verdict::RightCheaper
    } else {
        Verdict::SamePrice
    };
    let higher = left.max(right);
    let savings = (left - right).abs();
    let percent_less = if higher > 0.0 {
        savings / higher * 100.0
    } else {
        0.0
    };
    PriceComparison {
        verdict,
        savings,
        percent_less,
    }
}

/// A matched pair with its price comparison, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    #[serde(flatten)]
    pub pair: MatchedPair,
    pub comparison: PriceComparison,
}

/// Attach a [`PriceComparison`] to every pair, keeping order.
pub fn comparison_rows(pairs: Vec<MatchedPair>) -> Vec<ComparisonRow> {
    pairs
        .into_iter()
        .map(|pair| {
            let comparison = compare_prices(&pair);
            ComparisonRow { pair, comparison }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalRecord;
    use crate::matcher::match_records;

    fn pair(left_price: f64, right_price: f64) -> MatchedPair {
        let left = [CanonicalRecord::new("wireless mouse", left_price)];
        let right = [CanonicalRecord::new("wireless mouse", right_price)];
        match_records(&left, &right).remove(0)
    }

    #[test]
    fn test_left_cheaper() {
        let cmp = compare_prices(&pair(800.0, 1000.0));
        assert_eq!(cmp.verdict, Verdict::LeftCheaper);
        assert_eq!(cmp.savings, 200.0);
        assert_eq!(cmp.percent_less, 20.0);
    }

    #[test]
    fn test_right_cheaper() {
        let cmp = compare_prices(&pair(500.0, 400.0));
        assert_eq!(cmp.verdict, Verdict::RightCheaper);
        assert_eq!(cmp.savings, 100.0);
        assert_eq!(cmp.percent_less, 20.0);
    }

    #[test]
    fn test_same_price_and_zero_prices() {
        let cmp = compare_prices(&pair(0.0, 0.0));
        assert_eq!(cmp.verdict, Verdict::SamePrice);
        assert_eq!(cmp.savings, 0.0);
        assert_eq!(cmp.percent_less, 0.0);
    }

    #[test]
    fn test_rows_keep_pair_order_and_serialize_flat() {
        let rows = comparison_rows(vec![pair(1.0, 2.0), pair(3.0, 3.0)]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].comparison.verdict, Verdict::SamePrice);
        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(value["similarityScore"], 1.0);
        assert_eq!(value["comparison"]["verdict"], "left_cheaper");
    }
}
