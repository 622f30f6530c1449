/// Median split of a low-wage-worker share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WageCategory {
    AboveMedian,
    BelowMedian,
}

impl WageCategory {
    /// Strictly greater than the median is "above"; ties and missing values are "below".
    pub fn classify(value: Option<f64>, median: Option<f64>) -> Self {
        match (value, median) {
            (Some(v), Some(m)) if v > m => WageCategory::AboveMedian,
            _ => WageCategory::BelowMedian,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WageCategory::AboveMedian => "Above Median",
            WageCategory::BelowMedian => "Below Median",
        }
    }

    /// Combined home/work label, e.g. "Above Median_Below Median".
    pub fn combined(home: Self, work: Self) -> String {
        format!("{}_{}", home.as_str(), work.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_greater_than() {
        assert_eq!(WageCategory::classify(Some(0.5), Some(0.4)), WageCategory::AboveMedian);
        assert_eq!(WageCategory::classify(Some(0.4), Some(0.4)), WageCategory::BelowMedian);
        assert_eq!(WageCategory::classify(Some(0.3), Some(0.4)), WageCategory::BelowMedian);
    }

    #[test]
    fn missing_values_are_below() {
        assert_eq!(WageCategory::classify(None, Some(0.4)), WageCategory::BelowMedian);
        assert_eq!(WageCategory::classify(Some(0.9), None), WageCategory::BelowMedian);
    }

    #[test]
    fn combined_label_is_ordered_home_then_work() {
        assert_eq!(
            WageCategory::combined(WageCategory::AboveMedian, WageCategory::BelowMedian),
            "Above Median_Below Median",
        );
    }
}
