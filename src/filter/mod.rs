// src/filter/mod.rs

use crate::table::Table;

/// Column holding the municipality a submission belongs to.
pub const MUNICIPALITY_COLUMN: &str = "MUNICÍPIO";
/// Column holding the submission year.
pub const YEAR_COLUMN: &str = "Ano";

/// Sentinel label offered by the selectors meaning "no constraint".
pub const ALL: &str = "All";

/// One selector position: unconstrained, or a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Value(String),
}

impl Selection {
    /// Map a selector label to a criterion; the `"All"` sentinel means
    /// pass-through.
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Selection::All
        } else {
            Selection::Value(label.to_string())
        }
    }

    fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Value(v) => Some(v),
        }
    }
}

/// The user's current filter state. Both criteria default to pass-through.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub municipality: Selection,
    pub year: Selection,
}

/// Retain the rows matching every supplied criterion.
///
/// Matching is exact string equality, case- and whitespace-sensitive: the
/// sources never normalize, so the selector values come from the table
/// itself (`Table::distinct_values`) and already agree byte-for-byte.
/// A criterion whose column is absent from the table is silently skipped.
pub fn filter(table: &Table, criteria: &FilterCriteria) -> Table {
    let checks: Vec<(usize, &str)> = [
        (MUNICIPALITY_COLUMN, &criteria.municipality),
        (YEAR_COLUMN, &criteria.year),
    ]
    .into_iter()
    .filter_map(|(column, selection)| {
        let wanted = selection.value()?;
        let idx = table.column(column)?;
        Some((idx, wanted))
    })
    .collect();

    if checks.is_empty() {
        return table.clone();
    }

    let rows = table
        .rows
        .iter()
        .filter(|row| {
            checks
                .iter()
                .all(|&(idx, wanted)| row.get(idx).map(String::as_str) == Some(wanted))
        })
        .cloned()
        .collect();
    Table::new(table.headers.clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["MUNICÍPIO".into(), "Ano".into(), "Mês".into()],
            vec![
                vec!["Caxias".into(), "2025".into(), "1".into()],
                vec!["Bacabal".into(), "2025".into(), "2".into()],
                vec!["Caxias".into(), "2024".into(), "3".into()],
            ],
        )
    }

    fn criteria(municipality: &str, year: &str) -> FilterCriteria {
        FilterCriteria {
            municipality: Selection::from_label(municipality),
            year: Selection::from_label(year),
        }
    }

    #[test]
    fn all_sentinel_is_a_pass_through() {
        let t = sample();
        assert_eq!(filter(&t, &criteria(ALL, ALL)), t);
    }

    #[test]
    fn criteria_are_conjunctive() {
        let t = sample();
        let filtered = filter(&t, &criteria("Caxias", "2025"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.cell(0, 2), "1");
    }

    #[test]
    fn single_criterion_applies_alone() {
        let filtered = filter(&sample(), &criteria("Caxias", ALL));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn matching_is_exact() {
        // no case folding, no trimming
        assert!(filter(&sample(), &criteria("caxias", ALL)).is_empty());
        assert!(filter(&sample(), &criteria("Caxias ", ALL)).is_empty());
    }

    #[test]
    fn absent_column_is_skipped_not_an_error() {
        let t = Table::new(
            vec!["Ano".into()],
            vec![vec!["2025".into()], vec!["2024".into()]],
        );
        let filtered = filter(&t, &criteria("Caxias", "2025"));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn filtering_is_idempotent() {
        let c = criteria("Caxias", ALL);
        let once = filter(&sample(), &c);
        let twice = filter(&once, &c);
        assert_eq!(once, twice);
    }
}
