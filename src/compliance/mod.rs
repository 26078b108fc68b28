// src/compliance/mod.rs

use crate::filter::{MUNICIPALITY_COLUMN, YEAR_COLUMN};
use crate::table::Table;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Column holding the submission month (1–12 in well-formed data).
pub const MONTH_COLUMN: &str = "Mês";

/// Months a municipality is expected to submit per year.
pub const EXPECTED_MONTHS: i64 = 12;

/// Per-municipality submission summary, recomputed per interaction and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceReport {
    pub municipality: String,
    /// Row count of the restricted table, including rows whose month or year
    /// did not parse.
    pub total_submissions: usize,
    /// Distinct parseable month values. Out-of-range values are kept as-is;
    /// the sources occasionally carry them and hiding them would mask the
    /// data problem.
    pub months_submitted: BTreeSet<i64>,
    /// `12 - |months_submitted|`; goes negative when corrupted month values
    /// push the distinct count past twelve. Deliberately not clamped.
    pub months_pending: i64,
    /// Every row whose (month, year) pair occurs two or more times.
    pub duplicates: Table,
    /// Submission count per distinct month, ascending by month.
    pub by_month_counts: Vec<(i64, u64)>,
}

/// Numeric coercion for month/year cells: trimmed text to a finite integral
/// number, anything else counts as missing. "2025.0" and "2025" coerce to
/// the same value.
fn parse_numeric(cell: &str) -> Option<i64> {
    let v: f64 = cell.trim().parse().ok()?;
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

/// Summarize the submissions of one municipality.
///
/// The municipality must be one of the table's own distinct values; there is
/// no aggregate-across-all mode. Malformed input degrades to an empty report,
/// it never fails.
pub fn analyze(table: &Table, municipality: &str) -> ComplianceReport {
    let mun_col = table.column(MUNICIPALITY_COLUMN);
    let month_col = table.column(MONTH_COLUMN);
    let year_col = table.column(YEAR_COLUMN);

    let restricted: Vec<&Vec<String>> = match mun_col {
        Some(idx) => table
            .rows
            .iter()
            .filter(|row| row.get(idx).map(String::as_str) == Some(municipality))
            .collect(),
        None => Vec::new(),
    };

    let parsed = |row: &[String]| -> (Option<i64>, Option<i64>) {
        let month = month_col.and_then(|i| row.get(i)).and_then(|c| parse_numeric(c));
        let year = year_col.and_then(|i| row.get(i)).and_then(|c| parse_numeric(c));
        (month, year)
    };

    let mut months = BTreeSet::new();
    let mut by_month: BTreeMap<i64, u64> = BTreeMap::new();
    let mut pair_counts: HashMap<(i64, i64), u64> = HashMap::new();
    for row in &restricted {
        let (month, year) = parsed(row.as_slice());
        if let Some(m) = month {
            months.insert(m);
            *by_month.entry(m).or_default() += 1;
        }
        if let (Some(m), Some(y)) = (month, year) {
            *pair_counts.entry((m, y)).or_default() += 1;
        }
    }

    let duplicate_rows: Vec<Vec<String>> = restricted
        .iter()
        .filter(|row| match parsed(row.as_slice()) {
            (Some(m), Some(y)) => pair_counts.get(&(m, y)).copied().unwrap_or(0) >= 2,
            _ => false,
        })
        .map(|row| (*row).clone())
        .collect();

    ComplianceReport {
        municipality: municipality.to_string(),
        total_submissions: restricted.len(),
        months_pending: EXPECTED_MONTHS - months.len() as i64,
        months_submitted: months,
        duplicates: Table::new(table.headers.clone(), duplicate_rows),
        by_month_counts: by_month.into_iter().collect(),
    }
}
