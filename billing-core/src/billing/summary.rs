use crate::domain::{BilledRow, BilledTable};

/// Aggregates shown next to a billed table for one rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub billed: BilledTable,
    pub total_revenue: f64,
    /// `None` for an empty table.
    pub average_bill: Option<f64>,
    /// Index of the highest total bill; the first one wins on ties.
    pub peak_row_index: Option<usize>,
}

pub fn summarize(billed: BilledTable) -> Report {
    let total_revenue: f64 = billed.iter().map(|r| r.total_bill).sum();
    let average_bill = if billed.is_empty() {
        None
    } else {
        Some(total_revenue / billed.len() as f64)
    };
    let peak_row_index = peak_index(&billed);

    Report {
        billed,
        total_revenue,
        average_bill,
        peak_row_index,
    }
}

/// Position of the maximum `total_bill`, first occurrence on ties.
pub fn peak_index(billed: &BilledTable) -> Option<usize> {
    peak_index_by(billed, |row| Some(row.total_bill))
}

/// Position of the largest value `key` yields, first occurrence on ties.
/// Rows for which `key` is `None` are skipped.
pub fn peak_index_by<F>(billed: &BilledTable, key: F) -> Option<usize>
where
    F: Fn(&BilledRow) -> Option<f64>,
{
    let mut peak: Option<(usize, f64)> = None;
    for (idx, value) in billed.iter().enumerate().filter_map(|(idx, row)| key(row).map(|v| (idx, v))) {
        match peak {
            Some((_, best)) if value <= best => {}
            _ => peak = Some((idx, value)),
        }
    }
    peak.map(|(idx, _)| idx)
}
