use super::UsageRow;

pub const ELECTRICITY_COST: &str = "Electricity Cost";
pub const WATER_COST: &str = "Water Cost";
pub const TOTAL_BILL: &str = "Total Bill";

/// A `UsageRow` with its costs applied. Built only by the billing engine or
/// by reading an exported report back.
#[derive(Debug, Clone, PartialEq)]
pub struct BilledRow {
    pub usage: UsageRow,
    pub electricity_cost: f64,
    pub water_cost: f64,
    pub total_bill: f64,
}

impl BilledRow {
    pub fn room_id(&self) -> &str {
        &self.usage.room_id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BilledTable {
    rows: Vec<BilledRow>,
}

impl BilledTable {
    pub fn rows(&self) -> &[BilledRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BilledRow> {
        self.rows.iter()
    }

    /// Names of the extra input columns, taken from the first row.
    pub fn extra_columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|r| r.usage.extras.iter().map(|(name, _)| name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn total_bills(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.total_bill).collect()
    }
}

impl FromIterator<BilledRow> for BilledTable {
    fn from_iter<I: IntoIterator<Item = BilledRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BilledTable {
    type Item = &'a BilledRow;
    type IntoIter = std::slice::Iter<'a, BilledRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
