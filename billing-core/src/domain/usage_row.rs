pub const ROOM_ID: &str = "room_id";
pub const ELECTRICITY_USAGE: &str = "electricity_usage";
pub const WATER_USAGE: &str = "water_usage";

/// Metered consumption of one room for the billing period.
///
/// `extras` holds any additional input columns as `(name, value)` pairs in
/// input order; they are carried through billing and export untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRow {
    pub room_id: String,
    pub electricity_usage: f64,
    pub water_usage: f64,
    pub extras: Vec<(String, String)>,
}

impl UsageRow {
    pub fn new(room_id: impl Into<String>, electricity_usage: f64, water_usage: f64) -> Self {
        Self {
            room_id: room_id.into(),
            electricity_usage,
            water_usage,
            extras: Vec::new(),
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageTable {
    rows: Vec<UsageRow>,
}

impl UsageTable {
    pub fn new(rows: Vec<UsageRow>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: UsageRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[UsageRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UsageRow> {
        self.rows.iter()
    }
}

impl FromIterator<UsageRow> for UsageTable {
    fn from_iter<I: IntoIterator<Item = UsageRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UsageTable {
    type Item = &'a UsageRow;
    type IntoIter = std::slice::Iter<'a, UsageRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
