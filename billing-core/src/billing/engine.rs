use crate::domain::{BilledRow, BilledTable, Tariff, UsageRow, UsageTable};
use crate::domain::{ELECTRICITY_COST, TOTAL_BILL, WATER_COST};

/// Applies `tariff` to every row of `table`, preserving input order.
///
/// No rounding happens here; costs are plain f64 products. Extra columns that
/// share a name with a derived cost column are replaced by the derived value.
pub fn compute_bills(table: &UsageTable, tariff: &Tariff) -> BilledTable {
    table.iter().map(|row| bill_row(row, tariff)).collect()
}

fn bill_row(row: &UsageRow, tariff: &Tariff) -> BilledRow {
    let electricity_cost = row.electricity_usage * tariff.electricity_rate;
    let water_cost = row.water_usage * tariff.water_rate;
    let total_bill = electricity_cost + water_cost + tariff.wifi_fee;

    let mut usage = row.clone();
    usage
        .extras
        .retain(|(name, _)| ![ELECTRICITY_COST, WATER_COST, TOTAL_BILL].contains(&name.as_str()));

    BilledRow {
        usage,
        electricity_cost,
        water_cost,
        total_bill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn three_rooms() -> UsageTable {
        UsageTable::new(vec![
            UsageRow::new("A", 100.0, 50.0),
            UsageRow::new("B", 0.0, 0.0),
            UsageRow::new("C", 200.0, 100.0),
        ])
    }

    #[test]
    fn single_room_with_default_tariff() {
        let table = UsageTable::new(vec![UsageRow::new("101", 10.0, 5.0)]);
        let billed = compute_bills(&table, &Tariff::default());

        let row = &billed.rows()[0];
        assert_eq!(row.room_id(), "101");
        assert_close(row.electricity_cost, 85.30);
        assert_close(row.water_cost, 60.0);
        assert_close(row.total_bill, 645.30);
    }

    #[test]
    fn three_rooms_keep_input_order() {
        let billed = compute_bills(&three_rooms(), &Tariff::default());

        let ids: Vec<&str> = billed.iter().map(|r| r.room_id()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
        assert_close(billed.rows()[0].total_bill, 1953.0);
        assert_close(billed.rows()[1].total_bill, 500.0);
        assert_close(billed.rows()[2].total_bill, 3206.0);
    }

    #[test]
    fn water_rate_change_moves_only_water_cost() {
        let table = UsageTable::new(vec![UsageRow::new("101", 10.0, 5.0)]);
        let tariff = Tariff::new(8.53, 20.0, 500.0).unwrap();
        let billed = compute_bills(&table, &tariff);

        assert_close(billed.rows()[0].water_cost, 100.0);
        assert_close(billed.rows()[0].total_bill, 685.30);
    }

    #[test]
    fn doubling_usage_doubles_costs() {
        let tariff = Tariff::default();
        let base = compute_bills(&three_rooms(), &tariff);
        let doubled_input: UsageTable = three_rooms()
            .iter()
            .map(|r| UsageRow::new(r.room_id.clone(), r.electricity_usage * 2.0, r.water_usage * 2.0))
            .collect();
        let doubled = compute_bills(&doubled_input, &tariff);

        for (a, b) in base.iter().zip(doubled.iter()) {
            assert_close(b.electricity_cost, a.electricity_cost * 2.0);
            assert_close(b.water_cost, a.water_cost * 2.0);
            assert_close(
                b.total_bill - a.total_bill,
                a.electricity_cost + a.water_cost,
            );
        }
    }

    #[test]
    fn wifi_fee_is_added_once_per_row() {
        let tariff = Tariff::default();
        let billed = compute_bills(&three_rooms(), &tariff);

        let total: f64 = billed.iter().map(|r| r.total_bill).sum();
        let electricity: f64 = billed.iter().map(|r| r.electricity_cost).sum();
        let water: f64 = billed.iter().map(|r| r.water_cost).sum();
        assert_close(total, electricity + water + billed.len() as f64 * tariff.wifi_fee);
    }

    #[test]
    fn repeated_runs_are_bit_identical_and_leave_input_alone() {
        let table = three_rooms();
        let snapshot = table.clone();
        let tariff = Tariff::default();

        let first = compute_bills(&table, &tariff);
        let second = compute_bills(&table, &tariff);

        assert_eq!(table, snapshot);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.total_bill.to_bits(), b.total_bill.to_bits());
        }
        assert_eq!(first, second);
    }

    #[test]
    fn empty_table_bills_nothing() {
        let billed = compute_bills(&UsageTable::default(), &Tariff::default());
        assert!(billed.is_empty());
    }

    #[test]
    fn extra_columns_survive_but_derived_names_are_overwritten() {
        let table = UsageTable::new(vec![UsageRow::new("A", 1.0, 1.0)
            .with_extra("floor", "2")
            .with_extra("Total Bill", "999")]);
        let billed = compute_bills(&table, &Tariff::default());

        let row = &billed.rows()[0];
        assert_eq!(row.usage.extras, vec![("floor".to_string(), "2".to_string())]);
        assert_close(row.total_bill, 8.53 + 12.0 + 500.0);
    }
}
