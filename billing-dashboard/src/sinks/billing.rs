use billing_core::domain::{BilledRow, BilledTable, Tariff, UsageRow, UsageTable};
use billing_core::domain::{ELECTRICITY_COST, TOTAL_BILL, WATER_COST};
use billing_core::{compute_bills, BillingError};
use futures::StreamExt;

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Collects the whole usage table, then bills it against a tariff snapshot.
///
/// Any upstream error aborts the pass before the engine runs, so a rejected
/// input never produces a partial bill.
pub struct BillingSink {
    tariff: Tariff,
}

impl BillingSink {
    pub fn new(tariff: Tariff) -> Self {
        Self { tariff }
    }
}

/// Finite usage at a finite rate can still overflow; such a bill cannot be
/// exported as a number.
fn check_finite(index: usize, row: &BilledRow) -> Result<(), BillingError> {
    let costs = [
        (ELECTRICITY_COST, row.electricity_cost),
        (WATER_COST, row.water_cost),
        (TOTAL_BILL, row.total_bill),
    ];
    match costs.into_iter().find(|(_, v)| !v.is_finite()) {
        Some((column, value)) => Err(BillingError::NonFiniteBill {
            row: index,
            room_id: row.room_id().to_string(),
            column,
            value,
        }),
        None => Ok(()),
    }
}

#[async_trait::async_trait]
impl Sink<UsageRow> for BillingSink {
    type Output = BilledTable;

    async fn run<S>(&self, mut input: S) -> Result<BilledTable, PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<UsageRow>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut table = UsageTable::default();

        while let Some(item) = input.next().await {
            match item {
                Ok(env) => table.push(env.payload),
                Err(e) => {
                    tracing::debug!(error = %e, rows_read = table.len(), "billing pass aborted by upstream error");
                    return Err(e);
                }
            }
        }

        let billed = compute_bills(&table, &self.tariff);
        for (index, row) in billed.iter().enumerate() {
            check_finite(index, row)?;
        }
        metrics::counter!("billed_rows_total").increment(billed.len() as u64);
        Ok(billed)
    }
}
