use std::{sync::Arc, time::Instant};

use billing_core::domain::{BilledTable, Tariff, TariffField, UsageRow};
use billing_core::{summarize, BillingError, Report};

use crate::{
    pipeline::{Pipeline, PipelineError, Source},
    sinks::BillingSink,
    sources::{BulkCsvSource, CsvUpload, ManualEntry, ManualEntrySource},
    transform::UsageValidation,
};

/// The two independent input paths of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Bulk,
    Manual,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Bulk, Mode::Manual];

    pub fn slug(&self) -> &'static str {
        match self {
            Mode::Bulk => "bulk",
            Mode::Manual => "manual",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Mode::Bulk => "Bulk CSV Upload",
            Mode::Manual => "Manual Entry",
        }
    }

    /// Tag used in the export label and filename.
    pub fn report_type(&self) -> &'static str {
        match self {
            Mode::Bulk => "Bulk_Report",
            Mode::Manual => "Manual_Report",
        }
    }

    pub fn idle_message(&self) -> &'static str {
        match self {
            Mode::Bulk => "Upload a file to see Bulk results.",
            Mode::Manual => "Submit the form to see Manual results.",
        }
    }
}

/// Result of one rendering pass for one mode.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// Nothing uploaded or submitted yet.
    Idle,
    Invalid(PipelineError),
    Computed(Report),
}

impl PassOutcome {
    fn label(&self) -> &'static str {
        match self {
            PassOutcome::Idle => "idle",
            PassOutcome::Invalid(_) => "invalid",
            PassOutcome::Computed(_) => "computed",
        }
    }
}

/// Session-scoped state: the tariff plus the latest input of each mode.
///
/// The modes never read each other's input; the tariff is the only thing they
/// share.
#[derive(Debug, Clone)]
pub struct Session {
    defaults: Tariff,
    tariff: Tariff,
    bulk: Option<CsvUpload>,
    /// Set when the last upload could not be read at all.
    bulk_failure: Option<PipelineError>,
    manual: Option<ManualEntry>,
}

impl Session {
    pub fn new(defaults: Tariff) -> Self {
        Self {
            defaults,
            tariff: defaults,
            bulk: None,
            bulk_failure: None,
            manual: None,
        }
    }

    pub fn read_tariff(&self) -> Tariff {
        self.tariff
    }

    pub fn bulk_upload(&self) -> Option<&CsvUpload> {
        self.bulk.as_ref()
    }

    pub fn manual_entry(&self) -> Option<&ManualEntry> {
        self.manual.as_ref()
    }

    pub fn update_tariff(&mut self, field: TariffField, value: f64) -> Result<(), BillingError> {
        match self.tariff.set(field, value) {
            Ok(()) => {
                tracing::info!(%field, value, "tariff updated");
                Ok(())
            }
            Err(e) => {
                metrics::counter!("tariff_updates_rejected_total").increment(1);
                tracing::warn!(%field, value, "tariff update rejected");
                Err(e)
            }
        }
    }

    /// Replaces the bulk input. `None` puts the mode back to idle.
    pub fn submit_bulk(&mut self, upload: Option<CsvUpload>) {
        if let Some(u) = &upload {
            tracing::info!(filename = %u.filename, bytes = u.contents.len(), "bulk CSV received");
        }
        self.bulk = upload;
        self.bulk_failure = None;
    }

    /// Records an upload that never reached the CSV reader. The previous file
    /// is dropped and the bulk mode shows `error` until the next upload.
    pub fn reject_bulk(&mut self, error: PipelineError) {
        tracing::warn!(error = %error, "bulk upload unreadable");
        self.bulk = None;
        self.bulk_failure = Some(error);
    }

    pub fn submit_manual(&mut self, entry: ManualEntry) {
        tracing::info!(room_id = %entry.room_id, "manual entry submitted");
        self.manual = Some(entry);
    }

    /// Ends the session: tariff back to its defaults, both modes idle.
    pub fn end(&mut self) {
        tracing::info!("session ended");
        *self = Self::new(self.defaults);
    }

    /// Runs the pipeline for `mode` against the tariff as it is right now.
    pub async fn run_pass(&self, mode: Mode) -> PassOutcome {
        let started = Instant::now();
        let tariff = self.tariff;

        let result = match mode {
            Mode::Bulk => match (&self.bulk, &self.bulk_failure) {
                (_, Some(failure)) => Some(Err(failure.clone())),
                (Some(upload), None) => Some(bill(BulkCsvSource::new(upload.clone()), tariff).await),
                (None, None) => None,
            },
            Mode::Manual => match &self.manual {
                Some(entry) => Some(bill(ManualEntrySource::new(entry.clone()), tariff).await),
                None => None,
            },
        };

        let outcome = match result {
            None => PassOutcome::Idle,
            Some(Ok(billed)) => {
                let report = summarize(billed);
                tracing::info!(
                    mode = mode.slug(),
                    rows = report.billed.len(),
                    total_revenue = report.total_revenue,
                    "billing pass computed"
                );
                PassOutcome::Computed(report)
            }
            Some(Err(e)) => {
                tracing::warn!(mode = mode.slug(), error = %e, "billing pass rejected input");
                PassOutcome::Invalid(e)
            }
        };

        metrics::counter!("dashboard_passes_total", "mode" => mode.slug(), "outcome" => outcome.label())
            .increment(1);
        metrics::histogram!("dashboard_pass_duration_seconds").record(started.elapsed().as_secs_f64());
        outcome
    }
}

async fn bill<S>(source: S, tariff: Tariff) -> Result<BilledTable, PipelineError>
where
    S: Source<UsageRow> + 'static,
{
    let pipeline: Pipeline<_, UsageRow, _> = Pipeline {
        source,
        transforms: vec![Arc::new(UsageValidation)],
        sink: BillingSink::new(tariff),
    };
    pipeline.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::domain::BilledRow;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn computed(outcome: PassOutcome) -> Report {
        match outcome {
            PassOutcome::Computed(report) => report,
            other => panic!("expected a computed report, got {other:?}"),
        }
    }

    fn s2_upload() -> CsvUpload {
        CsvUpload::new(
            "rooms.csv",
            b"room_id,electricity_usage,water_usage\nA,100,50\nB,0,0\nC,200,100\n".as_slice(),
        )
    }

    fn bill_of<'a>(report: &'a Report, room: &str) -> &'a BilledRow {
        report
            .billed
            .iter()
            .find(|r| r.room_id() == room)
            .unwrap_or_else(|| panic!("room {room} missing"))
    }

    #[tokio::test]
    async fn modes_start_idle() {
        let session = Session::new(Tariff::default());
        assert_eq!(session.run_pass(Mode::Bulk).await, PassOutcome::Idle);
        assert_eq!(session.run_pass(Mode::Manual).await, PassOutcome::Idle);
    }

    #[tokio::test]
    async fn manual_single_room_with_defaults() {
        let mut session = Session::new(Tariff::default());
        session.submit_manual(ManualEntry::new("101", 10.0, 5.0));

        let report = computed(session.run_pass(Mode::Manual).await);
        let row = bill_of(&report, "101");
        assert_close(row.electricity_cost, 85.30);
        assert_close(row.water_cost, 60.0);
        assert_close(row.total_bill, 645.30);
        assert_close(report.total_revenue, 645.30);
        assert_close(report.average_bill.unwrap(), 645.30);
        assert_eq!(report.peak_row_index, Some(0));
    }

    #[tokio::test]
    async fn bulk_three_rooms() {
        let mut session = Session::new(Tariff::default());
        session.submit_bulk(Some(s2_upload()));

        let report = computed(session.run_pass(Mode::Bulk).await);
        assert_close(bill_of(&report, "A").total_bill, 1953.0);
        assert_close(bill_of(&report, "B").total_bill, 500.0);
        assert_close(bill_of(&report, "C").total_bill, 3206.0);
        assert_close(report.total_revenue, 5659.0);
        assert_close(report.average_bill.unwrap(), 5659.0 / 3.0);
        assert_eq!(report.peak_row_index, Some(2));
    }

    #[tokio::test]
    async fn negative_usage_rejects_the_whole_pass() {
        let mut session = Session::new(Tariff::default());
        session.submit_bulk(Some(CsvUpload::new(
            "rooms.csv",
            b"room_id,electricity_usage,water_usage\nA,5,5\nB,-1,2\n".as_slice(),
        )));

        match session.run_pass(Mode::Bulk).await {
            PassOutcome::Invalid(PipelineError::Billing(BillingError::NegativeUsage { row, room_id, .. })) => {
                assert_eq!(row, 1);
                assert_eq!(room_id, "B");
            }
            other => panic!("expected negative usage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn negative_manual_entry_is_rejected() {
        let mut session = Session::new(Tariff::default());
        session.submit_manual(ManualEntry::new("101", -1.0, 5.0));

        assert!(matches!(
            session.run_pass(Mode::Manual).await,
            PassOutcome::Invalid(PipelineError::Billing(BillingError::NegativeUsage { .. }))
        ));
    }

    #[tokio::test]
    async fn header_only_csv_is_an_empty_report() {
        let mut session = Session::new(Tariff::default());
        session.submit_bulk(Some(CsvUpload::new(
            "empty.csv",
            b"room_id,electricity_usage,water_usage\n".as_slice(),
        )));

        let report = computed(session.run_pass(Mode::Bulk).await);
        assert!(report.billed.is_empty());
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.average_bill, None);
    }

    #[tokio::test]
    async fn tariff_change_applies_to_the_next_pass() {
        let mut session = Session::new(Tariff::default());
        session.submit_manual(ManualEntry::new("101", 10.0, 5.0));
        computed(session.run_pass(Mode::Manual).await);

        session.update_tariff(TariffField::WaterRate, 20.0).unwrap();
        session.submit_manual(ManualEntry::new("101", 10.0, 5.0));

        let report = computed(session.run_pass(Mode::Manual).await);
        assert_close(report.billed.rows()[0].water_cost, 100.0);
        assert_close(report.billed.rows()[0].total_bill, 685.30);
    }

    #[tokio::test]
    async fn rejected_tariff_keeps_previous_value() {
        let mut session = Session::new(Tariff::default());
        assert!(session.update_tariff(TariffField::ElectricityRate, -2.0).is_err());
        assert_eq!(session.read_tariff(), Tariff::default());
    }

    #[tokio::test]
    async fn modes_do_not_disturb_each_other() {
        let mut session = Session::new(Tariff::default());
        session.submit_bulk(Some(s2_upload()));
        let bulk_before = session.run_pass(Mode::Bulk).await;

        session.submit_manual(ManualEntry::new("101", 10.0, 5.0));
        let manual = computed(session.run_pass(Mode::Manual).await);
        let bulk_after = session.run_pass(Mode::Bulk).await;

        assert_eq!(bulk_before, bulk_after);
        assert_close(manual.total_revenue, 645.30);

        // A bad manual submission leaves bulk untouched as well.
        session.submit_manual(ManualEntry::new("102", -5.0, 1.0));
        assert!(matches!(session.run_pass(Mode::Manual).await, PassOutcome::Invalid(_)));
        assert_eq!(session.run_pass(Mode::Bulk).await, bulk_before);
    }

    #[tokio::test]
    async fn clearing_bulk_returns_to_idle() {
        let mut session = Session::new(Tariff::default());
        session.submit_bulk(Some(s2_upload()));
        session.submit_bulk(None);
        assert_eq!(session.run_pass(Mode::Bulk).await, PassOutcome::Idle);
    }

    #[tokio::test]
    async fn unreadable_upload_is_reported_until_the_next_one() {
        let mut session = Session::new(Tariff::default());
        session.submit_bulk(Some(s2_upload()));
        session.submit_manual(ManualEntry::new("101", 10.0, 5.0));

        let failure = PipelineError::Source("upload exceeds the size limit".to_string());
        session.reject_bulk(failure.clone());

        assert_eq!(session.run_pass(Mode::Bulk).await, PassOutcome::Invalid(failure));
        assert!(session.bulk_upload().is_none());
        assert_close(computed(session.run_pass(Mode::Manual).await).total_revenue, 645.30);

        session.submit_bulk(Some(s2_upload()));
        assert_close(computed(session.run_pass(Mode::Bulk).await).total_revenue, 5659.0);

        session.reject_bulk(PipelineError::Source("again".to_string()));
        session.submit_bulk(None);
        assert_eq!(session.run_pass(Mode::Bulk).await, PassOutcome::Idle);
    }

    #[tokio::test]
    async fn overflowing_usage_is_rejected_instead_of_exported() {
        let mut session = Session::new(Tariff::default());
        session.submit_manual(ManualEntry::new("101", 1e308, 1.0));

        assert!(matches!(
            session.run_pass(Mode::Manual).await,
            PassOutcome::Invalid(PipelineError::Billing(BillingError::NonFiniteBill { row: 0, .. }))
        ));
    }

    #[tokio::test]
    async fn ending_the_session_restores_defaults() {
        let mut session = Session::new(Tariff::default());
        session.update_tariff(TariffField::WifiFee, 0.0).unwrap();
        session.submit_manual(ManualEntry::new("101", 1.0, 1.0));

        session.end();

        assert_eq!(session.read_tariff(), Tariff::default());
        assert_eq!(session.run_pass(Mode::Manual).await, PassOutcome::Idle);
    }

    #[test]
    fn mode_slugs_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_slug(mode.slug()), Some(mode));
        }
        assert_eq!(Mode::from_slug("other"), None);
    }
}
