use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::batch::{BatchOutcome, BatchReport};
use crate::domain::country_profile::CountryProfile;
use crate::domain::csv::RawRow;
use crate::domain::error::{Result, RowError};
use crate::domain::paystub::{PaystubRecord, ValidationPolicy};
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::mailer::PaystubMailer;
use crate::infrastructure::pdf::PaystubRenderer;

/// Validates, renders and mails every row of a payroll batch.
///
/// One row's failure never stops the batch: every input row gets exactly one
/// outcome, in input order.
pub struct PayrollBatchUseCase {
    renderer: Arc<dyn PaystubRenderer + Send + Sync>,
    mailer: Arc<dyn PaystubMailer + Send + Sync>,
    policy: ValidationPolicy,
}

impl PayrollBatchUseCase {
    pub fn new(
        renderer: Arc<dyn PaystubRenderer + Send + Sync>,
        mailer: Arc<dyn PaystubMailer + Send + Sync>,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            renderer,
            mailer,
            policy,
        }
    }

    /// Parse an uploaded CSV and process it. Only an unreadable upload is an error.
    pub async fn process_csv(
        &self,
        bytes: &[u8],
        profile: CountryProfile,
        company: &str,
    ) -> Result<BatchReport> {
        let rows = CsvParser::new().parse_bytes(bytes)?;
        let report = BatchReport::completed(self.process(&rows, profile, company).await);

        info!(
            rows = report.results.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            country = %profile,
            company = %company,
            "Payroll batch processed"
        );
        Ok(report)
    }

    pub async fn process(
        &self,
        rows: &[RawRow],
        profile: CountryProfile,
        company: &str,
    ) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(rows.len());

        for row in rows {
            let outcome = match PaystubRecord::from_row(row, &self.policy) {
                Err(err) => {
                    warn!(row = row.index, error = %err, "Payroll row rejected");
                    BatchOutcome::failure(row.email_or_unknown(), err)
                }
                Ok(record) => match self.deliver(&record, profile, company).await {
                    Ok(()) => {
                        info!(row = row.index, email = %record.email(), "Paystub sent");
                        BatchOutcome::success(record.email(), Utc::now())
                    }
                    Err(err) => {
                        warn!(row = row.index, email = %record.email(), error = %err, "Paystub delivery failed");
                        BatchOutcome::failure(record.email(), err)
                    }
                },
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn deliver(
        &self,
        record: &PaystubRecord,
        profile: CountryProfile,
        company: &str,
    ) -> std::result::Result<(), RowError> {
        let pdf = self.renderer.render(record, profile, company)?;
        self.mailer
            .send(profile, record.email(), &pdf, &record.attachment_filename())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::paystub::fixtures::{payroll_row, CSV_HEADER};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubRenderer {
        fail_for: Option<String>,
    }

    impl PaystubRenderer for StubRenderer {
        fn render(
            &self,
            record: &PaystubRecord,
            _profile: CountryProfile,
            company: &str,
        ) -> Result<Vec<u8>> {
            if self.fail_for.as_deref() == Some(record.email()) {
                return Err(AppError::RenderError("font missing".to_string()));
            }
            Ok(format!("PDF for {} at {}", record.email(), company).into_bytes())
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String, Vec<u8>)>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl PaystubMailer for RecordingMailer {
        async fn send(
            &self,
            profile: CountryProfile,
            to: &str,
            attachment: &[u8],
            filename: &str,
        ) -> Result<()> {
            if self.fail_for.as_deref() == Some(to) {
                return Err(AppError::DeliveryError("mailbox unavailable".to_string()));
            }
            self.sent.lock().unwrap().push((
                profile.code().to_string(),
                to.to_string(),
                filename.to_string(),
                attachment.to_vec(),
            ));
            Ok(())
        }
    }

    fn use_case(
        renderer: StubRenderer,
        mailer: Arc<RecordingMailer>,
    ) -> PayrollBatchUseCase {
        PayrollBatchUseCase::new(Arc::new(renderer), mailer, ValidationPolicy::default())
    }

    fn healthy() -> (PayrollBatchUseCase, Arc<RecordingMailer>) {
        let mailer = Arc::new(RecordingMailer::default());
        (use_case(StubRenderer { fail_for: None }, mailer.clone()), mailer)
    }

    fn with(mut row: RawRow, field: &str, value: &str) -> RawRow {
        row.fields.insert(field.to_string(), value.to_string());
        row
    }

    #[tokio::test]
    async fn test_every_row_gets_an_outcome_in_order() {
        let (use_case, _) = healthy();
        let rows: Vec<RawRow> = (0..5)
            .map(|i| {
                let row = payroll_row(i, &format!("employee{}@example.com", i));
                if i % 2 == 1 {
                    with(row, "net_payment", "1")
                } else {
                    row
                }
            })
            .collect();

        let outcomes = use_case.process(&rows, CountryProfile::default(), "MiEmpresa").await;

        assert_eq!(outcomes.len(), rows.len());
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.email(), format!("employee{}@example.com", i));
            assert_eq!(outcome.is_success(), i % 2 == 0);
        }
    }

    #[tokio::test]
    async fn test_one_bad_row_does_not_block_the_rest() {
        let (use_case, mailer) = healthy();
        let rows = vec![
            payroll_row(0, "a@example.com"),
            payroll_row(1, "b@example.com"),
            with(payroll_row(2, "c@example.com"), "period", "yesterday"),
            payroll_row(3, "d@example.com"),
        ];

        let outcomes = use_case.process(&rows, CountryProfile::default(), "MiEmpresa").await;

        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 3);
        assert_eq!(outcomes[2].error(), Some(RowError::InvalidDate.to_string().as_str()));
        assert_eq!(mailer.sent.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_mixed_batch_scenario() {
        let (use_case, _) = healthy();
        let mut missing_net = payroll_row(2, "fastapiassignment@gmail.com");
        missing_net.fields.remove("net_payment");
        let rows = vec![
            payroll_row(0, "fastapiassignment@gmail.com"),
            payroll_row(1, "fastapiassignment[fa]gmail.com"),
            missing_net,
        ];

        let outcomes = use_case.process(&rows, CountryProfile::default(), "MiEmpresa").await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[0].email(), "fastapiassignment@gmail.com");

        assert_eq!(outcomes[1].email(), "fastapiassignment[fa]gmail.com");
        assert_eq!(outcomes[1].error(), Some(RowError::InvalidEmail.to_string().as_str()));

        assert_eq!(outcomes[2].email(), "fastapiassignment@gmail.com");
        assert_eq!(
            outcomes[2].error(),
            Some(
                RowError::MissingOrInvalidField("net_payment".to_string())
                    .to_string()
                    .as_str()
            )
        );
    }

    #[tokio::test]
    async fn test_row_without_email_reports_unknown() {
        let (use_case, _) = healthy();
        let mut row = payroll_row(0, "a@example.com");
        row.fields.remove("email");

        let outcomes = use_case.process(&[row], CountryProfile::default(), "MiEmpresa").await;
        assert_eq!(outcomes[0].email(), "unknown");
        assert!(!outcomes[0].is_success());
    }

    #[tokio::test]
    async fn test_render_failure_skips_mailer() {
        let mailer = Arc::new(RecordingMailer::default());
        let use_case = use_case(
            StubRenderer {
                fail_for: Some("b@example.com".to_string()),
            },
            mailer.clone(),
        );
        let rows = vec![payroll_row(0, "a@example.com"), payroll_row(1, "b@example.com")];

        let outcomes = use_case.process(&rows, CountryProfile::default(), "MiEmpresa").await;

        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].email(), "b@example.com");
        assert!(outcomes[1].error().unwrap().contains("font missing"));
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "a@example.com");
    }

    #[tokio::test]
    async fn test_mail_failure_is_reported_per_row() {
        let mailer = Arc::new(RecordingMailer {
            fail_for: Some("a@example.com".to_string()),
            ..Default::default()
        });
        let use_case = use_case(StubRenderer { fail_for: None }, mailer.clone());
        let rows = vec![payroll_row(0, "a@example.com"), payroll_row(1, "b@example.com")];

        let outcomes = use_case.process(&rows, CountryProfile::default(), "MiEmpresa").await;

        assert_eq!(outcomes[0].email(), "a@example.com");
        assert!(outcomes[0].error().unwrap().contains("mailbox unavailable"));
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_mailer_receives_profile_filename_and_pdf() {
        let (use_case, mailer) = healthy();
        let profile = CountryProfile::from_code("USA").unwrap();

        use_case
            .process(&[payroll_row(0, "a@example.com")], profile, "Acme")
            .await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].0, "USA");
        assert_eq!(sent[0].2, "paystub_a@example.com.pdf");
        assert_eq!(sent[0].3, b"PDF for a@example.com at Acme".to_vec());
    }

    #[tokio::test]
    async fn test_process_csv_builds_report() {
        let (use_case, _) = healthy();
        let csv = format!(
            "{}\n\
             Roberto Camejo,fastapiassignment@gmail.com,Software Engineer,50,30,100,20,5000,4800,4600,2025-04-30\n\
             Ana Perez,fastapiassignment[fa]gmail.com,Designer,40,25,90,10,4000,3900,3735,2025-04-30\n\
             Carlos Gomez,fastapiassignment@gmail.com,QA Engineer,30,20,80,15,3500,3400,,2025-04-30\n",
            CSV_HEADER
        );

        let report = use_case
            .process_csv(csv.as_bytes(), CountryProfile::default(), "MiEmpresa")
            .await
            .unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.results[1].email(), "fastapiassignment[fa]gmail.com");
        assert_eq!(report.results[2].email(), "fastapiassignment@gmail.com");
    }

    #[tokio::test]
    async fn test_process_csv_rejects_unreadable_upload() {
        let (use_case, _) = healthy();
        let result = use_case
            .process_csv(&[0xFF, 0xFE, 0x00], CountryProfile::default(), "MiEmpresa")
            .await;
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (use_case, _) = healthy();
        let outcomes = use_case.process(&[], CountryProfile::default(), "MiEmpresa").await;
        assert!(outcomes.is_empty());
    }
}
