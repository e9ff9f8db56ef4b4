// src/services/report.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::workflow::ProvisionStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Faulted,
    /// Not attempted because the run halted on an earlier fault.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: ProvisionStep,
    pub object_name: String,
    pub status: StepStatus,
    /// Operation that produced the response, or the one that failed.
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    /// Vendor response, unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub site: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub assumed_existing: Vec<ProvisionStep>,
    pub outcomes: Vec<StepOutcome>,
}

impl ProvisionReport {
    pub fn new(site: &str, assumed_existing: Vec<ProvisionStep>) -> Self {
        Self {
            site: site.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            assumed_existing,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn outcome(&self, step: ProvisionStep) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }

    fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn completed(&self) -> usize {
        self.count(StepStatus::Completed)
    }

    pub fn faulted(&self) -> usize {
        self.count(StepStatus::Faulted)
    }

    pub fn skipped(&self) -> usize {
        self.count(StepStatus::Skipped)
    }

    pub fn is_success(&self) -> bool {
        self.faulted() == 0 && self.skipped() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "site {}: {} completed, {} faulted, {} skipped",
            self.site,
            self.completed(),
            self.faulted(),
            self.skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(step: ProvisionStep, status: StepStatus) -> StepOutcome {
        StepOutcome {
            step,
            object_name: "Ottawa-Loc".to_string(),
            status,
            operation: step.operation().to_string(),
            uuid: None,
            response: None,
            error: None,
            error_code: None,
            duration_ms: 3,
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut report = ProvisionReport::new("Ottawa", Vec::new());
        report.record(outcome(ProvisionStep::Location, StepStatus::Completed));
        report.record(outcome(ProvisionStep::Region, StepStatus::Faulted));
        report.record(outcome(ProvisionStep::DevicePool, StepStatus::Skipped));
        report.finish();

        assert_eq!(report.completed(), 1);
        assert_eq!(report.faulted(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.is_success());
        assert_eq!(
            report.summary(),
            "site Ottawa: 1 completed, 1 faulted, 1 skipped"
        );
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn test_serialize_outcome() {
        let json = serde_json::to_value(outcome(ProvisionStep::DevicePool, StepStatus::Faulted)).unwrap();

        assert_eq!(json["step"], "device-pool");
        assert_eq!(json["status"], "faulted");
        assert_eq!(json["operation"], "addDevicePool");
        assert!(json.get("uuid").is_none());
    }
}
