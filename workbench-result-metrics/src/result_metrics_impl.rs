use std::time::Duration;

use serde_json::Value;
use workbench_anonymization_config::config_structs::dataset_struct::RowRecord;

use crate::result_structs::processing_result_struct::ProcessingResult;

pub const ANONYMIZED_ROWS_PAGE_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeforeAfter {
    pub original: u64,
    pub anonymized: u64,
}

/// A privacy target set in the configuration next to what the engine reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetVsAchieved {
    K { target: u64, achieved: u64 },
    L { target: u64, achieved: f64 },
}

/// One entry of the technique explanation list, borrowed from the result.
#[derive(Clone, Debug, PartialEq)]
pub struct TechniqueExplanation<'a> {
    pub key: &'a str,
    pub technique: &'a str,
    pub column: Option<&'a str>,
    pub explanation: &'a str,
    pub changes: &'a [String],
    pub params: Option<&'a Value>,
    pub target: Option<TargetVsAchieved>,
}

/// Read-side accessors over a processing result. Nothing here computes a metric,
/// every value is the one the engine reported.
impl ProcessingResult {
    pub fn achieved_k(&self) -> u64 {
        self.metrics.k_anonymity
    }

    pub fn achieved_l(&self) -> f64 {
        self.metrics.l_diversity
    }

    pub fn information_loss_percentage(&self) -> f64 {
        self.metrics.information_loss_percentage
    }

    pub fn row_counts(&self) -> BeforeAfter {
        BeforeAfter {
            original: self.metrics.original_rows,
            anonymized: self.metrics.anonymized_rows,
        }
    }

    pub fn column_counts(&self) -> BeforeAfter {
        BeforeAfter {
            original: self.metrics.original_columns,
            anonymized: self.metrics.anonymized_columns,
        }
    }

    pub fn quasi_identifiers(&self) -> &[String] {
        &self.metrics.quasi_identifiers
    }

    pub fn sensitive_attributes(&self) -> &[String] {
        &self.metrics.sensitive_attributes
    }

    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }

    /// `<n>ms` below one second, seconds with one decimal above.
    pub fn processing_time_label(&self) -> String {
        let elapsed = self.processing_time();
        if elapsed.as_millis() < 1000 {
            format!("{}ms", elapsed.as_millis())
        } else {
            format!("{:.1}s", elapsed.as_secs_f64())
        }
    }

    pub fn explanations(&self) -> Vec<TechniqueExplanation<'_>> {
        self.technique_details
            .iter()
            .map(|(key, detail)| {
                let target = match (detail.target_k, detail.achieved_k, detail.target_l, detail.achieved_l) {
                    (Some(target), Some(achieved), _, _) => {
                        Some(TargetVsAchieved::K { target, achieved })
                    }
                    (_, _, Some(target), Some(achieved)) => {
                        Some(TargetVsAchieved::L { target, achieved })
                    }
                    _ => None,
                };

                TechniqueExplanation {
                    key: key.as_str(),
                    technique: detail.technique.as_str(),
                    column: detail.column.as_deref(),
                    explanation: detail.explanation.as_str(),
                    changes: &detail.changes,
                    params: detail.params.as_ref(),
                    target,
                }
            })
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.anonymized_data.len().div_ceil(ANONYMIZED_ROWS_PAGE_SIZE)
    }

    /// Rows of a 1-based page; an out-of-range page is empty.
    pub fn rows_page(&self, page: usize) -> &[RowRecord] {
        if page == 0 {
            return &[];
        }

        let total = self.anonymized_data.len();
        let start = (page - 1)
            .saturating_mul(ANONYMIZED_ROWS_PAGE_SIZE)
            .min(total);
        let end = start.saturating_add(ANONYMIZED_ROWS_PAGE_SIZE).min(total);

        &self.anonymized_data[start..end]
    }
}
