// Pipeline progress calculations

use serde::Serialize;

use crate::value_objects::TaskStatus;

/// `current / total * 100`, rounded and clamped to 0..=100.
/// Zero or missing totals read as 0%.
pub fn progress_percent(current: Option<u32>, total: Option<u32>) -> u8 {
    match (current, total) {
        (Some(current), Some(total)) if total > 0 => {
            let percent = (f64::from(current) / f64::from(total) * 100.0).round();
            percent.clamp(0.0, 100.0) as u8
        }
        _ => 0,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub unknown: usize,
}

impl StatusSummary {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a TaskStatus>) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            summary.total += 1;
            match status {
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::Processing => summary.processing += 1,
                TaskStatus::Completed => summary.completed += 1,
                TaskStatus::Failed => summary.failed += 1,
                TaskStatus::Unknown(_) => summary.unknown += 1,
            }
        }
        summary
    }

    pub fn completion_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }

    /// Non-empty and every item terminal.
    pub fn is_settled(&self) -> bool {
        self.total > 0 && self.completed + self.failed == self.total
    }
}
