use crate::domain::model::{Activity, ActivityKind, ActivityStatus};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ActivitySummary {
    pub total_lent: Decimal,
    pub total_borrowed: Decimal,
    pub active: usize,
    pub completed: usize,
    /// 進行中活動尚未還清的金額
    pub outstanding: Decimal,
}

impl ActivitySummary {
    pub fn from_activities(activities: &[Activity]) -> Self {
        activities
            .iter()
            .fold(ActivitySummary::default(), |mut summary, activity| {
                match activity.kind {
                    ActivityKind::Lend => summary.total_lent += activity.amount,
                    ActivityKind::Request => summary.total_borrowed += activity.amount,
                }
                match activity.status {
                    ActivityStatus::Active => {
                        summary.active += 1;
                        summary.outstanding += outstanding_amount(activity);
                    }
                    ActivityStatus::Completed => summary.completed += 1,
                }
                summary
            })
    }
}

fn outstanding_amount(activity: &Activity) -> Decimal {
    let remaining = 100u8.saturating_sub(activity.repayment_progress);
    activity.amount * Decimal::from(remaining) / Decimal::ONE_HUNDRED
}
