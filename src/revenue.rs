use crate::models::{FeeStatus, Student};

/// Share of outstanding (non-overdue) balance assumed to land by period end.
pub const COLLECTIBILITY_FACTOR: f64 = 0.5;

/// Linear end-of-period revenue estimate: everything already collected, plus
/// half of what is still outstanding from students who are not overdue.
/// Overdue balances are written out of the estimate entirely.
pub fn predict_monthly_revenue(students: &[Student]) -> f64 {
    let collected: i64 = students.iter().map(|s| s.paid_fees).sum();
    let collectible_pending: i64 = students
        .iter()
        .filter(|s| s.status != FeeStatus::Overdue)
        .map(|s| s.balance())
        .sum();

    collected as f64 + COLLECTIBILITY_FACTOR * collectible_pending as f64
}
