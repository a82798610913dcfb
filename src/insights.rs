use chrono::NaiveDate;

use crate::models::{format_amount, FeeStatus, Insight, InsightKind, Priority, Student};

/// Balances above this are flagged even before the due date passes.
pub const HIGH_PENDING_THRESHOLD: i64 = 20_000;

/// Due dates inside this window put a pending student on the dashboard.
pub const UPCOMING_DUE_WINDOW_DAYS: i64 = 7;

/// Scan the roster and emit the dashboard insights, most urgent first:
/// overdue alert, then large pending balances, then upcoming due dates.
pub fn generate_insights(students: &[Student], today: NaiveDate) -> Vec<Insight> {
    let mut insights = Vec::new();

    let overdue = students
        .iter()
        .filter(|s| s.status == FeeStatus::Overdue)
        .count();
    if overdue > 0 {
        insights.push(Insight {
            kind: InsightKind::Alert,
            message: format!(
                "{overdue} student(s) have overdue payments. Immediate follow-up recommended."
            ),
            priority: Priority::High,
        });
    }

    let high_pending = students
        .iter()
        .filter(|s| s.balance() > HIGH_PENDING_THRESHOLD && s.status != FeeStatus::Paid)
        .count();
    if high_pending > 0 {
        insights.push(Insight {
            kind: InsightKind::Reminder,
            message: format!(
                "{high_pending} student(s) have pending balances above {}.",
                format_amount(HIGH_PENDING_THRESHOLD)
            ),
            priority: Priority::Medium,
        });
    }

    let due_soon = students
        .iter()
        .filter(|s| {
            let days = (s.due_date - today).num_days();
            s.status == FeeStatus::Pending && days > 0 && days <= UPCOMING_DUE_WINDOW_DAYS
        })
        .count();
    if due_soon > 0 {
        insights.push(Insight {
            kind: InsightKind::Reminder,
            message: format!(
                "{due_soon} student(s) have fees due within the next {UPCOMING_DUE_WINDOW_DAYS} days."
            ),
            priority: Priority::High,
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    use crate::models::StudentCategory;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn student(total: i64, paid: i64, due_in_days: i64, status: FeeStatus) -> Student {
        Student {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            full_name: "Avni Sharma".to_string(),
            roll_number: "R-101".to_string(),
            email: "avni@example.com".to_string(),
            phone: "9000000001".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2010, 6, 1).unwrap(),
            class_name: "Class 10".to_string(),
            batch: "2026".to_string(),
            category: StudentCategory::Regular,
            total_fees: total,
            paid_fees: paid,
            due_date: today() + Duration::days(due_in_days),
            status,
        }
    }

    #[test]
    fn quiet_roster_emits_nothing() {
        let students = vec![
            student(50_000, 50_000, -10, FeeStatus::Paid),
            student(18_000, 0, 30, FeeStatus::Pending),
        ];
        assert!(generate_insights(&students, today()).is_empty());
    }

    #[test]
    fn empty_roster_emits_nothing() {
        assert!(generate_insights(&[], today()).is_empty());
    }

    #[test]
    fn overdue_alert_comes_first() {
        let students = vec![
            student(45_000, 30_000, -5, FeeStatus::Overdue),
            student(50_000, 50_000, -3, FeeStatus::Paid),
            student(15_000, 0, 5, FeeStatus::Pending),
        ];
        let insights = generate_insights(&students, today());
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::Alert);
        assert_eq!(insights[0].priority, Priority::High);
        assert!(insights[0].message.contains("1 student(s)"));
        assert_eq!(insights[1].kind, InsightKind::Reminder);
        assert!(insights[1].message.contains("due within"));
    }

    #[test]
    fn balance_at_threshold_is_not_flagged() {
        let at_threshold = vec![student(30_000, 10_000, 30, FeeStatus::Pending)];
        assert!(generate_insights(&at_threshold, today()).is_empty());

        let above = vec![student(30_001, 10_000, 30, FeeStatus::Pending)];
        let insights = generate_insights(&above, today());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].priority, Priority::Medium);
        assert!(insights[0].message.contains("₹20,000"));
    }

    #[test]
    fn due_window_edges() {
        // due today is outside the window, due in 7 days is inside
        assert!(generate_insights(&[student(10_000, 0, 0, FeeStatus::Pending)], today()).is_empty());
        let insights = generate_insights(&[student(10_000, 0, 7, FeeStatus::Pending)], today());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Reminder);
        assert_eq!(insights[0].priority, Priority::High);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let students = vec![
            student(45_000, 10_000, -5, FeeStatus::Overdue),
            student(60_000, 5_000, 20, FeeStatus::Pending),
        ];
        let first = generate_insights(&students, today());
        let second = generate_insights(&students, today());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.message, b.message);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.priority, b.priority);
        }
    }
}
