use chrono::{Duration, NaiveDate};

use crate::models::{
    format_amount, FeeStatus, ReminderChannel, ReminderEntry, ReminderStatus, Student,
};

/// Build the reminder schedule for one roster snapshot. Paid students are
/// skipped; everyone else falls through a channel ladder keyed on how close
/// the due date is. Output order follows roster order.
///
/// The 1-3 day branch schedules for today even though its message counts the
/// days remaining; only the 4-7 day branch offsets the send date. That
/// asymmetry matches the shipped product behavior and is intentional here.
pub fn build_reminder_schedule(students: &[Student], today: NaiveDate) -> Vec<ReminderEntry> {
    let mut schedule = Vec::new();

    for student in students {
        if student.status == FeeStatus::Paid {
            continue;
        }

        let days_until_due = (student.due_date - today).num_days();

        let entry = if student.status == FeeStatus::Overdue {
            Some((
                ReminderChannel::Whatsapp,
                today,
                format!(
                    "URGENT: fee payment is overdue. Outstanding balance {}. \
                     Please pay immediately to avoid late charges.",
                    format_amount(student.balance())
                ),
            ))
        } else if days_until_due > 0 && days_until_due <= 3 {
            Some((
                ReminderChannel::Sms,
                today,
                format!(
                    "Reminder: fee payment of {} is due in {days_until_due} days.",
                    format_amount(student.balance())
                ),
            ))
        } else if days_until_due > 3 && days_until_due <= 7 {
            Some((
                ReminderChannel::Email,
                today + Duration::days(days_until_due - 3),
                format!(
                    "Your fee payment of {} is due on {}. Please plan the payment ahead of time.",
                    format_amount(student.balance()),
                    student.due_date.format("%d %b %Y")
                ),
            ))
        } else {
            None
        };

        if let Some((channel, scheduled_on, message)) = entry {
            schedule.push(ReminderEntry {
                student_id: student.id,
                student_name: student.full_name.clone(),
                scheduled_on,
                message,
                channel,
                status: ReminderStatus::Scheduled,
            });
        }
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::models::StudentCategory;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn student(name: &str, total: i64, paid: i64, due_in_days: i64, status: FeeStatus) -> Student {
        Student {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            full_name: name.to_string(),
            roll_number: "R-204".to_string(),
            email: "student@example.com".to_string(),
            phone: "9000000002".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2009, 11, 20).unwrap(),
            class_name: "Class 9".to_string(),
            batch: "2026".to_string(),
            category: StudentCategory::Regular,
            total_fees: total,
            paid_fees: paid,
            due_date: today() + Duration::days(due_in_days),
            status,
        }
    }

    #[test]
    fn overdue_goes_out_on_whatsapp_today() {
        let roster = vec![student("Dev Patel", 45_000, 10_000, -4, FeeStatus::Overdue)];
        let schedule = build_reminder_schedule(&roster, today());
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].channel, ReminderChannel::Whatsapp);
        assert_eq!(schedule[0].scheduled_on, today());
        assert_eq!(schedule[0].status, ReminderStatus::Scheduled);
        assert!(schedule[0].message.contains("35,000"));
    }

    #[test]
    fn due_in_two_days_goes_out_on_sms() {
        let roster = vec![student("Ira Nair", 50_000, 0, 2, FeeStatus::Pending)];
        let schedule = build_reminder_schedule(&roster, today());
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].channel, ReminderChannel::Sms);
        // scheduled for today even though the message counts down
        assert_eq!(schedule[0].scheduled_on, today());
        assert!(schedule[0].message.contains("2 days"));
    }

    #[test]
    fn due_in_six_days_goes_out_on_email_with_offset() {
        let roster = vec![student("Rohan Das", 30_000, 5_000, 6, FeeStatus::Pending)];
        let schedule = build_reminder_schedule(&roster, today());
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].channel, ReminderChannel::Email);
        assert_eq!(schedule[0].scheduled_on, today() + Duration::days(3));
        assert!(schedule[0].message.contains("16 Mar 2026"));
    }

    #[test]
    fn paid_and_far_out_students_are_skipped() {
        let roster = vec![
            student("Paid Up", 40_000, 40_000, 2, FeeStatus::Paid),
            student("Far Out", 40_000, 0, 12, FeeStatus::Pending),
            student("On The Day", 40_000, 0, 0, FeeStatus::Pending),
        ];
        assert!(build_reminder_schedule(&roster, today()).is_empty());
    }

    #[test]
    fn window_edges_pick_the_right_channel() {
        let sms_edge = build_reminder_schedule(
            &[student("Edge Three", 10_000, 0, 3, FeeStatus::Pending)],
            today(),
        );
        assert_eq!(sms_edge[0].channel, ReminderChannel::Sms);

        let email_low = build_reminder_schedule(
            &[student("Edge Four", 10_000, 0, 4, FeeStatus::Pending)],
            today(),
        );
        assert_eq!(email_low[0].channel, ReminderChannel::Email);
        assert_eq!(email_low[0].scheduled_on, today() + Duration::days(1));

        let email_high = build_reminder_schedule(
            &[student("Edge Seven", 10_000, 0, 7, FeeStatus::Pending)],
            today(),
        );
        assert_eq!(email_high[0].channel, ReminderChannel::Email);
        assert_eq!(email_high[0].scheduled_on, today() + Duration::days(4));
    }

    #[test]
    fn output_preserves_roster_order() {
        let roster = vec![
            student("Second Due", 20_000, 0, 6, FeeStatus::Pending),
            student("First Overdue", 20_000, 0, -2, FeeStatus::Overdue),
            student("Third Due", 20_000, 0, 1, FeeStatus::Pending),
        ];
        let schedule = build_reminder_schedule(&roster, today());
        let names: Vec<&str> = schedule.iter().map(|e| e.student_name.as_str()).collect();
        assert_eq!(names, vec!["Second Due", "First Overdue", "Third Due"]);
    }
}
