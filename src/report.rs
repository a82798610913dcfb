use std::fmt::Write;

use chrono::NaiveDate;

use crate::insights;
use crate::models::{format_amount, FeeStatus, Student};
use crate::reminders;
use crate::revenue;

pub fn build_report(tenant: Option<&str>, today: NaiveDate, students: &[Student]) -> String {
    let insights = insights::generate_insights(students, today);
    let schedule = reminders::build_reminder_schedule(students, today);
    let predicted = revenue::predict_monthly_revenue(students);

    let collected: i64 = students.iter().map(|s| s.paid_fees).sum();
    let outstanding: i64 = students.iter().map(|s| s.balance()).sum();

    let mut output = String::new();
    let tenant_label = tenant.unwrap_or("all institutes");

    let _ = writeln!(output, "# Fee Collection Report");
    let _ = writeln!(output, "Generated for {} on {}", tenant_label, today);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Collection Summary");
    let _ = writeln!(output, "- Students on roll: {}", students.len());
    let _ = writeln!(output, "- Collected: {}", format_amount(collected));
    let _ = writeln!(output, "- Outstanding: {}", format_amount(outstanding));
    let _ = writeln!(
        output,
        "- Predicted collection by period end: {}",
        format_amount(predicted.round() as i64)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Active Insights");

    if insights.is_empty() {
        let _ = writeln!(output, "Nothing needs attention right now.");
    } else {
        for insight in insights.iter() {
            let _ = writeln!(
                output,
                "- [{:?}] {}",
                insight.priority, insight.message
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Scheduled Reminders");

    if schedule.is_empty() {
        let _ = writeln!(output, "No reminders queued for this roster.");
    } else {
        for entry in schedule.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} via {} on {}: {}",
                entry.student_name,
                entry.channel.as_str(),
                entry.scheduled_on,
                entry.message
            );
        }
    }

    let mut defaulters: Vec<&Student> = students
        .iter()
        .filter(|s| s.status == FeeStatus::Overdue)
        .collect();
    defaulters.sort_by(|a, b| b.balance().cmp(&a.balance()));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Defaulters");

    if defaulters.is_empty() {
        let _ = writeln!(output, "No overdue accounts.");
    } else {
        for student in defaulters.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}, {}) owes {}, due {}",
                student.full_name,
                student.roll_number,
                student.class_name,
                format_amount(student.balance()),
                student.due_date
            );
        }
    }

    output
}
