use std::sync::LazyLock;

use regex::Regex;

use crate::models::{format_amount, FeeStatus, Student};

static CLASS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+(\w+)").expect("class token pattern is valid"));

const HELP_REPLY: &str = "I can answer questions about total collection, pending dues, \
defaulters, and class-wise summaries. Try \"total collection\", \"pending dues\", \
\"list defaulters\" or \"summary for class 10\".";

/// Resolve a free-text report query against the roster. Intents are checked in
/// a fixed order and the first substring match wins, so a query that mentions
/// several topics gets the earliest one (e.g. "total collection due" reports
/// collection, and anything containing "due" never reaches the defaulter
/// intent).
pub fn resolve_query(query: &str, students: &[Student]) -> String {
    let q = query.to_lowercase();

    if q.contains("total") && (q.contains("collection") || q.contains("revenue")) {
        let collected: i64 = students.iter().map(|s| s.paid_fees).sum();
        return format!("Total collection so far: {}.", format_amount(collected));
    }

    if q.contains("pending") || q.contains("due") {
        let outstanding: i64 = students.iter().map(|s| s.balance()).sum();
        return format!(
            "Total pending dues: {} across {} student(s).",
            format_amount(outstanding),
            students.len()
        );
    }

    if q.contains("defaulter") || q.contains("overdue") {
        let defaulters: Vec<&str> = students
            .iter()
            .filter(|s| s.status == FeeStatus::Overdue)
            .map(|s| s.full_name.as_str())
            .collect();
        if defaulters.is_empty() {
            return "No defaulters right now.".to_string();
        }
        return format!(
            "{} defaulter(s): {}.",
            defaulters.len(),
            defaulters.join(", ")
        );
    }

    if q.contains("class") {
        if let Some(captures) = CLASS_TOKEN.captures(&q) {
            let token = &captures[1];
            let matching: Vec<&Student> = students
                .iter()
                .filter(|s| s.class_name.to_lowercase().contains(token))
                .collect();
            let collected: i64 = matching.iter().map(|s| s.paid_fees).sum();
            return format!(
                "Class {token}: {} student(s), {} collected.",
                matching.len(),
                format_amount(collected)
            );
        }
    }

    HELP_REPLY.to_string()
}
