use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Paid,
    Pending,
    Overdue,
}

impl FeeStatus {
    /// Paid wins over everything; an unpaid balance past its due date is overdue.
    pub fn derive(paid_fees: i64, total_fees: i64, due_date: NaiveDate, today: NaiveDate) -> Self {
        if paid_fees >= total_fees {
            FeeStatus::Paid
        } else if today > due_date {
            FeeStatus::Overdue
        } else {
            FeeStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Paid => "paid",
            FeeStatus::Pending => "pending",
            FeeStatus::Overdue => "overdue",
        }
    }
}

impl FromStr for FeeStatus {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "paid" => Ok(FeeStatus::Paid),
            "pending" => Ok(FeeStatus::Pending),
            "overdue" => Ok(FeeStatus::Overdue),
            other => Err(EngineError::Validation(format!(
                "unknown fee status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentCategory {
    Regular,
    Scholarship,
    Hosteller,
}

impl StudentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentCategory::Regular => "regular",
            StudentCategory::Scholarship => "scholarship",
            StudentCategory::Hosteller => "hosteller",
        }
    }
}

impl FromStr for StudentCategory {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "regular" => Ok(StudentCategory::Regular),
            "scholarship" => Ok(StudentCategory::Scholarship),
            "hosteller" => Ok(StudentCategory::Hosteller),
            other => Err(EngineError::Validation(format!(
                "unknown student category '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Online,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Online => "online",
            PaymentMethod::Cheque => "cheque",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cash" => Ok(PaymentMethod::Cash),
            "online" => Ok(PaymentMethod::Online),
            "cheque" => Ok(PaymentMethod::Cheque),
            other => Err(EngineError::Validation(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "completed" => Ok(PaymentStatus::Completed),
            "pending" => Ok(PaymentStatus::Pending),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(EngineError::Validation(format!(
                "unknown payment status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Staff,
    Student,
    Parent,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
            UserRole::Student => "student",
            UserRole::Parent => "parent",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    Whatsapp,
    Sms,
    Email,
}

impl ReminderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderChannel::Whatsapp => "whatsapp",
            ReminderChannel::Sms => "sms",
            ReminderChannel::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Prediction,
    Reminder,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub full_name: String,
    pub roll_number: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub class_name: String,
    pub batch: String,
    pub category: StudentCategory,
    pub total_fees: i64,
    pub paid_fees: i64,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
}

impl Student {
    pub fn balance(&self) -> i64 {
        self.total_fees - self.paid_fees
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub amount: i64,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub admin_email: String,
    pub plan: String,
    pub billing_date: NaiveDate,
    pub is_active: bool,
}

/// One reminder the scheduler wants delivered. Recomputed from the roster on
/// every invocation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub student_id: Uuid,
    pub student_name: String,
    pub scheduled_on: NaiveDate,
    pub message: String,
    pub channel: ReminderChannel,
    pub status: ReminderStatus,
}

/// One dashboard insight. Recomputed from the roster on every invocation,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    pub priority: Priority,
}

#[derive(Debug, Clone)]
pub struct ChatContext {
    pub role: UserRole,
    pub name: String,
}

/// Rupee amount with thousands grouping, e.g. `format_amount(35000)` is "₹35,000".
pub fn format_amount(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();

    for (i, ch) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}
