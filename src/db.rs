use anyhow::Context;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    FeeStatus, Payment, PaymentMethod, PaymentStatus, Student, StudentCategory,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let tenants = vec![
        (
            Uuid::parse_str("7b1a3f62-5f0e-4a6b-9f43-1c2a8d9b6e01")?,
            "Sunrise Public School",
            "admin@sunrise.example.com",
            "standard",
            NaiveDate::from_ymd_opt(2026, 1, 5).context("invalid date")?,
        ),
        (
            Uuid::parse_str("c94d2b10-88a7-43d1-b0e2-4f5a6c7d8e02")?,
            "Green Valley Academy",
            "admin@greenvalley.example.com",
            "premium",
            NaiveDate::from_ymd_opt(2026, 1, 12).context("invalid date")?,
        ),
    ];

    for (id, name, admin_email, plan, billing_date) in &tenants {
        sqlx::query(
            r#"
            INSERT INTO fee_insights.tenants (id, name, admin_email, plan, billing_date, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (name) DO UPDATE
            SET admin_email = EXCLUDED.admin_email, plan = EXCLUDED.plan
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(admin_email)
        .bind(plan)
        .bind(billing_date)
        .execute(pool)
        .await?;
    }

    let today = Utc::now().date_naive();
    let students = vec![
        (
            "Sunrise Public School",
            "Avni Sharma",
            "SPS-101",
            "avni.sharma@sunrise.example.com",
            "9000000101",
            NaiveDate::from_ymd_opt(2010, 6, 1).context("invalid date")?,
            "Class 10",
            "2026",
            "regular",
            50_000_i64,
            30_000_i64,
            today + chrono::Duration::days(5),
        ),
        (
            "Sunrise Public School",
            "Dev Patel",
            "SPS-102",
            "dev.patel@sunrise.example.com",
            "9000000102",
            NaiveDate::from_ymd_opt(2010, 9, 23).context("invalid date")?,
            "Class 10",
            "2026",
            "hosteller",
            45_000_i64,
            10_000_i64,
            today - chrono::Duration::days(12),
        ),
        (
            "Sunrise Public School",
            "Meera Iyer",
            "SPS-103",
            "meera.iyer@sunrise.example.com",
            "9000000103",
            NaiveDate::from_ymd_opt(2011, 2, 14).context("invalid date")?,
            "Class 9",
            "2027",
            "scholarship",
            40_000_i64,
            40_000_i64,
            today - chrono::Duration::days(30),
        ),
        (
            "Green Valley Academy",
            "Rohan Das",
            "GVA-201",
            "rohan.das@greenvalley.example.com",
            "9000000201",
            NaiveDate::from_ymd_opt(2009, 11, 2).context("invalid date")?,
            "Class 11",
            "2025",
            "regular",
            60_000_i64,
            15_000_i64,
            today + chrono::Duration::days(2),
        ),
        (
            "Green Valley Academy",
            "Ira Nair",
            "GVA-202",
            "ira.nair@greenvalley.example.com",
            "9000000202",
            NaiveDate::from_ymd_opt(2009, 4, 18).context("invalid date")?,
            "Class 11",
            "2025",
            "regular",
            60_000_i64,
            55_000_i64,
            today + chrono::Duration::days(25),
        ),
    ];

    for (
        tenant_name,
        full_name,
        roll_number,
        email,
        phone,
        date_of_birth,
        class_name,
        batch,
        category,
        total_fees,
        paid_fees,
        due_date,
    ) in students
    {
        let tenant_id: Uuid =
            sqlx::query("SELECT id FROM fee_insights.tenants WHERE name = $1")
                .bind(tenant_name)
                .fetch_one(pool)
                .await?
                .get("id");

        let status = FeeStatus::derive(paid_fees, total_fees, due_date, today);

        sqlx::query(
            r#"
            INSERT INTO fee_insights.students
            (id, tenant_id, full_name, roll_number, email, phone, date_of_birth,
             class_name, batch, category, total_fees, paid_fees, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (email) DO UPDATE
            SET total_fees = EXCLUDED.total_fees, paid_fees = EXCLUDED.paid_fees,
                due_date = EXCLUDED.due_date, status = EXCLUDED.status
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(full_name)
        .bind(roll_number)
        .bind(email)
        .bind(phone)
        .bind(date_of_birth)
        .bind(class_name)
        .bind(batch)
        .bind(category)
        .bind(total_fees)
        .bind(paid_fees)
        .bind(due_date)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn fetch_students(
    pool: &PgPool,
    tenant: Option<&str>,
) -> anyhow::Result<Vec<Student>> {
    let mut query = String::from(
        "SELECT s.id, s.tenant_id, s.full_name, s.roll_number, s.email, s.phone, \
         s.date_of_birth, s.class_name, s.batch, s.category, s.total_fees, \
         s.paid_fees, s.due_date, s.status \
         FROM fee_insights.students s \
         JOIN fee_insights.tenants t ON t.id = s.tenant_id \
         WHERE t.is_active",
    );

    if tenant.is_some() {
        query.push_str(" AND t.name = $1");
    }
    query.push_str(" ORDER BY s.roll_number");

    let mut rows = sqlx::query(&query);
    if let Some(value) = tenant {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    debug!(count = records.len(), tenant = tenant.unwrap_or("all"), "fetched roster");

    let mut students = Vec::new();
    for row in records {
        let category: String = row.get("category");
        let status: String = row.get("status");
        students.push(Student {
            id: row.get("id"),
            tenant_id: row.get("tenant_id"),
            full_name: row.get("full_name"),
            roll_number: row.get("roll_number"),
            email: row.get("email"),
            phone: row.get("phone"),
            date_of_birth: row.get("date_of_birth"),
            class_name: row.get("class_name"),
            batch: row.get("batch"),
            category: category.parse::<StudentCategory>()?,
            total_fees: row.get("total_fees"),
            paid_fees: row.get("paid_fees"),
            due_date: row.get("due_date"),
            status: status.parse::<FeeStatus>()?,
        });
    }

    Ok(students)
}

/// Record a completed payment for the student owning `email`, bump the paid
/// total and re-derive the fee status. Student mutation lives here and
/// nowhere else.
pub async fn record_payment(
    pool: &PgPool,
    email: &str,
    amount: i64,
    method: PaymentMethod,
) -> anyhow::Result<Payment> {
    if amount <= 0 {
        return Err(EngineError::Validation(format!(
            "payment amount must be positive, got {amount}"
        ))
        .into());
    }

    let row = sqlx::query(
        "SELECT id, total_fees, paid_fees, due_date FROM fee_insights.students WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| EngineError::NotFound(format!("no student with email '{email}'")))?;

    let student_id: Uuid = row.get("id");
    let total_fees: i64 = row.get("total_fees");
    let paid_fees: i64 = row.get("paid_fees");
    let due_date: NaiveDate = row.get("due_date");

    let today = Utc::now().date_naive();
    let payment = Payment {
        id: Uuid::new_v4(),
        student_id,
        amount,
        paid_on: today,
        method,
        status: PaymentStatus::Completed,
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO fee_insights.payments (id, student_id, amount, paid_on, method, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(payment.id)
    .bind(payment.student_id)
    .bind(payment.amount)
    .bind(payment.paid_on)
    .bind(payment.method.as_str())
    .bind(payment.status.as_str())
    .execute(&mut *tx)
    .await?;

    let new_paid = paid_fees + amount;
    let status = FeeStatus::derive(new_paid, total_fees, due_date, today);

    sqlx::query(
        "UPDATE fee_insights.students SET paid_fees = $1, status = $2 WHERE id = $3",
    )
    .bind(new_paid)
    .bind(status.as_str())
    .bind(student_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    debug!(%student_id, amount, "payment recorded");

    Ok(payment)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        tenant: String,
        full_name: String,
        roll_number: String,
        email: String,
        phone: String,
        date_of_birth: NaiveDate,
        class_name: String,
        batch: String,
        category: String,
        total_fees: i64,
        paid_fees: i64,
        due_date: NaiveDate,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let today = Utc::now().date_naive();
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        // reject bad category strings before touching the database
        let category = row.category.parse::<StudentCategory>()?;

        let tenant_id: Uuid = sqlx::query(
            r#"
            INSERT INTO fee_insights.tenants (id, name, admin_email, plan, billing_date, is_active)
            VALUES ($1, $2, $3, 'standard', $4, TRUE)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.tenant)
        .bind(format!("admin@{}.example.com", row.tenant.to_lowercase().replace(' ', "-")))
        .bind(today)
        .fetch_one(pool)
        .await?
        .get("id");

        let status = FeeStatus::derive(row.paid_fees, row.total_fees, row.due_date, today);

        let result = sqlx::query(
            r#"
            INSERT INTO fee_insights.students
            (id, tenant_id, full_name, roll_number, email, phone, date_of_birth,
             class_name, batch, category, total_fees, paid_fees, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(&row.full_name)
        .bind(&row.roll_number)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(row.date_of_birth)
        .bind(&row.class_name)
        .bind(&row.batch)
        .bind(category.as_str())
        .bind(row.total_fees)
        .bind(row.paid_fees)
        .bind(row.due_date)
        .bind(status.as_str())
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
