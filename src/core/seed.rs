use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::core::error::ConfigError;

/// Bootstrap data: the `admin` account plus, on a completely empty
/// directory, a handful of sample employees. Safe to run on every startup.
pub async fn seed(pool: &SqlitePool, admin_password: &str) -> Result<(), ConfigError> {
    let admin_exists: bool = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE username = 'admin'")
        .map(|row: sqlx::sqlite::SqliteRow| row.get::<i64, _>("count") > 0)
        .fetch_one(pool)
        .await?;

    if !admin_exists {
        let password_hash = bcrypt::hash(admin_password, 12)?;

        sqlx::query("INSERT INTO users (username, password_hash, role) VALUES ('admin', ?, 'admin')")
            .bind(&password_hash)
            .execute(pool)
            .await?;

        tracing::info!("admin user created");
    }

    let employee_count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM employees")
        .map(|row: sqlx::sqlite::SqliteRow| row.get("count"))
        .fetch_one(pool)
        .await?;

    if employee_count == 0 {
        let samples = [
            (
                "John", "Doe", "john.doe@example.com", "555-123-4567",
                "Software Developer", "Engineering", "2021-01-15", 85000.0,
                "123 Main St", "Austin", "TX", "78701",
            ),
            (
                "Jane", "Smith", "jane.smith@example.com", "555-987-6543",
                "Product Manager", "Product", "2020-05-10", 95000.0,
                "456 Oak Ave", "San Francisco", "CA", "94107",
            ),
            (
                "Michael", "Johnson", "michael.johnson@example.com", "555-456-7890",
                "UX Designer", "Design", "2022-03-20", 78000.0,
                "789 Pine Blvd", "Seattle", "WA", "98101",
            ),
        ];

        let now = Utc::now().naive_utc();

        for (
            first_name, last_name, email, phone, position, department,
            hire_date, salary, address, city, state, zip,
        ) in samples
        {
            sqlx::query(
                "INSERT INTO employees (
                    first_name, last_name, email, phone, position, department,
                    hire_date, salary, address, city, state, zip, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(phone)
            .bind(position)
            .bind(department)
            .bind(hire_date)
            .bind(salary)
            .bind(address)
            .bind(city)
            .bind(state)
            .bind(zip)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await?;
        }

        tracing::info!("sample employees created");
    }

    Ok(())
}
