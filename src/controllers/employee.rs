use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::Error;
use crate::types::request::NewEmployee;
use crate::types::response::Employee;

#[derive(Clone, Debug)]
pub struct EmployeeController {
    pool: SqlitePool,
}

impl EmployeeController {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Case-insensitive substring search over name, email, position and
    /// department. Newest rows first; id descending is the only ordering.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Employee>, Error> {
        let employees = match search {
            Some(term) if !term.is_empty() => {
                let pattern = format!("%{}%", term);

                sqlx::query_as::<_, Employee>(
                    "SELECT * FROM employees
                     WHERE first_name LIKE ?1
                        OR last_name LIKE ?1
                        OR email LIKE ?1
                        OR position LIKE ?1
                        OR department LIKE ?1
                     ORDER BY id DESC",
                )
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(employees)
    }

    pub async fn get(&self, id: i64) -> Result<Employee, Error> {
        match sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
        {
            Ok(employee) => Ok(employee),
            Err(sqlx::Error::RowNotFound) => Err(Error::EmployeeNotFound),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub async fn create(&self, data: NewEmployee) -> Result<Employee, Error> {
        if self.email_exists(&data.email, None).await? {
            return Err(Error::DuplicateEmail);
        }

        let now = Utc::now().naive_utc();

        // the UNIQUE index on email backstops the check above against a
        // concurrent create with the same address
        match sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (
                first_name, last_name, email, phone, position, department,
                hire_date, salary, address, city, state, zip, created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.position)
        .bind(&data.department)
        .bind(data.hire_date)
        .bind(data.salary)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state)
        .bind(&data.zip)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        {
            Ok(employee) => Ok(employee),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::DuplicateEmail)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub async fn update(&self, id: i64, data: NewEmployee) -> Result<Employee, Error> {
        let current = self.get(id).await?;

        if data.email != current.email && self.email_exists(&data.email, Some(id)).await? {
            return Err(Error::DuplicateEmail);
        }

        match sqlx::query_as::<_, Employee>(
            "UPDATE employees SET
                first_name = ?, last_name = ?, email = ?, phone = ?,
                position = ?, department = ?, hire_date = ?, salary = ?,
                address = ?, city = ?, state = ?, zip = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.position)
        .bind(&data.department)
        .bind(data.hire_date)
        .bind(data.salary)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state)
        .bind(&data.zip)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        {
            Ok(employee) => Ok(employee),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::DuplicateEmail)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::EmployeeNotFound);
        }

        Ok(())
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool, Error> {
        let existing: Option<i64> = match exclude_id {
            Some(id) => {
                sqlx::query_scalar("SELECT id FROM employees WHERE email = ? AND id != ?")
                    .bind(email)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT id FROM employees WHERE email = ?")
                    .bind(email)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(existing.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::EmployeeData;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn controller() -> EmployeeController {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::migrate!().run(&pool).await.unwrap();

        EmployeeController::new(pool)
    }

    fn employee(first: &str, last: &str, email: &str, position: &str, dept: &str) -> NewEmployee {
        EmployeeData {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: Some(email.to_string()),
            position: Some(position.to_string()),
            department: Some(dept.to_string()),
            hire_date: Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_the_stored_row() {
        let employees = controller().await;

        let mut data = employee("Ana", "Lee", "ana@x.com", "Eng", "R&D");
        data.phone = Some("555-000-1111".to_string());
        data.salary = Some(90000.0);

        let created = employees.create(data).await.unwrap();
        let fetched = employees.get(created.id).await.unwrap();

        assert_eq!(fetched.first_name, "Ana");
        assert_eq!(fetched.last_name, "Lee");
        assert_eq!(fetched.email, "ana@x.com");
        assert_eq!(fetched.phone.as_deref(), Some("555-000-1111"));
        assert_eq!(fetched.salary, Some(90000.0));
        assert_eq!(
            fetched.hire_date,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn missing_required_fields_fail_validation() {
        let data = EmployeeData {
            first_name: Some("Ana".to_string()),
            email: Some("ana@x.com".to_string()),
            ..Default::default()
        };

        let err = data.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = EmployeeData {
            salary: Some(-1.0),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_email_on_create_is_a_conflict() {
        let employees = controller().await;

        employees
            .create(employee("Ana", "Lee", "ana@x.com", "Eng", "R&D"))
            .await
            .unwrap();

        let err = employees
            .create(employee("Ann", "Other", "ana@x.com", "Sales", "Sales"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail));

        employees
            .create(employee("Ann", "Other", "ann@x.com", "Sales", "Sales"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_email_collision_rules() {
        let employees = controller().await;

        let a = employees
            .create(employee("Ana", "Lee", "ana@x.com", "Eng", "R&D"))
            .await
            .unwrap();
        employees
            .create(employee("Bob", "Ray", "bob@x.com", "Eng", "R&D"))
            .await
            .unwrap();

        // taking B's email is a conflict
        let err = employees
            .update(a.id, employee("Ana", "Lee", "bob@x.com", "Eng", "R&D"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail));

        // keeping her own email is not
        let updated = employees
            .update(a.id, employee("Ana", "Lee", "ana@x.com", "Staff Eng", "R&D"))
            .await
            .unwrap();
        assert_eq!(updated.position, "Staff Eng");
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.created_at, a.created_at);
        // every mutation must advance the timestamp
        assert!(updated.updated_at > a.updated_at);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_rows_are_not_found() {
        let employees = controller().await;

        let err = employees
            .update(999, employee("Ana", "Lee", "ana@x.com", "Eng", "R&D"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmployeeNotFound));

        let err = employees.delete(999).await.unwrap_err();
        assert!(matches!(err, Error::EmployeeNotFound));

        let err = employees.get(999).await.unwrap_err();
        assert!(matches!(err, Error::EmployeeNotFound));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let employees = controller().await;

        let a = employees
            .create(employee("Ana", "Lee", "ana@x.com", "Eng", "R&D"))
            .await
            .unwrap();

        employees.delete(a.id).await.unwrap();

        let err = employees.get(a.id).await.unwrap_err();
        assert!(matches!(err, Error::EmployeeNotFound));
    }

    #[tokio::test]
    async fn search_matches_five_fields_case_insensitively() {
        let employees = controller().await;

        let doe = employees
            .create(employee("John", "Doe", "john@x.com", "Eng", "R&D"))
            .await
            .unwrap();
        let doebar = employees
            .create(employee("Jane", "Smith", "jane@doebar.com", "Eng", "R&D"))
            .await
            .unwrap();
        employees
            .create(employee("Mia", "Smith", "mia@x.com", "Eng", "R&D"))
            .await
            .unwrap();
        let dept = employees
            .create(employee("Zoe", "Quinn", "zoe@x.com", "Eng", "DOE liaison"))
            .await
            .unwrap();

        let hits = employees.list(Some("doe")).await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|e| e.id).collect();

        // descending id, five-field OR match
        assert_eq!(ids, vec![dept.id, doebar.id, doe.id]);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let employees = controller().await;

        let first = employees
            .create(employee("Ana", "Lee", "ana@x.com", "Eng", "R&D"))
            .await
            .unwrap();
        let second = employees
            .create(employee("Bob", "Ray", "bob@x.com", "Eng", "R&D"))
            .await
            .unwrap();

        let all = employees.list(None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let none = employees.list(Some("zzz")).await.unwrap();
        assert!(none.is_empty());
    }
}
