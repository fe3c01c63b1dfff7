use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::Error;
use crate::types::user::Role;

#[derive(Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterData {
    pub username: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Deserialize, Default)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// Employee fields as submitted by the client. Required fields are kept
/// optional here so presence is checked by the service, which reports a
/// field-level validation error instead of a deserialization failure.
#[derive(Deserialize, Default, Clone)]
pub struct EmployeeData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// A validated employee payload, ready to be written.
#[derive(Debug)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub department: String,
    pub hire_date: NaiveDate,
    pub salary: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl EmployeeData {
    pub fn validate(self) -> Result<NewEmployee, Error> {
        let first_name = required(self.first_name, "first_name")?;
        let last_name = required(self.last_name, "last_name")?;
        let email = required(self.email, "email")?;
        let position = required(self.position, "position")?;
        let department = required(self.department, "department")?;

        let hire_date = self
            .hire_date
            .ok_or_else(|| Error::Validation("hire_date is required".to_string()))?;

        if let Some(salary) = self.salary {
            if salary < 0.0 {
                return Err(Error::Validation("salary must not be negative".to_string()));
            }
        }

        Ok(NewEmployee {
            first_name,
            last_name,
            email,
            phone: self.phone,
            position,
            department,
            hire_date,
            salary: self.salary,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Validation(format!("{} is required", field))),
    }
}
