use sqlx::SqlitePool;

use crate::controllers::employee::EmployeeController;
use crate::controllers::user::UserController;
use crate::core::error::ConfigError;

#[derive(Clone, Debug)]
pub struct AppState {
    pub pool: SqlitePool,
    pub user_controller: UserController,
    pub employee_controller: EmployeeController,
}

impl AppState {
    pub fn new(pool: SqlitePool, secret: &str) -> Result<Self, ConfigError> {
        Ok(AppState {
            pool: pool.clone(),
            user_controller: UserController::new(pool.clone(), secret)?,
            employee_controller: EmployeeController::new(pool),
        })
    }
}
