use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Args {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub secret: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_database_path() -> String {
    "staffdir.sqlite".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_admin_password() -> String {
    "admin123".to_string()
}
