use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("SCHOOLD_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        let db_path = std::env::var("SCHOOLD_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("school.sqlite3"));
        Self { port, db_path }
    }
}
