use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            db_path: PathBuf::from("cadastro.sqlite"),
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(10),
            default_page_size: 50,
            max_page_size: 500,
        }
    }
}
