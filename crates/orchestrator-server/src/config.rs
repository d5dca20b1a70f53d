//! Environment configuration for `orchestrator-server` (SPEC_FULL.md §6).

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub cors_origins: Vec<String>,
    pub worker_host_control_url: String,
    pub worker_host_id: String,
    pub object_store_base_url: String,
    pub idle_check_interval_sec: u64,
    pub idle_consecutive_samples: u32,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("ORC_DATABASE_URL").expect("ORC_DATABASE_URL must be set");
        let bind_addr = std::env::var("ORC_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

        let cors_origins = match std::env::var("ORC_CORS_ORIGINS") {
            Ok(v) if !v.trim().is_empty() => {
                v.split(',').map(|s| s.trim().to_string()).collect()
            }
            _ => vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        };

        let worker_host_control_url = std::env::var("ORC_WORKER_HOST_CONTROL_URL")
            .expect("ORC_WORKER_HOST_CONTROL_URL must be set");
        let worker_host_id =
            std::env::var("ORC_WORKER_HOST_ID").expect("ORC_WORKER_HOST_ID must be set");
        let object_store_base_url = std::env::var("ORC_OBJECT_STORE_BASE_URL")
            .expect("ORC_OBJECT_STORE_BASE_URL must be set");

        let idle_check_interval_sec: u64 = std::env::var("ORC_IDLE_CHECK_INTERVAL_SEC")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);
        let idle_consecutive_samples: u32 = std::env::var("ORC_IDLE_CONSECUTIVE_SAMPLES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(6);

        Self {
            database_url,
            bind_addr,
            cors_origins,
            worker_host_control_url,
            worker_host_id,
            object_store_base_url,
            idle_check_interval_sec,
            idle_consecutive_samples,
        }
    }
}
