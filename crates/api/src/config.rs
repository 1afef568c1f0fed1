/// Runtime configuration, read once at startup.
///
/// Every knob defaults to something usable for local development, so a
/// bare `cargo run` works; deployments override through the
/// environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default `0.0.0.0`).
    pub host: String,
    /// Bind port (default `3000`).
    pub port: u16,
    /// Allowed CORS origins, comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Whole-request timeout in seconds (default `30`).
    pub request_timeout_secs: u64,
    /// Maximum number of detector invocations running at once,
    /// process-wide across all batches (default: `8`).
    pub detect_concurrency: usize,
    /// Lower bound on the stub detector's simulated latency in
    /// milliseconds (default: `50`).
    pub detect_min_delay_ms: u64,
    /// Upper bound on the stub detector's simulated latency in
    /// milliseconds (default: `400`).
    pub detect_max_delay_ms: u64,
    /// How long completed jobs are kept before eviction, in seconds
    /// (default: `3600`).
    pub job_ttl_secs: u64,
    /// How often the janitor sweeps for expired jobs, in seconds
    /// (default: `60`).
    pub job_sweep_interval_secs: u64,
    /// Directory containing the built frontend; served when it exists
    /// (default: `frontend_build`).
    pub frontend_dir: String,
}

impl ServerConfig {
    /// Read the configuration from the environment.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `DETECT_CONCURRENCY`      | `8`                        |
    /// | `DETECT_MIN_DELAY_MS`     | `50`                       |
    /// | `DETECT_MAX_DELAY_MS`     | `400`                      |
    /// | `JOB_TTL_SECS`            | `3600`                     |
    /// | `JOB_SWEEP_INTERVAL_SECS` | `60`                       |
    /// | `FRONTEND_DIR`            | `frontend_build`           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let detect_concurrency: usize = std::env::var("DETECT_CONCURRENCY")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("DETECT_CONCURRENCY must be a valid usize");

        let detect_min_delay_ms: u64 = std::env::var("DETECT_MIN_DELAY_MS")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("DETECT_MIN_DELAY_MS must be a valid u64");

        let detect_max_delay_ms: u64 = std::env::var("DETECT_MAX_DELAY_MS")
            .unwrap_or_else(|_| "400".into())
            .parse()
            .expect("DETECT_MAX_DELAY_MS must be a valid u64");

        let job_ttl_secs: u64 = std::env::var("JOB_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("JOB_TTL_SECS must be a valid u64");

        let job_sweep_interval_secs: u64 = std::env::var("JOB_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("JOB_SWEEP_INTERVAL_SECS must be a valid u64");

        let frontend_dir =
            std::env::var("FRONTEND_DIR").unwrap_or_else(|_| "frontend_build".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            detect_concurrency,
            detect_min_delay_ms,
            detect_max_delay_ms,
            job_ttl_secs,
            job_sweep_interval_secs,
            frontend_dir,
        }
    }
}
