use std::time::Duration;

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn connect_timeout() -> Duration {
    Duration::from_secs(env_u64("EMBLM_HTTP_CONNECT_TIMEOUT_SECS", 3).max(1))
}

fn pool_idle() -> Duration {
    Duration::from_secs(env_u64("EMBLM_HTTP_POOL_IDLE_SECS", 90).max(1))
}

fn user_agent() -> String {
    format!("emblm-server/{}", env!("CARGO_PKG_VERSION"))
}

/// Outbound client for upstream APIs. `timeout` bounds each whole request.
pub fn client_with_timeout(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent())
        .connect_timeout(connect_timeout())
        .pool_idle_timeout(pool_idle())
        .timeout(timeout.max(Duration::from_secs(1)))
        .build()
}
