//! Process-wide tracing setup: console output filtered by `RUST_LOG`, plus an
//! optional rolling file for `http.access` events.

use once_cell::sync::OnceCell;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Target used by the HTTP access log middleware.
pub const ACCESS_TARGET: &str = "http.access";

static ACCESS_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Minutely,
    Hourly,
    Daily,
}

impl Rotation {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hourly" => Rotation::Hourly,
            "minutely" => Rotation::Minutely,
            _ => Rotation::Daily,
        }
    }
}

/// Where rolled access log files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRoll {
    pub dir: String,
    pub prefix: String,
    pub rotation: Rotation,
}

impl AccessRoll {
    /// `None` unless `EMBLM_ACCESS_LOG_ROLL=1`.
    pub fn from_env() -> Option<Self> {
        if std::env::var("EMBLM_ACCESS_LOG_ROLL").ok().as_deref() != Some("1") {
            return None;
        }
        let dir = std::env::var("EMBLM_ACCESS_LOG_DIR")
            .ok()
            .or_else(|| std::env::var("EMBLM_LOGS_DIR").ok())
            .unwrap_or_else(|| "logs".to_string());
        let prefix =
            std::env::var("EMBLM_ACCESS_LOG_PREFIX").unwrap_or_else(|_| "http-access".into());
        let rotation = std::env::var("EMBLM_ACCESS_LOG_ROTATION")
            .map(|r| Rotation::parse(&r))
            .unwrap_or(Rotation::Daily);
        Some(Self {
            dir,
            prefix,
            rotation,
        })
    }

    fn writer(&self) -> tracing_appender::rolling::RollingFileAppender {
        match self.rotation {
            Rotation::Hourly => tracing_appender::rolling::hourly(&self.dir, &self.prefix),
            Rotation::Minutely => tracing_appender::rolling::minutely(&self.dir, &self.prefix),
            Rotation::Daily => tracing_appender::rolling::daily(&self.dir, &self.prefix),
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(fmt::layer().with_filter(filter));

    let Some(roll) = AccessRoll::from_env() else {
        let _ = registry.try_init();
        return;
    };
    if std::fs::create_dir_all(&roll.dir).is_err() {
        eprintln!("emblm: failed to create access log directory {}", roll.dir);
    }
    let (nb, guard) = tracing_appender::non_blocking(roll.writer());
    let _ = ACCESS_GUARD.set(guard);
    let targets = Targets::new().with_target(ACCESS_TARGET, tracing::Level::INFO);
    let access_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(nb)
        .with_filter(targets);
    let _ = registry.with(access_layer).try_init();
    tracing::debug!(dir = %roll.dir, prefix = %roll.prefix, "access log rolling enabled");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_defaults_to_daily() {
        assert_eq!(Rotation::parse("HOURLY"), Rotation::Hourly);
        assert_eq!(Rotation::parse(" minutely "), Rotation::Minutely);
        assert_eq!(Rotation::parse("weekly"), Rotation::Daily);
        assert_eq!(Rotation::parse(""), Rotation::Daily);
    }
}
