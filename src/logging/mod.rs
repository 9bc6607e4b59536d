//! Structured logging via `tracing`.
//!
//! Combat code only emits through the `tracing` macros:
//! - `trace!` for gated records and window expiry
//! - `debug!` for recorded moves, matches and timed attack bookkeeping
//! - `info!` for completed combos, finishers and special attacks
//!
//! This module owns subscriber setup. `RUST_LOG` wins over the config.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Once;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the subscriber when the app is built. Replaces bevy's
/// `LogPlugin`; disable that one when adding this.
#[derive(Default)]
pub struct LoggingPlugin {
    pub config: TracingConfig,
}

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing(&self.config);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&LevelFilter::from(*self), f)
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub level: LogLevel,
    /// Per-target overrides, e.g. `brawler_core::combat` => `Trace`
    pub targets: BTreeMap<String, LogLevel>,
    pub show_targets: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            targets: BTreeMap::new(),
            show_targets: true,
        }
        .with_target("brawler_core::combat", LogLevel::Debug)
        .with_target("brawler_core::controller", LogLevel::Info)
        // Renderer noise
        .with_target("wgpu", LogLevel::Error)
        .with_target("naga", LogLevel::Warn)
    }
}

impl TracingConfig {
    pub fn with_target(mut self, target: impl Into<String>, level: LogLevel) -> Self {
        self.targets.insert(target.into(), level);
        self
    }

    /// `EnvFilter` directive string: the global level, then one
    /// `target=level` per override
    pub fn directives(&self) -> String {
        std::iter::once(self.level.to_string())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from(self.level).into())
            .parse_lossy(self.directives())
    }
}

static TRACING_INIT: Once = Once::new();

/// First call wins; later calls are no-ops.
pub fn init_tracing(config: &TracingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.env_filter());

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .compact()
            .try_init();

        if installed.is_ok() {
            tracing::debug!(directives = %config.directives(), "tracing initialised");
        }
    });
}
