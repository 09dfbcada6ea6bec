// System vitals - bunker-wide health readings and alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate bunker condition, derived from vitals every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Operational,
    Degraded,
    Critical,
    Offline,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Operational => write!(f, "OPERATIONAL"),
            OverallStatus::Degraded => write!(f, "DEGRADED"),
            OverallStatus::Critical => write!(f, "CRITICAL"),
            OverallStatus::Offline => write!(f, "OFFLINE"),
        }
    }
}

/// Mutable singleton of bunker health readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemVitals {
    /// Derived aggregate status
    pub overall_status: OverallStatus,

    /// Session uptime in hours
    pub uptime_hours: f64,

    /// System load, 30-95
    pub system_load_pct: f64,

    /// Interior temperature in Celsius, 18-28
    pub temperature_c: f64,

    /// Relative humidity, 35-65
    pub humidity_pct: f64,

    /// Air pressure in hPa, 1005-1025
    pub air_pressure_hpa: f64,

    /// Structural seal integrity, 85-100; degrades very slowly
    pub bunker_integrity_pct: f64,

    /// Subsystems currently operational, 8-14
    pub operational_systems: u32,

    /// Total subsystems installed
    pub total_systems: u32,
}

impl SystemVitals {
    /// Initial readings for a fresh session
    pub fn new() -> Self {
        Self {
            overall_status: OverallStatus::Operational,
            uptime_hours: 0.0,
            system_load_pct: 68.0,
            temperature_c: 22.5,
            humidity_pct: 45.0,
            air_pressure_hpa: 1013.2,
            bunker_integrity_pct: 94.0,
            operational_systems: 12,
            total_systems: 14,
        }
    }
}

impl Default for SystemVitals {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ALERTS
// =============================================================================

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl AlertLevel {
    /// All levels, for uniform sampling
    pub const ALL: [AlertLevel; 4] = [
        AlertLevel::Info,
        AlertLevel::Warning,
        AlertLevel::Error,
        AlertLevel::Critical,
    ];
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Info => write!(f, "INFO"),
            AlertLevel::Warning => write!(f, "WARNING"),
            AlertLevel::Error => write!(f, "ERROR"),
            AlertLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A generated system alert, immutable once raised
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAlert {
    /// Identifier ("ALT042")
    pub id: String,

    /// Severity
    pub level: AlertLevel,

    /// Originating subsystem tag
    pub system: String,

    /// Human-readable message
    pub message: String,

    /// When the alert was raised
    pub raised_at: DateTime<Utc>,
}
