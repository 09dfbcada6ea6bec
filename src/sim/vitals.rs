// Vitals engine - bunker-wide health readings, alerts and diagnostics

use super::activity::ActivityLog;
use super::rng::SimRng;
use crate::types::{AlertLevel, OverallStatus, SystemAlert, SystemVitals};
use chrono::Utc;
use std::collections::VecDeque;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Subsystem tags alerts can originate from
const ALERT_SYSTEMS: [&str; 7] = [
    "POWER",
    "NETWORK",
    "MINING",
    "RF",
    "EMERGENCY",
    "LIFE_SUPPORT",
    "SECURITY",
];

const INFO_MESSAGES: [&str; 4] = [
    "System check completed successfully",
    "Backup systems tested OK",
    "Maintenance cycle completed",
    "Performance optimization applied",
];

const WARNING_MESSAGES: [&str; 4] = [
    "System load elevated",
    "Environmental readings fluctuating",
    "Backup system activation required",
    "Maintenance due soon",
];

const ERROR_MESSAGES: [&str; 4] = [
    "System component failure detected",
    "Connection timeout occurred",
    "Critical threshold exceeded",
    "Backup system malfunction",
];

const CRITICAL_MESSAGES: [&str; 4] = [
    "Emergency protocols activated",
    "System failure imminent",
    "Life support systems compromised",
    "Immediate attention required",
];

/// Tuning for vitals evolution
#[derive(Debug, Clone)]
pub struct VitalsConfig {
    /// System load walk width and bounds
    pub load_walk_width: f64,
    pub load_min: f64,
    pub load_max: f64,

    /// Temperature nominal centre, walk width and bounds
    pub temperature_nominal_c: f64,
    pub temperature_walk_width: f64,
    pub temperature_min_c: f64,
    pub temperature_max_c: f64,

    /// Humidity nominal centre, walk width and bounds
    pub humidity_nominal_pct: f64,
    pub humidity_walk_width: f64,
    pub humidity_min_pct: f64,
    pub humidity_max_pct: f64,

    /// Air pressure nominal centre, walk width and bounds
    pub pressure_nominal_hpa: f64,
    pub pressure_walk_width: f64,
    pub pressure_min_hpa: f64,
    pub pressure_max_hpa: f64,

    /// Chance per tick that seal integrity degrades, amount, and floor
    pub integrity_decay_chance: f64,
    pub integrity_decay_pct: f64,
    pub integrity_floor_pct: f64,

    /// Chance per tick the operational-system count steps, and the chance
    /// that step is upward
    pub systems_step_chance: f64,
    pub systems_recover_chance: f64,
    pub systems_min: u32,

    /// Uptime accrued per tick, in hours
    pub uptime_per_tick_hours: f64,

    /// Alert generation chance and retained alerts
    pub alert_chance: f64,
    pub alert_capacity: usize,

    /// Diagnostics log chance and capacity
    pub log_chance: f64,
    pub log_capacity: usize,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            load_walk_width: 8.0,
            load_min: 30.0,
            load_max: 95.0,
            temperature_nominal_c: 22.5,
            temperature_walk_width: 2.0,
            temperature_min_c: 18.0,
            temperature_max_c: 28.0,
            humidity_nominal_pct: 45.0,
            humidity_walk_width: 8.0,
            humidity_min_pct: 35.0,
            humidity_max_pct: 65.0,
            pressure_nominal_hpa: 1013.2,
            pressure_walk_width: 4.0,
            pressure_min_hpa: 1005.0,
            pressure_max_hpa: 1025.0,
            integrity_decay_chance: 0.02,
            integrity_decay_pct: 0.1,
            integrity_floor_pct: 85.0,
            systems_step_chance: 0.05,
            systems_recover_chance: 0.70,
            systems_min: 8,
            uptime_per_tick_hours: 0.01,
            alert_chance: 0.10,
            alert_capacity: 5,
            log_chance: 0.15,
            log_capacity: 6,
        }
    }
}

// =============================================================================
// STATUS DERIVATION
// =============================================================================

/// Derive the aggregate status from operational ratio and load
pub fn derive_overall_status(operational: u32, total: u32, load_pct: f64) -> OverallStatus {
    let operational_pct = (operational as f64 / total.max(1) as f64) * 100.0;

    if operational_pct >= 85.0 && load_pct < 85.0 {
        OverallStatus::Operational
    } else if operational_pct >= 70.0 || load_pct < 90.0 {
        OverallStatus::Degraded
    } else if operational_pct >= 50.0 {
        OverallStatus::Critical
    } else {
        OverallStatus::Offline
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Owns the vitals singleton, raised alerts and the diagnostics log
pub struct VitalsEngine {
    config: VitalsConfig,
    vitals: SystemVitals,

    /// Raised alerts, newest first
    alerts: VecDeque<SystemAlert>,

    log: ActivityLog,
}

impl VitalsEngine {
    pub fn new(config: VitalsConfig) -> Self {
        let vitals = SystemVitals::new();
        let log = ActivityLog::with_lines(
            config.log_capacity,
            [
                "> SYSTEM DIAGNOSTICS RUNNING...".to_string(),
                "> ALL CRITICAL SYSTEMS: NOMINAL".to_string(),
                format!("> BUNKER SEAL INTEGRITY: {:.0}%", vitals.bunker_integrity_pct),
                "> ENVIRONMENTAL CONTROLS: ACTIVE".to_string(),
            ],
        );

        Self {
            config,
            vitals,
            alerts: VecDeque::new(),
            log,
        }
    }

    pub fn vitals(&self) -> &SystemVitals {
        &self.vitals
    }

    /// Raised alerts, newest first
    pub fn alerts(&self) -> Vec<SystemAlert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// One vitals tick
    pub fn tick(&mut self, rng: &mut SimRng) {
        let cfg = self.config.clone();
        let v = &mut self.vitals;

        v.uptime_hours += cfg.uptime_per_tick_hours;

        v.system_load_pct = rng.walk(
            v.system_load_pct,
            cfg.load_walk_width,
            cfg.load_min,
            cfg.load_max,
        );

        // Environmental readings recentre on their nominals
        v.temperature_c = rng.walk(
            cfg.temperature_nominal_c,
            cfg.temperature_walk_width,
            cfg.temperature_min_c,
            cfg.temperature_max_c,
        );
        v.humidity_pct = rng.walk(
            cfg.humidity_nominal_pct,
            cfg.humidity_walk_width,
            cfg.humidity_min_pct,
            cfg.humidity_max_pct,
        );
        v.air_pressure_hpa = rng.walk(
            cfg.pressure_nominal_hpa,
            cfg.pressure_walk_width,
            cfg.pressure_min_hpa,
            cfg.pressure_max_hpa,
        );

        // Seal integrity only ever degrades, very slowly
        if rng.chance(cfg.integrity_decay_chance) {
            v.bunker_integrity_pct =
                (v.bunker_integrity_pct - cfg.integrity_decay_pct).max(cfg.integrity_floor_pct);
        }

        if rng.chance(cfg.systems_step_chance) {
            v.operational_systems = if rng.chance(cfg.systems_recover_chance) {
                (v.operational_systems + 1).min(v.total_systems)
            } else {
                (v.operational_systems - 1).max(cfg.systems_min)
            };
        }

        v.overall_status =
            derive_overall_status(v.operational_systems, v.total_systems, v.system_load_pct);

        if rng.chance(cfg.alert_chance) {
            self.raise_alert(rng);
        }

        if rng.chance(cfg.log_chance) {
            self.push_log_line(rng);
        }
    }

    fn raise_alert(&mut self, rng: &mut SimRng) {
        let level = *rng.pick(&AlertLevel::ALL);
        let messages: &[&str] = match level {
            AlertLevel::Info => &INFO_MESSAGES,
            AlertLevel::Warning => &WARNING_MESSAGES,
            AlertLevel::Error => &ERROR_MESSAGES,
            AlertLevel::Critical => &CRITICAL_MESSAGES,
        };

        let alert = SystemAlert {
            id: format!("ALT{:03}", rng.range_u32(0, 1000)),
            level,
            system: (*rng.pick(&ALERT_SYSTEMS)).to_string(),
            message: (*rng.pick(messages)).to_string(),
            raised_at: Utc::now(),
        };

        if self.alerts.len() == self.config.alert_capacity {
            self.alerts.pop_back();
        }
        self.alerts.push_front(alert);
    }

    fn push_log_line(&mut self, rng: &mut SimRng) {
        let v = &self.vitals;
        let candidates = [
            format!("> SYSTEM LOAD: {:.1}%", v.system_load_pct),
            format!("> UPTIME: {:.1} HOURS", v.uptime_hours),
            format!("> TEMPERATURE: {:.1}°C", v.temperature_c),
            format!(
                "> OPERATIONAL SYSTEMS: {}/{}",
                v.operational_systems, v.total_systems
            ),
            format!("> BUNKER INTEGRITY: {:.1}%", v.bunker_integrity_pct),
            format!("> OVERALL STATUS: {}", v.overall_status),
            format!("> HUMIDITY: {:.1}%", v.humidity_pct),
            format!("> AIR PRESSURE: {:.1} hPa", v.air_pressure_hpa),
        ];

        let line = rng.pick(&candidates).clone();
        self.log.push(line);
    }
}

// =============================================================================
// TESTS
// =============================================================================
