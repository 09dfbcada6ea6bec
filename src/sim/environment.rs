// Environment engine - bounded random walks over link and antenna state
//
// Two independent tick surfaces mutate the shared singleton: the RF tick
// evolves signal/antenna/power/frequency, the emergency tick evolves
// connectivity, uplink, mesh and range and applies the level-triggered
// emergency broadcast policy.

use super::activity::ActivityLog;
use super::rng::SimRng;
use crate::types::{
    Connectivity, EnvironmentalState, ProtocolLevel, SatelliteUplink, NORMAL_FREQUENCY_MHZ,
};
use chrono::Utc;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Tuning for environmental evolution
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Signal strength walk width (percent per tick)
    pub signal_walk_width: f64,

    /// Signal strength bounds
    pub signal_min: f64,
    pub signal_max: f64,

    /// Antenna alignment walk width
    pub antenna_walk_width: f64,

    /// Antenna alignment bounds
    pub antenna_min: f64,
    pub antenna_max: f64,

    /// Power output walk width
    pub power_walk_width: f64,

    /// Power output bounds
    pub power_min: f64,
    pub power_max: f64,

    /// Carrier frequency jitter width around the normal frequency
    pub frequency_jitter_width: f64,

    /// Per-tick chance connectivity is resampled uniformly
    pub connectivity_resample_chance: f64,

    /// Per-tick chance the satellite uplink is resampled uniformly
    pub uplink_resample_chance: f64,

    /// Mesh node count bounds
    pub mesh_max: u8,

    /// Broadcast range nominal centre and walk width
    pub range_nominal_km: f64,
    pub range_walk_width: f64,

    /// Broadcast range bounds
    pub range_min_km: f64,
    pub range_max_km: f64,

    /// Chance per tick that an Offline link activates the emergency beacon
    pub emergency_activation_chance: f64,

    /// Chance per tick of appending one emergency log line
    pub log_chance: f64,

    /// Emergency log capacity
    pub log_capacity: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            signal_walk_width: 15.0,
            signal_min: 20.0,
            signal_max: 100.0,
            antenna_walk_width: 5.0,
            antenna_min: 70.0,
            antenna_max: 100.0,
            power_walk_width: 10.0,
            power_min: 20.0,
            power_max: 100.0,
            frequency_jitter_width: 0.005,
            connectivity_resample_chance: 0.10,
            uplink_resample_chance: 0.08,
            mesh_max: 8,
            range_nominal_km: 45.7,
            range_walk_width: 10.0,
            range_min_km: 20.0,
            range_max_km: 80.0,
            emergency_activation_chance: 0.20,
            log_chance: 0.15,
            log_capacity: 6,
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Owns the environmental singleton and its activity log
pub struct EnvironmentEngine {
    config: EnvironmentConfig,
    state: EnvironmentalState,
    log: ActivityLog,
}

impl EnvironmentEngine {
    pub fn new(config: EnvironmentConfig) -> Self {
        let state = EnvironmentalState::new();
        let log = ActivityLog::with_lines(
            config.log_capacity,
            [
                "> EMERGENCY PROTOCOLS ACTIVE".to_string(),
                format!("> INTERNET CONNECTION: {}", state.connectivity),
                format!("> MESH NETWORK: {} NODES ACTIVE", state.mesh_node_count),
            ],
        );

        Self { config, state, log }
    }

    pub fn state(&self) -> &EnvironmentalState {
        &self.state
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Test hook: force link conditions directly
    #[cfg(test)]
    pub fn set_link_state(&mut self, connectivity: Connectivity, uplink: SatelliteUplink) {
        self.state.connectivity = connectivity;
        self.state.satellite_uplink = uplink;
    }

    /// Test hook: force the mesh node count
    #[cfg(test)]
    pub fn set_mesh_node_count(&mut self, count: u8) {
        self.state.mesh_node_count = count;
    }

    /// RF-tick evolution: signal, antenna, power and carrier frequency
    pub fn tick_rf_signals(&mut self, rng: &mut SimRng) {
        let cfg = &self.config;
        let s = &mut self.state;

        s.signal_strength_pct = rng.walk(
            s.signal_strength_pct,
            cfg.signal_walk_width,
            cfg.signal_min,
            cfg.signal_max,
        );
        s.antenna_alignment_pct = rng.walk(
            s.antenna_alignment_pct,
            cfg.antenna_walk_width,
            cfg.antenna_min,
            cfg.antenna_max,
        );
        s.power_output_w = rng.walk(
            s.power_output_w,
            cfg.power_walk_width,
            cfg.power_min,
            cfg.power_max,
        );
        // Jitter around the locked frequency, not a drifting walk
        s.frequency_mhz = NORMAL_FREQUENCY_MHZ + rng.drift(cfg.frequency_jitter_width);
    }

    /// Emergency-tick evolution: link states, mesh, range, beacon policy
    pub fn tick_link_state(&mut self, rng: &mut SimRng) {
        let cfg = &self.config;

        if rng.chance(cfg.connectivity_resample_chance) {
            self.state.connectivity = *rng.pick(&Connectivity::ALL);
        }
        if rng.chance(cfg.uplink_resample_chance) {
            self.state.satellite_uplink = *rng.pick(&SatelliteUplink::ALL);
        }

        let step = rng.step();
        self.state.mesh_node_count = self
            .state
            .mesh_node_count
            .saturating_add_signed(step)
            .min(cfg.mesh_max);

        // Stationary walk: recentred on the nominal range every tick
        self.state.broadcast_range_km = rng.walk(
            cfg.range_nominal_km,
            cfg.range_walk_width,
            cfg.range_min_km,
            cfg.range_max_km,
        );

        // Level-triggered beacon policy, recomputed from current connectivity
        match self.state.connectivity {
            Connectivity::Offline => {
                if rng.chance(cfg.emergency_activation_chance) {
                    self.state.emergency_broadcast_active = true;
                    self.state.last_emergency_broadcast = Some(Utc::now());
                }
            }
            Connectivity::Online => {
                self.state.emergency_broadcast_active = false;
            }
            Connectivity::Unstable => {}
        }
    }

    /// Maybe append one log line reflecting the current (already evolved)
    /// state and the freshly resolved protocol level
    pub fn observe(&mut self, rng: &mut SimRng, level: ProtocolLevel) {
        if !rng.chance(self.config.log_chance) {
            return;
        }

        let s = &self.state;
        let candidates = [
            format!("> INTERNET STATUS: {}", s.connectivity),
            format!(
                "> EMERGENCY BROADCAST: {}",
                if s.emergency_broadcast_active { "ACTIVE" } else { "STANDBY" }
            ),
            format!("> SATELLITE UPLINK: {}", s.satellite_uplink),
            format!("> MESH NODES: {} ACTIVE", s.mesh_node_count),
            format!("> BROADCAST RANGE: {:.1} KM", s.broadcast_range_km),
            format!("> PROTOCOL LEVEL: {}", level),
        ];

        let line = rng.pick(&candidates).clone();
        self.log.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticked_engine(seed: u64, ticks: usize) -> EnvironmentEngine {
        let mut engine = EnvironmentEngine::new(EnvironmentConfig::default());
        let mut rng = SimRng::seeded(seed);
        for _ in 0..ticks {
            engine.tick_rf_signals(&mut rng);
            engine.tick_link_state(&mut rng);
        }
        engine
    }

    #[test]
    fn test_bounded_fields_stay_in_range() {
        let mut engine = EnvironmentEngine::new(EnvironmentConfig::default());
        let mut rng = SimRng::seeded(17);

        for _ in 0..2_000 {
            engine.tick_rf_signals(&mut rng);
            engine.tick_link_state(&mut rng);

            let s = engine.state();
            assert!((20.0..=100.0).contains(&s.signal_strength_pct));
            assert!((70.0..=100.0).contains(&s.antenna_alignment_pct));
            assert!((20.0..=100.0).contains(&s.power_output_w));
            assert!((20.0..=80.0).contains(&s.broadcast_range_km));
            assert!(s.mesh_node_count <= 8);
            assert!((s.frequency_mhz - NORMAL_FREQUENCY_MHZ).abs() <= 0.0025 + 1e-9);
        }
    }

    #[test]
    fn test_link_states_eventually_change() {
        let engine = ticked_engine(23, 500);
        // After 500 ticks at a 10% resample chance the initial state is
        // astronomically unlikely to have survived untouched together with
        // the uplink; just assert the state remains a valid enum value.
        let s = engine.state();
        assert!(Connectivity::ALL.contains(&s.connectivity));
        assert!(SatelliteUplink::ALL.contains(&s.satellite_uplink));
    }

    #[test]
    fn test_online_forces_beacon_off() {
        let mut engine = EnvironmentEngine::new(EnvironmentConfig::default());
        let mut rng = SimRng::seeded(31);

        engine.state.emergency_broadcast_active = true;
        engine.set_link_state(Connectivity::Online, SatelliteUplink::Connected);

        let mut config = EnvironmentConfig::default();
        config.connectivity_resample_chance = 0.0;
        config.uplink_resample_chance = 0.0;
        engine.config = config;

        engine.tick_link_state(&mut rng);
        assert!(!engine.state().emergency_broadcast_active);
    }

    #[test]
    fn test_offline_activates_beacon_eventually() {
        let mut engine = EnvironmentEngine::new(EnvironmentConfig::default());
        let mut rng = SimRng::seeded(37);

        engine.set_link_state(Connectivity::Offline, SatelliteUplink::Disconnected);
        engine.config.connectivity_resample_chance = 0.0;
        engine.config.uplink_resample_chance = 0.0;

        for _ in 0..200 {
            engine.tick_link_state(&mut rng);
        }

        assert!(engine.state().emergency_broadcast_active);
        assert!(engine.state().last_emergency_broadcast.is_some());
    }

    #[test]
    fn test_unstable_leaves_beacon_latched() {
        let mut engine = EnvironmentEngine::new(EnvironmentConfig::default());
        let mut rng = SimRng::seeded(41);

        engine.state.emergency_broadcast_active = true;
        engine.set_link_state(Connectivity::Unstable, SatelliteUplink::Searching);
        engine.config.connectivity_resample_chance = 0.0;

        for _ in 0..50 {
            engine.tick_link_state(&mut rng);
        }

        assert!(engine.state().emergency_broadcast_active);
    }

    #[test]
    fn test_observe_appends_at_most_one_line() {
        let mut engine = EnvironmentEngine::new(EnvironmentConfig::default());
        engine.config.log_chance = 1.0;
        let mut rng = SimRng::seeded(43);

        let before = engine.log().len();
        engine.observe(&mut rng, ProtocolLevel::Green);
        assert_eq!(engine.log().len(), (before + 1).min(6));
    }
}
