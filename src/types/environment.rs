// Environmental state - link conditions the bunker operates under

use super::primitives::NORMAL_FREQUENCY_MHZ;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// LINK STATES
// =============================================================================

/// Upstream internet connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    Online,
    Offline,
    Unstable,
}

impl Connectivity {
    /// All states, for uniform resampling
    pub const ALL: [Connectivity; 3] = [
        Connectivity::Online,
        Connectivity::Offline,
        Connectivity::Unstable,
    ];
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connectivity::Online => write!(f, "ONLINE"),
            Connectivity::Offline => write!(f, "OFFLINE"),
            Connectivity::Unstable => write!(f, "UNSTABLE"),
        }
    }
}

/// Satellite uplink state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SatelliteUplink {
    Connected,
    Disconnected,
    Searching,
}

impl SatelliteUplink {
    /// All states, for uniform resampling
    pub const ALL: [SatelliteUplink; 3] = [
        SatelliteUplink::Connected,
        SatelliteUplink::Disconnected,
        SatelliteUplink::Searching,
    ];
}

impl std::fmt::Display for SatelliteUplink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SatelliteUplink::Connected => write!(f, "CONNECTED"),
            SatelliteUplink::Disconnected => write!(f, "DISCONNECTED"),
            SatelliteUplink::Searching => write!(f, "SEARCHING"),
        }
    }
}

// =============================================================================
// PROTOCOL LEVEL
// =============================================================================

/// Derived emergency protocol level, ordered by severity
///
/// Never stored across ticks - always re-derived from the current
/// environmental state by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProtocolLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

impl std::fmt::Display for ProtocolLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolLevel::Green => write!(f, "GREEN"),
            ProtocolLevel::Yellow => write!(f, "YELLOW"),
            ProtocolLevel::Orange => write!(f, "ORANGE"),
            ProtocolLevel::Red => write!(f, "RED"),
        }
    }
}

// =============================================================================
// ENVIRONMENTAL STATE
// =============================================================================

/// Mutable singleton describing current link and antenna conditions
///
/// Invariant: every bounded field stays inside its documented range after
/// each update - evolution clamps, it never wraps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalState {
    /// Upstream internet connectivity
    pub connectivity: Connectivity,

    /// Satellite uplink state
    pub satellite_uplink: SatelliteUplink,

    /// Reachable mesh nodes, 0-8
    pub mesh_node_count: u8,

    /// Effective broadcast range in km, 20-80
    pub broadcast_range_km: f64,

    /// Received signal strength, 20-100
    pub signal_strength_pct: f64,

    /// Antenna alignment quality, 70-100
    pub antenna_alignment_pct: f64,

    /// Transmitter power output in watts, 20-100
    pub power_output_w: f64,

    /// Current carrier frequency (jitters around the normal frequency)
    pub frequency_mhz: f64,

    /// Whether the autonomous emergency beacon is currently broadcasting
    pub emergency_broadcast_active: bool,

    /// When the emergency beacon last activated
    pub last_emergency_broadcast: Option<DateTime<Utc>>,
}

impl EnvironmentalState {
    /// Initial conditions for a fresh session
    pub fn new() -> Self {
        Self {
            connectivity: Connectivity::Unstable,
            satellite_uplink: SatelliteUplink::Searching,
            mesh_node_count: 3,
            broadcast_range_km: 45.7,
            signal_strength_pct: 78.0,
            antenna_alignment_pct: 95.0,
            power_output_w: 45.0,
            frequency_mhz: NORMAL_FREQUENCY_MHZ,
            emergency_broadcast_active: false,
            last_emergency_broadcast: None,
        }
    }
}

impl Default for EnvironmentalState {
    fn default() -> Self {
        Self::new()
    }
}
