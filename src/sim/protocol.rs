// Protocol-level resolver
//
// A pure function of the environmental state, evaluated in strict priority
// order with first match winning. Re-derived from scratch on every tick so
// the level can never get stuck on stale inputs.

use crate::types::{Connectivity, EnvironmentalState, ProtocolLevel, SatelliteUplink};

/// Mesh-node count below which the network is considered fragmented
const MESH_FRAGMENTATION_THRESHOLD: u8 = 2;

/// Resolve the emergency protocol level for the given conditions
///
/// Priority order (first match wins):
/// 1. Offline with no satellite uplink -> Red
/// 2. Unstable connectivity -> Yellow
/// 3. Fragmented mesh (< 2 nodes) -> Orange
/// 4. Otherwise -> Green
///
/// Total connectivity loss dominates even when the mesh is healthy.
pub fn resolve_protocol_level(env: &EnvironmentalState) -> ProtocolLevel {
    if env.connectivity == Connectivity::Offline
        && env.satellite_uplink == SatelliteUplink::Disconnected
    {
        return ProtocolLevel::Red;
    }
    if env.connectivity == Connectivity::Unstable {
        return ProtocolLevel::Yellow;
    }
    if env.mesh_node_count < MESH_FRAGMENTATION_THRESHOLD {
        return ProtocolLevel::Orange;
    }
    ProtocolLevel::Green
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(connectivity: Connectivity, uplink: SatelliteUplink, mesh: u8) -> EnvironmentalState {
        EnvironmentalState {
            connectivity,
            satellite_uplink: uplink,
            mesh_node_count: mesh,
            ..EnvironmentalState::new()
        }
    }

    #[test]
    fn test_red_on_total_loss() {
        let state = env(Connectivity::Offline, SatelliteUplink::Disconnected, 8);
        assert_eq!(resolve_protocol_level(&state), ProtocolLevel::Red);
    }

    #[test]
    fn test_red_dominates_mesh_health() {
        // A full mesh does not soften total connectivity loss
        for mesh in 0..=8 {
            let state = env(Connectivity::Offline, SatelliteUplink::Disconnected, mesh);
            assert_eq!(resolve_protocol_level(&state), ProtocolLevel::Red);
        }
    }

    #[test]
    fn test_yellow_on_unstable() {
        let state = env(Connectivity::Unstable, SatelliteUplink::Connected, 5);
        assert_eq!(resolve_protocol_level(&state), ProtocolLevel::Yellow);
    }

    #[test]
    fn test_unstable_beats_fragmented_mesh() {
        let state = env(Connectivity::Unstable, SatelliteUplink::Connected, 0);
        assert_eq!(resolve_protocol_level(&state), ProtocolLevel::Yellow);
    }

    #[test]
    fn test_orange_on_fragmented_mesh() {
        for mesh in 0..2 {
            let state = env(Connectivity::Online, SatelliteUplink::Connected, mesh);
            assert_eq!(resolve_protocol_level(&state), ProtocolLevel::Orange);
        }
    }

    #[test]
    fn test_green_otherwise() {
        let state = env(Connectivity::Online, SatelliteUplink::Connected, 5);
        assert_eq!(resolve_protocol_level(&state), ProtocolLevel::Green);
    }

    #[test]
    fn test_offline_with_uplink_is_not_red() {
        // Satellite still reachable: falls through to the mesh check
        let healthy = env(Connectivity::Offline, SatelliteUplink::Connected, 5);
        assert_eq!(resolve_protocol_level(&healthy), ProtocolLevel::Green);

        let fragmented = env(Connectivity::Offline, SatelliteUplink::Searching, 1);
        assert_eq!(resolve_protocol_level(&fragmented), ProtocolLevel::Orange);
    }

    #[test]
    fn test_pure_function_of_inputs() {
        // Same inputs, same level - independent of call history
        let state = env(Connectivity::Unstable, SatelliteUplink::Searching, 4);
        let first = resolve_protocol_level(&state);
        for _ in 0..10 {
            assert_eq!(resolve_protocol_level(&state), first);
        }
    }
}
