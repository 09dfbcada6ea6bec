// CLI Configuration - Convert CLI args to runner config
// Principle: Clear mapping between user input and internal configuration

use crate::cli::RunCmd;
use crate::sim::SessionConfig;
use std::time::Duration;

/// Complete runner configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Engine configuration (probabilities, capacities, seed)
    pub session: SessionConfig,

    /// Per-panel tick intervals
    pub rf_tick: Duration,
    pub emergency_tick: Duration,
    pub mining_tick: Duration,
    pub vitals_tick: Duration,

    /// Cadence of state summaries / snapshot emission
    pub stats_interval: Duration,

    /// Emit full JSON snapshots instead of summaries
    pub json: bool,

    /// Demo transfer cadence; None disables
    pub auto_send: Option<Duration>,

    /// Connect the wallet collaborator at startup
    pub connect_wallet: bool,

    /// Stop the session after this long; None runs until ctrl-c
    pub run_for: Option<Duration>,
}

impl RunnerConfig {
    /// Create configuration from the CLI run command
    pub fn from_run_cmd(cmd: &RunCmd) -> Result<Self, ConfigError> {
        for (name, ms) in [
            ("rf-tick-ms", cmd.rf_tick_ms),
            ("emergency-tick-ms", cmd.emergency_tick_ms),
            ("mining-tick-ms", cmd.mining_tick_ms),
            ("vitals-tick-ms", cmd.vitals_tick_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::ZeroInterval(name));
            }
        }
        if cmd.stats_secs == 0 {
            return Err(ConfigError::ZeroInterval("stats-secs"));
        }

        let session = SessionConfig {
            seed: cmd.seed,
            ..Default::default()
        };

        Ok(Self {
            session,
            rf_tick: Duration::from_millis(cmd.rf_tick_ms),
            emergency_tick: Duration::from_millis(cmd.emergency_tick_ms),
            mining_tick: Duration::from_millis(cmd.mining_tick_ms),
            vitals_tick: Duration::from_millis(cmd.vitals_tick_ms),
            stats_interval: Duration::from_secs(cmd.stats_secs),
            json: cmd.json,
            auto_send: (cmd.auto_send_secs > 0)
                .then(|| Duration::from_secs(cmd.auto_send_secs)),
            connect_wallet: !cmd.no_wallet,
            run_for: cmd.duration_secs.map(Duration::from_secs),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("interval --{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_cmd() -> RunCmd {
        RunCmd {
            seed: Some(7),
            rf_tick_ms: 2500,
            emergency_tick_ms: 2500,
            mining_tick_ms: 1500,
            vitals_tick_ms: 3000,
            stats_secs: 10,
            json: false,
            auto_send_secs: 20,
            no_wallet: false,
            duration_secs: None,
        }
    }

    #[test]
    fn test_from_run_cmd_defaults() {
        let config = RunnerConfig::from_run_cmd(&run_cmd()).unwrap();

        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.rf_tick, Duration::from_millis(2500));
        assert_eq!(config.mining_tick, Duration::from_millis(1500));
        assert_eq!(config.auto_send, Some(Duration::from_secs(20)));
        assert!(config.connect_wallet);
        assert!(config.run_for.is_none());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut cmd = run_cmd();
        cmd.mining_tick_ms = 0;

        let result = RunnerConfig::from_run_cmd(&cmd);
        assert!(matches!(result, Err(ConfigError::ZeroInterval("mining-tick-ms"))));
    }

    #[test]
    fn test_auto_send_disabled_by_zero() {
        let mut cmd = run_cmd();
        cmd.auto_send_secs = 0;

        let config = RunnerConfig::from_run_cmd(&cmd).unwrap();
        assert!(config.auto_send.is_none());
    }

    #[test]
    fn test_no_wallet_flag() {
        let mut cmd = run_cmd();
        cmd.no_wallet = true;

        let config = RunnerConfig::from_run_cmd(&cmd).unwrap();
        assert!(!config.connect_wallet);
    }
}
