//! Top-level simulation configuration.

use crate::{CoreError, CoreResult, Tick};

/// Fleet simulation configuration.
///
/// Typically loaded from a JSON file by the application binary (with the
/// `serde` feature) and handed to the fleet builder.  Missing fields fall
/// back to [`FleetConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    /// Charge percentage gained per tick while charging.  With the default of
    /// 20 an empty robot is full after five ticks.
    pub charge_per_tick: u8,

    /// Ticks simulated by `Fleet::run`.
    pub total_ticks: u64,

    /// Master RNG seed for applications that dispatch randomly.
    pub seed: u64,

    /// Emit a status snapshot every N ticks.  1 = every tick.
    pub output_interval_ticks: u64,
}

impl FleetConfig {
    /// The tick at which `Fleet::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Reject values that would stall charging or snapshotting.
    pub fn validate(&self) -> CoreResult<()> {
        if self.charge_per_tick == 0 {
            return Err(CoreError::Config("charge_per_tick must be at least 1".into()));
        }
        if self.output_interval_ticks == 0 {
            return Err(CoreError::Config("output_interval_ticks must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            charge_per_tick:       20,
            total_ticks:           100,
            seed:                  42,
            output_interval_ticks: 1,
        }
    }
}
