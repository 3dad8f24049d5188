//! System configuration parameters
//!
//! All tunable parameters for the Firebot controller. The maneuver
//! durations and the remote dead-man window are hand-tuned values kept
//! literally as the behavioural contract.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Obstacle avoidance ---
    /// Obstacle closer than this (and above zero) triggers the escape maneuver
    pub obstacle_threshold_cm: u16,
    /// Reverse away from the obstacle (milliseconds)
    pub retreat_ms: u64,
    /// Pivot right after retreating (milliseconds)
    pub turn_away_ms: u64,
    /// Drive forward past the obstacle (milliseconds)
    pub advance_ms: u64,
    /// Pivot left back onto the original heading (milliseconds)
    pub return_ms: u64,

    // --- Remote ---
    /// Dead-man window: stop if no drive command arrives within this time
    pub remote_timeout_ms: u64,

    // --- Drive ---
    /// Speed magnitude for straight-line motion (0..=max_duty)
    pub cruise_speed: i16,
    /// Speed magnitude for pivot turns (0..=max_duty)
    pub turn_speed: i16,
    /// Largest legal PWM magnitude for the motor driver
    pub max_duty: i16,

    // --- Reservoir ---
    /// Ranger reading when the tank is empty (cm)
    pub reservoir_empty_cm: u16,
    /// Ranger reading when the tank is full (cm)
    pub reservoir_full_cm: u16,

    // --- Sensors ---
    /// Give up waiting for an ultrasonic echo after this long (µs)
    pub echo_timeout_us: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Obstacle avoidance
            obstacle_threshold_cm: 20,
            retreat_ms: 1000,
            turn_away_ms: 500,
            advance_ms: 2000,
            return_ms: 500,

            // Remote
            remote_timeout_ms: 5000,

            // Drive
            cruise_speed: 200,
            turn_speed: 180,
            max_duty: 255,

            // Reservoir
            reservoir_empty_cm: 20,
            reservoir_full_cm: 2,

            // Sensors
            echo_timeout_us: 30_000, // ~5 m round trip

            // Timing
            control_loop_interval_ms: 50, // 20 Hz
            telemetry_interval_secs: 10,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the robot unsafe or the maths undefined.
    /// Nothing is clamped here: a bad value is an error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.obstacle_threshold_cm == 0 {
            return Err(ConfigError::ValidationFailed("obstacle_threshold_cm must be > 0"));
        }
        if self.max_duty <= 0 {
            return Err(ConfigError::ValidationFailed("max_duty must be > 0"));
        }
        if !(0..=self.max_duty).contains(&self.cruise_speed) {
            return Err(ConfigError::ValidationFailed("cruise_speed outside 0..=max_duty"));
        }
        if !(0..=self.max_duty).contains(&self.turn_speed) {
            return Err(ConfigError::ValidationFailed("turn_speed outside 0..=max_duty"));
        }
        if self.reservoir_full_cm >= self.reservoir_empty_cm {
            return Err(ConfigError::ValidationFailed(
                "reservoir_full_cm must be below reservoir_empty_cm",
            ));
        }
        if self.remote_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("remote_timeout_ms must be > 0"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("control_loop_interval_ms must be > 0"));
        }
        if u64::from(self.control_loop_interval_ms) >= self.remote_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "control loop must tick faster than the remote timeout",
            ));
        }
        Ok(())
    }
}
