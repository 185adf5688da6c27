//! Construction parameters for the actuator types.
//!
//! Each config carries defaults matching common hobby hardware and a
//! `validate()` step that runs before any sink is touched, so a rejected
//! configuration never leaves an actuator half-built.
//!
//! # Example
//!
//! ```rust
//! use motorkit::config::{ServoConfig, StepperConfig};
//!
//! // Use defaults
//! let stepper = StepperConfig::default();
//! assert_eq!(stepper.microsteps, 16);
//!
//! // Or customize
//! let stepper = StepperConfig::default().with_microsteps(8);
//! let servo = ServoConfig::default()
//!     .with_pulse_range(500, 2500)
//!     .with_actuation_range(270.0);
//! ```

/// Largest supported `microsteps` value.
///
/// The microstep curve is stored inline (no allocator), so the quarter-step
/// subdivision is capped. 128 is 8x the common default and far beyond the
/// resolution hobby drivers can use.
pub const MAX_MICROSTEPS: u16 = 128;

/// Reasons a configuration is rejected.
///
/// Returned by the `validate()` methods and wrapped by the actuator
/// constructors, so callers can tell a parameter mistake apart from a
/// hardware fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConfigError {
    /// Fewer than two microsteps per quarter step.
    MicrostepsTooSmall,
    /// Odd microstep counts cannot align with the half-step grid.
    MicrostepsOdd,
    /// More microsteps than the inline curve can hold ([`MAX_MICROSTEPS`]).
    MicrostepsTooLarge,
    /// Servo pulse range has `min_pulse_us >= max_pulse_us`.
    PulseRangeEmpty,
    /// Servo actuation range is zero or negative degrees.
    ActuationRangeEmpty,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::MicrostepsTooSmall => write!(f, "microsteps must be at least 2"),
            ConfigError::MicrostepsOdd => write!(f, "microsteps must be even"),
            ConfigError::MicrostepsTooLarge => {
                write!(f, "microsteps must be at most {}", MAX_MICROSTEPS)
            }
            ConfigError::PulseRangeEmpty => {
                write!(f, "min pulse width must be below max pulse width")
            }
            ConfigError::ActuationRangeEmpty => {
                write!(f, "actuation range must be positive")
            }
        }
    }
}

// ============================================================================
// Stepper Config
// ============================================================================

/// Stepper phase-engine configuration.
///
/// `microsteps` is the number of microsteps between two adjacent full steps
/// within one coil-energization quadrant. Higher values give finer
/// resolution at lower per-microstep torque.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepperConfig {
    /// Microsteps per quarter step. Must be even and in `2..=MAX_MICROSTEPS`.
    pub microsteps: u16,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self { microsteps: 16 }
    }
}

impl StepperConfig {
    /// Set the microstep subdivision.
    pub fn with_microsteps(mut self, microsteps: u16) -> Self {
        self.microsteps = microsteps;
        self
    }

    /// Check the configuration without building an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.microsteps < 2 {
            return Err(ConfigError::MicrostepsTooSmall);
        }
        if self.microsteps % 2 == 1 {
            return Err(ConfigError::MicrostepsOdd);
        }
        if self.microsteps > MAX_MICROSTEPS {
            return Err(ConfigError::MicrostepsTooLarge);
        }
        Ok(())
    }
}

// ============================================================================
// Servo Config
// ============================================================================

/// Servo pulse-width configuration.
///
/// The defaults of 750us-2250us typically give about 135 degrees of travel
/// on servos specified for 1000us-2000us; nearly all modern servos accept
/// pulses outside the historical range. Widening the window extends travel
/// but can run the mechanism into its end stops, so calibrate carefully.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServoConfig {
    /// Minimum pulse width in microseconds (commanded at fraction 0.0).
    pub min_pulse_us: u16,
    /// Maximum pulse width in microseconds (commanded at fraction 1.0).
    pub max_pulse_us: u16,
    /// Physical range of motion in degrees for the given pulse window.
    pub actuation_range: f32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 750,
            max_pulse_us: 2250,
            actuation_range: 180.0,
        }
    }
}

impl ServoConfig {
    /// Set the pulse width window.
    pub fn with_pulse_range(mut self, min_pulse_us: u16, max_pulse_us: u16) -> Self {
        self.min_pulse_us = min_pulse_us;
        self.max_pulse_us = max_pulse_us;
        self
    }

    /// Set the physical travel in degrees.
    pub fn with_actuation_range(mut self, degrees: f32) -> Self {
        self.actuation_range = degrees;
        self
    }

    /// Check the configuration without building a servo.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pulse_us >= self.max_pulse_us {
            return Err(ConfigError::PulseRangeEmpty);
        }
        if self.actuation_range <= 0.0 {
            return Err(ConfigError::ActuationRangeEmpty);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
