//! Stepper motor phase sequencing with sinusoidal microstepping.
//!
//! This module provides [`StepperMotor`], the four-coil phase engine for
//! bipolar stepper motors (or four-coil unipolars) driven through PWM. A
//! precomputed quarter-wave sine curve maps each microstep position onto a
//! pair of coil duty cycles, and a signed microstep counter tracks angular
//! position across arbitrary mixtures of step styles.
//!
//! # Overview
//!
//! The engine:
//! - Owns exactly four [`PwmSink`] coil outputs, energized together on
//!   every position change
//! - Converts a `step(direction, style)` request into a position delta,
//!   realigning to the half-step grid first when prior microstepping left
//!   the counter off-grid
//! - Re-energizes the leading/trailing coil pair from the curve, snapping
//!   coincident duties to full torque for non-microstep styles
//!
//! # Example
//!
//! ```rust
//! use motorkit::{Direction, StepStyle, StepperConfig, StepperMotor};
//! use motorkit::hal::MockPwm;
//!
//! let coils = [MockPwm::new(), MockPwm::new(), MockPwm::new(), MockPwm::new()];
//! let mut motor = StepperMotor::new(coils, StepperConfig::default()).unwrap();
//!
//! // Construction leaves the motor holding torque on the first coil.
//! assert_eq!(motor.coils()[0].duty_cycle, 0xFFFF);
//!
//! // One full step forward hands torque to the next coil.
//! motor.step(Direction::Forward, StepStyle::Single).unwrap();
//! assert_eq!(motor.coils()[1].duty_cycle, 0xFFFF);
//!
//! // De-energize without losing position.
//! motor.release().unwrap();
//! assert_eq!(motor.coils()[1].duty_cycle, 0);
//! ```
//!
//! # Timing
//!
//! Every operation is synchronous and non-blocking. Callers that need a
//! settling delay between steps own that timing and call
//! [`step`](StepperMotor::step) repeatedly. The engine assumes exclusive
//! write access to its coils; share an instance across threads only behind
//! external serialization.

use crate::config::{ConfigError, StepperConfig, MAX_MICROSTEPS};
use crate::traits::{PwmSink, MAX_DUTY};

// Brings sin/round to f64 on no_std targets; with std the inherent
// methods resolve first.
#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Curve storage: one entry per microstep plus both endpoints.
const CURVE_LEN: usize = MAX_MICROSTEPS as usize + 1;

/// Direction of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Step forward (position counter increases).
    Forward,
    /// Step backward (position counter decreases).
    Backward,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use motorkit::Direction;
    ///
    /// assert_eq!(Direction::Forward.as_str(), "forward");
    /// assert_eq!(Direction::Backward.as_str(), "backward");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

/// Style of a step, trading torque against resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepStyle {
    /// One coil pair fully energized per step. Minimal current draw.
    Single,
    /// Two adjacent coil pairs fully energized per step. Higher torque.
    Double,
    /// Alternate single- and double-coil half steps, doubling angular
    /// resolution with full torque on every step.
    Interleave,
    /// Advance one microstep along the sine curve. Finest resolution,
    /// partial torque except at the curve endpoints.
    Microstep,
}

impl StepStyle {
    /// Returns the style as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use motorkit::StepStyle;
    ///
    /// assert_eq!(StepStyle::Single.as_str(), "single");
    /// assert_eq!(StepStyle::Microstep.as_str(), "microstep");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            StepStyle::Single => "single",
            StepStyle::Double => "double",
            StepStyle::Interleave => "interleave",
            StepStyle::Microstep => "microstep",
        }
    }
}

/// Errors from stepper construction.
///
/// Once an engine exists, [`step`](StepperMotor::step) and
/// [`release`](StepperMotor::release) have no failure modes of their own;
/// they surface the sink's error type directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepperError<E> {
    /// The configuration was rejected; no engine was built and no sink
    /// was written.
    InvalidConfiguration(ConfigError),
    /// A coil write or frequency change failed during construction.
    Hardware(E),
}

impl<E> From<ConfigError> for StepperError<E> {
    fn from(err: ConfigError) -> Self {
        StepperError::InvalidConfiguration(err)
    }
}

/// Four-coil stepper motor phase engine.
///
/// Coils are passed in the engine's canonical order: first coil A leg 1,
/// then coil B leg 1, then coil A leg 2, then coil B leg 2. The engine's
/// numbering is independent of physical wiring; map your driver's pinout
/// onto this order at construction.
///
/// # Lifecycle
///
/// Construction validates the config, raises any coil running below
/// 1500 Hz to 2000 Hz, precomputes the microstep curve, and immediately
/// energizes the first full step, so the motor holds torque from the
/// moment `new` returns. Dropping the engine leaves the coils in their
/// last commanded state; call [`release`](StepperMotor::release) first to
/// let the motor free-spin.
///
/// # Type Parameter
///
/// - `P`: the PWM sink implementation ([`PwmSink`] trait)
#[derive(Debug)]
pub struct StepperMotor<P: PwmSink> {
    coils: [P; 4],
    microsteps: u16,
    curve: heapless::Vec<u16, CURVE_LEN>,
    position: i64,
}

impl<P: PwmSink> StepperMotor<P> {
    /// Coils running below this carrier frequency are inefficient and
    /// audible, so construction raises them.
    pub const MIN_COIL_FREQUENCY_HZ: u32 = 1500;

    /// Frequency applied to coils that start below the minimum.
    pub const SAFE_COIL_FREQUENCY_HZ: u32 = 2000;

    /// Creates a stepper engine from four coil sinks.
    ///
    /// # Errors
    ///
    /// [`StepperError::InvalidConfiguration`] if the microstep count is
    /// below 2, odd, or above [`MAX_MICROSTEPS`]; no sink is written in
    /// that case. [`StepperError::Hardware`] if raising a coil's carrier
    /// frequency or the initial energization fails - fixed-frequency
    /// outputs must already run at 1500 Hz or faster.
    ///
    /// # Example
    ///
    /// ```rust
    /// use motorkit::{StepperConfig, StepperMotor};
    /// use motorkit::hal::MockPwm;
    ///
    /// let coils = [
    ///     MockPwm::new().with_frequency(1200),
    ///     MockPwm::new(),
    ///     MockPwm::new(),
    ///     MockPwm::new(),
    /// ];
    /// let motor = StepperMotor::new(coils, StepperConfig::default()).unwrap();
    ///
    /// // The slow coil was raised to the safety default.
    /// assert_eq!(motor.coils()[0].frequency, 2000);
    /// ```
    pub fn new(mut coils: [P; 4], config: StepperConfig) -> Result<Self, StepperError<P::Error>> {
        config.validate()?;

        for coil in coils.iter_mut() {
            if coil.frequency() < Self::MIN_COIL_FREQUENCY_HZ {
                coil.set_frequency(Self::SAFE_COIL_FREQUENCY_HZ)
                    .map_err(StepperError::Hardware)?;
            }
        }

        let mut curve = heapless::Vec::new();
        for i in 0..=config.microsteps {
            let angle = core::f64::consts::PI / f64::from(2 * config.microsteps) * f64::from(i);
            let duty = (f64::from(MAX_DUTY) * angle.sin()).round() as u16;
            curve
                .push(duty)
                .map_err(|_| ConfigError::MicrostepsTooLarge)?;
        }

        let mut motor = Self {
            coils,
            microsteps: config.microsteps,
            curve,
            position: 0,
        };
        motor.update_coils(false).map_err(StepperError::Hardware)?;
        Ok(motor)
    }

    /// Performs one step of a particular style.
    ///
    /// The rotation amount varies by style: [`Single`](StepStyle::Single)
    /// and [`Double`](StepStyle::Double) normally move a full step,
    /// [`Interleave`](StepStyle::Interleave) a half step, and
    /// [`Microstep`](StepStyle::Microstep) one microstep. When styles are
    /// mixed, a `Single`, `Double`, or `Interleave` step first consumes
    /// whatever residual microsteps separate the counter from the
    /// half-step grid, so such a step may move less than normal.
    ///
    /// Returns the updated absolute microstep counter. The counter grows
    /// and shrinks without bound; wraparound is handled when coil indices
    /// are derived from it.
    ///
    /// # Errors
    ///
    /// Any coil write failure is the sink's own error, propagated
    /// unmodified. No retry is attempted - a failed write leaves physical
    /// state ambiguous and must not be masked.
    pub fn step(&mut self, direction: Direction, style: StepStyle) -> Result<i64, P::Error> {
        let half_step = i64::from(self.microsteps / 2);
        let full_step = i64::from(self.microsteps);

        let mut step_size = 0;
        if style == StepStyle::Microstep {
            step_size = 1;
        } else {
            // The previous steps may have been microsteps, so align with
            // the half-step grid first. The counter moves directly here
            // because the alignment distance depends on the direction.
            let residual = self.position.rem_euclid(half_step);
            if residual != 0 {
                match direction {
                    Direction::Forward => self.position += half_step - residual,
                    Direction::Backward => self.position -= residual,
                }
            } else if style == StepStyle::Interleave {
                step_size = half_step;
            }

            // A SINGLE step from a double-coil phase (or DOUBLE from a
            // single-coil phase) only needs a half step to land on the
            // next valid point for its style.
            let odd_phase = self.position.div_euclid(half_step).rem_euclid(2) == 1;
            match style {
                StepStyle::Single if odd_phase => step_size = half_step,
                StepStyle::Double if !odd_phase => step_size = half_step,
                StepStyle::Single | StepStyle::Double => step_size = full_step,
                _ => {}
            }
        }

        match direction {
            Direction::Forward => self.position += step_size,
            Direction::Backward => self.position -= step_size,
        }

        self.update_coils(style == StepStyle::Microstep)?;
        Ok(self.position)
    }

    /// Releases all the coils so the motor can free-spin without drawing
    /// power.
    ///
    /// The position counter is untouched; the next
    /// [`step`](StepperMotor::step) resumes from where the motor left off.
    pub fn release(&mut self) -> Result<(), P::Error> {
        for coil in self.coils.iter_mut() {
            coil.off()?;
        }
        Ok(())
    }

    /// Current absolute microstep counter.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Microsteps per quarter step this engine was built with.
    pub fn microsteps(&self) -> u16 {
        self.microsteps
    }

    /// The precomputed quarter-wave duty curve (length `microsteps + 1`).
    pub fn curve(&self) -> &[u16] {
        &self.curve
    }

    /// Read access to the coil sinks, in canonical order.
    pub fn coils(&self) -> &[P; 4] {
        &self.coils
    }

    /// Derives the four duty cycles for the current position and writes
    /// them out in one pass.
    fn update_coils(&mut self, microstepping: bool) -> Result<(), P::Error> {
        let microsteps = i64::from(self.microsteps);
        let mut duty_cycles = [0u16; 4];

        let trailing_coil = self.position.div_euclid(microsteps).rem_euclid(4) as usize;
        let leading_coil = (trailing_coil + 1) % 4;
        let microstep = self.position.rem_euclid(microsteps) as usize;
        duty_cycles[leading_coil] = self.curve[microstep];
        duty_cycles[trailing_coil] = self.curve[self.microsteps as usize - microstep];

        // DOUBLE steps (and SINGLE/INTERLEAVE steps aligned with them)
        // must deliver full rated torque. The raw curve would put the
        // ~71% midpoint value (0xB504) on both coils at those positions.
        if !microstepping
            && duty_cycles[leading_coil] == duty_cycles[trailing_coil]
            && duty_cycles[leading_coil] > 0
        {
            duty_cycles[leading_coil] = MAX_DUTY;
            duty_cycles[trailing_coil] = MAX_DUTY;
        }

        for (coil, duty) in self.coils.iter_mut().zip(duty_cycles) {
            coil.set_duty_cycle(duty)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepperConfig;
    use crate::hal::MockPwm;

    fn coils() -> [MockPwm; 4] {
        [
            MockPwm::new(),
            MockPwm::new(),
            MockPwm::new(),
            MockPwm::new(),
        ]
    }

    fn duties(motor: &StepperMotor<MockPwm>) -> [u16; 4] {
        let coils = motor.coils();
        [
            coils[0].duty_cycle,
            coils[1].duty_cycle,
            coils[2].duty_cycle,
            coils[3].duty_cycle,
        ]
    }

    // =========================================================================
    // Curve Tests
    // =========================================================================

    #[test]
    fn curve_endpoints_and_monotonicity() {
        for microsteps in [2u16, 4, 8, 16, 64, 128] {
            let config = StepperConfig::default().with_microsteps(microsteps);
            let motor = StepperMotor::new(coils(), config).unwrap();
            let curve = motor.curve();

            assert_eq!(curve.len(), microsteps as usize + 1);
            assert_eq!(curve[0], 0);
            assert_eq!(curve[microsteps as usize], 0xFFFF);
            assert!(curve.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn curve_midpoint_value() {
        let config = StepperConfig::default().with_microsteps(2);
        let motor = StepperMotor::new(coils(), config).unwrap();

        // sin(pi/4) scaled to 16 bits
        assert_eq!(motor.curve()[1], 0xB504);
    }

    #[test]
    fn curve_known_values_at_default_resolution() {
        let motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        assert_eq!(motor.curve()[1], 0x1918);
        assert_eq!(motor.curve()[8], 0xB504);
        assert_eq!(motor.curve()[15], 0xFEC3);
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn construction_energizes_first_step() {
        let motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        assert_eq!(duties(&motor), [0xFFFF, 0, 0, 0]);
        assert_eq!(motor.position(), 0);
    }

    #[test]
    fn construction_raises_slow_coil_frequencies() {
        let coils = [
            MockPwm::new().with_frequency(500),
            MockPwm::new().with_frequency(1499),
            MockPwm::new().with_frequency(1500),
            MockPwm::new().with_frequency(20_000),
        ];
        let motor = StepperMotor::new(coils, StepperConfig::default()).unwrap();

        assert_eq!(motor.coils()[0].frequency, 2000);
        assert_eq!(motor.coils()[1].frequency, 2000);
        // At or above the floor: left alone.
        assert_eq!(motor.coils()[2].frequency, 1500);
        assert_eq!(motor.coils()[3].frequency, 20_000);
    }

    #[test]
    fn construction_rejects_invalid_microsteps() {
        for (microsteps, expected) in [
            (0, ConfigError::MicrostepsTooSmall),
            (1, ConfigError::MicrostepsTooSmall),
            (3, ConfigError::MicrostepsOdd),
            (17, ConfigError::MicrostepsOdd),
            (130, ConfigError::MicrostepsTooLarge),
        ] {
            let config = StepperConfig::default().with_microsteps(microsteps);
            let err = StepperMotor::new(coils(), config).unwrap_err();
            assert_eq!(err, StepperError::InvalidConfiguration(expected));
        }
    }

    #[test]
    fn construction_writes_each_coil_once() {
        let motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();
        for coil in motor.coils() {
            assert_eq!(coil.write_count, 1);
        }
    }

    #[test]
    fn validation_runs_before_any_coil_write() {
        let mut set = coils();
        for coil in set.iter_mut() {
            coil.fail_writes = true;
        }
        let config = StepperConfig::default().with_microsteps(3);
        // Failing sinks never get the chance to produce a hardware error.
        let err = StepperMotor::new(set, config).unwrap_err();
        assert_eq!(
            err,
            StepperError::InvalidConfiguration(ConfigError::MicrostepsOdd)
        );
    }

    #[test]
    fn initial_energization_failure_is_a_hardware_error() {
        let mut set = coils();
        set[2].fail_writes = true;
        let err = StepperMotor::new(set, StepperConfig::default()).unwrap_err();
        assert_eq!(err, StepperError::Hardware(()));
    }

    // =========================================================================
    // Stepping Tests
    // =========================================================================

    #[test]
    fn single_step_positions() {
        let mut motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        assert_eq!(motor.step(Direction::Forward, StepStyle::Single), Ok(16));
        assert_eq!(motor.step(Direction::Forward, StepStyle::Single), Ok(32));
        assert_eq!(motor.step(Direction::Backward, StepStyle::Single), Ok(16));
    }

    #[test]
    fn position_goes_negative_without_clamping() {
        let mut motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        for expected in 1..=9 {
            assert_eq!(
                motor.step(Direction::Backward, StepStyle::Single),
                Ok(-16 * expected)
            );
        }
        assert_eq!(duties(&motor), [0, 0, 0, 0xFFFF]);
    }

    #[test]
    fn microstep_moves_one_count() {
        let mut motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        assert_eq!(motor.step(Direction::Forward, StepStyle::Microstep), Ok(1));
        assert_eq!(motor.step(Direction::Backward, StepStyle::Microstep), Ok(0));
        assert_eq!(motor.step(Direction::Backward, StepStyle::Microstep), Ok(-1));
    }

    #[test]
    fn realignment_consumes_residual_forward() {
        let mut motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        for _ in 0..3 {
            motor.step(Direction::Forward, StepStyle::Microstep).unwrap();
        }
        assert_eq!(motor.position(), 3);

        // Forward SINGLE from an off-grid position: 5 to reach the grid
        // at 8, then a half step to the odd-phase point for SINGLE.
        assert_eq!(motor.step(Direction::Forward, StepStyle::Single), Ok(16));
        assert_eq!(duties(&motor), [0, 0xFFFF, 0, 0]);
    }

    #[test]
    fn interleave_after_microsteps_is_pure_alignment() {
        let mut motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        motor.step(Direction::Forward, StepStyle::Microstep).unwrap();
        assert_eq!(motor.position(), 1);

        // The interleave-parity rule never resizes an INTERLEAVE request,
        // so this call only consumes the residual.
        assert_eq!(motor.step(Direction::Forward, StepStyle::Interleave), Ok(8));
    }

    // =========================================================================
    // Release Tests
    // =========================================================================

    #[test]
    fn release_zeroes_all_coils_and_keeps_position() {
        let mut motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();
        motor.step(Direction::Forward, StepStyle::Double).unwrap();
        assert_eq!(motor.position(), 8);

        motor.release().unwrap();
        assert_eq!(duties(&motor), [0, 0, 0, 0]);
        assert_eq!(motor.position(), 8);
    }

    // =========================================================================
    // Error Propagation Tests
    // =========================================================================

    #[test]
    fn step_propagates_sink_errors() {
        let mut motor = StepperMotor::new(coils(), StepperConfig::default()).unwrap();

        motor.coils_mut_for_tests()[0].fail_writes = true;
        assert_eq!(motor.step(Direction::Forward, StepStyle::Single), Err(()));

        // The counter still moved; the engine does not roll back or retry.
        assert_eq!(motor.position(), 16);
    }

    #[test]
    fn stepper_error_from_config_error() {
        let err: StepperError<()> = ConfigError::MicrostepsOdd.into();
        assert_eq!(
            err,
            StepperError::InvalidConfiguration(ConfigError::MicrostepsOdd)
        );
    }

    // Test-only mutable access, so failure injection can be flipped after
    // construction succeeded.
    impl StepperMotor<MockPwm> {
        fn coils_mut_for_tests(&mut self) -> &mut [MockPwm; 4] {
            &mut self.coils
        }
    }
}
