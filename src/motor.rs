//! Simple control of a brushed DC motor through an H-bridge.
//!
//! A [`DcMotor`] drives two PWM inputs of an H-bridge or driver chip
//! (DRV8833, DRV8871, TB6612, L293D and friends). Throttle is a signed
//! fraction: the sign picks which input is driven and the magnitude sets
//! the duty.
//!
//! # Decay modes
//!
//! How the driver recirculates current during the PWM off-time changes the
//! motor's low-speed behavior. [`DecayMode::FastDecay`] (coasting) is the
//! default; [`DecayMode::SlowDecay`] (braking) improves spin threshold and
//! speed-to-throttle linearity on controller chips that support it. Either
//! setting is compatible with discrete H-bridge circuitry, where it simply
//! has no effect on operational performance.
//!
//! # Example
//!
//! ```rust
//! use motorkit::{DcMotor, DecayMode};
//! use motorkit::hal::MockPwm;
//!
//! let mut motor = DcMotor::new(MockPwm::new(), MockPwm::new());
//!
//! motor.set_throttle(Some(0.5)).unwrap();  // half speed forwards
//! motor.set_throttle(Some(-1.0)).unwrap(); // full speed reverse
//! motor.set_throttle(Some(0.0)).unwrap();  // active brake
//! motor.set_throttle(None).unwrap();       // coast, zero current
//! ```

use crate::traits::{PwmSink, MAX_DUTY};

/// Recirculation-current decay mode of the motor driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecayMode {
    /// Fast decay (coasting) - the inactive input is held low.
    #[default]
    FastDecay,
    /// Slow decay (braking) - the inactive input is held high and the
    /// active input carries the inverted duty.
    SlowDecay,
}

/// Errors from DC motor operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorError<E> {
    /// Throttle outside `-1.0..=1.0`; nothing was written.
    ThrottleOutOfRange,
    /// A sink rejected a duty write.
    Hardware(E),
}

/// DC motor driver.
///
/// `positive` is the input that spins the motor forwards when driven while
/// the other is low; swap the two sinks if the motor runs opposite to what
/// you expect.
///
/// # Type Parameter
///
/// - `P`: the PWM sink implementation ([`PwmSink`] trait)
#[derive(Debug)]
pub struct DcMotor<P: PwmSink> {
    positive: P,
    negative: P,
    throttle: Option<f32>,
    decay_mode: DecayMode,
}

impl<P: PwmSink> DcMotor<P> {
    /// Creates a DC motor from the forward and reverse H-bridge inputs.
    ///
    /// The throttle starts as `None` (controller off); no duty is written
    /// until the first [`set_throttle`](DcMotor::set_throttle).
    pub fn new(positive: P, negative: P) -> Self {
        Self {
            positive,
            negative,
            throttle: None,
            decay_mode: DecayMode::FastDecay,
        }
    }

    /// Sets the motor speed.
    ///
    /// - `None` turns the controller off (high-Z coast, zero current)
    /// - `Some(0.0)` brakes the motor (both inputs fully on, low-Z)
    /// - Other values in `-1.0..=1.0` drive the motor; the duty magnitude
    ///   is `round(0xFFFF * |throttle|)` and the sign selects the driven
    ///   input per the current [`DecayMode`]
    ///
    /// # Errors
    ///
    /// [`MotorError::ThrottleOutOfRange`] for values outside `-1.0..=1.0`
    /// (including NaN); the sinks are untouched in that case. Sink
    /// failures surface as [`MotorError::Hardware`].
    pub fn set_throttle(&mut self, throttle: Option<f32>) -> Result<(), MotorError<P::Error>> {
        if let Some(value) = throttle {
            if !(-1.0..=1.0).contains(&value) {
                return Err(MotorError::ThrottleOutOfRange);
            }
        }
        match throttle {
            // Controller off (high-Z)
            None => self.write(0, 0)?,
            // Brake (low-Z)
            Some(value) if value == 0.0 => self.write(MAX_DUTY, MAX_DUTY)?,
            Some(value) => {
                let magnitude = if value < 0.0 { -value } else { value };
                let duty = (f32::from(MAX_DUTY) * magnitude + 0.5) as u16;
                match (self.decay_mode, value < 0.0) {
                    (DecayMode::SlowDecay, true) => self.write(MAX_DUTY - duty, MAX_DUTY)?,
                    (DecayMode::SlowDecay, false) => self.write(MAX_DUTY, MAX_DUTY - duty)?,
                    (DecayMode::FastDecay, true) => self.write(0, duty)?,
                    (DecayMode::FastDecay, false) => self.write(duty, 0)?,
                }
            }
        }
        self.throttle = throttle;
        Ok(())
    }

    /// Last commanded throttle, `None` when the controller is off.
    pub fn throttle(&self) -> Option<f32> {
        self.throttle
    }

    /// Current decay mode.
    pub fn decay_mode(&self) -> DecayMode {
        self.decay_mode
    }

    /// Selects the decay mode applied by subsequent throttle changes.
    pub fn set_decay_mode(&mut self, mode: DecayMode) {
        self.decay_mode = mode;
    }

    /// Convenience method to coast the motor.
    ///
    /// Equivalent to `set_throttle(None)`.
    pub fn stop(&mut self) -> Result<(), MotorError<P::Error>> {
        self.set_throttle(None)
    }

    /// Read access to the positive and negative sinks, in that order.
    pub fn sinks(&self) -> (&P, &P) {
        (&self.positive, &self.negative)
    }

    fn write(&mut self, positive: u16, negative: u16) -> Result<(), MotorError<P::Error>> {
        self.positive
            .set_duty_cycle(positive)
            .map_err(MotorError::Hardware)?;
        self.negative
            .set_duty_cycle(negative)
            .map_err(MotorError::Hardware)
    }
}
