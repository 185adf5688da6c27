//! Adapter for `embedded-hal` 1.0 PWM pins.
//!
//! [`EmbeddedPwm`] wraps any [`embedded_hal::pwm::SetDutyCycle`]
//! implementation and exposes it as a [`PwmSink`], rescaling this crate's
//! 16-bit duty range onto the pin's native resolution.
//!
//! `embedded-hal` deliberately leaves carrier frequency out of its PWM
//! trait - the timer is configured before the pin is handed over. The
//! adapter therefore carries the frequency as a declared value: you state
//! what the timer was configured to, and requests to change it fail with
//! [`EmbeddedPwmError::FixedFrequency`]. For the stepper engine this means
//! the pin must already run at 1500 Hz or faster, mirroring PWM outputs
//! that are "set to at least 1500 Hz or allow variable frequency".
//!
//! [`PwmSink`]: crate::traits::PwmSink

use crate::traits::{PwmSink, MAX_DUTY};
use embedded_hal::pwm::SetDutyCycle;

/// Errors from an [`EmbeddedPwm`] sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddedPwmError<E> {
    /// The carrier frequency is fixed by the timer configuration and
    /// cannot be changed through the pin.
    FixedFrequency,
    /// The underlying pin rejected a duty write.
    Pwm(E),
}

/// A [`PwmSink`] backed by an `embedded-hal` PWM pin.
///
/// # Example
///
/// ```rust,ignore
/// use motorkit::hal::embedded::EmbeddedPwm;
/// use motorkit::{StepperConfig, StepperMotor};
///
/// // Timer configured to 2 kHz elsewhere; declare that here.
/// let coils = [
///     EmbeddedPwm::new(ch0, 2000),
///     EmbeddedPwm::new(ch1, 2000),
///     EmbeddedPwm::new(ch2, 2000),
///     EmbeddedPwm::new(ch3, 2000),
/// ];
/// let motor = StepperMotor::new(coils, StepperConfig::default())?;
/// ```
pub struct EmbeddedPwm<P> {
    pin: P,
    frequency_hz: u32,
}

impl<P: SetDutyCycle> EmbeddedPwm<P> {
    /// Wraps a PWM pin whose timer runs at `frequency_hz`.
    pub fn new(pin: P, frequency_hz: u32) -> Self {
        Self { pin, frequency_hz }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: SetDutyCycle> PwmSink for EmbeddedPwm<P> {
    type Error = EmbeddedPwmError<P::Error>;

    fn frequency(&self) -> u32 {
        self.frequency_hz
    }

    fn set_frequency(&mut self, _hz: u32) -> Result<(), Self::Error> {
        Err(EmbeddedPwmError::FixedFrequency)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let max = u32::from(self.pin.max_duty_cycle());
        let scaled = (u32::from(duty) * max / u32::from(MAX_DUTY)) as u16;
        self.pin.set_duty_cycle(scaled).map_err(EmbeddedPwmError::Pwm)
    }
}
