//! Hobby servo control: positional and continuous-rotation.
//!
//! Servos are commanded by pulse width. A [`Servo`] or
//! [`ContinuousServo`] maps a fraction between 0.0 and 1.0 linearly onto
//! a duty-cycle window computed from the configured pulse range and the
//! sink's carrier frequency - position for conventional servos, speed and
//! direction for continuous-rotation ones.
//!
//! # Example
//!
//! ```rust
//! use motorkit::{Servo, ServoConfig};
//! use motorkit::hal::MockPwm;
//!
//! // Servo PWM conventionally runs at 50 Hz.
//! let pwm = MockPwm::new().with_frequency(50);
//! let mut servo = Servo::new(pwm, ServoConfig::default()).unwrap();
//!
//! servo.set_angle(Some(90.0)).unwrap();
//! assert_eq!(servo.angle(), Some(90.0));
//!
//! // Disable the output entirely (servo goes limp).
//! servo.set_angle(None).unwrap();
//! assert_eq!(servo.angle(), None);
//! ```

use crate::config::{ConfigError, ServoConfig};
use crate::traits::{PwmSink, MAX_DUTY};

/// Errors from servo operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServoError<E> {
    /// The configuration was rejected; no servo was built.
    InvalidConfiguration(ConfigError),
    /// Fraction outside `0.0..=1.0`; nothing was written.
    FractionOutOfRange,
    /// Angle outside `0.0..=actuation_range`; nothing was written.
    AngleOutOfRange,
    /// Throttle outside `-1.0..=1.0`; nothing was written.
    ThrottleOutOfRange,
    /// The sink rejected a duty write.
    Hardware(E),
}

impl<E> From<ConfigError> for ServoError<E> {
    fn from(err: ConfigError) -> Self {
        ServoError::InvalidConfiguration(err)
    }
}

/// Fraction-to-duty mapping for one pulse window at one carrier frequency.
#[derive(Clone, Copy, Debug)]
struct PulseWindow {
    min_duty: u16,
    duty_range: u16,
}

impl PulseWindow {
    fn new(config: &ServoConfig, hz: u32) -> Self {
        let hz = hz as f32;
        let min_duty =
            (f32::from(config.min_pulse_us) * hz / 1_000_000.0 * f32::from(MAX_DUTY)) as u16;
        let max_duty = f32::from(config.max_pulse_us) * hz / 1_000_000.0 * f32::from(MAX_DUTY);
        let duty_range = (max_duty - f32::from(min_duty)) as u16;
        Self {
            min_duty,
            duty_range,
        }
    }

    fn duty_for(&self, fraction: f32) -> u16 {
        let duty = u32::from(self.min_duty) + (fraction * f32::from(self.duty_range)) as u32;
        duty.min(u32::from(MAX_DUTY)) as u16
    }
}

/// Positional servo.
///
/// # Type Parameter
///
/// - `P`: the PWM sink implementation ([`PwmSink`] trait)
#[derive(Debug)]
pub struct Servo<P: PwmSink> {
    pwm: P,
    config: ServoConfig,
    window: PulseWindow,
    fraction: Option<f32>,
}

impl<P: PwmSink> Servo<P> {
    /// Creates a positional servo on one PWM sink.
    ///
    /// The pulse window is computed from the sink's current carrier
    /// frequency; configure the sink's frequency (conventionally 50 Hz)
    /// before handing it over. No duty is written until the first
    /// command.
    ///
    /// # Errors
    ///
    /// [`ServoError::InvalidConfiguration`] if the config fails
    /// [`ServoConfig::validate`].
    pub fn new(pwm: P, config: ServoConfig) -> Result<Self, ServoError<P::Error>> {
        config.validate()?;
        let window = PulseWindow::new(&config, pwm.frequency());
        Ok(Self {
            pwm,
            config,
            window,
            fraction: None,
        })
    }

    /// Commands a pulse width as a fraction of the window.
    ///
    /// `0.0` is `min_pulse_us`, `1.0` is `max_pulse_us`, `None` disables
    /// the output (pulse width 0) so the servo goes limp.
    pub fn set_fraction(&mut self, fraction: Option<f32>) -> Result<(), ServoError<P::Error>> {
        let duty = match fraction {
            None => 0,
            Some(value) => {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ServoError::FractionOutOfRange);
                }
                self.window.duty_for(value)
            }
        };
        self.pwm.set_duty_cycle(duty).map_err(ServoError::Hardware)?;
        self.fraction = fraction;
        Ok(())
    }

    /// Last commanded fraction, `None` while the output is disabled.
    pub fn fraction(&self) -> Option<f32> {
        self.fraction
    }

    /// Commands the servo angle in degrees, `0.0..=actuation_range`.
    ///
    /// `None` disables the output.
    pub fn set_angle(&mut self, angle: Option<f32>) -> Result<(), ServoError<P::Error>> {
        match angle {
            None => self.set_fraction(None),
            Some(degrees) => {
                if !(0.0..=self.config.actuation_range).contains(&degrees) {
                    return Err(ServoError::AngleOutOfRange);
                }
                self.set_fraction(Some(degrees / self.config.actuation_range))
            }
        }
    }

    /// Last commanded angle in degrees, `None` while disabled.
    pub fn angle(&self) -> Option<f32> {
        self.fraction.map(|f| f * self.config.actuation_range)
    }

    /// Changes the pulse window and recomputes the duty mapping.
    ///
    /// Takes effect on the next command; the currently output pulse is
    /// not rewritten.
    pub fn set_pulse_width_range(
        &mut self,
        min_pulse_us: u16,
        max_pulse_us: u16,
    ) -> Result<(), ServoError<P::Error>> {
        let config = self.config.with_pulse_range(min_pulse_us, max_pulse_us);
        config.validate()?;
        self.config = config;
        self.window = PulseWindow::new(&self.config, self.pwm.frequency());
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// Read access to the sink.
    pub fn sink(&self) -> &P {
        &self.pwm
    }
}

/// Continuous-rotation servo.
///
/// Same pulse mapping as [`Servo`], but the fraction encodes speed and
/// direction: throttle `-1.0..=1.0` maps onto the window via
/// `(throttle + 1) / 2`, so the window midpoint is stopped.
#[derive(Debug)]
pub struct ContinuousServo<P: PwmSink> {
    pwm: P,
    config: ServoConfig,
    window: PulseWindow,
    throttle: f32,
}

impl<P: PwmSink> ContinuousServo<P> {
    /// Creates a continuous-rotation servo on one PWM sink.
    ///
    /// # Errors
    ///
    /// [`ServoError::InvalidConfiguration`] if the config fails
    /// [`ServoConfig::validate`].
    pub fn new(pwm: P, config: ServoConfig) -> Result<Self, ServoError<P::Error>> {
        config.validate()?;
        let window = PulseWindow::new(&config, pwm.frequency());
        Ok(Self {
            pwm,
            config,
            window,
            throttle: 0.0,
        })
    }

    /// Commands power delivery: `-1.0` full reverse, `0.0` stopped,
    /// `1.0` full forwards.
    pub fn set_throttle(&mut self, throttle: f32) -> Result<(), ServoError<P::Error>> {
        if !(-1.0..=1.0).contains(&throttle) {
            return Err(ServoError::ThrottleOutOfRange);
        }
        let fraction = (throttle + 1.0) / 2.0;
        self.pwm
            .set_duty_cycle(self.window.duty_for(fraction))
            .map_err(ServoError::Hardware)?;
        self.throttle = throttle;
        Ok(())
    }

    /// Last commanded throttle.
    pub fn throttle(&self) -> f32 {
        self.throttle
    }

    /// Convenience method to stop the rotation.
    ///
    /// Equivalent to `set_throttle(0.0)`.
    pub fn stop(&mut self) -> Result<(), ServoError<P::Error>> {
        self.set_throttle(0.0)
    }

    /// Changes the pulse window and recomputes the duty mapping.
    ///
    /// Takes effect on the next command; the currently output pulse is
    /// not rewritten.
    pub fn set_pulse_width_range(
        &mut self,
        min_pulse_us: u16,
        max_pulse_us: u16,
    ) -> Result<(), ServoError<P::Error>> {
        let config = self.config.with_pulse_range(min_pulse_us, max_pulse_us);
        config.validate()?;
        self.config = config;
        self.window = PulseWindow::new(&self.config, self.pwm.frequency());
        Ok(())
    }

    /// Read access to the sink.
    pub fn sink(&self) -> &P {
        &self.pwm
    }
}
