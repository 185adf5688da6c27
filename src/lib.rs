//! # motorkit
//!
//! PWM actuator control for DC motors, servos, and stepper motors.
//!
//! ## Features
//!
//! - **Hardware abstraction**: One [`PwmSink`] trait covers every output;
//!   actuators run on real peripherals, expander chips, or desktop mocks
//! - **Stepper phase sequencing**: Sinusoidal microstepping with single,
//!   double, interleaved, and microstep styles, mixable at any time
//! - **DC motors**: Signed throttle with coast, brake, and selectable
//!   recirculation decay mode
//! - **Servos**: Positional and continuous-rotation, with calibratable
//!   pulse-width windows
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - The PWM sink abstraction
//! - `config` - Validated construction parameters
//! - `stepper` - Four-coil stepper phase engine
//! - `motor` - H-bridge DC motor control
//! - `servo` - Pulse-width servo control
//! - `hal` - Concrete sinks (mock for testing, `embedded-hal` adapter)
//!
//! ## Example
//!
//! ```rust
//! use motorkit::{Direction, StepStyle, StepperConfig, StepperMotor};
//! use motorkit::hal::MockPwm;
//!
//! // Four coil outputs in canonical order.
//! let coils = [MockPwm::new(), MockPwm::new(), MockPwm::new(), MockPwm::new()];
//! let mut motor = StepperMotor::new(coils, StepperConfig::default()).unwrap();
//!
//! // Two full steps forward, one interleaved half step back.
//! motor.step(Direction::Forward, StepStyle::Single).unwrap();
//! motor.step(Direction::Forward, StepStyle::Double).unwrap();
//! motor.step(Direction::Backward, StepStyle::Interleave).unwrap();
//!
//! // Free-spin without losing position.
//! motor.release().unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Validated construction parameters for the actuator types.
pub mod config;
/// Hardware abstraction layer with a mock implementation for testing.
pub mod hal;
/// H-bridge DC motor control.
pub mod motor;
/// Positional and continuous-rotation servo control.
pub mod servo;
/// Stepper motor phase sequencing with sinusoidal microstepping.
pub mod stepper;
/// Core trait for PWM hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use config::{ConfigError, ServoConfig, StepperConfig, MAX_MICROSTEPS};
pub use motor::{DcMotor, DecayMode, MotorError};
pub use servo::{ContinuousServo, Servo, ServoError};
pub use stepper::{Direction, StepStyle, StepperError, StepperMotor};
pub use traits::{PwmSink, MAX_DUTY};
