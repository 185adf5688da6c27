//! Trait definitions for hardware abstraction.
//!
//! This module defines the core abstraction that lets motorkit drive real
//! PWM peripherals, expander chips behind a bus driver, or desktop mocks
//! with the same actuator code.
//!
//! # Submodules
//!
//! - `pwm`: The [`PwmSink`] duty-cycle output trait
//!
//! # Hardware Abstraction
//!
//! Every actuator in this crate ([`StepperMotor`], [`DcMotor`], [`Servo`],
//! [`ContinuousServo`]) is generic over [`PwmSink`] and owns its sinks
//! exclusively for its whole lifetime. Implement the trait once per
//! platform and all four actuator types work on it.
//!
//! [`StepperMotor`]: crate::stepper::StepperMotor
//! [`DcMotor`]: crate::motor::DcMotor
//! [`Servo`]: crate::servo::Servo
//! [`ContinuousServo`]: crate::servo::ContinuousServo

pub mod pwm;

pub use pwm::*;
