//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the [`PwmSink`] trait
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementation for desktop development
//! - `embedded`: Adapter for `embedded-hal` 1.0 PWM pins (requires the
//!   `embedded-hal` feature)
//!
//! [`PwmSink`]: crate::traits::PwmSink

pub mod mock;

#[cfg(feature = "embedded-hal")]
pub mod embedded;

pub use mock::*;

#[cfg(feature = "embedded-hal")]
pub use embedded::*;
