//! DC motor throttle table on mock hardware.
//!
//! Sweeps a mock-backed DC motor through the throttle range in both decay
//! modes and prints the resulting H-bridge duty pairs, including the
//! coast and brake special cases.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example dc_motor_decay
//! ```

use motorkit::hal::MockPwm;
use motorkit::{DcMotor, DecayMode};

fn apply(motor: &mut DcMotor<MockPwm>, throttle: Option<f32>) -> anyhow::Result<()> {
    motor
        .set_throttle(throttle)
        .map_err(|err| anyhow::anyhow!("throttle rejected: {err:?}"))?;
    let (positive, negative) = motor.sinks();
    let label = match throttle {
        None => "coast".to_string(),
        Some(value) if value == 0.0 => "brake".to_string(),
        Some(value) => format!("{value:+.2}"),
    };
    println!(
        "  {label:<6} positive {:#06x}  negative {:#06x}",
        positive.duty_cycle, negative.duty_cycle,
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    println!("=================================");
    println!("  motorkit DC Motor Decay Table");
    println!("=================================");

    let mut motor = DcMotor::new(MockPwm::new(), MockPwm::new());
    let sweep = [1.0, 0.5, 0.25, -0.25, -0.5, -1.0];

    for mode in [DecayMode::FastDecay, DecayMode::SlowDecay] {
        motor.set_decay_mode(mode);
        println!();
        println!("{mode:?}:");
        for throttle in sweep {
            apply(&mut motor, Some(throttle))?;
        }
        apply(&mut motor, Some(0.0))?;
        apply(&mut motor, None)?;
    }

    Ok(())
}
