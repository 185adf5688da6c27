//! Stepper phase-engine walkthrough on mock hardware.
//!
//! Steps a mock-backed stepper through every style and prints the four
//! coil duty cycles after each move, so you can watch the phase pattern
//! rotate, interleave, and microstep.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example stepper_walkthrough
//! ```

use motorkit::hal::MockPwm;
use motorkit::{Direction, StepStyle, StepperConfig, StepperMotor};

fn step(
    motor: &mut StepperMotor<MockPwm>,
    direction: Direction,
    style: StepStyle,
) -> anyhow::Result<i64> {
    motor
        .step(direction, style)
        .map_err(|_| anyhow::anyhow!("coil write rejected"))
}

fn print_state(label: &str, motor: &StepperMotor<MockPwm>) {
    let coils = motor.coils();
    println!(
        "{label:<24} position {:>4}  duties [{:#06x}, {:#06x}, {:#06x}, {:#06x}]",
        motor.position(),
        coils[0].duty_cycle,
        coils[1].duty_cycle,
        coils[2].duty_cycle,
        coils[3].duty_cycle,
    );
}

fn main() -> anyhow::Result<()> {
    println!("=================================");
    println!("  motorkit Stepper Walkthrough");
    println!("=================================");
    println!();

    let coils = [
        MockPwm::new(),
        MockPwm::new(),
        MockPwm::new(),
        MockPwm::new(),
    ];
    let mut motor = StepperMotor::new(coils, StepperConfig::default())
        .map_err(|err| anyhow::anyhow!("stepper construction failed: {err:?}"))?;
    print_state("constructed", &motor);

    for _ in 0..4 {
        step(&mut motor, Direction::Forward, StepStyle::Single)?;
        print_state("single forward", &motor);
    }

    for _ in 0..2 {
        step(&mut motor, Direction::Forward, StepStyle::Double)?;
        print_state("double forward", &motor);
    }

    for _ in 0..4 {
        step(&mut motor, Direction::Forward, StepStyle::Interleave)?;
        print_state("interleave forward", &motor);
    }

    println!();
    println!("Microstepping through one full step:");
    for _ in 0..motor.microsteps() {
        step(&mut motor, Direction::Backward, StepStyle::Microstep)?;
        print_state("microstep backward", &motor);
    }

    // A style switch after microstepping realigns to the half-step grid
    // before taking its own step.
    step(&mut motor, Direction::Backward, StepStyle::Single)?;
    print_state("single after microsteps", &motor);

    motor
        .release()
        .map_err(|_| anyhow::anyhow!("coil write rejected"))?;
    print_state("released", &motor);

    Ok(())
}
