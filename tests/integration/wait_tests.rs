//! Blocking state waits against the fake tree.

use std::thread;
use std::time::{Duration, Instant};

use ev3sys::{Error, ReadinessPolicy};
use ev3sys::device::DeviceKind;
use ev3sys::prelude::*;

use crate::fake_sysfs::FakeSysfs;

fn motor_in(fake: &FakeSysfs, state: &str) -> TachoMotor {
    fake.add_motor("motor0", "outA", "lego-ev3-l-motor");
    fake.set(DeviceKind::TachoMotor, "motor0", "state", state);
    TachoMotor::with_id(fake.sysfs(), 0)
}

#[test]
fn already_satisfied_returns_immediately() {
    let fake = FakeSysfs::new();
    let motor = motor_in(&fake, "running\n");

    let start = Instant::now();
    let out = wait(
        &motor,
        Condition::all(MotorState::RUNNING | MotorState::HOLDING, MotorState::RUNNING),
        None,
    )
    .unwrap();
    assert!(out.satisfied);
    assert_eq!(out.state, MotorState::RUNNING);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn zero_timeout_reports_unsatisfied_without_error() {
    let fake = FakeSysfs::new();
    let motor = motor_in(&fake, "running ramping\n");

    let start = Instant::now();
    let out = wait(
        &motor,
        Condition::all(MotorState::RUNNING, MotorState::empty()),
        Some(Duration::ZERO),
    )
    .unwrap();
    assert!(!out.satisfied);
    assert_eq!(out.state, MotorState::RUNNING | MotorState::RAMPING);
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[test]
fn short_timeout_elapses() {
    let fake = FakeSysfs::new();
    let motor = motor_in(&fake, "running\n");

    let timeout = Duration::from_millis(60);
    let start = Instant::now();
    let out = wait(&motor, Condition::any(MotorState::STALLED), Some(timeout)).unwrap();
    assert!(!out.satisfied);
    assert!(start.elapsed() >= timeout);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn observes_a_later_state_change() {
    let fake = FakeSysfs::new();
    let motor = motor_in(&fake, "running\n");
    let state_path = fake
        .sysfs()
        .class_path(DeviceKind::TachoMotor)
        .join("motor0")
        .join("state");

    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(40));
        std::fs::write(state_path, "holding\n").unwrap();
    });

    let out = wait(
        &motor,
        Condition::all(MotorState::RUNNING | MotorState::HOLDING, MotorState::HOLDING),
        Some(Duration::from_secs(5)),
    )
    .unwrap();
    writer.join().unwrap();
    assert!(out.satisfied);
    assert_eq!(out.state, MotorState::HOLDING);
}

#[test]
fn latched_error_is_drained_first() {
    let fake = FakeSysfs::new();
    let motor = motor_in(&fake, "running\n");
    motor.command("levitate");

    assert!(matches!(
        wait(&motor, Condition::any(MotorState::RUNNING), None),
        Err(Error::InvalidValue { .. })
    ));
    assert!(motor.take_error().is_none());
}

#[test]
fn read_errors_are_returned_not_latched() {
    let fake = FakeSysfs::new();
    let motor = motor_in(&fake, "running flying\n");

    match wait(&motor, Condition::any(MotorState::RUNNING), None) {
        Err(Error::InvalidValue { value, .. }) => assert_eq!(value, "flying"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(motor.take_error().is_none());

    fake.remove_attr(DeviceKind::TachoMotor, "motor0", "state");
    assert!(matches!(
        wait(&motor, Condition::any(MotorState::RUNNING), None),
        Err(Error::Io { .. })
    ));
}

#[test]
fn empty_state_is_no_bits() {
    let fake = FakeSysfs::new();
    let motor = motor_in(&fake, "\n");
    assert_eq!(motor.state().unwrap(), MotorState::empty());
    let out = wait(
        &motor,
        Condition::all(MotorState::RUNNING, MotorState::empty()),
        Some(Duration::ZERO),
    )
    .unwrap();
    assert!(out.satisfied);
}

#[test]
fn notify_times_out_when_no_event_arrives() {
    // Regular files never raise POLLPRI, so poll(2) runs to its timeout.
    let fake = FakeSysfs::with_readiness(ReadinessPolicy::Notify);
    let motor = motor_in(&fake, "running\n");

    let timeout = Duration::from_millis(100);
    let start = Instant::now();
    let out = wait(&motor, Condition::any(MotorState::STALLED), Some(timeout)).unwrap();
    let elapsed = start.elapsed();
    assert_eq!(
        out,
        WaitOutcome {
            state: MotorState::RUNNING,
            satisfied: false,
        }
    );
    assert!(elapsed >= timeout, "returned after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(1), "returned after {elapsed:?}");
    assert!(motor.take_error().is_none());
}
