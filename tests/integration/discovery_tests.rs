//! Discovery ordering, port binding and mismatch reporting.

use ev3sys::device::DeviceKind;
use ev3sys::prelude::*;
use ev3sys::{Error, Search};

use crate::fake_sysfs::FakeSysfs;

const LARGE: &str = "lego-ev3-l-motor";
const MEDIUM: &str = "lego-ev3-m-motor";

fn three_motors() -> FakeSysfs {
    let fake = FakeSysfs::new();
    fake.add_motor("motor10", "outC", LARGE);
    fake.add_motor("motor2", "outB", LARGE);
    fake.add_motor("motor0", "outA", LARGE);
    fake
}

#[test]
fn find_after_walks_numeric_order() {
    let fake = three_motors();
    let first = TachoMotor::first(fake.sysfs(), LARGE).unwrap();
    assert_eq!(first.handle().id(), Some(0));
    let second = first.next(LARGE).unwrap();
    assert_eq!(second.instance_name(), "motor2");
    let third = second.next(LARGE).unwrap();
    assert_eq!(third.handle().id(), Some(10));

    match third.next(LARGE) {
        Err(Error::NotFound(Search::DriverAfter { after, .. })) => assert_eq!(after, "motor10"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn find_after_filters_by_driver() {
    let fake = three_motors();
    fake.add_motor("motor5", "outD", MEDIUM);
    let m = TachoMotor::first(fake.sysfs(), MEDIUM).unwrap();
    assert_eq!(m.handle().id(), Some(5));

    match TachoMotor::first(fake.sysfs(), "nxt-motor") {
        Err(Error::NotFound(Search::Driver { driver })) => assert_eq!(driver, "nxt-motor"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn failed_discovery_leaves_destination_untouched() {
    let fake = three_motors();
    let dst = TachoMotor::with_id(fake.sysfs(), 2);
    assert!(find_after(None, &dst, "nxt-motor").is_err());
    assert_eq!(dst.handle().id(), Some(2));
}

#[test]
fn discovery_rebinds_and_clears_latch() {
    let fake = three_motors();
    let dst = TachoMotor::new(fake.sysfs());
    dst.set_speed_sp(1); // unbound: latches an I/O error
    let id = find_after(None, &dst, LARGE).unwrap();
    assert_eq!(id, 0);
    assert!(dst.take_error().is_none());
}

#[test]
fn entries_without_driver_are_skipped() {
    let fake = three_motors();
    fake.add(DeviceKind::TachoMotor, "motor1", &[("address", "outE")]);
    let first = TachoMotor::first(fake.sysfs(), LARGE).unwrap();
    assert_eq!(first.next(LARGE).unwrap().handle().id(), Some(2));
}

#[test]
fn cross_kind_cursor_is_rejected() {
    let fake = three_motors();
    let tacho = TachoMotor::with_id(fake.sysfs(), 0);
    let servo = ServoMotor::new(fake.sysfs());
    match find_after(Some(&tacho as &dyn Device), &servo, LARGE) {
        Err(Error::TypeMismatch { want, have }) => {
            assert_eq!(want, DeviceKind::ServoMotor);
            assert_eq!(have, DeviceKind::TachoMotor);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(servo.handle().id(), None);
}

#[test]
fn bind_to_port_matches_address_and_driver() {
    let fake = three_motors();
    let (motor, mismatch) = TachoMotor::for_port(fake.sysfs(), "outB", LARGE).unwrap();
    assert!(mismatch.is_none());
    assert_eq!(motor.handle().id(), Some(2));
    assert_eq!(motor.address().unwrap(), "outB");
}

#[test]
fn bind_to_port_binds_despite_driver_mismatch() {
    // Permissive binding: the wrong driver is reported, not fatal.
    let fake = three_motors();
    let (motor, mismatch) = TachoMotor::for_port(fake.sysfs(), "outC", MEDIUM).unwrap();
    assert_eq!(motor.handle().id(), Some(10));
    assert_eq!(
        mismatch,
        Some(DriverMismatch {
            want: MEDIUM.to_owned(),
            have: LARGE.to_owned(),
        })
    );
    assert_eq!(motor.driver().unwrap(), LARGE);
}

#[test]
fn bind_to_empty_port_is_not_found() {
    let fake = three_motors();
    let dst = TachoMotor::new(fake.sysfs());
    match bind_to_port(&dst, "outD", LARGE) {
        Err(Error::NotFound(Search::Port { port, .. })) => assert_eq!(port, "outD"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(dst.handle().id(), None);
}

#[test]
fn non_numeric_instance_is_fatal() {
    let fake = three_motors();
    fake.add(DeviceKind::TachoMotor, "motorX", &[("driver_name", LARGE)]);
    assert!(matches!(
        TachoMotor::first(fake.sysfs(), LARGE),
        Err(Error::Parse { .. })
    ));
}

#[test]
fn linear_actuators_share_the_directory() {
    let fake = three_motors();
    fake.add(
        DeviceKind::LinearActuator,
        "linear0",
        &[("driver_name", "act-l12-ev3-50"), ("count_per_m", "2000")],
    );
    let act = LinearActuator::first(fake.sysfs(), "act-l12-ev3-50").unwrap();
    assert_eq!(act.count_per_m().unwrap(), 2000);
    assert!(LinearActuator::first(fake.sysfs(), LARGE).is_err());
}

#[test]
fn connection_and_free_readers() {
    let fake = three_motors();
    let m = TachoMotor::with_id(fake.sysfs(), 2);
    assert!(is_connected(&m).unwrap());
    assert!(!is_connected(&TachoMotor::with_id(fake.sysfs(), 7)).unwrap());
    assert_eq!(address_of(&m).unwrap(), "outB");
    assert_eq!(driver_of(&m).unwrap(), LARGE);
}

#[test]
fn named_kinds_are_not_discoverable() {
    let fake = three_motors();
    let led = Led::new(fake.sysfs(), "led0:red:brick-status");
    assert!(matches!(
        find_after(None, &led, LARGE),
        Err(Error::NotDiscoverable(DeviceKind::Led))
    ));
    assert!(matches!(
        bind_to_port(&PowerSupply::battery(fake.sysfs()), "outA", LARGE),
        Err(Error::NotDiscoverable(DeviceKind::PowerSupply))
    ));
}
