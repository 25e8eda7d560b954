//! Device wrapper reads and writes.

use std::time::Duration;

use ev3sys::Error;
use ev3sys::device::DeviceKind;
use ev3sys::prelude::*;

use crate::fake_sysfs::FakeSysfs;

#[test]
fn sensor_mode_round_trips() -> anyhow::Result<()> {
    let fake = FakeSysfs::new();
    fake.add(
        DeviceKind::Sensor,
        "sensor0",
        &[
            ("driver_name", "lego-ev3-color"),
            ("address", "in1"),
            ("mode", "COL-REFLECT"),
            ("modes", "COL-REFLECT COL-AMBIENT COL-COLOR"),
        ],
    );
    let sensor = Sensor::first(fake.sysfs(), "lego-ev3-color")?;
    assert_eq!(sensor.modes()?.len(), 3);
    sensor.set_mode("COL-COLOR");
    assert_eq!(sensor.mode()?, "COL-COLOR");
    Ok(())
}

#[test]
fn sensor_values_respect_count_and_decimals() {
    let fake = FakeSysfs::new();
    fake.add(
        DeviceKind::Sensor,
        "sensor3",
        &[
            ("num_values", "2"),
            ("decimals", "1"),
            ("value0", "215"),
            ("value1", "-4"),
            ("units", "pct"),
            ("poll_ms", "50"),
        ],
    );
    let sensor = Sensor::with_id(fake.sysfs(), 3);
    assert_eq!(sensor.value(0).unwrap(), "215");
    assert!((sensor.float_value(0).unwrap() - 21.5).abs() < 1e-9);
    assert!((sensor.float_value(1).unwrap() + 0.4).abs() < 1e-9);
    assert_eq!(sensor.poll_rate().unwrap(), Duration::from_millis(50));
    assert_eq!(sensor.units().unwrap(), "pct");

    match sensor.value(2) {
        Err(Error::InvalidValue { value, valid, .. }) => {
            assert_eq!(value, "2");
            assert_eq!(valid, ["0", "1"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn tacho_motor_attributes() {
    let fake = FakeSysfs::new();
    fake.add_motor("motor1", "outB", "lego-ev3-l-motor");
    fake.set(
        DeviceKind::TachoMotor,
        "motor1",
        "uevent",
        "LEGO_ADDRESS=outB\nLEGO_DRIVER_NAME=lego-ev3-l-motor\n",
    );
    let motor = TachoMotor::with_id(fake.sysfs(), 1);
    motor.set_time_sp(Duration::from_millis(1500));
    assert_eq!(fake.get(DeviceKind::TachoMotor, "motor1", "time_sp"), "1500");
    assert_eq!(motor.time_sp().unwrap(), Duration::from_millis(1500));
    assert_eq!(motor.stop_actions().unwrap(), ["coast", "brake", "hold"]);
    assert_eq!(motor.uevent().unwrap()["LEGO_ADDRESS"], "outB");
}

#[test]
fn servo_command_is_checked() {
    let fake = FakeSysfs::new();
    fake.add(
        DeviceKind::ServoMotor,
        "motor0",
        &[("command", ""), ("rate_sp", "0"), ("state", "")],
    );
    let servo = ServoMotor::with_id(fake.sysfs(), 0);
    servo.command("run").set_rate_sp(Duration::from_millis(300));
    assert_eq!(servo.rate_sp().unwrap(), Duration::from_millis(300));

    servo.command("spin");
    assert!(matches!(servo.take_error(), Some(Error::InvalidValue { .. })));
}

#[test]
fn lego_port_lookup_and_attachment() {
    let fake = FakeSysfs::new();
    fake.add(
        DeviceKind::LegoPort,
        "port0",
        &[("address", "ev3-ports:in1"), ("mode", "auto"), ("set_device", "")],
    );
    fake.add(
        DeviceKind::LegoPort,
        "port4",
        &[("address", "ev3-ports:outA"), ("mode", "auto")],
    );
    let attached = fake
        .sysfs()
        .class_path(DeviceKind::LegoPort)
        .join("port0")
        .join("in1:lego-ev3-touch");
    std::fs::create_dir(attached).unwrap();

    let port = LegoPort::for_name(fake.sysfs(), "ev3-ports:in1").unwrap();
    assert_eq!(port.handle().id(), Some(0));
    assert_eq!(port.connected_to().unwrap().as_deref(), Some("in1:lego-ev3-touch"));
    port.set_device("lego-ev3-touch");
    assert!(port.take_error().is_none());

    let out = LegoPort::for_name(fake.sysfs(), "ev3-ports:outA").unwrap();
    assert_eq!(out.connected_to().unwrap(), None);

    assert!(matches!(
        LegoPort::for_name(fake.sysfs(), "ev3-ports:outB"),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        LegoPort::for_name(fake.sysfs(), "spi0.1"),
        Err(Error::InvalidValue { .. })
    ));
}

#[test]
fn dc_motor_shares_motor_control() -> anyhow::Result<()> {
    let fake = FakeSysfs::new();
    fake.add(
        DeviceKind::DcMotor,
        "motor0",
        &[
            ("driver_name", "rcx-motor"),
            ("duty_cycle_sp", "0"),
            ("commands", "run-forever run-timed stop"),
            ("command", ""),
            ("state", "running"),
        ],
    );
    let dc = DcMotor::first(fake.sysfs(), "rcx-motor")?;
    dc.set_duty_cycle_sp(-60).command("run-forever");
    assert_eq!(dc.duty_cycle_sp()?, -60);
    assert_eq!(dc.state()?, MotorState::RUNNING);
    Ok(())
}

#[test]
fn tacho_pid_gains() -> anyhow::Result<()> {
    let fake = FakeSysfs::new();
    fake.add_motor("motor0", "outA", "lego-ev3-l-motor");
    fake.add(
        DeviceKind::TachoMotor,
        "motor0",
        &[
            ("hold_pid/Kp", "4000"),
            ("hold_pid/Ki", "0"),
            ("hold_pid/Kd", "0"),
            ("speed_pid/Kp", "1000"),
            ("speed_pid/Ki", "60"),
            ("speed_pid/Kd", "0"),
        ],
    );
    let motor = TachoMotor::with_id(fake.sysfs(), 0);
    assert_eq!(motor.hold_pid()?, Pid { kp: 4000, ki: 0, kd: 0 });

    motor.set_speed_pid(Pid { kp: 900, ki: 50, kd: 5 });
    assert_eq!(fake.get(DeviceKind::TachoMotor, "motor0", "speed_pid/Kd"), "5");
    assert_eq!(motor.speed_pid()?, Pid { kp: 900, ki: 50, kd: 5 });
    Ok(())
}

#[test]
fn sensor_raw_attributes_keep_their_bytes() {
    let fake = FakeSysfs::new();
    fake.add(DeviceKind::Sensor, "sensor1", &[("bin_data_format", "s16")]);
    let dir = fake.sysfs().class_path(DeviceKind::Sensor).join("sensor1");
    std::fs::write(dir.join("bin_data"), [0xd7u8, 0x0a]).unwrap();
    std::fs::write(dir.join("direct"), b"").unwrap();

    let sensor = Sensor::with_id(fake.sysfs(), 1);
    assert_eq!(sensor.bin_data().unwrap(), [0xd7, 0x0a]);
    sensor.set_direct(&[0x01, 0xff]);
    assert!(sensor.take_error().is_none());
    assert_eq!(fake.get_bytes(DeviceKind::Sensor, "sensor1", "direct"), [0x01, 0xff]);
    assert_eq!(sensor.direct().unwrap(), [0x01, 0xff]);
}

#[test]
fn power_supply_reports_volts_and_amps() -> anyhow::Result<()> {
    let fake = FakeSysfs::new();
    fake.add(
        DeviceKind::PowerSupply,
        "legoev3-battery",
        &[
            ("voltage_now", "7831000"),
            ("current_now", "154000"),
            ("voltage_max_design", "9000000"),
            ("voltage_min_design", "6000000"),
            ("technology", "Li-ion"),
            ("type", "Battery"),
        ],
    );
    let battery = PowerSupply::battery(fake.sysfs());
    assert_eq!(battery.instance_name(), "legoev3-battery");
    assert!((battery.voltage()? - 7.831).abs() < 1e-9);
    assert!((battery.current()? - 0.154).abs() < 1e-9);
    assert!((battery.voltage_max_design()? - 9.0).abs() < 1e-9);
    assert!((battery.voltage_min_design()? - 6.0).abs() < 1e-9);
    assert_eq!(battery.technology()?, "Li-ion");
    assert_eq!(battery.supply_type()?, "Battery");

    let missing = PowerSupply::new(fake.sysfs(), "usb");
    assert!(!is_connected(&missing)?);
    assert_eq!(
        missing.voltage().unwrap_err().io_kind(),
        Some(std::io::ErrorKind::NotFound)
    );
    Ok(())
}

#[test]
fn led_brightness_and_trigger() {
    const NAME: &str = "led0:green:brick-status";
    let fake = FakeSysfs::new();
    fake.add(
        DeviceKind::Led,
        NAME,
        &[
            ("brightness", "0"),
            ("max_brightness", "255"),
            ("trigger", "none [default-on] timer heartbeat "),
            ("delay_on", "500"),
            ("delay_off", "500"),
        ],
    );
    let led = Led::new(fake.sysfs(), NAME);
    assert_eq!(led.max_brightness().unwrap(), 255);
    assert_eq!(led.trigger().unwrap(), "default-on");
    assert_eq!(led.triggers().unwrap(), ["none", "default-on", "timer", "heartbeat"]);

    led.set_brightness(255).set_delay_on(Duration::from_millis(250));
    assert!(led.take_error().is_none());
    assert_eq!(fake.get(DeviceKind::Led, NAME, "brightness"), "255");
    assert_eq!(led.delay_on().unwrap(), Duration::from_millis(250));
    assert_eq!(led.delay_off().unwrap(), Duration::from_millis(500));

    led.set_trigger("blink").set_brightness(1);
    match led.take_error() {
        Some(Error::InvalidValue { value, valid, .. }) => {
            assert_eq!(value, "blink");
            assert_eq!(valid, ["default-on", "heartbeat", "none", "timer"]);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(fake.get(DeviceKind::Led, NAME, "brightness"), "255");

    led.set_trigger("timer");
    assert!(led.take_error().is_none());
    assert_eq!(fake.get(DeviceKind::Led, NAME, "trigger"), "timer");
}
