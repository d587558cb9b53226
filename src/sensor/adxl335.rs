//! ADXL335 three-axis analog accelerometer.
//!
//! The device reports one raw ADC count per axis; a single `cfg` option
//! selects how all three axes are interpreted:
//!
//! - `rawdata`: the ADC count itself,
//! - `gforce`: linear acceleration in g,
//! - `rotation`: a tilt angle in radians derived from the other two axes.
//!
//! Boot default is `rawdata`.

use crate::coap::Reading;
use crate::convert::{self, GforceScale, RotationRange};
use crate::error::Error;
use crate::observe::Observers;
use crate::resource::Resource;

pub const NAME: &str = "adxl335";

const CONFIG_KEYS: &[&str] = &["cfg"];
const MEASUREMENT_KEYS: &[&str] = &["sens_x", "sens_y", "sens_z"];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn from_key(key: &str) -> Result<Self, Error> {
        match key {
            "sens_x" => Ok(Axis::X),
            "sens_y" => Ok(Axis::Y),
            "sens_z" => Ok(Axis::Z),
            _ => Err(Error::InvalidArgument),
        }
    }

    /// The two companion axes a rotation reading for this axis is derived
    /// from, in `atan2(a, b)` argument order.
    fn companions(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::Y, Axis::X),
        }
    }
}

/// Raw access to the accelerometer's three ADC channels.
pub trait Driver {
    fn read_axis(&mut self, axis: Axis) -> anyhow::Result<f32>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Measurement {
    Gforce,
    Rotation,
    Rawdata,
}

impl Measurement {
    fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "gforce" => Ok(Measurement::Gforce),
            "rotation" => Ok(Measurement::Rotation),
            "rawdata" => Ok(Measurement::Rawdata),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Measurement::Gforce => "gforce",
            Measurement::Rotation => "rotation",
            Measurement::Rawdata => "rawdata",
        }
    }
}

pub struct Adxl335<D> {
    driver: D,
    measurement: Measurement,
    gforce: GforceScale,
    rotation: RotationRange,
    observers: Observers<3>,
    enabled: bool,
}

// === impl Adxl335 ===

impl<D: Driver> Adxl335<D> {
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            measurement: Measurement::Rawdata,
            gforce: GforceScale::default(),
            rotation: RotationRange::default(),
            observers: Observers::new(),
            enabled: true,
        }
    }

    /// Confirms the device answers on all three channels.
    pub fn bringup(mut self) -> anyhow::Result<Self> {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let raw = self.driver.read_axis(axis)?;
            log::debug!(target: "hothouse::adxl335", "{axis:?} reads {raw}");
        }
        log::info!(target: "hothouse::adxl335", "accelerometer up");
        Ok(self)
    }

    fn read_axis(&mut self, axis: Axis) -> Result<Reading, Error> {
        let reading = match self.measurement {
            Measurement::Rawdata => {
                let raw = self.driver.read_axis(axis)?;
                Reading::Value(raw, "raw")
            }
            Measurement::Gforce => {
                let raw = self.driver.read_axis(axis)?;
                Reading::Value(convert::gforce(raw, &self.gforce), "g")
            }
            Measurement::Rotation => {
                let (a, b) = axis.companions();
                let a = self.driver.read_axis(a)?;
                let b = self.driver.read_axis(b)?;
                Reading::Value(convert::rotation(a, b, &self.rotation), "radians")
            }
        };
        Ok(reading)
    }
}

impl<D: Driver> Resource for Adxl335<D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn config_keys(&self) -> &'static [&'static str] {
        CONFIG_KEYS
    }

    fn measurement_keys(&self) -> &'static [&'static str] {
        MEASUREMENT_KEYS
    }

    fn put_config(&mut self, _key: &str, value: &str) -> Result<(), Error> {
        self.measurement = Measurement::parse(value)?;
        Ok(())
    }

    fn read_config(&self, _key: &str) -> Result<Reading, Error> {
        Ok(Reading::Label(self.measurement.label()))
    }

    fn read(&mut self, key: &str) -> Result<Reading, Error> {
        if !self.enabled {
            return Err(Error::Unsupported);
        }
        self.read_axis(Axis::from_key(key)?)
    }

    fn register(&mut self, key: &str) -> Result<(), Error> {
        self.observers.register(channel(key)?)
    }

    fn deregister(&mut self, key: &str) -> Result<(), Error> {
        self.observers.deregister(channel(key)?)
    }

    fn disable(&mut self) -> Result<(), Error> {
        self.enabled = false;
        Ok(())
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}

fn channel(key: &str) -> Result<usize, Error> {
    MEASUREMENT_KEYS
        .iter()
        .position(|&k| k == key)
        .ok_or(Error::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    macro_rules! assert_float_eq {
        ($a:expr, $b:expr, $epsilon:expr) => {
            let a = $a;
            let b = $b;
            assert!((a - b).abs() < $epsilon, "{a} != {b} (~{})", $epsilon)
        };
    }

    struct Fixed {
        x: f32,
        y: f32,
        z: f32,
    }

    impl Driver for Fixed {
        fn read_axis(&mut self, axis: Axis) -> anyhow::Result<f32> {
            Ok(match axis {
                Axis::X => self.x,
                Axis::Y => self.y,
                Axis::Z => self.z,
            })
        }
    }

    fn accel() -> Adxl335<Fixed> {
        Adxl335::new(Fixed {
            x: 2457.5,
            y: 2048.0,
            z: 330.0,
        })
    }

    fn value(reading: Reading) -> (f32, &'static str) {
        match reading {
            Reading::Value(v, unit) => (v, unit),
            other => panic!("expected a value, got {other:?}"),
        }
    }

    #[test]
    fn boots_in_rawdata() {
        let mut accel = accel();
        assert_eq!(
            accel.read_config("cfg").unwrap(),
            Reading::Label("rawdata")
        );
        assert_eq!(
            accel.read("sens_x").unwrap(),
            Reading::Value(2457.5, "raw")
        );
    }

    #[test]
    fn gforce_mode_scales_counts() {
        let mut accel = accel();
        accel.put_config("cfg", "gforce").unwrap();
        let (g, unit) = value(accel.read("sens_x").unwrap());
        assert_eq!(unit, "g");
        assert_float_eq!(g, 1.0, 1e-6);
        let (g, _) = value(accel.read("sens_y").unwrap());
        assert_float_eq!(g, 0.0, 1e-6);
    }

    #[test]
    fn rotation_mode_uses_companion_axes() {
        // z's companions both read 330 raw, the midpoint of the rotation
        // range, so the derived angle is pi regardless of z itself
        let mut accel = Adxl335::new(Fixed {
            x: 330.0,
            y: 330.0,
            z: 9999.0,
        });
        accel.put_config("cfg", "rotation").unwrap();
        let (angle, unit) = value(accel.read("sens_z").unwrap());
        assert_eq!(unit, "radians");
        assert_float_eq!(angle, PI, 1e-6);
    }

    #[test]
    fn rejects_unknown_measurement() {
        let mut accel = accel();
        assert!(matches!(
            accel.put_config("cfg", "jerk"),
            Err(Error::InvalidArgument)
        ));
        // config unchanged by the failed put
        assert_eq!(
            accel.read_config("cfg").unwrap(),
            Reading::Label("rawdata")
        );
    }

    #[test]
    fn axes_observe_independently() {
        let mut accel = accel();
        accel.register("sens_y").unwrap();
        assert!(!accel.observers.is_registered(0));
        assert!(accel.observers.is_registered(1));
        accel.deregister("sens_y").unwrap();
        assert!(!accel.observers.is_registered(1));
    }

    #[test]
    fn disabled_refuses_reads() {
        let mut accel = accel();
        accel.disable().unwrap();
        assert!(matches!(accel.read("sens_x"), Err(Error::Unsupported)));
        // config stays readable
        assert!(accel.read_config("cfg").is_ok());
    }
}
