//! HX711 load-cell amplifier, reporting weight.
//!
//! `cfg_scale` selects the reporting unit (`kg` by default, or `lbs`).
//! `calib_f` exposes the load cell's calibration factor as a read-only
//! config value; it is fixed per cell at build time. Bring-up tares the
//! scale, so readings are relative to whatever was on the platform at
//! boot.

use crate::coap::Reading;
use crate::error::Error;
use crate::observe::Observers;
use crate::resource::Resource;

pub const NAME: &str = "hx711";

const CONFIG_KEYS: &[&str] = &["cfg_scale", "calib_f"];
const MEASUREMENT_KEYS: &[&str] = &["sens"];

/// ADC counts per kilogram for the attached load cell.
const CALIBRATION_FACTOR: f32 = 2280.0;

const KILOGRAMS_TO_POUNDS: f32 = 2.20462;

/// Calibrated access to the load cell.
pub trait Driver {
    /// Weight currently on the platform, in kilograms.
    fn read(&mut self) -> anyhow::Result<f32>;
    /// Zeroes the scale at the current load.
    fn tare(&mut self) -> anyhow::Result<()>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum WeightScale {
    Kilograms,
    Pounds,
}

impl WeightScale {
    fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "kg" => Ok(WeightScale::Kilograms),
            "lbs" => Ok(WeightScale::Pounds),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn label(self) -> &'static str {
        match self {
            WeightScale::Kilograms => "kg",
            WeightScale::Pounds => "lbs",
        }
    }
}

pub struct Hx711<D> {
    driver: D,
    scale: WeightScale,
    observers: Observers<1>,
    enabled: bool,
}

// === impl Hx711 ===

impl<D: Driver> Hx711<D> {
    /// Tares the scale and returns the ready resource.
    pub fn bringup(mut driver: D) -> anyhow::Result<Self> {
        driver.tare()?;
        log::info!(target: "hothouse::hx711", "tared, calibration factor {CALIBRATION_FACTOR}");
        Ok(Self {
            driver,
            scale: WeightScale::Kilograms,
            observers: Observers::new(),
            enabled: true,
        })
    }
}

impl<D: Driver> Resource for Hx711<D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn config_keys(&self) -> &'static [&'static str] {
        CONFIG_KEYS
    }

    fn measurement_keys(&self) -> &'static [&'static str] {
        MEASUREMENT_KEYS
    }

    fn put_config(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "cfg_scale" => {
                self.scale = WeightScale::parse(value)?;
                Ok(())
            }
            // the calibration factor is fixed per load cell
            "calib_f" => Err(Error::InvalidArgument),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn read_config(&self, key: &str) -> Result<Reading, Error> {
        match key {
            "cfg_scale" => Ok(Reading::Label(self.scale.label())),
            "calib_f" => Ok(Reading::Value(CALIBRATION_FACTOR, "")),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn read(&mut self, _key: &str) -> Result<Reading, Error> {
        if !self.enabled {
            return Err(Error::Unsupported);
        }
        let kilograms = self.driver.read()?;
        let reading = match self.scale {
            WeightScale::Kilograms => Reading::Value(kilograms, "kg"),
            WeightScale::Pounds => Reading::Value(kilograms * KILOGRAMS_TO_POUNDS, "lbs"),
        };
        Ok(reading)
    }

    fn register(&mut self, _key: &str) -> Result<(), Error> {
        self.observers.register(0)
    }

    fn deregister(&mut self, _key: &str) -> Result<(), Error> {
        self.observers.deregister(0)
    }

    fn disable(&mut self) -> Result<(), Error> {
        self.enabled = false;
        Ok(())
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_float_eq {
        ($a:expr, $b:expr, $epsilon:expr) => {{
            let a = $a;
            let b = $b;
            assert!((a - b).abs() < $epsilon, "{a} != {b} (~{})", $epsilon)
        }};
    }

    #[derive(Default)]
    struct Cell {
        kilograms: f32,
        tared: bool,
    }

    impl Driver for Cell {
        fn read(&mut self) -> anyhow::Result<f32> {
            anyhow::ensure!(self.tared, "scale not tared");
            Ok(self.kilograms)
        }
        fn tare(&mut self) -> anyhow::Result<()> {
            self.tared = true;
            Ok(())
        }
    }

    #[test]
    fn bringup_tares_the_scale() {
        let mut scale = Hx711::bringup(Cell {
            kilograms: 1.5,
            ..Cell::default()
        })
        .unwrap();
        assert!(scale.driver.tared);
        assert_eq!(scale.read("sens").unwrap(), Reading::Value(1.5, "kg"));
    }

    #[test]
    fn pounds_scale_converts() {
        let mut scale = Hx711::bringup(Cell {
            kilograms: 2.0,
            ..Cell::default()
        })
        .unwrap();
        scale.put_config("cfg_scale", "lbs").unwrap();
        match scale.read("sens").unwrap() {
            Reading::Value(weight, "lbs") => assert_float_eq!(weight, 4.40924, 1e-4),
            other => panic!("unexpected reading {other:?}"),
        }
    }

    #[test]
    fn calibration_factor_is_read_only() {
        let mut scale = Hx711::bringup(Cell::default()).unwrap();
        assert_eq!(
            scale.read_config("calib_f").unwrap(),
            Reading::Value(CALIBRATION_FACTOR, "")
        );
        assert!(matches!(
            scale.put_config("calib_f", "2000"),
            Err(Error::InvalidArgument)
        ));
    }

    #[test]
    fn rejects_unknown_scale() {
        let mut scale = Hx711::bringup(Cell::default()).unwrap();
        assert!(matches!(
            scale.put_config("cfg_scale", "stone"),
            Err(Error::InvalidArgument)
        ));
        assert_eq!(
            scale.read_config("cfg_scale").unwrap(),
            Reading::Label("kg")
        );
    }
}
