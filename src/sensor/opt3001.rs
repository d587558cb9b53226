//! OPT3001 ambient light sensor.
//!
//! The device's conversion behavior is set by two config options:
//! `cfg_conversionmode` (`Shutdown`, `Singleshot`, `Continuous`) and
//! `cfg_conversiontime` (`100ms` or `800ms` per conversion). Boot default is continuous
//! conversion at 800 ms. Each configuration change is pushed to the
//! device immediately.

use crate::coap::Reading;
use crate::error::Error;
use crate::observe::Observers;
use crate::resource::Resource;
use crate::retry::Retry;

pub const NAME: &str = "opt3001";

const CONFIG_KEYS: &[&str] = &["cfg_conversionmode", "cfg_conversiontime"];
const MEASUREMENT_KEYS: &[&str] = &["sens"];

const BRINGUP_RETRIES: usize = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConversionMode {
    Shutdown,
    Singleshot,
    Continuous,
}

impl ConversionMode {
    fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "Shutdown" => Ok(ConversionMode::Shutdown),
            "Singleshot" => Ok(ConversionMode::Singleshot),
            "Continuous" => Ok(ConversionMode::Continuous),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConversionMode::Shutdown => "Shutdown",
            ConversionMode::Singleshot => "Singleshot",
            ConversionMode::Continuous => "Continuous",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConversionTime {
    Ms100,
    Ms800,
}

impl ConversionTime {
    fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "100ms" => Ok(ConversionTime::Ms100),
            "800ms" => Ok(ConversionTime::Ms800),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConversionTime::Ms100 => "100ms",
            ConversionTime::Ms800 => "800ms",
        }
    }
}

/// Register access to the light sensor.
pub trait Driver {
    /// Writes the conversion configuration register.
    fn configure(&mut self, mode: ConversionMode, time: ConversionTime) -> anyhow::Result<()>;
    /// Latest illuminance result, in lux.
    fn read_lux(&mut self) -> anyhow::Result<f32>;
}

pub struct Opt3001<D> {
    driver: D,
    mode: ConversionMode,
    time: ConversionTime,
    observers: Observers<1>,
    enabled: bool,
}

// === impl Opt3001 ===

impl<D: Driver> Opt3001<D> {
    /// Programs the boot configuration into the device.
    pub fn bringup(driver: D) -> anyhow::Result<Self> {
        let mut sensor = Self {
            driver,
            mode: ConversionMode::Continuous,
            time: ConversionTime::Ms800,
            observers: Observers::new(),
            enabled: true,
        };
        Retry::new(BRINGUP_RETRIES)
            .with_target("hothouse::opt3001")
            .run(|| sensor.driver.configure(sensor.mode, sensor.time))?;
        log::info!(
            target: "hothouse::opt3001",
            "up, {} at {}",
            sensor.mode.label(),
            sensor.time.label()
        );
        Ok(sensor)
    }
}

impl<D: Driver> Resource for Opt3001<D> {
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
        let (mode, time) = match key {
            "cfg_conversionmode" => (ConversionMode::parse(value)?, self.time),
            "cfg_conversiontime" => (self.mode, ConversionTime::parse(value)?),
            _ => return Err(Error::InvalidArgument),
        };
        // apply to the device before committing
        self.driver.configure(mode, time)?;
        self.mode = mode;
        self.time = time;
        Ok(())
    }

    fn read_config(&self, key: &str) -> Result<Reading, Error> {
        let label = match key {
            "cfg_conversionmode" => self.mode.label(),
            "cfg_conversiontime" => self.time.label(),
            _ => return Err(Error::InvalidArgument),
        };
        Ok(Reading::Label(label))
    }

    fn read(&mut self, _key: &str) -> Result<Reading, Error> {
        if !self.enabled {
            return Err(Error::Unsupported);
        }
        Ok(Reading::Value(self.driver.read_lux()?, "lux"))
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

    #[derive(Default)]
    struct Bench {
        configured: Option<(ConversionMode, ConversionTime)>,
        configure_failures: usize,
    }

    impl Driver for Bench {
        fn configure(&mut self, mode: ConversionMode, time: ConversionTime) -> anyhow::Result<()> {
            if self.configure_failures > 0 {
                self.configure_failures -= 1;
                anyhow::bail!("bus noise");
            }
            self.configured = Some((mode, time));
            Ok(())
        }
        fn read_lux(&mut self) -> anyhow::Result<f32> {
            Ok(320.0)
        }
    }

    #[test]
    fn bringup_programs_the_defaults() {
        let sensor = Opt3001::bringup(Bench::default()).unwrap();
        assert_eq!(
            sensor.driver.configured,
            Some((ConversionMode::Continuous, ConversionTime::Ms800))
        );
        assert_eq!(
            sensor.read_config("cfg_conversionmode").unwrap(),
            Reading::Label("Continuous")
        );
        assert_eq!(
            sensor.read_config("cfg_conversiontime").unwrap(),
            Reading::Label("800ms")
        );
    }

    #[test]
    fn bringup_retries_transient_failures() {
        let sensor = Opt3001::bringup(Bench {
            configure_failures: 2,
            ..Bench::default()
        })
        .unwrap();
        assert!(sensor.driver.configured.is_some());
    }

    #[test]
    fn config_changes_reach_the_device() {
        let mut sensor = Opt3001::bringup(Bench::default()).unwrap();
        sensor.put_config("cfg_conversiontime", "100ms").unwrap();
        assert_eq!(
            sensor.driver.configured,
            Some((ConversionMode::Continuous, ConversionTime::Ms100))
        );
        sensor.put_config("cfg_conversionmode", "Shutdown").unwrap();
        assert_eq!(
            sensor.driver.configured,
            Some((ConversionMode::Shutdown, ConversionTime::Ms100))
        );
    }

    #[test]
    fn failed_configure_does_not_commit() {
        let mut sensor = Opt3001::bringup(Bench::default()).unwrap();
        sensor.driver.configure_failures = 1;
        assert!(sensor.put_config("cfg_conversionmode", "Shutdown").is_err());
        assert_eq!(
            sensor.read_config("cfg_conversionmode").unwrap(),
            Reading::Label("Continuous")
        );
    }

    #[test]
    fn rejects_unknown_labels() {
        let mut sensor = Opt3001::bringup(Bench::default()).unwrap();
        assert!(matches!(
            sensor.put_config("cfg_conversionmode", "warp"),
            Err(Error::InvalidArgument)
        ));
        assert!(matches!(
            sensor.put_config("cfg_conversiontime", "50ms"),
            Err(Error::InvalidArgument)
        ));
    }

    #[test]
    fn reads_lux() {
        let mut sensor = Opt3001::bringup(Bench::default()).unwrap();
        assert_eq!(sensor.read("sens").unwrap(), Reading::Value(320.0, "lux"));
    }
}
