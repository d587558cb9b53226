//! BME280 temperature, pressure, humidity, and altitude sensor.
//!
//! Two independent config options select the reporting units:
//! `cfg_temp` (`C` or `F`, Celsius by default) and `cfg_altitude`
//! (`M` or `F` for meters or feet, meters by default). Pressure is always
//! hectopascals and humidity always percent relative.

use crate::coap::Reading;
use crate::convert;
use crate::error::Error;
use crate::observe::Observers;
use crate::resource::Resource;

pub const NAME: &str = "bme280";

const CONFIG_KEYS: &[&str] = &["cfg_temp", "cfg_altitude"];
const MEASUREMENT_KEYS: &[&str] = &["sens_temp", "sens_pressure", "sens_altitude", "sens_humidity"];

/// Mean sea-level pressure used for altitude derivation, in hPa.
const SEA_LEVEL_HPA: f32 = 1013.25;

/// Compensated readings off the device.
pub trait Driver {
    /// Temperature in degrees Celsius.
    fn read_temperature(&mut self) -> anyhow::Result<f32>;
    /// Barometric pressure in pascals.
    fn read_pressure(&mut self) -> anyhow::Result<f32>;
    /// Altitude in meters, derived against `sea_level_hpa`.
    fn read_altitude(&mut self, sea_level_hpa: f32) -> anyhow::Result<f32>;
    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> anyhow::Result<f32>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum TempScale {
    Celsius,
    Fahrenheit,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum AltitudeScale {
    Meters,
    Feet,
}

pub struct Bme280<D> {
    driver: D,
    temp: TempScale,
    altitude: AltitudeScale,
    observers: Observers<4>,
    enabled: bool,
}

// === impl Bme280 ===

impl<D: Driver> Bme280<D> {
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            temp: TempScale::Celsius,
            altitude: AltitudeScale::Meters,
            observers: Observers::new(),
            enabled: true,
        }
    }

    /// Confirms the device answers with a plausible first reading.
    pub fn bringup(mut self) -> anyhow::Result<Self> {
        let celsius = self.driver.read_temperature()?;
        log::info!(target: "hothouse::bme280", "up, ambient {celsius} C");
        Ok(self)
    }
}

impl<D: Driver> Resource for Bme280<D> {
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
            "cfg_temp" => {
                self.temp = match value {
                    "C" => TempScale::Celsius,
                    "F" => TempScale::Fahrenheit,
                    _ => return Err(Error::InvalidArgument),
                }
            }
            "cfg_altitude" => {
                self.altitude = match value {
                    "M" => AltitudeScale::Meters,
                    "F" => AltitudeScale::Feet,
                    _ => return Err(Error::InvalidArgument),
                }
            }
            _ => return Err(Error::InvalidArgument),
        }
        Ok(())
    }

    fn read_config(&self, key: &str) -> Result<Reading, Error> {
        let label = match key {
            "cfg_temp" => match self.temp {
                TempScale::Celsius => "C",
                TempScale::Fahrenheit => "F",
            },
            "cfg_altitude" => match self.altitude {
                AltitudeScale::Meters => "M",
                AltitudeScale::Feet => "F",
            },
            _ => return Err(Error::InvalidArgument),
        };
        Ok(Reading::Label(label))
    }

    fn read(&mut self, key: &str) -> Result<Reading, Error> {
        if !self.enabled {
            return Err(Error::Unsupported);
        }
        let reading = match key {
            "sens_temp" => {
                let celsius = self.driver.read_temperature()?;
                match self.temp {
                    TempScale::Celsius => Reading::Value(celsius, "C"),
                    TempScale::Fahrenheit => {
                        Reading::Value(convert::celsius_to_fahrenheit(celsius), "F")
                    }
                }
            }
            "sens_pressure" => {
                let pascals = self.driver.read_pressure()?;
                Reading::Value(convert::pascals_to_hectopascals(pascals), "hPa")
            }
            "sens_altitude" => {
                let meters = self.driver.read_altitude(SEA_LEVEL_HPA)?;
                match self.altitude {
                    AltitudeScale::Meters => Reading::Value(meters, "m"),
                    AltitudeScale::Feet => Reading::Value(convert::meters_to_feet(meters), "ft"),
                }
            }
            "sens_humidity" => Reading::Value(self.driver.read_humidity()?, "%"),
            _ => return Err(Error::InvalidArgument),
        };
        Ok(reading)
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
