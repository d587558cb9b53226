//! MQ6 combustible-gas sensor.
//!
//! The sensing element is a resistance that drops as gas concentration
//! rises, read through a voltage divider on a 10-bit ADC. At bring-up the
//! sensor is calibrated in clean air to find `Ro`, the baseline
//! resistance; readings then convert the measured `Rs/Ro` ratio to ppm
//! through a datasheet curve. The `cfg` option selects which gas curve is
//! used (`lpg` by default, or `ch4`).

use crate::coap::Reading;
use crate::convert::{self, GasCurve, CH4_CURVE, LPG_CURVE};
use crate::error::Error;
use crate::observe::Observers;
use crate::resource::Resource;
use crate::retry::Retry;

pub const NAME: &str = "mq6";

const CONFIG_KEYS: &[&str] = &["cfg"];
const MEASUREMENT_KEYS: &[&str] = &["sens"];

/// Load resistance of the divider, in kilohms.
const LOAD_RESISTANCE_KOHMS: f32 = 20.0;
/// `Rs/Ro` in clean air, from the datasheet.
const CLEAN_AIR_FACTOR: f32 = 9.83;
/// Samples averaged during calibration.
const CALIBRATION_SAMPLES: usize = 100;
/// Samples averaged per live reading.
const READ_SAMPLES: usize = 10;
/// Bring-up retries before giving up on the device.
const BRINGUP_RETRIES: usize = 3;

/// One raw ADC sample off the divider, in [0, 1023].
pub trait Driver {
    fn sample(&mut self) -> anyhow::Result<f32>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum GasType {
    Lpg,
    Ch4,
}

impl GasType {
    fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "lpg" => Ok(GasType::Lpg),
            "ch4" => Ok(GasType::Ch4),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn label(self) -> &'static str {
        match self {
            GasType::Lpg => "lpg",
            GasType::Ch4 => "ch4",
        }
    }

    fn curve(self) -> &'static GasCurve {
        match self {
            GasType::Lpg => &LPG_CURVE,
            GasType::Ch4 => &CH4_CURVE,
        }
    }
}

pub struct Mq6<D> {
    driver: D,
    gas: GasType,
    /// Baseline sensing resistance in clean air, in kilohms.
    ro: f32,
    observers: Observers<1>,
    enabled: bool,
}

// === impl Mq6 ===

impl<D: Driver> Mq6<D> {
    /// Calibrates in clean air and returns the ready sensor. The divider
    /// occasionally reads garbage right after power-on, so calibration is
    /// retried a few times.
    pub fn bringup(driver: D) -> anyhow::Result<Self> {
        let mut sensor = Self {
            driver,
            gas: GasType::Lpg,
            ro: 0.0,
            observers: Observers::new(),
            enabled: true,
        };
        Retry::new(BRINGUP_RETRIES)
            .with_target("hothouse::mq6")
            .run(|| sensor.calibrate())?;
        log::info!(target: "hothouse::mq6", "calibrated, Ro = {} kOhm", sensor.ro);
        Ok(sensor)
    }

    fn calibrate(&mut self) -> anyhow::Result<()> {
        let rs = self.resistance(CALIBRATION_SAMPLES)?;
        self.ro = rs / CLEAN_AIR_FACTOR;
        Ok(())
    }

    /// Average sensing resistance over `samples` ADC reads, in kilohms.
    fn resistance(&mut self, samples: usize) -> anyhow::Result<f32> {
        let mut sum = 0.0;
        for _ in 0..samples {
            let raw = self.driver.sample()?;
            anyhow::ensure!(
                (1.0..=1023.0).contains(&raw),
                "ADC sample {raw} out of range"
            );
            sum += LOAD_RESISTANCE_KOHMS * (1023.0 - raw) / raw;
        }
        Ok(sum / samples as f32)
    }
}

impl<D: Driver> Resource for Mq6<D> {
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
        self.gas = GasType::parse(value)?;
        Ok(())
    }

    fn read_config(&self, _key: &str) -> Result<Reading, Error> {
        Ok(Reading::Label(self.gas.label()))
    }

    fn read(&mut self, _key: &str) -> Result<Reading, Error> {
        if !self.enabled {
            return Err(Error::Unsupported);
        }
        let rs = self.resistance(READ_SAMPLES)?;
        let ppm = convert::gas_ppm(rs / self.ro, self.gas.curve());
        Ok(Reading::Value(ppm, "ppm"))
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

    struct Adc {
        raw: f32,
    }

    impl Driver for Adc {
        fn sample(&mut self) -> anyhow::Result<f32> {
            Ok(self.raw)
        }
    }

    /// Raw ADC count whose divider resistance equals `rs` kilohms.
    fn raw_for(rs: f32) -> f32 {
        1023.0 * LOAD_RESISTANCE_KOHMS / (rs + LOAD_RESISTANCE_KOHMS)
    }

    #[test]
    fn calibration_derives_ro() {
        let sensor = Mq6::bringup(Adc { raw: raw_for(98.3) }).unwrap();
        assert_float_eq!(sensor.ro, 10.0, 1e-3);
    }

    #[test]
    fn reads_ppm_from_the_ratio() {
        // Rs/Ro of exactly 1.017 sits on the 1000 ppm LPG table sample
        let mut sensor = Mq6::bringup(Adc { raw: raw_for(98.3) }).unwrap();
        sensor.driver.raw = raw_for(sensor.ro * 1.017);
        let reading = sensor.read("sens").unwrap();
        match reading {
            Reading::Value(ppm, "ppm") => assert_float_eq!(ppm, 1000.0, 1.0),
            other => panic!("unexpected reading {other:?}"),
        }
    }

    #[test]
    fn switches_gas_curves() {
        let mut sensor = Mq6::bringup(Adc { raw: raw_for(98.3) }).unwrap();
        assert_eq!(sensor.read_config("cfg").unwrap(), Reading::Label("lpg"));
        sensor.put_config("cfg", "ch4").unwrap();
        assert_eq!(sensor.read_config("cfg").unwrap(), Reading::Label("ch4"));
        assert!(matches!(
            sensor.put_config("cfg", "co2"),
            Err(Error::InvalidArgument)
        ));
    }

    #[test]
    fn bringup_fails_on_a_dead_divider() {
        // a floating input pinned at full scale never calibrates
        struct Dead;
        impl Driver for Dead {
            fn sample(&mut self) -> anyhow::Result<f32> {
                Ok(0.0)
            }
        }
        assert!(Mq6::bringup(Dead).is_err());
    }

    #[test]
    fn disabled_refuses_reads() {
        let mut sensor = Mq6::bringup(Adc { raw: raw_for(98.3) }).unwrap();
        sensor.disable().unwrap();
        assert!(matches!(sensor.read("sens"), Err(Error::Unsupported)));
        assert!(sensor.read_config("cfg").is_ok());
    }
}
