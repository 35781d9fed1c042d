//! Flight condition and the International Standard Atmosphere

use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};

pub const MIN_ALTITUDE_FT: f64 = -1.0e3;
pub const MAX_ALTITUDE_FT: f64 = 65.0e3;

const FT_TO_M: f64 = 0.3048;
const G0: f64 = 9.80665;
const R_AIR: f64 = 287.05287;
const GAMMA: f64 = 1.4;
const T0: f64 = 288.15;
const P0: f64 = 101_325.0;
const LAPSE_RATE: f64 = 0.0065;
const TROPOPAUSE_M: f64 = 11_000.0;

/// Atmospheric state at an altitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Temperature in K
    pub temperature: f64,
    /// Static pressure in Pa
    pub pressure: f64,
    /// Density in kg/m³
    pub density: f64,
    /// Speed of sound in m/s
    pub speed_of_sound: f64,
}

impl Atmosphere {
    /// ISA troposphere and lower stratosphere (isothermal above 11 km)
    pub fn isa(altitude_m: f64) -> Self {
        let (temperature, pressure) = if altitude_m <= TROPOPAUSE_M {
            let t = T0 - LAPSE_RATE * altitude_m;
            (t, P0 * (t / T0).powf(G0 / (LAPSE_RATE * R_AIR)))
        } else {
            let t11 = T0 - LAPSE_RATE * TROPOPAUSE_M;
            let p11 = P0 * (t11 / T0).powf(G0 / (LAPSE_RATE * R_AIR));
            (t11, p11 * (-G0 / (R_AIR * t11) * (altitude_m - TROPOPAUSE_M)).exp())
        };
        Self {
            temperature,
            pressure,
            density: pressure / (R_AIR * temperature),
            speed_of_sound: (GAMMA * R_AIR * temperature).sqrt(),
        }
    }
}

/// Shared reference condition of all load cases
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightCondition {
    /// Aircraft mass in kg
    pub weight: f64,
    /// True airspeed in m/s
    pub speed: f64,
    /// Pressure altitude in ft
    pub altitude: f64,
}

impl FlightCondition {
    pub fn new(weight: f64, speed: f64, altitude: f64) -> Self {
        Self { weight, speed, altitude }
    }

    pub fn validate(&self) -> WingboxResult<()> {
        if !(MIN_ALTITUDE_FT..=MAX_ALTITUDE_FT).contains(&self.altitude) {
            return Err(WingboxError::out_of_range(
                "altitude",
                format!(
                    "{} ft is outside [{}, {}] ft",
                    self.altitude, MIN_ALTITUDE_FT, MAX_ALTITUDE_FT
                ),
            ));
        }
        if !(self.speed > 0.0) {
            return Err(WingboxError::out_of_range("speed", format!("must be positive, got {}", self.speed)));
        }
        if !(self.weight > 0.0) {
            return Err(WingboxError::out_of_range("weight", format!("must be positive, got {}", self.weight)));
        }
        Ok(())
    }

    pub fn atmosphere(&self) -> Atmosphere {
        Atmosphere::isa(self.altitude * FT_TO_M)
    }

    pub fn mach(&self) -> f64 {
        self.speed / self.atmosphere().speed_of_sound
    }

    /// 0.5 ρ V² in Pa
    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.atmosphere().density * self.speed * self.speed
    }

    /// Lift coefficient needed for level flight on `reference_area` (m²)
    pub fn trim_lift_coefficient(&self, reference_area: f64) -> f64 {
        self.weight * G0 / (self.dynamic_pressure() * reference_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sea_level() {
        let atm = Atmosphere::isa(0.0);
        assert_relative_eq!(atm.temperature, 288.15);
        assert_relative_eq!(atm.density, 1.225, epsilon = 1e-3);
        assert_relative_eq!(atm.speed_of_sound, 340.29, epsilon = 1e-2);
    }

    #[test]
    fn test_stratosphere() {
        let atm = Atmosphere::isa(15_000.0);
        assert_relative_eq!(atm.temperature, 216.65, epsilon = 1e-9);
        assert_relative_eq!(atm.pressure, 12_045.0, max_relative = 2e-3);
        assert_relative_eq!(atm.density, 0.19367, max_relative = 2e-3);
    }

    #[test]
    fn test_altitude_band() {
        assert!(FlightCondition::new(5000.0, 80.0, 65_000.0).validate().is_ok());
        assert!(FlightCondition::new(5000.0, 80.0, -1_000.0).validate().is_ok());
        assert!(FlightCondition::new(5000.0, 80.0, 65_001.0).validate().is_err());
        assert!(FlightCondition::new(5000.0, 80.0, -1_001.0).validate().is_err());
    }

    #[test]
    fn test_dynamic_pressure() {
        let fc = FlightCondition::new(5000.0, 100.0, 0.0);
        assert_relative_eq!(fc.dynamic_pressure(), 0.5 * 1.225 * 1e4, max_relative = 1e-3);
    }
}
