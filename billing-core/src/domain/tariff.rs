use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::BillingError;

pub const DEFAULT_ELECTRICITY_RATE: f64 = 8.53;
pub const DEFAULT_WATER_RATE: f64 = 12.0;
pub const DEFAULT_WIFI_FEE: f64 = 500.0;

/// Rates applied to every room of a billing run.
///
/// - `electricity_rate`: multiplier per electricity unit.
/// - `water_rate`: multiplier per water unit.
/// - `wifi_fee`: fixed amount added to every room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariff {
    pub electricity_rate: f64,
    pub water_rate: f64,
    pub wifi_fee: f64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            electricity_rate: DEFAULT_ELECTRICITY_RATE,
            water_rate: DEFAULT_WATER_RATE,
            wifi_fee: DEFAULT_WIFI_FEE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TariffField {
    ElectricityRate,
    WaterRate,
    WifiFee,
}

impl TariffField {
    pub const ALL: [TariffField; 3] = [Self::ElectricityRate, Self::WaterRate, Self::WifiFee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ElectricityRate => "electricity_rate",
            Self::WaterRate => "water_rate",
            Self::WifiFee => "wifi_fee",
        }
    }
}

impl fmt::Display for TariffField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TariffField {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| BillingError::SchemaMismatch(format!("unknown tariff field '{s}'")))
    }
}

fn check_rate(field: TariffField, value: f64) -> Result<f64, BillingError> {
    // NaN fails the comparison too.
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BillingError::InvalidTariff { field, value })
    }
}

impl Tariff {
    pub fn new(electricity_rate: f64, water_rate: f64, wifi_fee: f64) -> Result<Self, BillingError> {
        let tariff = Self {
            electricity_rate,
            water_rate,
            wifi_fee,
        };
        tariff.check()?;
        Ok(tariff)
    }

    /// Re-checks every field, e.g. after deserializing configured defaults.
    pub fn check(&self) -> Result<(), BillingError> {
        for field in TariffField::ALL {
            check_rate(field, self.get(field))?;
        }
        Ok(())
    }

    pub fn get(&self, field: TariffField) -> f64 {
        match field {
            TariffField::ElectricityRate => self.electricity_rate,
            TariffField::WaterRate => self.water_rate,
            TariffField::WifiFee => self.wifi_fee,
        }
    }

    /// Sets one field. A rejected value leaves the tariff untouched.
    pub fn set(&mut self, field: TariffField, value: f64) -> Result<(), BillingError> {
        let value = check_rate(field, value)?;
        match field {
            TariffField::ElectricityRate => self.electricity_rate = value,
            TariffField::WaterRate => self.water_rate = value,
            TariffField::WifiFee => self.wifi_fee = value,
        }
        Ok(())
    }
}
