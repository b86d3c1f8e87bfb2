//! The fixed 18-column layout of the temperature log.
//!
//! The log carries no header; column order is a hard contract declared here
//! and assigned positionally at load time. Files whose retained lines do not
//! match [`COLUMN_COUNT`] fields are rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::TempLogError;

/// Total fields per data line: 1 timestamp + 17 channels.
pub const COLUMN_COUNT: usize = 18;

/// Numeric channels per record (everything but the timestamp).
pub const CHANNEL_COUNT: usize = COLUMN_COUNT - 1;

/// Kelvin-to-Celsius offset applied to summary output.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Nominal PLL lock-alarm threshold (45 °C), drawn as the reference line.
pub const PLL_ALARM_KELVIN: f64 = 318.15;

/// Unit of a channel's raw reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kelvin,
    /// Pump/valve state channels: numeric, but not a temperature.
    Dimensionless,
}

/// What a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Timestamp,
    Temperature,
    Status,
}

/// One declared column of the log.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub unit: Unit,
    pub kind: ChannelKind,
}

const fn temp(name: &'static str) -> Column {
    Column {
        name,
        unit: Unit::Kelvin,
        kind: ChannelKind::Temperature,
    }
}

const fn status(name: &'static str) -> Column {
    Column {
        name,
        unit: Unit::Dimensionless,
        kind: ChannelKind::Status,
    }
}

/// The full schema, in file order.
pub const COLUMNS: [Column; COLUMN_COUNT] = [
    Column {
        name: "hst",
        unit: Unit::Dimensionless,
        kind: ChannelKind::Timestamp,
    },
    temp("b3_pll"),
    temp("b3_110k"),
    status("b3_p01"),
    temp("b3_15k"),
    temp("b3_wca"),
    temp("b6_pll"),
    temp("b6_4k"),
    temp("b6_110k"),
    status("b6_p0"),
    temp("b6_15k"),
    status("b6_p1"),
    temp("b7_pll"),
    temp("b7_4k"),
    temp("b7_110k"),
    status("b7_p0"),
    temp("b7_15k"),
    status("b7_p1"),
];

/// The three PLL sensors the summary operations accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PllSensor {
    B3Pll,
    B6Pll,
    B7Pll,
}

/// Sensor assumed when the caller does not care which band to look at.
pub const DEFAULT_SENSOR: PllSensor = PllSensor::B6Pll;

impl PllSensor {
    pub const ALL: [PllSensor; 3] = [PllSensor::B3Pll, PllSensor::B6Pll, PllSensor::B7Pll];

    /// Column name as it appears in the schema.
    pub fn name(&self) -> &'static str {
        match self {
            PllSensor::B3Pll => "b3_pll",
            PllSensor::B6Pll => "b6_pll",
            PllSensor::B7Pll => "b7_pll",
        }
    }

    /// Index into a record's channel array (timestamp excluded).
    pub fn channel_index(&self) -> usize {
        match self {
            PllSensor::B3Pll => 0,
            PllSensor::B6Pll => 5,
            PllSensor::B7Pll => 11,
        }
    }
}

impl FromStr for PllSensor {
    type Err = TempLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "b3_pll" => Ok(PllSensor::B3Pll),
            "b6_pll" => Ok(PllSensor::B6Pll),
            "b7_pll" => Ok(PllSensor::B7Pll),
            other => Err(TempLogError::UnknownSensor(other.to_string())),
        }
    }
}

impl fmt::Display for PllSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_positionally_consistent() {
        assert_eq!(COLUMNS.len(), COLUMN_COUNT);
        assert_eq!(COLUMNS[0].kind, ChannelKind::Timestamp);
        for sensor in PllSensor::ALL {
            let column = COLUMNS[sensor.channel_index() + 1];
            assert_eq!(column.name, sensor.name());
            assert_eq!(column.unit, Unit::Kelvin);
        }
    }

    #[test]
    fn sensor_names_round_trip() {
        for sensor in PllSensor::ALL {
            assert_eq!(sensor.name().parse::<PllSensor>().unwrap(), sensor);
        }
        assert!(matches!(
            "b6_4k".parse::<PllSensor>(),
            Err(TempLogError::UnknownSensor(_))
        ));
    }
}
