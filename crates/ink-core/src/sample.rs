//! Raw sample types and the fixed field schema

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Raw value as delivered by the tablet (integer units)
pub type RawValue = i64;

/// One column of the raw schema
///
/// The order of the variants is the schema order used by every tabular
/// export (`time, x, y, pressure, azimuth, altitude`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawField {
    Time,
    X,
    Y,
    Pressure,
    Azimuth,
    Altitude,
}

impl RawField {
    /// Number of fields in the schema
    pub const COUNT: usize = 6;

    /// All fields in schema order
    pub const ALL: [RawField; Self::COUNT] = [
        Self::Time,
        Self::X,
        Self::Y,
        Self::Pressure,
        Self::Azimuth,
        Self::Altitude,
    ];

    /// Position of the field in the schema
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical column name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::X => "x",
            Self::Y => "y",
            Self::Pressure => "pressure",
            Self::Azimuth => "azimuth",
            Self::Altitude => "altitude",
        }
    }

    /// Look up a field by schema position
    pub fn from_index(index: usize) -> CoreResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CoreError::FieldIndexOutOfRange {
                index,
                count: Self::COUNT,
            })
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RawField {
    type Err = CoreError;

    /// Accepts canonical names plus the short tablet-export headers
    /// (`p`, `az`, `al`), case-insensitively.
    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" | "t" => Ok(Self::Time),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "pressure" | "p" => Ok(Self::Pressure),
            "azimuth" | "az" => Ok(Self::Azimuth),
            "altitude" | "al" => Ok(Self::Altitude),
            _ => Err(CoreError::UnknownField(s.to_string())),
        }
    }
}

/// One tablet sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawSample {
    pub time: RawValue,
    pub x: RawValue,
    pub y: RawValue,
    pub pressure: RawValue,
    pub azimuth: RawValue,
    pub altitude: RawValue,
}

impl RawSample {
    #[inline]
    pub const fn new(
        time: RawValue,
        x: RawValue,
        y: RawValue,
        pressure: RawValue,
        azimuth: RawValue,
        altitude: RawValue,
    ) -> Self {
        Self {
            time,
            x,
            y,
            pressure,
            azimuth,
            altitude,
        }
    }

    /// Sample with only time and position set (pen angles and pressure zero)
    #[inline]
    pub const fn at(time: RawValue, x: RawValue, y: RawValue) -> Self {
        Self::new(time, x, y, 0, 0, 0)
    }

    /// Build from a row in schema order
    pub fn from_row(row: &[RawValue]) -> CoreResult<Self> {
        match *row {
            [time, x, y, pressure, azimuth, altitude] => {
                Ok(Self::new(time, x, y, pressure, azimuth, altitude))
            }
            _ => Err(CoreError::RowWidth {
                row: 0,
                expected: RawField::COUNT,
                actual: row.len(),
            }),
        }
    }

    /// Value of a single field
    #[inline]
    pub const fn get(&self, field: RawField) -> RawValue {
        match field {
            RawField::Time => self.time,
            RawField::X => self.x,
            RawField::Y => self.y,
            RawField::Pressure => self.pressure,
            RawField::Azimuth => self.azimuth,
            RawField::Altitude => self.altitude,
        }
    }

    /// Values in schema order
    #[inline]
    pub const fn to_row(&self) -> [RawValue; RawField::COUNT] {
        [
            self.time,
            self.x,
            self.y,
            self.pressure,
            self.azimuth,
            self.altitude,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_index() {
        for (i, field) in RawField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(RawField::from_index(i).unwrap(), *field);
        }
    }

    #[test]
    fn test_field_index_out_of_range() {
        assert_eq!(
            RawField::from_index(6),
            Err(CoreError::FieldIndexOutOfRange { index: 6, count: 6 })
        );
    }

    #[test]
    fn test_field_parse_aliases() {
        assert_eq!("Pressure".parse::<RawField>().unwrap(), RawField::Pressure);
        assert_eq!("az".parse::<RawField>().unwrap(), RawField::Azimuth);
        assert_eq!("AL".parse::<RawField>().unwrap(), RawField::Altitude);
        assert!("tilt".parse::<RawField>().is_err());
    }

    #[test]
    fn test_sample_row_access() {
        let sample = RawSample::new(10, 1, 2, 300, 40, 50);
        assert_eq!(sample.get(RawField::Pressure), 300);
        assert_eq!(sample.to_row(), [10, 1, 2, 300, 40, 50]);
        assert_eq!(RawSample::from_row(&sample.to_row()).unwrap(), sample);
    }

    #[test]
    fn test_sample_row_width() {
        let err = RawSample::from_row(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            CoreError::RowWidth {
                row: 0,
                expected: 6,
                actual: 3
            }
        );
    }
}
