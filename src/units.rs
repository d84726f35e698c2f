use crate::error::{ConfigError, Result};

/// Unit family a sheet is formatted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum UnitSystem {
    Imperial,
    Metric,
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imperial => write!(f, "imperial"),
            Self::Metric => write!(f, "metric"),
        }
    }
}

/// Valid imperial precisions: fraction denominators of an inch/foot.
const VALID_PRECISIONS_IMPERIAL: [u32; 5] = [0, 4, 8, 16, 32];
/// Valid metric precisions: subdivisions of the unit.
const VALID_PRECISIONS_METRIC: [u32; 5] = [0, 1, 2, 5, 10];

/// Display configuration for lengths on the finished sheet.
///
/// Formatting policy only: all calculation happens in whatever linear
/// unit the input geometry already uses, and the kernel never consults
/// this type outside of output formatting.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UnitConfig {
    pub system: UnitSystem,
    /// Unit name, e.g. `in` or `mm`.
    pub name: &'static str,
    /// Display suffix, e.g. `"` or `mm`.
    pub symbol: &'static str,
    /// Imperial: fraction denominator. Metric: subdivisions per unit.
    /// Zero means whole units.
    pub precision: u32,
    /// Conventional tube outside diameter for this unit, used as a
    /// dialog default by callers.
    pub default_tube_od: f64,
}

impl UnitConfig {
    /// Inch configuration, sixteenths by default.
    #[must_use]
    pub fn inches() -> Self {
        Self {
            system: UnitSystem::Imperial,
            name: "in",
            symbol: "\"",
            precision: 16,
            default_tube_od: 1.75,
        }
    }

    /// Foot configuration, sixteenths by default.
    #[must_use]
    pub fn feet() -> Self {
        Self {
            system: UnitSystem::Imperial,
            name: "ft",
            symbol: "'",
            precision: 16,
            default_tube_od: 0.146,
        }
    }

    /// Millimeter configuration, tenths by default.
    #[must_use]
    pub fn millimeters() -> Self {
        Self {
            system: UnitSystem::Metric,
            name: "mm",
            symbol: "mm",
            precision: 10,
            default_tube_od: 44.45,
        }
    }

    /// Centimeter configuration.
    #[must_use]
    pub fn centimeters() -> Self {
        Self {
            system: UnitSystem::Metric,
            name: "cm",
            symbol: "cm",
            precision: 10,
            default_tube_od: 4.445,
        }
    }

    /// Meter configuration.
    #[must_use]
    pub fn meters() -> Self {
        Self {
            system: UnitSystem::Metric,
            name: "m",
            symbol: "m",
            precision: 10,
            default_tube_od: 0.04445,
        }
    }

    /// Returns this configuration with a different precision.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedPrecision`] if the value is not
    /// in the valid set for the unit system.
    pub fn with_precision(mut self, precision: u32) -> Result<Self> {
        let valid = match self.system {
            UnitSystem::Imperial => VALID_PRECISIONS_IMPERIAL,
            UnitSystem::Metric => VALID_PRECISIONS_METRIC,
        };
        if !valid.contains(&precision) {
            return Err(ConfigError::UnsupportedPrecision {
                precision,
                system: self.system,
            }
            .into());
        }
        self.precision = precision;
        Ok(self)
    }

    /// Formats a length per this configuration's precision policy.
    ///
    /// Imperial lengths render as a whole part plus a reduced fraction
    /// (`12 3/16"`); metric lengths round to the nearest subdivision and
    /// render as a decimal (`308.5mm`).
    #[must_use]
    pub fn format_length(&self, value: f64) -> String {
        match self.system {
            UnitSystem::Imperial => self.format_fractional(value),
            UnitSystem::Metric => self.format_decimal(value),
        }
    }

    fn format_fractional(&self, value: f64) -> String {
        let sign = if value < 0.0 { "-" } else { "" };
        let value = value.abs();
        if self.precision == 0 {
            return format!("{sign}{:.0}{}", value.round(), self.symbol);
        }

        let denominator = u64::from(self.precision);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = (value * value_f64(denominator)).round() as u64;
        let whole = total / denominator;
        let numerator = total % denominator;

        if numerator == 0 {
            return format!("{sign}{whole}{}", self.symbol);
        }
        let divisor = gcd(numerator, denominator);
        let (numerator, denominator) = (numerator / divisor, denominator / divisor);
        if whole == 0 {
            format!("{sign}{numerator}/{denominator}{}", self.symbol)
        } else {
            format!("{sign}{whole} {numerator}/{denominator}{}", self.symbol)
        }
    }

    fn format_decimal(&self, value: f64) -> String {
        if self.precision <= 1 {
            return format!("{:.0}{}", value.round(), self.symbol);
        }
        let step = 1.0 / f64::from(self.precision);
        let rounded = (value / step).round() * step;
        format!("{rounded:.1}{}", self.symbol)
    }
}

fn value_f64(v: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let out = v as f64;
    out
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
