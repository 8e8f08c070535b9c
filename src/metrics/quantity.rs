//! Kubernetes resource quantity parsing
//!
//! Quantities arrive as strings such as `"250m"`, `"1.5"`, `"123456789n"`,
//! `"20480Ki"` or `"5e8"`. They are converted to plain `f64` base units
//! (cores for CPU, bytes for memory) before any unit conversion.

use crate::{InstanceMetricsError, Result};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use tracing::warn;

const BINARY_SUFFIXES: &[(&str, f64)] = &[
    ("Ki", 1024.0),
    ("Mi", 1_048_576.0),
    ("Gi", 1_073_741_824.0),
    ("Ti", 1_099_511_627_776.0),
    ("Pi", 1_125_899_906_842_624.0),
    ("Ei", 1_152_921_504_606_846_976.0),
];

const DECIMAL_SUFFIXES: &[(&str, f64)] = &[
    ("n", 1e-9),
    ("u", 1e-6),
    ("m", 1e-3),
    ("", 1.0),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("E", 1e18),
];

/// Parses a quantity string into base units.
pub fn parse_quantity(raw: &str) -> Result<f64> {
    let value = raw.trim();
    let invalid = || InstanceMetricsError::InvalidQuantity(raw.to_string());

    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '+' || c == '-'))
        .unwrap_or(value.len());
    let (number, suffix) = value.split_at(split);

    if number.is_empty() || number == "+" || number == "-" {
        return Err(invalid());
    }
    let number: f64 = number.parse().map_err(|_| invalid())?;

    let multiplier = if let Some(exponent) = suffix
        .strip_prefix('e')
        .or_else(|| suffix.strip_prefix('E').filter(|rest| !rest.is_empty()))
    {
        let exponent: i32 = exponent.parse().map_err(|_| invalid())?;
        10f64.powi(exponent)
    } else {
        BINARY_SUFFIXES
            .iter()
            .chain(DECIMAL_SUFFIXES)
            .find(|(name, _)| *name == suffix)
            .map(|(_, multiplier)| *multiplier)
            .ok_or_else(invalid)?
    };

    Ok(number * multiplier)
}

/// Parses an optional quantity, treating a missing or malformed one as absent.
pub fn quantity_value(quantity: Option<&Quantity>) -> Option<f64> {
    let quantity = quantity?;
    match parse_quantity(&quantity.0) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= b.abs() * 1e-12 + 1e-15
    }

    #[test]
    fn test_parse_cpu_quantities() {
        assert!(approx(parse_quantity("250m").unwrap(), 0.25));
        assert!(approx(parse_quantity("2").unwrap(), 2.0));
        assert!(approx(parse_quantity("0.5").unwrap(), 0.5));
        assert!(approx(parse_quantity("123456789n").unwrap(), 0.123456789));
        assert!(approx(parse_quantity("1500u").unwrap(), 0.0015));
    }

    #[test]
    fn test_parse_memory_quantities() {
        assert!(approx(parse_quantity("100Mi").unwrap(), 104_857_600.0));
        assert!(approx(parse_quantity("20480Ki").unwrap(), 20_971_520.0));
        assert!(approx(parse_quantity("500M").unwrap(), 500_000_000.0));
        assert!(approx(parse_quantity("1G").unwrap(), 1e9));
        assert!(approx(parse_quantity("2Gi").unwrap(), 2_147_483_648.0));
        assert!(approx(parse_quantity("1k").unwrap(), 1000.0));
    }

    #[test]
    fn test_parse_exponent_notation() {
        assert!(approx(parse_quantity("5e8").unwrap(), 5e8));
        assert!(approx(parse_quantity("1E3").unwrap(), 1000.0));
        assert!(approx(parse_quantity("25e-2").unwrap(), 0.25));
    }

    #[test]
    fn test_exa_suffix_is_not_an_exponent() {
        assert!(approx(parse_quantity("2E").unwrap(), 2e18));
    }

    #[test]
    fn test_rejects_malformed_quantities() {
        for raw in ["", "m", "abc", "12Xi", "1.2.3", "5e", "-"] {
            let err = parse_quantity(raw).unwrap_err();
            assert!(
                matches!(err, InstanceMetricsError::InvalidQuantity(_)),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_quantity_value_treats_garbage_as_absent() {
        assert_eq!(quantity_value(None), None);
        assert_eq!(quantity_value(Some(&Quantity("bogus".to_string()))), None);
        assert_eq!(quantity_value(Some(&Quantity("1".to_string()))), Some(1.0));
    }
}
