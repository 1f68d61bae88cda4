//! Per-track yield controls for the detail view.
//!
//! Every yield track doubles as a multiplier control: entering a value for a
//! track sets the multiplier relative to that track's base amount.

use num_rational::Rational64;
use num_traits::{CheckedDiv, One, Zero};

use crate::quantity::{
    multiply_amount, parse_number, split_amount, split_amount_list, split_amount_unit, Quantity,
};

/// One scaled yield track, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldTrack {
    /// Base amount the multiplier is relative to
    pub base: Rational64,
    /// Formatted endpoints: one value, or two for a range
    pub amounts: Vec<String>,
    pub unit: String,
    /// False for placeholder tracks such as "to taste"
    pub scalable: bool,
}

impl YieldTrack {
    pub fn new(text: &str, multiplier: Rational64) -> Self {
        let base = split_amount(text);
        let scaled = multiply_amount(text, multiplier);
        let (numeric, unit) = split_amount_unit(&scaled);
        match Quantity::parse(&numeric) {
            Some(quantity) => Self {
                base,
                amounts: quantity.endpoints(),
                unit,
                scalable: true,
            },
            // Shown as "1 <text>" and left unscaled
            None => Self {
                base,
                amounts: vec!["1".to_string()],
                unit: numeric,
                scalable: false,
            },
        }
    }

    /// `amount[ - amount][ unit]`
    pub fn label(&self) -> String {
        let mut label = self.amounts.join(" - ");
        if !self.unit.is_empty() {
            label.push(' ');
            label.push_str(&self.unit);
        }
        label
    }
}

/// Yield tracks of a recipe at a multiplier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldControls {
    pub multiplier: Rational64,
    pub tracks: Vec<YieldTrack>,
}

impl YieldControls {
    pub fn new(yields: &str, multiplier: Rational64) -> Self {
        Self {
            multiplier,
            tracks: split_amount_list(yields)
                .iter()
                .map(|track| YieldTrack::new(track, multiplier))
                .collect(),
        }
    }

    /// A bare multiplier control is only needed when no track already
    /// measures in single units
    pub fn needs_plain_multiplier(&self) -> bool {
        !self.tracks.iter().any(|track| track.base.is_one())
    }
}

/// Next multiplier when stepping up a track whose base amount is `divisor`.
///
/// Below one unit of the track the multiplier doubles, above it grows by one unit.
pub fn increase_multiplier(multiplier: Rational64, divisor: Rational64) -> Rational64 {
    let step = unit_step(divisor);
    if multiplier < step {
        multiplier * 2
    } else {
        multiplier + step
    }
}

/// Next multiplier when stepping down; halves at or below one unit of the track
pub fn decrease_multiplier(multiplier: Rational64, divisor: Rational64) -> Rational64 {
    let step = unit_step(divisor);
    if multiplier <= step {
        multiplier / 2
    } else {
        multiplier - step
    }
}

/// Multiplier from a value typed into a track control.
///
/// Empty or negative input yields zero; anything else is divided by the
/// track's base amount.
pub fn multiplier_from_input(value: &str, divisor: Rational64) -> Rational64 {
    let value = value.trim().trim_start_matches('0');
    if value.is_empty() || value.starts_with('-') {
        return Rational64::zero();
    }
    let Some(parsed) = parse_number(value) else {
        return Rational64::zero();
    };
    parsed.checked_div(&divisor).unwrap_or_else(Rational64::zero)
}

fn unit_step(divisor: Rational64) -> Rational64 {
    if divisor.is_zero() {
        Rational64::one()
    } else {
        divisor.recip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational64 {
        Rational64::new(n, d)
    }

    #[test]
    fn test_track_count_matches_yield_list() {
        let yields = "4 servings | 2 kg dough";
        let controls = YieldControls::new(yields, r(1, 1));
        assert_eq!(controls.tracks.len(), split_amount_list(yields).len());
    }

    #[test]
    fn test_tracks_are_scaled() {
        let controls = YieldControls::new("4 servings | 2-3 kg dough", r(3, 2));
        assert_eq!(controls.tracks[0].amounts, vec!["6"]);
        assert_eq!(controls.tracks[0].unit, "servings");
        assert_eq!(controls.tracks[0].base, r(4, 1));
        assert_eq!(controls.tracks[1].label(), "3 - 4.5 kg dough");
    }

    #[test]
    fn test_placeholder_track_does_not_scale() {
        let controls = YieldControls::new("some cookies", r(2, 1));
        let track = &controls.tracks[0];
        assert!(!track.scalable);
        assert_eq!(track.label(), "1 some cookies");
        assert_eq!(track.base, r(1, 1));
    }

    #[test]
    fn test_plain_multiplier_needed() {
        assert!(YieldControls::new("4 servings", r(1, 1)).needs_plain_multiplier());
        assert!(!YieldControls::new("1 cake | 12 pieces", r(1, 1)).needs_plain_multiplier());
        assert!(YieldControls::new("", r(1, 1)).needs_plain_multiplier());
    }

    #[test]
    fn test_increase_multiplier() {
        // 4 servings: one serving is a quarter of the recipe
        assert_eq!(increase_multiplier(r(1, 1), r(4, 1)), r(5, 4));
        assert_eq!(increase_multiplier(r(1, 8), r(4, 1)), r(1, 4));
        assert_eq!(increase_multiplier(r(1, 1), r(1, 1)), r(2, 1));
    }

    #[test]
    fn test_decrease_multiplier() {
        assert_eq!(decrease_multiplier(r(1, 1), r(4, 1)), r(3, 4));
        assert_eq!(decrease_multiplier(r(1, 4), r(4, 1)), r(1, 8));
        assert_eq!(decrease_multiplier(r(1, 1), r(1, 1)), r(1, 2));
    }

    #[test]
    fn test_multiplier_from_input() {
        assert_eq!(multiplier_from_input("6", r(4, 1)), r(3, 2));
        assert_eq!(multiplier_from_input("007", r(1, 1)), r(7, 1));
        assert_eq!(multiplier_from_input("", r(4, 1)), r(0, 1));
        assert_eq!(multiplier_from_input("-2", r(4, 1)), r(0, 1));
        assert_eq!(multiplier_from_input("2,5", r(1, 2)), r(5, 1));
    }
}
