//! Objective values and the ordering that compares them.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use crate::domain::RoutingSolution;
use crate::error::SenseParseError;

/// Marker trait for objective values.
///
/// Any ordered, copyable value can serve as an objective. Floating point
/// costs are the common case; integer costs work the same way.
///
/// # Examples
///
/// ```
/// use pvns_core::Objective;
///
/// fn accepts<V: Objective>(_: V) {}
///
/// accepts(12.5_f64);
/// accepts(7_i64);
/// ```
pub trait Objective: PartialOrd + Copy + Debug + Display + Send + Sync + 'static {}

impl<T> Objective for T where T: PartialOrd + Copy + Debug + Display + Send + Sync + 'static {}

/// Direction in which objective values improve.
///
/// This is the only comparison logic used by the search engine. Every
/// decision about whether one solution beats another goes through
/// [`OptimizationSense::is_better`] or [`OptimizationSense::compare`].
///
/// # Examples
///
/// ```
/// use pvns_core::OptimizationSense;
///
/// let sense = OptimizationSense::Minimization;
/// assert!(sense.is_better_value(&10.0, &7.0));
/// assert!(!sense.is_better_value(&7.0, &7.0));
/// assert!(!sense.is_better_value(&7.0, &f64::NAN));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OptimizationSense {
    /// Lower objective values are better.
    #[default]
    Minimization,
    /// Higher objective values are better.
    Maximization,
}

impl OptimizationSense {
    /// Orders `candidate` relative to `current` in this sense.
    ///
    /// Returns `Some(Ordering::Greater)` when the candidate is strictly
    /// better, `Some(Ordering::Equal)` on a tie, `Some(Ordering::Less)` when
    /// it is worse, and `None` when the two values cannot be ordered.
    pub fn compare<V: Objective>(&self, current: &V, candidate: &V) -> Option<Ordering> {
        let ord = candidate.partial_cmp(current)?;
        Some(match self {
            OptimizationSense::Minimization => ord.reverse(),
            OptimizationSense::Maximization => ord,
        })
    }

    /// Returns true iff `candidate` is strictly better than `current`.
    #[inline]
    pub fn is_better_value<V: Objective>(&self, current: &V, candidate: &V) -> bool {
        self.compare(current, candidate) == Some(Ordering::Greater)
    }

    /// Returns true iff `candidate` has a strictly better objective value
    /// than `current`.
    #[inline]
    pub fn is_better<S: RoutingSolution>(&self, current: &S, candidate: &S) -> bool {
        self.is_better_value(&current.objective_value(), &candidate.objective_value())
    }

    /// Returns the short name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizationSense::Minimization => "minimization",
            OptimizationSense::Maximization => "maximization",
        }
    }
}

impl Display for OptimizationSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptimizationSense {
    type Err = SenseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimization" | "min" => Ok(OptimizationSense::Minimization),
            "maximization" | "max" => Ok(OptimizationSense::Maximization),
            other => Err(SenseParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimization_prefers_lower() {
        let sense = OptimizationSense::Minimization;
        assert!(sense.is_better_value(&10.0, &7.0));
        assert!(!sense.is_better_value(&7.0, &10.0));
        assert_eq!(sense.compare(&10, &7), Some(Ordering::Greater));
        assert_eq!(sense.compare(&7, &10), Some(Ordering::Less));
    }

    #[test]
    fn test_maximization_prefers_higher() {
        let sense = OptimizationSense::Maximization;
        assert!(sense.is_better_value(&7.0, &10.0));
        assert!(!sense.is_better_value(&10.0, &7.0));
    }

    #[test]
    fn test_ties_are_not_improvements() {
        for sense in [OptimizationSense::Minimization, OptimizationSense::Maximization] {
            assert!(!sense.is_better_value(&3.5, &3.5));
            assert_eq!(sense.compare(&3.5, &3.5), Some(Ordering::Equal));
        }
    }

    #[test]
    fn test_nan_is_unordered() {
        let sense = OptimizationSense::Minimization;
        assert_eq!(sense.compare(&1.0, &f64::NAN), None);
        assert!(!sense.is_better_value(&1.0, &f64::NAN));
        assert!(!sense.is_better_value(&f64::NAN, &1.0));
    }

    #[test]
    fn test_default_is_minimization() {
        assert_eq!(OptimizationSense::default(), OptimizationSense::Minimization);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(
            "Minimization".parse::<OptimizationSense>(),
            Ok(OptimizationSense::Minimization)
        );
        assert_eq!("max".parse::<OptimizationSense>(), Ok(OptimizationSense::Maximization));
        assert_eq!(
            "sideways".parse::<OptimizationSense>(),
            Err(SenseParseError("sideways".to_string()))
        );
        assert_eq!(format!("{}", OptimizationSense::Maximization), "maximization");
    }
}
