use serde::{Deserialize, Serialize};

/// Letter grade assigned to a meal per longevity pillar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    #[default]
    C,
    D,
    F,
}

impl Grade {
    /// Parses a single letter, ignoring surrounding whitespace and case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    pub fn score(self) -> f64 {
        match self {
            Self::A => 4.0,
            Self::B => 3.0,
            Self::C => 2.0,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    pub fn from_mean(mean: f64) -> Self {
        if mean >= 3.5 {
            Self::A
        } else if mean >= 2.5 {
            Self::B
        } else if mean >= 1.5 {
            Self::C
        } else if mean >= 0.5 {
            Self::D
        } else {
            Self::F
        }
    }
}

/// Mean score of the recognized grades; 2.0 when there are none.
pub fn mean_score<I>(grades: I) -> f64
where
    I: IntoIterator<Item = Option<Grade>>,
{
    let (sum, count) = grades
        .into_iter()
        .flatten()
        .fold((0.0, 0u32), |(sum, count), g| (sum + g.score(), count + 1));
    if count == 0 {
        2.0
    } else {
        sum / f64::from(count)
    }
}

/// Reduces a set of grades to one. Missing entries are skipped rather than
/// counted as zero.
pub fn aggregate<I>(grades: I) -> Grade
where
    I: IntoIterator<Item = Option<Grade>>,
{
    Grade::from_mean(mean_score(grades))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_spread_averages_to_c() {
        let grades = ["A", "B", "C", "D", "F"].map(Grade::parse);
        assert_eq!(mean_score(grades), 2.0);
        assert_eq!(aggregate(grades), Grade::C);
    }

    #[test]
    fn nothing_observed_defaults_to_c() {
        assert_eq!(mean_score(std::iter::empty()), 2.0);
        assert_eq!(aggregate(std::iter::empty()), Grade::C);
    }

    #[test]
    fn unrecognized_entries_are_excluded() {
        let grades = ["A", "A", "??", ""].map(Grade::parse);
        assert_eq!(aggregate(grades), Grade::A);
    }

    #[test]
    fn thresholds() {
        assert_eq!(Grade::from_mean(3.5), Grade::A);
        assert_eq!(Grade::from_mean(3.49), Grade::B);
        assert_eq!(Grade::from_mean(2.5), Grade::B);
        assert_eq!(Grade::from_mean(1.5), Grade::C);
        assert_eq!(Grade::from_mean(0.5), Grade::D);
        assert_eq!(Grade::from_mean(0.49), Grade::F);
    }

    #[test]
    fn parse_is_lenient_on_case_and_space() {
        assert_eq!(Grade::parse(" b "), Some(Grade::B));
        assert_eq!(Grade::parse("E"), None);
        assert_eq!(Grade::parse("A+"), None);
    }
}
