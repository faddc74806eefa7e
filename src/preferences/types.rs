use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_WEIGHT: u8 = 10;

/// Relevance tier of a subcriterion. Always derived from weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceLevel {
    #[serde(alias = "muss")]
    Must,
    #[serde(alias = "sollte")]
    Should,
    #[serde(alias = "kann")]
    Can,
    #[serde(alias = "nicht_relevant")]
    NotApplicable,
}

impl RelevanceLevel {
    /// Canonical weight used when a level is chosen directly.
    pub fn default_weight(self) -> u8 {
        match self {
            RelevanceLevel::Must => 10,
            RelevanceLevel::Should => 5,
            RelevanceLevel::Can => 1,
            RelevanceLevel::NotApplicable => 0,
        }
    }

    /// Level implied by a weight: >=7 must, >=4 should, >0 can, 0 not applicable.
    pub fn from_weight(weight: u8) -> Self {
        if weight >= 7 {
            RelevanceLevel::Must
        } else if weight >= 4 {
            RelevanceLevel::Should
        } else if weight > 0 {
            RelevanceLevel::Can
        } else {
            RelevanceLevel::NotApplicable
        }
    }

    /// Lenient parse used at the persistence boundary; accepts legacy German labels.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "must" | "muss" => Some(RelevanceLevel::Must),
            "should" | "sollte" => Some(RelevanceLevel::Should),
            "can" | "kann" => Some(RelevanceLevel::Can),
            "not_applicable" | "nicht_relevant" => Some(RelevanceLevel::NotApplicable),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelevanceLevel::Must => "must",
            RelevanceLevel::Should => "should",
            RelevanceLevel::Can => "can",
            RelevanceLevel::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for RelevanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum evidence score a knockout subcriterion must reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum KoThreshold {
    One,
    #[default]
    Two,
}

impl KoThreshold {
    pub fn value(self) -> u8 {
        match self {
            KoThreshold::One => 1,
            KoThreshold::Two => 2,
        }
    }
}

impl TryFrom<u8> for KoThreshold {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(KoThreshold::One),
            2 => Ok(KoThreshold::Two),
            other => Err(format!("knockout threshold must be 1 or 2, got {}", other)),
        }
    }
}

impl From<KoThreshold> for u8 {
    fn from(value: KoThreshold) -> Self {
        value.value()
    }
}

impl fmt::Display for KoThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// User settings for one subcriterion. `weight` is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub subcriterion_id: String,
    pub relevance_level: RelevanceLevel,
    pub is_ko: bool,
    pub weight: u8,
    pub ko_threshold: KoThreshold,
}

impl Preference {
    /// Neutral default: relevance "can", no knockout.
    pub fn neutral(subcriterion_id: impl Into<String>) -> Self {
        Self {
            subcriterion_id: subcriterion_id.into(),
            relevance_level: RelevanceLevel::Can,
            is_ko: false,
            weight: RelevanceLevel::Can.default_weight(),
            ko_threshold: KoThreshold::default(),
        }
    }

    /// Re-apply every invariant. A zero weight clears knockout; knockout pins the weight at 10.
    pub fn normalized(mut self) -> Self {
        self.weight = self.weight.min(MAX_WEIGHT);
        if self.weight == 0 {
            self.is_ko = false;
        }
        if self.is_ko {
            self.weight = MAX_WEIGHT;
        }
        if !self.is_ko {
            self.ko_threshold = KoThreshold::default();
        }
        self.relevance_level = RelevanceLevel::from_weight(self.weight);
        self
    }

    /// Counts toward scoring: positive weight and applicable.
    pub fn is_weighted(&self) -> bool {
        self.weight > 0 && self.relevance_level != RelevanceLevel::NotApplicable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_from_weight_boundaries() {
        assert_eq!(RelevanceLevel::from_weight(10), RelevanceLevel::Must);
        assert_eq!(RelevanceLevel::from_weight(7), RelevanceLevel::Must);
        assert_eq!(RelevanceLevel::from_weight(6), RelevanceLevel::Should);
        assert_eq!(RelevanceLevel::from_weight(4), RelevanceLevel::Should);
        assert_eq!(RelevanceLevel::from_weight(3), RelevanceLevel::Can);
        assert_eq!(RelevanceLevel::from_weight(1), RelevanceLevel::Can);
        assert_eq!(RelevanceLevel::from_weight(0), RelevanceLevel::NotApplicable);
    }

    #[test]
    fn test_default_weights_round_trip_through_level() {
        for level in [
            RelevanceLevel::Must,
            RelevanceLevel::Should,
            RelevanceLevel::Can,
            RelevanceLevel::NotApplicable,
        ] {
            assert_eq!(RelevanceLevel::from_weight(level.default_weight()), level);
        }
    }

    #[test]
    fn test_parse_lenient_accepts_legacy_labels() {
        assert_eq!(RelevanceLevel::parse_lenient("muss"), Some(RelevanceLevel::Must));
        assert_eq!(RelevanceLevel::parse_lenient(" Sollte "), Some(RelevanceLevel::Should));
        assert_eq!(
            RelevanceLevel::parse_lenient("nicht_relevant"),
            Some(RelevanceLevel::NotApplicable)
        );
        assert_eq!(RelevanceLevel::parse_lenient("critical"), None);
    }

    #[test]
    fn test_ko_threshold_serde() {
        let json = serde_json::to_string(&KoThreshold::One).unwrap();
        assert_eq!(json, "1");
        let parsed: KoThreshold = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, KoThreshold::Two);
        assert!(serde_json::from_str::<KoThreshold>("3").is_err());
    }

    #[test]
    fn test_neutral_is_normalized() {
        let p = Preference::neutral("s1");
        assert_eq!(p.clone().normalized(), p);
        assert_eq!(p.relevance_level, RelevanceLevel::Can);
        assert_eq!(p.weight, 1);
        assert!(!p.is_ko);
    }

    #[test]
    fn test_normalized_ko_forces_must() {
        let p = Preference {
            subcriterion_id: "s1".to_string(),
            relevance_level: RelevanceLevel::Can,
            is_ko: true,
            weight: 3,
            ko_threshold: KoThreshold::One,
        }
        .normalized();
        assert_eq!(p.weight, 10);
        assert_eq!(p.relevance_level, RelevanceLevel::Must);
        assert_eq!(p.ko_threshold, KoThreshold::One);
    }

    #[test]
    fn test_normalized_zero_weight_clears_ko() {
        let p = Preference {
            subcriterion_id: "s1".to_string(),
            relevance_level: RelevanceLevel::Must,
            is_ko: true,
            weight: 0,
            ko_threshold: KoThreshold::One,
        }
        .normalized();
        assert_eq!(p.weight, 0);
        assert!(!p.is_ko);
        assert_eq!(p.relevance_level, RelevanceLevel::NotApplicable);
        assert_eq!(p.ko_threshold, KoThreshold::Two);
    }

    #[test]
    fn test_preference_serializes_snake_case_levels() {
        let json = serde_json::to_value(Preference::neutral("s1")).unwrap();
        assert_eq!(json["relevance_level"], "can");
        assert_eq!(json["ko_threshold"], 2);
    }
}
