use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Experimental quality tier derived from resolution and R-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    HighQuality,
    GoodQuality,
    ModerateQuality,
    #[default]
    UnknownQuality,
}

impl QualityTier {
    /// Buckets a structure by resolution (Å) and R-free.
    ///
    /// Both values must be present, finite and non-zero; otherwise the tier is
    /// unknown. Thresholds are evaluated top-down and the first match wins.
    pub fn classify(resolution: Option<f64>, r_free: Option<f64>) -> Self {
        let usable = |v: Option<f64>| v.filter(|x| x.is_finite() && *x != 0.0);
        let (Some(resolution), Some(r_free)) = (usable(resolution), usable(r_free)) else {
            return QualityTier::UnknownQuality;
        };

        if resolution < 1.5 && r_free < 0.20 {
            QualityTier::HighQuality
        } else if resolution < 2.5 && r_free < 0.25 {
            QualityTier::GoodQuality
        } else {
            QualityTier::ModerateQuality
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::HighQuality => "high_quality",
            QualityTier::GoodQuality => "good_quality",
            QualityTier::ModerateQuality => "moderate_quality",
            QualityTier::UnknownQuality => "unknown_quality",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Invalid quality tier: '{0}'")]
pub struct ParseQualityTierError(String);

impl FromStr for QualityTier {
    type Err = ParseQualityTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high_quality" => Ok(QualityTier::HighQuality),
            "good_quality" => Ok(QualityTier::GoodQuality),
            "moderate_quality" => Ok(QualityTier::ModerateQuality),
            "unknown_quality" => Ok(QualityTier::UnknownQuality),
            _ => Err(ParseQualityTierError(s.to_string())),
        }
    }
}
