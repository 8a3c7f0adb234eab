use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified category of a user request.
///
/// The built-in variants cover the advisors shipped with the workspace;
/// `Custom` lets new intents be registered without touching this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CropRecommendation,
    IrrigationAdvice,
    FertilizerGuidance,
    SustainabilityAdvice,
    Custom(String),
}

impl Intent {
    /// Built-in variants for iteration.
    pub const BUILTIN: [Intent; 4] = [
        Self::CropRecommendation,
        Self::IrrigationAdvice,
        Self::FertilizerGuidance,
        Self::SustainabilityAdvice,
    ];

    /// Stable snake_case label, also used as the config key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::CropRecommendation => "crop_recommendation",
            Self::IrrigationAdvice => "irrigation_advice",
            Self::FertilizerGuidance => "fertilizer_guidance",
            Self::SustainabilityAdvice => "sustainability_advice",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Parse a label. Unknown labels become `Custom`.
    pub fn parse(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        Self::BUILTIN
            .iter()
            .find(|intent| intent.as_str() == normalized)
            .cloned()
            .unwrap_or(Self::Custom(normalized))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
