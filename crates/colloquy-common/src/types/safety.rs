//! Content-safety policy: which harm categories block at which threshold.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Harm categories a provider classifies content into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmCategory {
    #[serde(alias = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(alias = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(alias = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(alias = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(alias = "HARM_CATEGORY_CIVIC_INTEGRITY")]
    CivicIntegrity,
}

impl HarmCategory {
    /// The four categories every Gemini model supports.
    pub const STANDARD: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            HarmCategory::Harassment => "HARM_CATEGORY_HARASSMENT",
            HarmCategory::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            HarmCategory::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            HarmCategory::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
            HarmCategory::CivicIntegrity => "HARM_CATEGORY_CIVIC_INTEGRITY",
        }
    }
}

/// Probability level at or above which content is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockThreshold {
    #[serde(alias = "HARM_BLOCK_THRESHOLD_UNSPECIFIED")]
    Unspecified,
    #[serde(alias = "BLOCK_LOW_AND_ABOVE")]
    BlockLowAndAbove,
    #[serde(alias = "BLOCK_MEDIUM_AND_ABOVE")]
    BlockMediumAndAbove,
    #[serde(alias = "BLOCK_ONLY_HIGH")]
    BlockOnlyHigh,
    #[serde(alias = "BLOCK_NONE")]
    BlockNone,
    #[serde(alias = "OFF")]
    Off,
}

impl BlockThreshold {
    pub fn wire_name(&self) -> &'static str {
        match self {
            BlockThreshold::Unspecified => "HARM_BLOCK_THRESHOLD_UNSPECIFIED",
            BlockThreshold::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
            BlockThreshold::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            BlockThreshold::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            BlockThreshold::BlockNone => "BLOCK_NONE",
            BlockThreshold::Off => "OFF",
        }
    }
}

/// One `category → threshold` entry, the shape used in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

/// Mapping from harm category to block threshold.
///
/// Iteration is ordered by category, so two equal policies always
/// serialize to the same bytes. Setting a category twice keeps the last
/// threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SafetySetting>", into = "Vec<SafetySetting>")]
pub struct SafetyPolicy {
    thresholds: BTreeMap<HarmCategory, BlockThreshold>,
}

impl SafetyPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `threshold` to every standard category.
    pub fn uniform(threshold: BlockThreshold) -> Self {
        HarmCategory::STANDARD
            .iter()
            .fold(Self::new(), |policy, category| policy.with(*category, threshold))
    }

    pub fn with(mut self, category: HarmCategory, threshold: BlockThreshold) -> Self {
        self.thresholds.insert(category, threshold);
        self
    }

    pub fn threshold(&self, category: HarmCategory) -> Option<BlockThreshold> {
        self.thresholds.get(&category).copied()
    }

    pub fn settings(&self) -> impl Iterator<Item = SafetySetting> + '_ {
        self.thresholds
            .iter()
            .map(|(category, threshold)| SafetySetting {
                category: *category,
                threshold: *threshold,
            })
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

impl From<Vec<SafetySetting>> for SafetyPolicy {
    fn from(settings: Vec<SafetySetting>) -> Self {
        settings
            .into_iter()
            .fold(Self::new(), |policy, s| policy.with(s.category, s.threshold))
    }
}

impl From<SafetyPolicy> for Vec<SafetySetting> {
    fn from(policy: SafetyPolicy) -> Self {
        policy.settings().collect()
    }
}
