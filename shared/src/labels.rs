use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// The closed set of skin conditions the classifier can report.
///
/// Declaration order is the canonical label ordering: it drives the order of
/// `/api/conditions`, the serialized distribution and the tie-break when two
/// labels share the maximum confidence.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumCount,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ConditionLabel {
    #[serde(rename = "acne")]
    #[strum(to_string = "acne")]
    Acne,
    #[serde(rename = "dry")]
    #[strum(to_string = "dry")]
    Dry,
    #[serde(rename = "pigmentation")]
    #[strum(to_string = "pigmentation")]
    Pigmentation,
    #[serde(rename = "wrinkle")]
    #[strum(to_string = "wrinkle")]
    Wrinkle,
    #[serde(rename = "dark circles")]
    #[strum(to_string = "dark circles", serialize = "dark_circles")]
    DarkCircles,
    #[serde(rename = "normal")]
    #[strum(to_string = "normal")]
    Normal,
}

impl ConditionLabel {
    pub fn all() -> impl Iterator<Item = ConditionLabel> {
        ConditionLabel::iter()
    }

    /// Stable identifier used by the conditions listing.
    pub fn id(&self) -> &'static str {
        match self {
            ConditionLabel::Acne => "acne",
            ConditionLabel::Dry => "dry",
            ConditionLabel::Pigmentation => "pigmentation",
            ConditionLabel::Wrinkle => "wrinkle",
            ConditionLabel::DarkCircles => "dark_circles",
            ConditionLabel::Normal => "normal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConditionLabel::Acne => "Acne",
            ConditionLabel::Dry => "Dry Skin",
            ConditionLabel::Pigmentation => "Pigmentation",
            ConditionLabel::Wrinkle => "Wrinkles",
            ConditionLabel::DarkCircles => "Dark Circles",
            ConditionLabel::Normal => "Normal/Healthy",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            ConditionLabel::Acne => "Inflammatory skin condition with pimples and blemishes",
            ConditionLabel::Dry => "Skin that lacks moisture and natural oils",
            ConditionLabel::Pigmentation => "Dark spots or uneven skin tone",
            ConditionLabel::Wrinkle => "Lines and creases in the skin",
            ConditionLabel::DarkCircles => "Darkening under the eyes",
            ConditionLabel::Normal => "Balanced, healthy-looking skin",
        }
    }
}

/// Confidence percentages (0-100) for every label, keyed in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(BTreeMap<ConditionLabel, f64>);

impl Distribution {
    /// Builds a distribution covering every label.
    pub fn from_fn<F>(mut value: F) -> Self
    where
        F: FnMut(ConditionLabel) -> f64,
    {
        Self(ConditionLabel::all().map(|label| (label, value(label))).collect())
    }

    pub fn get(&self, label: ConditionLabel) -> Option<f64> {
        self.0.get(&label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConditionLabel, f64)> + '_ {
        self.0.iter().map(|(label, value)| (*label, *value))
    }

    /// Label with the highest confidence. Ties resolve to the label that
    /// comes first in canonical order.
    pub fn top(&self) -> Option<(ConditionLabel, f64)> {
        self.iter().fold(None, |best, (label, value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((label, value)),
        })
    }

    /// Entries sorted by descending confidence; equal values keep canonical order.
    pub fn sorted_desc(&self) -> Vec<(ConditionLabel, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        entries
    }
}
