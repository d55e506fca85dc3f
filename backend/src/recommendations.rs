use lazy_static::lazy_static;
use shared::{ConditionLabel, RecommendationBody};
use std::collections::HashMap;

use crate::error::AnalysisError;

#[derive(Debug)]
pub struct Recommendation {
    pub description: &'static str,
    pub tips: &'static [&'static str],
    pub ingredients_to_look_for: &'static [&'static str],
    pub ingredients_to_avoid: &'static [&'static str],
}

impl Recommendation {
    pub fn to_body(&self) -> RecommendationBody {
        RecommendationBody {
            description: self.description.to_string(),
            tips: owned(self.tips),
            ingredients_to_look_for: owned(self.ingredients_to_look_for),
            ingredients_to_avoid: owned(self.ingredients_to_avoid),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

lazy_static! {
    static ref RECOMMENDATIONS: HashMap<ConditionLabel, Recommendation> = {
        let mut table = HashMap::new();
        table.insert(ConditionLabel::Acne, Recommendation {
            description: "Acne is caused by clogged pores from oil, dead skin cells, and bacteria.",
            tips: &[
                "Use a gentle, non-comedogenic cleanser twice daily",
                "Apply benzoyl peroxide or salicylic acid treatments",
                "Avoid touching your face frequently",
                "Use oil-free moisturizers and sunscreen",
                "Consider consulting a dermatologist for persistent acne",
            ],
            ingredients_to_look_for: &["Salicylic Acid", "Benzoyl Peroxide", "Niacinamide", "Tea Tree Oil"],
            ingredients_to_avoid: &["Heavy oils", "Comedogenic ingredients", "Alcohol-based products"],
        });
        table.insert(ConditionLabel::Dry, Recommendation {
            description: "Dry skin lacks moisture and natural oils, leading to flakiness and tightness.",
            tips: &[
                "Use a gentle, hydrating cleanser",
                "Apply a rich moisturizer immediately after washing",
                "Use a humidifier in dry environments",
                "Avoid hot showers and harsh soaps",
                "Drink plenty of water to stay hydrated",
            ],
            ingredients_to_look_for: &["Hyaluronic Acid", "Ceramides", "Glycerin", "Shea Butter"],
            ingredients_to_avoid: &["Alcohol", "Fragrances", "Harsh sulfates"],
        });
        table.insert(ConditionLabel::Pigmentation, Recommendation {
            description: "Hyperpigmentation is darkening of skin areas due to excess melanin production.",
            tips: &[
                "Use broad-spectrum SPF 30+ sunscreen daily",
                "Apply vitamin C serum in the morning",
                "Use products with niacinamide or arbutin",
                "Consider chemical exfoliants like AHAs",
                "Be patient - results take 6-8 weeks minimum",
            ],
            ingredients_to_look_for: &["Vitamin C", "Niacinamide", "Alpha Arbutin", "Kojic Acid"],
            ingredients_to_avoid: &["Harsh physical scrubs", "Irritating ingredients"],
        });
        table.insert(ConditionLabel::Wrinkle, Recommendation {
            description: "Wrinkles are creases in the skin caused by aging, sun damage, and loss of collagen.",
            tips: &[
                "Use retinol or retinoid products at night",
                "Apply SPF 30+ sunscreen every day",
                "Keep skin well-hydrated with hyaluronic acid",
                "Consider peptide-rich products",
                "Get adequate sleep and manage stress",
            ],
            ingredients_to_look_for: &["Retinol", "Peptides", "Hyaluronic Acid", "Vitamin C"],
            ingredients_to_avoid: &["Excessive sun exposure", "Smoking", "Harsh products"],
        });
        table.insert(ConditionLabel::DarkCircles, Recommendation {
            description: "Dark circles under the eyes can be caused by fatigue, genetics, or aging.",
            tips: &[
                "Get 7-9 hours of quality sleep",
                "Use eye creams with caffeine or vitamin K",
                "Apply cold compresses to reduce puffiness",
                "Stay hydrated and limit salt intake",
                "Use concealer with peach or orange undertones",
            ],
            ingredients_to_look_for: &["Caffeine", "Vitamin K", "Retinol", "Peptides"],
            ingredients_to_avoid: &["Rubbing eyes", "Allergens", "Excessive screen time before bed"],
        });
        table.insert(ConditionLabel::Normal, Recommendation {
            description: "Your skin appears healthy and balanced. Keep up the good work!",
            tips: &[
                "Maintain your current skincare routine",
                "Continue using sunscreen daily",
                "Stay hydrated and eat a balanced diet",
                "Get regular exercise and adequate sleep",
                "Consider preventive anti-aging products",
            ],
            ingredients_to_look_for: &["Antioxidants", "SPF", "Gentle cleansers", "Light moisturizers"],
            ingredients_to_avoid: &["Over-exfoliation", "Unnecessary harsh treatments"],
        });
        table
    };
}

/// Forces the table to be built before the server starts accepting requests.
pub fn init() -> usize {
    RECOMMENDATIONS.len()
}

pub fn lookup(label: ConditionLabel) -> Result<&'static Recommendation, AnalysisError> {
    RECOMMENDATIONS
        .get(&label)
        .ok_or(AnalysisError::UnknownCondition(label))
}
