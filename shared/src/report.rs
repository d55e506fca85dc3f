use std::fmt::{self, Write};

use crate::{AnalysisResponse, ConditionLabel, Distribution};

/// Conditions in the order they are listed on screen and in the report.
pub fn sorted_conditions(distribution: &Distribution) -> Vec<(ConditionLabel, f64)> {
    distribution.sorted_desc()
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn report_file_name(timestamp_millis: u64) -> String {
    format!("skin-analysis-report-{}.txt", timestamp_millis)
}

/// Plain-text report for a finished analysis.
pub fn render_report(result: &AnalysisResponse, generated_at: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, result, generated_at);
    out
}

/// Writes the report into any `fmt::Write` sink.
pub fn write_report<W: Write>(out: &mut W, result: &AnalysisResponse, generated_at: &str) -> fmt::Result {
    let rec = &result.recommendations;

    writeln!(out, "SKIN ANALYSIS REPORT")?;
    writeln!(out, "====================")?;
    writeln!(out, "Generated: {}", generated_at)?;
    writeln!(out)?;
    writeln!(out, "Detected Condition: {}", result.top_condition.display_name())?;
    writeln!(out, "Confidence: {}", format_percentage(result.confidence))?;
    writeln!(out)?;

    writeln!(out, "All Conditions:")?;
    for (label, value) in sorted_conditions(&result.all_conditions) {
        writeln!(out, "  - {}: {}", label.display_name(), format_percentage(value))?;
    }
    writeln!(out)?;

    writeln!(out, "Description:")?;
    writeln!(out, "{}", rec.description)?;
    writeln!(out)?;

    writeln!(out, "Skincare Tips:")?;
    for (i, tip) in rec.tips.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, tip)?;
    }
    writeln!(out)?;

    writeln!(out, "Ingredients to Look For: {}", rec.ingredients_to_look_for.join(", "))?;
    writeln!(out, "Ingredients to Avoid: {}", rec.ingredients_to_avoid.join(", "))?;
    writeln!(out)?;
    writeln!(
        out,
        "Disclaimer: This analysis is for informational purposes only and is not a medical diagnosis."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecommendationBody;

    fn result() -> AnalysisResponse {
        AnalysisResponse {
            success: true,
            top_condition: ConditionLabel::Dry,
            confidence: 48.7,
            all_conditions: Distribution::from_fn(|label| match label {
                ConditionLabel::Acne => 12.3456,
                ConditionLabel::Dry => 48.6543,
                ConditionLabel::Pigmentation => 3.0,
                ConditionLabel::Wrinkle => 30.04,
                ConditionLabel::DarkCircles => 3.0,
                ConditionLabel::Normal => 2.96,
            }),
            recommendations: RecommendationBody {
                description: "Dry skin lacks moisture.".into(),
                tips: vec!["Hydrate".into(), "Moisturize".into()],
                ingredients_to_look_for: vec!["Ceramides".into(), "Glycerin".into()],
                ingredients_to_avoid: vec!["Alcohol".into(), "Fragrances".into()],
            },
        }
    }

    #[test]
    fn file_name_follows_pattern() {
        assert_eq!(
            report_file_name(1_700_000_000_000),
            "skin-analysis-report-1700000000000.txt"
        );
    }

    #[test]
    fn lists_conditions_in_screen_order() {
        let report = render_report(&result(), "2024-01-01");
        let listed: Vec<&str> = report
            .lines()
            .filter(|l| l.starts_with("  - "))
            .collect();
        assert_eq!(
            listed,
            vec![
                "  - Dry Skin: 48.7%",
                "  - Wrinkles: 30.0%",
                "  - Acne: 12.3%",
                "  - Pigmentation: 3.0%",
                "  - Dark Circles: 3.0%",
                "  - Normal/Healthy: 3.0%",
            ]
        );
    }

    #[test]
    fn includes_numbered_tips_and_joined_ingredients() {
        let report = render_report(&result(), "2024-01-01");
        assert!(report.contains("Detected Condition: Dry Skin"));
        assert!(report.contains("Confidence: 48.7%"));
        assert!(report.contains("  1. Hydrate\n  2. Moisturize\n"));
        assert!(report.contains("Ingredients to Look For: Ceramides, Glycerin"));
        assert!(report.contains("Ingredients to Avoid: Alcohol, Fragrances"));
    }

    /// Sink that accepts a fixed number of bytes and then refuses.
    struct Bounded {
        written: String,
        capacity: usize,
    }

    impl Write for Bounded {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.written.len() + s.len() > self.capacity {
                return Err(fmt::Error);
            }
            self.written.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn write_failures_stop_the_report() {
        let mut sink = Bounded {
            written: String::new(),
            capacity: 50,
        };
        assert!(write_report(&mut sink, &result(), "2024-01-01").is_err());
        assert_eq!(sink.written, "SKIN ANALYSIS REPORT\n====================\n");
    }

    #[test]
    fn render_matches_streamed_report() {
        let mut streamed = String::new();
        write_report(&mut streamed, &result(), "2024-01-01").unwrap();
        assert_eq!(streamed, render_report(&result(), "2024-01-01"));
        assert!(streamed.ends_with("not a medical diagnosis.\n"));
    }
}
