use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AnalyticsReport, Category, Priority, Trend};

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => "improving",
        Trend::Declining => "declining",
        Trend::Stable => "stable",
    }
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Structure => "structure",
        Category::Expression => "expression",
        Category::Content => "content",
        Category::Emotion => "emotion",
        Category::Technical => "technical",
        Category::General => "general",
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

pub fn build_report(report: &AnalyticsReport, cutoff: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Writing Growth Report");
    let _ = writeln!(output, "Entries since {cutoff}");
    let _ = writeln!(output);

    if !report.has_data {
        let _ = writeln!(output, "No entries recorded for this window.");
        return output;
    }

    let summary = &report.summary;
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- {} entries, {} with feedback",
        summary.total_entries, summary.entries_with_feedback
    );
    let _ = writeln!(output, "- Average score {:.1}", summary.avg_score);
    let _ = writeln!(
        output,
        "- Average application score {:.1}",
        summary.avg_application_score
    );
    if let Some(area) = &summary.strongest_area {
        let _ = writeln!(output, "- Strongest area: {area}");
    }
    if let Some(area) = &summary.weakest_area {
        let _ = writeln!(output, "- Weakest area: {area}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trend");
    let _ = writeln!(
        output,
        "- Application trend: {}",
        trend_label(report.trend)
    );
    let _ = writeln!(output, "- Growth rate: {:+.1}%", report.growth_rate);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Repeated Issues");
    if report.repeated_issues.is_empty() {
        let _ = writeln!(output, "No recurring feedback issues in this window.");
    } else {
        for issue in &report.repeated_issues {
            let _ = writeln!(
                output,
                "- {}: {} mentions",
                category_label(issue.category),
                issue.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Strengths");
    if report.strengths.is_empty() {
        let _ = writeln!(output, "No strengths recorded for this window.");
    } else {
        for strength in &report.strengths {
            let _ = writeln!(
                output,
                "- {} ({} mentions): \"{}\" from {} on {} (score {:.0})",
                category_label(strength.category),
                strength.mentions,
                strength.text,
                strength.entry.title,
                strength.entry.date,
                strength.entry.score
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Improvement Areas");
    if report.improvement_areas.is_empty() {
        let _ = writeln!(output, "No improvement areas recorded for this window.");
    } else {
        for area in &report.improvement_areas {
            let _ = writeln!(
                output,
                "- {} ({} mentions, {} priority)",
                category_label(area.category),
                area.mentions,
                priority_label(area.priority)
            );
            for example in &area.examples {
                let _ = writeln!(
                    output,
                    "  - \"{}\" from {} on {}",
                    example.text, example.entry.title, example.entry.date
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Focus Areas");
    if report.focus_areas.is_empty() {
        let _ = writeln!(output, "Keep writing; nothing specific to focus on yet.");
    } else {
        for advice in &report.focus_areas {
            let _ = writeln!(output, "- {advice}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Activity");
    for bucket in &report.weekly {
        let _ = writeln!(
            output,
            "- {}: {} entries (avg score {:.1})",
            bucket.period, bucket.entry_count, bucket.avg_score
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::analyze_history;
    use crate::input::sample_history;
    use crate::input::split_records;
    use crate::lexicon::{AnalysisConfig, Lexicon};
    use crate::models::AnalyticsReport;

    #[test]
    fn no_data_report_short_circuits() {
        let report = AnalyticsReport::no_data();
        let cutoff = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let markdown = build_report(&report, cutoff);
        assert!(markdown.contains("# Writing Growth Report"));
        assert!(markdown.contains("No entries recorded for this window."));
        assert!(!markdown.contains("## Summary"));
    }

    #[test]
    fn full_report_renders_every_section() {
        let (entries, payloads) = split_records(sample_history().unwrap());
        let report = analyze_history(
            &entries,
            &payloads,
            &Lexicon::default(),
            &AnalysisConfig::default(),
        );
        let cutoff = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let markdown = build_report(&report, cutoff);

        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## Trend"));
        assert!(markdown.contains("## Repeated Issues"));
        assert!(markdown.contains("## Strengths"));
        assert!(markdown.contains("## Improvement Areas"));
        assert!(markdown.contains("## Focus Areas"));
        assert!(markdown.contains("## Weekly Activity"));
    }
}
