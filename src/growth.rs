use std::collections::BTreeMap;

use chrono::Datelike;
use serde_json::Value;

use crate::lexicon::{AnalysisConfig, Lexicon};
use crate::matcher;
use crate::models::{
    AnalyticsReport, Category, EntryIndicators, EntryRef, FeedbackRecord, ImprovementArea,
    ImprovementExample, IssueFrequency, PeriodBucket, Priority, StrengthHighlight, Summary,
    WritingEntry,
};
use crate::normalize::normalize_feedback;
use crate::trend;
use crate::indicators::extract_indicators;

// The whole engine is a pure function of the (already date-ascending,
// already window-filtered) history slice. Nothing here mutates its inputs or
// keeps state between calls, so repeated runs over the same slice produce
// byte-identical reports.
pub fn analyze_history(
    entries: &[WritingEntry],
    payloads: &[Option<Value>],
    lexicon: &Lexicon,
    config: &AnalysisConfig,
) -> AnalyticsReport {
    if entries.is_empty() {
        return AnalyticsReport::no_data();
    }

    let records: Vec<FeedbackRecord> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            normalize_feedback(entry.id, payloads.get(i).and_then(|p| p.as_ref()))
        })
        .collect();

    let analyses = matcher::analyze_application(entries, &records, lexicon, config);

    let entry_indicators: Vec<EntryIndicators> = entries
        .iter()
        .map(|entry| EntryIndicators {
            entry_id: entry.id,
            indicators: extract_indicators(&entry.text, lexicon, config),
        })
        .collect();

    // Only entries that were actually evaluated against a successor carry a
    // meaningful application score.
    let evaluated_scores: Vec<u32> = analyses
        .iter()
        .take(analyses.len().saturating_sub(1))
        .filter(|a| a.has_feedback)
        .map(|a| a.application_score)
        .collect();

    let trend_label = trend::classify_trend(&evaluated_scores, config.trend_window);
    let repeated = trend::repeated_issues(&records, lexicon, config.top_issue_limit);
    let growth = trend::growth_rate(entries, config.growth_window);

    let strengths = collect_strengths(entries, &records, lexicon, config);
    let improvement_areas = collect_improvement_areas(entries, &records, lexicon, config);
    let summary = build_summary(entries, &records, &evaluated_scores, config);

    let mut focus_areas = collect_focus_areas(&improvement_areas, &repeated, lexicon, config);
    if focus_areas.is_empty() && summary.avg_application_score < config.steady_threshold {
        focus_areas.push(lexicon.advice(Category::General).to_string());
    }

    AnalyticsReport {
        has_data: true,
        summary,
        application_analyses: analyses,
        entry_indicators,
        trend: trend_label,
        growth_rate: growth,
        repeated_issues: repeated,
        strengths,
        improvement_areas,
        focus_areas,
        weekly: bucket_by(entries, week_label),
        monthly: bucket_by(entries, month_label),
    }
}

fn build_summary(
    entries: &[WritingEntry],
    records: &[FeedbackRecord],
    evaluated_scores: &[u32],
    config: &AnalysisConfig,
) -> Summary {
    let with_feedback = records.iter().filter(|r| !r.is_empty()).count();
    let avg_score = entries.iter().map(|e| e.score).sum::<f64>() / entries.len() as f64;
    let avg_application_score = if evaluated_scores.is_empty() {
        0.0
    } else {
        evaluated_scores.iter().sum::<u32>() as f64 / evaluated_scores.len() as f64
    };

    let averages = criteria_averages(entries);
    let strongest_area = averages
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1).then(b.0.cmp(a.0)))
        .and_then(|(name, &avg)| (avg >= config.strong_threshold).then(|| name.clone()));
    let weakest_area = averages
        .iter()
        .min_by(|a, b| a.1.total_cmp(b.1).then(b.0.cmp(a.0)))
        .and_then(|(name, &avg)| (avg < config.weak_threshold).then(|| name.clone()));

    Summary {
        total_entries: entries.len(),
        entries_with_feedback: with_feedback,
        avg_score,
        avg_application_score,
        strongest_area,
        weakest_area,
    }
}

fn criteria_averages(entries: &[WritingEntry]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        for (name, &score) in &entry.criteria {
            let slot = sums.entry(name.clone()).or_insert((0.0, 0));
            slot.0 += score;
            slot.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(name, (sum, count))| (name, sum / count as f64))
        .collect()
}

// One representative entry per strength category: highest entry score,
// recency breaking ties, top categories by mention count.
fn collect_strengths(
    entries: &[WritingEntry],
    records: &[FeedbackRecord],
    lexicon: &Lexicon,
    config: &AnalysisConfig,
) -> Vec<StrengthHighlight> {
    struct Accum<'a> {
        mentions: usize,
        text: &'a str,
        entry: &'a WritingEntry,
    }

    let mut by_category: BTreeMap<Category, Accum> = BTreeMap::new();

    for (entry, record) in entries.iter().zip(records) {
        for strength in &record.strengths {
            let category = lexicon.categorize(strength);
            let accum = by_category.entry(category).or_insert_with(|| Accum {
                mentions: 0,
                text: strength,
                entry,
            });
            accum.mentions += 1;
            let better = entry.score > accum.entry.score
                || (entry.score == accum.entry.score && entry.date >= accum.entry.date);
            if better {
                accum.text = strength;
                accum.entry = entry;
            }
        }
    }

    let mut highlights: Vec<StrengthHighlight> = by_category
        .into_iter()
        .map(|(category, accum)| StrengthHighlight {
            category,
            mentions: accum.mentions,
            text: accum.text.to_string(),
            entry: EntryRef::from_entry(accum.entry),
        })
        .collect();
    highlights.sort_by(|a, b| b.mentions.cmp(&a.mentions).then(a.category.cmp(&b.category)));
    highlights.truncate(config.strength_category_limit);
    highlights
}

// Frequency-grouped improvement mentions with the most recent example
// occurrences attached; priority is fixed per category.
fn collect_improvement_areas(
    entries: &[WritingEntry],
    records: &[FeedbackRecord],
    lexicon: &Lexicon,
    config: &AnalysisConfig,
) -> Vec<ImprovementArea> {
    let mut grouped: BTreeMap<Category, Vec<ImprovementExample>> = BTreeMap::new();

    for (entry, record) in entries.iter().zip(records) {
        for improvement in &record.improvements {
            let category = lexicon.categorize(improvement);
            grouped.entry(category).or_default().push(ImprovementExample {
                text: improvement.clone(),
                entry: EntryRef::from_entry(entry),
            });
        }
    }

    let mut areas: Vec<ImprovementArea> = grouped
        .into_iter()
        .map(|(category, occurrences)| {
            let mentions = occurrences.len();
            let skip = mentions.saturating_sub(config.example_limit);
            ImprovementArea {
                category,
                mentions,
                priority: category.priority(),
                examples: occurrences.into_iter().skip(skip).collect(),
            }
        })
        .collect();
    areas.sort_by(|a, b| b.mentions.cmp(&a.mentions).then(a.category.cmp(&b.category)));
    areas
}

fn collect_focus_areas(
    areas: &[ImprovementArea],
    repeated: &[IssueFrequency],
    lexicon: &Lexicon,
    config: &AnalysisConfig,
) -> Vec<String> {
    let mut ordered: Vec<Category> = Vec::new();

    for priority in [Priority::High, Priority::Medium, Priority::Low] {
        for area in areas.iter().filter(|a| a.priority == priority) {
            if !ordered.contains(&area.category) {
                ordered.push(area.category);
            }
        }
    }
    for issue in repeated {
        if !ordered.contains(&issue.category) {
            ordered.push(issue.category);
        }
    }

    ordered.truncate(config.focus_area_limit);
    ordered
        .into_iter()
        .map(|category| lexicon.advice(category).to_string())
        .collect()
}

fn week_label(entry: &WritingEntry) -> String {
    let iso = entry.date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

fn month_label(entry: &WritingEntry) -> String {
    format!("{}-{:02}", entry.date.year(), entry.date.month())
}

fn bucket_by(entries: &[WritingEntry], label: fn(&WritingEntry) -> String) -> Vec<PeriodBucket> {
    let mut buckets: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for entry in entries {
        let slot = buckets.entry(label(entry)).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += entry.score;
    }

    buckets
        .into_iter()
        .map(|(period, (count, sum))| PeriodBucket {
            period,
            entry_count: count,
            avg_score: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use uuid::Uuid;

    fn sample_entry(year: i32, month: u32, day: u32, score: f64, text: &str) -> WritingEntry {
        WritingEntry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            title: format!("{month}월 {day}일"),
            score,
            text: text.to_string(),
            criteria: Default::default(),
        }
    }

    fn feedback_payload(improvements: &[&str], strengths: &[&str]) -> Value {
        json!({
            "strengths": strengths,
            "improvements": improvements,
            "writingTips": ""
        })
    }

    fn defaults() -> (Lexicon, AnalysisConfig) {
        (Lexicon::default(), AnalysisConfig::default())
    }

    #[test]
    fn empty_history_reports_no_data() {
        let (lexicon, config) = defaults();
        let report = analyze_history(&[], &[], &lexicon, &config);
        assert!(!report.has_data);
        assert!(report.application_analyses.is_empty());
        assert_eq!(report.summary.total_entries, 0);
    }

    #[test]
    fn identical_input_yields_byte_identical_output() {
        let (lexicon, config) = defaults();
        let entries = vec![
            sample_entry(2026, 3, 2, 60.0, "오늘은 비가 왔다. 우산을 잃어버렸다."),
            sample_entry(
                2026,
                3,
                9,
                72.0,
                "먼저 아침의 일을 적는다.\n\n마지막으로 저녁의 일을 적는다.",
            ),
        ];
        let payloads = vec![
            Some(feedback_payload(
                &["글의 구조를 나눠 보세요"],
                &["감정 표현이 솔직해요"],
            )),
            None,
        ];

        let first =
            serde_json::to_vec(&analyze_history(&entries, &payloads, &lexicon, &config)).unwrap();
        let second =
            serde_json::to_vec(&analyze_history(&entries, &payloads, &lexicon, &config)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_feedback_is_treated_as_feedback_less() {
        let (lexicon, config) = defaults();
        let entries = vec![
            sample_entry(2026, 3, 2, 60.0, "첫 글이다."),
            sample_entry(2026, 3, 9, 70.0, "둘째 글이다."),
        ];
        let payloads = vec![Some(Value::String("not json".to_string())), None];

        let report = analyze_history(&entries, &payloads, &lexicon, &config);
        assert!(report.has_data);
        assert_eq!(report.summary.entries_with_feedback, 0);
        assert!(!report.application_analyses[0].has_feedback);
    }

    #[test]
    fn application_scores_stay_bounded() {
        let (lexicon, config) = defaults();
        let entries = vec![
            sample_entry(
                2026,
                3,
                2,
                60.0,
                "오늘은 바다에 갔다. 파도를 보았다.",
            ),
            sample_entry(
                2026,
                3,
                9,
                80.0,
                "먼저 바다를 보았다. 마치 꿈처럼 행복했다.\n\n마지막으로 많은 것을 느꼈다.",
            ),
        ];
        let payloads = vec![
            Some(feedback_payload(
                &[
                    "문단 구조를 나눠 보세요",
                    "비유 표현을 써 보세요",
                    "감정을 솔직하게 담아 보세요",
                    "구체적인 예시로 내용을 채워 보세요",
                    "흐름이 드러나게 순서를 잡아 보세요",
                ],
                &[],
            )),
            None,
        ];

        let report = analyze_history(&entries, &payloads, &lexicon, &config);
        for analysis in &report.application_analyses {
            assert!(analysis.application_score <= 100);
        }
    }

    #[test]
    fn last_entry_never_scores() {
        let (lexicon, config) = defaults();
        let entries = vec![
            sample_entry(2026, 3, 2, 60.0, "첫 글이다."),
            sample_entry(2026, 3, 9, 70.0, "마지막 글이다."),
        ];
        let payloads = vec![None, Some(feedback_payload(&["구조를 다듬어 보세요"], &[]))];

        let report = analyze_history(&entries, &payloads, &lexicon, &config);
        let last = report.application_analyses.last().unwrap();
        assert!(last.has_feedback);
        assert_eq!(last.application_score, 0);
        assert!(last.applied_suggestions.is_empty());
        assert!(last.ignored_suggestions.is_empty());
    }

    #[test]
    fn entries_bucket_by_iso_week_and_month() {
        let (lexicon, config) = defaults();
        // 2026-03-01 is a Sunday; 2026-03-02 starts the next ISO week.
        let entries = vec![
            sample_entry(2026, 3, 1, 60.0, "일요일의 글"),
            sample_entry(2026, 3, 2, 70.0, "월요일의 글"),
            sample_entry(2026, 3, 4, 80.0, "수요일의 글"),
            sample_entry(2026, 4, 1, 90.0, "다음 달의 글"),
        ];
        let payloads = vec![None, None, None, None];

        let report = analyze_history(&entries, &payloads, &lexicon, &config);
        assert_eq!(report.weekly.len(), 3);
        assert_eq!(report.weekly[0].period, "2026-W09");
        assert_eq!(report.weekly[0].entry_count, 1);
        assert_eq!(report.weekly[1].period, "2026-W10");
        assert_eq!(report.weekly[1].entry_count, 2);
        assert!((report.weekly[1].avg_score - 75.0).abs() < 1e-9);

        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.monthly[0].period, "2026-03");
        assert_eq!(report.monthly[0].entry_count, 3);
        assert_eq!(report.monthly[1].period, "2026-04");
    }

    #[test]
    fn strengths_pick_highest_scoring_representative() {
        let (lexicon, config) = defaults();
        let entries = vec![
            sample_entry(2026, 3, 2, 60.0, "첫 글"),
            sample_entry(2026, 3, 9, 85.0, "둘째 글"),
            sample_entry(2026, 3, 16, 70.0, "셋째 글"),
        ];
        let payloads = vec![
            Some(feedback_payload(&[], &["표현이 생생해요"])),
            Some(feedback_payload(&[], &["묘사가 돋보여요"])),
            Some(feedback_payload(&[], &["비유가 좋아요"])),
        ];

        let report = analyze_history(&entries, &payloads, &lexicon, &config);
        assert_eq!(report.strengths.len(), 1);
        let highlight = &report.strengths[0];
        assert_eq!(highlight.category, Category::Expression);
        assert_eq!(highlight.mentions, 3);
        assert_eq!(highlight.entry.score, 85.0);
        assert_eq!(highlight.text, "묘사가 돋보여요");
    }

    #[test]
    fn improvement_areas_carry_priority_and_examples() {
        let (lexicon, config) = defaults();
        let entries = vec![
            sample_entry(2026, 3, 2, 60.0, "첫 글"),
            sample_entry(2026, 3, 9, 65.0, "둘째 글"),
            sample_entry(2026, 3, 16, 70.0, "셋째 글"),
        ];
        let payloads = vec![
            Some(feedback_payload(&["문단 구성을 바꿔 보세요"], &[])),
            Some(feedback_payload(&["구조가 느슨해요"], &[])),
            Some(feedback_payload(&["도입과 결말을 이어 보세요"], &[])),
        ];

        let report = analyze_history(&entries, &payloads, &lexicon, &config);
        assert_eq!(report.improvement_areas.len(), 1);
        let area = &report.improvement_areas[0];
        assert_eq!(area.category, Category::Structure);
        assert_eq!(area.mentions, 3);
        assert_eq!(area.priority, Priority::High);
        assert_eq!(area.examples.len(), 2);
        assert_eq!(area.examples[1].text, "도입과 결말을 이어 보세요");
        assert!(!report.focus_areas.is_empty());
    }
}
