use std::collections::BTreeMap;

use crate::lexicon::Lexicon;
use crate::models::{Category, FeedbackRecord, IssueFrequency, Trend, WritingEntry};

// Rolling 3-point classification over the most recent application scores.
// Fewer than `window` scored entries reads as stable.
pub fn classify_trend(scores: &[u32], window: usize) -> Trend {
    if scores.len() < window || window < 2 {
        return Trend::Stable;
    }

    let recent = &scores[scores.len() - window..];
    if recent.windows(2).all(|pair| pair[1] > pair[0]) {
        Trend::Improving
    } else if recent.windows(2).all(|pair| pair[1] < pair[0]) {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

// One dominant issue label per feedback record, tested against the
// concatenated improvement texts and tips, tallied across the window.
pub fn repeated_issues(
    records: &[FeedbackRecord],
    lexicon: &Lexicon,
    limit: usize,
) -> Vec<IssueFrequency> {
    let mut tally: BTreeMap<Category, usize> = BTreeMap::new();

    for record in records.iter().filter(|r| !r.is_empty()) {
        let mut combined = record.improvements.join(" ");
        combined.push(' ');
        combined.push_str(&record.writing_tips);
        *tally.entry(lexicon.categorize(&combined)).or_insert(0) += 1;
    }

    let mut issues: Vec<IssueFrequency> = tally
        .into_iter()
        .map(|(category, count)| IssueFrequency { category, count })
        .collect();
    issues.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
    issues.truncate(limit);
    issues
}

// Percentage delta between the mean score of the most recent `window`
// entries and the mean of the `window` before them. Undefined (0) when the
// history is too short for both windows.
pub fn growth_rate(entries: &[WritingEntry], window: usize) -> f64 {
    if window == 0 || entries.len() < window * 2 {
        return 0.0;
    }

    let recent: f64 = entries[entries.len() - window..]
        .iter()
        .map(|e| e.score)
        .sum::<f64>()
        / window as f64;
    let previous: f64 = entries[entries.len() - window * 2..entries.len() - window]
        .iter()
        .map(|e| e.score)
        .sum::<f64>()
        / window as f64;

    if previous == 0.0 {
        return 0.0;
    }
    (recent - previous) / previous * 100.0
}
