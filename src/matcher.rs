use once_cell::sync::Lazy;
use regex::Regex;

use crate::indicators;
use crate::lexicon::{AnalysisConfig, Lexicon};
use crate::models::{
    ApplicationAnalysis, Category, FeedbackRecord, Suggestion, SuggestionKind, WritingEntry,
};

// Suggestions that carry a concrete rewrite example, e.g.
// '달렸다' → '바람을 가르며 달렸다' or "'갔다' 대신 '걸어갔다'".
static BEFORE_AFTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"['"“‘「]([^'"”’」]+)['"”’」]\s*(?:→|->|대신에?|보다는?)\s*['"“‘「]([^'"”’」]+)['"”’」]"#,
    )
    .unwrap()
});

static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"“‘「]([^'"”’」]+)['"”’」]"#).unwrap());

pub struct MatchContext<'a> {
    pub suggestion_text: &'a str,
    pub category: Category,
    pub current_text: &'a str,
    pub next_text: &'a str,
    pub lexicon: &'a Lexicon,
    pub config: &'a AnalysisConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Matched,
    NotMatched,
}

// The cascade is an ordered rule list, evaluated in sequence; the first
// Matched outcome wins and later rules are not consulted.
pub struct MatchRule {
    pub name: &'static str,
    pub evaluate: fn(&MatchContext) -> RuleOutcome,
}

pub fn improvement_rules() -> Vec<MatchRule> {
    vec![
        MatchRule {
            name: "example_pattern",
            evaluate: example_pattern_rule,
        },
        MatchRule {
            name: "keyword_delta",
            evaluate: keyword_delta_rule,
        },
        MatchRule {
            name: "structural_proxy",
            evaluate: structural_proxy_rule,
        },
    ]
}

pub fn suggestion_applied(rules: &[MatchRule], ctx: &MatchContext) -> bool {
    rules
        .iter()
        .any(|rule| (rule.evaluate)(ctx) == RuleOutcome::Matched)
}

// Rule 1: the "after" pattern of a quoted example must gain occurrences in
// the next entry, and gain more than the "before" pattern does.
fn example_pattern_rule(ctx: &MatchContext) -> RuleOutcome {
    if let Some(caps) = BEFORE_AFTER_RE.captures(ctx.suggestion_text) {
        let before = caps[1].trim();
        let after = caps[2].trim();
        let after_gain =
            occurrences(ctx.next_text, after) as i64 - occurrences(ctx.current_text, after) as i64;
        let before_gain = occurrences(ctx.next_text, before) as i64
            - occurrences(ctx.current_text, before) as i64;
        if after_gain > 0 && before_gain < after_gain {
            return RuleOutcome::Matched;
        }
        return RuleOutcome::NotMatched;
    }

    if let Some(caps) = QUOTED_RE.captures(ctx.suggestion_text) {
        let pattern = caps[1].trim();
        if occurrences(ctx.next_text, pattern) > occurrences(ctx.current_text, pattern) {
            return RuleOutcome::Matched;
        }
    }
    RuleOutcome::NotMatched
}

// Rule 2: a companion keyword of the suggestion's category newly appears in
// the next entry.
fn keyword_delta_rule(ctx: &MatchContext) -> RuleOutcome {
    let newly_appeared = ctx.lexicon.evidence(ctx.category).iter().any(|keyword| {
        ctx.next_text.contains(keyword) && !ctx.current_text.contains(keyword)
    });
    if newly_appeared {
        RuleOutcome::Matched
    } else {
        RuleOutcome::NotMatched
    }
}

// Rule 3: category-specific structural deltas between the two entries.
fn structural_proxy_rule(ctx: &MatchContext) -> RuleOutcome {
    let matched = match ctx.category {
        Category::Structure => {
            let current = indicators::paragraph_structure(ctx.current_text);
            let next = indicators::paragraph_structure(ctx.next_text);
            if next.count > current.count {
                true
            } else if mentions_sentence_length(ctx.suggestion_text) {
                sentence_balance(ctx.next_text, ctx.config)
                    < sentence_balance(ctx.current_text, ctx.config)
            } else {
                false
            }
        }
        Category::Expression => {
            indicators::expressiveness(ctx.next_text, ctx.lexicon).total()
                > indicators::expressiveness(ctx.current_text, ctx.lexicon).total()
        }
        Category::Content => {
            indicators::vocabulary_diversity(ctx.next_text, ctx.config).diversity_ratio
                > indicators::vocabulary_diversity(ctx.current_text, ctx.config).diversity_ratio
        }
        Category::Emotion => {
            indicators::expressiveness(ctx.next_text, ctx.lexicon).emotional_words
                > indicators::expressiveness(ctx.current_text, ctx.lexicon).emotional_words
        }
        Category::Technical | Category::General => false,
    };
    if matched {
        RuleOutcome::Matched
    } else {
        RuleOutcome::NotMatched
    }
}

fn mentions_sentence_length(text: &str) -> bool {
    text.contains("문장") && (text.contains("길") || text.contains("짧"))
}

// How lopsided the long/short sentence mix is; smaller is more balanced.
fn sentence_balance(text: &str, config: &AnalysisConfig) -> f64 {
    let metrics = indicators::sentence_structure(text, config);
    if metrics.count == 0 {
        return 0.0;
    }
    (metrics.long_sentences as f64 - metrics.short_sentences as f64).abs()
        / metrics.count as f64
}

fn occurrences(text: &str, pattern: &str) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    text.matches(pattern).count()
}

// The single free-text tips value gets a simpler cascade: overall score
// improvement, then keyword delta, then an embedded rewrite example.
fn tip_applied(
    tip: &str,
    category: Category,
    current: &WritingEntry,
    next: &WritingEntry,
    lexicon: &Lexicon,
) -> bool {
    if next.score > current.score {
        return true;
    }

    if lexicon.evidence(category).iter().any(|keyword| {
        next.text.contains(keyword) && !current.text.contains(keyword)
    }) {
        return true;
    }

    if let Some(caps) = BEFORE_AFTER_RE.captures(tip) {
        let after = caps[2].trim();
        return occurrences(&next.text, after) > occurrences(&current.text, after);
    }
    false
}

// Per-entry pairwise analysis over the ascending-by-date history. Matching is
// forward-only: an entry's feedback is only ever checked against the entry
// that follows it, so the last entry always scores 0 with empty lists.
pub fn analyze_application(
    entries: &[WritingEntry],
    records: &[FeedbackRecord],
    lexicon: &Lexicon,
    config: &AnalysisConfig,
) -> Vec<ApplicationAnalysis> {
    let rules = improvement_rules();

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let record = &records[i];
            let has_feedback = !record.is_empty();

            let Some(next_entry) = entries.get(i + 1).filter(|_| has_feedback) else {
                return ApplicationAnalysis {
                    entry_id: entry.id,
                    has_feedback,
                    application_score: 0,
                    applied_suggestions: Vec::new(),
                    ignored_suggestions: Vec::new(),
                };
            };

            let texts_present =
                !entry.text.trim().is_empty() && !next_entry.text.trim().is_empty();

            let mut applied = Vec::new();
            let mut ignored = Vec::new();

            for improvement in &record.improvements {
                let category = lexicon.categorize(improvement);
                let ctx = MatchContext {
                    suggestion_text: improvement,
                    category,
                    current_text: &entry.text,
                    next_text: &next_entry.text,
                    lexicon,
                    config,
                };
                let suggestion = Suggestion {
                    kind: SuggestionKind::Improvement,
                    text: improvement.clone(),
                    category,
                };
                if texts_present && suggestion_applied(&rules, &ctx) {
                    applied.push(suggestion);
                } else {
                    ignored.push(suggestion);
                }
            }

            if !record.writing_tips.trim().is_empty() {
                let category = lexicon.categorize(&record.writing_tips);
                let suggestion = Suggestion {
                    kind: SuggestionKind::Tip,
                    text: record.writing_tips.clone(),
                    category,
                };
                if texts_present
                    && tip_applied(&record.writing_tips, category, entry, next_entry, lexicon)
                {
                    applied.push(suggestion);
                } else {
                    ignored.push(suggestion);
                }
            }

            ApplicationAnalysis {
                entry_id: entry.id,
                has_feedback,
                application_score: score_application(&applied, config),
                applied_suggestions: applied,
                ignored_suggestions: ignored,
            }
        })
        .collect()
}

// Additive model chosen for explainability: the result is an ordinal
// confidence signal, not a calibrated probability.
pub fn score_application(applied: &[Suggestion], config: &AnalysisConfig) -> u32 {
    let total: u32 = applied
        .iter()
        .map(|s| match s.kind {
            SuggestionKind::Improvement => config.improvement_points,
            SuggestionKind::Tip => config.tip_points,
        })
        .sum();
    total.min(config.score_cap)
}
