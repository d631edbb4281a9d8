use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub criteria: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub entry_id: Uuid,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub writing_tips: String,
    pub criteria_scores: BTreeMap<String, CriterionScore>,
}

impl FeedbackRecord {
    pub fn empty(entry_id: Uuid) -> Self {
        Self {
            entry_id,
            strengths: Vec::new(),
            improvements: Vec::new(),
            writing_tips: String::new(),
            criteria_scores: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.improvements.is_empty()
            && self.writing_tips.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structure,
    Expression,
    Content,
    Emotion,
    Technical,
    General,
}

impl Category {
    pub fn priority(self) -> Priority {
        match self {
            Category::Structure | Category::Expression => Priority::High,
            Category::Content | Category::Emotion => Priority::Medium,
            Category::Technical | Category::General => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Improvement,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub text: String,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAnalysis {
    pub entry_id: Uuid,
    pub has_feedback: bool,
    pub application_score: u32,
    pub applied_suggestions: Vec<Suggestion>,
    pub ignored_suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceStructure {
    pub count: usize,
    pub avg_length: f64,
    pub long_sentences: usize,
    pub short_sentences: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyDiversity {
    pub total_words: usize,
    pub unique_words: usize,
    pub diversity_ratio: f64,
    pub advanced_words: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStructure {
    pub count: usize,
    pub avg_length: f64,
    pub single_sentence_paragraphs: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expressiveness {
    pub emotional_words: usize,
    pub descriptive_words: usize,
    pub figurative_expressions: usize,
}

impl Expressiveness {
    pub fn total(&self) -> usize {
        self.emotional_words + self.descriptive_words + self.figurative_expressions
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingType {
    Reflection,
    Future,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndingQuality {
    pub ending_type: EndingType,
    pub ending_length: usize,
    pub has_reflection: bool,
    pub has_future_orientation: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub sentence_structure: SentenceStructure,
    pub vocabulary_diversity: VocabularyDiversity,
    pub paragraph_structure: ParagraphStructure,
    pub expressiveness: Expressiveness,
    pub ending_quality: EndingQuality,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryIndicators {
    pub entry_id: Uuid,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFrequency {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRef {
    pub entry_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub score: f64,
}

impl EntryRef {
    pub fn from_entry(entry: &WritingEntry) -> Self {
        Self {
            entry_id: entry.id,
            title: entry.title.clone(),
            date: entry.date,
            score: entry.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthHighlight {
    pub category: Category,
    pub mentions: usize,
    pub text: String,
    pub entry: EntryRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementExample {
    pub text: String,
    pub entry: EntryRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementArea {
    pub category: Category,
    pub mentions: usize,
    pub priority: Priority,
    pub examples: Vec<ImprovementExample>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    pub period: String,
    pub entry_count: usize,
    pub avg_score: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_entries: usize,
    pub entries_with_feedback: usize,
    pub avg_score: f64,
    pub avg_application_score: f64,
    pub strongest_area: Option<String>,
    pub weakest_area: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub has_data: bool,
    pub summary: Summary,
    pub application_analyses: Vec<ApplicationAnalysis>,
    pub entry_indicators: Vec<EntryIndicators>,
    pub trend: Trend,
    pub growth_rate: f64,
    pub repeated_issues: Vec<IssueFrequency>,
    pub strengths: Vec<StrengthHighlight>,
    pub improvement_areas: Vec<ImprovementArea>,
    pub focus_areas: Vec<String>,
    pub weekly: Vec<PeriodBucket>,
    pub monthly: Vec<PeriodBucket>,
}

impl AnalyticsReport {
    pub fn no_data() -> Self {
        Self {
            has_data: false,
            summary: Summary::default(),
            application_analyses: Vec::new(),
            entry_indicators: Vec::new(),
            trend: Trend::Stable,
            growth_rate: 0.0,
            repeated_issues: Vec::new(),
            strengths: Vec::new(),
            improvement_areas: Vec::new(),
            focus_areas: Vec::new(),
            weekly: Vec::new(),
            monthly: Vec::new(),
        }
    }
}
