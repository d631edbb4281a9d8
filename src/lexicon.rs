use crate::models::Category;

// One row of the heuristic vocabulary: `triggers` classify a suggestion's
// free text into a category, `evidence` is what the matcher looks for newly
// appearing in the following entry.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    pub triggers: &'static [&'static str],
    pub evidence: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    pub categories: Vec<CategoryRule>,
    pub emotional_words: &'static [&'static str],
    pub descriptive_words: &'static [&'static str],
    pub figurative_markers: &'static [&'static str],
    pub reflection_endings: &'static [&'static str],
    pub future_endings: &'static [&'static str],
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryRule {
                    category: Category::Structure,
                    triggers: &[
                        "구조", "문단", "단락", "구성", "흐름", "순서", "도입", "결말",
                    ],
                    evidence: &[
                        "문단",
                        "먼저",
                        "첫째",
                        "둘째",
                        "다음으로",
                        "마지막으로",
                        "결론적으로",
                    ],
                },
                CategoryRule {
                    category: Category::Expression,
                    triggers: &["표현", "묘사", "비유", "어휘", "문장", "단어", "생생"],
                    evidence: &["마치", "처럼", "듯이", "같이", "같은"],
                },
                CategoryRule {
                    category: Category::Content,
                    triggers: &["내용", "주제", "경험", "구체", "예시", "소재"],
                    evidence: &["예를 들어", "왜냐하면", "때문에", "그때", "기억"],
                },
                CategoryRule {
                    category: Category::Emotion,
                    triggers: &["감정", "감동", "마음", "느낌", "진솔", "솔직"],
                    evidence: &["기뻤", "슬펐", "행복", "설레", "뿌듯", "두려웠"],
                },
                CategoryRule {
                    category: Category::Technical,
                    triggers: &["맞춤법", "띄어쓰기", "문법", "오타", "퇴고"],
                    evidence: &[],
                },
            ],
            emotional_words: &[
                "기쁘", "기뻤", "슬프", "슬펐", "행복", "설레", "두렵", "무섭", "즐겁",
                "화가", "속상", "뿌듯", "그리웠", "외로",
            ],
            descriptive_words: &[
                "아름다",
                "따뜻",
                "차가운",
                "포근",
                "눈부신",
                "고요",
                "싱그러",
                "새파란",
            ],
            figurative_markers: &["마치", "처럼", "듯이", "같이", "같은"],
            reflection_endings: &[
                "느꼈다",
                "깨달았다",
                "배웠다",
                "알게 되었다",
                "생각했다",
                "돌아보",
            ],
            future_endings: &[
                "앞으로",
                "다짐",
                "노력할",
                "하고 싶다",
                "할 것이다",
                "계획",
            ],
        }
    }
}

impl Lexicon {
    // First category whose trigger appears in the text wins; table order is
    // the tie-break for overlapping categories.
    pub fn categorize(&self, text: &str) -> Category {
        for rule in &self.categories {
            if rule.triggers.iter().any(|t| text.contains(t)) {
                return rule.category;
            }
        }
        Category::General
    }

    pub fn rule(&self, category: Category) -> Option<&CategoryRule> {
        self.categories.iter().find(|r| r.category == category)
    }

    pub fn evidence(&self, category: Category) -> &[&'static str] {
        self.rule(category).map(|r| r.evidence).unwrap_or(&[])
    }

    pub fn advice(&self, category: Category) -> &'static str {
        match category {
            Category::Structure => "문단을 나누고 글의 흐름이 자연스럽게 이어지도록 구성해 보세요",
            Category::Expression => "비유와 감각적인 표현으로 문장을 더 생생하게 다듬어 보세요",
            Category::Content => "구체적인 경험과 예시로 내용을 풍부하게 채워 보세요",
            Category::Emotion => "그 순간 느낀 감정을 솔직하게 담아 보세요",
            Category::Technical => "맞춤법과 띄어쓰기를 한 번 더 점검해 보세요",
            Category::General => "꾸준히 쓰면서 자신만의 문체를 찾아 보세요",
        }
    }
}

// Scoring and window constants. The point values and thresholds are the
// product's established tuning, kept overridable rather than re-derived.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub improvement_points: u32,
    pub tip_points: u32,
    pub score_cap: u32,
    pub trend_window: usize,
    pub growth_window: usize,
    pub top_issue_limit: usize,
    pub strength_category_limit: usize,
    pub example_limit: usize,
    pub focus_area_limit: usize,
    pub strong_threshold: f64,
    pub steady_threshold: f64,
    pub weak_threshold: f64,
    pub long_sentence_chars: usize,
    pub short_sentence_chars: usize,
    pub advanced_word_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            improvement_points: 25,
            tip_points: 15,
            score_cap: 100,
            trend_window: 3,
            growth_window: 3,
            top_issue_limit: 5,
            strength_category_limit: 3,
            example_limit: 2,
            focus_area_limit: 3,
            strong_threshold: 80.0,
            steady_threshold: 70.0,
            weak_threshold: 50.0,
            long_sentence_chars: 50,
            short_sentence_chars: 20,
            advanced_word_chars: 4,
        }
    }
}
