use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::{AnalysisConfig, Lexicon};
use crate::models::{
    EndingQuality, EndingType, Expressiveness, Indicators, ParagraphStructure,
    SentenceStructure, VocabularyDiversity,
};

static PARAGRAPH_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

// Lexical proxies, not linguistic analysis. Every metric tolerates empty or
// non-text input by reporting zeros, and lengths are counted in chars so
// Hangul text is measured the same as Latin.
pub fn extract_indicators(text: &str, lexicon: &Lexicon, config: &AnalysisConfig) -> Indicators {
    if text.trim().is_empty() {
        return Indicators::default();
    }

    Indicators {
        sentence_structure: sentence_structure(text, config),
        vocabulary_diversity: vocabulary_diversity(text, config),
        paragraph_structure: paragraph_structure(text),
        expressiveness: expressiveness(text, lexicon),
        ending_quality: ending_quality(text, lexicon),
    }
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?', '…'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

pub fn sentence_structure(text: &str, config: &AnalysisConfig) -> SentenceStructure {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return SentenceStructure::default();
    }

    let lengths: Vec<usize> = sentences.iter().map(|s| s.chars().count()).collect();
    let total: usize = lengths.iter().sum();

    SentenceStructure {
        count: sentences.len(),
        avg_length: total as f64 / sentences.len() as f64,
        long_sentences: lengths
            .iter()
            .filter(|&&len| len > config.long_sentence_chars)
            .count(),
        short_sentences: lengths
            .iter()
            .filter(|&&len| len < config.short_sentence_chars)
            .count(),
    }
}

pub fn vocabulary_diversity(text: &str, config: &AnalysisConfig) -> VocabularyDiversity {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return VocabularyDiversity::default();
    }

    let unique: std::collections::BTreeSet<&str> =
        tokens.iter().map(String::as_str).collect();
    let advanced = tokens
        .iter()
        .filter(|token| token.chars().count() >= config.advanced_word_chars)
        .count();

    VocabularyDiversity {
        total_words: tokens.len(),
        unique_words: unique.len(),
        diversity_ratio: unique.len() as f64 / tokens.len() as f64,
        advanced_words: advanced,
    }
}

pub fn paragraph_structure(text: &str) -> ParagraphStructure {
    let paragraphs: Vec<&str> = PARAGRAPH_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        return ParagraphStructure::default();
    }

    let total_chars: usize = paragraphs.iter().map(|p| p.chars().count()).sum();
    let single_sentence = paragraphs
        .iter()
        .filter(|p| split_sentences(p).len() == 1)
        .count();

    ParagraphStructure {
        count: paragraphs.len(),
        avg_length: total_chars as f64 / paragraphs.len() as f64,
        single_sentence_paragraphs: single_sentence,
    }
}

pub fn expressiveness(text: &str, lexicon: &Lexicon) -> Expressiveness {
    Expressiveness {
        emotional_words: count_occurrences(text, lexicon.emotional_words),
        descriptive_words: count_occurrences(text, lexicon.descriptive_words),
        figurative_expressions: count_occurrences(text, lexicon.figurative_markers),
    }
}

pub fn ending_quality(text: &str, lexicon: &Lexicon) -> EndingQuality {
    let sentences = split_sentences(text);
    let Some(last) = sentences.last() else {
        return EndingQuality::default();
    };

    let has_reflection = lexicon.reflection_endings.iter().any(|kw| last.contains(kw));
    let has_future = lexicon.future_endings.iter().any(|kw| last.contains(kw));
    let ending_type = if has_reflection {
        EndingType::Reflection
    } else if has_future {
        EndingType::Future
    } else {
        EndingType::None
    };

    EndingQuality {
        ending_type,
        ending_length: last.chars().count(),
        has_reflection,
        has_future_orientation: has_future,
    }
}

fn count_occurrences(text: &str, words: &[&str]) -> usize {
    words.iter().map(|word| text.matches(word).count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (Lexicon, AnalysisConfig) {
        (Lexicon::default(), AnalysisConfig::default())
    }

    #[test]
    fn empty_text_yields_all_zero_metrics() {
        let (lexicon, config) = defaults();
        let indicators = extract_indicators("   \n\n ", &lexicon, &config);
        assert_eq!(indicators.sentence_structure.count, 0);
        assert_eq!(indicators.vocabulary_diversity.total_words, 0);
        assert_eq!(indicators.paragraph_structure.count, 0);
        assert_eq!(indicators.expressiveness.total(), 0);
        assert_eq!(indicators.ending_quality.ending_type, EndingType::None);
    }

    #[test]
    fn counts_long_and_short_sentences() {
        let (_, config) = defaults();
        let text = "짧다. 이 문장은 오십 글자를 넘기기 위해서 계속해서 이어지고 또 이어지는 아주 길고 긴 문장입니다.";
        let metrics = sentence_structure(text, &config);
        assert_eq!(metrics.count, 2);
        assert_eq!(metrics.short_sentences, 1);
        assert_eq!(metrics.long_sentences, 1);
    }

    #[test]
    fn diversity_ratio_counts_unique_tokens() {
        let (_, config) = defaults();
        let metrics = vocabulary_diversity("하늘 하늘 바다 구름", &config);
        assert_eq!(metrics.total_words, 4);
        assert_eq!(metrics.unique_words, 3);
        assert!((metrics.diversity_ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn tokenizer_strips_punctuation_but_keeps_hangul() {
        let tokens = tokenize("바다를 보았다! (정말) 'Sea'...");
        assert_eq!(tokens, vec!["바다를", "보았다", "정말", "sea"]);
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "첫 문단입니다. 두 문장이 있어요.\n\n둘째 문단은 한 문장뿐이다.";
        let metrics = paragraph_structure(text);
        assert_eq!(metrics.count, 2);
        assert_eq!(metrics.single_sentence_paragraphs, 1);
    }

    #[test]
    fn expressiveness_counts_word_lists() {
        let (lexicon, _) = defaults();
        let text = "마치 꿈을 꾸는 것처럼 행복했다. 따뜻한 바람이 불었다.";
        let metrics = expressiveness(text, &lexicon);
        assert_eq!(metrics.figurative_expressions, 2);
        assert_eq!(metrics.emotional_words, 1);
        assert_eq!(metrics.descriptive_words, 1);
    }

    #[test]
    fn ending_classifies_reflection_over_future() {
        let (lexicon, _) = defaults();
        let reflection = ending_quality("바다에 갔다. 많은 것을 느꼈다.", &lexicon);
        assert_eq!(reflection.ending_type, EndingType::Reflection);
        assert!(reflection.has_reflection);

        let future = ending_quality("바다에 갔다. 앞으로 자주 와야지.", &lexicon);
        assert_eq!(future.ending_type, EndingType::Future);
        assert!(future.has_future_orientation);

        let plain = ending_quality("바다에 갔다. 그리고 돌아왔다.", &lexicon);
        assert_eq!(plain.ending_type, EndingType::None);
    }
}
