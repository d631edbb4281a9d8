use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::models::{CriterionScore, FeedbackRecord};

// Raw feedback arrives either as structured JSON or as a JSON-encoded string,
// and any field may be missing or mistyped. Normalization never fails: a
// payload that cannot be salvaged becomes the empty record, and the owning
// entry is simply treated as feedback-less downstream.
pub fn normalize_feedback(entry_id: Uuid, raw: Option<&Value>) -> FeedbackRecord {
    let value = match raw {
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => parsed,
            Err(_) => return FeedbackRecord::empty(entry_id),
        },
        Some(other) => other.clone(),
        None => return FeedbackRecord::empty(entry_id),
    };

    if !value.is_object() {
        return FeedbackRecord::empty(entry_id);
    }

    FeedbackRecord {
        entry_id,
        strengths: string_list(value.get("strengths")),
        improvements: string_list(value.get("improvements")),
        writing_tips: flatten_tips(
            value.get("writingTips").or_else(|| value.get("writing_tips")),
        ),
        criteria_scores: criteria_scores(
            value
                .get("criteriaScores")
                .or_else(|| value.get("criteria_scores")),
        ),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items.iter().filter_map(coerce_string).collect()
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Tips are usually a single string, but some generator versions emit a keyed
// object; those flatten to "key: value" lines.
fn flatten_tips(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(key, v)| coerce_string(v).map(|text| format!("{key}: {text}")))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn criteria_scores(value: Option<&Value>) -> BTreeMap<String, CriterionScore> {
    let Some(Value::Object(map)) = value else {
        return BTreeMap::new();
    };

    map.iter()
        .map(|(category, entry)| {
            let score = entry
                .get("score")
                .map(number_or_zero)
                .unwrap_or(0.0);
            let feedback = entry
                .get("feedback")
                .and_then(coerce_string)
                .unwrap_or_default();
            (category.clone(), CriterionScore { score, feedback })
        })
        .collect()
}

fn number_or_zero(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_id() -> Uuid {
        Uuid::parse_str("8f9c2a4e-1b3d-4c5f-9a7e-2d6b8c0e4f1a").unwrap()
    }

    #[test]
    fn structured_payload_normalizes() {
        let raw = json!({
            "strengths": ["감정 표현이 솔직해요"],
            "improvements": ["문단을 나눠 보세요", "비유를 써 보세요"],
            "writingTips": "마지막 문장에서 느낀 점을 정리해 보세요",
            "criteriaScores": {
                "구성": { "score": 72, "feedback": "흐름이 좋아요" }
            }
        });

        let record = normalize_feedback(entry_id(), Some(&raw));
        assert_eq!(record.strengths.len(), 1);
        assert_eq!(record.improvements.len(), 2);
        assert!(!record.writing_tips.is_empty());
        assert_eq!(record.criteria_scores["구성"].score, 72.0);
        assert!(!record.is_empty());
    }

    #[test]
    fn string_payload_is_parsed() {
        let raw = Value::String(
            r#"{"strengths":["묘사가 생생해요"],"improvements":[],"writingTips":""}"#.to_string(),
        );
        let record = normalize_feedback(entry_id(), Some(&raw));
        assert_eq!(record.strengths, vec!["묘사가 생생해요".to_string()]);
    }

    #[test]
    fn malformed_string_degrades_to_empty() {
        let raw = Value::String("not json".to_string());
        let record = normalize_feedback(entry_id(), Some(&raw));
        assert!(record.is_empty());
    }

    #[test]
    fn missing_payload_is_empty() {
        let record = normalize_feedback(entry_id(), None);
        assert!(record.is_empty());
    }

    #[test]
    fn non_array_lists_become_empty() {
        let raw = json!({
            "strengths": "하나의 문자열",
            "improvements": { "first": "객체" },
            "writingTips": "계속 써 보세요"
        });
        let record = normalize_feedback(entry_id(), Some(&raw));
        assert!(record.strengths.is_empty());
        assert!(record.improvements.is_empty());
        assert_eq!(record.writing_tips, "계속 써 보세요");
    }

    #[test]
    fn keyed_tips_flatten_to_lines() {
        let raw = json!({
            "writingTips": { "도입": "질문으로 시작해 보세요", "결말": "여운을 남겨 보세요" }
        });
        let record = normalize_feedback(entry_id(), Some(&raw));
        assert_eq!(
            record.writing_tips,
            "결말: 여운을 남겨 보세요\n도입: 질문으로 시작해 보세요"
        );
    }

    #[test]
    fn scores_coerce_defensively() {
        let raw = json!({
            "criteriaScores": {
                "표현": { "score": "85", "feedback": "좋아요" },
                "구성": { "score": null },
                "내용": { "feedback": "보완이 필요해요" }
            }
        });
        let record = normalize_feedback(entry_id(), Some(&raw));
        assert_eq!(record.criteria_scores["표현"].score, 85.0);
        assert_eq!(record.criteria_scores["구성"].score, 0.0);
        assert_eq!(record.criteria_scores["내용"].score, 0.0);
    }
}
