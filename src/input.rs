use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::WritingEntry;

// One line of the history file: the entry plus whatever raw feedback payload
// the generation layer attached to it. The payload is kept opaque here; the
// normalizer owns its interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(flatten)]
    pub entry: WritingEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
        };
        f.write_str(name)
    }
}

pub fn cutoff_date(period: Period) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(period.days())
}

pub fn load_history(path: &Path) -> anyhow::Result<Vec<HistoryRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    let mut records: Vec<HistoryRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse history file {}", path.display()))?;
    records.sort_by(|a, b| a.entry.date.cmp(&b.entry.date));
    Ok(records)
}

pub fn filter_window(records: Vec<HistoryRecord>, cutoff: NaiveDate) -> Vec<HistoryRecord> {
    records
        .into_iter()
        .filter(|record| record.entry.date >= cutoff)
        .collect()
}

pub fn split_records(records: Vec<HistoryRecord>) -> (Vec<WritingEntry>, Vec<Option<Value>>) {
    records
        .into_iter()
        .map(|record| (record.entry, record.feedback))
        .unzip()
}

// CSV rows carry entries only; feedback payloads arrive via the JSON path.
pub fn import_csv(csv_path: &Path) -> anyhow::Result<Vec<HistoryRecord>> {
    #[derive(Deserialize)]
    struct CsvRow {
        id: Option<Uuid>,
        date: NaiveDate,
        title: String,
        score: f64,
        text: String,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open CSV file {}", csv_path.display()))?;
    let mut records = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result.context("failed to parse CSV row")?;
        records.push(HistoryRecord {
            entry: WritingEntry {
                id: row.id.unwrap_or_else(Uuid::new_v4),
                date: row.date,
                title: row.title,
                score: row.score,
                text: row.text,
                criteria: Default::default(),
            },
            feedback: None,
        });
    }

    records.sort_by(|a, b| a.entry.date.cmp(&b.entry.date));
    Ok(records)
}

pub fn write_history(path: &Path, records: &[HistoryRecord]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write history file {}", path.display()))?;
    Ok(())
}

// Realistic three-entry history exercising both feedback payload shapes the
// normalizer accepts: a structured object and a JSON-encoded string.
pub fn sample_history() -> anyhow::Result<Vec<HistoryRecord>> {
    let today = Utc::now().date_naive();

    let first = HistoryRecord {
        entry: WritingEntry {
            id: Uuid::parse_str("7b1f4c92-5a3e-4d8b-9c6f-1e2a3b4c5d6e")?,
            date: today - Duration::days(14),
            title: "비 오는 날".to_string(),
            score: 62.0,
            text: "오늘은 하루 종일 비가 왔다. 우산을 들고 학교에 갔다. 집에 와서 창밖을 보았다."
                .to_string(),
            criteria: [("구성".to_string(), 58.0), ("표현".to_string(), 64.0)]
                .into_iter()
                .collect(),
        },
        feedback: Some(json!({
            "strengths": ["하루의 장면을 차분하게 담았어요"],
            "improvements": [
                "문단을 나눠서 글의 구조를 잡아 보세요",
                "'갔다' 대신 '빗소리를 들으며 걸어갔다'처럼 묘사를 더해 보세요"
            ],
            "writingTips": "마지막 문장에서 느낀 점을 정리해 보세요",
            "criteriaScores": {
                "구성": { "score": 58, "feedback": "한 덩어리로 이어져 있어요" },
                "표현": { "score": 64, "feedback": "담백하지만 단조로워요" }
            }
        })),
    };

    let second = HistoryRecord {
        entry: WritingEntry {
            id: Uuid::parse_str("2c8d5e31-9f4a-4b7c-8d2e-3f4a5b6c7d8e")?,
            date: today - Duration::days(7),
            title: "다시 갠 하늘".to_string(),
            score: 74.0,
            text: "먼저 아침의 하늘을 올려다보았다. 구름이 마치 솜사탕처럼 부풀어 있었다.\n\n마지막으로 집에 돌아오는 길, 나는 비 온 뒤의 하늘이 더 좋다는 것을 느꼈다."
                .to_string(),
            criteria: [("구성".to_string(), 72.0), ("표현".to_string(), 78.0)]
                .into_iter()
                .collect(),
        },
        feedback: Some(Value::String(
            json!({
                "strengths": ["비유 표현이 생생해요"],
                "improvements": ["구체적인 경험을 예시로 더 담아 보세요"],
                "writingTips": "앞으로 쓰고 싶은 글감을 메모해 보세요"
            })
            .to_string(),
        )),
    };

    let third = HistoryRecord {
        entry: WritingEntry {
            id: Uuid::parse_str("9e3f6a72-1b5c-4d9e-a3f4-5b6c7d8e9f0a")?,
            date: today - Duration::days(2),
            title: "도서관에서".to_string(),
            score: 78.0,
            text: "예를 들어 오늘 같은 날이 그렇다. 도서관의 고요한 공기가 좋았다.\n\n앞으로 매주 한 번은 도서관에 와야겠다고 다짐했다."
                .to_string(),
            criteria: [("구성".to_string(), 76.0), ("표현".to_string(), 80.0)]
                .into_iter()
                .collect(),
        },
        feedback: None,
    };

    Ok(vec![first, second, third])
}
