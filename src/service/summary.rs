//! Aggregates behind the session pie chart and the admin charts.

use crate::db::HistoryRecord;
use crate::types::Label;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub total: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Negative => self.negative += 1,
        }
        self.total += 1;
    }
}

impl FromIterator<Label> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut counts = Self::default();
        for label in iter {
            counts.add(label);
        }
        counts
    }
}

/// Label counts for one timestamp (bar chart input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub timestamp: String,
    pub counts: SentimentCounts,
}

/// Full-log view for admins: the rows themselves plus chart aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryOverview {
    pub records: Vec<HistoryRecord>,
    pub distribution: SentimentCounts,
    pub timeline: Vec<TimelinePoint>,
}

impl HistoryOverview {
    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        let distribution = records.iter().map(|r| r.prediction).collect();
        let mut by_time: BTreeMap<&str, SentimentCounts> = BTreeMap::new();
        for r in &records {
            by_time.entry(r.timestamp.as_str()).or_default().add(r.prediction);
        }
        let timeline = by_time
            .into_iter()
            .map(|(timestamp, counts)| TimelinePoint {
                timestamp: timestamp.to_string(),
                counts,
            })
            .collect();
        Self {
            records,
            distribution,
            timeline,
        }
    }
}
