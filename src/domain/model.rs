use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One observation of the box plot dataset: a platform and a like count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub group_key: String,
    pub value: f64,
}

impl Record {
    pub fn new(group_key: impl Into<String>, value: f64) -> Self {
        Self {
            group_key: group_key.into(),
            value,
        }
    }
}

/// Min, quartiles and max of one group's values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    pub fn constant(value: f64) -> Self {
        Self {
            min: value,
            q1: value,
            median: value,
            q3: value,
            max: value,
        }
    }
}

/// Summaries keyed by group, iterated in first-occurrence order of the keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSummaries {
    entries: Vec<(String, FiveNumberSummary)>,
    index: HashMap<String, usize>,
}

impl GroupedSummaries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group, or replaces the summary of an existing one in place.
    pub fn insert(&mut self, key: String, summary: FiveNumberSummary) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = summary,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, summary));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FiveNumberSummary> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FiveNumberSummary)> {
        self.entries.iter().map(|(key, summary)| (key.as_str(), summary))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest `max` over all groups, `None` when there are no groups.
    pub fn max_value(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|(_, summary)| summary.max)
            .reduce(f64::max)
    }
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    group: &'a str,
    #[serde(flatten)]
    summary: &'a FiveNumberSummary,
}

impl Serialize for GroupedSummaries {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.entries
                .iter()
                .map(|(group, summary)| SummaryRow { group, summary }),
        )
    }
}

/// One bar of the grouped bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageRecord {
    pub platform: String,
    pub post_type: String,
    pub avg_likes: f64,
}

/// One point of the line chart. Dates are kept as the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: String,
    pub avg_likes: f64,
}

/// Everything the extract stage hands to the transform stage.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub likes: Vec<Record>,
    pub averages: Vec<AverageRecord>,
    pub timeline: Vec<TimePoint>,
}

#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub name: String,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct RenderResult {
    pub summaries: GroupedSummaries,
    pub files: Vec<RenderedFile>,
}

impl RenderResult {
    pub fn file(&self, name: &str) -> Option<&RenderedFile> {
        self.files.iter().find(|file| file.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_summaries_keep_insertion_order() {
        let mut summaries = GroupedSummaries::new();
        summaries.insert("Twitter".to_string(), FiveNumberSummary::constant(3.0));
        summaries.insert("Facebook".to_string(), FiveNumberSummary::constant(9.0));
        summaries.insert("Twitter".to_string(), FiveNumberSummary::constant(4.0));

        assert_eq!(summaries.keys().collect::<Vec<_>>(), vec!["Twitter", "Facebook"]);
        assert_eq!(summaries.get("Twitter").map(|s| s.max), Some(4.0));
        assert_eq!(summaries.max_value(), Some(9.0));
        assert!(summaries.get("Instagram").is_none());
    }

    #[test]
    fn test_grouped_summaries_serialize_as_ordered_rows() {
        let mut summaries = GroupedSummaries::new();
        summaries.insert("B".to_string(), FiveNumberSummary::constant(2.0));
        summaries.insert("A".to_string(), FiveNumberSummary::constant(1.0));

        let json = serde_json::to_value(&summaries).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["group"], "B");
        assert_eq!(rows[0]["median"], 2.0);
        assert_eq!(rows[1]["group"], "A");
    }

    #[test]
    fn test_empty_summaries_have_no_max() {
        assert_eq!(GroupedSummaries::new().max_value(), None);
        assert!(GroupedSummaries::new().is_empty());
    }
}
