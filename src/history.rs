use serde::{Deserialize, Serialize};

/// Summary of one finished episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// 1-based episode number
    pub episode: u32,
    /// Sum of rewards over the episode
    pub reward: f32,
    pub steps: u64,
}

/// Append-only log of finished episodes, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeHistory {
    records: Vec<EpisodeRecord>,
}

impl EpisodeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EpisodeRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn last(&self) -> Option<&EpisodeRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    /// The most recent `n` records, or all of them if there are fewer
    pub fn recent(&self, n: usize) -> &[EpisodeRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }
}

impl<'a> IntoIterator for &'a EpisodeHistory {
    type Item = &'a EpisodeRecord;
    type IntoIter = std::slice::Iter<'a, EpisodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
