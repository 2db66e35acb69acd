//! Local Q&A lookup table

use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// A fuzzy match must score at least this much to count
const MATCH_CUTOFF: f64 = 0.7;

/// One question/answer pair
#[derive(Debug, Clone, Deserialize)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
}

/// Q&A pairs with exact-then-fuzzy lookup
///
/// Questions are matched case-insensitively; a near-miss within the
/// similarity cutoff still hits, so "library hour" finds "library hours".
#[derive(Debug, Clone, Default)]
pub struct QaTable {
    entries: Vec<QaEntry>,
}

impl QaTable {
    /// Load the table from a JSON file (`[{"question", "answer"}, ..]`)
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<QaEntry> = serde_json::from_str(&content)?;

        tracing::info!(
            path = %path.as_ref().display(),
            entries = entries.len(),
            "Q&A table loaded"
        );
        Ok(Self::from_entries(entries))
    }

    /// Build a table from entries, lowercasing the questions
    #[must_use]
    pub fn from_entries(entries: Vec<QaEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| QaEntry {
                question: e.question.to_lowercase(),
                answer: e.answer,
            })
            .collect();
        Self { entries }
    }

    /// Find the answer for a query, exact match first, then best fuzzy
    /// match at or above the cutoff
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();

        if let Some(entry) = self.entries.iter().find(|e| e.question == query) {
            return Some(&entry.answer);
        }

        self.entries
            .iter()
            .map(|e| (similarity(&query, &e.question), e))
            .filter(|(score, _)| *score >= MATCH_CUTOFF)
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, e)| e.answer.as_str())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Dice coefficient over character bigrams, in 0.0..=1.0
///
/// Identical strings score 1.0; strings too short for bigrams fall back
/// to equality.
fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let bigrams_a = bigrams(a);
    let mut bigrams_b = bigrams(b);
    if bigrams_a.is_empty() || bigrams_b.is_empty() {
        return 0.0;
    }

    let total = bigrams_a.len() + bigrams_b.len();
    let mut shared = 0usize;
    for bigram in &bigrams_a {
        if let Some(pos) = bigrams_b.iter().position(|other| other == bigram) {
            bigrams_b.swap_remove(pos);
            shared += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let score = (2 * shared) as f64 / total as f64;
    score
}

fn bigrams(s: &str) -> Vec<[char; 2]> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|w| [w[0], w[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> QaTable {
        QaTable::from_entries(vec![
            QaEntry {
                question: "What are the library hours?".to_string(),
                answer: "9am to 8pm on weekdays.".to_string(),
            },
            QaEntry {
                question: "Where is the admissions office?".to_string(),
                answer: "Block A, ground floor.".to_string(),
            },
        ])
    }

    #[test]
    fn test_exact_lookup_is_case_insensitive() {
        let table = table();
        assert_eq!(
            table.lookup("WHAT ARE THE LIBRARY HOURS?"),
            Some("9am to 8pm on weekdays.")
        );
    }

    #[test]
    fn test_fuzzy_lookup_above_cutoff() {
        let table = table();
        // Missing word and punctuation, still close enough
        assert_eq!(
            table.lookup("what are the library hours"),
            Some("9am to 8pm on weekdays.")
        );
    }

    #[test]
    fn test_miss_below_cutoff() {
        let table = table();
        assert_eq!(table.lookup("how do I apply for a hostel room?"), None);
    }

    #[test]
    fn test_similarity_bounds() {
        assert!((similarity("night", "night") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("night", "nacht") - 0.25).abs() < 1e-9);
        assert!(similarity("a", "b") < f64::EPSILON);
    }

    #[test]
    fn test_empty_table() {
        let table = QaTable::default();
        assert!(table.is_empty());
        assert_eq!(table.lookup("anything"), None);
    }
}
