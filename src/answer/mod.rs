//! Query answering
//!
//! Answers come from a local Q&A lookup table first; anything the table
//! does not cover falls through to a cloud generative text model. A
//! failed remote call degrades to a fixed apology line so the assistant
//! always has something to say.

mod lookup;
mod textgen;

pub use lookup::{QaEntry, QaTable};
pub use textgen::TextGenClient;

/// Fixed reply when the generative fallback is unavailable or fails
const APOLOGY: &str = "Sorry, the language model failed to respond.";

/// Resolves a text query to a reply string
pub struct AnswerSource {
    table: QaTable,
    textgen: Option<TextGenClient>,
}

impl AnswerSource {
    /// Create an answer source
    #[must_use]
    pub fn new(table: QaTable, textgen: Option<TextGenClient>) -> Self {
        Self { table, textgen }
    }

    /// Answer a query
    ///
    /// Never fails: a table hit wins, then the generative fallback, then
    /// the apology line.
    pub async fn reply(&self, query: &str) -> String {
        if let Some(answer) = self.table.lookup(query) {
            tracing::debug!(query, "answered from lookup table");
            return answer.to_string();
        }

        match &self.textgen {
            Some(client) => match client.generate_reply(query).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!(error = %e, "generative fallback failed");
                    APOLOGY.to_string()
                }
            },
            None => {
                tracing::debug!(query, "no generative fallback configured");
                APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_hit_wins() {
        let table = QaTable::from_entries(vec![QaEntry {
            question: "What are the library hours?".to_string(),
            answer: "9am to 8pm on weekdays.".to_string(),
        }]);
        let source = AnswerSource::new(table, None);

        let reply = tokio_test::block_on(source.reply("what are the library hours?"));
        assert_eq!(reply, "9am to 8pm on weekdays.");
    }

    #[test]
    fn test_miss_without_fallback_apologizes() {
        let source = AnswerSource::new(QaTable::default(), None);

        let reply = tokio_test::block_on(source.reply("what is the meaning of life?"));
        assert_eq!(reply, APOLOGY);
    }
}
