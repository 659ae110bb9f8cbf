//! Quote types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored quotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Quote creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub text: String,
    pub author: String,
}

/// Partial quote update, absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Quote obtained from a third-party source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalQuote {
    pub text: String,
    pub author: String,
    pub source: String,
}

/// Response body for a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
    pub id: i64,
}

impl DeleteConfirmation {
    pub fn new(id: i64) -> Self {
        Self {
            message: "Quote deleted".to_string(),
            id,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Blank(&'static str),
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}

impl NewQuote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// Both fields must contain something other than whitespace
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("text", &self.text)?;
        require_text("author", &self.author)
    }
}

impl QuoteUpdate {
    /// True when the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.author.is_none()
    }

    /// A supplied field may not be blank; omitted fields are fine
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref text) = self.text {
            require_text("text", text)?;
        }
        if let Some(ref author) = self.author {
            require_text("author", author)?;
        }
        Ok(())
    }

    /// Apply onto an existing quote, returning the merged record
    pub fn apply(&self, quote: &Quote) -> Quote {
        Quote {
            id: quote.id,
            text: self.text.clone().unwrap_or_else(|| quote.text.clone()),
            author: self.author.clone().unwrap_or_else(|| quote.author.clone()),
            created_at: quote.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Quote {
        Quote {
            id: 7,
            text: "Stay hungry".to_string(),
            author: "Steve Jobs".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_quote_validation() {
        assert!(NewQuote::new("A", "B").validate().is_ok());
        assert_eq!(
            NewQuote::new("  ", "B").validate(),
            Err(ValidationError::Blank("text"))
        );
        assert_eq!(
            NewQuote::new("A", "").validate(),
            Err(ValidationError::Blank("author"))
        );
    }

    #[test]
    fn test_update_validation() {
        assert!(QuoteUpdate::default().validate().is_ok());
        assert!(QuoteUpdate::default().is_empty());

        let blank = QuoteUpdate {
            text: None,
            author: Some("\t".to_string()),
        };
        assert_eq!(blank.validate(), Err(ValidationError::Blank("author")));
        assert!(!blank.is_empty());
    }

    #[test]
    fn test_update_apply_keeps_absent_fields() {
        let quote = sample();

        let only_text = QuoteUpdate {
            text: Some("Stay foolish".to_string()),
            author: None,
        };
        let merged = only_text.apply(&quote);
        assert_eq!(merged.text, "Stay foolish");
        assert_eq!(merged.author, "Steve Jobs");
        assert_eq!(merged.id, quote.id);
        assert_eq!(merged.created_at, quote.created_at);

        let only_author = QuoteUpdate {
            text: None,
            author: Some("Anonymous".to_string()),
        };
        let merged = only_author.apply(&quote);
        assert_eq!(merged.text, "Stay hungry");
        assert_eq!(merged.author, "Anonymous");
    }

    #[test]
    fn test_update_deserializes_partial_body() {
        let update: QuoteUpdate = serde_json::from_str(r#"{"author":"Seneca"}"#).unwrap();
        assert_eq!(update.text, None);
        assert_eq!(update.author.as_deref(), Some("Seneca"));

        let empty: QuoteUpdate = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_quote_serializes_all_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["text"], "Stay hungry");
        assert_eq!(value["author"], "Steve Jobs");
        assert!(value["created_at"].is_string());
    }
}
