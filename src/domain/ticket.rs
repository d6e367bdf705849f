use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 200;
const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    Technical,
    Account,
    General,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Technical => "technical",
            Category::Account => "account",
            Category::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Billing => "Billing",
            Category::Technical => "Technical",
            Category::Account => "Account",
            Category::General => "General",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "billing" => Some(Category::Billing),
            "technical" => Some(Category::Technical),
            "account" => Some(Category::Account),
            "general" => Some(Category::General),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "critical" => Some(Priority::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "open" => Some(Status::Open),
            "in_progress" => Some(Status::InProgress),
            "resolved" => Some(Status::Resolved),
            "closed" => Some(Status::Closed),
            _ => None,
        }
    }
}

/// A ticket as acknowledged by the server. Only `status` ever changes, and
/// only through a server round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn excerpt(&self) -> String {
        if self.description.chars().count() > EXCERPT_CHARS {
            let head: String = self.description.chars().take(EXCERPT_CHARS).collect();
            format!("{head}...")
        } else {
            self.description.clone()
        }
    }
}

/// Editable form fields. Selectors start empty until the user or the
/// classifier picks a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl TicketDraft {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.title.trim().is_empty() {
            errors.insert(Field::Title, "Title is required");
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.insert(Field::Title, "Title must be under 200 characters");
        }
        if self.description.trim().is_empty() {
            errors.insert(Field::Description, "Description is required");
        }
        if self.category.is_none() {
            errors.insert(Field::Category, "Category is required");
        }
        if self.priority.is_none() {
            errors.insert(Field::Priority, "Priority is required");
        }

        errors
    }

    /// Builds the creation payload, or the field errors that block it.
    pub fn to_new_ticket(&self) -> Result<NewTicket, FieldErrors> {
        let errors = self.validate();
        match (self.category, self.priority) {
            (Some(category), Some(priority)) if errors.is_empty() => Ok(NewTicket {
                title: self.title.clone(),
                description: self.description.clone(),
                category,
                priority,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    Category,
    Priority,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Category => "category",
            Field::Priority => "priority",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .iter()
            .map(|(field, message)| format!("{}: {message}", field.as_str()))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> TicketDraft {
        TicketDraft {
            title: "Cannot log in".to_string(),
            description: "Password reset link expired".to_string(),
            category: Some(Category::Technical),
            priority: Some(Priority::High),
        }
    }

    #[test]
    fn blank_title_is_the_only_error() {
        let draft = TicketDraft {
            title: String::new(),
            description: "x".to_string(),
            category: Some(Category::Billing),
            priority: Some(Priority::Low),
        };
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let errors = TicketDraft::default().validate();
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(
            errors.get(Field::Description),
            Some("Description is required")
        );
        assert_eq!(errors.get(Field::Category), Some("Category is required"));
        assert_eq!(errors.get(Field::Priority), Some("Priority is required"));
    }

    #[test]
    fn title_length_is_counted_in_characters() {
        let mut draft = complete_draft();
        draft.title = "é".repeat(TITLE_MAX_CHARS);
        assert!(draft.validate().is_empty());

        draft.title.push('é');
        assert_eq!(
            draft.validate().get(Field::Title),
            Some("Title must be under 200 characters")
        );
    }

    #[test]
    fn whitespace_description_is_missing() {
        let mut draft = complete_draft();
        draft.description = "   \n".to_string();
        assert!(draft.to_new_ticket().is_err());
    }

    #[test]
    fn valid_draft_builds_payload() {
        let payload = complete_draft().to_new_ticket().expect("valid draft");
        assert_eq!(payload.category, Category::Technical);
        let json = serde_json::to_value(&payload).expect("serializable");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["category"], "technical");
    }

    #[test]
    fn parses_enumerations_at_the_boundary() {
        assert_eq!(Category::from_str(" Billing "), Some(Category::Billing));
        assert_eq!(Category::from_str("refunds"), None);
        assert_eq!(Priority::from_str("CRITICAL"), Some(Priority::Critical));
        assert_eq!(Status::from_str("in-progress"), Some(Status::InProgress));
        assert_eq!(Status::from_str("reopened"), None);
    }

    #[test]
    fn rejects_unknown_wire_values() {
        let json = r#"{"id":1,"title":"t","description":"d","category":"sales",
            "priority":"low","status":"open","created_at":"2024-05-01T10:00:00Z"}"#;
        assert!(serde_json::from_str::<Ticket>(json).is_err());
    }

    #[test]
    fn excerpt_truncates_long_descriptions() {
        let ticket = Ticket {
            id: 7,
            title: "t".to_string(),
            description: "a".repeat(120),
            category: Category::General,
            priority: Priority::Low,
            status: Status::Open,
            created_at: Utc::now(),
        };
        let excerpt = ticket.excerpt();
        assert_eq!(excerpt.len(), 103);
        assert!(excerpt.ends_with("..."));
    }
}
