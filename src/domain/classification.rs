use crate::domain::ticket::{Category, Priority, TicketDraft};

/// Advisory values for the draft's selectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationSuggestion {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl ClassificationSuggestion {
    /// Overwrites whichever selectors the suggestion carries, including ones
    /// the user already picked.
    pub fn apply_to(&self, draft: &mut TicketDraft) {
        if let Some(category) = self.category {
            draft.category = Some(category);
        }
        if let Some(priority) = self.priority {
            draft.priority = Some(priority);
        }
    }
}
