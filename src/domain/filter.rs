use crate::domain::ticket::{Category, Priority, Status};

/// Independent list constraints, combined with AND. `None` and a blank search
/// impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub search: String,
}

impl FilterState {
    pub fn to_query(&self) -> TicketQuery {
        let mut params = Vec::new();
        if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.as_str().to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        TicketQuery { params }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    params: Vec<(&'static str, String)>,
}

impl TicketQuery {
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_are_unconstrained() {
        assert!(FilterState::default().to_query().is_unconstrained());

        let blank_search = FilterState {
            search: "   ".to_string(),
            ..FilterState::default()
        };
        assert!(blank_search.to_query().is_unconstrained());
    }

    #[test]
    fn query_contains_exactly_the_present_filters() {
        let categories = [None, Some(Category::Account)];
        let priorities = [None, Some(Priority::Medium)];
        let statuses = [None, Some(Status::InProgress)];
        let searches = ["", "login"];

        for category in categories {
            for priority in priorities {
                for status in statuses {
                    for search in searches {
                        let filters = FilterState {
                            category,
                            priority,
                            status,
                            search: search.to_string(),
                        };
                        let query = filters.to_query();
                        let expected = [
                            category.is_some(),
                            priority.is_some(),
                            status.is_some(),
                            !search.is_empty(),
                        ]
                        .iter()
                        .filter(|present| **present)
                        .count();

                        assert_eq!(query.params().len(), expected, "{filters:?}");
                        assert_eq!(query.get("category"), category.map(|c| c.as_str()));
                        assert_eq!(query.get("priority"), priority.map(|p| p.as_str()));
                        assert_eq!(query.get("status"), status.map(|s| s.as_str()));
                        assert_eq!(
                            query.get("search"),
                            (!search.is_empty()).then_some(search)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn search_text_is_trimmed() {
        let filters = FilterState {
            search: "  refund  ".to_string(),
            ..FilterState::default()
        };
        assert_eq!(filters.to_query().get("search"), Some("refund"));
    }
}
