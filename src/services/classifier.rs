use async_trait::async_trait;

use crate::domain::classification::ClassificationSuggestion;
use crate::error::AppResult;

#[async_trait]
pub trait ClassificationService: Send + Sync {
    async fn classify(&self, description: &str) -> AppResult<ClassificationSuggestion>;
}
