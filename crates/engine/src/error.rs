use analytics::AnalyticsError;
use core_types::LotId;
use providers::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: LotId },

    #[error("Business rule violated: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl EngineError {
    /// The HTTP status class a request handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::NotFound { .. } => 404,
            EngineError::Analytics(_) => 422,
            EngineError::Provider(_) => 500,
        }
    }
}
