use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::config::{validate, Config, ConfigError};
use crate::contract::SearchHandoff;
use crate::controller::SearchController;
use crate::gateway::{GatewayError, HttpSearchGateway, SearchGateway};
use crate::model::SearchResultPayload;
use crate::query::{should_suggest, submittable_term};
use crate::results_view::ResultsView;
use crate::suggestions::suggest;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("search term is empty")]
    EmptyTerm,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Binds the configured suggestion pool to a search gateway.
#[derive(Clone)]
pub struct SearchService {
    config: Config,
    gateway: Arc<dyn SearchGateway>,
}

impl SearchService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        validate(&config)?;
        let gateway = HttpSearchGateway::new(config.api_url()?, config.request_timeout())?;
        info!("search service targeting {}", config.api_base_url);
        Ok(Self {
            config,
            gateway: Arc::new(gateway),
        })
    }

    pub fn with_gateway(
        config: Config,
        gateway: impl SearchGateway + 'static,
    ) -> Result<Self, ServiceError> {
        validate(&config)?;
        Ok(Self {
            config,
            gateway: Arc::new(gateway),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn popular_terms(&self) -> &[String] {
        &self.config.popular_terms
    }

    pub fn suggest(&self, query: &str) -> Vec<String> {
        if !should_suggest(query) {
            return Vec::new();
        }
        suggest(query, &self.config.popular_terms, self.config.suggestion_limit)
    }

    /// Blank terms are rejected before any request is made.
    pub fn search(&self, term: &str) -> Result<SearchResultPayload, ServiceError> {
        let term = submittable_term(term).ok_or(ServiceError::EmptyTerm)?;
        Ok(self.gateway.search(term)?)
    }

    pub fn controller(&self) -> SearchController {
        SearchController::new(
            self.config.popular_terms.clone(),
            self.config.suggestion_limit,
        )
    }

    pub fn results_view(&self, handoff: Option<SearchHandoff>) -> ResultsView {
        ResultsView::from_navigation(handoff, self.config.popular_terms.clone())
    }
}
