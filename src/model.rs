//! # Oracle Client Module
//!
//! Wraps a completion model behind a rate limiter so extraction, link
//! ranking, and summarization share one API quota. The pipeline is generic
//! over `rig`'s `CompletionModel`, so tests swap in a scripted mock instead
//! of a live provider.

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use ratelimited_completion::RateLimitedCompletionModel;
use rig::{completion::CompletionModel, providers::openai};

pub mod mock_model;
pub mod ratelimited_completion;

/// Default model used for extraction and ranking
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct Client<C>
where
    C: CompletionModel,
{
    completion_model: C,
}

pub struct RateLimitResponse<T> {
    #[allow(dead_code)]
    response: T,
}

impl Client<RateLimitedCompletionModel<openai::completion::CompletionModel>> {
    pub fn new_openai_from_env() -> Self {
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .expect("OPENAI_API_KEY environment variable must be set");
        let openai_client = openai::Client::new(&openai_api_key);
        Self::new_openai(openai_client)
    }

    pub fn new_openai(openai_client: openai::Client) -> Self {
        let completion_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(500).expect("must create rate limit"),
        ));
        let completion_model = RateLimitedCompletionModel::new(
            openai_client.completion_model(DEFAULT_COMPLETION_MODEL),
            completion_limiter,
        );
        Self { completion_model }
    }
}

impl<C> Client<C>
where
    C: CompletionModel,
{
    pub fn new(completion_model: C) -> Self {
        Self { completion_model }
    }

    pub fn completion(&self) -> &C {
        &self.completion_model
    }
}
