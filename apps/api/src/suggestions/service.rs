//! Suggestion generation: one model call, at most one retry with a fresh
//! seed, then a top-up from the fallback pool.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::llm_client::TextGenerator;
use crate::suggestions::fallback::top_up;
use crate::suggestions::parser::{
    dedup_case_insensitive, filter_excluded, parse_suggestions, split_candidates,
};
use crate::suggestions::prompts::build_prompt;

pub const DEFAULT_COUNT: usize = 3;
pub const MAX_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    /// Always within `1..=MAX_COUNT`.
    pub count: usize,
    pub exclude: Vec<String>,
    pub topic: Option<String>,
    pub tone: Option<String>,
    pub language: Option<String>,
}

impl Default for SuggestionRequest {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            exclude: Vec::new(),
            topic: None,
            tone: None,
            language: None,
        }
    }
}

pub fn clamp_count(requested: Option<i64>) -> usize {
    requested
        .unwrap_or(DEFAULT_COUNT as i64)
        .clamp(1, MAX_COUNT as i64) as usize
}

/// Produces up to `request.count` unique, non-excluded questions.
///
/// A missing generator or a failed call is treated as an empty response, so
/// the result degrades to the fallback pool instead of failing. The list is
/// shorter than requested only when the pool itself runs out.
pub async fn generate_suggestions(
    generator: Option<&dyn TextGenerator>,
    request: &SuggestionRequest,
) -> Vec<String> {
    let mut suggestions = match generator {
        Some(generator) => {
            let text = call_model(generator, request).await;
            let mut suggestions = parse_suggestions(&text, &request.exclude);

            if suggestions.len() < request.count {
                debug!(
                    "Only {} of {} suggestions usable, retrying once",
                    suggestions.len(),
                    request.count
                );
                let text = call_model(generator, request).await;
                suggestions.extend(split_candidates(&text));
                suggestions = filter_excluded(dedup_case_insensitive(suggestions), &request.exclude);
            }
            suggestions
        }
        None => {
            warn!("No AI provider configured; serving suggestions from the fallback pool");
            Vec::new()
        }
    };

    if suggestions.len() < request.count {
        info!(
            "Topping up {} suggestion(s) from the fallback pool",
            request.count - suggestions.len()
        );
        top_up(
            &mut suggestions,
            request.count,
            &request.exclude,
            &mut rand::rng(),
        );
    }

    suggestions.truncate(request.count);
    suggestions
}

async fn call_model(generator: &dyn TextGenerator, request: &SuggestionRequest) -> String {
    let seed = rand::rng().random_range(0..1_000_000_000u64);
    let prompt = build_prompt(request, seed);

    match generator.generate_text(&prompt).await {
        Ok(text) => {
            debug!("Generated text: {text}");
            text
        }
        Err(e) => {
            warn!("Suggestion model call failed: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::LlmError;
    use crate::suggestions::fallback::FALLBACK_POOL;

    fn request(count: usize, exclude: &[&str]) -> SuggestionRequest {
        SuggestionRequest {
            count,
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            ..SuggestionRequest::default()
        }
    }

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(clamp_count(None), 3);
        assert_eq!(clamp_count(Some(0)), 1);
        assert_eq!(clamp_count(Some(-5)), 1);
        assert_eq!(clamp_count(Some(7)), 7);
        assert_eq!(clamp_count(Some(50)), 10);
    }

    #[tokio::test]
    async fn test_enough_items_means_single_call() {
        let generator = ScriptedGenerator::texts(&["One?||Two?||Three?||Four?"]);
        let result = generate_suggestions(Some(&generator), &request(3, &[])).await;

        assert_eq!(result, vec!["One?", "Two?", "Three?"]);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_result_retries_once_and_merges() {
        let generator = ScriptedGenerator::texts(&["One?||one?", "Two?||ONE?||Three?"]);
        let result = generate_suggestions(Some(&generator), &request(3, &[])).await;

        assert_eq!(result, vec!["One?", "Two?", "Three?"]);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_uses_a_new_seed() {
        let generator = ScriptedGenerator::texts(&["", ""]);
        generate_suggestions(Some(&generator), &request(2, &[])).await;

        let prompts = generator.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 2);
        let key = |p: &str| p.lines().find(|l| l.starts_with("Randomization key")).map(str::to_string);
        assert!(key(&prompts[0]).is_some());
        assert_ne!(key(&prompts[0]), key(&prompts[1]));
    }

    #[tokio::test]
    async fn test_never_more_than_one_retry() {
        let generator = ScriptedGenerator::texts(&["Only?", "Only?", "Extra?", "More?"]);
        let result = generate_suggestions(Some(&generator), &request(5, &[])).await;

        assert_eq!(generator.calls(), 2);
        assert_eq!(result.len(), 5);
        assert_eq!(result[0], "Only?");
    }

    #[tokio::test]
    async fn test_zero_usable_items_draws_from_pool() {
        let generator = ScriptedGenerator::texts(&["Banned?", "  "]);
        let result = generate_suggestions(Some(&generator), &request(10, &["banned?"])).await;

        assert_eq!(result.len(), 10);
        assert!(result.iter().all(|s| FALLBACK_POOL.contains(&s.as_str())));
    }

    #[tokio::test]
    async fn test_failed_calls_degrade_to_pool() {
        let generator = ScriptedGenerator::new(vec![
            Err(LlmError::EmptyContent),
            Err(LlmError::Api {
                status: 500,
                message: "down".into(),
            }),
        ]);
        let result = generate_suggestions(Some(&generator), &request(4, &[])).await;

        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|s| FALLBACK_POOL.contains(&s.as_str())));
    }

    #[tokio::test]
    async fn test_no_generator_uses_pool() {
        let result = generate_suggestions(None, &request(1, &[])).await;
        assert_eq!(result.len(), 1);
        assert!(FALLBACK_POOL.contains(&result[0].as_str()));
    }
}
