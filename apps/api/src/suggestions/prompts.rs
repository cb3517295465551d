use crate::suggestions::service::SuggestionRequest;

/// Builds the question-generation prompt. `seed` is embedded verbatim so that
/// repeated calls with the same exclusions still sample different questions.
pub fn build_prompt(request: &SuggestionRequest, seed: u64) -> String {
    let mut prompt = format!(
        "You are generating fresh, diverse, open-ended questions for a friendly anonymous social messaging app.\n\
         \n\
         Requirements:\n\
         - Return exactly {count} questions.\n\
         - MUST be formatted as a SINGLE line string using '||' as the ONLY separator. No numbering, no dashes, no quotes.\n\
         - Keep them inclusive, non-sensitive, and suitable for a wide audience.\n\
         - Vary topics (e.g., hobbies, memories, creativity, travel, daily life, light introspection). Aim for diversity across the set.\n\
         - Avoid repeating questions from the Exclude list, and avoid closely paraphrasing them.\n",
        count = request.count,
    );

    if let Some(topic) = &request.topic {
        prompt.push_str(&format!("- Prefer a subtle theme around: {topic}.\n"));
    }
    if let Some(tone) = &request.tone {
        prompt.push_str(&format!("- Suggested tone: {tone}.\n"));
    }
    if let Some(language) = &request.language {
        prompt.push_str(&format!("- Language: {language}.\n"));
    }

    let exclude = if request.exclude.is_empty() {
        "(none)".to_string()
    } else {
        request.exclude.join(" | ")
    };

    prompt.push_str(&format!(
        "\nExclude (do not use or closely paraphrase): {exclude}\n\
         \n\
         Randomization key: {seed}\n\
         \n\
         Example format (do NOT copy these, just follow the format): \
         What's a hobby you've recently started?||If you could have dinner with any historical figure, who would it be?||What's a simple thing that makes you happy?"
    ));

    prompt
}
