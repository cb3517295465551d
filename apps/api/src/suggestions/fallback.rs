use rand::seq::SliceRandom;
use rand::Rng;

use crate::suggestions::parser::exclusion_key;

/// Curated questions used when the model yields too few unique suggestions.
pub const FALLBACK_POOL: &[&str] = &[
    "What's a small habit that improved your day-to-day life?",
    "If you could master any musical instrument overnight, which would it be and why?",
    "What's a movie you can watch over and over without getting bored?",
    "What's a food combo you love that others find odd?",
    "If time and money weren't an issue, what project would you start tomorrow?",
    "What's a book that genuinely changed how you think?",
    "What's a simple pleasure you look forward to each week?",
    "What's something you learned recently that surprised you?",
    "If you could instantly speak another language, which would you choose and why?",
    "What's a skill you think everyone should learn at least once?",
    "What's a childhood snack you secretly still crave?",
    "What's your favorite way to unwind after a long day?",
    "Which fictional world would you live in for a week?",
    "What's a goal you're excited about this year?",
    "What's a song lyric that sticks with you?",
    "What's an unpopular opinion you stand by (lighthearted)?",
    "If you could relive one day just for the joy of it, which day would you pick?",
    "What's your go-to conversation starter?",
    "What's a random fact you think more people should know?",
    "What's a small act of kindness you won't forget?",
    "If you had to teach a 10\u{2011}minute class on anything, what would it be?",
    "What's your current comfort show or podcast?",
    "What's a trend you secretly miss?",
    "What's a place that surprised you\u{2014}in a good way?",
    "What's a life tip you wish more people knew?",
    "What's your favorite way to get creative?",
    "What's the best advice you've actually used?",
    "What hobby would you pick up if you had an extra hour every day?",
    "What's a tiny change that had a big impact?",
    "What's something you wish more people asked you about?",
];

/// Appends shuffled pool entries until `suggestions` holds `count` items,
/// skipping anything already present or excluded.
pub fn top_up<R: Rng + ?Sized>(
    suggestions: &mut Vec<String>,
    count: usize,
    exclude: &[String],
    rng: &mut R,
) {
    if suggestions.len() >= count {
        return;
    }

    let mut remaining: Vec<&str> = FALLBACK_POOL
        .iter()
        .copied()
        .filter(|q| {
            let key = exclusion_key(q);
            !exclude.iter().any(|e| exclusion_key(e) == key)
                && !suggestions.iter().any(|s| exclusion_key(s) == key)
        })
        .collect();
    remaining.shuffle(rng);

    let missing = count - suggestions.len();
    suggestions.extend(remaining.into_iter().take(missing).map(str::to_string));
}
