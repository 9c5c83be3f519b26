// Polarity word lists shared by both scorer flavors.

/// Words carrying positive polarity, lowercase.
pub(crate) const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "awesome",
    "love",
    "loved",
    "like",
    "best",
    "better",
    "win",
    "winning",
    "happy",
    "glad",
    "nice",
    "cool",
    "fantastic",
    "wonderful",
    "perfect",
    "strong",
    "success",
    "successful",
    "gain",
    "gains",
    "up",
    "bullish",
    "moon",
    "rally",
    "surge",
    "beat",
    "improved",
    "improvement",
    "positive",
    "profit",
    "hope",
    "helpful",
    "thanks",
    "thank",
    "recommend",
    "solid",
];

/// Words carrying negative polarity, lowercase.
pub(crate) const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "hate",
    "hated",
    "worst",
    "worse",
    "lose",
    "losing",
    "loss",
    "losses",
    "sad",
    "angry",
    "ugly",
    "broken",
    "fail",
    "failed",
    "failure",
    "weak",
    "crash",
    "crashed",
    "down",
    "bearish",
    "dump",
    "drop",
    "plunge",
    "miss",
    "missed",
    "scam",
    "fraud",
    "fear",
    "panic",
    "negative",
    "problem",
    "problems",
    "wrong",
    "risk",
    "warning",
    "avoid",
];

/// Tokens that flip the polarity of the word that follows.
pub(crate) const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nobody", "none", "cannot", "cant", "dont", "doesnt",
    "didnt", "isnt", "wasnt", "wont", "wouldnt",
];

/// Tokens that strengthen the word that follows.
pub(crate) const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "totally", "absolutely", "completely", "so", "super", "huge",
    "massive",
];

/// Lowercase a word and strip surrounding punctuation.
pub(crate) fn normalize(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

pub(crate) fn is_positive(word: &str) -> bool {
    POSITIVE_WORDS.contains(&word)
}

pub(crate) fn is_negative(word: &str) -> bool {
    NEGATIVE_WORDS.contains(&word)
}
