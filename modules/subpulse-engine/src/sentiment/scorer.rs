use anyhow::Result;

use subpulse_common::Polarity;

use super::lexicon;
use super::TextScorer;

/// Bag-of-words scorer: counts positive and negative lexicon hits and takes
/// the sign of the difference.
#[derive(Debug, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl TextScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<Polarity> {
        let mut balance: i64 = 0;
        for token in text.split_whitespace() {
            let word = lexicon::normalize(token);
            if lexicon::is_positive(&word) {
                balance += 1;
            } else if lexicon::is_negative(&word) {
                balance -= 1;
            }
        }
        Ok(Polarity::from_score(balance as f64))
    }
}

/// Weight applied when the preceding token is an intensifier.
const INTENSIFIER_BOOST: f64 = 1.5;

/// Negation- and intensifier-aware scorer. Each lexicon hit contributes
/// ±1, boosted when intensified and flipped when a negation appears within
/// the two preceding tokens.
#[derive(Debug, Default)]
pub struct WeightedScorer;

impl WeightedScorer {
    pub fn new() -> Self {
        Self
    }
}

impl TextScorer for WeightedScorer {
    fn score(&self, text: &str) -> Result<Polarity> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(lexicon::normalize)
            .filter(|w| !w.is_empty())
            .collect();

        let mut total = 0.0;
        for (i, word) in words.iter().enumerate() {
            let base = if lexicon::is_positive(word) {
                1.0
            } else if lexicon::is_negative(word) {
                -1.0
            } else {
                continue;
            };

            let mut weight = base;
            if i > 0 && lexicon::INTENSIFIERS.contains(&words[i - 1].as_str()) {
                weight *= INTENSIFIER_BOOST;
            }
            let negated = words[i.saturating_sub(2)..i]
                .iter()
                .any(|w| lexicon::NEGATIONS.contains(&w.as_str()));
            if negated {
                weight = -weight;
            }
            total += weight;
        }

        Ok(Polarity::from_score(total))
    }
}
