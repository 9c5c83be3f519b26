//! Sentiment scoring: the `TextScorer` capability and its two flavors.
//!
//! `lexicon` counts polarity words and takes the sign; it is fast and suits
//! large historical corpora. `weighted` additionally handles negation and
//! intensifiers; slower, more accurate, better for small batches.

mod lexicon;
mod scorer;

pub use scorer::{LexiconScorer, WeightedScorer};

use std::str::FromStr;

use anyhow::Result;

use subpulse_common::{Polarity, SubpulseError};

/// Scores one text string. Implementations hold no mutable state, so a single
/// instance is safe to share across concurrent scoring tasks.
pub trait TextScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<Polarity>;
}

impl<S: TextScorer + ?Sized> TextScorer for Box<S> {
    fn score(&self, text: &str) -> Result<Polarity> {
        (**self).score(text)
    }
}

/// Which scorer implementation to run, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerFlavor {
    Lexicon,
    Weighted,
}

impl ScorerFlavor {
    pub fn build(self) -> Box<dyn TextScorer> {
        match self {
            ScorerFlavor::Lexicon => Box::new(LexiconScorer::new()),
            ScorerFlavor::Weighted => Box::new(WeightedScorer::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerFlavor::Lexicon => "lexicon",
            ScorerFlavor::Weighted => "weighted",
        }
    }
}

impl FromStr for ScorerFlavor {
    type Err = SubpulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicon" => Ok(ScorerFlavor::Lexicon),
            "weighted" => Ok(ScorerFlavor::Weighted),
            other => Err(SubpulseError::Config(format!(
                "unknown scorer flavor '{other}', expected 'lexicon' or 'weighted'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_parses_known_names() {
        assert_eq!("lexicon".parse::<ScorerFlavor>().unwrap(), ScorerFlavor::Lexicon);
        assert_eq!("weighted".parse::<ScorerFlavor>().unwrap(), ScorerFlavor::Weighted);
    }

    #[test]
    fn flavor_rejects_unknown_names() {
        assert!(matches!(
            "flair".parse::<ScorerFlavor>(),
            Err(SubpulseError::Config(_))
        ));
    }
}
