//! Guess feedback evaluation.
//!
//! Compares a guess against the secret word and produces a per-letter
//! verdict sequence that clients render as the familiar tile colors.

use serde_json::Value;

use crate::engine::words::WORD_LENGTH;

/// Verdict for one guess position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterVerdict {
    /// Right letter in the right position.
    Correct,
    /// Letter occurs elsewhere in the secret.
    Present,
    /// Letter does not occur (or all its occurrences are spoken for).
    Absent,
}

impl LetterVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

/// Compare `guess` to `secret`, position by position.
///
/// Two passes: exact-position matches are credited first and consume their
/// secret letter; every remaining position is marked `Present` while an
/// unconsumed occurrence of its letter lasts, `Absent` otherwise. A
/// repeated guess letter is therefore never credited more times than it
/// occurs in the secret, and exact matches always win over loose ones.
///
/// Inputs that are not exactly [`WORD_LENGTH`] characters yield an
/// all-`Absent` sequence; callers are expected to reject malformed guesses
/// before this point.
pub fn evaluate(guess: &str, secret: &str) -> Vec<LetterVerdict> {
    let guess: Vec<char> = guess.chars().collect();
    let mut secret: Vec<Option<char>> = secret.chars().map(Some).collect();

    let mut verdicts = vec![LetterVerdict::Absent; WORD_LENGTH];
    if guess.len() != WORD_LENGTH || secret.len() != WORD_LENGTH {
        return verdicts;
    }

    for i in 0..WORD_LENGTH {
        if secret[i] == Some(guess[i]) {
            verdicts[i] = LetterVerdict::Correct;
            secret[i] = None;
        }
    }

    for i in 0..WORD_LENGTH {
        if verdicts[i] == LetterVerdict::Correct {
            continue;
        }
        if let Some(slot) = secret.iter_mut().find(|s| **s == Some(guess[i])) {
            verdicts[i] = LetterVerdict::Present;
            *slot = None;
        }
    }

    verdicts
}

/// Wire form of a verdict sequence: an array of verdict strings.
pub fn sequence_to_json(verdicts: &[LetterVerdict]) -> Value {
    Value::Array(verdicts.iter().map(|v| Value::from(v.as_str())).collect())
}
