//! Word and gap alignment of flat tag sequences.
//!
//! Word-level models emit one tag per source word, and for the target side
//! one tag per word plus one per gap around and between words:
//!
//! ```text
//! target:  Herzlich   willkommen
//! tags:   t0   t1   t2    t3     t4
//!        GAP  word  GAP  word   GAP
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sentinel text for target-side gap positions
pub const GAP_TOKEN: &str = "<GAP>";

/// Per-position quality label emitted by a word-level model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QualityLabel {
    Ok,
    Bad,
    /// Any label outside the OK/BAD scheme, kept verbatim
    Other(String),
}

impl QualityLabel {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OK" => Self::Ok,
            "BAD" => Self::Bad,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::Bad => "BAD",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for QualityLabel {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for QualityLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QualityLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawLabel {
            Text(String),
            Number(i64),
        }

        Ok(match RawLabel::deserialize(deserializer)? {
            RawLabel::Text(text) => Self::parse(&text),
            RawLabel::Number(n) => Self::Other(n.to_string()),
        })
    }
}

/// A word (or gap) with the quality the model assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedToken {
    pub text: String,
    pub quality: QualityLabel,
}

impl PredictedToken {
    pub fn new(text: impl Into<String>, quality: QualityLabel) -> Self {
        Self {
            text: text.into(),
            quality,
        }
    }

    pub fn gap(quality: QualityLabel) -> Self {
        Self::new(GAP_TOKEN, quality)
    }

    pub fn is_gap(&self) -> bool {
        self.text == GAP_TOKEN
    }
}

/// Pair source and target words with their tags.
///
/// Source words are zipped with `source_tags`, stopping at the shorter of
/// the two. Target tags at even positions become gaps, odd positions take
/// the next unconsumed target word; the walk stops when the words run out.
pub fn align(
    source_text: &str,
    target_text: &str,
    source_tags: &[QualityLabel],
    target_tags: &[QualityLabel],
) -> (Vec<PredictedToken>, Vec<PredictedToken>) {
    let source_tokens = source_text
        .split_whitespace()
        .zip(source_tags)
        .map(|(word, tag)| PredictedToken::new(word, tag.clone()))
        .collect();

    let mut target_words = target_text.split_whitespace();
    let mut target_tokens = Vec::with_capacity(target_tags.len());
    for (position, tag) in target_tags.iter().enumerate() {
        if position % 2 == 0 {
            target_tokens.push(PredictedToken::gap(tag.clone()));
        } else {
            match target_words.next() {
                Some(word) => target_tokens.push(PredictedToken::new(word, tag.clone())),
                None => break,
            }
        }
    }

    (source_tokens, target_tokens)
}

/// Tag counts that do not fit the word counts of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentMismatch {
    pub source_words: usize,
    pub source_tags: usize,
    pub target_words: usize,
    pub target_tags: usize,
}

impl AlignmentMismatch {
    /// Target tag count the word count calls for (`2n + 1`)
    pub fn expected_target_tags(&self) -> usize {
        2 * self.target_words + 1
    }
}

impl fmt::Display for AlignmentMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "source: {} words / {} tags, target: {} words / {} tags (expected {})",
            self.source_words,
            self.source_tags,
            self.target_words,
            self.target_tags,
            self.expected_target_tags()
        )
    }
}

/// Report when `align` would truncate or misplace tags
pub fn check_alignment(
    source_text: &str,
    target_text: &str,
    source_tags: usize,
    target_tags: usize,
) -> Option<AlignmentMismatch> {
    let mismatch = AlignmentMismatch {
        source_words: source_text.split_whitespace().count(),
        source_tags,
        target_words: target_text.split_whitespace().count(),
        target_tags,
    };

    let consistent = mismatch.source_words == mismatch.source_tags
        && mismatch.target_tags == mismatch.expected_target_tags();
    (!consistent).then_some(mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<QualityLabel> {
        raw.iter().map(|r| QualityLabel::parse(r)).collect()
    }

    fn texts(tokens: &[PredictedToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn interleaves_gaps_and_words() {
        let (source, target) = align(
            "Welcome",
            "Herzlich willkommen",
            &labels(&["OK"]),
            &labels(&["OK", "BAD", "OK", "OK", "BAD"]),
        );

        assert_eq!(source, vec![PredictedToken::new("Welcome", QualityLabel::Ok)]);
        assert_eq!(
            target,
            vec![
                PredictedToken::gap(QualityLabel::Ok),
                PredictedToken::new("Herzlich", QualityLabel::Bad),
                PredictedToken::gap(QualityLabel::Ok),
                PredictedToken::new("willkommen", QualityLabel::Ok),
                PredictedToken::gap(QualityLabel::Bad),
            ]
        );
    }

    #[test]
    fn well_formed_target_keeps_every_word_in_order() {
        let target_text = "der schnelle braune Fuchs springt";
        let n = target_text.split_whitespace().count();
        let tags = vec![QualityLabel::Ok; 2 * n + 1];

        let (_, target) = align("", target_text, &[], &tags);

        assert_eq!(target.len(), 2 * n + 1);
        let gaps: Vec<_> = target.iter().step_by(2).collect();
        assert_eq!(gaps.len(), n + 1);
        assert!(gaps.iter().all(|t| t.is_gap()));
        let words: Vec<_> = target.iter().skip(1).step_by(2).map(|t| t.text.as_str()).collect();
        assert_eq!(words, target_text.split_whitespace().collect::<Vec<_>>());
    }

    #[test]
    fn extra_source_tags_are_ignored() {
        let (source, _) = align("a b", "", &labels(&["OK", "BAD", "BAD"]), &[]);
        assert_eq!(texts(&source), vec!["a", "b"]);
    }

    #[test]
    fn missing_source_tags_truncate_words() {
        let (source, _) = align("a b c", "", &labels(&["BAD"]), &[]);
        assert_eq!(source, vec![PredictedToken::new("a", QualityLabel::Bad)]);
    }

    #[test]
    fn target_walk_stops_when_words_run_out() {
        let (_, target) = align("", "eins", &[], &labels(&["OK", "OK", "OK", "BAD", "OK"]));
        assert_eq!(texts(&target), vec![GAP_TOKEN, "eins", GAP_TOKEN]);
    }

    #[test]
    fn splits_on_any_whitespace() {
        let (source, _) = align(" a\tb\n c ", "", &labels(&["OK", "OK", "OK"]), &[]);
        assert_eq!(texts(&source), vec!["a", "b", "c"]);
    }

    #[test]
    fn numeric_labels_are_kept_verbatim() {
        let parsed: Vec<QualityLabel> = serde_json::from_str(r#"["OK", 1, "BAD"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                QualityLabel::Ok,
                QualityLabel::Other("1".to_string()),
                QualityLabel::Bad
            ]
        );
    }

    #[test]
    fn check_alignment_accepts_2n_plus_1() {
        assert_eq!(check_alignment("Welcome", "Herzlich willkommen", 1, 5), None);
    }

    #[test]
    fn check_alignment_reports_short_target() {
        let mismatch = check_alignment("Welcome", "Herzlich willkommen", 1, 3).unwrap();
        assert_eq!(mismatch.expected_target_tags(), 5);
        assert_eq!(mismatch.target_tags, 3);
    }
}
