//! The multi-factor relevance scorer.
//!
//! For each searchable field and term the scorer accumulates: a
//! diminishing-returns occurrence score, a position bonus for early
//! matches, a whole-word bonus, a half-weight stemmed-form bonus, and a
//! partial-substring bonus for long terms. The field total then passes
//! through a source-type multiplier and gains phrase-proximity and recency
//! bonuses before being normalized against the static maximum and clamped
//! into 0–100.
//!
//! The maximum-possible formula is not a proven upper bound for atypical
//! inputs, so the clamp is unconditional.

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::analysis::stem::{stem_phrase, stem_word};
use crate::content::item::SourceType;
use crate::scoring::weights::{FieldKind, FieldSet, FieldWeights};

/// Flat bonus for an exact phrase match in the combined text.
const PHRASE_BONUS: f64 = 20.0;

/// Flat bonus for a title equal to the whole query.
const EXACT_TITLE_BONUS: f64 = 15.0;

/// Largest recency bonus (content up to a week old).
const MAX_RECENCY_BONUS: f64 = 10.0;

/// Computes 0–100 relevance scores for candidate items.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    weights: FieldWeights,
}

impl RelevanceScorer {
    /// Create a scorer with the default field weights.
    pub fn new() -> Self {
        RelevanceScorer {
            weights: FieldWeights::default(),
        }
    }

    /// Create a scorer with custom field weights.
    pub fn with_weights(weights: FieldWeights) -> Self {
        RelevanceScorer { weights }
    }

    /// The configured weights.
    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Whether any term occurs anywhere in the field set. Items failing
    /// this check are excluded before scoring, not scored as zero.
    pub fn matches_any_term(&self, fields: &FieldSet, terms: &[String]) -> bool {
        if terms.is_empty() {
            return false;
        }

        fields
            .weighted_fields(&self.weights)
            .iter()
            .any(|(_, text, _)| {
                let lowered = text.to_lowercase();
                terms.iter().any(|term| lowered.contains(term.as_str()))
            })
    }

    /// Score one item.
    ///
    /// `raw_query` is the original (trimmed) query text, used for the
    /// exact-title bonus. `created` feeds the recency bonus; `now` is
    /// injected so scoring stays deterministic under test.
    pub fn score(
        &self,
        fields: &FieldSet,
        terms: &[String],
        raw_query: &str,
        source: SourceType,
        created: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> u32 {
        if terms.is_empty() {
            return 0;
        }

        let boundary_patterns: Vec<Option<Regex>> = terms
            .iter()
            .map(|term| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))).ok())
            .collect();

        let mut total = 0.0;
        for (kind, text, weight) in fields.weighted_fields(&self.weights) {
            total += self.score_field(kind, text, weight, terms, &boundary_patterns, raw_query);
        }

        total *= source_multiplier(source);
        total += self.phrase_proximity_bonus(fields, terms);
        total += recency_bonus(created, now);

        let max_possible = self.max_possible_score(terms);
        let normalized = if max_possible > 0.0 {
            total / max_possible * 100.0
        } else {
            total
        };

        normalized.round().clamp(0.0, 100.0) as u32
    }

    fn score_field(
        &self,
        kind: FieldKind,
        text: &str,
        weight: f64,
        terms: &[String],
        boundary_patterns: &[Option<Regex>],
        raw_query: &str,
    ) -> f64 {
        let lowered = text.to_lowercase();
        let mut score = 0.0;

        let mut stemmed_content: Option<String> = None;

        for (term, boundary) in terms.iter().zip(boundary_patterns) {
            if let Some(first_pos) = lowered.find(term.as_str()) {
                let occurrences = lowered.matches(term.as_str()).count();

                // Diminishing returns: repeats help, but sub-linearly
                score += weight * 2.0 * (1.0 - 0.9_f64.powi(occurrences as i32));

                // Earlier occurrences are worth more
                if !lowered.is_empty() {
                    score += (1.0 - first_pos as f64 / lowered.len() as f64) * weight;
                }

                // Whole-word match beats being part of another word
                if boundary.as_ref().is_some_and(|re| re.is_match(&lowered)) {
                    score += weight * 2.0;
                }
            }

            // Stemmed-form match at half weight, only when stemming
            // actually changes the term
            let stemmed_term = stem_word(term);
            if stemmed_term != term.as_str() {
                let content = stemmed_content.get_or_insert_with(|| stem_phrase(&lowered));
                if content.contains(stemmed_term) {
                    score += weight * 0.5;
                }
            }

            // Long terms earn credit for partial overlaps
            if term.chars().count() > 5 {
                score += partial_match_count(&lowered, term) as f64 * weight * 0.3;
            }
        }

        match kind {
            FieldKind::Title => {
                if lowered.trim() == raw_query.trim().to_lowercase() {
                    score += EXACT_TITLE_BONUS;
                }
            }
            FieldKind::MetaKeywords => score *= 1.2,
            FieldKind::Alias => score *= 1.1,
            _ => {}
        }

        score
    }

    /// Phrase and proximity bonuses over the combined text. Single-term
    /// queries get neither.
    fn phrase_proximity_bonus(&self, fields: &FieldSet, terms: &[String]) -> f64 {
        if terms.len() < 2 {
            return 0.0;
        }

        let combined = fields.combined_text();
        if combined.is_empty() {
            return 0.0;
        }

        let mut bonus = 0.0;

        let phrase = terms.join(" ");
        if combined.contains(&phrase) {
            bonus += PHRASE_BONUS;
        }

        bonus += proximity_bonus(&combined, terms);
        bonus
    }

    /// Static maximum used for normalization: per field and term, the
    /// occurrence + position + word-boundary ceiling is three times the
    /// weight, plus every flat bonus.
    fn max_possible_score(&self, terms: &[String]) -> f64 {
        self.weights.total() * terms.len() as f64 * 3.0
            + PHRASE_BONUS
            + EXACT_TITLE_BONUS
            + MAX_RECENCY_BONUS
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Source-type multiplier applied to the field total.
fn source_multiplier(source: SourceType) -> f64 {
    match source {
        SourceType::Article => 1.0,
        SourceType::PageBuilder => 1.1,
        SourceType::CustomField => 0.9,
    }
}

/// Bonus for terms sitting close together in the combined text, based on
/// the average distance between adjacent occurrences.
fn proximity_bonus(combined: &str, terms: &[String]) -> f64 {
    let mut positions: Vec<usize> = Vec::new();
    for term in terms {
        for (pos, _) in combined.match_indices(term.as_str()) {
            positions.push(pos);
        }
    }

    if positions.len() < 2 {
        return 0.0;
    }

    positions.sort_unstable();
    let total_distance: usize = positions.windows(2).map(|pair| pair[1] - pair[0]).sum();
    let average = total_distance as f64 / (positions.len() - 1) as f64;

    if average <= 10.0 {
        15.0
    } else if average <= 50.0 {
        10.0
    } else if average <= 100.0 {
        5.0
    } else {
        0.0
    }
}

/// Bonus for fresh content.
fn recency_bonus(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(created) = created else {
        return 0.0;
    };

    let age_days = (now - created).num_days();
    if age_days < 0 {
        // Scheduled in the future; treat as brand new
        return MAX_RECENCY_BONUS;
    }

    match age_days {
        0..=7 => MAX_RECENCY_BONUS,
        8..=30 => 5.0,
        31..=90 => 2.0,
        _ => 0.0,
    }
}

/// Count the distinct positions where a partial substring of the term
/// (length ≥ 4) first occurs in the content.
fn partial_match_count(content: &str, term: &str) -> usize {
    let chars: Vec<char> = term.chars().collect();
    let term_len = chars.len();

    let mut positions = std::collections::BTreeSet::new();
    for length in 4..=term_len {
        for start in 0..=term_len - length {
            let partial: String = chars[start..start + length].iter().collect();
            if let Some(pos) = content.find(&partial) {
                positions.insert(pos);
            }
        }
    }

    positions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn fields(title: &str, intro: &str, body: &str) -> FieldSet {
        FieldSet {
            title: title.to_string(),
            intro: intro.to_string(),
            body: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_score_within_bounds() {
        let scorer = RelevanceScorer::new();
        let terms = vec!["joomla".to_string(), "search".to_string()];

        // Adversarial: the terms repeated everywhere
        let spam = "joomla search ".repeat(200);
        let set = fields(&spam, &spam, &spam);
        let score = scorer.score(
            &set,
            &terms,
            "joomla search",
            SourceType::PageBuilder,
            Some(now()),
            now(),
        );

        assert!(score <= 100);
    }

    #[test]
    fn test_no_match_scores_zero() {
        let scorer = RelevanceScorer::new();
        let terms = vec!["zebra".to_string()];
        let set = fields("Unrelated Title", "nothing here", "still nothing");

        assert!(!scorer.matches_any_term(&set, &terms));
        assert_eq!(
            scorer.score(&set, &terms, "zebra", SourceType::Article, None, now()),
            0
        );
    }

    #[test]
    fn test_title_phrase_beats_single_body_mention() {
        let scorer = RelevanceScorer::new();
        let terms = vec!["joomla".to_string(), "search".to_string()];

        let strong = fields(
            "Joomla Search Functionality",
            "A guide to joomla search setup.",
            "",
        );
        let weak = fields(
            "Release Notes",
            "",
            "This quarter we improved the search box styling.",
        );

        let strong_score = scorer.score(
            &strong,
            &terms,
            "joomla search",
            SourceType::Article,
            None,
            now(),
        );
        let weak_score = scorer.score(
            &weak,
            &terms,
            "joomla search",
            SourceType::Article,
            None,
            now(),
        );

        assert!(strong_score > weak_score);
    }

    #[test]
    fn test_extra_title_occurrence_never_lowers_score() {
        let scorer = RelevanceScorer::new();
        let terms = vec!["search".to_string()];

        let base = fields("Site search", "intro", "body");
        let more = fields("Site search and search tips", "intro", "body");

        let base_score = scorer.score(&base, &terms, "search", SourceType::Article, None, now());
        let more_score = scorer.score(&more, &terms, "search", SourceType::Article, None, now());

        assert!(more_score >= base_score);
    }

    #[test]
    fn test_exact_title_match_bonus() {
        let scorer = RelevanceScorer::new();
        let terms = vec!["pricing".to_string()];

        let exact = fields("Pricing", "", "");
        let inexact = fields("Pricing Plans", "", "");

        let exact_score = scorer.score(&exact, &terms, "Pricing", SourceType::Article, None, now());
        let inexact_score =
            scorer.score(&inexact, &terms, "Pricing", SourceType::Article, None, now());

        assert!(exact_score > inexact_score);
    }

    #[test]
    fn test_recency_bonus_tiers() {
        assert_eq!(recency_bonus(Some(now() - Duration::days(3)), now()), 10.0);
        assert_eq!(recency_bonus(Some(now() - Duration::days(20)), now()), 5.0);
        assert_eq!(recency_bonus(Some(now() - Duration::days(60)), now()), 2.0);
        assert_eq!(recency_bonus(Some(now() - Duration::days(365)), now()), 0.0);
        assert_eq!(recency_bonus(None, now()), 0.0);
    }

    #[test]
    fn test_proximity_tiers() {
        let terms = vec!["alpha".to_string(), "beta".to_string()];

        assert_eq!(proximity_bonus("alpha beta", &terms), 15.0);

        let medium = format!("alpha {} beta", "x".repeat(30));
        assert_eq!(proximity_bonus(&medium, &terms), 10.0);

        let far = format!("alpha {} beta", "x".repeat(80));
        assert_eq!(proximity_bonus(&far, &terms), 5.0);

        let very_far = format!("alpha {} beta", "x".repeat(300));
        assert_eq!(proximity_bonus(&very_far, &terms), 0.0);
    }

    #[test]
    fn test_page_builder_multiplier_helps() {
        let scorer = RelevanceScorer::new();
        let terms = vec!["welcome".to_string()];

        let set = FieldSet {
            title: "Welcome Page".to_string(),
            page_content: "welcome to the site".to_string(),
            ..Default::default()
        };

        let as_page = scorer.score(&set, &terms, "welcome", SourceType::PageBuilder, None, now());
        let as_article = scorer.score(&set, &terms, "welcome", SourceType::Article, None, now());

        assert!(as_page >= as_article);
    }

    #[test]
    fn test_partial_match_count() {
        // "searching" partials of length >= 4 found inside "search"
        let count = partial_match_count("the search box", "searching");
        assert!(count >= 1);

        assert_eq!(partial_match_count("nothing relevant", "zzzzzz"), 0);
    }

    #[test]
    fn test_matches_any_term() {
        let scorer = RelevanceScorer::new();
        let set = fields("Title", "An intro mentioning ferrets", "");

        assert!(scorer.matches_any_term(&set, &["ferret".to_string()]));
        assert!(!scorer.matches_any_term(&set, &["badger".to_string()]));
        assert!(!scorer.matches_any_term(&set, &[]));
    }
}
