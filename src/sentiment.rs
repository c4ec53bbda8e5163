//! Lexicon and rule based compound polarity scoring
//!
//! Scores are computed from a bundled valence lexicon plus fixed heuristics
//! for negation, booster words, capitalization, contrastive "but" and
//! punctuation emphasis. The result is normalized into [-1.0, 1.0].

use std::collections::HashMap;

use crate::error::{FeedbackError, Result};

static BUNDLED_LEXICON: &str = include_str!("../data/sentiment_lexicon.tsv");

/// Empirically derived increment for booster words
const B_INCR: f64 = 0.293;
/// Empirically derived decrement for dampener words
const B_DECR: f64 = -0.293;
/// Added when a sentiment word is in ALL CAPS amid mixed-case text
const C_INCR: f64 = 0.733;
/// Multiplier applied to negated valences
const N_SCALAR: f64 = -0.74;
/// Normalization constant approximating the max expected raw score
const NORMALIZATION_ALPHA: f64 = 15.0;
/// Per exclamation mark, counted up to four
const EXCLAMATION_WEIGHT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_WEIGHT: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't",
    "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't",
    "isn't", "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not",
    "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont",
    "wouldnt", "won't", "wouldn't", "rarely", "seldom", "despite",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", B_INCR),
    ("amazingly", B_INCR),
    ("awfully", B_INCR),
    ("completely", B_INCR),
    ("considerable", B_INCR),
    ("considerably", B_INCR),
    ("decidedly", B_INCR),
    ("deeply", B_INCR),
    ("enormous", B_INCR),
    ("enormously", B_INCR),
    ("entirely", B_INCR),
    ("especially", B_INCR),
    ("exceptional", B_INCR),
    ("exceptionally", B_INCR),
    ("extreme", B_INCR),
    ("extremely", B_INCR),
    ("fabulously", B_INCR),
    ("fully", B_INCR),
    ("greatly", B_INCR),
    ("highly", B_INCR),
    ("hugely", B_INCR),
    ("incredible", B_INCR),
    ("incredibly", B_INCR),
    ("intensely", B_INCR),
    ("major", B_INCR),
    ("majorly", B_INCR),
    ("more", B_INCR),
    ("most", B_INCR),
    ("particularly", B_INCR),
    ("purely", B_INCR),
    ("quite", B_INCR),
    ("really", B_INCR),
    ("remarkably", B_INCR),
    ("so", B_INCR),
    ("substantially", B_INCR),
    ("thoroughly", B_INCR),
    ("total", B_INCR),
    ("totally", B_INCR),
    ("tremendous", B_INCR),
    ("tremendously", B_INCR),
    ("unbelievably", B_INCR),
    ("unusually", B_INCR),
    ("utter", B_INCR),
    ("utterly", B_INCR),
    ("very", B_INCR),
    ("almost", B_DECR),
    ("barely", B_DECR),
    ("hardly", B_DECR),
    ("just enough", B_DECR),
    ("kind of", B_DECR),
    ("kinda", B_DECR),
    ("kindof", B_DECR),
    ("kind-of", B_DECR),
    ("less", B_DECR),
    ("little", B_DECR),
    ("marginal", B_DECR),
    ("marginally", B_DECR),
    ("occasional", B_DECR),
    ("occasionally", B_DECR),
    ("partly", B_DECR),
    ("scarce", B_DECR),
    ("scarcely", B_DECR),
    ("slight", B_DECR),
    ("slightly", B_DECR),
    ("somewhat", B_DECR),
    ("sort of", B_DECR),
    ("sorta", B_DECR),
    ("sortof", B_DECR),
    ("sort-of", B_DECR),
];

/// Multi-word expressions whose valence overrides the word-level lookup
const IDIOMS: &[(&str, f64)] = &[
    ("the shit", 3.0),
    ("the bomb", 3.0),
    ("bad ass", 1.5),
    ("yeah right", -2.0),
    ("kiss of death", -1.5),
    ("to die for", 3.0),
    ("beating heart", 3.1),
    ("broken heart", -2.9),
    ("bus stop", 0.0),
];

/// Anything that can turn a comment into a compound polarity score
#[cfg_attr(test, mockall::automock)]
pub trait PolarityScorer {
    /// Score `text` into [-1.0, 1.0]; must be deterministic
    fn polarity(&self, text: &str) -> f64;
}

/// Word valence table
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Lexicon compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_LEXICON)
    }

    /// Parse tab-separated `token<TAB>valence` lines; extra columns are ignored.
    pub fn parse(data: &str) -> Result<Self> {
        let mut valences = HashMap::new();
        for (line_no, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default().trim();
            let valence = fields
                .next()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .ok_or_else(|| {
                    FeedbackError::Other(format!(
                        "Invalid lexicon entry on line {}: '{line}'",
                        line_no + 1
                    ))
                })?;
            if token.is_empty() {
                return Err(FeedbackError::Other(format!(
                    "Empty lexicon token on line {}",
                    line_no + 1
                )));
            }
            valences.insert(token.to_lowercase(), valence);
        }
        Ok(Self { valences })
    }

    /// Valence of a lowercase token
    #[must_use]
    pub fn get(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    /// Whether a lowercase token carries a valence
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    /// True when the lexicon has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// Tokenized view of one comment
struct SentiText<'a> {
    tokens: Vec<&'a str>,
    lowered: Vec<String>,
    /// Some, but not all, tokens are ALL CAPS
    cap_differential: bool,
}

impl<'a> SentiText<'a> {
    fn new(text: &'a str) -> Self {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(strip_punctuation_if_word)
            .collect();
        let lowered = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
        let cap_differential = caps > 0 && caps < tokens.len();
        Self {
            tokens,
            lowered,
            cap_differential,
        }
    }

    fn lower(&self, i: usize) -> &str {
        &self.lowered[i]
    }
}

/// Strip surrounding punctuation unless that would leave an emoticon-sized stub
fn strip_punctuation_if_word(token: &str) -> &str {
    let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
    if stripped.chars().count() <= 2 {
        token
    } else {
        stripped
    }
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

fn is_negated(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

/// Fixed lexicon scorer producing a compound polarity per comment
///
/// Stateless across calls: the only inputs are the text and the lexicon.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Lexicon,
    boosters: HashMap<&'static str, f64>,
    idioms: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    /// Scorer backed by the bundled lexicon
    pub fn new() -> Result<Self> {
        Ok(Self::with_lexicon(Lexicon::bundled()?))
    }

    /// Scorer backed by a caller-provided lexicon
    #[must_use]
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            boosters: BOOSTERS.iter().copied().collect(),
            idioms: IDIOMS.iter().copied().collect(),
        }
    }

    /// The valence table in use
    #[must_use]
    pub const fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compound score for `text`, rounded to four decimals
    #[must_use]
    pub fn compound(&self, text: &str) -> f64 {
        let senti = SentiText::new(text);
        let mut sentiments = Vec::with_capacity(senti.tokens.len());

        for i in 0..senti.tokens.len() {
            let lower = senti.lower(i);
            if self.boosters.contains_key(lower) {
                sentiments.push(0.0);
                continue;
            }
            if lower == "kind" && senti.lowered.get(i + 1).is_some_and(|next| next == "of") {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.sentiment_valence(&senti, i));
        }

        but_check(&senti.lowered, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn sentiment_valence(&self, senti: &SentiText<'_>, i: usize) -> f64 {
        let lower = senti.lower(i);
        let Some(base) = self.lexicon.get(lower) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" used as a determiner in front of another sentiment word
        if lower == "no"
            && i + 1 < senti.tokens.len()
            && self.lexicon.contains(senti.lower(i + 1))
        {
            valence = 0.0;
        }
        if (i > 0 && senti.lower(i - 1) == "no")
            || (i > 1 && senti.lower(i - 2) == "no")
            || (i > 2
                && senti.lower(i - 3) == "no"
                && matches!(senti.lower(i - 1), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if is_all_caps(senti.tokens[i]) && senti.cap_differential {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start_i in 0..3 {
            if i <= start_i {
                break;
            }
            let prev = i - (start_i + 1);
            if self.lexicon.contains(senti.lower(prev)) {
                continue;
            }
            let mut scalar = self.scalar_inc_dec(senti, prev, valence);
            if start_i == 1 {
                scalar *= 0.95;
            } else if start_i == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            valence = negation_check(valence, senti, start_i, i);
            if start_i == 2 {
                valence = self.idioms_check(valence, senti, i);
            }
        }

        self.least_check(valence, senti, i)
    }

    /// Booster or dampener contribution of the word at `j`
    fn scalar_inc_dec(&self, senti: &SentiText<'_>, j: usize, valence: f64) -> f64 {
        let Some(&boost) = self.boosters.get(senti.lower(j)) else {
            return 0.0;
        };
        let mut scalar = if valence < 0.0 { -boost } else { boost };
        if is_all_caps(senti.tokens[j]) && senti.cap_differential {
            scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
        }
        scalar
    }

    /// Only called with `i >= 3`
    fn idioms_check(&self, mut valence: f64, senti: &SentiText<'_>, i: usize) -> f64 {
        let w = |k: usize| senti.lower(k);
        let one_zero = format!("{} {}", w(i - 1), w(i));
        let two_one_zero = format!("{} {} {}", w(i - 2), w(i - 1), w(i));
        let two_one = format!("{} {}", w(i - 2), w(i - 1));
        let three_two_one = format!("{} {} {}", w(i - 3), w(i - 2), w(i - 1));
        let three_two = format!("{} {}", w(i - 3), w(i - 2));

        for seq in [&one_zero, &two_one_zero, &two_one, &three_two_one, &three_two] {
            if let Some(&v) = self.idioms.get(seq.as_str()) {
                valence = v;
                break;
            }
        }

        let len = senti.tokens.len();
        if len - 1 > i {
            let zero_one = format!("{} {}", w(i), w(i + 1));
            if let Some(&v) = self.idioms.get(zero_one.as_str()) {
                valence = v;
            }
        }
        if len - 1 > i + 1 {
            let zero_one_two = format!("{} {} {}", w(i), w(i + 1), w(i + 2));
            if let Some(&v) = self.idioms.get(zero_one_two.as_str()) {
                valence = v;
            }
        }

        // multi-word dampeners such as "sort of"
        for n_gram in [&three_two_one, &three_two, &two_one] {
            if let Some(&boost) = self.boosters.get(n_gram.as_str()) {
                valence += boost;
            }
        }
        valence
    }

    fn least_check(&self, valence: f64, senti: &SentiText<'_>, i: usize) -> f64 {
        if i > 1 && !self.lexicon.contains(senti.lower(i - 1)) && senti.lower(i - 1) == "least" {
            if !matches!(senti.lower(i - 2), "at" | "very") {
                return valence * N_SCALAR;
            }
        } else if i > 0 && !self.lexicon.contains(senti.lower(i - 1)) && senti.lower(i - 1) == "least"
        {
            return valence * N_SCALAR;
        }
        valence
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        self.compound(text)
    }
}

fn negation_check(valence: f64, senti: &SentiText<'_>, start_i: usize, i: usize) -> f64 {
    let w = |k: usize| senti.lower(k);
    match start_i {
        0 => {
            if is_negated(w(i - 1)) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if w(i - 2) == "never" && matches!(w(i - 1), "so" | "this") {
                return valence * 1.25;
            } else if w(i - 2) == "without" && w(i - 1) == "doubt" {
                return valence;
            } else if is_negated(w(i - 2)) {
                return valence * N_SCALAR;
            }
        }
        2 => {
            if w(i - 3) == "never"
                && (matches!(w(i - 2), "so" | "this") || matches!(w(i - 1), "so" | "this"))
            {
                return valence * 1.25;
            } else if w(i - 3) == "without" && (w(i - 2) == "doubt" || w(i - 1) == "doubt") {
                return valence;
            } else if is_negated(w(i - 3)) {
                return valence * N_SCALAR;
            }
        }
        _ => {}
    }
    valence
}

/// Dampen everything before "but" and emphasize everything after it
fn but_check(lowered: &[String], sentiments: &mut [f64]) {
    let Some(but_index) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (si, sentiment) in sentiments.iter_mut().enumerate() {
        if si < but_index {
            *sentiment *= 0.5;
        } else if si > but_index {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let ep_amplifier = exclamations as f64 * EXCLAMATION_WEIGHT;

    let questions = text.matches('?').count();
    let qm_amplifier = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * QUESTION_WEIGHT,
        _ => MAX_QUESTION_EMPHASIS,
    };
    ep_amplifier + qm_amplifier
}

fn normalize(score: f64) -> f64 {
    let normalized = score / (score * score + NORMALIZATION_ALPHA).sqrt();
    normalized.clamp(-1.0, 1.0)
}

fn score_valence(sentiments: &[f64], text: &str) -> f64 {
    if sentiments.is_empty() {
        return 0.0;
    }
    let mut sum: f64 = sentiments.iter().sum();
    let emphasis = punctuation_emphasis(text);
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    (normalize(sum) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LexiconScorer {
        LexiconScorer::new().expect("bundled lexicon parses")
    }

    #[test]
    fn test_bundled_lexicon_loads() {
        let lexicon = Lexicon::bundled().expect("bundled lexicon parses");
        assert!(lexicon.len() > 300);
        assert_eq!(lexicon.get("great"), Some(3.1));
        assert!(lexicon.contains(":)"));
    }

    #[test]
    fn test_parse_rejects_bad_valence() {
        assert!(Lexicon::parse("good\tnot-a-number").is_err());
        assert!(Lexicon::parse("good").is_err());
    }

    #[test]
    fn test_parse_ignores_extra_columns() {
        let lexicon = Lexicon::parse("Good\t1.9\t0.9\t[2, 2, 1]\n\n").expect("parses");
        assert_eq!(lexicon.get("good"), Some(1.9));
    }

    #[test]
    fn test_empty_text_is_zero() {
        assert_eq!(scorer().compound(""), 0.0);
        assert_eq!(scorer().compound("   "), 0.0);
    }

    #[test]
    fn test_unknown_words_are_neutral() {
        assert_eq!(scorer().compound("It works."), 0.0);
    }

    #[test]
    fn test_single_word_normalization() {
        // 3.1 / sqrt(3.1^2 + 15)
        assert!((scorer().compound("great") - 0.6249).abs() < 1e-4);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let s = scorer();
        assert!(s.compound("The app is good") > 0.0);
        assert!(s.compound("The app is not good") < 0.0);
        assert!(s.compound("The app isn't good") < 0.0);
    }

    #[test]
    fn test_booster_increases_intensity() {
        let s = scorer();
        assert!(s.compound("very helpful") > s.compound("helpful"));
        assert!(s.compound("slightly helpful") < s.compound("helpful"));
    }

    #[test]
    fn test_caps_emphasis() {
        let s = scorer();
        assert!(s.compound("the staff was GREAT") > s.compound("the staff was great"));
    }

    #[test]
    fn test_exclamation_emphasis() {
        let s = scorer();
        assert!(s.compound("great!!") > s.compound("great"));
        assert!(s.compound("terrible!!") < s.compound("terrible"));
        assert_eq!(s.compound("great!!!!!!"), s.compound("great!!!!"));
    }

    #[test]
    fn test_but_shifts_weight() {
        let s = scorer();
        assert!(s.compound("The doctor was helpful but the app is terrible") < 0.0);
    }

    #[test]
    fn test_kind_of_dampens() {
        let s = scorer();
        assert!(s.compound("it is kind of good") < s.compound("it is good"));
    }

    #[test]
    fn test_least_negates() {
        let s = scorer();
        assert!(s.compound("the least helpful feature") < 0.0);
    }

    #[test]
    fn test_strip_punctuation_keeps_emoticons() {
        assert_eq!(strip_punctuation_if_word("great!"), "great");
        assert_eq!(strip_punctuation_if_word(":)"), ":)");
        assert_eq!(strip_punctuation_if_word("ok."), "ok.");
    }
}
