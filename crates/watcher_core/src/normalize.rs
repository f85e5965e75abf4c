use regex::Regex;

/// Rules for reducing scraped listing text to a stable comparison key.
///
/// The defaults match the job portal's markup, where cards carry suffixes
/// like "· 3 hours ago" that change between scrapes of the same listing.
/// Callers may extend the lists when the page grows new noise patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeRules {
    /// Characters that separate a listing title from a volatile annotation.
    pub separators: Vec<char>,
    /// Relative-time phrases, as regex fragments, matched case-insensitively.
    pub time_phrases: Vec<String>,
    /// Characters stripped from the end of the key after the other steps.
    pub trailing_noise: Vec<char>,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self {
            separators: vec!['\u{b7}', '|', '-', '\u{2013}', '\u{2014}'],
            time_phrases: vec![
                "just now".to_string(),
                "yesterday".to_string(),
                r"(?:\d+|an?)\s+(?:second|minute|hour|day|week|month|year)s?\s+ago".to_string(),
            ],
            trailing_noise: vec!['.', ',', ';', ':', '\u{b7}', '|', '-', '\u{2013}', '\u{2014}'],
        }
    }
}

/// Turns raw scraped text into a canonical comparison key.
///
/// Normalization is total: any input string, including the empty string,
/// produces a key without error.
#[derive(Debug, Clone)]
pub struct Normalizer {
    volatile: Option<Regex>,
    trailing_noise: Vec<char>,
}

impl Normalizer {
    /// Compiles the rule set. Fails only if a configured time phrase is
    /// not a valid regex fragment.
    pub fn new(rules: NormalizeRules) -> Result<Self, regex::Error> {
        let volatile = if rules.separators.is_empty() || rules.time_phrases.is_empty() {
            None
        } else {
            let separators = rules
                .separators
                .iter()
                .map(|c| regex::escape(&c.to_string()))
                .collect::<String>();
            let phrases = rules.time_phrases.join("|");
            let pattern = format!(r"(?i)\s*[{separators}]\s*(?:{phrases})");
            Some(Regex::new(&pattern)?)
        };
        Ok(Self {
            volatile,
            trailing_noise: rules.trailing_noise,
        })
    }

    /// Derives the canonical key for a piece of scraped text.
    ///
    /// Steps, in order: collapse whitespace runs to single spaces, drop
    /// "<separator> <relative time>" annotations, strip trailing noise
    /// characters.
    pub fn normalize(&self, raw: &str) -> String {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let stripped = match &self.volatile {
            Some(volatile) => volatile.replace_all(&collapsed, "").into_owned(),
            None => collapsed,
        };
        stripped
            .trim_end_matches(|c: char| c.is_whitespace() || self.trailing_noise.contains(&c))
            .trim_start()
            .to_string()
    }
}
