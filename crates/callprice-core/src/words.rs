//! Spoken-number parsing for amounts the ASR wrote out as words.
//!
//! Agents read prices in shorthand: "four sixty" is $460, "five twenty nine"
//! is $529 and "one oh five" is $105. Explicit "two hundred thirty" phrasing
//! is handled too.

/// Number words and their values.
const WORD_VALUES: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
    ("hundred", 100),
];

// Regex alternations. Longer words come first wherever one word is a prefix
// of another ("six", "sixteen", "sixty").
pub(crate) const DIGIT_WORDS: &str = "one|two|three|four|five|six|seven|eight|nine";
pub(crate) const TENS_WORDS: &str = "twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety";
pub(crate) const TEEN_WORDS: &str =
    "ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen";

/// Look up a single number word, ignoring ASCII case.
pub fn word_value(word: &str) -> Option<u32> {
    WORD_VALUES
        .iter()
        .find(|(w, _)| w.eq_ignore_ascii_case(word))
        .map(|&(_, v)| v)
}

fn digit_value(word: &str) -> Option<u32> {
    word_value(word).filter(|v| (1..=9).contains(v))
}

fn ones_value(word: &str) -> Option<u32> {
    word_value(word).filter(|v| *v <= 9)
}

fn tens_value(word: &str) -> Option<u32> {
    word_value(word).filter(|v| (20..=90).contains(v) && v % 10 == 0)
}

fn tokens(seq: &str) -> Vec<String> {
    seq.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Resolve a spoken hundreds phrase to an integer dollar amount.
///
/// - `{digit} oh {digit}` → `d*100 + d2` ("one oh five" → 105)
/// - `{digit} {tens} [{digit}]` → `d*100 + tens + ones` ("four sixty" → 460)
/// - anything containing "hundred" is summed term by term
///   ("two hundred and five" → 205)
pub fn words_to_hundreds(seq: &str) -> Option<u32> {
    let toks = tokens(seq);
    if toks.is_empty() {
        return None;
    }

    if toks.iter().any(|t| t == "hundred") {
        return sum_hundreds(&toks);
    }

    let lead = digit_value(&toks[0])?;
    let second = toks.get(1)?;

    if second == "oh" {
        let ones = toks.get(2).and_then(|t| ones_value(t))?;
        return Some(lead * 100 + ones);
    }

    let tens = tens_value(second)?;
    let ones = toks.get(2).and_then(|t| digit_value(t)).unwrap_or(0);
    Some(lead * 100 + tens + ones)
}

fn sum_hundreds(toks: &[String]) -> Option<u32> {
    let (mut hundreds, mut tens, mut ones) = (0, 0, 0);

    for (i, tok) in toks.iter().enumerate() {
        if tok == "hundred" {
            // "a hundred" or a bare "hundred" counts once.
            let multiplier = i
                .checked_sub(1)
                .and_then(|p| word_value(&toks[p]))
                .filter(|v| (1..=19).contains(v))
                .unwrap_or(1);
            hundreds = multiplier * 100;
            continue;
        }
        // The multiplier is consumed by the "hundred" that follows it.
        if toks.get(i + 1).is_some_and(|next| next == "hundred") {
            continue;
        }
        if tok == "oh" {
            ones = 0;
            continue;
        }
        match word_value(tok) {
            Some(v) if v >= 20 => tens = v,
            Some(v) => ones = v,
            None => {}
        }
    }

    let total = hundreds + tens + ones;
    (total > 0).then_some(total)
}

/// Parse a spoken amount with optional cents into whole cents.
///
/// The dollar part may be shorthand ("two thirty two"), explicit
/// ("two hundred thirty two") or plain ("forty five"). Words after the first
/// "and"/"point" are cents (an "and" right after "hundred" is not a
/// separator), capped at 99 ("two thirty two and eighteen" →
/// 23218).
pub fn words_to_number(seq: &str) -> Option<u64> {
    let toks = tokens(seq);
    let split = toks.iter().enumerate().position(|(i, t)| {
        t == "point" || (t == "and" && (i == 0 || toks[i - 1] != "hundred"))
    });
    let (whole, fraction) = match split {
        Some(i) => (&toks[..i], &toks[i + 1..]),
        None => (&toks[..], &toks[toks.len()..]),
    };

    let dollars = spoken_whole(whole)?;
    let cents = spoken_whole(fraction).map_or(0, |c| c.min(99));
    Some(u64::from(dollars) * 100 + u64::from(cents))
}

fn spoken_whole(toks: &[String]) -> Option<u32> {
    let numeric: Vec<&str> = toks
        .iter()
        .map(String::as_str)
        .filter(|t| *t == "oh" || word_value(t).is_some())
        .collect();
    if numeric.is_empty() {
        return None;
    }
    if let Some(v) = words_to_hundreds(&numeric.join(" ")) {
        return Some(v);
    }
    Some(numeric.iter().filter_map(|t| word_value(t)).sum())
}
