//! Spoken-number extraction from recognizer transcripts.

/// Words the recognizer produces for numbers, plus common mishearings of "eight".
const NUMBER_WORDS: &[(&str, i64)] = &[
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
    ("hey", 8),
    ("ate", 8),
    ("hate", 8),
    ("great", 8),
];

fn word_value(word: &str) -> Option<i64> {
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, v)| v)
}

/// Pull the first number out of a transcript.
///
/// The first run of ASCII digits wins. Otherwise the whole transcript must be
/// a single number word, or exactly two number words whose values are summed
/// ("twenty three" is 23).
pub fn extract_number(text: &str) -> Option<i64> {
    let clean = text.trim().to_lowercase();

    if let Some(start) = clean.find(|c: char| c.is_ascii_digit()) {
        let digits: String = clean[start..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if let Ok(n) = digits.parse() {
            return Some(n);
        }
    }

    if let Some(n) = word_value(&clean) {
        return Some(n);
    }

    let words: Vec<&str> = clean.split_whitespace().collect();
    if let [first, second] = words.as_slice() {
        return Some(word_value(first)? + word_value(second)?);
    }
    None
}
