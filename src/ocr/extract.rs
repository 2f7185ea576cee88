//! Picks the meter reading out of recognized free text. Meter displays put
//! the register as the longest run of digits on the face; shorter runs
//! (serial numbers, tariff class) become suggestions.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIGIT_RUNS: Regex = Regex::new(r"\d+").unwrap();
}

#[derive(Debug, PartialEq)]
pub struct Extraction {
    /// The longest digit run; the first one wins on ties.
    pub reading: Option<f64>,
    /// Every digit run found, in order of appearance.
    pub suggestions: Vec<f64>,
}

pub fn extract_reading(text: &str) -> Extraction {
    let runs: Vec<&str> = DIGIT_RUNS.find_iter(text).map(|m| m.as_str()).collect();

    let longest = runs
        .iter()
        .copied()
        .fold(None::<&str>, |best, cur| match best {
            Some(b) if cur.len() > b.len() => Some(cur),
            Some(b) => Some(b),
            None => Some(cur),
        });

    Extraction {
        reading: longest.and_then(|s| s.parse::<f64>().ok()),
        suggestions: runs.iter().filter_map(|s| s.parse::<f64>().ok()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_longest_digit_run() {
        let out = extract_reading("PDAM 12 m3 000935 SN 4421");
        assert_eq!(out.reading, Some(935.0));
        assert_eq!(out.suggestions, vec![12.0, 3.0, 935.0, 4421.0]);
    }

    #[test]
    fn first_run_wins_on_ties() {
        let out = extract_reading("123 456");
        assert_eq!(out.reading, Some(123.0));
    }

    #[test]
    fn no_digits_yields_nothing() {
        let out = extract_reading("tidak terbaca");
        assert_eq!(out.reading, None);
        assert!(out.suggestions.is_empty());
    }

    #[test]
    fn digits_split_by_noise_stay_separate() {
        let out = extract_reading("0 0 1 2 3 5");
        assert_eq!(out.reading, Some(0.0));
        assert_eq!(out.suggestions.len(), 6);
    }

    #[test]
    fn leading_zeros_parse_as_number() {
        let out = extract_reading("000042");
        assert_eq!(out.reading, Some(42.0));
    }
}
