//! Fuzzy similarity for noisy header text

use strsim::normalized_levenshtein;

/// Partial-ratio similarity in `0..=100`, case-insensitive.
///
/// The shorter string is slid across the longer one window by window; the
/// score is the best normalized Levenshtein similarity of any window.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let needle: String = short.iter().collect();

    let best = long
        .windows(short.len())
        .map(|w| normalized_levenshtein(&needle, &w.iter().collect::<String>()))
        .fold(0.0_f64, f64::max);

    (best * 100.0).round() as u8
}

/// Acceptance is strict: a score equal to the threshold does not match.
pub fn accepts(score: u8, threshold: u8) -> bool {
    score > threshold
}
