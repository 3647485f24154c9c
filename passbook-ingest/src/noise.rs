//! Line classification: transaction starts and non-transactional noise.

use passbook_core::profile::NoiseRules;
use passbook_core::{BankProfile, Line};

/// Keyword rules alone, without the transaction-start override.
///
/// Noise when the lowercase text contains any noise keyword, or at least
/// `promo_min_count` distinct promotional keywords.
pub fn matches_noise_rules(text: &str, rules: &NoiseRules) -> bool {
    let text = text.to_lowercase();
    if rules.keywords.iter().any(|k| text.contains(k.as_str())) {
        return true;
    }
    if rules.promo_keywords.is_empty() || rules.promo_min_count == 0 {
        return false;
    }
    let hits = rules
        .promo_keywords
        .iter()
        .filter(|k| text.contains(k.as_str()))
        .count();
    hits >= rules.promo_min_count
}

/// A line starts a transaction when its first token begins with a date and
/// sits left of the profile's margin. A bare time never starts one.
pub fn is_transaction_start(line: &Line, profile: &BankProfile) -> bool {
    let first = line.first();
    let word = first.text.trim();
    if first.x0 >= profile.lines().transaction_left_margin {
        return false;
    }
    if is_bare_time(word, profile) {
        return false;
    }
    profile
        .date_pattern()
        .find(word)
        .is_some_and(|m| m.start() == 0)
}

fn is_bare_time(word: &str, profile: &BankProfile) -> bool {
    profile
        .time_pattern()
        .find(word)
        .is_some_and(|m| m.start() == 0 && m.end() == word.len())
}

/// Noise unless the line also passes the transaction-start test; real
/// transactions sometimes contain noise words.
pub fn is_noise(line: &Line, profile: &BankProfile) -> bool {
    matches_noise_rules(&line.text(), profile.noise()) && !is_transaction_start(line, profile)
}
