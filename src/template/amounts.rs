//! Numeric normalization for the structured cashout form

use super::types::FieldMap;

fn digits_and_sign(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Keep digits and minus signs, parse what remains. Anything unparsable
/// (empty, `"1-2"`, out of range) becomes 0.
pub fn parse_amount(input: &str) -> i64 {
    digits_and_sign(input.trim()).parse().unwrap_or(0)
}

/// Parse the optional "tip, game load" form input.
///
/// Accepted shapes:
/// - `""` → `(0, 0)`
/// - `"10,5"` → `(10, 5)` (split on the first comma)
/// - `"tip=10 game=5"`, `"tip 10 game 5"` → `(10, 5)`
/// - `"10"` → `(10, 0)`
pub fn parse_tip_and_game(input: &str) -> (i64, i64) {
    let input = input.trim();
    if input.is_empty() {
        return (0, 0);
    }

    if let Some((tip, game)) = input.split_once(',') {
        return (parse_amount(tip), parse_amount(game));
    }

    let normalized = input
        .to_lowercase()
        .replace('=', " ")
        .replace("tip", " ")
        .replace("game", " ");

    let mut numbers = normalized
        .split_whitespace()
        .filter(|token| token.chars().any(|c| c.is_ascii_digit()))
        .map(parse_amount);

    let tip = numbers.next().unwrap_or(0);
    let game = numbers.next().unwrap_or(0);
    (tip, game)
}

/// Amount owed to the player; never negative
pub fn pay_amount(redeemed: i64, tip: i64, game: i64) -> i64 {
    redeemed.saturating_sub(tip).saturating_sub(game).max(0)
}

/// Raw values submitted through the cashout form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashoutForm {
    pub player_name: String,
    pub cashtag: String,
    pub loaded_amount: String,
    pub redeemed_amount: String,
    /// Optional free text in any shape `parse_tip_and_game` accepts
    pub tip_and_game: String,
}

impl CashoutForm {
    /// Normalize the form into the cashout template's fields.
    ///
    /// Zero tip or game load renders as an empty value so the line stays blank.
    pub fn to_fields(&self) -> FieldMap {
        let loaded = parse_amount(&self.loaded_amount);
        let redeemed = parse_amount(&self.redeemed_amount);
        let (tip, game) = parse_tip_and_game(&self.tip_and_game);
        let pay = pay_amount(redeemed, tip, game);

        let nonzero = |value: i64| {
            if value == 0 {
                String::new()
            } else {
                value.to_string()
            }
        };

        FieldMap::from([
            ("playerName".to_string(), self.player_name.trim().to_string()),
            ("loadedAmount".to_string(), loaded.to_string()),
            ("cashtag".to_string(), self.cashtag.trim().to_string()),
            ("redeemedAmount".to_string(), redeemed.to_string()),
            ("tip".to_string(), nonzero(tip)),
            ("gameLoad".to_string(), nonzero(game)),
            ("payAmount".to_string(), pay.to_string()),
        ])
    }
}
