/// Longest explicit term accepted, in days. Larger numbers in the free
/// text are amounts or references, not terms.
const MAX_TERM_DAYS: u32 = 365;

/// Day count stated in a CondicionesDePago text, if any.
///
/// Recognizes a number followed by a day word ("30 días", "15 dias",
/// "45 days") or preceded by "net"/"neto" ("Net 60"). Anything else,
/// including "Contado" or "Pago inmediato", yields `None`.
pub fn explicit_term_days(conditions: &str) -> Option<u32> {
    let lower = conditions.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    tokens.iter().enumerate().find_map(|(i, token)| {
        let days: u32 = token.parse().ok()?;
        let before = i.checked_sub(1).map(|j| tokens[j]);
        let after = tokens.get(i + 1).copied();
        let day_word = after.is_some_and(|t| {
            t.starts_with("día") || t.starts_with("dia") || t.starts_with("day")
        });
        let net = before.is_some_and(|t| t == "net" || t == "neto");
        ((day_word || net) && days <= MAX_TERM_DAYS).then_some(days)
    })
}
