//! Value coercion helpers shared by the store accessors.

/// Parse a recorded value as a base-10 integer, falling back to `0`.
///
/// Surrounding whitespace is ignored and a leading `+` or `-` is accepted.
/// Anything else that is not a complete `i64` (empty strings, trailing
/// garbage, overflow) yields `0`. The fallback is deliberately not the
/// caller's default: a present-but-unparsable option reads as zero.
pub fn parse_or_zero(value: &str) -> i64 {
    match value.trim().parse::<i64>() {
        Ok(n) => n,
        Err(_) => 0,
    }
}

/// Interpret a recorded value as a boolean.
///
/// An empty value (a bare flag) is `true`; otherwise the value is true when
/// it parses to a non-zero integer. Words such as `"true"` parse to zero and
/// are therefore `false`.
pub fn interpret_bool(value: &str) -> bool {
    value.is_empty() || parse_or_zero(value) != 0
}

/// Derive the negated counterpart of an option name.
///
/// `-X` becomes `-noX`. A name without a leading dash is prefixed all the
/// same, so `X` also becomes `-noX`.
pub fn negated_name(name: &str) -> String {
    let bare = name.strip_prefix('-').unwrap_or(name);
    format!("-no{}", bare)
}
