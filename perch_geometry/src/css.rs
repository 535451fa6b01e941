// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS custom-property helpers.

/// Resolve the fallback of a `var(--name, fallback)` color value.
///
/// Environments without custom-property support need a literal color. The
/// fallback is resolved recursively, so `var(--a, var(--b, #fff))` yields
/// `#fff`. Anything that is not a single well-formed `var()` reference with a
/// fallback is returned unchanged.
///
/// ```rust
/// use perch_geometry::css_variable_fallback;
///
/// assert_eq!(css_variable_fallback("var(--color-text, #16191f)"), "#16191f");
/// assert_eq!(css_variable_fallback("rgb(0, 0, 0)"), "rgb(0, 0, 0)");
/// assert_eq!(css_variable_fallback("var(--no-fallback)"), "var(--no-fallback)");
/// ```
pub fn css_variable_fallback(value: &str) -> &str {
    let Some(inner) = value
        .trim()
        .strip_prefix("var(")
        .and_then(|s| s.strip_suffix(')'))
    else {
        return value;
    };

    let mut depth = 0_usize;
    for (i, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    // The closing paren we stripped belonged to something else.
                    return value;
                }
                depth -= 1;
            }
            ',' if depth == 0 => {
                if !inner[..i].trim().starts_with("--") {
                    return value;
                }
                let fallback = inner[i + 1..].trim();
                if fallback.is_empty() {
                    return value;
                }
                return css_variable_fallback(fallback);
            }
            _ => {}
        }
    }
    value
}
