//! Brand color discovery over raw page markup.

use std::sync::LazyLock;

use regex::Regex;

pub const MAX_BRAND_COLORS: usize = 10;

/// 6- or 3-digit hex literals plus `rgb(...)` / `rgba(...)` functional notation.
/// Channel values are ASCII digits only.
static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})|rgb\(\s*[0-9]+\s*,\s*[0-9]+\s*,\s*[0-9]+\s*\)|rgba\(\s*[0-9]+\s*,\s*[0-9]+\s*,\s*[0-9]+\s*,\s*[0-9.]+\s*\)",
    )
    .expect("color pattern is valid")
});

/// Distinct color literals in first-seen order, at most `MAX_BRAND_COLORS`.
/// Literals are kept exactly as written; `#FFF` and `#fff` are distinct.
pub fn brand_colors(raw_html: &str) -> Vec<String> {
    let mut colors: Vec<String> = Vec::new();

    for found in COLOR_PATTERN.find_iter(raw_html) {
        if colors.len() == MAX_BRAND_COLORS {
            break;
        }
        if !colors.iter().any(|c| c == found.as_str()) {
            colors.push(found.as_str().to_string());
        }
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_rgb_each_reported_once() {
        let html = r#"<style>.a { color: #FF6B35; } .b { background: rgb(10, 20, 30); }
            .c { color: #FF6B35; } .d { border-color: rgb(10, 20, 30); }</style>"#;
        assert_eq!(brand_colors(html), vec!["#FF6B35", "rgb(10, 20, 30)"]);
    }

    #[test]
    fn test_matches_short_hex_and_rgba() {
        let html = r#"<div style="color:#abc;background:rgba(0, 0, 0, 0.5)"></div>"#;
        assert_eq!(brand_colors(html), vec!["#abc", "rgba(0, 0, 0, 0.5)"]);
    }

    #[test]
    fn test_scans_attributes_not_just_styles() {
        let html = r##"<meta name="theme-color" content="#1a2b3c"><font color="#123">x</font>"##;
        assert_eq!(brand_colors(html), vec!["#1a2b3c", "#123"]);
    }

    #[test]
    fn test_ignores_non_hex_fragments() {
        assert!(brand_colors(r##"<a href="#top">top</a> #zzz rgb(1,2)"##).is_empty());
    }

    #[test]
    fn test_channels_must_be_ascii_digits() {
        let html = "<p style=\"color: rgb(١,٢,٣)\">x</p><p style=\"color: rgb(1,2,3)\">y</p>";
        assert_eq!(brand_colors(html), vec!["rgb(1,2,3)"]);
    }

    #[test]
    fn test_caps_at_ten_in_first_seen_order() {
        let html: String = (0..15).map(|i| format!("color: #{i:06}; ")).collect();
        let colors = brand_colors(&html);
        assert_eq!(colors.len(), MAX_BRAND_COLORS);
        assert_eq!(colors[0], "#000000");
        assert_eq!(colors[9], "#000009");
    }
}
