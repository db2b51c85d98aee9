//! Number formatting for human output

use crate::view;

/// Format a number with at most `precision` decimals, trimming trailing zeros
pub fn format_number(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    if !text.contains('.') {
        return text;
    }

    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Render a normalized value as `3.5/5 stars`
pub fn format_stars(normalized: f64, max_stars: u8) -> String {
    format!(
        "{}/{} stars",
        format_number(view::stars(normalized, max_stars), 1),
        max_stars
    )
}

/// Render a normalized value as `74%`
pub fn format_percentage(normalized: f64, precision: usize) -> String {
    format!("{}%", format_number(view::percentage(normalized), precision))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.5, 2), "7.5");
        assert_eq!(format_number(20.0, 2), "20");
        assert_eq!(format_number(7.407407, 2), "7.41");
        assert_eq!(format_number(-0.001, 2), "0");
        assert_eq!(format_number(3.0, 0), "3");
    }

    #[test]
    fn test_format_scales() {
        assert_eq!(format_stars(7.41, 5), "3.5/5 stars");
        assert_eq!(format_stars(10.0, 5), "5/5 stars");
        assert_eq!(format_percentage(7.407407, 1), "74.1%");
    }
}
