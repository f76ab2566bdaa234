use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Result,
    Error,
}

/// Applies a consistent style to a string.
///
/// Styling is dropped when stdout is not a terminal, so piped output stays
/// plain.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red(),
    };
    styled.to_string()
}
