use crate::etl::QueryValue;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Numbers are right aligned, NULL is dimmed.
pub fn value_cell(value: &QueryValue) -> Cell {
    match value {
        QueryValue::Null => Cell::new("NULL").fg(Color::DarkGrey),
        QueryValue::Integer(_) | QueryValue::Real(_) => {
            Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
        }
        QueryValue::Text(_) | QueryValue::Blob(_) => Cell::new(value.to_string()),
    }
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_cell_content() {
        assert_eq!(value_cell(&QueryValue::Real(2000.6)).content(), "2000.6");
        assert_eq!(value_cell(&QueryValue::Null).content(), "NULL");
        assert_eq!(
            value_cell(&QueryValue::Text("Global Bank".to_string())).content(),
            "Global Bank"
        );
    }

    #[test]
    fn test_style_text_keeps_content() {
        console::set_colors_enabled(false);
        assert_eq!(style_text("Banks", StyleType::Title), "Banks");
    }
}
