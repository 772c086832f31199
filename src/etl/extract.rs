//! Scrapes the ranked bank table out of the source markup.

use crate::core::{BankRecord, ExtractionError};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub const TABLE_BODY_SELECTOR: &str = "tbody";
pub const ROW_SELECTOR: &str = "tr";
pub const DATA_CELL_SELECTOR: &str = "td";
pub const LINK_SELECTOR: &str = "a";

/// Each row carries a flag icon link before the bank name link.
pub const NAME_LINK_INDEX: usize = 1;
/// Rank, bank name, market cap.
pub const MARKET_CAP_CELL_INDEX: usize = 2;

/// Where the bank name and market cap live within the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Tag name of the table body. Only bodies written out in the markup
    /// count; the parser's implied bodies around bare rows are ignored.
    pub table_body: String,
    pub row: String,
    pub data_cell: String,
    pub link: String,
    pub name_link_index: usize,
    pub market_cap_cell_index: usize,
    /// Labels of the name and market cap fields, used in diagnostics
    pub field_names: [String; 2],
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout {
            table_body: TABLE_BODY_SELECTOR.to_string(),
            row: ROW_SELECTOR.to_string(),
            data_cell: DATA_CELL_SELECTOR.to_string(),
            link: LINK_SELECTOR.to_string(),
            name_link_index: NAME_LINK_INDEX,
            market_cap_cell_index: MARKET_CAP_CELL_INDEX,
            field_names: ["Name".to_string(), "MC_USD_Billion".to_string()],
        }
    }
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Returns `markup` from the first start tag named `tag` onward.
fn from_first_start_tag<'a>(markup: &'a str, tag: &str) -> Option<&'a str> {
    let lowered = markup.to_ascii_lowercase();
    let open = format!("<{}", tag.to_ascii_lowercase());
    lowered
        .match_indices(&open)
        .map(|(start, _)| start)
        .find(|&start| {
            lowered[start + open.len()..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
        })
        .map(|start| &markup[start..])
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses the first table body in `markup` into bank records, in row order.
///
/// The body must be an explicit `<tbody>` element: tables whose rows sit
/// directly under `<table>` are passed over. Rows without data cells
/// (headers, separators) are skipped. Any other row that does not fit
/// `layout` aborts the extraction.
pub fn extract(markup: &str, layout: &TableLayout) -> Result<Vec<BankRecord>, ExtractionError> {
    let table_body = selector(&layout.table_body)?;
    let row_selector = selector(&layout.row)?;
    let cell_selector = selector(&layout.data_cell)?;
    let link_selector = selector(&layout.link)?;
    let [name_field, market_cap_field] = &layout.field_names;

    // html5ever wraps bare rows in an implied body, so the first explicit
    // body is re-parsed on its own inside a table.
    let body_markup =
        from_first_start_tag(markup, &layout.table_body).ok_or(ExtractionError::NoTable)?;
    let document = Html::parse_document(&format!("<table>{body_markup}"));
    let table = document
        .select(&table_body)
        .next()
        .ok_or(ExtractionError::NoTable)?;

    let mut records = Vec::new();
    for (index, row) in table.select(&row_selector).enumerate() {
        let row_number = index + 1;
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.is_empty() {
            debug!("Skipping row {} without data cells", row_number);
            continue;
        }

        let links: Vec<ElementRef> = row.select(&link_selector).collect();
        let name = links
            .get(layout.name_link_index)
            .map(element_text)
            .ok_or_else(|| ExtractionError::MalformedRow {
                row: row_number,
                reason: format!(
                    "expected at least {} links for {}, found {}",
                    layout.name_link_index + 1,
                    name_field,
                    links.len()
                ),
            })?;
        if name.is_empty() {
            return Err(ExtractionError::MalformedRow {
                row: row_number,
                reason: format!("{name_field} is empty"),
            });
        }

        let raw_value = cells
            .get(layout.market_cap_cell_index)
            .map(element_text)
            .ok_or_else(|| ExtractionError::MalformedRow {
                row: row_number,
                reason: format!(
                    "expected at least {} data cells for {}, found {}",
                    layout.market_cap_cell_index + 1,
                    market_cap_field,
                    cells.len()
                ),
            })?;
        let market_cap = parse_market_cap(&raw_value).ok_or_else(|| ExtractionError::BadNumber {
            row: row_number,
            field: market_cap_field.clone(),
            value: raw_value.clone(),
        })?;

        records.push(BankRecord {
            name,
            market_cap_usd_billion: market_cap,
        });
    }

    debug!("Extracted {} bank records", records.len());
    Ok(records)
}

/// Parses a figure such as `2,500.75`. Negative and non-finite values are rejected.
fn parse_market_cap(raw: &str) -> Option<f64> {
    let value: f64 = raw.replace(',', "").trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
