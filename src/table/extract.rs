// src/table/extract.rs

use crate::error::{Result, ScrapeError};
use crate::table::{Row, Table, Value};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

static TABLES: Lazy<Selector> = Lazy::new(|| Selector::parse("table[id]").unwrap());
static THEAD: Lazy<Selector> = Lazy::new(|| Selector::parse("thead").unwrap());
static HEADER_CELLS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"th[scope="col"]"#).unwrap());
static TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").unwrap());
static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static DATA_CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td[data-stat]").unwrap());

/// Pull the table with id `table_id` out of a page.
///
/// Columns are keyed by each header cell's `data-stat` attribute (the rank
/// column is dropped), and cells are matched to columns by the same
/// attribute rather than by position. Rows missing any column are dropped.
///
/// Un-rendered fbref pages ship every table but the first inside an HTML
/// comment, so when the live DOM has no match the comments are searched too.
#[instrument(level = "debug", skip(html), fields(bytes = html.len()))]
pub fn extract(html: &str, table_id: &str) -> Result<Table> {
    let doc = Html::parse_document(html);
    if let Some(table) = find_table(&doc, table_id) {
        return parse_table(table, table_id);
    }

    for fragment in commented_fragments(&doc, table_id) {
        let frag = Html::parse_fragment(&fragment);
        if let Some(table) = find_table(&frag, table_id) {
            debug!(table_id, "table found inside an HTML comment");
            return parse_table(table, table_id);
        }
    }

    Err(ScrapeError::NotFound {
        table_id: table_id.to_string(),
    })
}

fn find_table<'a>(doc: &'a Html, table_id: &str) -> Option<ElementRef<'a>> {
    doc.select(&TABLES)
        .find(|t| t.value().attr("id") == Some(table_id))
}

fn commented_fragments(doc: &Html, table_id: &str) -> Vec<String> {
    let markers = [format!(r#"id="{table_id}""#), format!("id='{table_id}'")];
    doc.tree
        .nodes()
        .filter_map(|node| match node.value() {
            Node::Comment(c) => {
                let text: &str = c;
                markers
                    .iter()
                    .any(|m| text.contains(m.as_str()))
                    .then(|| text.to_string())
            }
            _ => None,
        })
        .collect()
}

fn malformed(table_id: &str, reason: &str) -> ScrapeError {
    ScrapeError::MalformedTable {
        table_id: table_id.to_string(),
        reason: reason.to_string(),
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_table(table: ElementRef<'_>, table_id: &str) -> Result<Table> {
    let thead = table
        .select(&THEAD)
        .next()
        .ok_or_else(|| malformed(table_id, "missing <thead>"))?;

    let mut columns: Vec<String> = Vec::new();
    // first header cell is the rank
    for th in thead.select(&HEADER_CELLS).skip(1) {
        let stat = th
            .value()
            .attr("data-stat")
            .ok_or_else(|| malformed(table_id, "header cell without data-stat"))?;
        if columns.iter().any(|c| c == stat) {
            debug!(table_id, column = stat, "duplicate header, keeping the first");
            continue;
        }
        columns.push(stat.to_string());
    }

    let tbody = table
        .select(&TBODY)
        .next()
        .ok_or_else(|| malformed(table_id, "missing <tbody>"))?;

    let mut out = Table::new(table_id, columns);
    let mut dropped = 0usize;

    for tr in tbody.select(&ROWS) {
        let mut cells: HashMap<&str, String> = HashMap::new();
        for td in tr.select(&DATA_CELLS) {
            if let Some(stat) = td.value().attr("data-stat") {
                cells.entry(stat).or_insert_with(|| cell_text(td));
            }
        }

        let mut row = Row::default();
        let mut complete = true;
        for column in out.columns() {
            match cells.remove(column.as_str()) {
                Some(text) => row.set(column, Value::Text(text)),
                None => {
                    complete = false;
                    break;
                }
            }
        }

        if complete {
            out.push_row(row);
        } else {
            trace!(table_id, "dropping incomplete row");
            dropped += 1;
        }
    }

    debug!(
        table_id,
        columns = out.columns().len(),
        rows = out.len(),
        dropped,
        "extracted table"
    );
    Ok(out)
}
