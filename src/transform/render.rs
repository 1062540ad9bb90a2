use crate::domain::model::{PriceCell, SailingRecord, TableLayout};
use html_escape::encode_text;

pub const LOWEST_PRICE_STYLE: &str = "border:dashed 3px green;";

pub fn render_section(heading: &str, rows: &[SailingRecord], layout: TableLayout) -> String {
    let mut html = String::new();

    html.push_str(&format!("<h3>{}</h3>", encode_text(heading)));
    html.push_str("<table>");
    html.push_str(&render_header(layout));
    html.push_str("<tbody>");
    for row in rows {
        html.push_str(&render_row(row));
    }
    html.push_str("</tbody></table>");

    html
}

fn render_header(layout: TableLayout) -> String {
    let tiers: String = layout
        .price_tiers()
        .iter()
        .map(|tier| format!("<th>{}</th>", tier))
        .collect();

    format!("<thead><tr><th>Date</th><th>Day</th>{}</tr></thead>", tiers)
}

fn render_row(row: &SailingRecord) -> String {
    let date = row.date_text.as_deref().unwrap_or_default();
    let prices: String = row.price_cells.iter().map(render_price_cell).collect();

    format!(
        "<tr><td>{}</td><td>{}</td>{}</tr>",
        encode_text(date),
        encode_text(&row.day_of_week),
        prices
    )
}

fn render_price_cell(cell: &PriceCell) -> String {
    if cell.is_lowest {
        format!(
            "<td style=\"{}\">{}</td>",
            LOWEST_PRICE_STYLE,
            encode_text(&cell.display_text)
        )
    } else {
        format!("<td>{}</td>", encode_text(&cell.display_text))
    }
}
