//! HTML card rendering for the results area.
//!
//! Output is a fragment meant to replace the contents of the results
//! container. All catalog text is escaped before interpolation.

use crate::catalog::Place;

/// Address value used in the catalog for entries still missing one.
pub const ADDRESS_PLACEHOLDER: &str = "(à compléter)";

pub const EMPTY_STATE_HTML: &str = r#"<div class="box" style="text-align: center;">
  <p class="lead">Je n'ai rien de parfaitement aligné avec ces critères…</p>
  <p class="muted">Essaie en élargissant : budget "peu importe" ou énergie "neutre".</p>
</div>"#;

pub const APOLOGY_HTML: &str = r#"<div class="box" style="text-align: center;">
  <p class="lead">Oups. L'outil n'a pas chargé.</p>
  <p class="muted">Recharge la page (et je corrige de mon côté).</p>
</div>"#;

pub fn render_cards<'a, I>(places: I) -> String
where
    I: IntoIterator<Item = &'a Place>,
{
    let mut cards = String::new();
    for place in places {
        cards.push_str(&render_card(place));
    }
    if cards.is_empty() {
        return EMPTY_STATE_HTML.to_string();
    }
    format!("<div class=\"cards\">\n{cards}</div>")
}

pub fn render_card(place: &Place) -> String {
    let budget = place.budget.map(|b| b.symbol()).unwrap_or("");
    let mut html = format!(
        "<article class=\"cardx\">\n  <div class=\"cardx__top\">\n    <div>\n      \
         <h3 class=\"cardx__title\">{}</h3>\n      \
         <div class=\"cardx__meta\">{} · {} · {}</div>\n    </div>\n    \
         <div class=\"chip {}\">Solo-friendly</div>\n  </div>\n  \
         <p class=\"cardx__desc\">{}</p>\n",
        escape_html(&place.name),
        escape_html(&place.area),
        escape_html(budget),
        escape_html(&place.category),
        category_chip_class(&place.category),
        escape_html(&place.solo_why),
    );
    if !place.transit.is_empty() {
        html.push_str(&format!(
            "  <div class=\"cardx__meta\">{}</div>\n",
            escape_html(&place.transit.join(" · "))
        ));
    }
    if let Some(address) = visible_address(place) {
        html.push_str(&format!("  <div class=\"fine\">{}</div>\n", escape_html(address)));
    }
    html.push_str("  <div class=\"cardx__actions\">\n");
    if let Some(website) = place.website() {
        html.push_str(&format!(
            "    <a class=\"btn btn--ghost btn--sm\" href=\"{}\" target=\"_blank\" rel=\"noopener\">Site</a>\n",
            escape_html(website)
        ));
    }
    html.push_str(&format!(
        "    <button class=\"btn btn--solid btn--sm\" data-copy=\"{}\">Copier</button>\n",
        escape_html(&place.copy_text())
    ));
    html.push_str("  </div>\n</article>\n");
    html
}

pub fn category_chip_class(category: &str) -> &'static str {
    match category {
        "cafe" | "restaurant" => "chip--cafe",
        "museum" | "culture" | "library" => "chip--museum",
        _ => "",
    }
}

fn visible_address(place: &Place) -> Option<&str> {
    let address = place.address.trim();
    if address.is_empty() || address == ADDRESS_PLACEHOLDER {
        None
    } else {
        Some(address)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
