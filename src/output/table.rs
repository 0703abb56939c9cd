use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::catalog::Place;
use crate::engine::{Contribution, ScoredPlace};

pub fn render_picks_table(picks: &[ScoredPlace]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Place", "Area", "Budget", "Category", "Score", "Why solo"]);

    for pick in picks {
        let score_cell = if pick.score > 0 {
            Cell::new(pick.score).fg(Color::Green)
        } else {
            Cell::new(pick.score).fg(Color::Yellow)
        };
        table.add_row(Row::from(vec![
            Cell::new(&pick.place.name),
            Cell::new(&pick.place.area),
            Cell::new(budget_label(&pick.place)),
            Cell::new(&pick.place.category),
            score_cell,
            Cell::new(&pick.place.solo_why),
        ]));
    }
    table.to_string()
}

pub fn render_places_table(places: &[Place]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Id",
        "Place",
        "Area",
        "Budget",
        "Minutes",
        "Moments",
        "Rain",
        "Energy",
    ]);

    for place in places {
        table.add_row(vec![
            place.id.clone(),
            place.name.clone(),
            place.area.clone(),
            budget_label(place),
            format!("{}-{}", place.duration.min, place.duration.max),
            place.time_of_day.join(", "),
            match place.rainy_ok {
                Some(true) => "yes".to_string(),
                Some(false) => "no".to_string(),
                None => "-".to_string(),
            },
            place
                .social_energy
                .map(|level| level.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_explain_table(name: &str, breakdown: &[Contribution]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![name, "Points"]);
    for contribution in breakdown {
        table.add_row(vec![
            format!("{:?}", contribution.criterion).to_lowercase(),
            contribution.points.to_string(),
        ]);
    }
    let total: u32 = breakdown.iter().map(|c| c.points).sum();
    table.add_row(vec!["total".to_string(), total.to_string()]);
    table.to_string()
}

fn budget_label(place: &Place) -> String {
    place
        .budget
        .map(|tier| tier.to_string())
        .unwrap_or_else(|| "-".to_string())
}
