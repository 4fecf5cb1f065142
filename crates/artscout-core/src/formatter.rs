// Turns an ObjectRecord into display rows and card text. Pure functions only.
use crate::models::{non_empty, ObjectId, ObjectRecord};
use serde::Serialize;

/// Separator between artist, date and department in a card caption
pub const CAPTION_SEPARATOR: &str = " · ";

/// One labelled line in the details panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// What a grid card shows before the details are expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub object_id: ObjectId,
    pub title: String,
    pub caption: String,
    pub image_url: Option<String>,
}

/// A raw field value before the emptiness check
enum FieldValue<'a> {
    Text(Option<&'a str>),
    List(Vec<&'a str>),
    /// Shown regardless of content
    Always(String),
}

impl FieldValue<'_> {
    /// `None` for anything absent or empty, so the row gets skipped
    fn render(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => text.filter(|s| !s.is_empty()).map(str::to_string),
            FieldValue::List(items) => {
                let items: Vec<&str> = items.into_iter().filter(|s| !s.is_empty()).collect();
                if items.is_empty() {
                    None
                } else {
                    Some(items.join(", "))
                }
            }
            FieldValue::Always(value) => Some(value),
        }
    }
}

fn text(value: &Option<String>) -> FieldValue<'_> {
    FieldValue::Text(value.as_deref())
}

/// Present values joined by `separator`; empty when none are present
fn join_present(values: &[&Option<String>], separator: &str) -> String {
    values
        .iter()
        .filter_map(|value| non_empty(value))
        .collect::<Vec<_>>()
        .join(separator)
}

/// "Monet · 1899 · European Paintings", skipping whatever is missing
pub fn caption(record: &ObjectRecord) -> String {
    join_present(
        &[
            &record.artist_display_name,
            &record.object_date,
            &record.department,
        ],
        CAPTION_SEPARATOR,
    )
}

/// Begin/end years as "{begin} – {end}"
///
/// Unlike every other detail row this one is never suppressed, even with
/// one or both years missing. A missing year renders as "?", never as a
/// placeholder word like "None", so `1850 – ?` still reads as a date range.
pub fn date_span(record: &ObjectRecord) -> String {
    let year = |value: Option<i64>| value.map_or_else(|| "?".to_string(), |y| y.to_string());
    format!(
        "{} – {}",
        year(record.object_begin_date),
        year(record.object_end_date)
    )
}

pub fn card(record: &ObjectRecord) -> Card {
    Card {
        object_id: record.object_id,
        title: record.display_title().to_string(),
        caption: caption(record),
        image_url: record.image_url().map(str::to_string),
    }
}

/// Rows for the details panel, in display order
///
/// Fields that are absent, empty strings, or empty lists produce no row.
/// Tags are joined with ", ". The begin/end date span is the one exception
/// and is always present.
pub fn format_details(record: &ObjectRecord) -> Vec<DetailRow> {
    let culture_period = join_present(&[&record.culture, &record.period], ", ");
    let geography = join_present(
        &[&record.city, &record.state, &record.country, &record.region],
        ", ",
    );

    let fields: Vec<(&'static str, FieldValue<'_>)> = vec![
        ("Artist", text(&record.artist_display_name)),
        ("Artist Bio", text(&record.artist_display_bio)),
        ("Title", text(&record.title)),
        ("Object Name", text(&record.object_name)),
        ("Department", text(&record.department)),
        ("Object Date", text(&record.object_date)),
        ("Object Begin–End Date", FieldValue::Always(date_span(record))),
        ("Medium", text(&record.medium)),
        ("Measurements", text(&record.dimensions)),
        ("Culture/Period", FieldValue::Text(Some(culture_period.as_str()))),
        ("Geography", FieldValue::Text(Some(geography.as_str()))),
        ("Accession Number", text(&record.accession_number)),
        ("Accession Year", text(&record.accession_year)),
        ("Credit Line", text(&record.credit_line)),
        (
            "Tags",
            FieldValue::List(record.tags.iter().map(String::as_str).collect()),
        ),
    ];

    fields
        .into_iter()
        .filter_map(|(label, value)| value.render().map(|value| DetailRow { label, value }))
        .collect()
}
