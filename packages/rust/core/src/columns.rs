//! The fixed set of columns every enriched table carries, with their defaults.
//!
//! Media/contact columns come first, then the TripAdvisor validation block.
//! The validation columns are placeholders until real matching exists.

use crate::table::Value;

/// A column the enricher guarantees, and the value it fills when absent.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentColumn {
    pub name: &'static str,
    pub default: DefaultValue,
}

/// `const`-friendly form of [`Value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Null,
    Text(&'static str),
    Number(f64),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(s) => Value::text(s),
            Self::Number(n) => Value::Number(n),
        }
    }
}

/// Serialized list of gallery image URLs.
const DEFAULT_GALLERY: &str = r#"["https://images.unsplash.com/photo-1552566626-52f8b828add9", "https://images.unsplash.com/photo-1514362545857-3bc16c4c7d1b"]"#;

/// Serialized day -> hours mapping.
const DEFAULT_OPENING_HOURS: &str =
    r#"{"Mon": "9:00 - 23:00", "Tue": "9:00 - 23:00", "Wed": "9:00 - 23:00"}"#;

pub const MEDIA_COLUMNS: &[EnrichmentColumn] = &[
    EnrichmentColumn {
        name: "cover_image",
        default: DefaultValue::Text(
            "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4",
        ),
    },
    EnrichmentColumn {
        name: "menu_url",
        default: DefaultValue::Text("https://example.com/menu"),
    },
    EnrichmentColumn {
        name: "menu_pdf_url",
        default: DefaultValue::Null,
    },
    EnrichmentColumn {
        name: "gallery_images",
        default: DefaultValue::Text(DEFAULT_GALLERY),
    },
    EnrichmentColumn {
        name: "phone",
        default: DefaultValue::Text("+44 20 7123 4567"),
    },
    EnrichmentColumn {
        name: "opening_hours",
        default: DefaultValue::Text(DEFAULT_OPENING_HOURS),
    },
];

pub const VALIDATION_COLUMNS: &[EnrichmentColumn] = &[
    EnrichmentColumn {
        name: "tripadvisor_status",
        default: DefaultValue::Text("pending"),
    },
    EnrichmentColumn {
        name: "tripadvisor_url",
        default: DefaultValue::Null,
    },
    EnrichmentColumn {
        name: "tripadvisor_confidence",
        default: DefaultValue::Number(0.0),
    },
    EnrichmentColumn {
        name: "tripadvisor_distance_m",
        default: DefaultValue::Null,
    },
    EnrichmentColumn {
        name: "tripadvisor_match_notes",
        default: DefaultValue::Null,
    },
];

/// Every enrichment column, in the order they are appended.
pub fn enrichment_columns() -> impl Iterator<Item = &'static EnrichmentColumn> {
    MEDIA_COLUMNS.iter().chain(VALIDATION_COLUMNS)
}

/// Names of every enrichment column, in append order.
pub fn column_names() -> impl Iterator<Item = &'static str> {
    enrichment_columns().map(|c| c.name)
}
