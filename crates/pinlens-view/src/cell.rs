//! Typed cell rendering
//!
//! One exhaustive match over [`ColumnType`] turns a raw field value into a
//! [`CellContent`]. Content keeps raw text; [`CellContent::to_html`] is the
//! only place that escapes it.

use crate::format::{format_date, format_number, truncate, PLACEHOLDER};
use pinlens_schema::value::{coerce_string, is_blank, is_truthy, parse_timestamp, strict_number};
use pinlens_schema::{escape_html, ColumnDescriptor, ColumnType, Record, TableKind};
use serde::Serialize;
use serde_json::Value;

/// Text longer than this is truncated and made expandable
pub const TEXT_LIMIT: usize = 80;

/// URL display text longer than this is truncated
pub const URL_LIMIT: usize = 35;

/// Linked records shown before the "+N more" chip
pub const LINKED_LIMIT: usize = 3;

/// Shown for attachments without a usable image
pub const ATTACHMENT_ICON: &str = "📎";

/// URL schemes rendered as live links and image sources
pub const LINK_SCHEMES: [&str; 3] = ["https://", "http://", "mailto:"];

/// Checkbox glyphs
pub const CHECK_TRUE: &str = "✓";
/// Checkbox glyphs
pub const CHECK_FALSE: &str = "✗";

/// Status chip category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// Running, live or done
    Active,
    /// Stopped or failed
    Inactive,
    /// Retired
    Archived,
    /// Anything else
    Pending,
}

const ACTIVE_WORDS: &[&str] = &[
    "active", "live", "published", "posted", "approved", "complete", "completed", "done", "ready",
];
const INACTIVE_WORDS: &[&str] = &[
    "inactive", "paused", "failed", "rejected", "cancelled", "canceled", "stopped", "disabled",
];
const ARCHIVED_WORDS: &[&str] = &["archived", "deprecated", "retired"];

impl StatusTone {
    /// Classify a select value (lowercased, spaces and hyphens removed)
    #[must_use]
    pub fn classify(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        if ACTIVE_WORDS.contains(&key.as_str()) {
            Self::Active
        } else if INACTIVE_WORDS.contains(&key.as_str()) {
            Self::Inactive
        } else if ARCHIVED_WORDS.contains(&key.as_str()) {
            Self::Archived
        } else {
            Self::Pending
        }
    }

    /// CSS modifier name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
            Self::Pending => "pending",
        }
    }
}

/// Rendered cell before escaping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellContent {
    /// Absent value
    Placeholder,
    /// Plain or fallback text
    Text {
        /// Display text (truncated when expandable)
        text: String,
        /// Reference id of the full text, when truncated
        expand_ref: Option<String>,
    },
    /// Locale-formatted number
    Number(String),
    /// Short human date
    Date(String),
    /// Status chip
    Status {
        /// Literal select value
        label: String,
        /// Chip category
        tone: StatusTone,
    },
    /// Checkbox glyph
    Check(bool),
    /// Hyperlink
    Link {
        /// Full target
        href: String,
        /// Display text, possibly truncated
        text: String,
    },
    /// First attachment's thumbnail, or the icon when none
    Attachment {
        /// Image source
        thumbnail: Option<String>,
    },
    /// Linked record chips
    Linked {
        /// Up to three entries
        chips: Vec<String>,
        /// Entries not shown
        more: usize,
    },
}

impl CellContent {
    /// HTML-safe markup
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Placeholder => format!(r#"<span class="cell-empty">{PLACEHOLDER}</span>"#),
            Self::Text {
                text,
                expand_ref: None,
            } => escape_html(text),
            Self::Text {
                text,
                expand_ref: Some(id),
            } => format!(
                r#"<span class="cell-expandable" data-ref="{}">{}</span>"#,
                escape_html(id),
                escape_html(text)
            ),
            Self::Number(text) | Self::Date(text) => escape_html(text),
            Self::Status { label, tone } => format!(
                r#"<span class="status-chip status-{}">{}</span>"#,
                tone.as_str(),
                escape_html(label)
            ),
            Self::Check(value) => {
                let (class, glyph) = if *value {
                    ("check-true", CHECK_TRUE)
                } else {
                    ("check-false", CHECK_FALSE)
                };
                format!(r#"<span class="{class}">{glyph}</span>"#)
            }
            Self::Link { href, text } if is_safe_href(href) => format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                escape_html(href),
                escape_html(text)
            ),
            Self::Link { text, .. } => escape_html(text),
            Self::Attachment {
                thumbnail: Some(src),
            } if is_safe_href(src) => {
                format!(r#"<img class="cell-thumb" src="{}" alt="">"#, escape_html(src))
            }
            Self::Attachment { .. } => {
                format!(r#"<span class="cell-icon">{ATTACHMENT_ICON}</span>"#)
            }
            Self::Linked { chips, more } => {
                let mut html: String = chips
                    .iter()
                    .map(|chip| format!(r#"<span class="link-chip">{}</span>"#, escape_html(chip)))
                    .collect();
                if *more > 0 {
                    html.push_str(&format!(r#"<span class="link-chip more">+{more} more</span>"#));
                }
                html
            }
        }
    }

    /// Unescaped display text, for terminals
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Placeholder => PLACEHOLDER.to_string(),
            Self::Text { text, .. }
            | Self::Number(text)
            | Self::Date(text)
            | Self::Link { text, .. } => text.clone(),
            Self::Status { label, .. } => label.clone(),
            Self::Check(true) => CHECK_TRUE.to_string(),
            Self::Check(false) => CHECK_FALSE.to_string(),
            Self::Attachment { thumbnail } => thumbnail
                .clone()
                .unwrap_or_else(|| ATTACHMENT_ICON.to_string()),
            Self::Linked { chips, more } => {
                let mut text = chips.join(", ");
                if *more > 0 {
                    text.push_str(&format!(" +{more} more"));
                }
                text
            }
        }
    }
}

/// Rendered cell tagged with its column type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    /// Column key
    pub column: &'static str,
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Structured content
    pub content: CellContent,
    /// Escaped markup of `content`
    pub html: String,
    /// Full text of an expandable cell
    #[serde(skip)]
    pub full_text: Option<String>,
}

/// Stable reference id for a truncated text cell
#[must_use]
pub fn expand_ref(table: TableKind, record_id: &str, column: &str) -> String {
    format!("{}:{record_id}:{column}", table.slug())
}

/// Render one column of one record
#[must_use]
pub fn render_cell(table: TableKind, column: &'static ColumnDescriptor, record: &Record) -> RenderedCell {
    let raw = record.get(column.key);
    let mut full_text = None;

    let content = if is_blank(raw) && !column.column_type.is_computed() {
        CellContent::Placeholder
    } else {
        match column.column_type {
            ColumnType::Text => {
                let text = raw.map(coerce_string).unwrap_or_default();
                match truncate(&text, TEXT_LIMIT) {
                    Some(short) => {
                        full_text = Some(text);
                        CellContent::Text {
                            text: short,
                            expand_ref: Some(expand_ref(table, &record.id, column.key)),
                        }
                    }
                    None => CellContent::Text {
                        text,
                        expand_ref: None,
                    },
                }
            }
            ColumnType::Number => match raw.and_then(strict_number) {
                Some(n) => CellContent::Number(format_number(n)),
                None => raw_text(raw),
            },
            ColumnType::Date => match raw.and_then(parse_timestamp) {
                Some(date) => CellContent::Date(format_date(&date)),
                None => raw_text(raw),
            },
            ColumnType::Select => {
                let label = raw.map(coerce_string).unwrap_or_default();
                CellContent::Status {
                    tone: StatusTone::classify(&label),
                    label,
                }
            }
            ColumnType::Checkbox => CellContent::Check(is_truthy(raw)),
            ColumnType::Url => {
                let href = raw.map(coerce_string).unwrap_or_default();
                if is_safe_href(&href) {
                    CellContent::Link {
                        text: truncate(&href, URL_LIMIT).unwrap_or_else(|| href.clone()),
                        href,
                    }
                } else {
                    CellContent::Text {
                        text: href,
                        expand_ref: None,
                    }
                }
            }
            ColumnType::Attachment => CellContent::Attachment {
                thumbnail: raw
                    .and_then(attachment_thumbnail)
                    .filter(|src| is_safe_href(src)),
            },
            ColumnType::Linked => linked_chips(raw),
        }
    };

    RenderedCell {
        column: column.key,
        column_type: column.column_type,
        html: content.to_html(),
        content,
        full_text,
    }
}

/// Whether a URL may be used as a link target or image source
///
/// Only [`LINK_SCHEMES`] qualify; `javascript:`, `data:` and relative
/// values do not.
#[must_use]
pub fn is_safe_href(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    LINK_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

fn raw_text(raw: Option<&Value>) -> CellContent {
    CellContent::Text {
        text: raw.map(coerce_string).unwrap_or_default(),
        expand_ref: None,
    }
}

/// Thumbnail of the first attachment, falling back to its full URL
fn attachment_thumbnail(raw: &Value) -> Option<String> {
    let first = raw.as_array()?.first()?;
    let thumbnails = first.get("thumbnails");
    ["small", "large"]
        .iter()
        .find_map(|size| {
            thumbnails
                .and_then(|t| t.get(size))
                .and_then(|t| t.get("url"))
                .and_then(Value::as_str)
        })
        .or_else(|| first.get("url").and_then(Value::as_str))
        .map(str::to_string)
}

fn linked_chips(raw: Option<&Value>) -> CellContent {
    let entries: Vec<String> = match raw {
        Some(Value::Array(items)) => items.iter().map(coerce_string).collect(),
        Some(other) => vec![coerce_string(other)],
        None => Vec::new(),
    };
    let more = entries.len().saturating_sub(LINKED_LIMIT);
    CellContent::Linked {
        chips: entries.into_iter().take(LINKED_LIMIT).collect(),
        more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ELLIPSIS;
    use pinlens_schema::describe;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cell(kind: TableKind, key: &str, fields: Value) -> RenderedCell {
        let column = describe(kind).column(key).unwrap();
        render_cell(kind, column, &Record::from_json("rec1", fields))
    }

    fn pin_cell(key: &str, fields: Value) -> RenderedCell {
        cell(TableKind::CompetitorPins, key, fields)
    }

    #[test]
    fn blank_values_render_placeholder() {
        for key in ["Pin Title", "Saves", "Date Collected", "Status", "Pin URL", "Image"] {
            let rendered = pin_cell(key, json!({ key: "" }));
            assert_eq!(rendered.content, CellContent::Placeholder, "{key}");
            assert!(rendered.html.contains(PLACEHOLDER));
        }
        assert_eq!(pin_cell("Pin Analysis", json!({})).content, CellContent::Placeholder);
    }

    #[test]
    fn checkbox_is_never_placeholder() {
        assert_eq!(pin_cell("Analyzed", json!({})).content, CellContent::Check(false));
        assert_eq!(
            pin_cell("Analyzed", json!({"Analyzed": true})).html,
            r#"<span class="check-true">✓</span>"#
        );
    }

    #[test]
    fn long_text_is_expandable() {
        let long = "x".repeat(81);
        let rendered = pin_cell("Pin Description", json!({ "Pin Description": long }));
        let CellContent::Text { text, expand_ref } = &rendered.content else {
            panic!("expected text");
        };
        assert_eq!(text.chars().count(), 81);
        assert!(text.ends_with(ELLIPSIS));
        assert_eq!(expand_ref.as_deref(), Some("competitor-pins:rec1:Pin Description"));
        assert_eq!(rendered.full_text.as_deref(), Some(long.as_str()));
    }

    #[test]
    fn text_at_limit_is_kept() {
        let exact = "y".repeat(80);
        let rendered = pin_cell("Pin Description", json!({ "Pin Description": exact }));
        assert_eq!(rendered.html, exact);
        assert!(rendered.full_text.is_none());
    }

    #[test]
    fn text_is_escaped() {
        let rendered = pin_cell("Pin Title", json!({"Pin Title": "<b>Tips & \"Tricks\"</b>"}));
        assert_eq!(
            rendered.html,
            "&lt;b&gt;Tips &amp; &quot;Tricks&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn numbers_format_or_fall_back() {
        assert_eq!(pin_cell("Saves", json!({"Saves": 1520})).html, "1,520");
        assert_eq!(pin_cell("Saves", json!({"Saves": "2500.75"})).html, "2,500.75");
        assert_eq!(pin_cell("Saves", json!({"Saves": "lots<"})).html, "lots&lt;");
    }

    #[test]
    fn dates_format_or_fall_back() {
        assert_eq!(
            pin_cell("Date Collected", json!({"Date Collected": "2024-01-15"})).html,
            "Jan 15, 2024"
        );
        assert_eq!(
            pin_cell("Date Collected", json!({"Date Collected": "2024-02-10T08:15:00.000Z"})).html,
            "Feb 10, 2024"
        );
        assert_eq!(
            pin_cell("Date Collected", json!({"Date Collected": "last week"})).html,
            "last week"
        );
    }

    #[test]
    fn status_tones() {
        assert_eq!(StatusTone::classify("Active"), StatusTone::Active);
        assert_eq!(StatusTone::classify("Posted"), StatusTone::Active);
        assert_eq!(StatusTone::classify("Can-celled"), StatusTone::Inactive);
        assert_eq!(StatusTone::classify("Paused"), StatusTone::Inactive);
        assert_eq!(StatusTone::classify(" Archived "), StatusTone::Archived);
        assert_eq!(StatusTone::classify("Queued"), StatusTone::Pending);

        let rendered = pin_cell("Status", json!({"Status": "Paused"}));
        assert_eq!(rendered.html, r#"<span class="status-chip status-inactive">Paused</span>"#);
    }

    #[test]
    fn urls_truncate_display_only() {
        let url = "https://example.com/pins/budget-hacks-for-families-2024";
        let rendered = pin_cell("Pin URL", json!({"Pin URL": url}));
        let CellContent::Link { href, text } = &rendered.content else {
            panic!("expected link");
        };
        assert_eq!(href, url);
        assert_eq!(text, "https://example.com/pins/budget-hac…");
    }

    #[test]
    fn script_urls_are_not_links() {
        for url in [
            "javascript:alert(document.cookie)",
            " JavaScript:alert(1)",
            "data:text/html;base64,PHNjcmlwdD4=",
        ] {
            let rendered = pin_cell("Pin URL", json!({"Pin URL": url}));
            assert_eq!(
                rendered.content,
                CellContent::Text { text: url.into(), expand_ref: None }
            );
            assert!(!rendered.html.contains("href"));
        }

        let forged = CellContent::Link {
            href: "javascript:alert(1)".into(),
            text: "click".into(),
        };
        assert_eq!(forged.to_html(), "click");

        let mail = pin_cell("Pin URL", json!({"Pin URL": "mailto:team@example.com"}));
        assert!(mail.html.starts_with(r#"<a href="mailto:team@example.com""#));
    }

    #[test]
    fn unsafe_thumbnails_fall_back_to_icon() {
        let rendered = pin_cell("Image", json!({"Image": [{"url": "javascript:alert(1)"}]}));
        assert_eq!(rendered.content, CellContent::Attachment { thumbnail: None });
        assert!(rendered.html.contains(ATTACHMENT_ICON));
        assert!(!rendered.html.contains("<img"));
    }

    #[test]
    fn attachments_prefer_thumbnail() {
        let with_thumb = json!({"Image": [{
            "url": "https://cdn/full.jpg",
            "thumbnails": {"small": {"url": "https://cdn/small.jpg"}}
        }]});
        assert_eq!(
            pin_cell("Image", with_thumb).content,
            CellContent::Attachment { thumbnail: Some("https://cdn/small.jpg".into()) }
        );

        let bare = json!({"Image": [{"url": "https://cdn/full.jpg"}]});
        assert_eq!(
            pin_cell("Image", bare).content,
            CellContent::Attachment { thumbnail: Some("https://cdn/full.jpg".into()) }
        );

        let odd = pin_cell("Image", json!({"Image": "not-an-array"}));
        assert_eq!(odd.content, CellContent::Attachment { thumbnail: None });
        assert!(odd.html.contains(ATTACHMENT_ICON));
    }

    #[test]
    fn linked_shows_three_and_more() {
        let rendered = pin_cell(
            "Pin Analysis",
            json!({"Pin Analysis": ["a", "b", "c", "d", "e"]}),
        );
        assert_eq!(
            rendered.content,
            CellContent::Linked {
                chips: vec!["a".into(), "b".into(), "c".into()],
                more: 2
            }
        );
        assert!(rendered.html.ends_with(r#"<span class="link-chip more">+2 more</span>"#));
        assert_eq!(rendered.content.to_text(), "a, b, c +2 more");
    }

    #[test]
    fn plain_text_is_unescaped() {
        let rendered = pin_cell("Pin Title", json!({"Pin Title": "Tips & <tricks>"}));
        assert_eq!(rendered.content.to_text(), "Tips & <tricks>");
        assert_eq!(rendered.html, "Tips &amp; &lt;tricks&gt;");
        assert_eq!(CellContent::Check(false).to_text(), CHECK_FALSE);
        assert_eq!(CellContent::Placeholder.to_text(), PLACEHOLDER);
    }
}
