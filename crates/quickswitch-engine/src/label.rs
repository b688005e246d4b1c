//! Picker label templates.
//!
//! A template is literal text with `{index}`, `{type}`, `{title}`, `{url}`
//! and `{device}` placeholders. `{index}` is zero-padded to the digit width
//! of the whole menu. Unknown placeholders are kept verbatim.

use std::{convert::Infallible, fmt, mem, str::FromStr};

use quickswitch_picker::pad_index;
pub use quickswitch_protocol::DEFAULT_TEMPLATE;
use quickswitch_protocol::Suggestion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Index,
    Type,
    Title,
    Url,
    Device,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "index" => Self::Index,
            "type" => Self::Type,
            "title" => Self::Title,
            "url" => Self::Url,
            "device" => Self::Device,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A parsed label template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl LabelTemplate {
    /// Parse `source`. Parsing never fails; stray braces are literal text.
    pub fn new(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;
        while let Some(open) = rest.find('{') {
            text.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}').and_then(|close| Some((close, Field::parse(&after[..close])?))) {
                Some((close, field)) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(mem::take(&mut text)));
                    }
                    segments.push(Segment::Field(field));
                    rest = &after[close + 1..];
                }
                None => {
                    text.push('{');
                    rest = after;
                }
            }
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// Template text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the label for `item` at `index` in a menu of digit width `width`.
    ///
    /// Line breaks inside substituted values become spaces so one item is
    /// always one picker line.
    pub fn render(&self, item: &Suggestion, index: usize, width: usize) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Field(Field::Index) => out.push_str(&pad_index(index, width)),
                Segment::Field(Field::Type) => out.push_str(item.kind().label()),
                Segment::Field(Field::Title) => push_value(&mut out, item.title()),
                Segment::Field(Field::Url) => push_value(&mut out, item.url()),
                Segment::Field(Field::Device) => {
                    push_value(&mut out, item.device_name().unwrap_or_default());
                }
            }
        }
        out
    }
}

fn push_value(out: &mut String, value: &str) {
    out.extend(value.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
}

impl Default for LabelTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl FromStr for LabelTemplate {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for LabelTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use quickswitch_ids::{SessionId, TabId, WindowId};

    use super::*;

    fn tab() -> Suggestion {
        Suggestion::OpenTab {
            tab_id: TabId::new(1),
            window_id: WindowId::new(1),
            title: "Docs".into(),
            url: "https://docs.test".into(),
        }
    }

    #[test]
    fn default_template_pads_index() {
        let t = LabelTemplate::default();
        assert_eq!(t.render(&tab(), 3, 2), "03 Open tab Docs https://docs.test");
    }

    #[test]
    fn device_placeholder() {
        let t = LabelTemplate::new("{device}: {title}");
        let synced = Suggestion::SyncedTab {
            device_name: "phone".into(),
            session_id: SessionId::new("s"),
            title: "News".into(),
            url: "u".into(),
        };
        assert_eq!(t.render(&synced, 0, 1), "phone: News");
        assert_eq!(t.render(&tab(), 0, 1), ": Docs");
    }

    #[test]
    fn unknown_and_stray_braces_are_literal() {
        let t = LabelTemplate::new("{x} {title} {");
        assert_eq!(t.render(&tab(), 0, 1), "{x} Docs {");
    }

    #[test]
    fn values_are_not_expanded_again() {
        let item = Suggestion::Bookmark {
            title: "{url}\nline".into(),
            url: "u".into(),
        };
        assert_eq!(LabelTemplate::new("{title}").render(&item, 0, 1), "{url} line");
    }
}
