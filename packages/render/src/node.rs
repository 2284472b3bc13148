use chrono::{DateTime, Utc};
use pagekit_blocks::{Block, LinkTarget, Properties, TimelineItem};
use serde::Serialize;
use serde_json::Value;

/// What a block shows, independent of how it is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Content {
    Text {
        content: String,
    },

    /// `text-query` before its placeholder is filled (editor only)
    TextTemplate {
        content: String,
        query: String,
        fallback: String,
    },

    Image {
        file: String,
        alt: String,
    },

    Link {
        label: String,
        url: String,
        target: LinkTarget,
    },

    Timeline {
        items: Vec<TimelineItem>,
    },

    Countdown {
        date: Option<DateTime<Utc>>,
    },

    Gallery {
        images: Vec<String>,
    },

    GradientTitle {
        content: String,
        from: String,
        to: String,
    },

    ElegantTitle {
        content: String,
        subtitle: String,
    },

    Rsvp,

    /// `group` or `row`; the children live on the node
    Container {
        direction: Direction,
    },

    /// Stored type this build has no renderer for
    Placeholder {
        block_type: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Column,
    Row,
}

impl Content {
    /// Content of `block` with `text-query` left unresolved
    pub fn of(block: &Block) -> Self {
        match &block.properties {
            Properties::Text(p) => Content::Text {
                content: p.content.clone(),
            },
            Properties::TextQuery(p) => Content::TextTemplate {
                content: p.content.clone(),
                query: p.query.clone(),
                fallback: p.fallback.clone(),
            },
            Properties::Group(_) => Content::Container {
                direction: Direction::Column,
            },
            Properties::Row(_) => Content::Container {
                direction: Direction::Row,
            },
            Properties::Image(p) => Content::Image {
                file: p.file.clone(),
                alt: p.alt.clone().unwrap_or_default(),
            },
            Properties::Link(p) => Content::Link {
                label: p.label.clone(),
                url: p.url.clone(),
                target: p.target,
            },
            Properties::Timeline(p) => Content::Timeline {
                items: p.items.clone(),
            },
            Properties::Countdown(p) => Content::Countdown { date: p.target() },
            Properties::Gallery(p) => Content::Gallery {
                images: p.images.clone(),
            },
            Properties::Rsvp(_) => Content::Rsvp,
            Properties::GradientTitle(p) => Content::GradientTitle {
                content: p.content.clone(),
                from: p.from.clone(),
                to: p.to.clone(),
            },
            Properties::ElegantTitle(p) => Content::ElegantTitle {
                content: p.content.clone(),
                subtitle: p.subtitle.clone(),
            },
            Properties::Unknown { tag, .. } => Content::Placeholder {
                block_type: tag.clone(),
            },
        }
    }

    /// One-line description for outlines
    pub fn summary(&self) -> String {
        match self {
            Content::Text { content } => quote(content),
            Content::TextTemplate { content, query, .. } => {
                format!("{} ?{}", quote(content), query)
            }
            Content::Image { file, .. } if file.is_empty() => "(no file)".to_string(),
            Content::Image { file, .. } => file.clone(),
            Content::Link { label, url, .. } => format!("{} -> {}", quote(label), url),
            Content::Timeline { items } => format!("{} items", items.len()),
            Content::Countdown { date: Some(date) } => date.to_rfc3339(),
            Content::Countdown { date: None } => "(no date)".to_string(),
            Content::Gallery { images } => format!("{} images", images.len()),
            Content::GradientTitle { content, .. } => quote(content),
            Content::ElegantTitle { content, .. } => quote(content),
            Content::Rsvp => String::new(),
            Content::Container { direction } => match direction {
                Direction::Column => "column".to_string(),
                Direction::Row => "row".to_string(),
            },
            Content::Placeholder { block_type } => format!("unsupported block type {}", block_type),
        }
    }
}

fn quote(text: &str) -> String {
    const MAX: usize = 40;
    if text.chars().count() > MAX {
        let cut: String = text.chars().take(MAX).collect();
        format!("\"{}...\"", cut)
    } else {
        format!("\"{}\"", text)
    }
}

/// Presentation attributes carried over from the stored block
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Presentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Value>,
}

impl Presentation {
    pub fn of(block: &Block) -> Self {
        Self {
            class: block.class.clone(),
            style: block.style.clone(),
            tag: block.tag.clone(),
            animation: block.animation.clone(),
        }
    }
}

/// Node of the public page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: String,
    pub block_type: String,
    pub content: Content,
    #[serde(flatten)]
    pub presentation: Presentation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}
