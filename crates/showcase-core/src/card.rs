//! Card renderer.
//!
//! [`render_card`] turns one [`ProjectRecord`] into a [`CardElement`] tree.
//! The tree is host-neutral: the web frontend materializes it into DOM nodes,
//! and [`CardElement::to_html`] serializes it for inspection.
//!
//! Produced markup:
//!
//! ```text
//! article.gg-project-card[data-wp-key][data-service-areas]
//! └─ a.gg-project-card-link[href]
//!    ├─ div.gg-project-image
//!    │  └─ img[src][alt][loading=lazy][width][height]   (only with an image url)
//!    └─ div.gg-project-content
//!       ├─ h3.gg-project-title
//!       ├─ p.gg-project-excerpt
//!       └─ span.gg-explore-button                      (only with the action link)
//! ```

use crate::config::ShowcaseConfig;
use crate::record::ProjectRecord;

pub const CARD_CLASS: &str = "gg-project-card";
pub const CARD_LINK_CLASS: &str = "gg-project-card-link";
pub const IMAGE_CLASS: &str = "gg-project-image";
pub const CONTENT_CLASS: &str = "gg-project-content";
pub const TITLE_CLASS: &str = "gg-project-title";
pub const EXCERPT_CLASS: &str = "gg-project-excerpt";
pub const ACTION_CLASS: &str = "gg-explore-button";

/// Attribute carrying the record id.
pub const RECORD_KEY_ATTR: &str = "data-wp-key";
/// Attribute carrying the comma-joined service areas.
pub const SERVICE_AREAS_ATTR: &str = "data-service-areas";

/// Intrinsic size hints for card images, matching the server-rendered markup.
const IMAGE_WIDTH: &str = "800";
const IMAGE_HEIGHT: &str = "600";

const VOID_TAGS: &[&str] = &["img"];

/// Rendering options, read from host configuration rather than from any
/// already-rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOptions {
    pub show_action_link: bool,
    pub action_link_text: String,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self::from(&ShowcaseConfig::default())
    }
}

impl From<&ShowcaseConfig> for CardOptions {
    fn from(config: &ShowcaseConfig) -> Self {
        Self {
            show_action_link: config.show_action_link,
            action_link_text: config.action_link_text.clone(),
        }
    }
}

/// Node of a rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardNode {
    Element(CardElement),
    Text(String),
}

/// Element of a rendered card: tag, ordered attributes, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardElement {
    tag: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<CardNode>,
}

impl CardElement {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// Set an attribute, replacing an earlier value of the same name.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn child(mut self, child: CardElement) -> Self {
        self.children.push(CardNode::Element(child));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(CardNode::Text(text.into()));
        self
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[must_use]
    pub fn attributes(&self) -> &[(&'static str, String)] {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn children(&self) -> &[CardNode] {
        &self.children
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Depth-first search for the first element (self included) with `class`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<&CardElement> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            CardNode::Element(el) => el.find_by_class(class),
            CardNode::Text(_) => None,
        })
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                CardNode::Element(el) => el.collect_text(out),
                CardNode::Text(text) => out.push_str(text),
            }
        }
    }

    /// Serialize to HTML with attribute and text escaping.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                CardNode::Element(el) => el.write_html(out),
                CardNode::Text(text) => escape_into(text, false, out),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn escape_into(value: &str, attribute: bool, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Build the card for one record.
#[must_use]
pub fn render_card(record: &ProjectRecord, options: &CardOptions) -> CardElement {
    let mut image = CardElement::new("div").class(IMAGE_CLASS);
    if record.image.is_present() {
        let alt = if record.image.alt.trim().is_empty() {
            record.title.as_str()
        } else {
            record.image.alt.as_str()
        };
        image = image.child(
            CardElement::new("img")
                .attr("src", record.image.url.as_str())
                .attr("alt", alt)
                .attr("loading", "lazy")
                .attr("width", IMAGE_WIDTH)
                .attr("height", IMAGE_HEIGHT),
        );
    }

    let mut content = CardElement::new("div")
        .class(CONTENT_CLASS)
        .child(CardElement::new("h3").class(TITLE_CLASS).text(record.title.as_str()))
        .child(
            CardElement::new("p")
                .class(EXCERPT_CLASS)
                .text(record.excerpt.as_str()),
        );
    if options.show_action_link {
        content = content.child(
            CardElement::new("span")
                .class(ACTION_CLASS)
                .text(options.action_link_text.as_str()),
        );
    }

    CardElement::new("article")
        .class(CARD_CLASS)
        .attr(RECORD_KEY_ATTR, record.id.to_string())
        .attr(SERVICE_AREAS_ATTR, record.joined_service_areas())
        .child(
            CardElement::new("a")
                .attr("href", record.link.as_str())
                .class(CARD_LINK_CLASS)
                .child(image)
                .child(content),
        )
}
