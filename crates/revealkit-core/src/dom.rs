//! Document abstraction the animation engine reads from and writes to
//!
//! `Document` is the seam between the engine and a host. A browser binding
//! maps it onto the real DOM; `PageDocument` is an in-memory implementation
//! loaded from a TOML page layout, used by the simulator and the tests.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;

/// Handle to an element inside a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Animatable style property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    /// Horizontal translation in px
    X,
    /// Vertical translation in px
    Y,
    /// Horizontal translation as a percentage of the element's own width
    XPercent,
    Scale,
    /// Vertical compensation applied while an element is pinned
    PinY,
}

impl Property {
    /// Computed value when neither an inline style nor a rule sets one
    pub fn initial(&self) -> f64 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            _ => 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::X => "x",
            Property::Y => "y",
            Property::XPercent => "x_percent",
            Property::Scale => "scale",
            Property::PinY => "pin_y",
        }
    }
}

/// Layout box in document coordinates, before transforms
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// What the engine needs from a host document
///
/// Selectors are class selectors: `.a`, compounds like `.a.b`, descendant
/// chains like `.a .b`, and comma-separated lists of those. Results come
/// back in document order.
pub trait Document {
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn bounds(&self, id: ElementId) -> Option<Bounds>;

    /// Total scrollable height of the page
    fn scroll_height(&self) -> f64;

    /// Computed value of a style property
    fn style(&self, id: ElementId, property: Property) -> f64;

    fn set_style(&mut self, id: ElementId, property: Property, value: f64);

    fn has_class(&self, id: ElementId, class: &str) -> bool;

    fn add_class(&mut self, id: ElementId, class: &str);

    fn remove_class(&mut self, id: ElementId, class: &str);

    /// Wrap each word of the element's text in a child `.word` element
    ///
    /// Calling it again returns the words created the first time.
    fn split_words(&mut self, id: ElementId) -> Vec<ElementId>;
}

/// One element of a page layout file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Space-separated class list, as in HTML
    pub class: String,
    #[serde(flatten)]
    pub bounds: Bounds,
    /// Index of the parent element; must precede this element
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub text: Option<String>,
    /// Inline styles
    #[serde(default)]
    pub styles: BTreeMap<Property, f64>,
}

/// Stylesheet rule: applies to every element matching `selector`,
/// including elements created after load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub styles: BTreeMap<Property, f64>,
}

/// Static description of a page: viewport, stylesheet and element boxes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub rules: Vec<StyleRule>,
    #[serde(default)]
    pub elements: Vec<LayoutElement>,
}

impl PageLayout {
    /// Load a layout from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl std::str::FromStr for PageLayout {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| crate::Error::Layout(e.to_string()))
    }
}

#[derive(Debug, Clone)]
struct Node {
    classes: Vec<String>,
    bounds: Bounds,
    parent: Option<ElementId>,
    text: Option<String>,
}

/// In-memory `Document`
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    nodes: Vec<Node>,
    rules: Vec<StyleRule>,
    styles: HashMap<(ElementId, Property), f64>,
    words: HashMap<ElementId, Vec<ElementId>>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a layout, validating parent references
    pub fn from_layout(layout: &PageLayout) -> crate::Result<Self> {
        let mut doc = Self {
            rules: layout.rules.clone(),
            ..Self::default()
        };

        for (index, element) in layout.elements.iter().enumerate() {
            if let Some(parent) = element.parent {
                if parent >= index {
                    return Err(crate::Error::Layout(format!(
                        "element {} ({}) names parent {} which does not precede it",
                        index, element.class, parent
                    )));
                }
            }
            let id = doc.push(&element.class, element.bounds, element.parent.map(ElementId));
            if let Some(text) = &element.text {
                doc.nodes[id.0].text = Some(text.clone());
            }
            for (&property, &value) in &element.styles {
                doc.styles.insert((id, property), value);
            }
        }

        Ok(doc)
    }

    /// Append an element and return its id
    ///
    /// A parent that is not already in the document is dropped.
    pub fn push(&mut self, class: &str, bounds: Bounds, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            classes: class.split_whitespace().map(str::to_string).collect(),
            bounds,
            parent: parent.filter(|p| p.0 < id.0),
            text: None,
        });
        id
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.text = Some(text.into());
        }
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Bounds) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.bounds = bounds;
        }
    }

    pub fn add_rule(&mut self, selector: impl Into<String>, styles: BTreeMap<Property, f64>) {
        self.rules.push(StyleRule {
            selector: selector.into(),
            styles,
        });
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.nodes.len()).map(ElementId)
    }

    pub fn classes(&self, id: ElementId) -> &[String] {
        self.nodes.get(id.0).map(|n| n.classes.as_slice()).unwrap_or(&[])
    }

    /// Short human label: `.first-class#index`
    pub fn label(&self, id: ElementId) -> String {
        match self.classes(id).first() {
            Some(class) => format!(".{}{}", class, id),
            None => id.to_string(),
        }
    }

    /// Inline styles written so far, sorted by property
    pub fn inline_styles(&self, id: ElementId) -> Vec<(Property, f64)> {
        let mut styles: Vec<_> = self
            .styles
            .iter()
            .filter(|((el, _), _)| *el == id)
            .map(|((_, property), value)| (*property, *value))
            .collect();
        styles.sort_by_key(|(property, _)| *property);
        styles
    }

    fn matches_compound(&self, id: ElementId, compound: &str) -> bool {
        let Some(node) = self.nodes.get(id.0) else {
            return false;
        };
        if !compound.starts_with('.') {
            return false;
        }
        compound
            .split('.')
            .filter(|c| !c.is_empty())
            .all(|class| node.classes.iter().any(|c| c == class))
    }

    fn matches(&self, id: ElementId, selector: &str) -> bool {
        let mut chain = selector.split_whitespace().rev();
        let Some(last) = chain.next() else {
            return false;
        };
        if !self.matches_compound(id, last) {
            return false;
        }

        // Each remaining compound must match some ancestor, nearest first
        let mut cursor = self.nodes.get(id.0).and_then(|n| n.parent);
        for compound in chain {
            loop {
                match cursor {
                    Some(ancestor) => {
                        cursor = self.nodes.get(ancestor.0).and_then(|n| n.parent);
                        if self.matches_compound(ancestor, compound) {
                            break;
                        }
                    }
                    None => return false,
                }
            }
        }
        true
    }
}

impl Document for PageDocument {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        self.elements()
            .filter(|&id| parts.iter().any(|part| self.matches(id, part)))
            .collect()
    }

    fn bounds(&self, id: ElementId) -> Option<Bounds> {
        self.nodes.get(id.0).map(|n| n.bounds)
    }

    fn scroll_height(&self) -> f64 {
        self.nodes.iter().map(|n| n.bounds.bottom()).fold(0.0, f64::max)
    }

    fn style(&self, id: ElementId, property: Property) -> f64 {
        if let Some(value) = self.styles.get(&(id, property)) {
            return *value;
        }
        self.rules
            .iter()
            .rev()
            .filter(|rule| self.query_all(&rule.selector).contains(&id))
            .find_map(|rule| rule.styles.get(&property).copied())
            .unwrap_or_else(|| property.initial())
    }

    fn set_style(&mut self, id: ElementId, property: Property, value: f64) {
        if id.0 < self.nodes.len() {
            self.styles.insert((id, property), value);
        }
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.classes.retain(|c| c != class);
        }
    }

    fn split_words(&mut self, id: ElementId) -> Vec<ElementId> {
        if let Some(words) = self.words.get(&id) {
            return words.clone();
        }
        let Some(node) = self.nodes.get(id.0) else {
            return Vec::new();
        };
        let bounds = node.bounds;
        let text = node.text.clone().unwrap_or_default();

        let words: Vec<ElementId> = text
            .split_whitespace()
            .map(|word| {
                let word_id = self.push("word", bounds, Some(id));
                self.nodes[word_id.0].text = Some(word.to_string());
                word_id
            })
            .collect();
        self.words.insert(id, words.clone());
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PageDocument {
        let layout: PageLayout = r#"
            [viewport]
            width = 1280
            height = 800

            [[rules]]
            selector = ".intro__text .word"
            styles = { opacity = 0.1, y = 20 }

            [[elements]]
            class = "intro"
            top = 800
            height = 1600

            [[elements]]
            class = "intro__text"
            parent = 0
            top = 900
            height = 400
            text = "We build   calm software"

            [[elements]]
            class = "intro__image intro__image--left"
            parent = 0
            styles = { opacity = 0 }
        "#
        .parse()
        .unwrap();
        PageDocument::from_layout(&layout).unwrap()
    }

    #[test]
    fn test_query_by_class_and_compound() {
        let doc = sample();
        assert_eq!(doc.query(".intro"), Some(ElementId(0)));
        assert_eq!(doc.query(".intro__image.intro__image--left"), Some(ElementId(2)));
        assert_eq!(doc.query(".missing"), None);
        assert!(doc.query_all("intro").is_empty());
    }

    #[test]
    fn test_query_list_in_document_order() {
        let doc = sample();
        let ids = doc.query_all(".intro__image, .intro");
        assert_eq!(ids, vec![ElementId(0), ElementId(2)]);
    }

    #[test]
    fn test_descendant_selector_and_rules_apply_to_split_words() {
        let mut doc = sample();
        let text = doc.query(".intro__text").unwrap();
        let words = doc.split_words(text);
        assert_eq!(words.len(), 4);
        assert_eq!(doc.query_all(".intro .word"), words);
        assert!((doc.style(words[0], Property::Opacity) - 0.1).abs() < 1e-9);
        assert!((doc.style(words[0], Property::Y) - 20.0).abs() < 1e-9);

        // Splitting again hands back the same elements
        assert_eq!(doc.split_words(text), words);
        assert_eq!(doc.len(), 7);
    }

    #[test]
    fn test_inline_styles_override_rules_and_initials() {
        let mut doc = sample();
        let image = doc.query(".intro__image").unwrap();
        assert_eq!(doc.style(image, Property::Opacity), 0.0);
        assert_eq!(doc.style(image, Property::Scale), 1.0);
        doc.set_style(image, Property::Opacity, 0.5);
        assert_eq!(doc.style(image, Property::Opacity), 0.5);
        assert_eq!(doc.inline_styles(image), vec![(Property::Opacity, 0.5)]);
    }

    #[test]
    fn test_class_toggling() {
        let mut doc = sample();
        let intro = ElementId(0);
        doc.add_class(intro, "active");
        doc.add_class(intro, "active");
        assert!(doc.has_class(intro, "active"));
        assert_eq!(doc.classes(intro).len(), 2);
        doc.remove_class(intro, "active");
        assert!(!doc.has_class(intro, "active"));
    }

    #[test]
    fn test_layout_rejects_forward_parent() {
        let layout: PageLayout = r#"
            [[elements]]
            class = "a"
            parent = 1

            [[elements]]
            class = "b"
        "#
        .parse()
        .unwrap();
        assert!(PageDocument::from_layout(&layout).is_err());
    }

    #[test]
    fn test_unknown_parent_is_dropped() {
        let mut doc = PageDocument::new();
        let a = doc.push("a", Bounds::new(0.0, 0.0, 100.0, 100.0), None);
        let b = doc.push("b", Bounds::new(0.0, 0.0, 100.0, 50.0), Some(ElementId(42)));
        let c = doc.push("c", Bounds::new(0.0, 0.0, 100.0, 50.0), Some(b));

        assert!(doc.query_all(".a .b").is_empty());
        assert_eq!(doc.query_all(".b"), vec![b]);
        assert_eq!(doc.query_all(".b .c"), vec![c]);
        assert!(doc.query_all(".a .c").is_empty());
        assert_eq!(doc.query(".a"), Some(a));
    }
}
