// File: src/dom.rs
// Purpose: In-memory elements and mount containers

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A host node: tag, attributes and rendered inner markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    inner_html: String,
}

impl Element {
    /// Creates an empty element, like `document.createElement(tag)`
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
    }

    /// Serializes the element with its attributes and inner markup
    pub fn outer_html(&self) -> String {
        let attrs: String = self
            .attributes
            .iter()
            .map(|(name, value)| format!(r#" {}="{}""#, name, value))
            .collect();
        format!("<{tag}{attrs}>{inner}</{tag}>", tag = self.tag, inner = self.inner_html)
    }
}

/// Anything that can sit in a [`Container`]
pub trait Mountable {
    /// The node that gets attached to the container
    fn host(&self) -> &Element;
}

impl Mountable for Element {
    fn host(&self) -> &Element {
        self
    }
}

/// How a mount treats what is already in the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MountMode {
    /// Clear the container, then append (`innerHTML = ""` + `appendChild`)
    #[default]
    Replace,
    /// Append after whatever is already mounted
    Append,
}

/// A named mount point (`main`) holding mounted children in order
#[derive(Debug, Clone)]
pub struct Container<C> {
    name: String,
    children: Vec<C>,
}

impl<C: Mountable> Container<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mounts `child` according to `mode`; returns the new child count
    pub fn mount(&mut self, child: C, mode: MountMode) -> usize {
        if mode == MountMode::Replace {
            self.clear();
        }
        debug!(
            container = %self.name,
            tag = child.host().tag(),
            ?mode,
            "mounting"
        );
        self.children.push(child);
        self.children.len()
    }

    /// Removes every child; removed children are dropped
    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn children(&self) -> &[C] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [C] {
        &mut self.children
    }

    /// The most recently mounted child
    pub fn last(&self) -> Option<&C> {
        self.children.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut C> {
        self.children.last_mut()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The container's inner markup: children's outer HTML concatenated
    pub fn inner_html(&self) -> String {
        self.children
            .iter()
            .map(|child| child.host().outer_html())
            .collect()
    }
}
