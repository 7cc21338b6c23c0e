//! Document access
//!
//! Presentation code addresses elements by CSS selector through [`Dom`].
//! `WebDom` drives the real page; `MemoryDom` is a selector-keyed stand-in
//! for native builds and tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::UiError;

/// Selector-addressed view of the page
pub trait Dom {
    fn exists(&self, selector: &str) -> bool;

    /// Show (`display: block`) or hide (`display: none`) an element
    fn set_shown(&self, selector: &str, shown: bool) -> Result<(), UiError>;

    fn add_class(&self, selector: &str, class: &str) -> Result<(), UiError>;

    fn remove_class(&self, selector: &str, class: &str) -> Result<(), UiError>;

    /// Append a text `div` with the given classes to a container
    fn append_text(&self, container: &str, text: &str, classes: &[String]) -> Result<(), UiError>;

    fn scroll_to_bottom(&self, selector: &str) -> Result<(), UiError>;
}

/// An element appended by [`Dom::append_text`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
    pub classes: Vec<String>,
}

/// In-memory element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    /// None until a display value is set
    pub shown: Option<bool>,
    pub classes: BTreeSet<String>,
    pub children: Vec<TextNode>,
    pub scrolled_to_bottom: bool,
}

/// Selector-keyed element map. Selectors must match exactly.
#[derive(Debug, Default)]
pub struct MemoryDom {
    elements: RefCell<BTreeMap<String, MemoryElement>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements<'a>(selectors: impl IntoIterator<Item = &'a str>) -> Self {
        let dom = Self::new();
        for selector in selectors {
            dom.insert(selector);
        }
        dom
    }

    pub fn insert(&self, selector: &str) {
        self.elements
            .borrow_mut()
            .insert(selector.to_string(), MemoryElement::default());
    }

    /// Snapshot of an element
    pub fn element(&self, selector: &str) -> Option<MemoryElement> {
        self.elements.borrow().get(selector).cloned()
    }

    pub fn is_shown(&self, selector: &str) -> Option<bool> {
        self.elements.borrow().get(selector).and_then(|e| e.shown)
    }

    fn with_element<T>(
        &self,
        selector: &str,
        f: impl FnOnce(&mut MemoryElement) -> T,
    ) -> Result<T, UiError> {
        let mut elements = self.elements.borrow_mut();
        let element = elements
            .get_mut(selector)
            .ok_or_else(|| UiError::MissingTarget(selector.to_string()))?;
        Ok(f(element))
    }
}

impl Dom for MemoryDom {
    fn exists(&self, selector: &str) -> bool {
        self.elements.borrow().contains_key(selector)
    }

    fn set_shown(&self, selector: &str, shown: bool) -> Result<(), UiError> {
        self.with_element(selector, |e| e.shown = Some(shown))
    }

    fn add_class(&self, selector: &str, class: &str) -> Result<(), UiError> {
        self.with_element(selector, |e| {
            e.classes.insert(class.to_string());
        })
    }

    fn remove_class(&self, selector: &str, class: &str) -> Result<(), UiError> {
        self.with_element(selector, |e| {
            e.classes.remove(class);
        })
    }

    fn append_text(&self, container: &str, text: &str, classes: &[String]) -> Result<(), UiError> {
        self.with_element(container, |e| {
            e.children.push(TextNode {
                text: text.to_string(),
                classes: classes.to_vec(),
            });
            e.scrolled_to_bottom = false;
        })
    }

    fn scroll_to_bottom(&self, selector: &str) -> Result<(), UiError> {
        self.with_element(selector, |e| e.scrolled_to_bottom = true)
    }
}

/// The live browser document (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct WebDom {
    document: web_sys::Document,
}

#[cfg(target_arch = "wasm32")]
impl WebDom {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    pub fn from_window() -> Result<Self, UiError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| UiError::Platform("no document".to_string()))?;
        Ok(Self::new(document))
    }

    fn find(&self, selector: &str) -> Result<web_sys::Element, UiError> {
        self.document
            .query_selector(selector)
            .map_err(|e| UiError::Platform(format!("{:?}", e)))?
            .ok_or_else(|| UiError::MissingTarget(selector.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn js_err(e: wasm_bindgen::JsValue) -> UiError {
    UiError::Platform(format!("{:?}", e))
}

#[cfg(target_arch = "wasm32")]
impl Dom for WebDom {
    fn exists(&self, selector: &str) -> bool {
        matches!(self.document.query_selector(selector), Ok(Some(_)))
    }

    fn set_shown(&self, selector: &str, shown: bool) -> Result<(), UiError> {
        use wasm_bindgen::JsCast;

        let element = self.find(selector)?;
        let element = element
            .dyn_ref::<web_sys::HtmlElement>()
            .ok_or_else(|| UiError::Platform(format!("{} is not an HTML element", selector)))?;
        element
            .style()
            .set_property("display", if shown { "block" } else { "none" })
            .map_err(js_err)
    }

    fn add_class(&self, selector: &str, class: &str) -> Result<(), UiError> {
        self.find(selector)?.class_list().add_1(class).map_err(js_err)
    }

    fn remove_class(&self, selector: &str, class: &str) -> Result<(), UiError> {
        self.find(selector)?.class_list().remove_1(class).map_err(js_err)
    }

    fn append_text(&self, container: &str, text: &str, classes: &[String]) -> Result<(), UiError> {
        let parent = self.find(container)?;
        let node = self.document.create_element("div").map_err(js_err)?;
        node.set_text_content(Some(text));
        for class in classes {
            node.class_list().add_1(class).map_err(js_err)?;
        }
        parent.append_child(&node).map_err(js_err)?;
        Ok(())
    }

    fn scroll_to_bottom(&self, selector: &str) -> Result<(), UiError> {
        let element = self.find(selector)?;
        element.set_scroll_top(element.scroll_height());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_dom_missing_target() {
        let dom = MemoryDom::new();
        assert!(!dom.exists("#nope"));
        assert_eq!(
            dom.set_shown("#nope", true),
            Err(UiError::MissingTarget("#nope".into()))
        );
    }

    #[test]
    fn test_memory_dom_classes_and_children() {
        let dom = MemoryDom::with_elements(["#box"]);
        dom.add_class("#box", "pulse").unwrap();
        dom.add_class("#box", "pulse").unwrap();
        assert_eq!(dom.element("#box").unwrap().classes.len(), 1);
        dom.remove_class("#box", "pulse").unwrap();
        assert!(dom.element("#box").unwrap().classes.is_empty());

        dom.append_text("#box", "hi", &["a".to_string()]).unwrap();
        dom.scroll_to_bottom("#box").unwrap();
        let el = dom.element("#box").unwrap();
        assert_eq!(el.children[0].text, "hi");
        assert!(el.scrolled_to_bottom);
    }
}
