// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use menuboard_app::{Catalog, CategoryId, TabEvent};

use crate::dom::Element;
use crate::engine::{
    ACTIVE_CLASS, CATEGORY_ATTR, Renderer, TAB_CLASS, render_category, render_tabs,
    render_teaser_tabs, render_unavailable,
};

pub const MOUNT_ATTR: &str = "data-menu";
pub const MOUNT_VALUE: &str = "restaurant-menu";
pub const TABS_ID: &str = "menuTabs";
pub const ITEMS_ID: &str = "menuItemsWrapper";
pub const FALLBACK_CLASS: &str = "menu-fallback-content";
pub const SPINNER_CLASS: &str = "sh-loading-spinner";
pub const SWIPE_CLASS: &str = "swipe-instruction-container";
pub const FADING_CLASS: &str = "is-fading";
pub const SCROLL_ATTR: &str = "data-scroll-left";

/// The mounted menu: skeleton first, then catalog or unavailable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    root: Element,
}

impl MenuView {
    /// Builds the skeleton inside the host container. Content the host
    /// already placed there (crawler markup, hand-written fallback) is kept
    /// in place of the generic loading notice, and the spinner then starts
    /// hidden.
    pub fn mount(style: &str, existing: Option<Element>) -> Self {
        let mut root = Element::new("div")
            .with_attr(MOUNT_ATTR, MOUNT_VALUE)
            .with_class(&layout_class(style));

        let has_existing = existing.is_some();
        match existing {
            Some(content) => root.push(content),
            None => root.push(loading_fallback()),
        }

        let mut spinner = Element::new("div")
            .with_class(SPINNER_CLASS)
            .with_child(Element::new("div").with_class("spinner"));
        spinner.set_hidden(has_existing);
        root.push(spinner);

        root.push(swipe_instruction());
        root.push(Element::new("div").with_class("menu-tabs").with_id(TABS_ID));
        root.push(
            Element::new("div")
                .with_class("menu-items--wrapper")
                .with_id(ITEMS_ID),
        );
        Self { root }
    }

    /// Home-page variant: tab links to the menu page and a "View Our Menu"
    /// link, no items. Host-supplied content leads the tabs.
    pub fn teaser(catalog: &Catalog, menu_page: &str, existing: Option<Element>) -> Self {
        let mut root = Element::new("div").with_attr(MOUNT_ATTR, MOUNT_VALUE);
        if let Some(content) = existing {
            root.push(content);
        }
        let root = root
            .with_child(
                Element::new("div")
                    .with_class("menu-tabs")
                    .with_id(TABS_ID)
                    .with_children(render_teaser_tabs(catalog, menu_page)),
            )
            .with_child(
                Element::new("div").with_class("view-menu-button").with_child(
                    Element::new("a")
                        .with_class(TAB_CLASS)
                        .with_attr("href", menu_page)
                        .with_text("View Our Menu"),
                ),
            );
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_element(self) -> Element {
        self.root
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    pub fn tabs(&self) -> Option<&Element> {
        self.root.by_id(TABS_ID)
    }

    pub fn items(&self) -> Option<&Element> {
        self.root.by_id(ITEMS_ID)
    }

    pub fn active_tab(&self) -> Option<String> {
        self.tabs()?
            .child_elements()
            .find(|tab| tab.has_class(ACTIVE_CLASS))
            .and_then(|tab| tab.attr(CATEGORY_ATTR))
            .map(str::to_owned)
    }

    pub fn swipe_hint_visible(&self) -> bool {
        self.visible(SWIPE_CLASS)
    }

    pub fn spinner_visible(&self) -> bool {
        self.visible(SPINNER_CLASS)
    }

    pub fn fallback_visible(&self) -> bool {
        self.visible(FALLBACK_CLASS)
    }

    pub fn content_visible(&self) -> bool {
        self.items().is_some_and(|items| !items.has_class(FADING_CLASS))
    }

    pub fn scroll_left(&self) -> Option<f64> {
        self.tabs()?.attr(SCROLL_ATTR)?.parse().ok()
    }

    fn visible(&self, class: &str) -> bool {
        self.root
            .by_class(class)
            .is_some_and(|element| !element.is_hidden())
    }

    /// First catalog on screen: loading notices go away and the controller's
    /// load events are applied.
    pub fn show_catalog(&mut self, catalog: &Catalog, events: &[TabEvent]) {
        self.set_hidden(FALLBACK_CLASS, true);
        self.set_hidden(SPINNER_CLASS, true);
        let active = events
            .iter()
            .find_map(|event| match event {
                TabEvent::Ready(id) => Some(*id),
                _ => None,
            })
            .unwrap_or_else(|| catalog.first());
        self.render(catalog, active);
        self.apply(catalog, events);
    }

    /// Mirrors controller events onto the tree.
    pub fn apply(&mut self, catalog: &Catalog, events: &[TabEvent]) {
        for event in events {
            match event {
                TabEvent::Rendered(id) => self.render_items(catalog, *id),
                TabEvent::ActiveTabChanged(id) => self.mark_active(catalog, *id),
                TabEvent::Scrolled(left) => {
                    if let Some(tabs) = self.root.by_id_mut(TABS_ID) {
                        tabs.set_attr(SCROLL_ATTR, format!("{left:.0}"));
                    }
                }
                TabEvent::FadeOut { .. } => self.set_fading(true),
                TabEvent::FadeIn => self.set_fading(false),
                TabEvent::SwipeHintChanged(visible) => self.set_hidden(SWIPE_CLASS, !visible),
                TabEvent::Ready(_)
                | TabEvent::SwitchScheduled { .. }
                | TabEvent::SwitchCancelled(_) => {}
            }
        }
    }

    /// Degraded state for any feed failure. Host-supplied content stays.
    pub fn show_unavailable(&mut self) {
        self.set_hidden(FALLBACK_CLASS, true);
        self.set_hidden(SPINNER_CLASS, true);
        if let Some(items) = self.root.by_id_mut(ITEMS_ID) {
            items.replace_children(vec![render_unavailable().into()]);
            items.remove_class(FADING_CLASS);
        }
    }

    fn render_items(&mut self, catalog: &Catalog, active: CategoryId) {
        if let Some(items) = self.root.by_id_mut(ITEMS_ID) {
            items.replace_children(render_category(catalog, active));
        }
    }

    fn mark_active(&mut self, catalog: &Catalog, active: CategoryId) {
        let Some(name) = catalog.category(active).map(|category| category.name.as_str()) else {
            return;
        };
        if let Some(tabs) = self.root.by_id_mut(TABS_ID) {
            for tab in tabs.child_elements_mut() {
                let is_active = tab.attr(CATEGORY_ATTR) == Some(name);
                tab.toggle_class(ACTIVE_CLASS, is_active);
            }
        }
    }

    fn set_fading(&mut self, fading: bool) {
        if let Some(items) = self.root.by_id_mut(ITEMS_ID) {
            items.toggle_class(FADING_CLASS, fading);
        }
    }

    fn set_hidden(&mut self, class: &str, hidden: bool) {
        if let Some(element) = self.root.by_class_mut(class) {
            element.set_hidden(hidden);
        }
    }
}

impl Renderer for MenuView {
    fn render(&mut self, catalog: &Catalog, active: CategoryId) {
        if let Some(tabs) = self.root.by_id_mut(TABS_ID) {
            tabs.replace_children(render_tabs(catalog, active));
        }
        self.render_items(catalog, active);
    }
}

fn layout_class(style: &str) -> String {
    let style = style.trim().to_lowercase().replace(char::is_whitespace, "-");
    if style.is_empty() {
        return "layout--modern".to_owned();
    }
    format!("layout--{style}")
}

fn loading_fallback() -> Element {
    Element::new("div")
        .with_class(FALLBACK_CLASS)
        .with_child(Element::new("h2").with_text("Menu"))
        .with_child(Element::new("p").with_text("Loading menu options..."))
        .with_child(Element::new("noscript").with_child(Element::new("p").with_text(
            "Please enable JavaScript to view our interactive menu, \
             or contact us to learn about our current offerings.",
        )))
}

fn swipe_instruction() -> Element {
    let mut container = Element::new("div")
        .with_class(SWIPE_CLASS)
        .with_child(
            Element::new("p")
                .with_class("swipe-instruction")
                .with_text("Swipe for more categories"),
        )
        .with_child(
            Element::new("svg")
                .with_class("swipe-arrow")
                .with_attr("xmlns", "http://www.w3.org/2000/svg")
                .with_attr("width", "16")
                .with_attr("height", "10")
                .with_attr("fill", "none")
                .with_attr("viewBox", "0 0 16 10")
                .with_child(
                    Element::new("path")
                        .with_attr("stroke", "currentColor")
                        .with_attr("stroke-width", "2")
                        .with_attr("d", "m1 1 7 7 7-7"),
                ),
        );
    container.set_hidden(true);
    container
}
