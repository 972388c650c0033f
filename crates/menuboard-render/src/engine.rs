// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use menuboard_app::{Catalog, Category, CategoryId, MenuItem, SubcategoryGroup, category_link};

use crate::dom::{Element, Node, lines};

pub const TAB_CLASS: &str = "sh-button";
pub const ACTIVE_CLASS: &str = "active";
pub const CATEGORY_ATTR: &str = "data-category";

/// Something that can show a catalog with one category active.
///
/// Rendering is idempotent: the target is cleared and rebuilt on every call,
/// so the same arguments always produce the same tree.
pub trait Renderer {
    fn render(&mut self, catalog: &Catalog, active: CategoryId);
}

/// One `button.sh-button` per category, exactly one of them `active`.
pub fn render_tabs(catalog: &Catalog, active: CategoryId) -> Vec<Node> {
    catalog
        .categories()
        .iter()
        .map(|category| {
            let mut button = Element::new("button")
                .with_attr("type", "button")
                .with_class(TAB_CLASS)
                .with_attr(CATEGORY_ATTR, category.name.as_str())
                .with_text(category.name.as_str());
            button.toggle_class(ACTIVE_CLASS, category.id == active);
            button.into()
        })
        .collect()
}

/// Teaser tabs link to the full menu page with the category preselected.
pub fn render_teaser_tabs(catalog: &Catalog, menu_page: &str) -> Vec<Node> {
    catalog
        .names()
        .map(|name| {
            Element::new("a")
                .with_class(TAB_CLASS)
                .with_attr("href", category_link(menu_page, name))
                .with_attr(CATEGORY_ATTR, name)
                .with_text(name)
                .into()
        })
        .collect()
}

/// Header plus grouped items for one category. An unknown id renders nothing.
pub fn render_category(catalog: &Catalog, active: CategoryId) -> Vec<Node> {
    let Some(category) = catalog.category(active) else {
        tracing::debug!(category = active.get(), "render requested for unknown category");
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(category.groups.len() + 1);
    nodes.push(render_header(category).into());
    nodes.extend(category.groups.iter().map(|group| render_group(group).into()));
    nodes
}

fn render_header(category: &Category) -> Element {
    let mut header = Element::new("div").with_class("menu-header-wrapper").with_child(
        Element::new("h2")
            .with_class("menu-main-category")
            .with_text(category.name.as_str()),
    );
    if let Some(description) = &category.description {
        header.push(
            Element::new("p")
                .with_class("menu-description")
                .with_text(description.as_str()),
        );
    }
    header
}

fn render_group(group: &SubcategoryGroup) -> Element {
    let mut container = Element::new("div").with_class("menu-items--subcategory");
    if let Some(heading) = group.heading() {
        container.push(Element::new("h3").with_text(heading));
    }
    for item in &group.items {
        container.push(render_item(item));
    }
    container
}

pub fn render_item(item: &MenuItem) -> Element {
    let mut title = Element::new("h4").with_text(item.title.as_str());
    if let Some(notes) = &item.notes {
        title.push(
            Element::new("span")
                .with_class("notes")
                .with_text(format!(" ({notes})")),
        );
    }

    let mut title_row = Element::new("div")
        .with_class("menu-item--title")
        .with_child(title);
    match &item.price {
        Some(price) => title_row.push(
            Element::new("span")
                .with_class("price")
                .with_text(price.as_str()),
        ),
        None => title_row.add_class("no-price"),
    }

    let mut element = Element::new("div").with_class("menu-item").with_child(title_row);
    let secondary = [
        ("menu-item--description", &item.description),
        ("menu-item--mods", &item.mods),
        ("menu-item--price-description", &item.price_description),
    ];
    for (class, text) in secondary {
        if let Some(text) = text {
            element.push(Element::new("p").with_class(class).with_children(lines(text)));
        }
    }
    element
}

pub fn render_unavailable() -> Element {
    Element::new("div")
        .with_class("loading-error")
        .with_child(Element::new("h2").with_text("Menu Currently Unavailable"))
        .with_child(Element::new("p").with_text(
            "We're sorry, but our menu is temporarily unavailable. \
             Please contact us to learn about our current offerings.",
        ))
        .with_child(
            Element::new("p")
                .with_text("We feature fresh, quality dishes and a selection of beverages."),
        )
}

#[cfg(test)]
mod tests {
    use super::{render_category, render_item, render_tabs, render_teaser_tabs};
    use crate::dom::Element;
    use menuboard_app::{Catalog, CategoryId, MenuItem, MenuRow};
    use menuboard_testkit::sample_rows;

    fn wrap(nodes: Vec<crate::dom::Node>) -> Element {
        Element::new("div").with_children(nodes)
    }

    #[test]
    fn exactly_one_tab_is_active() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");
        let tabs = wrap(render_tabs(&catalog, CategoryId::new(1)));
        let buttons = tabs.all_by_class("sh-button");
        assert_eq!(buttons.len(), 2);
        let active: Vec<String> = tabs
            .all_by_class("active")
            .iter()
            .map(|tab| tab.text_content())
            .collect();
        assert_eq!(active, ["Food"]);
    }

    #[test]
    fn item_without_price_is_flagged() {
        let item = MenuItem::from_row(&MenuRow {
            title: "Bread".to_owned(),
            mods: "Add butter $1".to_owned(),
            ..MenuRow::default()
        });
        let html = render_item(&item).to_html();
        assert!(html.contains("menu-item--title no-price"));
        assert!(!html.contains("class=\"price\""));
        assert!(html.contains("<p class=\"menu-item--mods\">Add butter $1</p>"));
    }

    #[test]
    fn notes_are_appended_to_the_title() {
        let item = MenuItem::from_row(&MenuRow {
            title: "Wings".to_owned(),
            price: "$12".to_owned(),
            notes: "Spicy".to_owned(),
            ..MenuRow::default()
        });
        let element = render_item(&item);
        let title = element.all_by_tag("h4");
        assert_eq!(title[0].text_content(), "Wings (Spicy)");
        assert_eq!(
            element.by_class("price").map(Element::text_content).as_deref(),
            Some("$12")
        );
    }

    #[test]
    fn spreadsheet_markup_is_not_interpreted() {
        let item = MenuItem::from_row(&MenuRow {
            title: "<script>alert(1)</script>".to_owned(),
            description: "<img src=x>\nline two".to_owned(),
            ..MenuRow::default()
        });
        let html = render_item(&item).to_html();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x&gt;<br>line two"));
    }

    #[test]
    fn other_group_has_no_heading() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");
        let items = wrap(render_category(&catalog, CategoryId::new(1)));
        let headings: Vec<String> = items
            .all_by_tag("h3")
            .iter()
            .map(|heading| heading.text_content())
            .collect();
        assert_eq!(headings, ["Starters"]);
        assert_eq!(items.all_by_class("menu-items--subcategory").len(), 2);
        assert_eq!(
            items
                .by_class("menu-description")
                .map(Element::text_content)
                .as_deref(),
            Some("Small plates and mains")
        );
    }

    #[test]
    fn unknown_category_renders_nothing() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");
        assert!(render_category(&catalog, CategoryId::new(9)).is_empty());
    }

    #[test]
    fn teaser_tabs_link_to_the_menu_page() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");
        let tabs = wrap(render_teaser_tabs(&catalog, "/menu"));
        let links: Vec<&str> = tabs
            .all_by_tag("a")
            .iter()
            .filter_map(|link| link.attr("href"))
            .collect();
        assert_eq!(links, ["/menu?menu=Drinks", "/menu?menu=Food"]);
    }
}
