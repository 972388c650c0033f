// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use menuboard_app::{Catalog, Category, MenuItem};
use serde::Serialize;

use crate::dom::{Element, Node};

pub const BASELINE_DESCRIPTION: &str =
    "Browse our menu featuring quality food and beverage options.";
pub const OG_TYPE: &str = "restaurant.menu";
pub const JSON_LD_TYPE: &str = "application/ld+json";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Page `<head>` content the menu may add to. Existing entries are never
/// overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Head {
    elements: Vec<Element>,
}

impl Head {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn meta_name(&self, name: &str) -> Option<&str> {
        self.meta_by("name", name)
    }

    pub fn meta_property(&self, property: &str) -> Option<&str> {
        self.meta_by("property", property)
    }

    fn meta_by(&self, key: &str, value: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|element| element.tag() == "meta" && element.attr(key) == Some(value))
            .and_then(|element| element.attr("content"))
    }

    /// Adds `<meta key=value content=...>` unless one already exists.
    fn ensure_meta(&mut self, key: &str, value: &str, content: &str) -> bool {
        if self.meta_by(key, value).is_some() {
            return false;
        }
        self.push(
            Element::new("meta")
                .with_attr(key, value)
                .with_attr("content", content),
        );
        true
    }

    pub fn structured_data(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|element| {
            element.tag() == "script" && element.attr("type") == Some(JSON_LD_TYPE)
        })
    }

    pub fn to_html(&self) -> String {
        self.elements.iter().map(Element::to_html).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoOptions {
    pub currency: String,
    pub structured_data: bool,
}

impl Default for SeoOptions {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_owned(),
            structured_data: true,
        }
    }
}

/// Baseline description and social-preview type, each only if absent.
pub fn ensure_baseline(head: &mut Head) {
    head.ensure_meta("name", "description", BASELINE_DESCRIPTION);
    head.ensure_meta("property", "og:type", OG_TYPE);
}

/// Adds catalog-derived metadata. Additive only; failures are logged and
/// never reach the caller.
pub fn emit(catalog: &Catalog, head: &mut Head, options: &SeoOptions) {
    if options.structured_data && head.structured_data().next().is_none() {
        match structured_data(catalog, &options.currency) {
            Ok(json) => head.push(
                Element::new("script")
                    .with_attr("type", JSON_LD_TYPE)
                    .with_child(Node::Data(json)),
            ),
            Err(error) => tracing::warn!(%error, "skipping menu structured data"),
        }
    }
    if head.ensure_meta("name", "description", &catalog_description(catalog)) {
        tracing::debug!("added catalog meta description");
    }
}

pub fn catalog_description(catalog: &Catalog) -> String {
    let names: Vec<&str> = catalog.names().collect();
    format!(
        "Our menu features: {}. Browse our full selection of dishes and drinks.",
        names.join(", ")
    )
}

/// Numeric price for structured data: only the first of `/`-separated
/// alternatives, keeping digits and `.`.
pub fn normalize_price(raw: &str) -> String {
    let first = raw.split('/').next().unwrap_or_default();
    first
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect()
}

#[derive(Serialize)]
struct RestaurantLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    menu: MenuLd<'a>,
}

#[derive(Serialize)]
struct MenuLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "hasMenuSection")]
    sections: Vec<SectionLd<'a>>,
}

#[derive(Serialize)]
struct SectionLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    #[serde(rename = "hasMenuItem")]
    items: Vec<ItemLd<'a>>,
}

#[derive(Serialize)]
struct ItemLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    description: &'a str,
    offers: OfferLd<'a>,
}

#[derive(Serialize)]
struct OfferLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    price: String,
    #[serde(rename = "priceCurrency")]
    currency: &'a str,
}

pub fn structured_data(catalog: &Catalog, currency: &str) -> serde_json::Result<String> {
    let document = RestaurantLd {
        context: "https://schema.org",
        kind: "Restaurant",
        menu: MenuLd {
            kind: "Menu",
            sections: catalog
                .categories()
                .iter()
                .map(|category| section_ld(category, currency))
                .collect(),
        },
    };
    serde_json::to_string(&document)
}

fn section_ld<'a>(category: &'a Category, currency: &'a str) -> SectionLd<'a> {
    SectionLd {
        kind: "MenuSection",
        name: &category.name,
        items: category
            .items()
            .map(|item| item_ld(item, currency))
            .collect(),
    }
}

fn item_ld<'a>(item: &'a MenuItem, currency: &'a str) -> ItemLd<'a> {
    ItemLd {
        kind: "MenuItem",
        name: &item.title,
        description: item.description.as_deref().unwrap_or_default(),
        offers: OfferLd {
            kind: "Offer",
            price: normalize_price(item.price.as_deref().unwrap_or_default()),
            currency,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BASELINE_DESCRIPTION, Head, SeoOptions, emit, ensure_baseline, normalize_price,
        structured_data,
    };
    use crate::dom::Element;
    use menuboard_app::Catalog;
    use menuboard_testkit::sample_rows;

    #[test]
    fn prices_keep_the_first_numeric_alternative() {
        assert_eq!(normalize_price("$12 / $15"), "12");
        assert_eq!(normalize_price("$8.50"), "8.50");
        assert_eq!(normalize_price(""), "");
        assert_eq!(normalize_price("Market price"), "");
        assert_eq!(normalize_price("€9,-"), "9");
    }

    #[test]
    fn baseline_never_overwrites_existing_metadata() {
        let mut head = Head::from_elements(vec![
            Element::new("meta")
                .with_attr("name", "description")
                .with_attr("content", "Family bistro since 1982"),
        ]);
        ensure_baseline(&mut head);
        ensure_baseline(&mut head);
        assert_eq!(head.meta_name("description"), Some("Family bistro since 1982"));
        assert_eq!(head.meta_property("og:type"), Some("restaurant.menu"));
        assert_eq!(head.elements().len(), 2);
    }

    #[test]
    fn catalog_description_only_fills_a_gap() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");

        let mut empty = Head::new();
        emit(&catalog, &mut empty, &SeoOptions::default());
        assert_eq!(
            empty.meta_name("description"),
            Some("Our menu features: Drinks, Food. Browse our full selection of dishes and drinks.")
        );

        let mut seeded = Head::new();
        ensure_baseline(&mut seeded);
        emit(&catalog, &mut seeded, &SeoOptions::default());
        assert_eq!(seeded.meta_name("description"), Some(BASELINE_DESCRIPTION));
    }

    #[test]
    fn repeated_emit_keeps_one_structured_data_script() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");
        let mut head = Head::new();
        emit(&catalog, &mut head, &SeoOptions::default());
        emit(&catalog, &mut head, &SeoOptions::default());
        assert_eq!(head.structured_data().count(), 1);
        assert_eq!(head.elements().len(), 2);
    }

    #[test]
    fn structured_data_lists_sections_and_items() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");
        let json = structured_data(&catalog, "EUR").expect("encode structured data");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["@type"], "Restaurant");
        let sections = value["menu"]["hasMenuSection"]
            .as_array()
            .expect("sections array");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["name"], "Drinks");
        let wine = &sections[0]["hasMenuItem"][1];
        assert_eq!(wine["name"], "House Red");
        assert_eq!(wine["description"], "");
        assert_eq!(wine["offers"]["price"], "9");
        assert_eq!(wine["offers"]["priceCurrency"], "EUR");
        assert_eq!(sections[1]["hasMenuItem"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn structured_data_can_be_disabled() {
        let catalog = Catalog::build(&sample_rows()).expect("build catalog");
        let mut head = Head::new();
        emit(
            &catalog,
            &mut head,
            &SeoOptions {
                structured_data: false,
                ..SeoOptions::default()
            },
        );
        assert_eq!(head.structured_data().count(), 0);
        assert!(head.meta_name("description").is_some());
    }
}
