// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::CategoryId;

/// Group key for items whose `Sub Category` cell is blank. Never rendered as
/// a heading.
pub const OTHER_SUBCATEGORY: &str = "Other";

pub const COLUMN_MENU: &str = "Menu";
pub const COLUMN_SUB_CATEGORY: &str = "Sub Category";
pub const COLUMN_TITLE: &str = "Title";
pub const COLUMN_PRICE: &str = "Price";
pub const COLUMN_DESCRIPTION: &str = "Description";
pub const COLUMN_MODS: &str = "Mods";
pub const COLUMN_PRICE_DESCRIPTION: &str = "Price Description";
pub const COLUMN_NOTES: &str = "Notes";
pub const COLUMN_MENU_DESCRIPTION: &str = "Menu Description";

pub const FEED_COLUMNS: [&str; 9] = [
    COLUMN_MENU,
    COLUMN_SUB_CATEGORY,
    COLUMN_TITLE,
    COLUMN_PRICE,
    COLUMN_DESCRIPTION,
    COLUMN_MODS,
    COLUMN_PRICE_DESCRIPTION,
    COLUMN_NOTES,
    COLUMN_MENU_DESCRIPTION,
];

/// One spreadsheet record. Every cell is optional and kept verbatim; blank
/// means "absent" everywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuRow {
    #[serde(rename = "Menu", deserialize_with = "lenient_text")]
    pub menu: String,
    #[serde(rename = "Sub Category", deserialize_with = "lenient_text")]
    pub sub_category: String,
    #[serde(rename = "Title", deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(rename = "Price", deserialize_with = "lenient_text")]
    pub price: String,
    #[serde(rename = "Description", deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "Mods", deserialize_with = "lenient_text")]
    pub mods: String,
    #[serde(rename = "Price Description", deserialize_with = "lenient_text")]
    pub price_description: String,
    #[serde(rename = "Notes", deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(rename = "Menu Description", deserialize_with = "lenient_text")]
    pub menu_description: String,
}

impl MenuRow {
    /// Builds a row from `(header, cell)` pairs. Headers are matched after
    /// trimming; unknown headers are ignored and missing ones stay empty.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = Self::default();
        for (header, value) in pairs {
            if let Some(slot) = row.column_mut(header.as_ref().trim()) {
                *slot = value.into();
            }
        }
        row
    }

    pub fn column(&self, name: &str) -> Option<&str> {
        let value = match name {
            COLUMN_MENU => &self.menu,
            COLUMN_SUB_CATEGORY => &self.sub_category,
            COLUMN_TITLE => &self.title,
            COLUMN_PRICE => &self.price,
            COLUMN_DESCRIPTION => &self.description,
            COLUMN_MODS => &self.mods,
            COLUMN_PRICE_DESCRIPTION => &self.price_description,
            COLUMN_NOTES => &self.notes,
            COLUMN_MENU_DESCRIPTION => &self.menu_description,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn column_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            COLUMN_MENU => Some(&mut self.menu),
            COLUMN_SUB_CATEGORY => Some(&mut self.sub_category),
            COLUMN_TITLE => Some(&mut self.title),
            COLUMN_PRICE => Some(&mut self.price),
            COLUMN_DESCRIPTION => Some(&mut self.description),
            COLUMN_MODS => Some(&mut self.mods),
            COLUMN_PRICE_DESCRIPTION => Some(&mut self.price_description),
            COLUMN_NOTES => Some(&mut self.notes),
            COLUMN_MENU_DESCRIPTION => Some(&mut self.menu_description),
            _ => None,
        }
    }

    /// A row without a title is not an item.
    pub fn is_item(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn category_name(&self) -> &str {
        self.menu.trim()
    }

    pub fn group_key(&self) -> &str {
        match self.sub_category.trim() {
            "" => OTHER_SUBCATEGORY,
            key => key,
        }
    }
}

/// Spreadsheet cells arrive as strings, numbers, booleans or null depending on
/// the source. They are all kept as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a spreadsheet cell")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_owned())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<String, E> {
            Ok(if value { "TRUE" } else { "FALSE" }.to_owned())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: String,
    pub price: Option<String>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub mods: Option<String>,
    pub price_description: Option<String>,
}

impl MenuItem {
    pub fn from_row(row: &MenuRow) -> Self {
        Self {
            title: row.title.trim().to_owned(),
            price: non_blank(&row.price),
            notes: non_blank(&row.notes),
            description: non_blank(&row.description),
            mods: non_blank(&row.mods),
            price_description: non_blank(&row.price_description),
        }
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }

    /// `Title (Notes)` when notes are present.
    pub fn display_title(&self) -> String {
        match &self.notes {
            Some(notes) => format!("{} ({notes})", self.title),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcategoryGroup {
    pub key: String,
    pub items: Vec<MenuItem>,
}

impl SubcategoryGroup {
    pub fn heading(&self) -> Option<&str> {
        (self.key != OTHER_SUBCATEGORY).then_some(self.key.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub groups: Vec<SubcategoryGroup>,
}

impl Category {
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }
}

/// Render-ready menu. Built once per successful fetch and replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub(crate) categories: Vec<Category>,
}

impl Catalog {
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id.get())
    }

    pub fn first(&self) -> CategoryId {
        CategoryId::new(0)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    /// Case-insensitive exact match on the category name.
    pub fn find(&self, name: &str) -> Option<CategoryId> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.categories
            .iter()
            .find(|category| category.name.to_lowercase() == wanted)
            .map(|category| category.id)
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(Category::item_count).sum()
    }
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
