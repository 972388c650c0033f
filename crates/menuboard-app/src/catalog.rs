// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;

use crate::error::{FeedError, FeedResult};
use crate::ids::CategoryId;
use crate::model::{Catalog, Category, MenuItem, MenuRow, SubcategoryGroup, non_blank};

impl Catalog {
    /// Derives tabs, groups and category descriptions from feed rows in a
    /// single pass.
    ///
    /// - Tab order is the order of first appearance of each non-blank `Menu`.
    /// - Rows without a title never become items but still contribute their
    ///   category and `Menu Description`.
    /// - Groups keep first-occurrence order; items keep source order.
    /// - The description is the first non-blank `Menu Description` among the
    ///   category's rows.
    pub fn build(rows: &[MenuRow]) -> FeedResult<Self> {
        let mut categories: Vec<Category> = Vec::new();
        let mut category_index: HashMap<&str, usize> = HashMap::new();
        let mut group_index: Vec<HashMap<String, usize>> = Vec::new();

        for row in rows {
            let name = row.category_name();
            if name.is_empty() {
                continue;
            }

            let position = *category_index.entry(name).or_insert_with(|| {
                categories.push(Category {
                    id: CategoryId::new(categories.len()),
                    name: name.to_owned(),
                    description: None,
                    groups: Vec::new(),
                });
                group_index.push(HashMap::new());
                categories.len() - 1
            });
            let category = &mut categories[position];

            if category.description.is_none() {
                category.description = non_blank(&row.menu_description);
            }

            if !row.is_item() {
                continue;
            }

            let groups = &mut group_index[position];
            let key = row.group_key();
            let group = match groups.get(key) {
                Some(index) => *index,
                None => {
                    category.groups.push(SubcategoryGroup {
                        key: key.to_owned(),
                        items: Vec::new(),
                    });
                    groups.insert(key.to_owned(), category.groups.len() - 1);
                    category.groups.len() - 1
                }
            };
            category.groups[group].items.push(MenuItem::from_row(row));
        }

        if categories.is_empty() {
            return Err(FeedError::EmptyCatalog);
        }

        let catalog = Self { categories };
        tracing::debug!(
            rows = rows.len(),
            categories = catalog.len(),
            items = catalog.item_count(),
            "built menu catalog"
        );
        Ok(catalog)
    }
}
