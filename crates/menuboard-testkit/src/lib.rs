// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use menuboard_app::{FEED_COLUMNS, MenuRow};
use std::path::PathBuf;

const CATEGORIES: [(&str, &[&str]); 6] = [
    ("Drinks", &["Cocktails", "Beer", "Wine", ""]),
    ("Food", &["Starters", "Mains", "Sides", ""]),
    ("Brunch", &["Eggs", "Griddle", ""]),
    ("Dessert", &[""]),
    ("Happy Hour", &["Drinks", "Snacks"]),
    ("Kids", &[""]),
];

const CATEGORY_BLURBS: [&str; 6] = [
    "Served all day.",
    "Locally sourced, cooked to order.",
    "Saturdays and Sundays until 2pm.",
    "Made in house every morning.",
    "Monday to Friday, 4pm to 6pm.",
    "For guests 12 and under.",
];

const DISH_ADJECTIVES: [&str; 12] = [
    "Smoked", "Roasted", "Charred", "Crispy", "Braised", "Grilled", "Pickled", "Whipped",
    "Spiced", "Seared", "Toasted", "Frozen",
];
const DISH_NOUNS: [&str; 14] = [
    "Carrots",
    "Chicken",
    "Salmon",
    "Cauliflower",
    "Pork Belly",
    "Mushrooms",
    "Halloumi",
    "Beets",
    "Short Rib",
    "Squash",
    "Flatbread",
    "Lemonade",
    "Old Fashioned",
    "Spritz",
];
const INGREDIENTS: [&str; 12] = [
    "chili honey",
    "salsa verde",
    "brown butter",
    "pickled shallot",
    "toasted hazelnut",
    "charred lemon",
    "smoked paprika",
    "fresh herbs",
    "garlic confit",
    "citrus",
    "sea salt",
    "maple",
];
const NOTES: [&str; 5] = ["GF", "V", "VG", "Spicy", "Contains nuts"];
const MODS: [&str; 4] = [
    "Add chicken $6",
    "Make it a double $4",
    "Sub gluten-free bun $2",
    "Add avocado $3\nAdd bacon $4",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn chance(&mut self, percent: usize) -> bool {
        self.int_n(100) < percent
    }
}

/// Seeded generator of plausible menu feeds.
#[derive(Debug, Clone)]
pub struct MenuFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl MenuFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A full feed: every category, a blurb on its first row, a handful of
    /// items per sub-category, and an untitled spacer row now and then.
    pub fn menu(&mut self) -> Vec<MenuRow> {
        let mut rows = Vec::new();
        for (index, (category, subcategories)) in CATEGORIES.iter().enumerate() {
            let mut first = true;
            for sub in *subcategories {
                let count = 2 + self.rng.int_n(4);
                for _ in 0..count {
                    let mut row = self.item(category, sub);
                    if first {
                        row.menu_description = CATEGORY_BLURBS[index].to_owned();
                        first = false;
                    }
                    rows.push(row);
                }
                if self.rng.chance(15) {
                    rows.push(MenuRow {
                        menu: (*category).to_owned(),
                        sub_category: (*sub).to_owned(),
                        ..MenuRow::default()
                    });
                }
            }
        }
        rows
    }

    pub fn item(&mut self, category: &str, sub_category: &str) -> MenuRow {
        let title = format!(
            "{} {}",
            self.pick(&DISH_ADJECTIVES),
            self.pick(&DISH_NOUNS)
        );
        let description = if self.rng.chance(80) {
            let first = self.pick(&INGREDIENTS);
            let second = self.pick(&INGREDIENTS);
            if self.rng.chance(20) {
                format!("{first}, {second}\nServed warm")
            } else {
                format!("{first}, {second}")
            }
        } else {
            String::new()
        };

        MenuRow {
            menu: category.to_owned(),
            sub_category: sub_category.to_owned(),
            title,
            price: self.price(),
            description,
            mods: if self.rng.chance(20) {
                self.pick(&MODS).to_owned()
            } else {
                String::new()
            },
            price_description: String::new(),
            notes: if self.rng.chance(25) {
                self.pick(&NOTES).to_owned()
            } else {
                String::new()
            },
            menu_description: String::new(),
        }
    }

    pub fn price(&mut self) -> String {
        match self.rng.int_n(10) {
            0 => String::new(),
            1 | 2 => {
                let glass = 8 + self.rng.int_n(8);
                format!("${glass} / ${}", glass * 4)
            }
            3 | 4 => format!("${}.50", 4 + self.rng.int_n(20)),
            _ => format!("${}", 4 + self.rng.int_n(30)),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// Two categories exercising every rendering rule: a blank and a named
/// sub-category, notes, missing price, multi-line description, mods, a
/// category blurb and an untitled row.
pub fn sample_rows() -> Vec<MenuRow> {
    vec![
        row("Drinks", "", "Lemonade", "$4", "Fresh squeezed", "", "", ""),
        row("Drinks", "Wine", "House Red", "$9 / $32", "", "", "", "Pours and bottles"),
        row("Food", "Starters", "Soup", "$8.50", "Tomato\nBasil", "", "V", ""),
        row("Food", "", "Bread", "", "", "Add butter $1", "", ""),
        row("Food", "Starters", "", "", "", "", "", "Small plates and mains"),
        row("Food", "Starters", "Wings", "$12", "", "", "Spicy", ""),
    ]
}

#[allow(clippy::too_many_arguments)]
pub fn row(
    menu: &str,
    sub_category: &str,
    title: &str,
    price: &str,
    description: &str,
    mods: &str,
    notes: &str,
    menu_description: &str,
) -> MenuRow {
    MenuRow {
        menu: menu.to_owned(),
        sub_category: sub_category.to_owned(),
        title: title.to_owned(),
        price: price.to_owned(),
        description: description.to_owned(),
        mods: mods.to_owned(),
        price_description: String::new(),
        notes: notes.to_owned(),
        menu_description: menu_description.to_owned(),
    }
}

/// Renders rows as a published-sheet CSV with the full header.
pub fn csv_feed(rows: &[MenuRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(FEED_COLUMNS)
        .context("write CSV header")?;
    for row in rows {
        let cells = FEED_COLUMNS.map(|column| row.column(column).unwrap_or_default());
        writer.write_record(cells).context("write CSV row")?;
    }
    let bytes = writer.into_inner().context("flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is UTF-8")
}

/// Renders rows as a successful proxy response.
pub fn envelope_feed(rows: &[MenuRow]) -> Result<String> {
    serde_json::to_string(&serde_json::json!({
        "success": true,
        "data": rows,
        "timestamp": fixture_timestamp(),
        "source": "google-apps-script",
    }))
    .context("encode envelope")
}

pub fn failed_envelope(message: &str) -> String {
    serde_json::json!({
        "success": false,
        "error": message,
        "timestamp": fixture_timestamp(),
    })
    .to_string()
}

pub fn fixture_timestamp() -> &'static str {
    "2026-02-19T12:34:56Z"
}

pub fn temp_feed_file(contents: &str, extension: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join(format!("menu.{extension}"));
    std::fs::write(&path, contents)
        .with_context(|| format!("write feed fixture {}", path.display()))?;
    Ok((dir, path))
}

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|(name, _)| *name).collect()
}
