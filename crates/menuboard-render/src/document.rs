// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::dom::{Element, escape_text};
use crate::seo::Head;

pub const CONTAINER_ID: &str = "menuContainer";

/// The host element the menu mounts into.
pub fn host_container(content: Element) -> Element {
    Element::new("div")
        .with_id(CONTAINER_ID)
        .with_attr("data-section", "menu")
        .with_child(content)
}

/// A standalone HTML page around the host container.
pub fn page(title: &str, head: &Head, container: &Element) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n{}\n</head>\n<body class=\"menu-page\">\n{}\n</body>\n</html>\n",
        escape_text(title),
        head.to_html(),
        container.to_html(),
    )
}

#[cfg(test)]
mod tests {
    use super::{host_container, page};
    use crate::crawler::static_fallback_markup;
    use crate::seo::{Head, ensure_baseline};

    #[test]
    fn page_wraps_head_and_container() {
        let mut head = Head::new();
        ensure_baseline(&mut head);
        let html = page("Menu & Drinks", &head, &host_container(static_fallback_markup()));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Menu &amp; Drinks</title>"));
        assert!(html.contains("<meta property=\"og:type\" content=\"restaurant.menu\">"));
        assert!(html.contains("<div id=\"menuContainer\" data-section=\"menu\">"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
