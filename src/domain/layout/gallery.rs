use serde::{Deserialize, Serialize};

pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub src: String,
    pub caption: String,
    pub category: String,
}

pub fn matches_filter(item: &GalleryItem, filter: &str) -> bool {
    filter == FILTER_ALL || item.category == filter
}

/// Items visible under `filter`, in their original order.
pub fn filter_items<'a>(items: &'a [GalleryItem], filter: &str) -> Vec<&'a GalleryItem> {
    items.iter().filter(|item| matches_filter(item, filter)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(src: &str, category: &str) -> GalleryItem {
        GalleryItem {
            src: src.into(),
            caption: String::new(),
            category: category.into(),
        }
    }

    #[test]
    fn all_shows_everything() {
        let items = [item("a.jpg", "rooms"), item("b.jpg", "beach")];
        assert_eq!(filter_items(&items, "all").len(), 2);
    }

    #[test]
    fn category_filter_keeps_order() {
        let items = [item("a.jpg", "rooms"), item("b.jpg", "beach"), item("c.jpg", "rooms")];
        let visible: Vec<&str> = filter_items(&items, "rooms").iter().map(|i| i.src.as_str()).collect();
        assert_eq!(visible, vec!["a.jpg", "c.jpg"]);
        assert!(filter_items(&items, "pool").is_empty());
    }
}
