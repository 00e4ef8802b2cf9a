use serde::Serialize;
use strum::IntoEnumIterator;

/// Filter label meaning "no category filter".
pub const ALL_PRODUCTS_FILTER: &str = "All Products";

/// The fixed set of categories offered by the product forms and filter menu.
///
/// Products store their category as free text, so a value outside this set is
/// accepted and simply never matches a menu entry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Fruit,
    Vegetable,
    Bakery,
    Grocery,
}

impl Category {
    /// Category names in menu order.
    pub fn names() -> Vec<&'static str> {
        Category::iter().map(<&'static str>::from).collect()
    }

    pub fn is_known(value: &str) -> bool {
        value.parse::<Category>().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_declaration_order() {
        assert_eq!(
            Category::names(),
            vec!["fruit", "vegetable", "bakery", "grocery"]
        );
    }

    #[test]
    fn parsing_is_exact() {
        assert_eq!("bakery".parse::<Category>().unwrap(), Category::Bakery);
        assert!(!Category::is_known("Bakery"));
        assert!(!Category::is_known("dairy"));
        assert_eq!(Category::Grocery.to_string(), "grocery");
    }
}
