//! Case conversion for resource naming: class-style names become URL slugs.

/// Convert an identifier from CamelCase to snake_case.
/// e.g. "ItemSelection" -> "item_selection", "Basket" -> "basket"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_to_snake() {
        assert_eq!(to_snake_case("Basket"), "basket");
        assert_eq!(to_snake_case("ItemSelection"), "item_selection");
        assert_eq!(to_snake_case("SomeResource"), "some_resource");
    }

    #[test]
    fn already_snake_is_unchanged() {
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("t2"), "t2");
    }
}
