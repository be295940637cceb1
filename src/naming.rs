//! Name synthesis for anonymous nested objects, and `$ref` targets.
use once_cell::sync::Lazy;
use regex::Regex;

static TS_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static identifier regex")
});

/// `["order", "shipping_address"]` + `"geo"` → `OrderShippingAddressGeo`.
///
/// Segments are the `_`-delimited pieces of the joined path; each gets its first
/// character upper-cased and keeps the rest as written. Empty segments vanish.
pub fn synthesize_name(context: &[String], property: &str) -> String {
    let joined = context
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(property))
        .collect::<Vec<_>>()
        .join("_");
    pascal_case(&joined)
}

pub fn pascal_case(joined: &str) -> String {
    joined
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Final `/`-delimited segment: `#/components/schemas/Foo` → `Foo`.
pub fn ref_target(pointer: &str) -> &str {
    pointer.rsplit('/').next().unwrap_or(pointer)
}

/// Can `name` be written bare as a member key?
pub fn is_identifier(name: &str) -> bool {
    TS_IDENTIFIER.is_match(name)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_property_name_is_capitalised() {
        assert_eq!(synthesize_name(&[], "address"), "Address");
    }

    #[test]
    fn context_segments_join_in_order() {
        let ctx = vec!["order".to_string(), "shipping_address".to_string()];
        assert_eq!(synthesize_name(&ctx, "geo"), "OrderShippingAddressGeo");
    }

    #[test]
    fn rest_of_segment_is_left_alone() {
        assert_eq!(pascal_case("camelCase_iD"), "CamelCaseID");
        assert_eq!(pascal_case("__lead"), "Lead");
        assert_eq!(pascal_case("émile"), "Émile");
    }

    #[test]
    fn ref_target_takes_last_segment() {
        assert_eq!(ref_target("#/components/schemas/Foo"), "Foo");
        assert_eq!(ref_target("other.yaml#/definitions/deep/Bar"), "Bar");
        assert_eq!(ref_target("Plain"), "Plain");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("name"));
        assert!(is_identifier("$meta"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("content-type"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier(""));
    }
}
