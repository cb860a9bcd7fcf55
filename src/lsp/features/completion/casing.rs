//! Identifier casing for inserted import names

use crate::config::CasingMode;

/// Splits an identifier into words at separators and case transitions.
///
/// `"ForKeys"` → `["For", "Keys"]`, `"do_nothing"` → `["do", "nothing"]`,
/// `"HTTPService"` → `["HTTP", "Service"]`.
fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let lower_to_upper = (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase());
            if lower_to_upper || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn to_camel_case(input: &str) -> String {
    split_words(input)
        .iter()
        .enumerate()
        .map(|(i, word)| if i == 0 { word.to_lowercase() } else { capitalize(word) })
        .collect()
}

pub fn to_pascal_case(input: &str) -> String {
    split_words(input).iter().map(|word| capitalize(word)).collect()
}

pub fn to_snake_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn apply_casing(input: &str, mode: CasingMode) -> String {
    match mode {
        CasingMode::Camel => to_camel_case(input),
        CasingMode::Snake => to_snake_case(input),
        CasingMode::Pascal => to_pascal_case(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_fusion_import_titles() {
        assert_eq!(to_camel_case("ForKeys"), "forKeys");
        assert_eq!(to_camel_case("doNothing"), "doNothing");
        assert_eq!(to_pascal_case("clean"), "Clean");
        assert_eq!(to_pascal_case("doNothing"), "DoNothing");
        assert_eq!(to_snake_case("ForPairs"), "for_pairs");
        assert_eq!(to_snake_case("Value"), "value");
    }

    #[test]
    fn test_acronyms_and_separators() {
        assert_eq!(split_words("HTTPService"), vec!["HTTP", "Service"]);
        assert_eq!(to_snake_case("UDim2Value"), "u_dim2_value");
        assert_eq!(to_camel_case("on_change-event"), "onChangeEvent");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_apply_casing_modes() {
        assert_eq!(apply_casing("Computed", CasingMode::Camel), "computed");
        assert_eq!(apply_casing("Computed", CasingMode::Pascal), "Computed");
        assert_eq!(apply_casing("Computed", CasingMode::Snake), "computed");
    }

    fn ascii(input: &str) -> String {
        input.chars().filter(char::is_ascii).collect()
    }

    quickcheck! {
        fn prop_snake_case_has_no_uppercase(input: String) -> bool {
            !to_snake_case(&ascii(&input)).chars().any(|c| c.is_ascii_uppercase())
        }

        fn prop_snake_case_is_idempotent(input: String) -> bool {
            let snake = to_snake_case(&ascii(&input));
            to_snake_case(&snake) == snake
        }

        fn prop_pascal_case_starts_uppercase(input: String) -> bool {
            let pascal = to_pascal_case(&ascii(&input));
            pascal.chars().next().map_or(true, |c| !c.is_ascii_lowercase())
        }
    }
}
