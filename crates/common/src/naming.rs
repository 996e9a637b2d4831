//! Identifier case conversion shared by the model builders

/// Split an identifier into words on non-alphanumeric characters and on
/// lower-to-upper case boundaries (`storageClass` → `storage`, `Class`).
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character, leaving the rest untouched
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `cloud_function-status` → `CloudFunctionStatus`, `ACTIVE` → `Active`
pub fn upper_camel(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| {
            if word.chars().all(|c| !c.is_ascii_lowercase()) {
                capitalize(&word.to_ascii_lowercase())
            } else {
                capitalize(word)
            }
        })
        .collect()
}

/// `page_size` → `pageSize`
pub fn lower_camel(s: &str) -> String {
    lower_first(&upper_camel(s))
}

/// Method name from a dotted operation id:
/// `cloudfunctions.projects.locations.list` → `Cloudfunctions_Projects_Locations_List`
pub fn method_name(operation_id: &str) -> String {
    operation_id
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| upper_camel(part))
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_camel() {
        assert_eq!(upper_camel("storageClass"), "StorageClass");
        assert_eq!(upper_camel("CLOUD_FUNCTION_STATUS_UNSPECIFIED"), "CloudFunctionStatusUnspecified");
        assert_eq!(upper_camel("page-token"), "PageToken");
        assert_eq!(upper_camel("v1beta2"), "V1beta2");
        assert_eq!(upper_camel(""), "");
    }

    #[test]
    fn test_lower_camel() {
        assert_eq!(lower_camel("page_size"), "pageSize");
        assert_eq!(lower_camel("Name"), "name");
    }

    #[test]
    fn test_method_name() {
        assert_eq!(
            method_name("cloudfunctions.projects.locations.list"),
            "Cloudfunctions_Projects_Locations_List"
        );
        assert_eq!(
            method_name("storage.objectAccessControls.get"),
            "Storage_ObjectAccessControls_Get"
        );
    }
}
