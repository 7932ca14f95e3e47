//! # Tool Name Parsing
//!
//! `tool` strings are `category.method`; the first dot separates them, and
//! a missing method defaults to `*`.

pub fn parse_tool_name(tool: &str) -> (String, String) {
    match tool.split_once('.') {
        Some((category, method)) => (category.to_string(), method.to_string()),
        None => (tool.to_string(), "*".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_dot() {
        assert_eq!(parse_tool_name("http.get"), ("http".to_string(), "get".to_string()));
    }

    #[test]
    fn only_splits_once() {
        assert_eq!(parse_tool_name("http.get.extra"), ("http".to_string(), "get.extra".to_string()));
    }

    #[test]
    fn missing_method_defaults_to_wildcard() {
        assert_eq!(parse_tool_name("http"), ("http".to_string(), "*".to_string()));
    }
}
