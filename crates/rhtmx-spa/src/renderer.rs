use crate::value::{ComponentData, Value};
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder syntax: `{name}` or `{user.name}`
static VAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_\.]*)\}").unwrap()
});

/// Interpolates component data into template text
///
/// Unknown placeholders are left as written so a missing key is visible in
/// the output instead of silently vanishing.
pub struct Renderer<'a> {
    data: &'a ComponentData,
}

impl<'a> Renderer<'a> {
    pub fn new(data: &'a ComponentData) -> Self {
        Self { data }
    }

    pub fn render(&self, content: &str) -> String {
        VAR_REGEX
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                self.resolve(name)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| format!("{{{}}}", name))
            })
            .into_owned()
    }

    fn resolve(&self, name: &str) -> Option<&'a Value> {
        match name.split_once('.') {
            Some((head, rest)) => self.data.get(head)?.lookup(rest),
            None => self.data.get(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_simple_interpolation() {
        let mut data = ComponentData::new();
        data.insert("namekey".to_string(), Value::from("Jos"));
        data.insert("count".to_string(), Value::from(3));
        let html = Renderer::new(&data).render("<p>Hello, {namekey}! ({count})</p>");
        assert_eq!(html, "<p>Hello, Jos! (3)</p>");
    }

    #[test]
    fn test_nested_value() {
        let mut user = HashMap::new();
        user.insert("name".to_string(), Value::from("Bob"));
        let mut data = ComponentData::new();
        data.insert("user".to_string(), Value::Object(user));
        assert_eq!(Renderer::new(&data).render("<p>{user.name}</p>"), "<p>Bob</p>");
    }

    #[test]
    fn test_missing_variable_is_kept() {
        let data = ComponentData::new();
        assert_eq!(Renderer::new(&data).render("<p>{missing}</p>"), "<p>{missing}</p>");
    }
}
