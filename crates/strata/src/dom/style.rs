use std::fmt;

/// Parse a CSS pixel length such as `"12px"` or `"12"`.
pub fn parse_px(value: &str) -> Option<f64> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v).trim();
    v.parse::<f64>().ok()
}

/// Format a pixel length the way the style declarations are written.
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// An element's inline style declaration.
///
/// Tracks both the declared properties and whether the `style` attribute is
/// present at all, so that restoring an element can distinguish "attribute
/// absent" from "attribute present but empty".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    /// Declared properties in declaration order.
    props: Vec<(String, String)>,
    /// Whether the element carries a `style` attribute.
    attribute: bool,
}

impl InlineStyle {
    /// Construct an empty style with no attribute.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `css_text` of the form `"a: b; c: d"`. The attribute is present
    /// even if no declarations parse.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self {
            props: Vec::new(),
            attribute: true,
        };
        for decl in css_text.split(';') {
            if let Some((name, value)) = decl.split_once(':') {
                let name = name.trim();
                let value = value.trim();
                if !name.is_empty() && !value.is_empty() {
                    style.set(name, value);
                }
            }
        }
        style
    }

    /// Get the value of a declared property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. Setting an empty value removes the declaration, as
    /// assigning `""` through a style object does.
    pub fn set(&mut self, name: &str, value: &str) {
        self.attribute = true;
        if value.is_empty() {
            self.remove(name);
            return;
        }
        match self.props.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.props.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove a property, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.props.iter().position(|(n, _)| n == name)?;
        Some(self.props.remove(idx).1)
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Are there no declared properties?
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Is the `style` attribute present?
    pub fn has_attribute(&self) -> bool {
        self.attribute
    }

    /// Remove the `style` attribute along with every declaration.
    pub fn remove_attribute(&mut self) {
        self.props.clear();
        self.attribute = false;
    }

    /// Iterate over declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{name}: {value};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_print() {
        let s = InlineStyle::parse("color: red; padding-right:4px;;");
        assert_eq!(s.get("color"), Some("red"));
        assert_eq!(s.get("padding-right"), Some("4px"));
        assert_eq!(s.to_string(), "color: red; padding-right: 4px;");
    }

    #[test]
    fn empty_value_removes() {
        let mut s = InlineStyle::parse("color: red");
        s.set("color", "");
        assert!(s.is_empty());
        assert!(s.has_attribute());
    }

    #[test]
    fn set_preserves_order() {
        let mut s = InlineStyle::new();
        assert!(!s.has_attribute());
        s.set("a", "1");
        s.set("b", "2");
        s.set("a", "3");
        let items: Vec<_> = s.iter().collect();
        assert_eq!(items, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn px_values() {
        assert_eq!(parse_px("12px"), Some(12.0));
        assert_eq!(parse_px(" 3.5 "), Some(3.5));
        assert_eq!(parse_px("auto"), None);
        assert_eq!(px(15.0), "15px");
    }
}
