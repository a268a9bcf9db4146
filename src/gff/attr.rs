use hashbrown::HashMap;
use std::fmt;

/// Ordered view of the GFF `attributes` column.
///
/// The column holds semicolon-separated items that are either `key=value`
/// pairs or bare values. Keys are unique and keep the order in which they
/// were first seen, so a rewritten record serializes back in its original
/// layout; bare values are kept separately in encounter order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    keys: Vec<String>,
    values: HashMap<String, String>,
    nokeys: Vec<String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw attribute field. Empty items (e.g. from a trailing
    /// semicolon) are dropped.
    pub fn parse(field: &str) -> Self {
        let mut attrs = Self::new();
        for item in field.split(';') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            match item.find('=') {
                Some(i) => attrs.set(item[..i].trim(), item[i + 1..].trim()),
                None => attrs.nokeys.push(item.to_string()),
            }
        }
        attrs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Sets `key` to `value`, appending the key if it is new.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if !self.values.contains_key(key) {
            self.keys.push(key.to_string());
        }
        self.values.insert(key.to_string(), value.into());
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let value = self.values.remove(key)?;
        self.keys.retain(|k| k != key);
        Some(value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Bare (keyless) items, in encounter order.
    pub fn nokeys(&self) -> &[String] {
        &self.nokeys
    }

    /// Drops all bare items (the `--strict-attributes` operation).
    pub fn clear_nokeys(&mut self) {
        self.nokeys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.nokeys.is_empty()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for item in &self.nokeys {
            if !first {
                write!(f, ";")?;
            }
            write!(f, "{}", item)?;
            first = false;
        }
        for key in &self.keys {
            if !first {
                write!(f, ";")?;
            }
            write!(f, "{}={}", key, self.values[key])?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordered() {
        let attrs = Attributes::parse("ID=abc;kaks=-le+100;SGD=YEL0W;Name=def;");
        assert_eq!(attrs.get("ID"), Some("abc"));
        assert_eq!(attrs.get("SGD"), Some("YEL0W"));
        assert_eq!(
            attrs.keys().collect::<Vec<_>>(),
            vec!["ID", "kaks", "SGD", "Name"]
        );
    }

    #[test]
    fn test_roundtrip_preserves_order() {
        let raw = "ID=CDS:YEL0W:1;SGD=YEL0W;Gene=Sbay_5.43";
        assert_eq!(Attributes::parse(raw).to_string(), raw);
    }

    #[test]
    fn test_set_and_remove() {
        let mut attrs = Attributes::parse("ID=x;SGD=y");
        attrs.set("ID", "z");
        attrs.set("Parent", "y");
        assert_eq!(attrs.to_string(), "ID=z;SGD=y;Parent=y");
        assert_eq!(attrs.remove("SGD"), Some("y".to_string()));
        assert!(!attrs.contains("SGD"));
        assert_eq!(attrs.to_string(), "ID=z;Parent=y");
    }

    #[test]
    fn test_nokeys() {
        let mut attrs = Attributes::parse("pseudo;ID=x");
        assert_eq!(attrs.nokeys(), &["pseudo".to_string()]);
        assert_eq!(attrs.to_string(), "pseudo;ID=x");
        attrs.clear_nokeys();
        assert_eq!(attrs.to_string(), "ID=x");
    }
}
