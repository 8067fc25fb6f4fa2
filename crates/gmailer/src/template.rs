//! Literal `{key}` placeholder substitution

/// Ordered key/value pairs substituted into a template
///
/// Values are applied in insertion order, so a value containing another
/// placeholder can be filled by a later key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    entries: Vec<(String, String)>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any earlier value for the same key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        values.extend(iter);
        values
    }
}

impl<K, V> Extend<(K, V)> for TemplateValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Replace every `{key}` in `template` with its value
///
/// Placeholders without a value are left as they are.
pub fn format_template(template: &str, values: &TemplateValues) -> String {
    let mut output = template.to_string();

    for (key, value) in values.iter() {
        output = output.replace(&format!("{{{}}}", key), value);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key() {
        let values: TemplateValues = [("name", "Ada")].into_iter().collect();
        assert_eq!(
            format_template("<p>Hello {name}!</p>", &values),
            "<p>Hello Ada!</p>"
        );
    }

    #[test]
    fn test_multiple_keys_and_repeats() {
        let values: TemplateValues = [("first", "Grace"), ("last", "Hopper")]
            .into_iter()
            .collect();
        assert_eq!(
            format_template("{first} {last} ({first})", &values),
            "Grace Hopper (Grace)"
        );
    }

    #[test]
    fn test_missing_key_left_intact() {
        let values: TemplateValues = [("name", "Ada")].into_iter().collect();
        assert_eq!(
            format_template("Hi {name}, code {code}", &values),
            "Hi Ada, code {code}"
        );
    }

    #[test]
    fn test_unused_key_ignored() {
        let values: TemplateValues = [("unused", "x")].into_iter().collect();
        assert_eq!(format_template("plain", &values), "plain");
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(
            format_template("{a} and {b}", &TemplateValues::new()),
            "{a} and {b}"
        );
    }

    #[test]
    fn test_no_format_specifiers() {
        let values: TemplateValues = [("n", "5")].into_iter().collect();
        assert_eq!(format_template("{n:>3} {{n}}", &values), "{n:>3} {5}");
    }

    #[test]
    fn test_values_applied_in_insertion_order() {
        let values: TemplateValues = [("link", "<a>{label}</a>"), ("label", "here")]
            .into_iter()
            .collect();
        assert_eq!(format_template("Click {link}", &values), "Click <a>here</a>");

        let values: TemplateValues = [("label", "here"), ("link", "<a>{label}</a>")]
            .into_iter()
            .collect();
        assert_eq!(
            format_template("Click {link}", &values),
            "Click <a>{label}</a>"
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut values = TemplateValues::new();
        values.insert("a", "1");
        values.insert("b", "2");
        values.insert("a", "3");

        assert_eq!(values.len(), 2);
        assert_eq!(values.get("a"), Some("3"));
        assert_eq!(
            values.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }
}
