// Query parameter value object

/// Ordered query parameters. Absent and blank values are kept here and
/// dropped by [`QueryParams::effective`], which is what goes on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push<V: ToString>(&mut self, key: &str, value: Option<V>) {
        self.pairs
            .push((key.to_string(), value.map(|value| value.to_string())));
    }

    pub fn is_empty(&self) -> bool {
        self.effective().is_empty()
    }

    pub fn effective(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter_map(|(key, value)| {
                let value = value.as_deref()?.trim();
                if value.is_empty() {
                    None
                } else {
                    Some((key.clone(), value.to_string()))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_drops_absent_and_blank_values() {
        let params = QueryParams::new()
            .with("page", Some(2))
            .with("platform", None::<String>)
            .with("name", Some("  "))
            .with("status", Some("LOCK"));

        assert_eq!(
            params.effective(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("status".to_string(), "LOCK".to_string()),
            ]
        );
    }

    #[test]
    fn all_blank_params_are_empty() {
        let params = QueryParams::new().with("status", Some(""));
        assert!(params.is_empty());
    }
}
