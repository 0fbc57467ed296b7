//! Flat `name -> value` view of the invocation arguments.
//!
//! Tasks read their own parameters from here; the engine itself only looks at
//! `target`, `verbose` and `v`.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: HashMap<String, String>,
}

impl Arguments {
    /// Parse the current process arguments, skipping the program name.
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parse `--key value`, `--key=value` and bare `--flag` / `-f` tokens.
    ///
    /// A flag followed by another flag (or nothing) gets an empty value. Tokens that do
    /// not start with a dash and are not consumed as a value are ignored. Later
    /// occurrences of the same key win.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = HashMap::new();
        let mut args = args.into_iter().map(Into::into).peekable();

        while let Some(token) = args.next() {
            let Some(key) = strip_dashes(&token) else {
                continue;
            };

            if let Some((key, value)) = key.split_once('=') {
                values.insert(key.to_string(), value.to_string());
                continue;
            }

            let value = match args.peek() {
                Some(next) if strip_dashes(next).is_none() => args.next().unwrap_or_default(),
                _ => String::new(),
            };
            values.insert(key.to_string(), value);
        }

        Self { values }
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The value of `name`, if it was passed.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The value of `name` or `default`, plus whether the argument was present.
    pub fn get_or_default<'a>(&'a self, name: &str, default: &'a str) -> (&'a str, bool) {
        match self.values.get(name) {
            Some(value) => (value.as_str(), true),
            None => (default, false),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All arguments sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

fn strip_dashes(token: &str) -> Option<&str> {
    let key = token.strip_prefix("--").or_else(|| token.strip_prefix('-'))?;
    (!key.is_empty()).then_some(key)
}
