use std::cmp;

use crate::cli::output::current_preferences;

/// A simple key/value pair for display.
pub struct DetailField {
    pub key: String,
    pub value: String,
}

/// A detail view model: title + fields.
pub struct DetailView {
    pub title: String,
    pub fields: Vec<DetailField>,
}

impl DetailView {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.add_field(key, value);
        self
    }

    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.fields.push(DetailField {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Renders the title, a rule, and one aligned `key : value` line per field.
    pub fn render(&self) -> String {
        let key_width = self
            .fields
            .iter()
            .map(|field| field.key.chars().count())
            .max()
            .unwrap_or(0);

        let lines: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                let value = if field.value.is_empty() {
                    "-"
                } else {
                    field.value.as_str()
                };
                format!("  {:<width$} : {}", field.key, value, width = key_width)
            })
            .collect();

        let widest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let rule = horizontal_rule(cmp::max(cmp::max(widest, self.title.len()), 40));

        let mut output = String::new();
        output.push_str(&self.title);
        output.push('\n');
        output.push_str(&rule);
        for line in &lines {
            output.push('\n');
            output.push_str(line);
        }
        output.push('\n');
        output.push_str(&rule);
        output
    }
}

fn horizontal_rule(len: usize) -> String {
    let ch = if current_preferences().plain_mode {
        '-'
    } else {
        '─'
    };
    ch.to_string().repeat(len.max(1))
}
