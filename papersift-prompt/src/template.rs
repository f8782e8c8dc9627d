use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// A text template with `{{name}}` placeholders.
///
/// Substitution is a single pass: placeholder-like text inside a substituted
/// value is left as is. Unknown placeholders render as the empty string.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("valid placeholder regex"))
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Names of the placeholders in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in placeholder().captures_iter(&self.template) {
            let name = &caps[1];
            if !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        placeholder()
            .replace_all(&self.template, |caps: &regex::Captures| {
                let key = &caps[1];
                match vars.get(key) {
                    Some(value) => value.clone(),
                    None => {
                        tracing::debug!(placeholder = key, "no value for prompt placeholder");
                        String::new()
                    }
                }
            })
            .into_owned()
    }
}
