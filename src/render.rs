//! Template rendering: template text + value map → text.
use std::collections::BTreeMap;

use crate::error::TemplateError;

/// Pure text renderer used by template specs.
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    /// Render `template` with `values`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template references an unknown value or is
    /// malformed.
    fn render(
        &self,
        template: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, TemplateError>;
}

/// Substitutes `{{ key }}` placeholders; whitespace inside the braces is
/// ignored.
///
/// ```
/// use std::collections::BTreeMap;
/// use xake_cli::render::{PlaceholderRenderer, Renderer};
///
/// let values = BTreeMap::from([("cache".to_string(), "/home/me/.cache".to_string())]);
/// let out = PlaceholderRenderer.render("set directory={{ cache }}/vim", &values).unwrap();
/// assert_eq!(out, "set directory=/home/me/.cache/vim");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl Renderer for PlaceholderRenderer {
    fn render(
        &self,
        template: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some((before, after)) = rest.split_once("{{") {
            out.push_str(before);
            let Some((key, tail)) = after.split_once("}}") else {
                let offset = template.len() - rest.len() + before.len();
                return Err(TemplateError::Unterminated(offset));
            };
            let key = key.trim();
            let value = values
                .get(key)
                .ok_or_else(|| TemplateError::UnknownKey(key.to_string()))?;
            out.push_str(value);
            rest = tail;
        }
        out.push_str(rest);
        Ok(out)
    }
}
