//! Placeholder substitution.
//!
//! Substitution is a single left-to-right pass: replaced values are copied to
//! the output and never scanned again, so a value containing `${other}` is
//! emitted literally.

use super::SelectedTemplate;
use crate::aggregator::TokenMap;
use crate::config::{GeneratorConfig, UnresolvedTokens};
use crate::result::ReportResult;

/// Renders templates against a token map
#[derive(Debug, Clone)]
pub struct TemplateCompiler {
    prefix: String,
    suffix: String,
    unresolved: UnresolvedTokens,
}

impl Default for TemplateCompiler {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        Self {
            prefix: config.placeholder_prefix,
            suffix: config.placeholder_suffix,
            unresolved: config.unresolved,
        }
    }
}

impl TemplateCompiler {
    /// Create a compiler using the config's delimiters and unresolved policy
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] if either delimiter is empty.
    pub fn from_config(config: &GeneratorConfig) -> ReportResult<Self> {
        config.validate()?;
        Ok(Self {
            prefix: config.placeholder_prefix.clone(),
            suffix: config.placeholder_suffix.clone(),
            unresolved: config.unresolved,
        })
    }

    /// Replace every known placeholder in `template`
    ///
    /// Unknown placeholders follow the [`UnresolvedTokens`] policy. An opening
    /// delimiter without a closing one is copied literally. Delimiters are
    /// never empty.
    #[must_use]
    pub fn render(&self, template: &str, tokens: &TokenMap) -> String {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(&self.prefix) {
            output.push_str(&rest[..start]);
            let after_prefix = &rest[start + self.prefix.len()..];
            let Some(end) = after_prefix.find(&self.suffix) else {
                rest = &rest[start..];
                break;
            };

            let key = &after_prefix[..end];
            match tokens.get(key) {
                Some(value) => output.push_str(value),
                None => {
                    if self.unresolved == UnresolvedTokens::Verbatim {
                        output.push_str(&self.prefix);
                        output.push_str(key);
                        output.push_str(&self.suffix);
                    }
                    tracing::trace!(key, "unresolved placeholder");
                }
            }
            rest = &after_prefix[end + self.suffix.len()..];
        }

        output.push_str(rest);
        output
    }

    /// Render the selected templates in order and concatenate the results
    #[must_use]
    pub fn compile(&self, selected: &[SelectedTemplate<'_>], tokens: &TokenMap) -> String {
        selected
            .iter()
            .map(|template| self.render(template.text, tokens))
            .collect()
    }
}
