//! Matching of "blog posts by user" category names.
//!
//! A category template is a content-language message such as
//! `Blog posts by $1`, where `$1` stands for a user name. Matching is
//! candidate driven: a user name is rendered into the template and the result
//! is compared with the category under test as a whole title. The template
//! text is never searched for inside an arbitrary category name, so a user
//! called `Al` never matches the category of a user called `Alice`.
//!
//! Titles are compared in display form: underscores (the database key form)
//! read as spaces and surrounding whitespace is ignored. Everything else,
//! including case and unicode code points, must be identical.

use super::error::DomainError;

const PLACEHOLDER: &str = "$1";

/// A parsed naming template with exactly one user placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTemplate {
    prefix: String,
    suffix: String,
}

impl CategoryTemplate {
    pub fn parse(template: &str) -> Result<Self, DomainError> {
        let display = template.replace('_', " ");
        let Some((prefix, suffix)) = display.split_once(PLACEHOLDER) else {
            return Err(DomainError::TemplateWithoutPlaceholder {
                template: template.to_string(),
            });
        };
        if suffix.contains(PLACEHOLDER) {
            return Err(DomainError::validation(format!(
                "category template `{template}` repeats the `$1` placeholder"
            )));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Category title (display form) for the given user.
    pub fn render(&self, user_name: &str) -> String {
        let rendered = format!("{}{}{}", self.prefix, display_form(user_name), self.suffix);
        rendered.trim().to_string()
    }

    /// Category title in database key form (`Blog_posts_by_Alice`).
    pub fn render_db_key(&self, user_name: &str) -> String {
        to_db_key(&self.render(user_name))
    }

    /// True when `category_name` is exactly the category of `candidate`.
    pub fn matches(&self, category_name: &str, candidate: &str) -> bool {
        if candidate.trim().is_empty() {
            return false;
        }
        display_form(category_name) == self.render(candidate)
    }

    /// Structural check: the user name between the template's fixed parts.
    ///
    /// Returns `None` when the category does not have the template's shape.
    /// The returned name is a candidate only; callers resolve it to an account
    /// and confirm it with [`CategoryTemplate::matches`].
    pub fn extract_user(&self, category_name: &str) -> Option<String> {
        let display = display_form(category_name);
        let prefix = self.prefix.trim_start();
        let suffix = self.suffix.trim_end();

        let rest = display.strip_prefix(prefix)?;
        let name = rest.strip_suffix(suffix)?.trim();
        if name.is_empty() {
            return None;
        }

        Some(name.to_string())
    }
}

/// Display form of a title: underscores become spaces, outer whitespace is dropped.
pub fn display_form(title: &str) -> String {
    title.replace('_', " ").trim().to_string()
}

/// Database key form of a title: the display form with spaces as underscores.
pub fn to_db_key(title: &str) -> String {
    display_form(title).replace(' ', "_")
}
