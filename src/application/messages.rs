//! Content-language message templates.
//!
//! Messages use positional placeholders (`$1`, `$2`, ...). Rendering is a
//! plain substitution; no plural or grammar handling is done here.

use std::collections::HashMap;

use crate::config::MessagesSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Category holding a user's blog posts (`Blog posts by $1`).
    BlogByUserCategory,
    /// Display label for a user's blog (`Blog by user $1`).
    BlogByUser,
    BlogLogin,
    BlogLoginEdit,
    BlogPermissionRequired,
}

impl MessageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::BlogByUserCategory => "blog-by-user-category",
            MessageKey::BlogByUser => "blog-by-user",
            MessageKey::BlogLogin => "blog-login",
            MessageKey::BlogLoginEdit => "blog-login-edit",
            MessageKey::BlogPermissionRequired => "blog-permission-required",
        }
    }

    fn default_text(self) -> &'static str {
        match self {
            MessageKey::BlogByUserCategory => "Blog posts by $1",
            MessageKey::BlogByUser => "Blog by user $1",
            MessageKey::BlogLogin => "You must be logged in to create blog posts.",
            MessageKey::BlogLoginEdit => "You must be logged in to edit blog posts.",
            MessageKey::BlogPermissionRequired => {
                "You do not have the required permission to create or edit blog posts."
            }
        }
    }
}

/// Localization collaborator.
pub trait Localizer: Send + Sync {
    /// Unrendered template text in the content language.
    fn text(&self, key: MessageKey) -> String;

    fn render(&self, key: MessageKey, args: &[&str]) -> String {
        substitute(&self.text(key), args)
    }
}

/// Substitute `$1..$n` in a single left-to-right pass.
///
/// Inserted arguments are never rescanned. Placeholders without a matching
/// argument are kept as written.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(dollar) = rest.find('$') {
        rendered.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        let digits = after
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(after.len());

        let arg = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| args.get(index));
        match arg {
            Some(arg) => rendered.push_str(arg),
            None => rendered.push_str(&rest[dollar..dollar + 1 + digits]),
        }
        rest = &after[digits..];
    }

    rendered.push_str(rest);
    rendered
}

/// Messages resolved from configuration, falling back to built-in English text.
#[derive(Debug, Clone, Default)]
pub struct ContentLanguageMessages {
    overrides: HashMap<MessageKey, String>,
}

impl ContentLanguageMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, key: MessageKey, text: impl Into<String>) -> Self {
        self.overrides.insert(key, text.into());
        self
    }
}

impl From<&MessagesSettings> for ContentLanguageMessages {
    fn from(settings: &MessagesSettings) -> Self {
        Self::new()
            .with_override(
                MessageKey::BlogByUserCategory,
                settings.blog_by_user_category.clone(),
            )
            .with_override(MessageKey::BlogByUser, settings.blog_by_user.clone())
    }
}

impl Localizer for ContentLanguageMessages {
    fn text(&self, key: MessageKey) -> String {
        self.overrides
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_text().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_defaults_with_arguments() {
        let messages = ContentLanguageMessages::new();
        assert_eq!(
            messages.render(MessageKey::BlogByUserCategory, &["Alice"]),
            "Blog posts by Alice"
        );
        assert_eq!(
            messages.render(MessageKey::BlogByUser, &["Alice"]),
            "Blog by user Alice"
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let messages = ContentLanguageMessages::new()
            .with_override(MessageKey::BlogByUserCategory, "Blogeinträge von $1");
        assert_eq!(
            messages.render(MessageKey::BlogByUserCategory, &["Jörg"]),
            "Blogeinträge von Jörg"
        );
        assert_eq!(messages.text(MessageKey::BlogLogin), MessageKey::BlogLogin.default_text());
    }

    #[test]
    fn substitution_handles_double_digit_placeholders() {
        let args: Vec<String> = (1..=10).map(|n| format!("a{n}")).collect();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        assert_eq!(substitute("$1-$10", &refs), "a1-a10");
    }

    #[test]
    fn inserted_arguments_are_not_rescanned() {
        assert_eq!(substitute("$1 $2", &["x", "$1"]), "x $1");
        assert_eq!(substitute("$2/$1", &["$2", "y"]), "y/$2");
    }

    #[test]
    fn unmatched_placeholders_are_kept() {
        assert_eq!(substitute("$0 $3 $ costs $1", &["five"]), "$0 $3 $ costs five");
    }

    #[test]
    fn keys_use_platform_message_names() {
        assert_eq!(MessageKey::BlogByUserCategory.as_str(), "blog-by-user-category");
        assert_eq!(
            MessageKey::BlogPermissionRequired.as_str(),
            "blog-permission-required"
        );
    }
}
