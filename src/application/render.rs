//! Render capabilities decided once per page view.
//!
//! The platform asks for a [`RenderContext`] when it dispatches a title to a
//! renderer and threads it through the skin; nothing here touches global
//! hook lists.

use crate::domain::types::Namespace;

pub const BLOG_STYLE_MODULE: &str = "ext.blogPage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Article,
    Blog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub page_kind: PageKind,
    pub show_category_links: bool,
    pub client_cache: bool,
    pub style_modules: Vec<&'static str>,
}

impl RenderContext {
    fn article() -> Self {
        Self {
            page_kind: PageKind::Article,
            show_category_links: true,
            client_cache: true,
            style_modules: Vec::new(),
        }
    }

    fn blog() -> Self {
        Self {
            page_kind: PageKind::Blog,
            show_category_links: false,
            client_cache: false,
            style_modules: vec![BLOG_STYLE_MODULE],
        }
    }
}

/// Blog pages hide category links, skip client caching and load the blog styles.
pub fn render_context_for(namespace: Namespace) -> RenderContext {
    if namespace.is_blog() {
        RenderContext::blog()
    } else {
        RenderContext::article()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_pages_hide_category_links() {
        let context = render_context_for(Namespace::BLOG);
        assert_eq!(context.page_kind, PageKind::Blog);
        assert!(!context.show_category_links);
        assert!(!context.client_cache);
        assert_eq!(context.style_modules, vec![BLOG_STYLE_MODULE]);
    }

    #[test]
    fn other_pages_keep_defaults() {
        for namespace in [Namespace::MAIN, Namespace::BLOG_TALK, Namespace::CATEGORY] {
            let context = render_context_for(namespace);
            assert_eq!(context.page_kind, PageKind::Article);
            assert!(context.show_category_links);
            assert!(context.client_cache);
            assert!(context.style_modules.is_empty());
        }
    }
}
