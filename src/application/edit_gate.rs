//! Who may open the editor for a Blog page.

use crate::application::messages::MessageKey;
use crate::domain::entities::Actor;
use crate::domain::types::Namespace;

/// The editing user together with the rights the platform granted them.
#[derive(Debug, Clone)]
pub struct Editor {
    pub actor: Actor,
    pub has_edit_right: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDecision {
    Allowed,
    /// Anonymous editors must log in; the message differs for new pages.
    LoginRequired(MessageKey),
    PermissionRequired(MessageKey),
}

impl EditDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, EditDecision::Allowed)
    }

    pub fn message(self) -> Option<MessageKey> {
        match self {
            EditDecision::Allowed => None,
            EditDecision::LoginRequired(key) | EditDecision::PermissionRequired(key) => Some(key),
        }
    }
}

/// Pages outside the Blog namespace are never restricted here.
pub fn check_edit(namespace: Namespace, editor: &Editor, page_exists: bool) -> EditDecision {
    if !namespace.is_blog() {
        return EditDecision::Allowed;
    }

    if editor.actor.is_anonymous() {
        let key = if page_exists {
            MessageKey::BlogLoginEdit
        } else {
            MessageKey::BlogLogin
        };
        return EditDecision::LoginRequired(key);
    }

    if !editor.has_edit_right || editor.blocked {
        return EditDecision::PermissionRequired(MessageKey::BlogPermissionRequired);
    }

    EditDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(actor: Actor, has_edit_right: bool, blocked: bool) -> Editor {
        Editor {
            actor,
            has_edit_right,
            blocked,
        }
    }

    #[test]
    fn other_namespaces_are_untouched() {
        let anon = editor(Actor::Anonymous, false, true);
        assert!(check_edit(Namespace::MAIN, &anon, true).is_allowed());
        assert!(check_edit(Namespace::BLOG_TALK, &anon, true).is_allowed());
    }

    #[test]
    fn anonymous_editors_must_log_in() {
        let anon = editor(Actor::Anonymous, true, false);
        assert_eq!(
            check_edit(Namespace::BLOG, &anon, false),
            EditDecision::LoginRequired(MessageKey::BlogLogin)
        );
        assert_eq!(
            check_edit(Namespace::BLOG, &anon, true),
            EditDecision::LoginRequired(MessageKey::BlogLoginEdit)
        );
    }

    #[test]
    fn blocked_or_unprivileged_users_are_refused() {
        let blocked = editor(Actor::registered(1, "Alice"), true, true);
        let no_right = editor(Actor::registered(2, "Bob"), false, false);

        for user in [blocked, no_right] {
            let decision = check_edit(Namespace::BLOG, &user, true);
            assert_eq!(
                decision.message(),
                Some(MessageKey::BlogPermissionRequired)
            );
        }
    }

    #[test]
    fn registered_editors_with_rights_may_edit() {
        let alice = editor(Actor::registered(1, "Alice"), true, false);
        let decision = check_edit(Namespace::BLOG, &alice, false);
        assert!(decision.is_allowed());
        assert_eq!(decision.message(), None);
    }
}
