//! Authorization policy for feedback records.
//!
//! Every handler asks these functions before reading or mutating feedback.
//! Edit is owner-only while delete also admits staff; the two checks must stay
//! separate.

use super::{CurrentUser, UserId};

/// Any authenticated user may submit feedback, staff included.
#[must_use]
pub const fn can_submit_feedback(user: &CurrentUser) -> bool {
    user.is_authenticated()
}

/// Personal feedback lists are for regular members; staff use the dashboard.
#[must_use]
pub const fn can_view_own_feedback_list(user: &CurrentUser) -> bool {
    user.is_authenticated() && !user.is_staff()
}

#[must_use]
pub const fn can_view_admin_dashboard(user: &CurrentUser) -> bool {
    user.is_staff()
}

/// Only the author may edit. Feedback without an author is editable by no one.
#[must_use]
pub fn can_edit(user: &CurrentUser, author: Option<UserId>) -> bool {
    is_owner(user, author)
}

/// The author or any staff member may delete.
#[must_use]
pub fn can_delete(user: &CurrentUser, author: Option<UserId>) -> bool {
    user.is_staff() || is_owner(user, author)
}

#[must_use]
pub const fn can_reply(user: &CurrentUser) -> bool {
    user.is_staff()
}

fn is_owner(user: &CurrentUser, author: Option<UserId>) -> bool {
    match (user.id(), author) {
        (Some(current), Some(author)) => current == author,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionUser;

    fn member(id: i32) -> CurrentUser {
        CurrentUser::Authenticated(SessionUser {
            id: UserId::new(id),
            username: format!("member{id}"),
            is_staff: false,
            is_superuser: false,
        })
    }

    fn staff(id: i32) -> CurrentUser {
        CurrentUser::Authenticated(SessionUser {
            id: UserId::new(id),
            username: format!("staff{id}"),
            is_staff: true,
            is_superuser: false,
        })
    }

    fn superuser(id: i32) -> CurrentUser {
        CurrentUser::Authenticated(SessionUser {
            id: UserId::new(id),
            username: format!("root{id}"),
            is_staff: false,
            is_superuser: true,
        })
    }

    #[test]
    fn submit_requires_authentication() {
        assert!(!can_submit_feedback(&CurrentUser::Anonymous));
        assert!(can_submit_feedback(&member(1)));
        assert!(can_submit_feedback(&staff(2)));
    }

    #[test]
    fn own_list_is_members_only() {
        assert!(can_view_own_feedback_list(&member(1)));
        assert!(!can_view_own_feedback_list(&staff(2)));
        assert!(!can_view_own_feedback_list(&superuser(3)));
        assert!(!can_view_own_feedback_list(&CurrentUser::Anonymous));
    }

    #[test]
    fn dashboard_is_staff_only() {
        assert!(can_view_admin_dashboard(&staff(2)));
        assert!(can_view_admin_dashboard(&superuser(3)));
        assert!(!can_view_admin_dashboard(&member(1)));
        assert!(!can_view_admin_dashboard(&CurrentUser::Anonymous));
    }

    #[test]
    fn edit_is_owner_only_without_staff_override() {
        let author = Some(UserId::new(1));

        assert!(can_edit(&member(1), author));
        assert!(!can_edit(&member(4), author));
        assert!(!can_edit(&staff(2), author));
        assert!(!can_edit(&superuser(3), author));
        assert!(!can_edit(&CurrentUser::Anonymous, author));
    }

    #[test]
    fn authorless_feedback_is_owned_by_no_one() {
        assert!(!can_edit(&member(1), None));
        assert!(!can_delete(&member(1), None));
        assert!(can_delete(&staff(2), None));
    }

    #[test]
    fn delete_allows_owner_and_staff() {
        let author = Some(UserId::new(1));

        assert!(can_delete(&member(1), author));
        assert!(can_delete(&staff(2), author));
        assert!(can_delete(&superuser(3), author));
        assert!(!can_delete(&member(4), author));
        assert!(!can_delete(&CurrentUser::Anonymous, author));
    }

    #[test]
    fn staff_can_delete_regardless_of_author() {
        for author in [None, Some(UserId::new(1)), Some(UserId::new(2))] {
            assert!(can_delete(&staff(2), author));
        }
    }

    #[test]
    fn reply_is_staff_only() {
        assert!(can_reply(&staff(2)));
        assert!(can_reply(&superuser(3)));
        assert!(!can_reply(&member(1)));
        assert!(!can_reply(&CurrentUser::Anonymous));
    }
}
