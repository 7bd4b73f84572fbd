//! Unit tests for the authorisation policy engine.

use super::*;
use rstest::{fixture, rstest};
use uuid::Uuid;

fn user(n: u128) -> UserId {
    UserId::from_uuid(Uuid::from_u128(n))
}

#[fixture]
fn owner() -> UserId {
    user(1)
}

#[fixture]
fn assignee() -> UserId {
    user(2)
}

#[fixture]
fn stranger() -> UserId {
    user(3)
}

#[rstest]
#[case(Role::Client)]
#[case(Role::Technician)]
#[case(Role::Admin)]
fn owner_may_update_delete_and_reopen(owner: UserId, #[case] role: Role) {
    let actor = Actor::new(owner, role);
    let resource = ResourceOwnership::ticket(&owner, None);
    for action in [
        Action::ViewTicket,
        Action::UpdateTicket,
        Action::DeleteTicket,
        Action::ReopenTicket,
    ] {
        assert!(decide(&actor, &resource, &action).is_allowed(), "{action:?}");
    }
}

#[rstest]
fn assigned_technician_may_update_delete_and_reopen(owner: UserId, assignee: UserId) {
    let actor = Actor::new(assignee, Role::Technician);
    let resource = ResourceOwnership::ticket(&owner, Some(&assignee));

    assert_eq!(
        decide(&actor, &resource, &Action::UpdateTicket),
        Decision::Allow(AllowReason::Assignee)
    );
    assert_eq!(
        decide(&actor, &resource, &Action::DeleteTicket),
        Decision::Allow(AllowReason::Assignee)
    );
    assert_eq!(
        decide(&actor, &resource, &Action::ReopenTicket),
        Decision::Allow(AllowReason::Assignee)
    );
}

#[rstest]
fn stranger_cannot_reopen(owner: UserId, stranger: UserId) {
    let resource = ResourceOwnership::ticket(&owner, None);
    for role in [Role::Client, Role::Technician] {
        assert_eq!(
            decide(&Actor::new(stranger, role), &resource, &Action::ReopenTicket),
            Decision::Deny(DenyReason::NotPermitted)
        );
    }
}

#[rstest]
fn client_recorded_as_assignee_gains_nothing(owner: UserId, assignee: UserId) {
    let actor = Actor::new(assignee, Role::Client);
    let resource = ResourceOwnership::ticket(&owner, Some(&assignee));
    assert_eq!(
        decide(&actor, &resource, &Action::UpdateTicket),
        Decision::Deny(DenyReason::NotPermitted)
    );
}

/// `canUpdate(R, T)` holds iff admin, creator, or assigned technician.
#[rstest]
fn update_permission_matches_relationship_table(owner: UserId, assignee: UserId, stranger: UserId) {
    let resource = ResourceOwnership::ticket(&owner, Some(&assignee));
    for role in [Role::Client, Role::Technician, Role::Admin] {
        for id in [owner, assignee, stranger] {
            let actor = Actor::new(id, role);
            let expected = role == Role::Admin
                || id == owner
                || (role == Role::Technician && id == assignee);
            assert_eq!(
                decide(&actor, &resource, &Action::UpdateTicket).is_allowed(),
                expected,
                "role={role} id={id}"
            );
        }
    }
}

#[rstest]
fn technician_may_assign_to_self_only(owner: UserId, assignee: UserId, stranger: UserId) {
    let actor = Actor::new(assignee, Role::Technician);
    let resource = ResourceOwnership::ticket(&owner, None);

    assert_eq!(
        decide(&actor, &resource, &Action::AssignTicket { assignee: &assignee }),
        Decision::Allow(AllowReason::SelfAssignment)
    );
    assert_eq!(
        decide(&actor, &resource, &Action::AssignTicket { assignee: &stranger }),
        Decision::Deny(DenyReason::AssignToOthers)
    );
}

#[rstest]
fn technician_owning_ticket_still_cannot_assign_others(owner: UserId, stranger: UserId) {
    let actor = Actor::new(owner, Role::Technician);
    let resource = ResourceOwnership::ticket(&owner, None);
    assert_eq!(
        decide(&actor, &resource, &Action::AssignTicket { assignee: &stranger }),
        Decision::Deny(DenyReason::AssignToOthers)
    );
}

#[rstest]
fn client_cannot_assign_even_to_self(owner: UserId) {
    let actor = Actor::new(owner, Role::Client);
    let resource = ResourceOwnership::ticket(&owner, None);
    assert_eq!(
        decide(&actor, &resource, &Action::AssignTicket { assignee: &owner }),
        Decision::Deny(DenyReason::InsufficientRole)
    );
}

#[rstest]
fn admin_may_assign_anyone(owner: UserId, stranger: UserId) {
    let admin = Actor::new(user(9), Role::Admin);
    let resource = ResourceOwnership::ticket(&owner, None);
    assert_eq!(
        decide(&admin, &resource, &Action::AssignTicket { assignee: &stranger }),
        Decision::Allow(AllowReason::Admin)
    );
}

#[rstest]
fn admin_self_protection_is_a_distinct_denial(stranger: UserId) {
    let admin_id = user(9);
    let admin = Actor::new(admin_id, Role::Admin);
    let none = ResourceOwnership::none();

    assert_eq!(
        decide(&admin, &none, &Action::ChangeUserRole { target: &admin_id }),
        Decision::Deny(DenyReason::SelfAction)
    );
    assert_eq!(
        decide(&admin, &none, &Action::DeleteUser { target: &admin_id }),
        Decision::Deny(DenyReason::SelfAction)
    );
    assert!(decide(&admin, &none, &Action::DeleteUser { target: &stranger }).is_allowed());
}

#[rstest]
#[case(Role::Client, false)]
#[case(Role::Technician, true)]
#[case(Role::Admin, true)]
fn activity_is_staff_only(stranger: UserId, #[case] role: Role, #[case] allowed: bool) {
    let actor = Actor::new(stranger, role);
    assert_eq!(
        decide(&actor, &ResourceOwnership::none(), &Action::ViewActivity).is_allowed(),
        allowed
    );
}

#[rstest]
#[case(Role::Client)]
#[case(Role::Technician)]
fn user_administration_is_admin_only(stranger: UserId, owner: UserId, #[case] role: Role) {
    let actor = Actor::new(stranger, role);
    let none = ResourceOwnership::none();
    for action in [
        Action::ManageUsers,
        Action::ChangeUserRole { target: &owner },
        Action::DeleteUser { target: &owner },
    ] {
        assert_eq!(
            decide(&actor, &none, &action),
            Decision::Deny(DenyReason::InsufficientRole)
        );
    }
}

#[rstest]
fn comment_author_may_edit_but_others_may_not(owner: UserId, stranger: UserId) {
    let resource = ResourceOwnership::owned_by(&owner);
    let author = Actor::new(owner, Role::Client);
    let other = Actor::new(stranger, Role::Technician);

    assert!(decide(&author, &resource, &Action::EditComment).is_allowed());
    assert!(decide(&author, &resource, &Action::DeleteComment).is_allowed());
    assert_eq!(
        decide(&other, &resource, &Action::EditComment),
        Decision::Deny(DenyReason::NotPermitted)
    );
}

#[rstest]
fn denial_maps_to_forbidden_with_reason_code() {
    let error = Decision::Deny(DenyReason::AssignToOthers)
        .into_result("Technicians may only assign tickets to themselves")
        .expect_err("denied");
    assert_eq!(error.code(), crate::domain::ErrorCode::Forbidden);
    assert_eq!(
        error.details(),
        Some(&json!({ "code": "assign_to_others" }))
    );
}

#[rstest]
fn self_action_maps_to_its_own_error_code() {
    let error = Decision::Deny(DenyReason::SelfAction)
        .into_result("Admins cannot delete their own account")
        .expect_err("denied");
    assert_eq!(error.code(), crate::domain::ErrorCode::SelfAction);
}

#[rstest]
fn listing_scope_follows_role(owner: UserId, assignee: UserId, stranger: UserId) {
    let admin = TicketScope::for_actor(&Actor::new(stranger, Role::Admin));
    let technician = TicketScope::for_actor(&Actor::new(assignee, Role::Technician));
    let client = TicketScope::for_actor(&Actor::new(owner, Role::Client));

    assert!(admin.admits(&owner, None));
    assert!(technician.admits(&owner, Some(&assignee)));
    assert!(!technician.admits(&owner, None));
    assert!(client.admits(&owner, Some(&assignee)));
    assert!(!client.admits(&stranger, Some(&owner)));
}
