use anyhow::Result;
use platform_authz::{
    Action, PolicyContext, PolicyEngine, Principal, Role, can_assign_tasks, can_message,
    can_message_label, outranks, outranks_label, visible_employees,
};
use products_hr::{HrError, HrModule, seed::demo_employees};
use staffdesk_tests::demo_as;

#[test]
fn outranks_is_a_strict_order() {
    for a in Role::ALL {
        assert!(!outranks(a, a), "{a} must not outrank itself");
        for b in Role::ALL {
            assert!(!(outranks(a, b) && outranks(b, a)), "{a} and {b} outrank each other");
        }
    }
    assert!(!outranks(Role::Coo, Role::Cto));
    assert!(!outranks(Role::Cto, Role::Coo));
}

#[test]
fn assigners_stop_at_assistant_manager() {
    let assigners: Vec<Role> = Role::ALL.into_iter().filter(|r| can_assign_tasks(*r)).collect();
    assert_eq!(assigners.len(), 8);
    assert_eq!(assigners.last(), Some(&Role::AssistantManager));
    assert!(!can_assign_tasks(Role::TeamLead));
}

#[test]
fn messaging_follows_authority_except_for_the_founder() {
    for sender in Role::ALL {
        for receiver in Role::ALL {
            let expected = sender == Role::FounderDirector || outranks(sender, receiver);
            assert_eq!(can_message(sender, receiver), expected, "{sender} -> {receiver}");
        }
    }
    assert!(can_message(Role::FounderDirector, Role::FounderDirector));
}

#[test]
fn unknown_labels_deny_everything() {
    assert!(!outranks_label("Chief Vibes Officer", "Intern"));
    assert!(!can_message_label("Manager", "Contractor"));
    assert!(outranks_label("Vice President", "Team Lead"));
    assert!(can_message_label("Founder / Director", "CEO"));
}

#[test]
fn visibility_is_self_plus_outranked() {
    let all = demo_employees();
    for viewer in &all {
        let seen = visible_employees(&all, viewer);
        if Principal::role(viewer).is_top() {
            assert_eq!(seen.len(), all.len());
            continue;
        }
        let expected: Vec<&str> = all
            .iter()
            .filter(|emp| emp.id == viewer.id || outranks(viewer.role, emp.role))
            .map(|emp| emp.id.as_str())
            .collect();
        let actual: Vec<&str> = seen.iter().map(|emp| emp.id.as_str()).collect();
        assert_eq!(actual, expected, "viewer {}", viewer.id);
    }
}

#[test]
fn module_visibility_matches_the_evaluator() -> Result<()> {
    let hr = HrModule::demo();
    let all = demo_employees();
    for emp in &all {
        let session = hr.login(&emp.id)?;
        assert_eq!(
            hr.visible_employees(&session).len(),
            visible_employees(&all, emp).len(),
            "employee {}",
            emp.id
        );
    }
    Ok(())
}

#[test]
fn intern_sees_only_themselves() -> Result<()> {
    let (hr, intern) = demo_as("20")?;
    let ids: Vec<&str> = hr
        .visible_employees(&intern)
        .into_iter()
        .map(|emp| emp.id.as_str())
        .collect();
    assert_eq!(ids, ["20"]);
    assert!(hr.team(&intern).is_empty());
    Ok(())
}

#[test]
fn peers_at_rank_two_are_invisible_to_each_other() -> Result<()> {
    let (hr, cto) = demo_as("3")?;
    assert!(matches!(
        hr.employee(&cto, "4"),
        Err(HrError::NotFound { .. })
    ));
    let coo = hr.login("4")?;
    assert!(hr.employee(&coo, "3").is_err());
    Ok(())
}

#[test]
fn policy_engine_reports_the_denied_action() {
    let engine = PolicyEngine;
    let err = engine
        .check(&PolicyContext::new(Role::TeamLead, Action::AssignTask, Role::Intern))
        .unwrap_err();
    assert_eq!(err.to_string(), "Team Lead may not assign tasks");

    let err = engine
        .check(&PolicyContext::new(Role::Cto, Action::Message, Role::Coo))
        .unwrap_err();
    assert_eq!(err.to_string(), "CTO may not message COO");
}
