//! Embargo and lease lifecycle against the in-memory effect system.

use assert_matches::assert_matches;
use chrono::Duration;
use curate_access::{
    is_expired, ChildStatus, Deactivation, FanOut, LifecyclePolicy, TaskOutcome, TaskRunner,
    VisibilityLifecycle,
};
use curate_core::{
    AccessLevel, CurateError, Embargo, FanOutMode, Lease, ObjectId, TimedKind, TimedVisibility,
    Visibility,
};
use curate_testkit::*;

fn id(raw: &str) -> ObjectId {
    ObjectId::new(raw)
}

#[tokio::test]
async fn expired_embargo_is_deactivated() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(-1)).build())
        .await;
    let before = fx.get("w1").await;
    assert_eq!(before.visibility, Visibility::Restricted);
    assert!(is_expired(before.timed.as_ref().unwrap(), fx.clock.get()));

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let outcome = lifecycle.deactivate(&admin(), &id("w1"), false).await.unwrap();
    let report = assert_matches!(outcome, Deactivation::Applied(report) => report);
    assert_eq!(report.visibility, Visibility::Open);
    assert_eq!(report.fan_out, FanOut::NotRequested);
    assert_eq!(report.record.kind, TimedKind::Embargo);
    assert!(!report.record.early);

    let after = fx.get("w1").await;
    assert_eq!(after.visibility, Visibility::Open);
    assert!(after.timed.is_none());
    assert_eq!(after.history, vec![report.record]);
}

#[tokio::test]
async fn active_lease_is_rejected_without_change() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").leased_until(fx.days(1)).build())
        .await;
    let before = fx.get("w1").await;
    assert!(!is_expired(before.timed.as_ref().unwrap(), fx.clock.get()));

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let err = lifecycle
        .deactivate(&admin(), &id("w1"), true)
        .await
        .unwrap_err();
    assert_matches!(err, CurateError::StillActive { ref kind, .. } if kind == "lease");
    assert_eq!(fx.get("w1").await, before);
}

#[tokio::test]
async fn unauthorized_caller_never_mutates() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(-1)).build())
        .await;
    let before = fx.get("w1").await;

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let err = lifecycle
        .deactivate(&stranger(), &id("w1"), true)
        .await
        .unwrap_err();
    assert_matches!(err, CurateError::Unauthorized { .. });

    let after = fx.get("w1").await;
    assert_eq!(after.visibility, Visibility::Restricted);
    assert_eq!(after.timed, before.timed);
    assert!(after.history.is_empty());
}

#[tokio::test]
async fn deactivation_is_idempotent() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(-1)).build())
        .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);

    let first = lifecycle.deactivate(&admin(), &id("w1"), false).await.unwrap();
    assert_matches!(first, Deactivation::Applied(_));
    let after_first = fx.get("w1").await;

    let second = lifecycle.deactivate(&admin(), &id("w1"), false).await.unwrap();
    assert_eq!(second, Deactivation::NoActiveTimedState);
    assert_eq!(fx.get("w1").await, after_first);
}

#[tokio::test]
async fn deadline_passes_with_the_clock() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(2)).build())
        .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);

    assert_matches!(
        lifecycle.deactivate(&admin(), &id("w1"), false).await,
        Err(CurateError::StillActive { .. })
    );
    fx.clock.advance(Duration::days(2));
    assert_matches!(
        lifecycle.deactivate(&admin(), &id("w1"), false).await,
        Ok(Deactivation::Applied(_))
    );
}

#[tokio::test]
async fn editor_with_person_entry_may_deactivate() {
    let fx = Fixture::new();
    fx.insert(
        WorkBuilder::new("w1")
            .person("depositor", AccessLevel::Edit)
            .leased_until(fx.days(-3))
            .build(),
    )
    .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);
    lifecycle
        .deactivate(&depositor(), &id("w1"), false)
        .await
        .unwrap();
    assert_eq!(fx.get("w1").await.visibility, Visibility::Restricted);
}

#[tokio::test]
async fn unknown_object_is_not_found() {
    let fx = Fixture::new();
    let lifecycle = VisibilityLifecycle::new(&fx.system);
    assert_matches!(
        lifecycle.deactivate(&admin(), &id("missing"), false).await,
        Err(CurateError::NotFound { .. })
    );
}

#[tokio::test]
async fn inline_fan_out_reports_each_member() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("w1")
            .members(["f1", "f2", "c1", "gone"])
            .embargoed_until(fx.days(-1))
            .build(),
        WorkBuilder::file_set("f1").build(),
        WorkBuilder::file_set("f2").leased_until(fx.days(10)).build(),
        WorkBuilder::collection("c1").build(),
    ])
    .await;

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let outcome = lifecycle.deactivate(&admin(), &id("w1"), true).await.unwrap();
    let report = assert_matches!(outcome, Deactivation::Applied(report) => report);
    let children = assert_matches!(report.fan_out, FanOut::Inline(children) => children);

    assert_eq!(children[0].status, ChildStatus::Updated);
    assert_matches!(children[1].status, ChildStatus::Skipped(_));
    assert_eq!(children[2].status, ChildStatus::NotApplicable);
    assert_matches!(children[3].status, ChildStatus::Failed(CurateError::NotFound { .. }));

    assert_eq!(fx.get("f1").await.visibility, Visibility::Open);
    assert_eq!(fx.get("f2").await.visibility, Visibility::Open);
    assert_eq!(fx.get("c1").await.visibility, Visibility::Restricted);
}

#[tokio::test]
async fn fan_out_skips_members_already_matching() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("w1")
            .member("f1")
            .embargoed_until(fx.days(-1))
            .build(),
        WorkBuilder::file_set("f1").visibility(Visibility::Open).build(),
    ])
    .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let outcome = lifecycle.deactivate(&admin(), &id("w1"), true).await.unwrap();
    let fan_out = outcome.report().map(|r| r.fan_out.clone());
    assert_eq!(
        fan_out,
        Some(FanOut::Inline(vec![curate_access::ChildOutcome::new(
            id("f1"),
            ChildStatus::Unchanged
        )]))
    );
}

#[tokio::test]
async fn queued_fan_out_runs_through_task_runner() {
    let fx = Fixture::new();
    let (work, files) = work_with_files("w1", 2);
    fx.insert_all(files).await;
    fx.insert(
        WorkBuilder::new("w1")
            .members(work.members().unwrap().iter().cloned())
            .embargoed_until(fx.days(-1))
            .build(),
    )
    .await;

    let policy = LifecyclePolicy {
        fan_out: FanOutMode::Queued,
    };
    let lifecycle = VisibilityLifecycle::with_policy(&fx.system, policy);
    let outcome = lifecycle.deactivate(&admin(), &id("w1"), true).await.unwrap();
    assert_eq!(
        outcome.report().map(|r| r.fan_out.clone()),
        Some(FanOut::Queued { newly: true })
    );
    assert_eq!(fx.get("w1-f0").await.visibility, Visibility::Restricted);

    let queue = fx.system.queue().clone();
    let results = TaskRunner::new(&fx.system)
        .run_until_empty(|| queue.pop())
        .await;
    assert_eq!(results.len(), 1);
    let outcome = results[0].1.as_ref().unwrap();
    assert_matches!(outcome, TaskOutcome::Visibility { children, .. } if children.len() == 2);
    assert_eq!(fx.get("w1-f0").await.visibility, Visibility::Open);
    assert_eq!(fx.get("w1-f1").await.visibility, Visibility::Open);
}

#[tokio::test]
async fn release_early_lifts_active_state() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(30)).build())
        .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);

    let outcome = lifecycle
        .release_early(&admin(), &id("w1"), false)
        .await
        .unwrap();
    let report = assert_matches!(outcome, Deactivation::Applied(report) => report);
    assert!(report.record.early);
    assert!(report
        .record
        .to_string()
        .starts_with("An active embargo was deactivated on 2024-03-01"));

    let after = fx.get("w1").await;
    assert_eq!(after.visibility, Visibility::Open);
    assert!(after.timed.is_none());
}

#[tokio::test]
async fn release_early_still_requires_edit_rights() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(30)).build())
        .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);
    assert_matches!(
        lifecycle.release_early(&stranger(), &id("w1"), false).await,
        Err(CurateError::Unauthorized { .. })
    );
    assert!(fx.get("w1").await.embargo().is_some());
}

#[tokio::test]
async fn assigning_lease_replaces_embargo() {
    let fx = Fixture::new();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(5)).build())
        .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);

    let lease = Lease::new(fx.days(10), Visibility::Authenticated, Visibility::Restricted);
    let replaced = lifecycle
        .apply_timed_visibility(&admin(), &id("w1"), lease.clone().into())
        .await
        .unwrap();
    assert_matches!(replaced, Some(TimedVisibility::Embargo(_)));

    let after = fx.get("w1").await;
    assert!(after.embargo().is_none());
    assert_eq!(after.lease(), Some(&lease));
    assert_eq!(after.visibility, Visibility::Authenticated);
}

#[tokio::test]
async fn assignment_rejects_past_deadline_and_collections() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("w1").build(),
        WorkBuilder::collection("c1").build(),
    ])
    .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let past = Embargo::new(fx.days(-1), Visibility::Restricted, Visibility::Open);

    assert_matches!(
        lifecycle
            .apply_timed_visibility(&admin(), &id("w1"), past.into())
            .await,
        Err(CurateError::Invalid { .. })
    );
    let future = Embargo::new(fx.days(1), Visibility::Restricted, Visibility::Open);
    assert_matches!(
        lifecycle
            .apply_timed_visibility(&admin(), &id("c1"), future.into())
            .await,
        Err(CurateError::NotApplicable { .. })
    );
    assert!(fx.get("w1").await.timed.is_none());
}

#[tokio::test]
async fn update_deadline_moves_active_state_and_restores_visibility() {
    let fx = Fixture::new();
    let mut work = WorkBuilder::new("w1").embargoed_until(fx.days(5)).build();
    work.visibility = Visibility::Open;
    fx.insert(work).await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);

    let updated = lifecycle
        .update_deadline(&admin(), &id("w1"), fx.days(20))
        .await
        .unwrap();
    assert_eq!(updated.deadline(), fx.days(20));

    let after = fx.get("w1").await;
    assert_eq!(after.timed, Some(updated));
    assert_eq!(after.visibility, Visibility::Restricted);
}

#[tokio::test]
async fn update_deadline_requires_active_state() {
    let fx = Fixture::new();
    fx.insert_all([
        WorkBuilder::new("plain").build(),
        WorkBuilder::new("expired").leased_until(fx.days(-1)).build(),
    ])
    .await;
    let lifecycle = VisibilityLifecycle::new(&fx.system);

    assert_matches!(
        lifecycle.update_deadline(&admin(), &id("plain"), fx.days(3)).await,
        Err(CurateError::NoActiveTimedState { .. })
    );
    assert_matches!(
        lifecycle.update_deadline(&admin(), &id("expired"), fx.days(3)).await,
        Err(CurateError::Invalid { .. })
    );
}

#[tokio::test]
async fn failed_save_leaves_object_unchanged() {
    let (fx, faults) = Fixture::with_faults();
    fx.insert(WorkBuilder::new("w1").embargoed_until(fx.days(-1)).build())
        .await;
    faults.fail_saves_for("w1");
    let before = fx.get("w1").await;

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    assert_matches!(
        lifecycle.deactivate(&admin(), &id("w1"), false).await,
        Err(CurateError::Persist { .. })
    );
    assert_eq!(fx.get("w1").await, before);
}

#[tokio::test]
async fn member_save_failure_does_not_undo_parent() {
    let (fx, faults) = Fixture::with_faults();
    fx.insert_all([
        WorkBuilder::new("w1")
            .members(["f1", "f2"])
            .embargoed_until(fx.days(-1))
            .build(),
        WorkBuilder::file_set("f1").build(),
        WorkBuilder::file_set("f2").build(),
    ])
    .await;
    faults.fail_saves_for("f1");

    let lifecycle = VisibilityLifecycle::new(&fx.system);
    let outcome = lifecycle.deactivate(&admin(), &id("w1"), true).await.unwrap();
    let report = assert_matches!(outcome, Deactivation::Applied(report) => report);
    assert_eq!(report.fan_out.failures(), 1);

    assert_eq!(fx.get("w1").await.visibility, Visibility::Open);
    assert_eq!(fx.get("f1").await.visibility, Visibility::Restricted);
    assert_eq!(fx.get("f2").await.visibility, Visibility::Open);
    assert_eq!(faults.saves(), vec![id("w1"), id("f2")]);
}
