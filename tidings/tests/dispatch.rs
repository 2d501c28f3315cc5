use std::sync::Arc;
use tidings::{
    Dispatcher, FailurePolicy, Fields, HandlerFailure, InvocationError, testing::CallLog,
};

mod common;
use common::{Faulty, ProfileSink, Recorder, TextualSink};

#[tokio::test]
async fn test_unregistered_tags_invoke_nothing() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    dispatcher.enlist(&Recorder::new("t", &log));

    for tag in ["C", "a", "", "A "] {
        assert!(!dispatcher.should_notify(tag));
        assert_eq!(dispatcher.notify(tag, &Fields::new()).await.unwrap(), 0);
    }
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_enlist_announces_every_declared_tag() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    assert!(!dispatcher.should_notify("A"));

    let added = dispatcher.enlist(&Recorder::new("t", &log));

    assert_eq!(added, 3);
    assert!(dispatcher.should_notify("A"));
    assert!(dispatcher.should_notify("B"));
    assert!(!dispatcher.should_notify("C"));
    assert_eq!(dispatcher.len(), 3);
}

#[tokio::test]
async fn test_registration_order_is_invocation_order() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    dispatcher.enlist(&Recorder::new("t1", &log));
    dispatcher.enlist(&Recorder::new("t2", &log));
    dispatcher.enlist(&Recorder::new("t3", &log));

    let invoked = dispatcher.notify("X", &()).await.unwrap();

    assert_eq!(invoked, 3);
    assert_eq!(log.entries(), ["t1:X", "t2:X", "t3:X"]);
}

#[tokio::test]
async fn test_reenlisting_duplicates_bindings() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    let target = Recorder::new("same", &log);

    dispatcher.enlist(&target);
    dispatcher.enlist(&target);

    assert_eq!(dispatcher.handler_count("A"), 2);
    assert_eq!(dispatcher.notify("A", &()).await.unwrap(), 2);
    assert_eq!(log.entries(), ["same:A", "same:A"]);
}

#[tokio::test]
async fn test_registry_keeps_targets_alive() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    let target = Recorder::new("kept", &log);
    dispatcher.enlist(&target);

    let weak = Arc::downgrade(&target);
    drop(target);
    assert!(weak.upgrade().is_some());

    dispatcher.notify("B", &()).await.unwrap();
    assert_eq!(log.entries(), ["kept:B"]);
}

#[tokio::test]
async fn test_binding_failure_does_not_block_other_handlers() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    dispatcher.enlist(&ProfileSink::new(&log));
    dispatcher.enlist(&TextualSink::new(&log));

    let bundle = Fields::new().with("name", "Alice").with("age", "thirty");
    let err = dispatcher
        .notify("profile.updated", &bundle)
        .await
        .unwrap_err();

    assert_eq!(log.entries(), ["text Alice/thirty"]);
    assert_eq!(err.attempted, 2);
    assert_eq!(err.succeeded(), 1);

    let HandlerFailure::Binding(failure) = &err.failures[0] else {
        panic!("expected a binding failure, got {:?}", err.failures[0]);
    };
    assert_eq!(failure.tag, "profile.updated");
    assert_eq!(failure.handler, "on_profile");
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.errors[0].name, "age");
    assert_eq!(failure.errors[0].index, 1);
}

#[tokio::test]
async fn test_handler_errors_and_panics_are_isolated() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    dispatcher.enlist(&Recorder::new("before", &log));
    dispatcher.enlist(&Arc::new(Faulty));
    dispatcher.enlist(&Recorder::new("after", &log));

    let err = dispatcher.notify("X", &()).await.unwrap_err();

    assert_eq!(log.entries(), ["before:X", "after:X"]);
    assert_eq!(err.attempted, 4);
    assert_eq!(err.failures.len(), 2);
    assert!(matches!(
        &err.failures[0],
        HandlerFailure::Invocation(InvocationError::Failed { handler, .. }) if handler == "refuse"
    ));
    assert!(matches!(
        &err.failures[1],
        HandlerFailure::Invocation(InvocationError::Panicked { message, .. })
            if message == "handler exploded"
    ));
}

#[tokio::test]
async fn test_abort_policy_stops_delivery() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::builder()
        .failure_policy(FailurePolicy::Abort)
        .build();
    dispatcher.enlist(&Recorder::new("before", &log));
    dispatcher.enlist(&Arc::new(Faulty));
    dispatcher.enlist(&Recorder::new("after", &log));

    let err = dispatcher.notify("X", &()).await.unwrap_err();

    assert_eq!(log.entries(), ["before:X"]);
    assert_eq!(err.attempted, 2);
    assert_eq!(err.failures[0].handler(), "refuse");
}

#[tokio::test]
#[should_panic(expected = "handler exploded")]
async fn test_panics_propagate_when_not_caught() {
    let dispatcher = Dispatcher::builder().catch_panics(false).build();
    dispatcher.enlist(&Arc::new(Faulty));
    let _ = dispatcher.notify("X", &()).await;
}

#[tokio::test]
async fn test_queries_reflect_registrations() {
    let log = CallLog::new();
    let dispatcher = Dispatcher::new();
    assert!(dispatcher.is_empty());

    dispatcher.enlist(&Recorder::new("t", &log));
    dispatcher.enlist(&Arc::new(Faulty));

    let tags: Vec<_> = dispatcher.tags().iter().map(|t| t.to_string()).collect();
    assert_eq!(tags, ["A", "B", "X"]);
    assert_eq!(dispatcher.handler_count("X"), 3);
    assert_eq!(dispatcher.len(), 5);
    assert!(!dispatcher.is_empty());
}
