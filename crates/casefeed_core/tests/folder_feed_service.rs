use casefeed_core::{
    ApplyOutcome, EventRecord, ExportColumn, FeedFilter, FilingRecord, FolderFeedService,
    InMemorySource, LoadStatus, MutationKind, MutationOutcome, NavDirection, NavigationOutcome,
    NotificationRecord, SortDirection, SourceError, SourceType,
};
use uuid::Uuid;

fn source() -> InMemorySource {
    InMemorySource::new(Uuid::new_v4())
        .with_filings(vec![
            FilingRecord::new("f1", "2024-03-03", "motion", "Motion to compel")
                .with_link("https://docs.example/f1.pdf"),
            FilingRecord::new("f2", "2024-03-02", "ruling", "Interim ruling"),
            FilingRecord::new("f3", "2024-03-01", "motion", "Reply brief")
                .with_link("https://docs.example/f3.pdf"),
        ])
        .with_notifications(vec![NotificationRecord::new(
            "n1",
            "2024-03-04",
            "certified_mail",
            "Service to defendant",
        )])
        .with_events(vec![EventRecord::new(
            "e1",
            "05/03/2024",
            "hearing",
            "Preliminary hearing",
        )])
}

#[test]
fn load_then_feed_merges_all_sources() {
    let source = source();
    let folder_id = source.folder_id();
    let mut service = FolderFeedService::new(source, folder_id, Some(2));

    let report = service.load();
    assert!(report.is_success());
    assert_eq!(report.notifications, Ok(1));
    assert_eq!(report.events, Ok(1));
    assert_eq!(service.filings().items().len(), 2);

    let feed = service.feed(&FeedFilter::all(), "", SortDirection::Descending);
    let ids = feed.iter().map(|record| record.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["e1", "n1", "f1", "f2"]);

    let export = service.export(
        &FeedFilter::only([SourceType::Event]),
        "",
        SortDirection::Descending,
        &[ExportColumn::Id, ExportColumn::Title],
    );
    assert_eq!(export, "id,title\ne1,Preliminary hearing");
}

#[test]
fn partial_failure_keeps_previous_arrays() {
    let source = source();
    let folder_id = source.folder_id();
    let mut service = FolderFeedService::new(source, folder_id, None);
    assert!(service.load().is_success());

    service
        .source()
        .fail_next(SourceError::Transport("timeout".to_string()));
    let report = service.load();

    assert!(!report.is_success());
    assert!(matches!(report.filings, ApplyOutcome::Failed(_)));
    assert_eq!(report.errors().len(), 1);
    assert_eq!(service.filings().status(), LoadStatus::Error);
    assert_eq!(service.filings().items().len(), 3);
    assert_eq!(service.notifications().len(), 1);
}

#[test]
fn successful_mutation_refreshes_only_its_source() {
    let source = source();
    let folder_id = source.folder_id();
    let mut service = FolderFeedService::new(source, folder_id, None);
    service.load();
    let filing_requests = service.source().filing_requests().len();
    let list_fetches = service.source().list_fetches();

    service.source().push_notification(NotificationRecord::new(
        "n2",
        "2024-03-06",
        "court_notice",
        "Ruling notice",
    ));
    let settled = service.settle_mutation(MutationOutcome::success(
        SourceType::Notification,
        MutationKind::Create,
        "n2".to_string(),
    ));

    assert!(settled.is_fully_applied());
    assert_eq!(settled.payload.as_deref(), Ok("n2"));
    assert_eq!(service.notifications().len(), 2);
    assert_eq!(service.source().filing_requests().len(), filing_requests);
    assert_eq!(service.source().list_fetches(), list_fetches + 1);

    service.source().push_event(EventRecord::new(
        "e2",
        "2024-03-12T09:00",
        "deadline",
        "Reply deadline",
    ));
    let settled = service.settle_mutation(MutationOutcome::success(
        SourceType::Event,
        MutationKind::Create,
        (),
    ));
    assert!(settled.is_fully_applied());
    assert_eq!(service.events().len(), 2);
    assert_eq!(service.notifications().len(), 2);
    assert_eq!(service.source().list_fetches(), list_fetches + 2);

    assert!(service.source().remove_filing("f2"));
    let settled = service.settle_mutation(MutationOutcome::success(
        SourceType::Filing,
        MutationKind::Delete,
        (),
    ));
    assert!(settled.is_fully_applied());
    assert_eq!(service.filings().position_of("f2"), None);
    assert_eq!(service.filings().meta().total, 2);
}

#[test]
fn failed_mutation_does_not_refresh() {
    let source = source();
    let folder_id = source.folder_id();
    let mut service = FolderFeedService::new(source, folder_id, None);
    service.load();
    let filing_requests = service.source().filing_requests().len();

    let settled = service.settle_mutation::<()>(MutationOutcome::failure(
        SourceType::Filing,
        MutationKind::ToggleComplete,
        SourceError::Server {
            status: 409,
            message: "conflict".to_string(),
        },
    ));

    assert!(settled.payload.is_err());
    assert_eq!(settled.refresh, None);
    assert!(!settled.is_fully_applied());
    assert_eq!(service.source().filing_requests().len(), filing_requests);
}

#[test]
fn document_navigation_runs_through_the_source() {
    let source = source();
    let folder_id = source.folder_id();
    let mut service = FolderFeedService::new(source, folder_id, Some(2));
    service.load();

    let outcome = service.navigate_document("f1", NavDirection::Forward);
    assert!(matches!(outcome, NavigationOutcome::Resolved(ref target) if target.id == "f3"));
    assert_eq!(service.filings().meta().page, 2);

    let outcome = service.navigate_document("f3", NavDirection::Forward);
    assert_eq!(outcome, NavigationOutcome::Exhausted);
    assert!(!service.navigator().is_busy());
}

#[test]
fn folders_are_independent() {
    let first = source();
    let second = InMemorySource::new(Uuid::new_v4());
    let first_id = first.folder_id();
    let second_id = second.folder_id();

    let mut first_service = FolderFeedService::new(first, first_id, None);
    let mut second_service = FolderFeedService::new(second, second_id, None);
    first_service.load();
    second_service.load();

    assert_eq!(first_service.feed(&FeedFilter::all(), "", SortDirection::Descending).len(), 5);
    assert!(second_service
        .feed(&FeedFilter::all(), "", SortDirection::Descending)
        .is_empty());
}
