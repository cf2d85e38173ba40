use casefeed_core::{
    aggregate, EventRecord, FeedFilter, FeedSources, FilingRecord, NotificationRecord,
    SortDirection, SourceType,
};
use std::collections::HashSet;

fn filings() -> Vec<FilingRecord> {
    let mut ruling = FilingRecord::new("f1", "2024-03-05", "ruling", "Interim ruling");
    ruling.description = Some("Court grants the injunction".to_string());
    vec![
        ruling,
        FilingRecord::new("f2", "12/03/2024", "motion", "Motion to compel"),
        FilingRecord::new("f3", "not-a-date", "motion", "Unreadable motion"),
    ]
}

fn notifications() -> Vec<NotificationRecord> {
    vec![
        NotificationRecord::new("n1", "2024-03-05", "certified_mail", "Service to defendant"),
        NotificationRecord::new("n2", "2024-03-01T10:00:00Z", "court_notice", "Hearing notice"),
    ]
}

fn events() -> Vec<EventRecord> {
    vec![
        EventRecord::new("e1", "2024-03-05", "hearing", "Preliminary hearing"),
        EventRecord::new("e2", "2024-03-20T09:30:00-03:00", "deadline", "Appeal deadline"),
        EventRecord::new("f1", "2024-02-28", "reminder", "Call client"),
    ]
}

fn ids(records: &[casefeed_core::ActivityRecord<'_>]) -> Vec<String> {
    records
        .iter()
        .map(|record| format!("{}:{}", record.source_type.as_str(), record.id))
        .collect()
}

fn sized_sources(
    filing_count: usize,
    notification_count: usize,
    event_count: usize,
) -> (Vec<FilingRecord>, Vec<NotificationRecord>, Vec<EventRecord>) {
    let filings = (0..filing_count)
        .map(|idx| FilingRecord::new(format!("r{idx}"), "2024-03-05", "motion", "Motion"))
        .collect();
    let notifications = (0..notification_count)
        .map(|idx| NotificationRecord::new(format!("r{idx}"), "05/03/2024", "email", "Notice"))
        .collect();
    let events = (0..event_count)
        .map(|idx| EventRecord::new(format!("r{idx}"), "bad-date", "hearing", "Hearing"))
        .collect();
    (filings, notifications, events)
}

#[test]
fn unfiltered_feed_keeps_every_record() {
    let sizes = [
        (0, 0, 0),
        (3, 0, 0),
        (0, 2, 0),
        (0, 0, 4),
        (1, 1, 1),
        (5, 3, 7),
    ];
    for (n, m, k) in sizes {
        let (filings, notifications, events) = sized_sources(n, m, k);
        let sources = FeedSources {
            filings: &filings,
            notifications: &notifications,
            events: &events,
        };

        let feed = aggregate(sources, &FeedFilter::all(), "", SortDirection::Descending);
        assert_eq!(feed.len(), n + m + k, "sizes ({n}, {m}, {k})");

        let keys = feed
            .iter()
            .map(|record| record.key())
            .collect::<HashSet<_>>();
        assert_eq!(keys.len(), feed.len(), "(source_type, id) must be unique");
    }

    let (filings, notifications, events) = (filings(), notifications(), events());
    let sources = FeedSources {
        filings: &filings,
        notifications: &notifications,
        events: &events,
    };
    let feed = aggregate(sources, &FeedFilter::all(), "", SortDirection::Descending);
    assert_eq!(feed.len(), filings.len() + notifications.len() + events.len());
}

#[test]
fn aggregate_is_idempotent() {
    let (filings, notifications, events) = (filings(), notifications(), events());
    let sources = FeedSources {
        filings: &filings,
        notifications: &notifications,
        events: &events,
    };

    let first = aggregate(sources, &FeedFilter::all(), "mo", SortDirection::Ascending);
    let second = aggregate(sources, &FeedFilter::all(), "mo", SortDirection::Ascending);
    assert_eq!(first, second);
}

#[test]
fn ascending_output_is_monotonic_with_malformed_dates_first() {
    let (filings, notifications, events) = (filings(), notifications(), events());
    let sources = FeedSources {
        filings: &filings,
        notifications: &notifications,
        events: &events,
    };

    let feed = aggregate(sources, &FeedFilter::all(), "", SortDirection::Ascending);
    for pair in feed.windows(2) {
        assert!(pair[0].effective_date <= pair[1].effective_date);
    }
    assert_eq!(feed[0].id, "f3");
    assert_eq!(feed[0].effective_date, casefeed_core::EPOCH_SENTINEL);
    assert_eq!(feed[0].raw_date_text, "not-a-date");
}

#[test]
fn equal_instants_keep_input_order_across_direction_toggles() {
    let (filings, notifications, events) = (filings(), notifications(), events());
    let sources = FeedSources {
        filings: &filings,
        notifications: &notifications,
        events: &events,
    };
    let same_instant = ["filing:f1", "notification:n1", "event:e1"];

    let mut direction = SortDirection::Ascending;
    for _ in 0..4 {
        let feed = aggregate(sources, &FeedFilter::all(), "", direction);
        let order = ids(&feed)
            .into_iter()
            .filter(|key| same_instant.contains(&key.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(order, same_instant, "direction {direction:?}");
        direction = direction.toggled();
    }
}

#[test]
fn descending_puts_newest_first() {
    let (filings, notifications, events) = (filings(), notifications(), events());
    let sources = FeedSources {
        filings: &filings,
        notifications: &notifications,
        events: &events,
    };

    let feed = aggregate(sources, &FeedFilter::all(), "", SortDirection::Descending);
    assert_eq!(feed[0].id, "e2");
    assert_eq!(feed.last().map(|record| record.id.as_str()), Some("f3"));
}

#[test]
fn source_filter_and_search_compose() {
    let (filings, notifications, events) = (filings(), notifications(), events());
    let sources = FeedSources {
        filings: &filings,
        notifications: &notifications,
        events: &events,
    };

    let only_filings = FeedFilter::only([SourceType::Filing]);
    let motions = aggregate(sources, &only_filings, "MOTION", SortDirection::Descending);
    assert_eq!(ids(&motions), vec!["filing:f2", "filing:f3"]);

    let by_description = aggregate(
        sources,
        &FeedFilter::all(),
        "injunction",
        SortDirection::Descending,
    );
    assert_eq!(ids(&by_description), vec!["filing:f1"]);

    let by_sub_type = aggregate(
        sources,
        &FeedFilter::all(),
        "court_NOTICE",
        SortDirection::Descending,
    );
    assert_eq!(ids(&by_sub_type), vec!["notification:n2"]);

    let padded = aggregate(sources, &only_filings, "motion ", SortDirection::Descending);
    assert_eq!(ids(&padded), vec!["filing:f2"]);

    let mut no_events = FeedFilter::all();
    no_events.disable(SourceType::Event);
    let feed = aggregate(sources, &no_events, "", SortDirection::Descending);
    assert_eq!(feed.len(), filings.len() + notifications.len());
    assert!(feed
        .iter()
        .all(|record| record.source_type != SourceType::Event));

    no_events.enable(SourceType::Event);
    assert_eq!(no_events, FeedFilter::all());
}

#[test]
fn empty_filter_yields_empty_feed() {
    let filings = filings();
    let sources = FeedSources {
        filings: &filings,
        ..FeedSources::default()
    };
    let feed = aggregate(
        sources,
        &FeedFilter::only([]),
        "",
        SortDirection::Ascending,
    );
    assert!(feed.is_empty());
}
