use casefeed_core::{
    normalize, EventRecord, FilingRecord, NotificationRecord, SourceRef, SourceType,
    EPOCH_SENTINEL,
};
use chrono::{TimeZone, Utc};

#[test]
fn malformed_dates_degrade_to_epoch_sentinel() {
    let malformed = [
        "",
        "   ",
        "31/31/9999",
        "not-a-date",
        "2024-02-30",
        "12/25/2024",
        "2024/03/01",
    ];
    for raw in malformed {
        let filing = FilingRecord::new("f1", raw, "motion", "Motion");
        let record = normalize(SourceRef::Filing(&filing));
        assert_eq!(record.effective_date, EPOCH_SENTINEL, "input `{raw}`");
        assert_eq!(record.raw_date_text, raw);
    }
}

#[test]
fn iso_datetimes_with_zone_designators_resolve() {
    let expected = Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap();
    let inputs = [
        ("2024-03-10T09:30Z", expected),
        ("2024-03-10T12:30:00+0300", expected),
        ("2024-03-10T12:30:00+03", expected),
        ("2024-03-10T12:30+03:00", expected),
        ("2024-03-10T12:30+0300", expected),
        ("2024-03-10T09:30:00.000Z", expected),
    ];
    for (raw, want) in inputs {
        let event = EventRecord::new("e1", raw, "hearing", "Hearing");
        let record = normalize(SourceRef::Event(&event));
        assert_eq!(record.effective_date, want, "input `{raw}`");
    }
}

#[test]
fn iso_is_tried_before_day_month_year() {
    let iso = NotificationRecord::new("n1", "2024-04-05", "court_notice", "Notice");
    let record = normalize(SourceRef::Notification(&iso));
    assert_eq!(
        record.effective_date,
        Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap()
    );

    let dmy = NotificationRecord::new("n2", "05/04/2024", "court_notice", "Notice");
    let record = normalize(SourceRef::Notification(&dmy));
    assert_eq!(
        record.effective_date,
        Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap()
    );
}

#[test]
fn maps_source_specific_fields() {
    let mut filing = FilingRecord::new("f9", "2024-01-02", "ruling", "Judgment");
    filing.party = Some("Plaintiff".to_string());
    filing.completed = true;
    filing.expiration_date = Some("10/01/2024".to_string());
    let record = normalize(SourceRef::Filing(&filing));
    assert_eq!(record.source_type, SourceType::Filing);
    assert_eq!(record.sub_type, "ruling");
    assert_eq!(record.actor.as_deref(), Some("Plaintiff"));
    assert_eq!(record.completed, Some(true));
    assert_eq!(
        record.expiration_date,
        Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
    );
    assert_eq!(record.source, SourceRef::Filing(&filing));
    assert_eq!(record.source.id(), "f9");

    let mut event = EventRecord::new("e1", "2024-01-03T14:00:00Z", "hearing", "Hearing");
    event.organizer = Some("Clerk".to_string());
    let record = normalize(SourceRef::Event(&event));
    assert_eq!(record.sub_type, "hearing");
    assert_eq!(record.actor.as_deref(), Some("Clerk"));
    assert_eq!(record.completed, None);
    assert_eq!(record.expiration_date, None);
}

#[test]
fn records_deserialize_from_wire_json() {
    let value = serde_json::json!({
        "id": "f1",
        "date": "2024-03-05",
        "type": "motion",
        "title": "Motion to compel",
        "expirationDate": "20/03/2024",
        "link": "https://docs.example/f1.pdf"
    });

    let filing: FilingRecord = serde_json::from_value(value).unwrap();
    assert_eq!(filing.filing_type, "motion");
    assert!(filing.has_link());
    assert!(!filing.completed);
    assert_eq!(filing.party, None);

    let record = normalize(SourceRef::Filing(&filing));
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["sourceType"], "filing");
    assert_eq!(json["subType"], "motion");
    assert_eq!(json["rawDateText"], "2024-03-05");
    assert!(json.get("source").is_none());
}
