use std::collections::HashSet;

use formfield_menu_lib::{
    db::{Database, FieldKind, NewFieldRecord, ValueStore},
    selector::{select_candidates, SourceKind},
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Database {
    Database::new(dir.path().join("formhistory.sqlite3")).expect("open database")
}

async fn insert(db: &Database, domain: &str, node_name: &str, name: &str, value: &str, last_used: i64) -> i64 {
    db.record_field_value(NewFieldRecord {
        domain: domain.to_string(),
        field_kind: FieldKind::from_node_name(node_name),
        value: value.to_string(),
        last_used,
        field_name: name.to_string(),
    })
    .await
    .expect("insert record")
    .primary_key
}

#[tokio::test]
async fn domain_records_come_first_then_other_domains_by_recency() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    let older = insert(&db, "example.com", "textarea", "comment", "first draft", 100).await;
    let newer = insert(&db, "example.com", "textarea", "comment", "second draft", 200).await;
    let elsewhere = insert(&db, "other.com", "textarea", "body", "from other", 300).await;

    let candidates = select_candidates(&db, "example.com", 10).await.expect("select");
    let keys: Vec<(SourceKind, i64)> = candidates
        .iter()
        .map(|candidate| (candidate.source_kind, candidate.primary_key))
        .collect();
    assert_eq!(
        keys,
        [
            (SourceKind::DomainMatch, newer),
            (SourceKind::DomainMatch, older),
            (SourceKind::RecencyMatch, elsewhere),
        ]
    );
    assert_eq!(candidates[0].display_value, "second draft");
}

#[tokio::test]
async fn single_line_inputs_are_never_offered() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    insert(&db, "example.com", "INPUT", "q", "search term", 500).await;
    insert(&db, "other.com", "input", "q", "other search", 600).await;
    let kept = insert(&db, "example.com", "div", "editor", "rich text", 100).await;

    let by_domain = db.query_by_domain("example.com", 10).await.expect("domain query");
    assert_eq!(by_domain.len(), 1);
    assert_eq!(by_domain[0].primary_key, kept);

    let recent = db
        .query_by_recency("example.com", 10, &HashSet::new())
        .await
        .expect("recency query");
    assert!(recent.is_empty());
}

#[tokio::test]
async fn recency_skips_excluded_keys_and_stops_at_the_limit() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    let mut keys = Vec::new();
    for ts in 1..=6 {
        keys.push(insert(&db, &format!("site{ts}.org"), "textarea", "t", &format!("value {ts}"), ts * 10).await);
    }

    let excluded: HashSet<i64> = [keys[5], keys[3]].into_iter().collect();
    let recent = db.query_by_recency("", 3, &excluded).await.expect("recency query");
    let got: Vec<i64> = recent.iter().map(|record| record.primary_key).collect();
    assert_eq!(got, [keys[4], keys[2], keys[1]]);
}

#[tokio::test]
async fn domain_ties_are_broken_by_field_name() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    insert(&db, "example.com", "textarea", "zeta", "z", 100).await;
    insert(&db, "example.com", "textarea", "Alpha", "a", 100).await;
    insert(&db, "example.com", "textarea", "beta", "b", 100).await;

    let names: Vec<String> = db
        .query_by_domain("example.com", 2)
        .await
        .expect("domain query")
        .into_iter()
        .map(|record| record.field_name)
        .collect();
    assert_eq!(names, ["Alpha", "beta"]);
}

#[tokio::test]
async fn empty_domain_only_yields_recent_values() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    let unnamed = insert(&db, "", "textarea", "notes", "local file note", 50).await;
    let web = insert(&db, "example.com", "textarea", "notes", "web note", 40).await;

    assert!(db.query_by_domain("", 10).await.expect("domain query").is_empty());

    // Records without a domain share the empty domain and are excluded from recency too.
    let candidates = select_candidates(&db, "", 10).await.expect("select");
    let keys: Vec<i64> = candidates.iter().map(|candidate| candidate.primary_key).collect();
    assert_eq!(keys, [web]);
    assert_ne!(keys[0], unnamed);
}

#[tokio::test]
async fn blank_values_are_dropped_after_sanitizing() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    insert(&db, "example.com", "textarea", "a", "<br/>&nbsp; \n", 300).await;
    let shown = insert(&db, "example.com", "textarea", "b", "<p>Hello\n\tWorld</p>", 200).await;

    let candidates = select_candidates(&db, "example.com", 10).await.expect("select");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].primary_key, shown);
    assert_eq!(candidates[0].display_value, "Hello World");
}

#[tokio::test]
async fn blank_values_do_not_use_up_the_limit() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    let on_domain = insert(&db, "example.com", "textarea", "body", "real reply", 10).await;
    let elsewhere = insert(&db, "other.com", "textarea", "body", "other reply", 5).await;
    for ts in 0..10 {
        insert(&db, "example.com", "textarea", "body", "<br/>", 100 + ts).await;
        insert(&db, "blank.org", "textarea", "body", " \n ", 100 + ts).await;
    }

    let candidates = select_candidates(&db, "example.com", 10).await.expect("select");
    let keys: Vec<(SourceKind, i64)> = candidates
        .iter()
        .map(|candidate| (candidate.source_kind, candidate.primary_key))
        .collect();
    assert_eq!(
        keys,
        [
            (SourceKind::DomainMatch, on_domain),
            (SourceKind::RecencyMatch, elsewhere),
        ]
    );
}

#[tokio::test]
async fn recency_ties_prefer_the_newest_record() {
    let dir = TempDir::new().expect("tempdir");
    let db = open(&dir);
    let first = insert(&db, "a.org", "textarea", "t", "first", 100).await;
    let second = insert(&db, "b.org", "textarea", "t", "second", 100).await;
    let third = insert(&db, "c.org", "textarea", "t", "third", 100).await;

    let got: Vec<i64> = db
        .query_by_recency("", 10, &HashSet::new())
        .await
        .expect("recency query")
        .iter()
        .map(|record| record.primary_key)
        .collect();
    assert_eq!(got, [third, second, first]);
}

#[tokio::test]
async fn records_survive_reopening_the_database() {
    let dir = TempDir::new().expect("tempdir");
    let key = {
        let db = open(&dir);
        insert(&db, "example.com", "textarea", "comment", "persisted", 10).await
    };

    let db = open(&dir);
    let record = db
        .get_by_primary_key(key)
        .await
        .expect("lookup")
        .expect("record exists");
    assert_eq!(record.value, "persisted");
    assert_eq!(record.field_kind, FieldKind::Other("textarea".into()));
    assert!(db.get_by_primary_key(key + 100).await.expect("lookup").is_none());
}
