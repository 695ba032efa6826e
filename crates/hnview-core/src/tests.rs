use std::io;

use super::*;
use crate::error::BoxedError;

#[test_log::test]
fn item_id_from_number_and_str_agree() {
    assert_eq!(ItemId::from(8863u64), ItemId::from("8863"));
    assert_eq!(ItemId::new("8863").as_str(), "8863");
    assert_eq!(ItemId::from(8863u64).to_string(), "8863");
}

#[test_log::test]
fn item_id_serializes_as_plain_string() {
    let id = ItemId::from("42");
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""42""#);
    assert_eq!(serde_json::from_str::<ItemId>(r#""42""#).unwrap(), id);
}

#[test_log::test]
fn timestamp_secs_since_saturates() {
    let earlier = Timestamp::from(100);
    let later = Timestamp::from(160);

    assert_eq!(later.secs_since(earlier), 60);
    assert_eq!(earlier.secs_since(later), 0);
}

#[test_log::test]
fn load_error_flattens_source_chain() {
    let source: BoxedError = Box::new(io::Error::other("connection reset"));
    let err = LoadError::from(ContentError::Transport { source });

    assert_eq!(err.kind(), LoadErrorKind::Transport);
    assert_eq!(err.message(), "Request failed: connection reset");
}

#[test_log::test]
fn load_error_keeps_plain_messages_verbatim() {
    let err = LoadError::from(ContentError::Other {
        message: "Network error".into(),
    });

    assert_eq!(err.kind(), LoadErrorKind::Other);
    assert_eq!(err.to_string(), "Network error");
}

#[test_log::test]
fn load_error_not_found_names_the_item() {
    let err = LoadError::from(ContentError::NotFound {
        id: ItemId::from("7"),
    });

    assert_eq!(err.kind(), LoadErrorKind::NotFound);
    assert_eq!(err.message(), "Item 7 not found");
}

#[test_log::test]
fn load_error_from_panic_payloads() {
    let err = LoadError::from_panic(Box::new("string error"));
    assert_eq!(err.kind(), LoadErrorKind::Panicked);
    assert_eq!(err.message(), "string error");

    let err = LoadError::from_panic(Box::new(format!("code {}", 3)));
    assert_eq!(err.message(), "code 3");

    let err = LoadError::from_panic(Box::new(17u8));
    assert_eq!(err.message(), "fetch panicked");
}

#[test_log::test]
fn post_reports_replies_only_for_positive_counts() {
    let mut post = Post {
        id: ItemId::from("1"),
        title: "Title".into(),
        author: "pg".into(),
        submitted_at: Timestamp::from(1_175_714_200),
        external_url: None,
        score: 57,
        reply_count: 0,
        reply_ids: vec![],
    };
    assert!(!post.has_replies());

    post.reply_count = -1;
    assert!(!post.has_replies());

    post.reply_count = 3;
    assert!(post.has_replies());
}

#[test_log::test]
fn load_error_serializes_kind_and_message() {
    let err = LoadError::from(ContentError::NotFound {
        id: ItemId::from("13"),
    });

    assert_eq!(
        serde_json::to_string(&err).unwrap(),
        r#"{"kind":"not_found","message":"Item 13 not found"}"#
    );
}
