use hnview_core::{ItemId, LoadError, LoadErrorKind};

use super::*;

const NOW: u64 = 1_700_003_600;

fn post(id: &str, reply_count: i64) -> Post {
    Post {
        id: ItemId::from(id),
        title: format!("Story {id}"),
        author: "alice".into(),
        submitted_at: Timestamp::from(NOW - 5 * 60),
        external_url: Some("https://example.com".into()),
        score: 42,
        reply_count,
        reply_ids: vec![],
    }
}

fn reply(id: &str, body: &str, children: &[&str]) -> Reply {
    Reply {
        id: ItemId::from(id),
        body: body.into(),
        author: "bob".into(),
        submitted_at: Timestamp::from(NOW - 3 * 3600),
        parent_id: ItemId::from("1"),
        child_reply_ids: children.iter().copied().map(ItemId::from).collect(),
    }
}

fn node(reply: Reply, children: Vec<ReplyNode>) -> ReplyNode {
    ReplyNode {
        reply: Loaded {
            id: reply.id.clone(),
            data: Some(reply),
            error: None,
        },
        children,
    }
}

#[test_log::test]
fn post_byline_shows_comments_only_when_present() {
    let now = Timestamp::from(NOW);

    assert_eq!(
        post_byline(&post("1", 15), now),
        "42 points by alice 5m ago | 15 comments"
    );
    assert_eq!(post_byline(&post("1", 0), now), "42 points by alice 5m ago");
    assert_eq!(post_byline(&post("1", -1), now), "42 points by alice 5m ago");
}

#[test_log::test]
fn reply_byline_shows_hidden_answers() {
    let now = Timestamp::from(NOW);
    let r = reply("2", "", &["3", "4"]);

    assert_eq!(reply_byline(&r, now, 0), "by bob 3h ago");
    assert_eq!(reply_byline(&r, now, 2), "by bob 3h ago | 2 answers");
}

#[test_log::test]
fn top_stories_text() {
    let view = TopStoriesView {
        now: Timestamp::from(NOW),
        posts: vec![
            Loaded {
                id: ItemId::from("1"),
                data: Some(post("1", 3)),
                error: None,
            },
            Loaded {
                id: ItemId::from("2"),
                data: None,
                error: Some(LoadError::new(LoadErrorKind::NotFound, "Item 2 not found")),
            },
            Loaded {
                id: ItemId::from("3"),
                data: None,
                error: None,
            },
        ],
        has_more: true,
        error: None,
    };

    assert_eq!(
        view.to_string(),
        " 1. Story 1 (https://example.com)\n\
         \x20   42 points by alice 5m ago | 3 comments\n\
         \x202. [error loading 2: Item 2 not found]\n\
         \x203. …\n\
         … more available\n"
    );
}

#[test_log::test]
fn last_page_has_no_more_line() {
    let view = TopStoriesView {
        now: Timestamp::from(NOW),
        posts: vec![],
        has_more: false,
        error: Some(LoadError::new(LoadErrorKind::Transport, "Request failed")),
    };

    assert_eq!(view.to_string(), "[stale list: Request failed]\n");
}

#[test_log::test]
fn post_thread_text_is_indented() {
    let mut root = post("1", 3);
    root.external_url = None;
    let view = ThreadView {
        now: Timestamp::from(NOW),
        root,
        replies: vec![
            node(
                reply("10", "Top &amp; level<p>second", &["11"]),
                vec![node(reply("11", "nested", &["12"]), vec![])],
            ),
            ReplyNode {
                reply: Loaded {
                    id: ItemId::from("20"),
                    data: None,
                    error: Some(LoadError::new(LoadErrorKind::NotFound, "Item 20 not found")),
                },
                children: vec![],
            },
        ],
    };

    assert_eq!(
        view.to_string(),
        "Story 1\n\
         42 points by alice 5m ago | 3 comments\n\
         \n\
         \x20 Top & level\n\
         \n\
         \x20 second\n\
         \x20 by bob 3h ago\n\
         \n\
         \x20   nested\n\
         \x20   by bob 3h ago | 1 answer\n\
         \n\
         \x20 [error: Item 20 not found]\n\
         \n"
    );
}

#[test_log::test]
fn reply_thread_without_loaded_children_counts_answers() {
    let view = ThreadView {
        now: Timestamp::from(NOW),
        root: reply("10", "just me", &["11", "12"]),
        replies: vec![],
    };

    assert_eq!(view.to_string(), "just me\nby bob 3h ago | 2 answers\n\n");
}
