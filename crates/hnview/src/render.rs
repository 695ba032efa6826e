//! Plain-text rendering of the views

use std::fmt;

use hnview_core::{Post, Reply, Timestamp};
use hnview_util_fmt::{format_age, format_count, html_to_text};

use crate::view::{Loaded, ReplyNode, ThreadView, TopStoriesView};

const INDENT: &str = "  ";
const PLACEHOLDER: &str = "…";

pub fn post_byline(post: &Post, now: Timestamp) -> String {
    let mut byline = format!(
        "{} points by {} {}",
        post.score,
        post.author,
        format_age(now.as_secs(), post.submitted_at.as_secs())
    );
    if post.has_replies() {
        byline.push_str(" | ");
        byline.push_str(&format_count(post.reply_count, "comment"));
    }
    byline
}

/// `unloaded` is the number of children not shown below the reply
pub fn reply_byline(reply: &Reply, now: Timestamp, unloaded: usize) -> String {
    let mut byline = format!(
        "by {} {}",
        reply.author,
        format_age(now.as_secs(), reply.submitted_at.as_secs())
    );
    if 0 < unloaded {
        byline.push_str(" | ");
        byline.push_str(&format_count(
            i64::try_from(unloaded).unwrap_or(i64::MAX),
            "answer",
        ));
    }
    byline
}

fn post_title(post: &Post) -> String {
    match &post.external_url {
        Some(url) => format!("{} ({url})", post.title),
        None => post.title.clone(),
    }
}

fn write_indented(f: &mut fmt::Formatter<'_>, level: usize, text: &str) -> fmt::Result {
    for line in text.lines() {
        if line.is_empty() {
            writeln!(f)?;
        } else {
            writeln!(f, "{}{line}", INDENT.repeat(level))?;
        }
    }
    Ok(())
}

fn write_reply(
    f: &mut fmt::Formatter<'_>,
    reply: &Reply,
    now: Timestamp,
    unloaded: usize,
    level: usize,
) -> fmt::Result {
    write_indented(f, level, &html_to_text(&reply.body))?;
    write_indented(f, level, &reply_byline(reply, now, unloaded))
}

fn write_node(
    f: &mut fmt::Formatter<'_>,
    node: &ReplyNode,
    now: Timestamp,
    level: usize,
) -> fmt::Result {
    match &node.reply {
        Loaded {
            data: Some(reply), ..
        } => write_reply(f, reply, now, node.unloaded_children(), level)?,
        Loaded {
            error: Some(err), ..
        } => write_indented(f, level, &format!("[error: {err}]"))?,
        Loaded { .. } => write_indented(f, level, PLACEHOLDER)?,
    }
    writeln!(f)?;

    for child in &node.children {
        write_node(f, child, now, level + 1)?;
    }
    Ok(())
}

impl fmt::Display for TopStoriesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(err) = &self.error {
            writeln!(f, "[stale list: {err}]")?;
        }

        for (i, post) in self.posts.iter().enumerate() {
            let rank = i + 1;
            match post {
                Loaded {
                    data: Some(post), ..
                } => {
                    writeln!(f, "{rank:>2}. {}", post_title(post))?;
                    writeln!(f, "    {}", post_byline(post, self.now))?;
                }
                Loaded {
                    id,
                    error: Some(err),
                    ..
                } => writeln!(f, "{rank:>2}. [error loading {id}: {err}]")?,
                Loaded { .. } => writeln!(f, "{rank:>2}. {PLACEHOLDER}")?,
            }
        }

        if self.has_more {
            writeln!(f, "{PLACEHOLDER} more available")?;
        }
        Ok(())
    }
}

impl fmt::Display for ThreadView<Post> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", post_title(&self.root))?;
        writeln!(f, "{}", post_byline(&self.root, self.now))?;
        writeln!(f)?;

        for node in &self.replies {
            write_node(f, node, self.now, 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ThreadView<Reply> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unloaded = if self.replies.is_empty() {
            self.root.child_reply_ids.len()
        } else {
            0
        };
        write_reply(f, &self.root, self.now, unloaded, 0)?;
        writeln!(f)?;

        for node in &self.replies {
            write_node(f, node, self.now, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
