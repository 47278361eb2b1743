use crate::output::{field, print_json, print_rows};
use crate::session;
use openchat_core::receptionist::Receptionist;
use serde_json::{json, Value};
use std::path::Path;

const HEADERS: [&str; 5] = ["POST", "AUTHOR", "AT", "LIKES", "TEXT"];
const COLUMNS: [&str; 5] = ["postId", "userId", "dateTime", "likes", "text"];

pub fn publish(root: &Path, user_id: &str, text: &str, json: bool) -> anyhow::Result<()> {
    let mut session = session::open(root)?;
    let publication = session.add_publication(user_id, &json!({ "text": text }))?;

    if json {
        print_json(&publication)?;
    } else {
        println!(
            "Published {} at {}",
            field(&publication, "postId"),
            field(&publication, "dateTime")
        );
    }
    Ok(())
}

pub fn timeline(root: &Path, user_id: &str, json: bool) -> anyhow::Result<()> {
    let session = session::open(root)?;
    print_publications(&session.timeline(user_id)?, json)
}

pub fn wall(root: &Path, user_id: &str, json: bool) -> anyhow::Result<()> {
    let session = session::open(root)?;
    print_publications(&session.wall(user_id)?, json)
}

pub fn like(root: &Path, post_id: &str, user_id: &str, json: bool) -> anyhow::Result<()> {
    let mut session = session::open(root)?;
    let likes = session.like_publication(post_id, &json!({ "userId": user_id }))?;

    if json {
        print_json(&likes)?;
    } else {
        println!("{post_id} has {} like(s)", field(&likes, "likes"));
    }
    Ok(())
}

fn print_publications(publications: &Value, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(publications)?;
    } else {
        print_rows(publications, &HEADERS, &COLUMNS);
    }
    Ok(())
}
