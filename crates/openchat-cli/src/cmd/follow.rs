use crate::output::{print_json, print_rows};
use crate::session;
use openchat_core::receptionist::Receptionist;
use serde_json::json;
use std::path::Path;

pub fn follow(root: &Path, follower_id: &str, followee_id: &str, json: bool) -> anyhow::Result<()> {
    let mut session = session::open(root)?;
    session.followings(&json!({
        "followerId": follower_id,
        "followeeId": followee_id,
    }))?;

    if json {
        print_json(&json!({ "followerId": follower_id, "followeeId": followee_id }))?;
    } else {
        println!("{follower_id} now follows {followee_id}");
    }
    Ok(())
}

pub fn followees(root: &Path, follower_id: &str, json: bool) -> anyhow::Result<()> {
    let session = session::open(root)?;
    let followees = session.followees(follower_id)?;

    if json {
        print_json(&followees)?;
    } else {
        print_rows(&followees, &["ID", "USERNAME", "ABOUT"], &["id", "username", "about"]);
    }
    Ok(())
}
