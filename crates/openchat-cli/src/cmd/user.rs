use crate::output::{field, print_json, print_rows};
use crate::session;
use openchat_core::receptionist::Receptionist;
use serde_json::json;
use std::path::Path;

pub fn register(
    root: &Path,
    username: &str,
    password: &str,
    about: &str,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = session::open(root)?;
    let user = session.register_user(&json!({
        "username": username,
        "password": password,
        "about": about,
    }))?;

    if json {
        print_json(&user)?;
    } else {
        println!("Registered {} ({})", field(&user, "username"), field(&user, "id"));
    }
    Ok(())
}

pub fn login(root: &Path, username: &str, password: &str, json: bool) -> anyhow::Result<()> {
    let session = session::open(root)?;
    let user = session.login(&json!({ "username": username, "password": password }))?;

    if json {
        print_json(&user)?;
    } else {
        println!("Logged in as {} ({})", field(&user, "username"), field(&user, "id"));
    }
    Ok(())
}

pub fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let session = session::open(root)?;
    let users = session.users()?;

    if json {
        print_json(&users)?;
    } else {
        print_rows(&users, &["ID", "USERNAME", "ABOUT"], &["id", "username", "about"]);
    }
    Ok(())
}
