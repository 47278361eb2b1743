//! JSON request/response facade over [`OpenChatSystem`].
//!
//! [`Receptionist`] is the operation surface that the action recorder wraps
//! and the replay loader drives. Bodies and results are JSON objects so that
//! a recorded call can be written to, and re-issued from, the action log.

use crate::clock::format_timestamp;
use crate::error::{OpenChatError, Result};
use crate::publication::Publication;
use crate::system::OpenChatSystem;
use crate::user::User;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub const ID_KEY: &str = "id";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
pub const ABOUT_KEY: &str = "about";
pub const FOLLOWER_ID_KEY: &str = "followerId";
pub const FOLLOWEE_ID_KEY: &str = "followeeId";
pub const USER_ID_KEY: &str = "userId";
pub const POST_ID_KEY: &str = "postId";
pub const TEXT_KEY: &str = "text";
pub const DATE_TIME_KEY: &str = "dateTime";
pub const LIKES_KEY: &str = "likes";

pub trait Receptionist {
    /// `{username, password, about}` -> `{id, username, about}`
    fn register_user(&mut self, registration: &Value) -> Result<Value>;

    /// `{username, password}` -> `{id, username, about}`
    fn login(&self, credentials: &Value) -> Result<Value>;

    /// All users in registration order.
    fn users(&self) -> Result<Value>;

    /// `{followerId, followeeId}` -> `{}`
    fn followings(&mut self, following: &Value) -> Result<Value>;

    fn followees(&self, follower_id: &str) -> Result<Value>;

    /// `{text}` -> `{postId, userId, text, dateTime}`
    fn add_publication(&mut self, user_id: &str, message: &Value) -> Result<Value>;

    fn timeline(&self, user_id: &str) -> Result<Value>;

    fn wall(&self, user_id: &str) -> Result<Value>;

    /// `{userId}` -> `{likes}`
    fn like_publication(&mut self, publication_id: &str, liker: &Value) -> Result<Value>;
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Registration {
    username: String,
    password: String,
    #[serde(default)]
    about: String,
}

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Following {
    follower_id: String,
    followee_id: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Liker {
    user_id: String,
}

fn body<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| OpenChatError::InvalidRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// JsonReceptionist
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct JsonReceptionist {
    system: OpenChatSystem,
}

impl JsonReceptionist {
    pub fn new(system: OpenChatSystem) -> Self {
        Self { system }
    }

    pub fn system(&self) -> &OpenChatSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut OpenChatSystem {
        &mut self.system
    }

    pub fn into_system(self) -> OpenChatSystem {
        self.system
    }
}

pub fn user_json(user: &User) -> Value {
    json!({
        ID_KEY: user.id,
        USERNAME_KEY: user.name,
        ABOUT_KEY: user.about,
    })
}

pub fn publication_json(publication: &Publication) -> Value {
    json!({
        POST_ID_KEY: publication.id,
        USER_ID_KEY: publication.author_id,
        TEXT_KEY: publication.text,
        DATE_TIME_KEY: format_timestamp(&publication.published_at),
    })
}

fn publication_list_json(publications: Vec<&Publication>) -> Value {
    Value::Array(
        publications
            .into_iter()
            .map(|p| {
                let mut entry = publication_json(p);
                entry[LIKES_KEY] = json!(p.likes());
                entry
            })
            .collect(),
    )
}

impl Receptionist for JsonReceptionist {
    fn register_user(&mut self, registration: &Value) -> Result<Value> {
        let r: Registration = body(registration)?;
        let user = self.system.register(&r.username, &r.password, &r.about)?;
        Ok(user_json(user))
    }

    fn login(&self, credentials: &Value) -> Result<Value> {
        let c: Credentials = body(credentials)?;
        let user = self.system.authenticate(&c.username, &c.password)?;
        Ok(user_json(user))
    }

    fn users(&self) -> Result<Value> {
        Ok(Value::Array(self.system.users().iter().map(user_json).collect()))
    }

    fn followings(&mut self, following: &Value) -> Result<Value> {
        let f: Following = body(following)?;
        self.system.follow(&f.follower_id, &f.followee_id)?;
        Ok(json!({}))
    }

    fn followees(&self, follower_id: &str) -> Result<Value> {
        let followees = self.system.followees_of(follower_id)?;
        Ok(Value::Array(followees.into_iter().map(user_json).collect()))
    }

    fn add_publication(&mut self, user_id: &str, message: &Value) -> Result<Value> {
        let m: Message = body(message)?;
        let publication = self.system.publish(user_id, &m.text)?;
        Ok(publication_json(publication))
    }

    fn timeline(&self, user_id: &str) -> Result<Value> {
        Ok(publication_list_json(self.system.timeline_of(user_id)?))
    }

    fn wall(&self, user_id: &str) -> Result<Value> {
        Ok(publication_list_json(self.system.wall_of(user_id)?))
    }

    fn like_publication(&mut self, publication_id: &str, liker: &Value) -> Result<Value> {
        let l: Liker = body(liker)?;
        let likes = self.system.like(publication_id, &l.user_id)?;
        Ok(json!({ LIKES_KEY: likes }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
