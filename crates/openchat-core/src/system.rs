//! The social network aggregate: registered users and their publishers.

use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::error::{OpenChatError, Result};
use crate::publication::{ModerationPolicy, Publication};
use crate::publisher::{newest_first, Publisher};
use crate::user::User;
use std::collections::HashMap;

pub struct OpenChatSystem {
    users: Vec<User>,
    publishers: HashMap<String, Publisher>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    moderation: ModerationPolicy,
}

impl std::fmt::Debug for OpenChatSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenChatSystem")
            .field("users", &self.users.len())
            .field("moderation", &self.moderation)
            .finish_non_exhaustive()
    }
}

impl Default for OpenChatSystem {
    fn default() -> Self {
        Self::new(Box::new(SystemClock), Box::new(RandomIds))
    }
}

impl OpenChatSystem {
    pub fn new(clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self::with_moderation(clock, ids, ModerationPolicy::default())
    }

    pub fn with_moderation(
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
        moderation: ModerationPolicy,
    ) -> Self {
        Self {
            users: Vec::new(),
            publishers: HashMap::new(),
            clock,
            ids,
            moderation,
        }
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn register(
        &mut self,
        name: &str,
        password: &str,
        about: &str,
    ) -> Result<&User> {
        if self.has_user_named(name) {
            return Err(OpenChatError::UserAlreadyRegistered(name.to_string()));
        }
        // Validate before minting so a rejected registration consumes no id.
        User::validate_name(name)?;
        let id = self.ids.next_id();
        if self.publishers.contains_key(&id) {
            return Err(OpenChatError::IdInUse(id));
        }
        let user = User::named(id, name, password, about)?;
        self.publishers
            .insert(user.id.clone(), Publisher::related_to(user.id.clone()));
        self.users.push(user);
        Ok(&self.users[self.users.len() - 1])
    }

    pub fn has_users(&self) -> bool {
        !self.users.is_empty()
    }

    pub fn number_of_users(&self) -> usize {
        self.users.len()
    }

    pub fn has_user_named(&self, name: &str) -> bool {
        self.users.iter().any(|u| u.is_named(name))
    }

    /// Users in registration order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user_identified_as(&self, id: &str) -> Result<&User> {
        self.users
            .iter()
            .find(|u| u.is_identified_as(id))
            .ok_or_else(|| OpenChatError::UserNotRegistered(id.to_string()))
    }

    pub fn authenticate(&self, name: &str, password: &str) -> Result<&User> {
        self.users
            .iter()
            .find(|u| u.is_named(name) && u.authenticates(password))
            .ok_or(OpenChatError::InvalidCredentials)
    }

    // -----------------------------------------------------------------------
    // Followings
    // -----------------------------------------------------------------------

    pub fn follow(&mut self, follower_id: &str, followee_id: &str) -> Result<()> {
        self.user_identified_as(followee_id)?;
        self.publisher_mut(follower_id)?.follow(followee_id)
    }

    pub fn followees_of(&self, follower_id: &str) -> Result<Vec<&User>> {
        self.publisher(follower_id)?
            .followees()
            .iter()
            .map(|id| self.user_identified_as(id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Publications
    // -----------------------------------------------------------------------

    pub fn publish(&mut self, user_id: &str, text: &str) -> Result<&Publication> {
        self.user_identified_as(user_id)?;
        // Moderate before consulting the sources of non-determinism.
        if self.moderation.is_inappropriate(text) {
            return Err(OpenChatError::InappropriateLanguage);
        }
        let id = self.ids.next_id();
        if self.publication_identified_as(&id).is_ok() {
            return Err(OpenChatError::IdInUse(id));
        }
        let published_at = self.clock.now();
        let publication = Publication::made_by(id, user_id, text, published_at, &self.moderation)?;
        Ok(self.publisher_mut(user_id)?.publish(publication))
    }

    /// Replace the policy applied to later publications. Existing ones stay.
    pub fn set_moderation(&mut self, moderation: ModerationPolicy) {
        self.moderation = moderation;
    }

    pub fn timeline_of(&self, user_id: &str) -> Result<Vec<&Publication>> {
        Ok(self.publisher(user_id)?.timeline())
    }

    /// The user's own publications plus those of everyone they follow,
    /// newest first.
    pub fn wall_of(&self, user_id: &str) -> Result<Vec<&Publication>> {
        let publisher = self.publisher(user_id)?;
        let mut entries: Vec<&Publication> = publisher.publications().iter().collect();
        for followee_id in publisher.followees() {
            entries.extend(self.publisher(followee_id)?.publications());
        }
        Ok(newest_first(entries))
    }

    pub fn publication_identified_as(&self, id: &str) -> Result<&Publication> {
        self.publishers
            .values()
            .flat_map(|p| p.publications())
            .find(|p| p.is_identified_as(id))
            .ok_or_else(|| OpenChatError::PublicationNotFound(id.to_string()))
    }

    pub fn like(&mut self, publication_id: &str, liker_id: &str) -> Result<usize> {
        let author_id = self.publication_identified_as(publication_id)?.author_id.clone();
        self.user_identified_as(liker_id)?;
        let publication = self
            .publisher_mut(&author_id)?
            .publication_mut(publication_id)
            .ok_or_else(|| OpenChatError::PublicationNotFound(publication_id.to_string()))?;
        Ok(publication.add_liker(liker_id))
    }

    pub fn likes_of(&self, publication_id: &str) -> Result<usize> {
        Ok(self.publication_identified_as(publication_id)?.likes())
    }

    pub fn number_of_publications(&self) -> usize {
        self.publishers.values().map(|p| p.publications().len()).sum()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn publisher(&self, user_id: &str) -> Result<&Publisher> {
        self.publishers
            .get(user_id)
            .ok_or_else(|| OpenChatError::UserNotRegistered(user_id.to_string()))
    }

    fn publisher_mut(&mut self, user_id: &str) -> Result<&mut Publisher> {
        self.publishers
            .get_mut(user_id)
            .ok_or_else(|| OpenChatError::UserNotRegistered(user_id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
