use crate::error::{OpenChatError, Result};
use crate::publication::Publication;

/// The publishing side of a user: what they posted and whom they follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
    pub user_id: String,
    publications: Vec<Publication>,
    followees: Vec<String>,
}

impl Publisher {
    pub fn related_to(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            publications: Vec::new(),
            followees: Vec::new(),
        }
    }

    pub fn follow(&mut self, followee_id: &str) -> Result<()> {
        if self.user_id == followee_id {
            return Err(OpenChatError::CannotFollowSelf);
        }
        if self.is_following(followee_id) {
            return Err(OpenChatError::AlreadyFollowing);
        }
        self.followees.push(followee_id.to_string());
        Ok(())
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.followees.iter().any(|f| f == user_id)
    }

    /// Followee ids in the order they were followed.
    pub fn followees(&self) -> &[String] {
        &self.followees
    }

    pub fn has_publications(&self) -> bool {
        !self.publications.is_empty()
    }

    pub fn publish(&mut self, publication: Publication) -> &Publication {
        self.publications.push(publication);
        &self.publications[self.publications.len() - 1]
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn publication_mut(&mut self, id: &str) -> Option<&mut Publication> {
        self.publications.iter_mut().find(|p| p.is_identified_as(id))
    }

    /// Own publications, newest first.
    pub fn timeline(&self) -> Vec<&Publication> {
        newest_first(self.publications.iter().collect())
    }
}

/// Sort by publication time, newest first. The sort is stable, so entries
/// published at the same instant keep their relative input order.
pub fn newest_first(mut publications: Vec<&Publication>) -> Vec<&Publication> {
    publications.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    publications
}
