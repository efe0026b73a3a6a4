//! Optimistic vote reconciler.
//!
//! Votes update the post locally first, then reconcile with the server
//! response. Each post moves through an explicit phase table: `Idle`
//! while nothing is outstanding, `Pending` while a request is in flight.
//! A vote on a pending post is ignored rather than queued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::ApiError;
use crate::gateway::ContentClient;
use crate::models::{Post, VoteKind, VoteUpdate};
use crate::notices::NoticeCenter;

/// The vote-relevant slice of a post, kept for rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VoteSnapshot {
    vote: Option<VoteKind>,
    upvote_count: u32,
    downvote_count: u32,
}

impl VoteSnapshot {
    fn of(post: &Post) -> Self {
        Self {
            vote: post.vote,
            upvote_count: post.upvote_count,
            downvote_count: post.downvote_count,
        }
    }

    fn restore(self, post: &mut Post) {
        post.vote = self.vote;
        post.upvote_count = self.upvote_count;
        post.downvote_count = self.downvote_count;
    }
}

/// In-flight record for one post.
#[derive(Debug, Clone, Copy)]
struct Pending {
    /// What the post was set to while waiting.
    optimistic: VoteSnapshot,
    /// What to restore if the request fails.
    previous: VoteSnapshot,
}

/// What a vote request accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The server confirmed; the post carries authoritative counts.
    Confirmed,
    /// The request failed; the post was rolled back.
    RolledBack,
    /// A request for this post was already pending; nothing was issued.
    InFlight,
}

/// Applies votes optimistically and reconciles them with the server.
///
/// Clones share the phase table, so two handles cannot race a vote on
/// the same post.
#[derive(Clone)]
pub struct VoteReconciler {
    content: ContentClient,
    notices: NoticeCenter,
    pending: Arc<Mutex<HashMap<i64, Pending>>>,
}

impl VoteReconciler {
    pub fn new(content: ContentClient, notices: NoticeCenter) -> Self {
        Self {
            content,
            notices,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Vote on a post, mutating it in place.
    ///
    /// Requesting the vote the post already carries toggles it off,
    /// which is a removal on the wire. The local change happens before
    /// the request; on success the server's counts overwrite it, on
    /// failure the previous state is restored and one notice recorded.
    pub async fn apply(&self, post: &mut Post, requested: VoteKind) -> VoteOutcome {
        let previous = VoteSnapshot::of(post);
        let toggle_off = post.vote == Some(requested);

        {
            let mut pending = self.pending.lock().unwrap();
            if pending.contains_key(&post.id) {
                return VoteOutcome::InFlight;
            }

            Self::guess(post, requested, toggle_off);
            pending.insert(
                post.id,
                Pending {
                    optimistic: VoteSnapshot::of(post),
                    previous,
                },
            );
        }

        let result = if toggle_off {
            self.content.remove_vote(post.id).await
        } else {
            self.content.set_vote(post.id, requested).await
        };

        let record = self
            .pending
            .lock()
            .unwrap()
            .remove(&post.id)
            .unwrap_or(Pending {
                optimistic: VoteSnapshot::of(post),
                previous,
            });

        match result {
            Ok(update) => {
                Self::reconcile(post, &update);
                VoteOutcome::Confirmed
            }
            Err(e) => {
                record.previous.restore(post);
                self.notices.error(e.user_message(), e.to_string());
                VoteOutcome::RolledBack
            }
        }
    }

    /// Local guess applied while the request is outstanding.
    fn guess(post: &mut Post, requested: VoteKind, toggle_off: bool) {
        match post.vote {
            Some(VoteKind::Up) => post.upvote_count = post.upvote_count.saturating_sub(1),
            Some(VoteKind::Down) => post.downvote_count = post.downvote_count.saturating_sub(1),
            None => {}
        }

        if toggle_off {
            post.vote = None;
        } else {
            match requested {
                VoteKind::Up => post.upvote_count += 1,
                VoteKind::Down => post.downvote_count += 1,
            }
            post.vote = Some(requested);
        }
    }

    /// Server counts are authoritative and may differ from the guess.
    fn reconcile(post: &mut Post, update: &VoteUpdate) {
        post.upvote_count = update.upvote_count;
        post.downvote_count = update.downvote_count;
        post.vote = update.vote;
    }
}
