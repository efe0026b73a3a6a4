//! Prelude module for convenient imports.
//!
//! Re-exports the types most front ends need to drive the client.
//!
//! # Usage
//!
//! ```ignore
//! use chirp::prelude::*;
//! ```

// Session
pub use crate::auth::{Claims, SessionHolder};

// API clients
pub use crate::gateway::{
    AccountClient, ContentClient, DatabaseClient, Gateway, ImageClient, SearchClient,
    StatisticsClient,
};

// Feed synchronization
pub use crate::feed::{FeedSynchronizer, PageOutcome, PageSource, PrivateFeed, PublicFeed, UserFeed};

// Votes
pub use crate::vote::{VoteOutcome, VoteReconciler};

// Events and notices
pub use crate::bus::PostEvents;
pub use crate::notices::{Notice, NoticeCenter, Severity};

// Models
pub use crate::models::{
    Author, Comment, Post, Role, UserData, UserProfile, UserSummary, VoteKind, VoteUpdate,
};

// Errors
pub use crate::error::{ApiError, DomainError};

// Configuration
pub use crate::config::ClientConfig;
