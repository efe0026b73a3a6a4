//! Structured error codes returned by the backend.
//!
//! The server reports validation and domain failures as a numeric code in
//! an `{ "error": <code> }` envelope. Each known code has a specific
//! user-facing message; anything unrecognized falls back to the generic
//! retry-later text at the [`ApiError`](super::ApiError) level.

use serde::Deserialize;

/// A recognized server error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum DomainError {
    PasswordIncorrect,
    UserNotFound,
    PostNotFound,
    CommentNotFound,
    ImageNotFound,
    UsernameAlreadyInUse,
    CharacterLimitExceeded,
    InteractionAlreadyMade,
    InvalidEmail,
    InvalidPhoneNumber,
    InvalidBirthday,
}

impl TryFrom<u8> for DomainError {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use DomainError::*;
        match value {
            0 => Ok(PasswordIncorrect),
            1 => Ok(UserNotFound),
            2 => Ok(PostNotFound),
            3 => Ok(CommentNotFound),
            4 => Ok(ImageNotFound),
            5 => Ok(UsernameAlreadyInUse),
            6 => Ok(CharacterLimitExceeded),
            7 => Ok(InteractionAlreadyMade),
            8 => Ok(InvalidEmail),
            9 => Ok(InvalidPhoneNumber),
            10 => Ok(InvalidBirthday),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}

impl DomainError {
    /// The user-facing message for this code.
    pub fn user_message(&self) -> &'static str {
        use DomainError::*;
        match self {
            PasswordIncorrect => "The password you entered is incorrect.",
            UserNotFound => "This user does not exist.",
            PostNotFound => "This post does not exist or has been deleted.",
            CommentNotFound => "This comment does not exist or has been deleted.",
            ImageNotFound => "This image does not exist or has been deleted.",
            UsernameAlreadyInUse => "This username is already taken.",
            CharacterLimitExceeded => "Your text exceeds the character limit.",
            InteractionAlreadyMade => "You have already done that.",
            InvalidEmail => "Please enter a valid email address.",
            InvalidPhoneNumber => "Please enter a valid phone number.",
            InvalidBirthday => "Please enter a valid birthday.",
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for DomainError {}
