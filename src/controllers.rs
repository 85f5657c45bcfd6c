use serde::Serialize;

pub mod comments;
pub mod content;
pub mod episodes;
pub mod media;
pub mod requests;

#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub message: String,
}

impl Message {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
