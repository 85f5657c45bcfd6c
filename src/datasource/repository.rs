use chrono::Utc;

use crate::models::Reply;

pub mod comments;
pub mod content;
pub mod episodes;
pub mod media;
pub mod requests;

const ADMIN_USER: &str = "Admin";

fn admin_reply(text: String) -> Reply {
    Reply {
        user: ADMIN_USER.into(),
        text,
        date: Utc::now(),
    }
}
