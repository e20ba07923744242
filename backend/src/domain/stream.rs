//! Play events.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Window, in days, used when reporting recent stream counts.
pub const STREAM_COUNT_WINDOW_DAYS: i64 = 30;

/// Request to record a play of a song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    pub song_id: Uuid,
    pub is_preview: bool,
    pub device_type: Option<String>,
    pub country_code: Option<String>,
}

/// Append-only play event. Anonymous plays carry no user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub id: Uuid,
    pub song_id: Uuid,
    pub user_id: Option<UserId>,
    pub is_preview: bool,
    pub device_type: Option<String>,
    pub country_code: Option<String>,
    pub streamed_at: DateTime<Utc>,
}

impl StreamEvent {
    /// Build an event, normalising the country code to upper-case ISO 3166
    /// alpha-2.
    pub fn record(
        request: StreamRequest,
        user_id: Option<UserId>,
        streamed_at: DateTime<Utc>,
    ) -> Result<Self, Error> {
        let country_code = request
            .country_code
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty());
        let malformed = country_code
            .as_deref()
            .is_some_and(|code| code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()));
        if malformed {
            return Err(Error::invalid_request(
                "countryCode must be a two-letter ISO 3166 code",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            song_id: request.song_id,
            user_id,
            is_preview: request.is_preview,
            device_type: request.device_type.filter(|value| !value.trim().is_empty()),
            country_code,
            streamed_at,
        })
    }
}
