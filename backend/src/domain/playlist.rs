//! User playlists and their ordered song entries.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Maximum length of a playlist title.
pub const PLAYLIST_TITLE_MAX: usize = 255;

/// A playlist owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: Uuid,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Public playlists are visible to everyone, private ones to the owner.
    pub fn is_visible_to(&self, viewer: Option<&UserId>) -> bool {
        self.is_public || viewer.is_some_and(|id| *id == self.owner_id)
    }
}

/// Validated input for creating a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDraft {
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
}

fn validate_playlist_title(title: &str) -> Result<String, Error> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::invalid_request("title must not be empty"));
    }
    if title.chars().count() > PLAYLIST_TITLE_MAX {
        return Err(Error::invalid_request(format!(
            "title must be at most {PLAYLIST_TITLE_MAX} characters"
        )));
    }
    Ok(title.to_owned())
}

impl PlaylistDraft {
    pub fn new(title: &str, description: Option<String>, is_public: bool) -> Result<Self, Error> {
        Ok(Self {
            title: validate_playlist_title(title)?,
            description,
            is_public,
        })
    }

    /// Materialise the draft as a playlist owned by `owner_id`.
    pub fn into_playlist(self, owner_id: UserId, created_at: DateTime<Utc>) -> Playlist {
        Playlist {
            id: Uuid::new_v4(),
            owner_id,
            title: self.title,
            description: self.description,
            is_public: self.is_public,
            created_at,
        }
    }
}

/// Partial update applied to a playlist by its owner. Absent fields keep
/// their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl PlaylistUpdate {
    pub fn apply(self, mut playlist: Playlist) -> Result<Playlist, Error> {
        if let Some(title) = self.title {
            playlist.title = validate_playlist_title(&title)?;
        }
        if self.description.is_some() {
            playlist.description = self.description;
        }
        if let Some(is_public) = self.is_public {
            playlist.is_public = is_public;
        }
        Ok(playlist)
    }
}

/// A song's slot in a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub song_id: Uuid,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

/// Target position for one song in a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongPosition {
    pub song_id: Uuid,
    pub position: i32,
}

/// Non-empty set of position updates applied all-or-nothing.
///
/// ## Invariants
/// - at least one update;
/// - each song appears at most once;
/// - positions are non-negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderBatch(Vec<SongPosition>);

impl ReorderBatch {
    pub fn new(positions: Vec<SongPosition>) -> Result<Self, Error> {
        if positions.is_empty() {
            return Err(Error::invalid_request("songs must not be empty"));
        }
        let mut seen = HashSet::with_capacity(positions.len());
        for entry in &positions {
            if entry.position < 0 {
                return Err(Error::invalid_request("position must not be negative"));
            }
            if !seen.insert(entry.song_id) {
                return Err(Error::invalid_request(format!(
                    "song {} appears more than once",
                    entry.song_id
                )));
            }
        }
        Ok(Self(positions))
    }

    pub fn positions(&self) -> &[SongPosition] {
        self.0.as_slice()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn playlist(is_public: bool, owner_id: UserId) -> Playlist {
        PlaylistDraft::new("Road trip", None, is_public)
            .expect("valid draft")
            .into_playlist(owner_id, Utc::now())
    }

    #[rstest]
    fn private_playlists_are_owner_only() {
        let owner = UserId::random();
        let other = UserId::random();
        let private = playlist(false, owner.clone());
        assert!(private.is_visible_to(Some(&owner)));
        assert!(!private.is_visible_to(Some(&other)));
        assert!(!private.is_visible_to(None));
    }

    #[rstest]
    fn public_playlists_are_visible_to_anyone() {
        let public = playlist(true, UserId::random());
        assert!(public.is_visible_to(None));
    }

    #[rstest]
    fn blank_titles_are_rejected() {
        assert!(PlaylistDraft::new("  ", None, true).is_err());
    }

    #[rstest]
    fn updates_keep_absent_fields() {
        let original = playlist(true, UserId::random());
        let updated = PlaylistUpdate {
            title: Some(" Night drive ".to_owned()),
            ..PlaylistUpdate::default()
        }
        .apply(original.clone())
        .expect("valid update");
        assert_eq!(updated.title, "Night drive");
        assert!(updated.is_public);
        assert_eq!(updated.id, original.id);

        let hidden = PlaylistUpdate {
            is_public: Some(false),
            ..PlaylistUpdate::default()
        }
        .apply(updated)
        .expect("valid update");
        assert!(!hidden.is_public);
    }

    #[rstest]
    fn updates_reject_blank_titles() {
        let update = PlaylistUpdate {
            title: Some("   ".to_owned()),
            ..PlaylistUpdate::default()
        };
        assert!(update.apply(playlist(true, UserId::random())).is_err());
    }

    #[rstest]
    fn reorder_batch_rejects_duplicates() {
        let song_id = Uuid::new_v4();
        let result = ReorderBatch::new(vec![
            SongPosition {
                song_id,
                position: 0,
            },
            SongPosition {
                song_id,
                position: 1,
            },
        ]);
        assert!(result.is_err());
    }

    #[rstest]
    fn reorder_batch_rejects_empty_and_negative_input() {
        assert!(ReorderBatch::new(Vec::new()).is_err());
        assert!(
            ReorderBatch::new(vec![SongPosition {
                song_id: Uuid::new_v4(),
                position: -1,
            }])
            .is_err()
        );
    }
}
