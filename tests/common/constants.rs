//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the seeded catalog changes, update only this file.
#![allow(dead_code)] // Not every test binary uses every constant

// ============================================================================
// Seeded Catalog IDs
// ============================================================================

/// Artist id for "The Test Band"
pub const ARTIST_1_ID: i64 = 1;

/// Artist id for "Jazz Ensemble"
pub const ARTIST_2_ID: i64 = 2;

/// Genre id for "Rock"
pub const GENRE_1_ID: i64 = 1;

/// Genre id for "Jazz"
pub const GENRE_2_ID: i64 = 2;

/// Song id for "Opening Track" by The Test Band (Rock)
pub const SONG_1_ID: i64 = 1;

/// Song id for "Closing Track" by The Test Band (Rock, Jazz)
pub const SONG_2_ID: i64 = 2;

/// Song id for "Smooth Jazz" by Jazz Ensemble (no genres)
pub const SONG_3_ID: i64 = 3;

/// An id no seeded entity ever gets
pub const UNKNOWN_ID: i64 = 424242;

// ============================================================================
// Seeded Catalog Metadata
// ============================================================================

pub const ARTIST_1_NAME: &str = "The Test Band";
pub const ARTIST_1_AGE: i64 = 30;
pub const ARTIST_1_BIO: &str = "Four friends and a garage";

pub const ARTIST_2_NAME: &str = "Jazz Ensemble";
pub const ARTIST_2_AGE: i64 = 45;
pub const ARTIST_2_BIO: &str = "Improvising since forever";

pub const GENRE_1_DESCRIPTION: &str = "Rock";
pub const GENRE_2_DESCRIPTION: &str = "Jazz";

pub const SONG_1_TITLE: &str = "Opening Track";
pub const SONG_1_ALBUM: &str = "First Album";
pub const SONG_1_LENGTH: i64 = 180;

pub const SONG_2_TITLE: &str = "Closing Track";
pub const SONG_2_ALBUM: &str = "First Album";
pub const SONG_2_LENGTH: i64 = 240;

pub const SONG_3_TITLE: &str = "Smooth Jazz";
pub const SONG_3_ALBUM: &str = "Jazz Collection";
pub const SONG_3_LENGTH: i64 = 200;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
