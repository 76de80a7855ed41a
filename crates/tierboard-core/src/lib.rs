// Library root: the board model shared by the app and integration tests.

pub mod board;
pub mod csv_codec;
pub mod directory;
pub mod drag;
pub mod draft;
pub mod headshot;
pub mod player;
pub mod ranking;
pub mod rankings_io;
pub mod search;
pub mod tiers;
