pub mod combat;
pub mod compute;
pub mod constants;
pub mod difficulty;
pub mod entities;
pub mod geometry;
pub mod leaderboard;
pub mod movement;
pub mod pattern;
pub mod sinks;
