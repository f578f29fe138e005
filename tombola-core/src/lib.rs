pub mod engine;
pub mod export;
pub mod models;
pub mod parse;
pub mod ritual;
pub mod session;
pub mod slots;
