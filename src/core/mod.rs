pub mod badges;
pub mod config;
pub mod event;
