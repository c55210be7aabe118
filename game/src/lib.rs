pub mod config;
pub mod input;
pub mod logic;
pub mod score_store;
pub mod spawner;
pub mod state;
pub mod twenty48_core;
pub mod ui;
pub mod view;
pub mod view_tree;
