// src/systems/mod.rs
//! World を書き換えるシステムたちを置くモジュールだよ！

pub mod spawn_system;

pub use spawn_system::SpawnCardsSystem;
