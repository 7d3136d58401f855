//! Wire models and configuration shared by the Content Explorer web and
//! terminal clients.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod models;
