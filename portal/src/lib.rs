//! SeaCollege Voice library
//!
//! Campus complaint portal: students file complaints, teachers register,
//! log in, review pending complaints with optional AI triage and mark them
//! solved. The library holds everything except process startup so it can be
//! driven from tests.

pub mod app;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod gui;
pub mod services;
pub mod storage;
pub mod views;
