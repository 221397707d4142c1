//! Typography Guide
//!
//! Interactive controllers for the iOS/Android Typography System Guide: tab
//! navigation, platform type-scale demos, the light/dark theme, a persisted
//! review checklist and accessibility preference mirroring.
//!
//! Controllers talk to the page through the [`dom::Document`] trait and persist
//! through [`storage::Storage`], so the same logic runs against a browser host
//! or the in-memory document used by the demo driver and the tests.

pub mod announcer;
pub mod app;
pub mod config;
pub mod constants;
pub mod controllers;
pub mod dom;
pub mod error;
pub mod event;
pub mod page;
pub mod preferences;
pub mod shell;
pub mod storage;
pub mod timer;
