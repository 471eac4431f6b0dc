// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod food;
pub mod history;
pub mod user;

pub use food::{FoodInfo, FoodRecord, FoodSummary, Lang};
pub use history::HistoryRecord;
pub use user::User;
