// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Local, SecondsFormat};

/// Format a local timestamp as ISO 8601 with microseconds and UTC offset.
pub fn format_local_iso8601(date: DateTime<Local>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, false)
}
