//! Shared test harness modules for the `osrm-table` CLI.

use super::*;

mod helpers;
