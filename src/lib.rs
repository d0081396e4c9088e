//! Presence analyzer client — fetches presence data from the backend and
//! renders it as charts.
//!
//! DESIGN
//! ======
//! `view` holds the page handles, `api` the backend capability, `chart`
//! the table/formatter/renderer seam and `widgets` the fetch-and-render
//! units that tie them together. The binary in `main.rs` plays the page.

pub mod api;
pub mod chart;
pub mod config;
pub mod view;
pub mod widgets;
