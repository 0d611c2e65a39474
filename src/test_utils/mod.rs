//! Consolidated test utilities: HTML page builders, mock renderers and
//! scrapers, and configuration helpers.

#![cfg(test)]

pub mod config;
pub mod html;
pub mod mocks;
