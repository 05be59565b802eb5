// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod models;
pub mod settings;
pub mod sources;
pub mod stats;
pub mod store;
pub mod utils;
pub mod commands;

pub use error::Error;
