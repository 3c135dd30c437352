// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runclub: running clubs with KM token rewards on Stellar
//!
//! This crate provides the backend API for logging runs, managing clubs and
//! their members, and minting KM reward tokens to runners' Stellar accounts.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::{ActivityService, ClubService, EventPublisher, Ledger, UserService, WalletService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserService,
    pub clubs: ClubService,
    pub activities: ActivityService,
    pub wallet: WalletService,
}

impl AppState {
    /// Wire the services over a store and a ledger client.
    pub fn new(config: Config, store: Arc<dyn Store>, ledger: Arc<dyn Ledger>) -> Self {
        let events = EventPublisher::from_config(&config);
        Self {
            users: UserService::new(store.clone(), events.clone()),
            clubs: ClubService::new(store.clone()),
            activities: ActivityService::new(store.clone(), ledger.clone(), events),
            wallet: WalletService::new(store, ledger),
            config,
        }
    }
}
