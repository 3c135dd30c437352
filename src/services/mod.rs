// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activities;
pub mod clubs;
pub mod events;
pub mod ledger;
pub mod password;
pub mod rewards;
pub mod users;
pub mod wallet;

pub use activities::ActivityService;
pub use clubs::ClubService;
pub use events::EventPublisher;
pub use ledger::{HorizonLedger, Ledger, MockLedger};
pub use users::UserService;
pub use wallet::WalletService;
