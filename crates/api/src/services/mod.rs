//! Use-case orchestration that sits between handlers and the stores.

pub mod account;

pub use account::AccountService;
