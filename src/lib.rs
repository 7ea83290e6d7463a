//! XSG chat bot: answers fixed commands with static text or figures
//! computed from block explorer, exchange-rate and masternode feeds.

pub mod domain;
pub mod application;
pub mod infrastructure;
