mod bootstrap;
mod controller;
mod items;
mod loop_runner;
mod minigames;
mod persistence;
mod profile;
mod room;
mod session;
mod ui;
mod views;

pub(crate) use bootstrap::{build_app, init_tracing};
pub(crate) use loop_runner::run;
