mod commands;
mod config;
mod utils;
