mod config;
mod fakes;
