mod fakes;
mod registry;
