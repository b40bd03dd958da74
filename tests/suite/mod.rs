mod appearance;
mod config;
mod sync;
mod unlocks;
