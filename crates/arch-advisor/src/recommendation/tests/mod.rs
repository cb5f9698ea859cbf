mod common;

mod assembly;
mod cost;
mod patterns;
