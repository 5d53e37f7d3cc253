#![cfg_attr(all(not(test), not(feature = "std")), no_std)]

pub use measurements;

pub mod common;
