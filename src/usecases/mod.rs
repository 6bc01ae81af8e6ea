//! Application use cases. Orchestrate domain logic via ports.

pub mod cart_service;

pub use cart_service::{
    CartMutation, CartOutcome, CartService, DEFAULT_CART_KEY, decode_entries, encode_entries,
};
