pub mod context;
pub mod pokemon_types;
pub mod provider;
