use std::sync::Arc;

use thiserror::Error;

/// Any failure while fetching the catalog or the type taxonomy.
///
/// Once one of these is recorded the provider never recovers.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to list pokemon: {0}")]
    PokemonList(#[source] pokeapi::Error),
    #[error("Failed to list types: {0}")]
    TypeList(#[source] pokeapi::Error),
    #[error("Failed to resolve type {name}: {source}")]
    TypeResolve {
        name: String,
        #[source]
        source: pokeapi::Error,
    },
}

#[derive(Debug, Error, Clone)]
pub enum ContextError {
    #[error("The pokemon catalog has not loaded yet")]
    NotLoaded,
    #[error("The pokemon provider failed to load: {0}")]
    Failed(Arc<LoadError>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown pokemon type {0}")]
pub struct UnknownPokemonType(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown pokemon stat {0}")]
pub struct UnknownPokemonStat(pub String);
