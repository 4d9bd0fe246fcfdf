use pokeapi::NamedApiResource;
use serde::Serialize;

use super::pokemon_types::{PokemonType, PokemonTypeData};
use super::provider::PokemonProvider;
use crate::error::ContextError;
use crate::filters::{Field, FilterValue, Filters};

/// Snapshot of everything a consumer can read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PokemonContextData {
    pub pokemon: Vec<NamedApiResource>,
    pub all_types: Vec<PokemonTypeData>,
    pub query: String,
    pub favourites: Vec<String>,
    pub selected_types: Vec<PokemonType>,
    pub filters: Filters,
}

/// Read and mutate access to a [`PokemonProvider`].
///
/// Only [`PokemonProvider::context`] hands these out, and they borrow the
/// provider, so a context can't outlive it. Pass it down to whatever needs it.
#[derive(Clone, Copy, Debug)]
pub struct PokemonContext<'a> {
    provider: &'a PokemonProvider,
}

impl<'a> PokemonContext<'a> {
    pub(crate) fn new(provider: &'a PokemonProvider) -> Self {
        Self { provider }
    }

    pub fn data(&self) -> Result<PokemonContextData, ContextError> {
        self.provider.read(|state| state.data())
    }

    pub fn pokemon(&self) -> Result<Vec<NamedApiResource>, ContextError> {
        self.provider.read(|state| {
            state.ensure_ready()?;
            Ok(state.pokemon().map(<[_]>::to_vec).unwrap_or_default())
        })
    }

    pub fn is_favourite(&self, pokemon: &NamedApiResource) -> bool {
        self.provider.read(|state| state.is_favourite(&pokemon.name))
    }

    pub fn search(&self, query: impl Into<String>) {
        let query = query.into();
        self.provider.update(|state| state.search(query));
    }

    pub fn add_favourite(&self, pokemon: &NamedApiResource) {
        self.provider.update(|state| state.add_favourite(&pokemon.name));
    }

    pub fn remove_favourite(&self, pokemon: &NamedApiResource) {
        self.provider.update(|state| state.remove_favourite(&pokemon.name));
    }

    pub fn add_filter_type(&self, pokemon_type: PokemonType) {
        self.provider.update(|state| state.add_filter_type(pokemon_type));
    }

    pub fn remove_filter_type(&self, pokemon_type: PokemonType) {
        self.provider.update(|state| state.remove_filter_type(pokemon_type));
    }

    pub fn add_filter(&self, field: Field, value: impl Into<FilterValue>) {
        let value = value.into();
        self.provider.update(|state| state.add_filter(field, value));
    }

    pub fn remove_filter(&self, field: Field) {
        self.provider.update(|state| state.remove_filter(field));
    }
}
