use std::sync::Arc;

use pokeapi::NamedApiResource;
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::context::{PokemonContext, PokemonContextData};
use super::pokemon_types::{PokemonType, PokemonTypeData};
use crate::api::{fetch_all_types, fetch_pokemon, CatalogSource};
use crate::error::{ContextError, LoadError};
use crate::filters::{Field, FilterValue, Filters};
use crate::pipeline::filter_pokemon;

/// Everything the provider holds. `pokemon` is derived from the rest and is
/// rebuilt after every write.
#[derive(Debug)]
pub struct CatalogState {
    data: Option<Vec<NamedApiResource>>,
    pokemon: Option<Vec<NamedApiResource>>,
    all_types: Vec<PokemonTypeData>,
    types_loaded: bool,
    selected_types: Vec<PokemonType>,
    favourites: Vec<String>,
    query: String,
    filters: Filters,
    error: Option<Arc<LoadError>>,
}

impl Default for CatalogState {
    fn default() -> Self {
        let mut state = Self {
            data: None,
            pokemon: None,
            all_types: Vec::new(),
            types_loaded: false,
            selected_types: Vec::new(),
            favourites: Vec::new(),
            query: String::new(),
            filters: Filters::default(),
            error: None,
        };
        state.sync_type_filter();
        state
    }
}

impl CatalogState {
    /// The visible list, once the catalog has arrived.
    pub fn pokemon(&self) -> Option<&[NamedApiResource]> {
        self.pokemon.as_deref()
    }

    pub fn all_types(&self) -> &[PokemonTypeData] {
        &self.all_types
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn favourites(&self) -> &[String] {
        &self.favourites
    }

    pub fn selected_types(&self) -> &[PokemonType] {
        &self.selected_types
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn error(&self) -> Option<&Arc<LoadError>> {
        self.error.as_ref()
    }

    pub fn is_favourite(&self, name: &str) -> bool {
        self.favourites.iter().any(|favourite| favourite == name)
    }

    pub(crate) fn ensure_ready(&self) -> Result<(), ContextError> {
        if let Some(error) = &self.error {
            return Err(ContextError::Failed(error.clone()));
        }
        if self.pokemon.is_none() {
            return Err(ContextError::NotLoaded);
        }
        Ok(())
    }

    pub fn data(&self) -> Result<PokemonContextData, ContextError> {
        self.ensure_ready()?;
        Ok(PokemonContextData {
            pokemon: self.pokemon.clone().unwrap_or_default(),
            all_types: self.all_types.clone(),
            query: self.query.clone(),
            favourites: self.favourites.clone(),
            selected_types: self.selected_types.clone(),
            filters: self.filters.clone(),
        })
    }

    pub fn view(&self) -> ProviderView {
        match self.data() {
            Ok(data) => ProviderView::Ready(data),
            Err(ContextError::Failed(_)) => ProviderView::Error,
            Err(ContextError::NotLoaded) => ProviderView::Empty,
        }
    }

    fn recompute(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        let pokemon = filter_pokemon(
            data,
            &self.all_types,
            &self.filters,
            &self.query,
            &self.favourites,
        );
        debug!(visible = pokemon.len(), total = data.len(), "recomputed visible pokemon");
        self.pokemon = Some(pokemon);
    }

    fn sync_type_filter(&mut self) {
        let selected = FilterValue::from(&self.selected_types[..]);
        self.filters.set(Field::Types, Some(selected));
    }

    fn fail(&mut self, e: LoadError) {
        error!("pokemon provider failed to load: {e}");
        self.error = Some(Arc::new(e));
    }

    pub(crate) fn search(&mut self, query: String) {
        self.query = query;
    }

    pub(crate) fn add_favourite(&mut self, name: &str) {
        self.favourites.push(name.to_string());
    }

    pub(crate) fn remove_favourite(&mut self, name: &str) {
        self.favourites.retain(|favourite| favourite != name);
    }

    pub(crate) fn add_filter_type(&mut self, pokemon_type: PokemonType) {
        self.selected_types.push(pokemon_type);
        self.sync_type_filter();
    }

    pub(crate) fn remove_filter_type(&mut self, pokemon_type: PokemonType) {
        self.selected_types.retain(|selected| *selected != pokemon_type);
        self.sync_type_filter();
    }

    pub(crate) fn add_filter(&mut self, field: Field, value: FilterValue) {
        self.filters.set(field, Some(value));
    }

    pub(crate) fn remove_filter(&mut self, field: Field) {
        self.filters.clear(field);
    }
}

/// What a consumer of the provider should show.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderView {
    /// A load failed. This never goes away.
    Error,
    /// Still waiting for the pokemon list.
    Empty,
    Ready(PokemonContextData),
}

/// Owns the catalog state and hands out [`PokemonContext`]s to consumers.
///
/// Subscribers are notified after every write that changed something.
#[derive(Debug)]
pub struct PokemonProvider {
    state: watch::Sender<CatalogState>,
}

impl Default for PokemonProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PokemonProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self { state }
    }

    /// Creates a provider and runs the initial load to completion.
    pub async fn mount(source: &dyn CatalogSource) -> Self {
        let provider = Self::new();
        provider.load(source).await;
        provider
    }

    /// Fetches the pokemon list and the type taxonomy concurrently. Each one is
    /// written as soon as it arrives; whichever fails first puts the provider in
    /// the error state.
    pub async fn load(&self, source: &dyn CatalogSource) {
        info!("loading pokemon catalog");
        futures::join!(
            async { self.set_pokemon(fetch_pokemon(source).await) },
            async { self.set_types(fetch_all_types(source).await) },
        );
    }

    fn set_pokemon(&self, result: Result<Vec<NamedApiResource>, LoadError>) {
        self.state.send_if_modified(move |state| {
            if state.error.is_some() || state.data.is_some() {
                debug!("discarding pokemon list");
                return false;
            }
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.recompute();
                }
                Err(e) => state.fail(e),
            }
            true
        });
    }

    fn set_types(&self, result: Result<Vec<PokemonTypeData>, LoadError>) {
        self.state.send_if_modified(move |state| {
            if state.error.is_some() || state.types_loaded {
                debug!("discarding type taxonomy");
                return false;
            }
            match result {
                Ok(all_types) => {
                    state.all_types = all_types;
                    state.types_loaded = true;
                    state.recompute();
                }
                Err(e) => state.fail(e),
            }
            true
        });
    }

    /// Runs one mutation and rebuilds the visible list. Does nothing once the
    /// provider has failed.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut CatalogState)) -> bool {
        self.state.send_if_modified(|state| {
            if state.error.is_some() {
                return false;
            }
            mutate(state);
            state.recompute();
            true
        })
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&CatalogState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// A handle for consumers. Fails while the catalog is still loading and
    /// forever after a failed load.
    pub fn context(&self) -> Result<PokemonContext<'_>, ContextError> {
        self.read(CatalogState::ensure_ready)?;
        Ok(PokemonContext::new(self))
    }

    pub fn view(&self) -> ProviderView {
        self.read(CatalogState::view)
    }

    pub fn error(&self) -> Option<Arc<LoadError>> {
        self.read(|state| state.error().cloned())
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }
}
