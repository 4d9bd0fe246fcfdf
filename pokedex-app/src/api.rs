use async_trait::async_trait;
use futures::future::try_join_all;
use pokeapi::{NamedApiResource, NamedApiResourceList, PokeApiClient, Type};
use tracing::info;

use crate::error::LoadError;
use crate::global_state::pokemon_types::PokemonTypeData;

/// How many pokemon are fetched. There is no pagination past this page.
pub const POKEMON_PAGE_SIZE: u32 = 150;
pub const POKEMON_PAGE_OFFSET: u32 = 0;

/// The remote calls the provider needs. [`PokeApiClient`] is the real one.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<NamedApiResourceList, pokeapi::Error>;

    async fn list_all_types(&self) -> Result<NamedApiResourceList, pokeapi::Error>;

    async fn resolve_type(&self, name: &str) -> Result<Type, pokeapi::Error>;
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<NamedApiResourceList, pokeapi::Error> {
        PokeApiClient::list_pokemon(self, limit, offset).await
    }

    async fn list_all_types(&self) -> Result<NamedApiResourceList, pokeapi::Error> {
        PokeApiClient::list_all_types(self).await
    }

    async fn resolve_type(&self, name: &str) -> Result<Type, pokeapi::Error> {
        PokeApiClient::resolve_type(self, name).await
    }
}

pub(crate) async fn fetch_pokemon(source: &dyn CatalogSource) -> Result<Vec<NamedApiResource>, LoadError> {
    let response = source
        .list_pokemon(POKEMON_PAGE_SIZE, POKEMON_PAGE_OFFSET)
        .await
        .map_err(LoadError::PokemonList)?;
    info!(count = response.results.len(), "fetched pokemon list");
    Ok(response.results)
}

/// Resolves every type concurrently. The first failure drops the rest of the
/// batch and no partial taxonomy is returned.
pub(crate) async fn fetch_all_types(source: &dyn CatalogSource) -> Result<Vec<PokemonTypeData>, LoadError> {
    let response = source.list_all_types().await.map_err(LoadError::TypeList)?;
    let all_types = try_join_all(response.results.iter().map(|t| async move {
        source
            .resolve_type(&t.name)
            .await
            .map(PokemonTypeData::from)
            .map_err(|e| LoadError::TypeResolve {
                name: t.name.clone(),
                source: e,
            })
    }))
    .await?;
    info!(count = all_types.len(), "resolved pokemon types");
    Ok(all_types)
}
