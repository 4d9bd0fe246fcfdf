pub mod api;
pub mod error;
pub mod filters;
pub mod global_state;
pub mod pipeline;

pub use api::{CatalogSource, POKEMON_PAGE_OFFSET, POKEMON_PAGE_SIZE};
pub use error::{ContextError, LoadError, UnknownPokemonStat, UnknownPokemonType};
pub use filters::{Field, FilterValue, Filters};
pub use global_state::context::{PokemonContext, PokemonContextData};
pub use global_state::pokemon_types::{PokemonStat, PokemonType, PokemonTypeData};
pub use global_state::provider::{CatalogState, PokemonProvider, ProviderView};
pub use pokeapi::NamedApiResource;
