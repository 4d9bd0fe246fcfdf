use std::collections::HashSet;

use itertools::Itertools;
use pokeapi::NamedApiResource;

use crate::filters::{Field, FilterValue, Filters};
use crate::global_state::pokemon_types::PokemonTypeData;

/// Computes the visible list from the raw catalog.
///
/// Each filter only ever removes entries, so the order the fields are applied in
/// does not change the result. The output is stably sorted by the id in each
/// entry's url; entries without a readable id go last.
pub fn filter_pokemon(
    data: &[NamedApiResource],
    all_types: &[PokemonTypeData],
    filters: &Filters,
    query: &str,
    favourites: &[String],
) -> Vec<NamedApiResource> {
    let mut filtered = data.to_vec();

    for (field, value) in filters.iter() {
        let Some(value) = value else {
            continue;
        };
        match field {
            Field::Favourite => {
                let favourites: HashSet<&str> = favourites.iter().map(String::as_str).collect();
                if value.is_truthy() {
                    filtered.retain(|pokemon| favourites.contains(pokemon.name.as_str()));
                } else if *value == FilterValue::Bool(false) {
                    filtered.retain(|pokemon| !favourites.contains(pokemon.name.as_str()));
                }
            }
            Field::Types => {
                let selected: HashSet<&str> = value.as_list().collect();
                let members: HashSet<&str> = all_types
                    .iter()
                    .filter(|t| selected.contains(t.name.as_str()))
                    .flat_map(|t| t.pokemon.iter().map(String::as_str))
                    .collect();
                // selecting nothing, or only empty types, shows everything
                if !members.is_empty() {
                    filtered.retain(|pokemon| members.contains(pokemon.name.as_str()));
                }
            }
        }
    }

    if !query.is_empty() {
        filtered.retain(|pokemon| pokemon.name.contains(query));
    }

    filtered
        .into_iter()
        .sorted_by_key(|pokemon| pokemon.id().unwrap_or(u32::MAX))
        .collect()
}
