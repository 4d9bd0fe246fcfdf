#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use pokeapi::{NamedApiResource, NamedApiResourceList, Type, TypePokemon};
use pokedex_app::CatalogSource;
use tokio::sync::oneshot;

pub fn pokemon(name: &str, id: u32) -> NamedApiResource {
    NamedApiResource::new(name, format!("https://pokeapi.co/api/v2/pokemon/{id}/"))
}

pub fn names(list: &[NamedApiResource]) -> Vec<&str> {
    list.iter().map(|p| p.name.as_str()).collect()
}

/// An in memory stand in for the PokeAPI.
#[derive(Default)]
pub struct FakeSource {
    pub pokemon: Vec<NamedApiResource>,
    pub types: Vec<(String, Vec<String>)>,
    pub fail_pokemon: bool,
    pub fail_type_list: bool,
    pub fail_type: Option<String>,
    /// When set, the type list waits for this before answering.
    pub type_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub pages_requested: Mutex<Vec<(u32, u32)>>,
}

impl FakeSource {
    /// Bulbasaur, charmander and squirtle, deliberately out of id order.
    pub fn starters() -> Self {
        let types = [
            ("grass", vec!["bulbasaur"]),
            ("poison", vec!["bulbasaur"]),
            ("fire", vec!["charmander"]),
            ("water", vec!["squirtle"]),
            ("shadow", vec![]),
        ];
        Self {
            pokemon: vec![
                pokemon("squirtle", 7),
                pokemon("bulbasaur", 1),
                pokemon("charmander", 4),
            ],
            types: types
                .into_iter()
                .map(|(name, members)| {
                    (
                        name.to_string(),
                        members.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn gated(mut self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        self.type_gate = Mutex::new(Some(rx));
        (self, tx)
    }

    fn failure(path: &str) -> pokeapi::Error {
        pokeapi::Error::BadStatus {
            status: 500,
            url: format!("http://fake/{path}"),
        }
    }

    fn list(results: Vec<NamedApiResource>) -> NamedApiResourceList {
        NamedApiResourceList {
            count: results.len() as u32,
            next: None,
            previous: None,
            results,
        }
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<NamedApiResourceList, pokeapi::Error> {
        self.pages_requested.lock().unwrap().push((limit, offset));
        if self.fail_pokemon {
            return Err(Self::failure("pokemon"));
        }
        Ok(Self::list(self.pokemon.clone()))
    }

    async fn list_all_types(&self) -> Result<NamedApiResourceList, pokeapi::Error> {
        let gate = self.type_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_type_list {
            return Err(Self::failure("type"));
        }
        Ok(Self::list(
            self.types
                .iter()
                .enumerate()
                .map(|(i, (name, _))| {
                    NamedApiResource::new(name, format!("https://pokeapi.co/api/v2/type/{}/", i + 1))
                })
                .collect(),
        ))
    }

    async fn resolve_type(&self, name: &str) -> Result<Type, pokeapi::Error> {
        if self.fail_type.as_deref() == Some(name) {
            return Err(Self::failure(&format!("type/{name}")));
        }
        let (id, (name, members)) = self
            .types
            .iter()
            .enumerate()
            .find(|(_, (type_name, _))| type_name == name)
            .ok_or_else(|| Self::failure(&format!("type/{name}")))?;
        Ok(Type {
            id: id as u32 + 1,
            name: name.clone(),
            pokemon: members
                .iter()
                .map(|member| TypePokemon {
                    slot: 1,
                    pokemon: NamedApiResource::new(member, "https://pokeapi.co/api/v2/pokemon/0/"),
                })
                .collect(),
        })
    }
}
