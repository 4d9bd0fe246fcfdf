use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{UnknownPokemonStat, UnknownPokemonType};

/// The elemental types a user can filter by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokemonType {
    Bug,
    Dark,
    Dragon,
    Electric,
    Fairy,
    Fighting,
    Fire,
    Flying,
    Ghost,
    Grass,
    Ground,
    Ice,
    Normal,
    Poison,
    Psychic,
    Rock,
    Steel,
    Water,
}

impl PokemonType {
    pub const ALL: [PokemonType; 18] = [
        Self::Bug,
        Self::Dark,
        Self::Dragon,
        Self::Electric,
        Self::Fairy,
        Self::Fighting,
        Self::Fire,
        Self::Flying,
        Self::Ghost,
        Self::Grass,
        Self::Ground,
        Self::Ice,
        Self::Normal,
        Self::Poison,
        Self::Psychic,
        Self::Rock,
        Self::Steel,
        Self::Water,
    ];

    /// Identifier used by the API for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Dark => "dark",
            Self::Dragon => "dragon",
            Self::Electric => "electric",
            Self::Fairy => "fairy",
            Self::Fighting => "fighting",
            Self::Fire => "fire",
            Self::Flying => "flying",
            Self::Ghost => "ghost",
            Self::Grass => "grass",
            Self::Ground => "ground",
            Self::Ice => "ice",
            Self::Normal => "normal",
            Self::Poison => "poison",
            Self::Psychic => "psychic",
            Self::Rock => "rock",
            Self::Steel => "steel",
            Self::Water => "water",
        }
    }
}

impl Display for PokemonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PokemonType {
    type Err = UnknownPokemonType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownPokemonType(s.to_string()))
    }
}

/// Base stats as the API names them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PokemonStat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl PokemonStat {
    pub const ALL: [PokemonStat; 6] = [
        Self::Hp,
        Self::Attack,
        Self::Defense,
        Self::SpecialAttack,
        Self::SpecialDefense,
        Self::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpecialAttack => "special-attack",
            Self::SpecialDefense => "special-defense",
            Self::Speed => "speed",
        }
    }
}

impl Display for PokemonStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PokemonStat {
    type Err = UnknownPokemonStat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| UnknownPokemonStat(s.to_string()))
    }
}

/// One entry of the type taxonomy: a type name and the pokemon that have it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonTypeData {
    pub name: String,
    pub pokemon: Vec<String>,
}

impl From<pokeapi::Type> for PokemonTypeData {
    fn from(value: pokeapi::Type) -> Self {
        let pokemon = value.pokemon_names().map(str::to_string).collect();
        Self {
            name: value.name,
            pokemon,
        }
    }
}
