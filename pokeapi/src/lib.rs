use log::info;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("PokeAPI returned status {status} for {url}")]
    BadStatus { status: u16, url: String },
}

/// A reference to another resource by name, with the url that resolves it.
///
/// Every list endpoint returns these. The url always ends in the numeric id of
/// the resource, e.g. `https://pokeapi.co/api/v2/pokemon/25/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedApiResource {
    pub name: String,
    pub url: String,
}

impl NamedApiResource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The numeric id encoded in the last path segment of the url.
    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.url)
    }
}

/// Pulls the trailing numeric id out of a resource url.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NamedApiResourceList {
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedApiResource>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TypePokemon {
    pub slot: u8,
    pub pokemon: NamedApiResource,
}

/// The parts of `/type/{name}` that we care about. Damage relations, move lists
/// and the like are ignored while deserializing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Type {
    pub id: u32,
    pub name: String,
    pub pokemon: Vec<TypePokemon>,
}

impl Type {
    pub fn pokemon_names(&self) -> impl Iterator<Item = &str> {
        self.pokemon.iter().map(|p| p.pokemon.name.as_str())
    }
}

pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub const POKEAPI_BASE_URL: &'static str = "https://pokeapi.co/api/v2";

    pub fn new(user_agent: impl ToString) -> Result<Self, Error> {
        Self::with_base_url(user_agent, Self::POKEAPI_BASE_URL)
    }

    pub fn with_base_url(user_agent: impl ToString, base_url: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(PokeApiClient { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One page of the pokemon list. There is no follow up on `next`.
    pub async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<NamedApiResourceList, Error> {
        let url = self.page_url("pokemon", limit, offset)?;
        info!("Listing pokemon: {url}");
        self.get(url).await
    }

    /// Every type the API knows about. The first request only learns how many
    /// there are, the second asks for all of them in one page.
    pub async fn list_all_types(&self) -> Result<NamedApiResourceList, Error> {
        let first: NamedApiResourceList = self.get(self.endpoint_url("type")?).await?;
        if first.next.is_none() {
            return Ok(first);
        }
        let url = self.page_url("type", first.count, 0)?;
        info!("Listing all types: {url}");
        self.get(url).await
    }

    pub async fn resolve_type(&self, name: &str) -> Result<Type, Error> {
        let url = self.endpoint_url(&format!("type/{name}"))?;
        info!("Resolving type: {url}");
        self.get(url).await
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}/{path}", self.base_url))?)
    }

    fn page_url(&self, path: &str, limit: u32, offset: u32) -> Result<Url, Error> {
        let mut url = self.endpoint_url(path)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod test {
    use mockito::Matcher;

    use crate::{id_from_url, Error, NamedApiResource, NamedApiResourceList, PokeApiClient, Type};

    #[test]
    fn test_id_from_url() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/151"), Some(151));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/"), None);
        assert_eq!(id_from_url(""), None);
        let mew = NamedApiResource::new("mew", "https://pokeapi.co/api/v2/pokemon/151/");
        assert_eq!(mew.id(), Some(151));
    }

    #[test]
    fn test_list_parse() {
        let json = r#"{
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=2&limit=2",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }"#;
        let list: NamedApiResourceList = serde_json::from_str(json).unwrap();
        assert_eq!(list.count, 1302);
        assert!(list.previous.is_none());
        assert_eq!(list.results[1].name, "ivysaur");
        assert_eq!(list.results[1].id(), Some(2));
    }

    #[test]
    fn test_type_parse_ignores_extra_fields() {
        let json = r#"{
            "id": 10,
            "name": "fire",
            "damage_relations": {"double_damage_from": []},
            "moves": [{"name": "ember", "url": "https://pokeapi.co/api/v2/move/52/"}],
            "pokemon": [
                {"pokemon": {"name": "charmander", "url": "https://pokeapi.co/api/v2/pokemon/4/"}, "slot": 1},
                {"pokemon": {"name": "vulpix", "url": "https://pokeapi.co/api/v2/pokemon/37/"}, "slot": 1}
            ]
        }"#;
        let fire: Type = serde_json::from_str(json).unwrap();
        assert_eq!(fire.id, 10);
        assert_eq!(fire.pokemon_names().collect::<Vec<_>>(), ["charmander", "vulpix"]);
    }

    #[test]
    fn test_urls() {
        let client = PokeApiClient::with_base_url("pokedex-tests", "http://localhost:9999/api/v2/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/api/v2");
        assert_eq!(
            client.page_url("pokemon", 150, 0).unwrap().as_str(),
            "http://localhost:9999/api/v2/pokemon?limit=150&offset=0"
        );
        assert_eq!(
            client.endpoint_url("type/fire").unwrap().as_str(),
            "http://localhost:9999/api/v2/type/fire"
        );
    }

    fn type_list_body(count: u32, names: &[&str], next: Option<&str>) -> String {
        serde_json::json!({
            "count": count,
            "next": next,
            "previous": null,
            "results": names
                .iter()
                .enumerate()
                .map(|(i, name)| serde_json::json!({
                    "name": name,
                    "url": format!("https://pokeapi.co/api/v2/type/{}/", i + 1),
                }))
                .collect::<Vec<_>>(),
        })
        .to_string()
    }

    fn local_client(server: &mockito::ServerGuard) -> PokeApiClient {
        PokeApiClient::with_base_url("pokedex-tests", format!("{}/api/v2", server.url())).unwrap()
    }

    fn page_query(limit: &str, offset: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), limit.into()),
            Matcher::UrlEncoded("offset".into(), offset.into()),
        ])
    }

    #[tokio::test]
    async fn test_all_types_single_page() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/api/v2/type")
            .match_query(Matcher::Exact(String::new()))
            .with_header("content-type", "application/json")
            .with_body(type_list_body(2, &["normal", "fire"], None))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/v2/type")
            .match_query(page_query("2", "0"))
            .expect(0)
            .create_async()
            .await;

        let types = local_client(&server).list_all_types().await.unwrap();
        assert_eq!(types.count, 2);
        assert_eq!(types.results[1].name, "fire");
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_all_types_asks_for_count() {
        let mut server = mockito::Server::new_async().await;
        // the first page only carries two of the three types
        let first = server
            .mock("GET", "/api/v2/type")
            .match_query(Matcher::Exact(String::new()))
            .with_body(type_list_body(
                3,
                &["normal", "fighting"],
                Some("https://pokeapi.co/api/v2/type?offset=2&limit=2"),
            ))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/v2/type")
            .match_query(page_query("3", "0"))
            .with_body(type_list_body(3, &["normal", "fighting", "flying"], None))
            .create_async()
            .await;

        let types = local_client(&server).list_all_types().await.unwrap();
        let names: Vec<_> = types.results.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["normal", "fighting", "flying"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_pokemon_page() {
        let mut server = mockito::Server::new_async().await;
        let page = server
            .mock("GET", "/api/v2/pokemon")
            .match_query(page_query("150", "0"))
            .with_body(
                r#"{"count": 1302, "next": null, "previous": null, "results": [
                    {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"}
                ]}"#,
            )
            .create_async()
            .await;

        let list = local_client(&server).list_pokemon(150, 0).await.unwrap();
        assert_eq!(list.results[0].id(), Some(1));
        page.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/type/fire")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;
        server
            .mock("GET", "/api/v2/type")
            .with_status(404)
            .create_async()
            .await;

        let client = local_client(&server);
        match client.resolve_type("fire").await {
            Err(Error::BadStatus { status, url }) => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/api/v2/type/fire"));
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!(
            client.list_all_types().await,
            Err(Error::BadStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_json() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/type/fire")
            .with_body(r#"{"name": "fire"}"#)
            .create_async()
            .await;

        let result = local_client(&server).resolve_type("fire").await;
        assert!(matches!(result, Err(Error::JsonError(_))));
    }

    #[tokio::test]
    #[ignore = "talks to the live PokeAPI"]
    async fn test_list_pokemon() {
        let client = PokeApiClient::new("pokedex-tests").unwrap();
        let list = client.list_pokemon(150, 0).await.unwrap();
        assert_eq!(list.results.len(), 150);
        assert_eq!(list.results[0].name, "bulbasaur");
    }

    #[tokio::test]
    #[ignore = "talks to the live PokeAPI"]
    async fn test_types() {
        let client = PokeApiClient::new("pokedex-tests").unwrap();
        let types = client.list_all_types().await.unwrap();
        assert_eq!(types.results.len() as u32, types.count);
        let fire = client.resolve_type("fire").await.unwrap();
        assert!(fire.pokemon_names().any(|name| name == "charmander"));
    }
}
