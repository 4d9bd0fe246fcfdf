use anyhow::Result;
use clap::Parser;
use pokeapi::PokeApiClient;
use pokedex_app::{
    Field, PokemonContext, PokemonContextData, PokemonProvider, PokemonType, ProviderView,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(about = "Search and filter the first 150 pokemon")]
struct Args {
    /// Root of the PokeAPI v2 endpoints
    #[arg(long, env = "POKEAPI_BASE_URL", default_value = PokeApiClient::POKEAPI_BASE_URL)]
    base_url: String,
    /// Only show pokemon whose name contains this
    #[arg(long)]
    search: Option<String>,
    /// Only show pokemon of these types
    #[arg(long = "type", value_name = "TYPE")]
    types: Vec<PokemonType>,
    /// Mark a pokemon as a favourite
    #[arg(long = "favourite", value_name = "NAME")]
    favourites: Vec<String>,
    #[arg(long, conflicts_with = "exclude_favourites")]
    only_favourites: bool,
    #[arg(long)]
    exclude_favourites: bool,
    /// Print at most this many pokemon
    #[arg(long)]
    limit: Option<usize>,
    /// Print the whole context as json instead of a list
    #[arg(long)]
    json: bool,
}

fn apply_args(ctx: PokemonContext<'_>, args: &Args) -> Result<()> {
    let pokemon = ctx.pokemon()?;
    for name in &args.favourites {
        match pokemon.iter().find(|p| &p.name == name) {
            Some(p) => ctx.add_favourite(p),
            None => warn!("{name} is not in the pokedex, skipping it"),
        }
    }
    for pokemon_type in &args.types {
        ctx.add_filter_type(*pokemon_type);
    }
    if args.only_favourites {
        ctx.add_filter(Field::Favourite, true);
    } else if args.exclude_favourites {
        ctx.add_filter(Field::Favourite, false);
    }
    if let Some(query) = &args.search {
        ctx.search(query.as_str());
    }
    Ok(())
}

fn render_list(data: &PokemonContextData, limit: Option<usize>) -> String {
    let mut out = String::new();
    let shown = limit.unwrap_or(data.pokemon.len()).min(data.pokemon.len());
    for pokemon in &data.pokemon[..shown] {
        let id = pokemon
            .id()
            .map(|id| format!("#{id:03}"))
            .unwrap_or_else(|| "#???".to_string());
        let types = data
            .all_types
            .iter()
            .filter(|t| t.pokemon.contains(&pokemon.name))
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join("/");
        let star = if data.favourites.contains(&pokemon.name) {
            " *"
        } else {
            ""
        };
        out.push_str(&format!("{id} {:<12} {types}{star}\n", pokemon.name));
    }
    out.push_str(&format!("{shown} of {} shown\n", data.pokemon.len()));
    out
}

fn render(view: &ProviderView, limit: Option<usize>) -> String {
    match view {
        ProviderView::Error => "Error\n".to_string(),
        ProviderView::Empty => String::new(),
        ProviderView::Ready(data) => render_list(data, limit),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let client = PokeApiClient::with_base_url(
        concat!("pokedex/", env!("CARGO_PKG_VERSION")),
        &args.base_url,
    )?;
    info!("using {}", client.base_url());

    let provider = PokemonProvider::mount(&client).await;
    if let Ok(ctx) = provider.context() {
        apply_args(ctx, &args)?;
    }

    let view = provider.view();
    match (&view, args.json) {
        (ProviderView::Ready(data), true) => println!("{}", serde_json::to_string_pretty(data)?),
        _ => print!("{}", render(&view, args.limit)),
    }
    if let Some(e) = provider.error() {
        return Err(anyhow::Error::from(e).context("loading the pokedex failed"));
    }
    Ok(())
}
