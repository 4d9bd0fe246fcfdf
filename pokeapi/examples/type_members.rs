use clap::Parser;
use pokeapi::PokeApiClient;

#[derive(Parser)]
struct Args {
    /// Type to resolve, e.g. `fire`
    #[arg(default_value = "fire")]
    name: String,
}

// Print every pokemon belonging to one type
#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let args = Args::parse();
    let fire = PokeApiClient::new("pokeapi-examples")
        .unwrap()
        .resolve_type(&args.name)
        .await
        .unwrap();
    for name in fire.pokemon_names() {
        println!("{name}");
    }
}
