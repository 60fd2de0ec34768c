use clap::Parser;
use gor_client::{report, RatingClient};
use gor_core::message::RatingRequest;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Compute a new EGD rating using a rating service.
#[derive(Parser)]
struct Options {
    /// Current rating of the player.
    #[clap(allow_negative_numbers = true)]
    player_rating: f64,

    /// Rating of the opponent.
    #[clap(allow_negative_numbers = true)]
    opponent_rating: f64,

    /// Game result: 1 for a win, 0.5 for jigo, 0 for a loss.
    #[clap(allow_negative_numbers = true)]
    result: f64,

    /// Base URL of the rating service.
    #[clap(
        short,
        long,
        env = "GOR_URL",
        default_value = "http://localhost:9000/"
    )]
    url: Url,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(true)
        .init();
    let opt = Options::parse();

    let client = RatingClient::new(opt.url);
    let rating = client
        .new_rating(&RatingRequest {
            player_rating: Some(opt.player_rating),
            opponent_rating: Some(opt.opponent_rating),
            result: Some(opt.result),
        })
        .await?;
    println!("{}", report(&rating));
    Ok(())
}
