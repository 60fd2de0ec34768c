use ansi_term::Colour;
use anyhow::{ensure, Context};
use gor_core::message::{RatingRequest, RatingResponse};
use hyper::{client::connect::HttpConnector, header, Body, Client, Method, Request};
use url::Url;

/// Client for a running rating service.
#[derive(Clone, Debug)]
pub struct RatingClient {
    client: Client<HttpConnector>,
    url: Url,
}

impl RatingClient {
    /// Create a client for the service rooted at `url`.
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    /// Rate a single game.
    ///
    /// Fails with the service's message if it rejects the request.
    pub async fn new_rating(&self, game: &RatingRequest) -> anyhow::Result<RatingResponse> {
        let url = self.url.join("new_rating")?;
        let request = Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/json")
            .uri(url.as_str())
            .body(Body::from(serde_json::to_vec(game)?))?;
        tracing::debug!(%url, ?game, "requesting new rating");

        let response = self
            .client
            .request(request)
            .await
            .context(format!("{url}: request failed"))?;
        let status = response.status();
        let body = hyper::body::to_bytes(response).await?;
        ensure!(
            status.is_success(),
            "{url}: {status}: {}",
            String::from_utf8_lossy(&body).trim_end()
        );

        serde_json::from_slice(&body).context(format!("{url}: malformed response"))
    }
}

/// A human-readable summary of a rating update.
pub fn report(rating: &RatingResponse) -> String {
    let change = format!("{:+.3}", rating.gor_change);
    let change = if rating.gor_change < 0.0 {
        Colour::Red.paint(change)
    } else {
        Colour::Green.paint(change)
    };
    format!(
        "new rating:      {:.3} ({change})\n\
         expected result: {:.4}\n\
         con:             {:.4}\n\
         bonus:           {:.4}\n\
         beta:            {:.4}",
        rating.new_rating, rating.expected_result, rating.con, rating.bonus, rating.beta,
    )
}
