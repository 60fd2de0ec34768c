use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST /new_rating` request.
///
/// Every field is optional on the wire so that a missing field can be told apart from one which is
/// present but zero. Use [`RatingRequest::validate`] to obtain a [`Game`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RatingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_rating: Option<f64>,
    /// 1.0 for a win, 0.5 for jigo, 0.0 for a loss.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
}

impl RatingRequest {
    /// Check that all fields are present and the result is in range.
    ///
    /// All missing fields are reported at once, in declaration order.
    pub fn validate(self) -> Result<Game, RequestError> {
        let (player_rating, opponent_rating, result) =
            match (self.player_rating, self.opponent_rating, self.result) {
                (Some(player_rating), Some(opponent_rating), Some(result)) => {
                    (player_rating, opponent_rating, result)
                }
                _ => {
                    let fields = [
                        ("player_rating", self.player_rating),
                        ("opponent_rating", self.opponent_rating),
                        ("result", self.result),
                    ]
                    .into_iter()
                    .filter_map(|(name, value)| value.is_none().then_some(name))
                    .collect();
                    return Err(RequestError::MissingFields { fields });
                }
            };

        if !(0.0..=1.0).contains(&result) {
            return Err(RequestError::ResultOutOfRange);
        }

        Ok(Game {
            player_rating,
            opponent_rating,
            result,
        })
    }
}

/// Decode a request body.
///
/// A body consisting only of whitespace counts as empty. A top-level `null` decodes to a request
/// with every field missing.
pub fn parse_request(body: &[u8]) -> Result<RatingRequest, RequestError> {
    if body
        .iter()
        .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
    {
        return Err(RequestError::EmptyBody);
    }

    let value: Value = serde_json::from_slice(body).map_err(|err| {
        tracing::debug!("malformed request body: {err:#}");
        RequestError::InvalidJson
    })?;
    match value {
        Value::Null => Ok(RatingRequest::default()),
        value @ Value::Object(_) => serde_json::from_value(value).map_err(|err| {
            tracing::debug!("request body has the wrong shape: {err:#}");
            RequestError::InvalidJson
        }),
        _ => Err(RequestError::InvalidJson),
    }
}

/// A validated game, ready to be rated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Game {
    player_rating: f64,
    opponent_rating: f64,
    result: f64,
}

impl Game {
    /// The rating of the player being rated.
    pub fn player_rating(&self) -> f64 {
        self.player_rating
    }

    pub fn opponent_rating(&self) -> f64 {
        self.opponent_rating
    }

    /// The actual result, in `[0.0, 1.0]`.
    pub fn result(&self) -> f64 {
        self.result
    }
}

/// A rejected request. The display text is sent back to the client verbatim.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum RequestError {
    #[display("body is empty")]
    EmptyBody,
    #[display("invalid json")]
    InvalidJson,
    #[display("missing field(s):\n{}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
    #[display("result must be between 0.0 and 1.0")]
    ResultOutOfRange,
}

/// Body of a successful `POST /new_rating` response.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct RatingResponse {
    pub new_rating: f64,
    pub gor_change: f64,
    pub expected_result: f64,
    pub con: f64,
    pub bonus: f64,
    /// Beta of the player's old rating.
    pub beta: f64,
}

impl RatingResponse {
    /// Encode the response as JSON.
    ///
    /// JSON has no representation for NaN or infinities, so any non-finite field is an error
    /// rather than being silently written as `null`.
    pub fn to_json(&self) -> Result<Vec<u8>, ResponseError> {
        for (field, value) in [
            ("new_rating", self.new_rating),
            ("gor_change", self.gor_change),
            ("expected_result", self.expected_result),
            ("con", self.con),
            ("bonus", self.bonus),
            ("beta", self.beta),
        ] {
            if !value.is_finite() {
                return Err(ResponseError::NonFinite { field, value });
            }
        }
        Ok(serde_json::to_vec(self)?)
    }
}

#[derive(Debug, Display, Error, From)]
pub enum ResponseError {
    #[display("{field} is not finite ({value})")]
    #[from(ignore)]
    NonFinite { field: &'static str, value: f64 },
    #[display("{_0}")]
    Json(serde_json::Error),
}
