use anyhow::Context;
use gor_core::{
    message::{parse_request, RatingRequest, RequestError},
    rating,
};
use hyper::{
    header::{self, HeaderValue},
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use std::{convert::Infallible, future::Future, net::TcpListener};

/// Body of the response when a computed rating cannot be encoded.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "could not convert response to json.\nPLEASE NOTIFY API ADMIN\n";

/// Serve the rating API on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let server = Server::from_tcp(listener)
        .context(format!("failed to listen on {addr}"))?
        .serve(make_service_fn(|_conn| async {
            Ok::<_, Infallible>(service_fn(route))
        }));

    tracing::info!(%addr, "listening");
    server.with_graceful_shutdown(shutdown).await?;
    tracing::info!("server stopped");
    Ok(())
}

/// Dispatch a request to its handler.
pub async fn route(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::POST, "/new_rating") => new_rating(req.into_body()).await,
        (_, "/new_rating") => {
            let mut res = plain_text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            res.headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
            res
        }
        _ => plain_text(StatusCode::NOT_FOUND, "404 page not found"),
    };

    tracing::info!(%method, %path, status = %response.status(), "request");
    Ok(response)
}

/// Handle `POST /new_rating`.
pub async fn new_rating(body: Body) -> Response<Body> {
    let body = match hyper::body::to_bytes(body).await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!("error reading request body: {err:#}");
            return bad_request(RequestError::InvalidJson);
        }
    };

    let game = match parse_request(&body).and_then(RatingRequest::validate) {
        Ok(game) => game,
        Err(err) => {
            tracing::debug!(%err, "rejected request");
            return bad_request(err);
        }
    };

    let rating = rating::update(&game);
    match rating.to_json() {
        Ok(json) => {
            let mut res = Response::new(Body::from(json));
            res.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            res
        }
        Err(err) => {
            tracing::error!("could not encode rating: {err:#}");
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn bad_request(err: RequestError) -> Response<Body> {
    plain_text(StatusCode::BAD_REQUEST, err.to_string())
}

fn plain_text(status: StatusCode, message: impl Into<Body>) -> Response<Body> {
    let mut res = Response::new(message.into());
    *res.status_mut() = status;
    let headers = res.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    res
}
