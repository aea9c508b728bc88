use super::ServiceContext;
use crate::{compute_difference, TimeDiffError, TimeDifference};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use serde::Serialize;
use std::convert::Infallible;
use url::form_urlencoded;

pub const BANNER: &str = "Timezone Service 0.1.0-alpha";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

// The body is never read, so any request body type is accepted.
pub async fn route<B>(
    ctx: ServiceContext,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    log::info!("{} request to {}", req.method(), req.uri());

    let response = match req.uri().path() {
        "/health" => text(StatusCode::OK, "healthy"),
        "/locations" => json(StatusCode::OK, ctx.registry().list_all()),
        "/timediff" => match time_difference(&ctx, req.uri().query()) {
            Ok(time_difference) => json(StatusCode::OK, &time_difference),
            Err(e) => {
                log::warn!("timediff request failed. {e}");
                error_response(&e)
            }
        },
        // anything else falls back to the banner, like the root pattern
        _ => text(StatusCode::OK, BANNER),
    };
    Ok(response)
}

fn time_difference(
    ctx: &ServiceContext,
    query: Option<&str>,
) -> Result<TimeDifference, TimeDiffError> {
    let loc_from = query_param(query, "locFrom")?;
    let loc_too = query_param(query, "locToo")?;

    compute_difference(
        ctx.registry(),
        &loc_from,
        &loc_too,
        &ctx.now(),
        ctx.arithmetic(),
    )
}

/// First value of `name`. Empty values are treated as missing.
fn query_param(query: Option<&str>, name: &'static str) -> Result<String, TimeDiffError> {
    query
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|value| !value.is_empty())
        .ok_or(TimeDiffError::MissingParameter(name))
}

fn status_of(e: &TimeDiffError) -> StatusCode {
    match e {
        TimeDiffError::MissingParameter(_) | TimeDiffError::UnknownLocation(_) => {
            StatusCode::BAD_REQUEST
        }
        TimeDiffError::FormatAssumptionViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TimeDiffError::InvalidClock(_) | TimeDiffError::RegistryError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

fn error_response(e: &TimeDiffError) -> Response<Full<Bytes>> {
    let body = ErrorBody {
        error: e.kind(),
        message: e.to_string(),
    };
    json(status_of(e), &body)
}

fn text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    with_content_type(status, TEXT_PLAIN, Full::from(body))
}

fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => with_content_type(status, APPLICATION_JSON, Full::from(body)),
        Err(e) => {
            log::error!("failed to encode response. {e}");
            with_content_type(
                StatusCode::INTERNAL_SERVER_ERROR,
                TEXT_PLAIN,
                Full::from("internal error"),
            )
        }
    }
}

fn with_content_type(
    status: StatusCode,
    content_type: &'static str,
    body: Full<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ClockArithmetic, FixedClock, Registry};
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    fn ctx_at(hour: u32, minute: u32) -> ServiceContext {
        let now = Utc.with_ymd_and_hms(2022, 6, 21, hour, minute, 0).unwrap();
        ServiceContext::new(
            Registry::common().unwrap(),
            FixedClock(now),
            ClockArithmetic::Flat,
        )
    }

    async fn get(ctx: ServiceContext, uri: &str) -> (StatusCode, String, String) {
        let req = Request::get(uri).body(()).unwrap();
        let response = route(ctx, req).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (
            status,
            content_type,
            String::from_utf8(body.to_vec()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_banner() {
        let (status, content_type, body) = get(ctx_at(10, 0), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, TEXT_PLAIN);
        assert_eq!(body, "Timezone Service 0.1.0-alpha");

        let (status, _, body) = get(ctx_at(10, 0), "/some/where").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, BANNER);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get(ctx_at(10, 0), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "healthy");
    }

    #[tokio::test]
    async fn test_locations() {
        let (status, content_type, body) = get(ctx_at(10, 0), "/locations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, APPLICATION_JSON);

        let value: Value = serde_json::from_str(&body).unwrap();
        let mut keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["aib", "east-coast", "home", "uk", "west-coast"]);
        assert_eq!(
            value["home"],
            json!({
                "abbreviation": "CEST",
                "name": "Central European Summer Time",
                "locations": ["Europe", "Antarctica"],
                "offset": 200
            })
        );
    }

    #[tokio::test]
    async fn test_timediff() {
        let (status, content_type, body) =
            get(ctx_at(23, 30), "/timediff?locFrom=west-coast&locToo=aib").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, APPLICATION_JSON);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({
                "location_from": "west-coast",
                "location_from_time": "16:30",
                "location_too": "aib",
                "location_too_time": "00:30",
                "time_difference": -800
            })
        );
    }

    #[tokio::test]
    async fn test_timediff_is_idempotent() {
        let ctx = ctx_at(10, 0);
        let (_, _, first) = get(ctx.clone(), "/timediff?locFrom=uk&locToo=home").await;
        let (_, _, second) = get(ctx, "/timediff?locFrom=uk&locToo=home").await;
        assert_eq!(first, second);
        assert_eq!(
            serde_json::from_str::<Value>(&first).unwrap()["time_difference"],
            json!(-100)
        );
    }

    #[tokio::test]
    async fn test_timediff_missing_parameter() {
        let (status, content_type, body) = get(ctx_at(10, 0), "/timediff?locToo=uk").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, APPLICATION_JSON);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({
                "error": "missing_parameter",
                "message": "missing param `locFrom`"
            })
        );

        let (status, _, body) = get(ctx_at(10, 0), "/timediff?locFrom=uk&locToo=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("locToo"));

        let (status, _, _) = get(ctx_at(10, 0), "/timediff").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_timediff_unknown_location() {
        let (status, _, body) = get(ctx_at(10, 0), "/timediff?locFrom=uk&locToo=mars").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"], json!("unknown_location"));
        assert_eq!(value["message"], json!("unknown location `mars`"));
    }

    #[tokio::test]
    async fn test_timediff_format_assumption_violation() {
        let (status, _, body) = get(ctx_at(8, 0), "/timediff?locFrom=uk&locToo=home").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"], json!("format_assumption_violation"));
    }

    #[tokio::test]
    async fn test_timediff_decodes_query() {
        let (status, _, body) = get(
            ctx_at(10, 0),
            "/timediff?locFrom=%75k&locToo=home&locToo=west-coast",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["location_from"], json!("uk"));
        assert_eq!(value["location_too"], json!("home"));
    }
}
