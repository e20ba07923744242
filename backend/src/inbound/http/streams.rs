//! Play event handlers.
//!
//! ```text
//! POST /api/v1/streams {"songId":"…","isPreview":true,"countryCode":"NG"}
//! GET /api/v1/songs/{id}/streams/count
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{STREAM_COUNT_WINDOW_DAYS, StreamRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MaybeAuthenticated;
use crate::inbound::http::dto::StreamResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require};

const SONG_ID: FieldName = FieldName::new("songId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamBody {
    pub song_id: Option<String>,
    /// Previews may be streamed anonymously. Defaults to `false`.
    #[serde(default)]
    pub is_preview: bool,
    pub device_type: Option<String>,
    /// ISO 3166 alpha-2 code; case-insensitive.
    pub country_code: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamCountResponse {
    pub song_id: Uuid,
    pub count: i64,
    pub window_days: i64,
}

/// Record a play.
///
/// Full plays need a token and an entitlement: a purchase of the song or its
/// album, or the song's own artist profile.
#[utoipa::path(
    post,
    path = "/api/v1/streams",
    request_body = StreamBody,
    responses(
        (status = 201, description = "Play recorded", body = StreamResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Anonymous full stream", body = ErrorSchema),
        (status = 403, description = "Song not purchased", body = ErrorSchema),
        (status = 404, description = "Song not found", body = ErrorSchema)
    ),
    tags = ["streams"],
    operation_id = "recordStream",
    security((), ("bearer" = []))
)]
#[post("/streams")]
pub async fn record_stream(
    state: web::Data<HttpState>,
    auth: MaybeAuthenticated,
    payload: web::Json<StreamBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = StreamRequest {
        song_id: parse_uuid(require(body.song_id, SONG_ID)?, SONG_ID)?,
        is_preview: body.is_preview,
        device_type: body.device_type,
        country_code: body.country_code,
    };
    let event = state.streams.record(auth.caller(), request).await?;
    Ok(HttpResponse::Created().json(StreamResponse::from(event)))
}

/// Plays of a song over the reporting window.
#[utoipa::path(
    get,
    path = "/api/v1/songs/{id}/streams/count",
    params(("id" = String, Path, description = "Song id")),
    responses(
        (status = 200, description = "Recent plays", body = StreamCountResponse),
        (status = 404, description = "Song not found", body = ErrorSchema)
    ),
    tags = ["streams"],
    operation_id = "recentStreamCount",
    security([])
)]
#[get("/songs/{id}/streams/count")]
pub async fn stream_count(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StreamCountResponse>> {
    let song_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let count = state.streams.recent_count(&song_id).await?;
    Ok(web::Json(StreamCountResponse {
        song_id,
        count,
        window_days: STREAM_COUNT_WINDOW_DAYS,
    }))
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{TestMarketplace, bearer, error_code, send};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn stream(market: &TestMarketplace, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = TestRequest::post().uri("/api/v1/streams").set_json(body);
        if let Some(token) = token {
            request = request.insert_header((AUTHORIZATION, bearer(token)));
        }
        send(&market.state, request.to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_previews_are_recorded_and_counted() {
        let market = TestMarketplace::new();
        let (_, artist) = market.artist("tems");
        let song = market.song(&artist, 100);

        let (status, event) = stream(
            &market,
            None,
            json!({"songId": song.id, "isPreview": true, "countryCode": "ng"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event["userId"], Value::Null);
        assert_eq!(event["countryCode"], "NG");

        let (_, count) = send(
            &market.state,
            TestRequest::get()
                .uri(&format!("/api/v1/songs/{}/streams/count", song.id))
                .to_request(),
        )
        .await;
        assert_eq!(count["count"], 1);
        assert_eq!(count["windowDays"], 30);
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_full_streams_are_unauthorized() {
        let market = TestMarketplace::new();
        let (_, artist) = market.artist("tems");
        let song = market.song(&artist, 100);

        let (status, body) = stream(&market, None, json!({"songId": song.id})).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "unauthorized");
    }

    #[rstest]
    #[actix_web::test]
    async fn full_streams_need_a_purchase() {
        let market = TestMarketplace::new();
        let fan = market.listener("ada");
        let (_, artist) = market.artist("tems");
        let song = market.song(&artist, 100);
        let token = market.token_for(&fan);

        let (denied, _) = stream(&market, Some(&token), json!({"songId": song.id})).await;
        assert_eq!(denied, StatusCode::FORBIDDEN);

        let (bought, _) = send(
            &market.state,
            TestRequest::post()
                .uri("/api/v1/purchases/songs")
                .insert_header((AUTHORIZATION, bearer(&token)))
                .set_json(json!({"userId": fan.id.to_string(), "songId": song.id}))
                .to_request(),
        )
        .await;
        assert_eq!(bought, StatusCode::CREATED);

        let (allowed, event) = stream(&market, Some(&token), json!({"songId": song.id})).await;
        assert_eq!(allowed, StatusCode::CREATED);
        assert_eq!(event["userId"], json!(fan.id.to_string()));
    }

    #[rstest]
    #[actix_web::test]
    async fn artists_stream_their_own_songs_in_full() {
        let market = TestMarketplace::new();
        let (owner, artist) = market.artist("tems");
        let song = market.song(&artist, 100);

        let (status, _) = stream(
            &market,
            Some(&market.token_for(&owner)),
            json!({"songId": song.id, "deviceType": "web"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
    }

    #[rstest]
    #[actix_web::test]
    async fn counting_an_unknown_song_is_not_found() {
        let market = TestMarketplace::new();

        let (status, _) = send(
            &market.state,
            TestRequest::get()
                .uri("/api/v1/songs/3fa85f64-5717-4562-b3fc-2c963f66afa6/streams/count")
                .to_request(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
