//! Integrate twoface with other libraries, like Actix-web.

use crate::twoface::{FieldError, TfError};
use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};
use serde::Serialize;
use tracing::error;

// Twoface errors can be used as Actix-web errors.
// If a handler returns a Twoface error, the external portion will be shown to the user.
// The internal portion will only be logged.
impl actix_web::ResponseError for TfError {
    fn status_code(&self) -> StatusCode {
        self.external.cause.into()
    }

    fn error_response(&self) -> HttpResponse {
        error!("{:#}", self.internal);
        let resp = body_for(self.external.text, &self.external.fields).unwrap_or_else(|e| {
            error!("Serde error: {}", e.to_string());
            "{\"msg\": \"Server error\"}".to_owned()
        });
        HttpResponse::build(self.external.cause.into())
            .header(header::CONTENT_TYPE, "application/json")
            .body(resp)
    }
}

/// Serialize the user-facing error body. Validation failures carry their
/// per-field complaints in an `errors` array; every other error is just a `msg`.
fn body_for(msg: &str, fields: &[FieldError]) -> serde_json::Result<String> {
    if fields.is_empty() {
        serde_json::to_string(&MsgBody { msg })
    } else {
        serde_json::to_string(&ValidationBody {
            msg,
            errors: fields,
        })
    }
}

#[derive(Serialize)]
struct MsgBody<'a> {
    msg: &'a str,
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    msg: &'a str,
    errors: &'a [FieldError],
}
