use lambda_http::http::header::{HeaderValue, VARY};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Response};

pub fn with_cors_headers(mut resp: Response<Body>, allow_origin: &str) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(allow_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert("Access-Control-Allow-Methods", HeaderValue::from_static("GET,POST,OPTIONS"));
    headers.insert("Access-Control-Allow-Headers", HeaderValue::from_static("Content-Type"));
    headers.append(VARY, HeaderValue::from_static("Origin"));
    resp
}

pub fn finalize_response(resp: Result<Response<Body>, Error>, allow_origin: &str) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, allow_origin))
}

pub fn preflight() -> Result<Response<Body>, Error> {
    Ok(Response::builder().status(StatusCode::OK).body(Body::Empty).map_err(Box::new)?)
}

pub fn not_found() -> Result<Response<Body>, Error> {
    error_body(StatusCode::NOT_FOUND, "Not found")
}

pub fn method_not_allowed() -> Result<Response<Body>, Error> {
    error_body(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub fn bad_request(message: &str) -> Result<Response<Body>, Error> {
    error_body(StatusCode::BAD_REQUEST, message)
}

fn error_body(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({ "error": message }).to_string().into())
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_headers_use_configured_origin() {
        let resp = with_cors_headers(preflight().unwrap(), "https://cosmoscope.app");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "https://cosmoscope.app"
        );
        assert_eq!(resp.headers().get(VARY).unwrap(), "Origin");
    }

    #[test]
    fn invalid_origin_falls_back_to_wildcard() {
        let resp = with_cors_headers(not_found().unwrap(), "bad\norigin");
        assert_eq!(resp.headers().get("Access-Control-Allow-Origin").unwrap(), "*");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
