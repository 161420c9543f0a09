use crate::common::mock_server::{MockServerConfiguration, MockServerStorage};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use anyhow::anyhow;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

static REQUEST_ID_HEADER: &str = "X-Request-Id";
static SIGNATURE_HEADER: &str = "X-Signature";

#[derive(Deserialize)]
struct IncomingRequest {
    jsonrpc: String,
    id: String,
    method: String,
    params: IncomingParams,
}

#[derive(Deserialize)]
struct IncomingParams {
    program: String,
    instruction: String,
    #[allow(dead_code)]
    args: Value,
}

/// POST /
pub(super) async fn rpc(
    req: HttpRequest,
    body: web::Bytes,
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
) -> HttpResponse {
    storage.write().unwrap().requests += 1;

    if let Err(e) = validate_request(&req, &body, &configuration) {
        return HttpResponse::Unauthorized().json(error_body(Value::Null, -32001, &format!("{:?}", e)));
    }

    let incoming: IncomingRequest = match serde_json::from_slice(&body) {
        Ok(incoming) => incoming,
        Err(_) => return HttpResponse::BadRequest().json(error_body(Value::Null, -32700, "Parse error")),
    };
    let id = Value::String(incoming.id.clone());

    if incoming.jsonrpc != "2.0" {
        return HttpResponse::BadRequest().json(error_body(id, -32600, "Invalid request"));
    }
    if incoming.method != "sendInstruction" {
        return HttpResponse::Ok().json(error_body(id, -32601, "Method not found"));
    }
    if incoming.params.program != configuration.program_address {
        return HttpResponse::Ok().json(error_body(id, -32602, "Invalid params: unknown program"));
    }

    let mut storage = storage.write().unwrap();
    storage.calls.push(incoming.params.instruction.clone());

    if let Some(status) = storage.fail_next.take() {
        return HttpResponse::build(StatusCode::from_u16(status).unwrap()).finish();
    }

    let mut response = match incoming.params.instruction.as_str() {
        // The program account can only be created once
        "initialize" if storage.initialized => HttpResponse::Ok().json(error_body(
            id,
            -32002,
            "Transaction simulation failed: custom program error: 0x0",
        )),
        "initialize" => {
            storage.initialized = true;
            HttpResponse::Ok().json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": Uuid::new_v4().simple().to_string()
            }))
        }
        _ => HttpResponse::Ok().json(error_body(id, -32602, "Invalid params: unknown instruction")),
    };

    response.headers_mut().insert(
        REQUEST_ID_HEADER.parse().unwrap(),
        incoming.id.parse().unwrap(),
    );
    response
}

/// Checks the user agent and the request signature.
fn validate_request(
    req: &HttpRequest,
    body: &[u8],
    configuration: &MockServerConfiguration,
) -> Result<(), anyhow::Error> {
    anyhow::ensure!(
        req.headers()
            .get("User-Agent")
            .map(|v| v.to_str())
            .transpose()?
            == Some(concat!("program-smoke/", env!("CARGO_PKG_VERSION"))),
        "Invalid User-Agent"
    );

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .map(|v| v.as_bytes())
        .ok_or_else(|| anyhow!("Missing required request id"))?;

    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .map(|v| v.to_str())
        .transpose()?
        .ok_or_else(|| anyhow!("Missing required signature"))?;
    if truelayer_signing::extract_jws_header(signature)?.kid != configuration.signing_key_id {
        return Err(anyhow!("Invalid key id"));
    }

    truelayer_signing::verify_with_pem(configuration.signing_public_key.as_slice())
        .method(req.method().as_str())
        .path(req.path())
        .require_header(REQUEST_ID_HEADER)
        .header(REQUEST_ID_HEADER, request_id)
        .body(body)
        .verify(signature)?;

    Ok(())
}

fn error_body(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}
