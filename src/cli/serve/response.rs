//! HTTP responses of the preview server.
//!
//! Every response is `no-store`: the page and the files next to it change
//! while the preview is open. HEAD requests get the headers only.

use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::mime::{self, HTML, PLAIN};

/// Respond with the preview page.
pub fn respond_page(request: Request, page: String) -> Result<()> {
    respond(request, 200, HTML, page.into_bytes())
}

/// Respond with a file from the document's directory.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let body = if is_head(&request) {
        Vec::new()
    } else {
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    respond(request, 200, mime::from_path(path), body)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    respond(request, 404, PLAIN, b"404 Not Found".to_vec())
}

pub fn respond_bad_request(request: Request, reason: &str) -> Result<()> {
    respond(request, 400, PLAIN, reason.as_bytes().to_vec())
}

/// The server is shutting down.
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn respond(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let headers = [
        make_header("Content-Type", content_type)?,
        make_header("Cache-Control", "no-store")?,
    ];

    if is_head(&request) {
        let mut response = Response::empty(StatusCode(status));
        for header in headers {
            response.add_header(header);
        }
        request.respond(response)?;
    } else {
        let mut response = Response::from_data(body).with_status_code(StatusCode(status));
        for header in headers {
            response.add_header(header);
        }
        request.respond(response)?;
    }
    Ok(())
}

pub fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
