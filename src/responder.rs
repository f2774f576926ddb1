use std::path::{Component, Path};

use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::config::ServerConfig;
use crate::request::Request;
use crate::response::Response;

/// Produce the response for a parsed request: a static file for GET,
/// 405 for every other method.
pub async fn respond(request: &Request, config: &ServerConfig) -> Response {
    if request.method != "GET" {
        return Response::method_not_allowed();
    }
    serve_file(&request.uri, config).await
}

async fn serve_file(uri: &str, config: &ServerConfig) -> Response {
    // "/" maps to the default document, anything else to the URI with
    // its leading slash stripped, under the document root.
    let name = if uri == "/" {
        config.default_document.as_str()
    } else {
        uri.strip_prefix('/').unwrap_or(uri)
    };

    if escapes_root(name) {
        return Response::forbidden();
    }

    let path = config.root_dir.join(name);

    let mut file = match File::open(&path).await {
        Ok(file) => file,
        Err(_) => return Response::not_found(),
    };

    match file.metadata().await {
        Ok(meta) if meta.is_file() => {}
        _ => return Response::not_found(),
    }

    // The file opened, so a failing read is a server-side problem, not a
    // missing page.
    let mut body = Vec::new();
    match file.read_to_end(&mut body).await {
        Ok(_) => Response::ok(body),
        Err(_) => Response::internal_error(),
    }
}

/// The original design resolved the URI with no traversal checks at all.
/// Requests whose path walks out of the document root are refused here
/// instead of being passed to the filesystem. An absolute name escapes
/// too: joining it onto the root would replace the root wholesale, so a
/// URI like `//etc/passwd` (one slash stripped, one left) must be
/// refused alongside `..` components.
fn escapes_root(name: &str) -> bool {
    Path::new(name)
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
}
