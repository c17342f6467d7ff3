//! Dumps the generated OpenAPI document to stdout.

use pitchboard_back::services::documentation::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let doc = ApiDoc::openapi();
    println!(
        "{}",
        doc.to_pretty_json().expect("serialize OpenAPI document")
    );
}
