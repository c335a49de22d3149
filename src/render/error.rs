//! Generic error page

use axum::http::StatusCode;
use maud::{html, Markup};

use super::components::{error_banner, page_shell};
use crate::auth::models::Session;

pub fn error_page(status: StatusCode, message: &str, session: Option<&Session>) -> Markup {
    let heading = status.canonical_reason().unwrap_or("Error");
    let body = html! {
        div class="card" {
            h1 { (status.as_u16()) " " (heading) }
            (error_banner(message))
            a class="btn secondary" href="/" { "Back to Postly" }
        }
    };

    page_shell(heading, session, body)
}
