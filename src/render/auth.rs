//! Sign-in and sign-in error pages

use maud::{html, Markup};

use super::components::{error_banner, page_shell};

pub fn signin_page(configured: bool) -> Markup {
    let body = html! {
        div class="card hero" {
            h1 { "Sign in to Postly" }
            p { "Use your Google account to write posts, comment and like." }
            @if configured {
                a class="btn" href="/auth/signin/google" { "Sign in with Google" }
            } @else {
                (error_banner("Google sign-in is not configured on this server."))
            }
        }
    };

    page_shell("Sign in", None, body)
}

/// Human readable text for the error codes passed to `/auth/error`
pub fn describe_error(code: &str) -> &'static str {
    match code {
        "Configuration" => "There is a problem with the server configuration.",
        "AccessDenied" => "You do not have permission to sign in.",
        "OAuthState" => "The sign-in request expired. Please try again.",
        "OAuthCallback" => "The sign-in provider returned an error. Please try again.",
        _ => "Unable to sign in.",
    }
}

pub fn error_page(code: &str) -> Markup {
    let body = html! {
        div class="card hero" {
            h1 { "Sign in failed" }
            (error_banner(describe_error(code)))
            a class="btn" href="/auth/signin" { "Try again" }
        }
    };

    page_shell("Sign in failed", None, body)
}
