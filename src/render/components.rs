//! Shared HTML components used across all pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use pulldown_cmark::{html as md_html, Event, Options, Parser};

use crate::auth::models::Session;
use crate::common::helpers::{format_date, is_from_pexels, is_safe_url, truncate};
use crate::posts::models::{Pagination, Post};

/// Inline CSS for all pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#f3f4f6;--fg:#1f2937;--fg2:#4b5563;--fg3:#9ca3af;--accent:#2563eb;--accent-hover:#1d4ed8;--surface:#fff;--danger:#b91c1c;--danger-bg:#fee2e2;--border:#e5e7eb}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}
nav.top{display:flex;align-items:center;gap:1rem;padding:.75rem 1.5rem;background:var(--surface);border-bottom:1px solid var(--border)}
nav.top .brand{font-weight:800;font-size:1.25rem;color:var(--fg)}
nav.top form.search{flex:1;max-width:360px}
nav.top input{width:100%;padding:.4rem .75rem;border:1px solid var(--border);border-radius:6px}
nav.top .spacer{flex:1}
main{max-width:880px;margin:0 auto;padding:3rem 1rem}
.card{background:var(--surface);border-radius:10px;box-shadow:0 1px 3px rgba(0,0,0,.08);padding:1.5rem;margin-bottom:1.5rem}
.banner{padding:.75rem 1rem;border-radius:6px;margin-bottom:1.5rem;border:1px solid}
.banner.error{background:var(--danger-bg);border-color:#f87171;color:var(--danger)}
.banner.notice{background:#fef3c7;border-color:#f59e0b;color:#92400e}
.btn{display:inline-flex;align-items:center;gap:.4rem;padding:.5rem 1rem;border-radius:6px;border:none;background:var(--accent);color:#fff;font-weight:600;cursor:pointer}
.btn:hover{background:var(--accent-hover);text-decoration:none}
.btn.secondary{background:var(--surface);color:var(--fg);border:1px solid var(--border)}
.btn.danger{background:var(--danger)}
.btn.link{background:none;color:var(--fg2);padding:.25rem}
.avatar{width:40px;height:40px;border-radius:50%;background:var(--accent);color:#fff;display:inline-flex;align-items:center;justify-content:center;font-weight:700;overflow:hidden;flex-shrink:0}
.avatar img{width:100%;height:100%;object-fit:cover}
.meta{display:flex;flex-wrap:wrap;gap:1rem;color:var(--fg3);font-size:.9rem}
.post-card h2{font-size:1.25rem;margin-bottom:.4rem}
.post-card h2 a{color:var(--fg)}
.post-card p{color:var(--fg2);margin-bottom:.75rem}
.cover{width:100%;max-height:420px;object-fit:cover;border-radius:10px 10px 0 0}
.attribution{font-size:.8rem;color:var(--fg3);margin-top:.35rem}
.article h1{font-size:2rem;line-height:1.25;margin-bottom:.75rem}
.article-content{font-size:1.05rem;line-height:1.75;margin:1.5rem 0}
.article-content h1,.article-content h2,.article-content h3{margin:1.5rem 0 .75rem}
.article-content p{margin:.75rem 0}
.article-content ul,.article-content ol{margin:.75rem 0;padding-left:1.5rem}
.article-content blockquote{border-left:3px solid var(--border);padding-left:1rem;color:var(--fg2)}
.article-content pre{background:var(--bg);padding:.75rem 1rem;border-radius:6px;overflow-x:auto}
.article-content table{border-collapse:collapse;width:100%}
.article-content th,.article-content td{border:1px solid var(--border);padding:.4rem .75rem}
.comment{display:flex;gap:.75rem;padding:1rem 0;border-top:1px solid var(--border)}
.comment-body{flex:1}
.comment-head{display:flex;justify-content:space-between;align-items:center}
form.stack{display:flex;flex-direction:column;gap:1rem}
form.stack label{font-weight:600}
form.stack input[type=text],form.stack textarea,form.stack select{width:100%;padding:.6rem .75rem;border:1px solid var(--border);border-radius:6px;font:inherit}
form.stack textarea{min-height:240px}
.suggestions{display:grid;grid-template-columns:repeat(3,1fr);gap:.5rem}
.suggestions button{border:2px solid transparent;padding:0;border-radius:6px;overflow:hidden;cursor:pointer;aspect-ratio:4/3}
.suggestions button.selected{border-color:var(--accent)}
.suggestions img{width:100%;height:100%;object-fit:cover;display:block}
.pager{display:flex;justify-content:space-between;margin-top:1rem}
.hero{text-align:center;padding:3rem 0}
.hero h1{font-size:2.5rem;margin-bottom:1rem}
.features{display:grid;grid-template-columns:repeat(auto-fit,minmax(220px,1fr));gap:1rem;margin:2rem 0}
.empty{text-align:center;color:var(--fg3);padding:2rem 0}
"#;

/// Title-keystroke script for the compose page: posts each change and
/// fetches the suggestion fragment once the server-side timer settles.
pub const COMPOSE_JS: &str = r#"
(function(){
var title=document.getElementById('title');var box=document.getElementById('suggestions');
if(!title||!box)return;var poll=null;
function load(){fetch('/posts/new/suggestions',{credentials:'same-origin'}).then(function(r){
var pending=r.headers.get('X-Suggestions-Pending')==='true';return r.text().then(function(h){box.innerHTML=h;if(pending){poll=setTimeout(load,300);}});});}
title.addEventListener('input',function(){clearTimeout(poll);
var body=new URLSearchParams();body.set('title',title.value);
fetch('/posts/new/title',{method:'POST',body:body,credentials:'same-origin'}).then(function(){poll=setTimeout(load,600);});});
})();
"#;

pub fn page_shell(title: &str, session: Option<&Session>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Postly" }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                (top_nav(session))
                main { (body) }
            }
        }
    }
}

fn top_nav(session: Option<&Session>) -> Markup {
    html! {
        nav class="top" {
            a class="brand" href="/" { "Postly" }
            form class="search" action="/search" method="get" {
                input type="search" name="q" placeholder="Search posts..." aria-label="Search posts";
            }
            a href="/posts" { "Posts" }
            span class="spacer" {}
            @if let Some(session) = session {
                a class="btn" href="/posts/new" { "Write" }
                a href="/me/posts" { "My posts" }
                (avatar(session.display_name(), session.user.as_ref().map(|u| u.image.as_str())))
                form action="/auth/signout" method="post" {
                    button class="btn link" type="submit" { "Sign out" }
                }
            } @else {
                a class="btn" href="/auth/signin" { "Sign in" }
            }
        }
    }
}

/// Inline error banner for a failed fetch
pub fn error_banner(message: &str) -> Markup {
    html! {
        div class="banner error" role="alert" { p { (message) } }
    }
}

/// Notification for a failed mutation
pub fn notice(message: &str) -> Markup {
    html! {
        div class="banner notice" role="alert" { (message) }
    }
}

/// Profile picture, or the name's initial when there is none
pub fn avatar(name: &str, picture: Option<&str>) -> Markup {
    let initial = name.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
    html! {
        span class="avatar" title=(name) {
            @if let Some(url) = picture.filter(|p| is_safe_url(p)) {
                img src=(url) alt=(name) referrerpolicy="no-referrer";
            } @else {
                (initial)
            }
        }
    }
}

pub fn pexels_attribution() -> Markup {
    html! {
        p class="attribution" {
            "Photo provided by " a href="https://www.pexels.com" target="_blank" rel="noopener noreferrer" { "Pexels" }
        }
    }
}

pub fn cover_image(url: &str, alt: &str) -> Markup {
    html! {
        img class="cover" src=(url) alt=(alt);
        @if is_from_pexels(url) {
            (pexels_attribution())
        }
    }
}

pub fn post_card(post: &Post) -> Markup {
    let href = format!("/posts/{}", post.slug);
    html! {
        article class="card post-card" {
            h2 { a href=(href) { (post.title) } }
            p { (truncate(&post.content, 180)) }
            div class="meta" {
                span { (post.author.name) }
                span { (format_date(&post.created_at)) }
                span { (post.read_time) " min read" }
                span { (post.likes) " likes" }
                span { (post.comments.len()) " comments" }
            }
        }
    }
}

/// Previous/next links for a paginated listing at `base`
pub fn pager(base: &str, pagination: &Pagination) -> Markup {
    html! {
        @if pagination.has_previous() || pagination.has_next() {
            div class="pager" {
                @if pagination.has_previous() {
                    a class="btn secondary" href=(page_href(base, pagination.page - 1)) { "Previous" }
                } @else { span {} }
                span { "Page " (pagination.page) " of " (pagination.total_pages) }
                @if pagination.has_next() {
                    a class="btn secondary" href=(page_href(base, pagination.page + 1)) { "Next" }
                } @else { span {} }
            }
        }
    }
}

fn page_href(base: &str, page: u32) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", base, separator, page)
}

/// Render post Markdown to HTML.
///
/// GFM tables, strikethrough and task lists are enabled and single line
/// breaks are kept. Raw HTML in the source is emitted as text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::with_capacity(markdown.len() * 2);
    md_html::push_html(&mut html_output, parser);
    html_output
}
