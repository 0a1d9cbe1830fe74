//! Server-rendered HTML for the access form and the dashboard.

use crate::gate::ViewState;
use crate::integrations::{Affordance, INTEGRATIONS, IntegrationDescriptor};

const STYLE: &str = "\
body{margin:0;min-height:100vh;background:#121212;color:#fffafa;font-family:system-ui,sans-serif}\
.center{min-height:100vh;display:flex;align-items:center;justify-content:center}\
.panel{width:100%;max-width:28rem;border-radius:.5rem;background:#1a1a1a;padding:2rem}\
h1{font-size:1.25rem;font-weight:600}\
label{display:block;font-size:.875rem;margin-bottom:.5rem}\
input{box-sizing:border-box;width:100%;padding:.5rem 1rem;border-radius:.5rem;background:#1f2937;border:1px solid #374151;color:inherit;margin-bottom:1.5rem}\
button{width:100%;padding:.5rem 1rem;border:0;border-radius:.5rem;background:#9dc183;color:#fff;cursor:pointer}\
button:disabled{background:#374151;cursor:default}\
.error{color:#ef4444;font-size:.875rem}\
header{background:#1a1a1a;border-bottom:1px solid #1f2937;padding:1rem 2rem}\
main{max-width:80rem;margin:0 auto;padding:2rem}\
.grid{display:grid;gap:1.5rem;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr))}\
.card{border-radius:.5rem;background:#1a1a1a;padding:1.5rem;text-align:center}\
.card img{width:4rem;height:2rem;object-fit:contain}\
.card p{font-size:.875rem;color:#9ca3af}\
.disconnect{background:transparent;color:#ef4444}";

/// Render whichever view the state calls for.
#[must_use]
pub fn page(view: &ViewState) -> String {
    if view.is_authenticated() {
        dashboard()
    } else {
        login(view)
    }
}

#[must_use]
pub fn login(view: &ViewState) -> String {
    let form = view.form();
    let error = view
        .error()
        .map(|err| format!("<p class=\"error\" role=\"alert\">{}</p>", escape(&err.to_string())))
        .unwrap_or_default();

    document(
        "Integrations Dashboard",
        &format!(
            "<div class=\"center\"><div class=\"panel\">\
<h1>Integrations Dashboard</h1>\
<form method=\"post\" action=\"/\">\
<label for=\"phoneNumber\">Phone Number</label>\
<input id=\"phoneNumber\" type=\"tel\" name=\"phoneNumber\" value=\"{phone}\" placeholder=\"+1234567890\">\
<label for=\"dateOfBirth\">Date of Birth</label>\
<input id=\"dateOfBirth\" type=\"date\" name=\"dateOfBirth\" value=\"{date}\">\
{error}\
<button type=\"submit\">Access Dashboard</button>\
</form></div></div>",
            phone = escape(&form.phone_number),
            date = escape(&form.date_of_birth),
        ),
    )
}

#[must_use]
pub fn dashboard() -> String {
    let cards: String = INTEGRATIONS.iter().map(card).collect();

    document(
        "Integration Dashboard",
        &format!(
            "<header><h1>Integration Dashboard</h1></header>\
<main><div class=\"grid\">{cards}</div></main>"
        ),
    )
}

fn card(integration: &IntegrationDescriptor) -> String {
    let name = escape(integration.name);
    let action = match integration.affordance() {
        Affordance::ComingSoon => {
            "<button type=\"button\" class=\"coming-soon\" disabled>Coming Soon</button>".to_string()
        }
        Affordance::Disconnect => format!(
            "<button type=\"button\" class=\"disconnect\" aria-label=\"Disconnect {name}\">Disconnect</button>"
        ),
        Affordance::Connect => {
            "<button type=\"button\" class=\"connect\">Connect</button>".to_string()
        }
    };

    format!(
        "<div class=\"card\" data-integration=\"{id}\">\
<img src=\"{logo}\" alt=\"{name}\">\
<h3>{name}</h3><p>{description}</p>{action}</div>",
        id = escape(integration.id),
        logo = escape(&integration.logo.url()),
        description = escape(integration.description),
    )
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title><style>{STYLE}</style></head><body>{body}</body></html>"
    )
}

/// Escape text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
