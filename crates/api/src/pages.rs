//! Server-rendered HTML for the gate views.
//!
//! Every page listens on `/api/v1/session/events` and reloads itself when the
//! view it was rendered for is no longer current, so the browser follows
//! store changes (sign-in in another tab, a refresh that failed, the initial
//! check completing) without polling.

use budgetra_auth::View;

/// A message shown above the authentication form.
#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    Error(&'a str),
    Info(&'a str),
}

/// Render the page for `view`.
pub fn render_view(view: &View) -> String {
    match view {
        View::Loading => layout(view.name(), "<p class=\"loading\">Loading...</p>"),
        View::SignIn => render_auth_form(None, ""),
        View::Main { user } => layout(
            view.name(),
            &format!(
                "<h1>Welcome to Budgetra</h1>\n\
                 <p>Signed in as <strong>{}</strong></p>\n\
                 <form method=\"post\" action=\"/auth/sign-out\">\
                 <button type=\"submit\">Sign out</button></form>",
                escape(&user.display_name())
            ),
        ),
    }
}

/// The authentication form, optionally with a notice and a prefilled email.
pub fn render_auth_form(notice: Option<Notice<'_>>, email: &str) -> String {
    let notice = match notice {
        Some(Notice::Error(msg)) => format!("<p class=\"error\" role=\"alert\">{}</p>\n", escape(msg)),
        Some(Notice::Info(msg)) => format!("<p class=\"info\">{}</p>\n", escape(msg)),
        None => String::new(),
    };
    layout(
        View::SignIn.name(),
        &format!(
            "<h1>Budgetra</h1>\n{notice}\
             <form method=\"post\" action=\"/auth/sign-in\">\n\
             <label>Email <input type=\"email\" name=\"email\" value=\"{}\" required></label>\n\
             <label>Password <input type=\"password\" name=\"password\" required></label>\n\
             <button type=\"submit\">Sign in</button>\n\
             <button type=\"submit\" formaction=\"/auth/sign-up\">Create account</button>\n\
             </form>",
            escape(email)
        ),
    )
}

fn layout(view_name: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>Budgetra</title></head>\n\
         <body data-view=\"{view_name}\">\n\
         {body}\n\
         <script>\n\
         new EventSource(\"/api/v1/session/events\").addEventListener(\"session\", (e) => {{\n\
           if (JSON.parse(e.data).view !== document.body.dataset.view) location.reload();\n\
         }});\n\
         </script>\n\
         </body>\n\
         </html>\n"
    )
}

/// Escape text for use in HTML element content and quoted attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use budgetra_auth::User;

    use super::*;

    fn user(email: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "id": "0b6c1d2e-3f40-4a5b-8c6d-7e8f9a0b1c2d",
            "email": email,
        }))
        .unwrap()
    }

    #[test]
    fn loading_page_shows_only_the_indicator() {
        let html = render_view(&View::Loading);
        assert!(html.contains("Loading..."));
        assert!(!html.contains("<form"));
        assert!(html.contains("data-view=\"loading\""));
    }

    #[test]
    fn main_page_escapes_the_email() {
        let html = render_view(&View::Main {
            user: user("<b>@example.com"),
        });
        assert!(html.contains("Welcome to Budgetra"));
        assert!(html.contains("&lt;b&gt;@example.com"));
        assert!(!html.contains("<b>@"));
    }

    #[test]
    fn auth_form_shows_notice_and_keeps_email() {
        let html = render_auth_form(Some(Notice::Error("Invalid login credentials")), "a\"b@x.io");
        assert!(html.contains("role=\"alert\">Invalid login credentials"));
        assert!(html.contains("value=\"a&quot;b@x.io\""));
        assert!(html.contains("action=\"/auth/sign-in\""));
        assert!(html.contains("formaction=\"/auth/sign-up\""));
    }
}
