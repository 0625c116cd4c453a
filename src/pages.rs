//! Server-rendered HTML pages.

use axum::{response::Html, routing::get, Router};
use time::{macros::format_description, OffsetDateTime};
use tracing::instrument;

use crate::{
    session::{PredictionRecord, Session, UserRef},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

#[instrument(skip_all)]
pub async fn home(session: Session) -> Html<String> {
    Html(home_page(session.identity.as_ref()))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/prediction_history">History</a> | <a href="/login">Log in</a> | <a href="/register">Register</a> | <a href="/logout">Log out</a></nav>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn home_page(identity: Option<&UserRef>) -> String {
    let greeting = match identity {
        Some(user) => format!("<p>Signed in as {}</p>", escape(&user.email)),
        None => "<p>You are not signed in.</p>".to_string(),
    };
    let fields = [
        ("Pregnancies", "Pregnancies"),
        ("Glucose", "Glucose"),
        ("BloodPressure", "Blood pressure"),
        ("SkinThickness", "Skin thickness"),
        ("Insulin", "Insulin"),
        ("BMI", "BMI"),
        ("DiabetesPedigreeFunction", "Diabetes pedigree function"),
        ("Age", "Age"),
    ]
    .iter()
    .map(|(name, label)| {
        format!(
            r#"<label>{label} <input name="{name}" type="number" step="any" required></label><br>"#
        )
    })
    .collect::<String>();

    let body = format!(
        r#"<h1>Diabetes risk check</h1>
{greeting}
<form id="predict-form">
{fields}
<button type="submit">Predict</button>
</form>
<div id="result"></div>
<script>
document.getElementById("predict-form").addEventListener("submit", async (e) => {{
  e.preventDefault();
  const res = await fetch("/predict", {{ method: "POST", body: new URLSearchParams(new FormData(e.target)) }});
  const data = await res.json();
  const out = document.getElementById("result");
  out.textContent = "";
  if (!res.ok) {{ out.textContent = data.error; return; }}
  const p = document.createElement("p");
  p.textContent = data.predictionMessage + " (confidence " + data.confidenceScore + ")";
  out.appendChild(p);
  const ul = document.createElement("ul");
  for (const tip of data.healthTips) {{
    const li = document.createElement("li");
    li.textContent = tip;
    ul.appendChild(li);
  }}
  out.appendChild(ul);
}});
</script>"#
    );
    layout("Diabetes risk check", &body)
}

pub fn register_page() -> String {
    layout(
        "Register",
        r#"<h1>Register</h1>
<form method="post" action="/register">
<label>Email <input name="email" type="email" required></label><br>
<label>Password <input name="password" type="password" required></label><br>
<button type="submit">Register</button>
</form>"#,
    )
}

pub fn login_page() -> String {
    layout(
        "Log in",
        r#"<h1>Log in</h1>
<form method="post" action="/login">
<label>Email <input name="email" type="email" required></label><br>
<label>Password <input name="password" type="password" required></label><br>
<button type="submit">Log in</button>
</form>"#,
    )
}

pub fn history(records: &[PredictionRecord]) -> String {
    let body = if records.is_empty() {
        "<h1>Prediction history</h1>\n<p>No predictions yet.</p>".to_string()
    } else {
        let rows = records
            .iter()
            .map(|r| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    format_time(r.timestamp),
                    escape(&r.prediction_message),
                    escape(&r.confidence_score),
                )
            })
            .collect::<String>();
        format!(
            "<h1>Prediction history</h1>\n<table>\n<tr><th>Time</th><th>Prediction</th><th>Confidence</th></tr>\n{rows}</table>"
        )
    };
    layout("Prediction history", &body)
}

fn format_time(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_else(|_| ts.to_string())
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn home_shows_escaped_email() {
        let user = UserRef { id: 1, email: "<b>@example.com".into() };
        let html = home_page(Some(&user));
        assert!(html.contains("Signed in as &lt;b&gt;@example.com"));
        assert!(html.contains(r#"name="DiabetesPedigreeFunction""#));
    }

    #[test]
    fn empty_history_is_a_normal_page() {
        assert!(history(&[]).contains("No predictions yet."));
    }

    #[test]
    fn history_rows_keep_order_and_format_time() {
        let records = vec![
            PredictionRecord {
                timestamp: datetime!(2024-05-01 10:20:31 UTC),
                prediction_message: "newer".into(),
                confidence_score: "90.00%".into(),
            },
            PredictionRecord {
                timestamp: datetime!(2024-05-01 10:20:30 UTC),
                prediction_message: "older".into(),
                confidence_score: "60.00%".into(),
            },
        ];
        let html = history(&records);
        assert!(html.contains("<td>2024-05-01 10:20:31</td>"));
        let newer = html.find("newer").unwrap();
        let older = html.find("older").unwrap();
        assert!(newer < older);
    }
}
