//! Server-rendered HTML pages.

use std::fmt::Write;

use crate::models::*;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const HTML5_QRCODE_JS: &str = "https://unpkg.com/html5-qrcode@2.3.8/html5-qrcode.min.js";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} · Smart Inventory</title>
  <link rel="stylesheet" href="{BOOTSTRAP_CSS}">
</head>
<body>
  <nav class="navbar navbar-dark bg-dark mb-4">
    <div class="container">
      <a class="navbar-brand" href="/">Smart Inventory</a>
      <a class="btn btn-outline-light btn-sm" href="/scan">Scan</a>
    </div>
  </nav>
  <main class="container">
{body}
  </main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn badge(status: EquipmentStatus) -> String {
    format!(
        r#"<span class="badge text-bg-{}">{}</span>"#,
        status.badge(),
        status.label()
    )
}

/// List of all items plus the registration form.
pub fn index_page(equipment: &[Equipment]) -> String {
    let mut rows = String::new();
    for item in equipment {
        let _ = write!(
            rows,
            r#"
        <tr>
          <td><a href="/item/{id}">{name}</a></td>
          <td>{location}</td>
          <td>{status}</td>
          <td><img src="/static/{qr}" alt="QR code" width="48" height="48"></td>
        </tr>"#,
            id = item.id,
            name = escape(&item.name),
            location = escape(&item.location),
            status = badge(item.status),
            qr = escape(&item.qrcode_path),
        );
    }

    if equipment.is_empty() {
        rows.push_str(
            r#"
        <tr><td colspan="4" class="text-muted">No equipment registered yet.</td></tr>"#,
        );
    }

    let body = format!(
        r#"    <div class="row g-4">
      <div class="col-lg-4">
        <h2 class="h5">Add equipment</h2>
        <form method="post" action="/equipment/add">
          <div class="mb-2">
            <label class="form-label" for="name">Name</label>
            <input class="form-control" id="name" name="name" maxlength="{MAX_NAME_LEN}" required>
          </div>
          <div class="mb-2">
            <label class="form-label" for="location">Location</label>
            <input class="form-control" id="location" name="location" maxlength="{MAX_LOCATION_LEN}" required>
          </div>
          <div class="mb-3">
            <label class="form-label" for="notes">Notes</label>
            <textarea class="form-control" id="notes" name="notes" maxlength="{MAX_NOTES_LEN}" rows="3"></textarea>
          </div>
          <button class="btn btn-primary" type="submit">Add</button>
        </form>
      </div>
      <div class="col-lg-8">
        <h2 class="h5">Equipment</h2>
        <table class="table align-middle">
          <thead><tr><th>Name</th><th>Location</th><th>Status</th><th>Code</th></tr></thead>
          <tbody>{rows}
          </tbody>
        </table>
      </div>
    </div>"#
    );

    layout("Equipment", &body)
}

/// Detail page for one item, with status and history controls.
pub fn item_page(detail: &EquipmentDetail) -> String {
    let item = &detail.equipment;

    let mut options = String::new();
    for status in EquipmentStatus::ALL {
        let selected = if status == item.status { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{}"{}>{}</option>"#,
            status.as_str(),
            selected,
            status.label()
        );
    }

    let mut history = String::new();
    for entry in &detail.history {
        let user = entry
            .user
            .as_deref()
            .map(|u| format!(r#" <span class="text-muted">by {}</span>"#, escape(u)))
            .unwrap_or_default();
        let _ = write!(
            history,
            r#"
          <li class="list-group-item"><small class="text-muted">{}</small> {}{}</li>"#,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            escape(&entry.action),
            user
        );
    }
    if detail.history.is_empty() {
        history.push_str(
            r#"
          <li class="list-group-item text-muted">No history yet.</li>"#,
        );
    }

    let notes = item
        .notes
        .as_deref()
        .map(|n| format!(r#"<p class="mb-1">{}</p>"#, escape(n)))
        .unwrap_or_default();

    let body = format!(
        r#"    <div class="row g-4">
      <div class="col-md-4 text-center">
        <img class="img-fluid border" src="/static/{qr}" alt="QR code">
        <p class="small text-muted mt-2 text-break">{id}</p>
      </div>
      <div class="col-md-8">
        <h1 class="h3">{name} {status}</h1>
        <p class="mb-1"><strong>Location:</strong> {location}</p>
        {notes}
        <p class="small text-muted">Registered {created}</p>

        <div class="input-group mb-4" style="max-width: 24rem">
          <select class="form-select" id="status">{options}</select>
          <button class="btn btn-outline-primary" id="save-status" type="button">Update status</button>
        </div>

        <h2 class="h5">History</h2>
        <ul class="list-group mb-3">{history}
        </ul>
        <form id="history-form" class="row g-2">
          <div class="col-sm-6"><input class="form-control" name="action" placeholder="Action" maxlength="{MAX_ACTION_LEN}" required></div>
          <div class="col-sm-4"><input class="form-control" name="user" placeholder="Who (optional)" maxlength="{MAX_USER_LEN}"></div>
          <div class="col-sm-2"><button class="btn btn-primary w-100" type="submit">Log</button></div>
        </form>
      </div>
    </div>
    <script>
      const base = "/equipment/{id}";
      async function send(method, url, payload) {{
        const res = await fetch(url, {{
          method,
          headers: {{ "Content-Type": "application/json" }},
          body: JSON.stringify(payload),
        }});
        if (res.ok) {{ location.reload(); }} else {{ alert(await res.text()); }}
      }}
      document.getElementById("save-status").addEventListener("click", () =>
        send("PATCH", base + "/status", {{ status: document.getElementById("status").value }}));
      document.getElementById("history-form").addEventListener("submit", (e) => {{
        e.preventDefault();
        const form = new FormData(e.target);
        send("POST", base + "/history", {{
          action: form.get("action"),
          user: form.get("user") || null,
        }});
      }});
    </script>"#,
        id = item.id,
        qr = escape(&item.qrcode_path),
        name = escape(&item.name),
        status = badge(item.status),
        location = escape(&item.location),
        created = item.created_at.format("%Y-%m-%d %H:%M UTC"),
    );

    layout(&item.name, &body)
}

/// Camera scanner; navigates to whatever item the code points at.
pub fn scan_page() -> String {
    let body = format!(
        r#"    <h1 class="h4">Scan a code</h1>
    <div id="reader" class="mx-auto" style="max-width: 32rem"></div>
    <p id="scan-result" class="text-center text-muted mt-3">Point the camera at an item's QR code.</p>
    <script src="{HTML5_QRCODE_JS}"></script>
    <script>
      const uuid = /^[0-9a-f]{{8}}-[0-9a-f]{{4}}-[0-9a-f]{{4}}-[0-9a-f]{{4}}-[0-9a-f]{{12}}$/i;
      const scanner = new Html5QrcodeScanner("reader", {{ fps: 10, qrbox: 250 }}, false);
      scanner.render((text) => {{
        scanner.clear();
        document.getElementById("scan-result").textContent = text;
        if (/^https?:\/\//.test(text)) {{
          window.location.href = text;
        }} else if (uuid.test(text)) {{
          window.location.href = "/item/" + text;
        }}
      }});
    </script>"#
    );

    layout("Scan", &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"    <div class="alert alert-warning">
      <h1 class="h4">{}</h1>
      <p class="mb-0">{}</p>
    </div>
    <a href="/">Back to the list</a>"#,
        escape(title),
        escape(message)
    );
    layout(title, &body)
}
