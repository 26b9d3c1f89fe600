//! Server-rendered HTML views.
//!
//! Every piece of user-supplied text goes through [`escape`] before it is
//! interpolated into markup.

use crate::db::{DbBattery, DbDevice, MAX_BATTERIES_PER_DEVICE};
use std::fmt::Write as _;

/// Escapes text for use in HTML element content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · cellhub</title>
<link rel="stylesheet" href="/static/style.css">
<script src="/static/app.js" defer></script>
</head>
<body>
<nav><a href="/">Home</a> <a href="/devices">Devices</a> <a href="/batteries">Batteries</a></nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn battery_items(batteries: &[DbBattery]) -> String {
    if batteries.is_empty() {
        return "<p>No batteries.</p>\n".to_string();
    }
    let mut out = String::from("<ul>\n");
    for battery in batteries {
        let _ = writeln!(
            out,
            r#"<li><a href="/batteries/{id}">{name}</a> (device <a href="/devices/{device_id}">#{device_id}</a>)</li>"#,
            id = battery.id,
            name = escape(&battery.name),
            device_id = battery.device_id,
        );
    }
    out.push_str("</ul>\n");
    out
}

pub fn index() -> String {
    layout(
        "Device inventory",
        r#"<p>Manage devices and the batteries attached to them.</p>
<ul>
<li><a href="/devices">Devices</a></li>
<li><a href="/batteries">Batteries</a></li>
</ul>
"#,
    )
}

pub fn device_list(devices: &[DbDevice]) -> String {
    let mut body = String::new();
    if devices.is_empty() {
        body.push_str("<p>No devices yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for device in devices {
            let _ = writeln!(
                body,
                r#"<li><a href="/devices/{id}">{name}</a></li>"#,
                id = device.id,
                name = escape(&device.name),
            );
        }
        body.push_str("</ul>\n");
    }
    body.push_str(
        r#"<h2>New device</h2>
<form method="post" action="/devices">
<input name="name" required placeholder="Name">
<button type="submit">Create</button>
</form>
"#,
    );
    layout("Devices", &body)
}

pub fn device_detail(device: &DbDevice, batteries: &[DbBattery]) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<p>Device #{id}</p>
<form method="post" action="/devices/{id}">
<input name="name" required value="{name}">
<button type="submit">Rename</button>
</form>
<button data-delete="/devices/{id}" data-next="/devices">Delete device</button>
<h2>Batteries ({count}/{max})</h2>
"#,
        id = device.id,
        name = escape(&device.name),
        count = batteries.len(),
        max = MAX_BATTERIES_PER_DEVICE,
    );
    body.push_str(&battery_items(batteries));

    if (batteries.len() as i64) < MAX_BATTERIES_PER_DEVICE {
        let _ = write!(
            body,
            r#"<form method="post" action="/batteries">
<input type="hidden" name="device_id" value="{id}">
<input name="name" required placeholder="Battery name">
<button type="submit">Attach battery</button>
</form>
"#,
            id = device.id,
        );
    } else {
        body.push_str("<p>This device has reached its battery limit.</p>\n");
    }
    layout(&device.name, &body)
}

pub fn battery_list(batteries: &[DbBattery]) -> String {
    let mut body = battery_items(batteries);
    body.push_str(
        r#"<h2>New battery</h2>
<form method="post" action="/batteries">
<input name="name" required placeholder="Name">
<input name="device_id" type="number" required placeholder="Device id">
<button type="submit">Create</button>
</form>
"#,
    );
    layout("Batteries", &body)
}

pub fn battery_detail(battery: &DbBattery) -> String {
    let body = format!(
        r#"<p>Battery #{id}, attached to <a href="/devices/{device_id}">device #{device_id}</a></p>
<form method="post" action="/batteries/{id}">
<input name="name" required value="{name}">
<input name="device_id" type="number" required value="{device_id}">
<button type="submit">Save</button>
</form>
<button data-delete="/batteries/{id}" data-next="/batteries">Delete battery</button>
"#,
        id = battery.id,
        device_id = battery.device_id,
        name = escape(&battery.name),
    );
    layout(&battery.name, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<b onclick="x">'&'</b>"#),
            "&lt;b onclick=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn device_detail_hides_attach_form_at_limit() {
        let device = DbDevice {
            id: 1,
            name: "Sensor-A".to_string(),
        };
        let batteries: Vec<DbBattery> = (1..=5)
            .map(|i| DbBattery {
                id: i,
                name: format!("Cell-{i}"),
                device_id: 1,
            })
            .collect();

        let full = device_detail(&device, &batteries);
        assert!(full.contains("reached its battery limit"));
        assert!(!full.contains("Attach battery"));

        let partial = device_detail(&device, &batteries[..4]);
        assert!(partial.contains("Attach battery"));
    }

    #[test]
    fn device_names_are_escaped_in_lists() {
        let devices = vec![DbDevice {
            id: 7,
            name: "<script>".to_string(),
        }];
        let html = device_list(&devices);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
