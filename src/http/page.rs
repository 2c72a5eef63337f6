//! Dial page view model and HTML rendering.

use serde::Serialize;

use crate::toggle::RecencyState;

/// Name of the form field carrying the new dial value.
pub const FIELD_NAME: &str = "smp";

/// Dial value that renders the "Enabled" radio as checked.
const ENABLED: &str = "enabled";

/// Everything the page needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialView {
    pub value: String,
    pub is_recent: bool,
    pub remaining_seconds: u32,
    pub remaining_ticks: u32,
    pub field_name: &'static str,
    pub action_uri: String,
}

impl DialView {
    pub fn new(value: String, recency: RecencyState, action_uri: &str) -> Self {
        Self {
            value,
            is_recent: recency.is_recent,
            remaining_seconds: recency.remaining_seconds(),
            remaining_ticks: recency.remaining_ticks,
            field_name: FIELD_NAME,
            action_uri: action_uri.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.value == ENABLED
    }
}

/// Render the dial page.
pub fn render_page(view: &DialView) -> String {
    let (enabled_checked, disabled_checked) = if view.is_enabled() {
        (r#" checked="checked""#, "")
    } else {
        ("", r#" checked="checked""#)
    };

    let timer = if view.is_recent {
        format!(r#"<div id="dials-timer">{} seconds</div>"#, view.remaining_seconds)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Dials Simulator</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/4.0.0/css/bootstrap.min.css">
    <link href="data:image/x-icon;base64,{icon}" rel="icon" type="image/x-icon">
</head>
<body>

<div class="container mx-auto p-5 mt-5 w-25 border border-primary rounded bg-light">
    <h3>Dials Simulator</h3>
    <p>SMP status is {value}</p>
    <form method="POST" action="{uri}">
        <div class="form-check">
            <label><input class="form-check-input" type="radio" name="{field}"{enabled_checked} value="enabled">Enabled</label>
        </div>
        <div class="form-check">
            <label><input class="form-check-input" type="radio" name="{field}"{disabled_checked} value="disabled">Disabled</label>
        </div>
        <button type="submit" class="btn btn-default">Submit</button>
    </form>
    <div class="mt-3" style="min-height: 24px">
        {timer}
    </div>
</div>
<script>
    "use strict";
    var timerDiv = document.getElementById('dials-timer');
    if (timerDiv) {{
        var original = {ticks} * 100;
        var start = Date.now();
        var secs = Math.round(original / 1000);
        var ticker = setInterval(frame, 100);

        function frame() {{
            var remaining = original + start - Date.now();
            if (remaining <= 0) {{
                clearInterval(ticker);
                timerDiv.parentNode.removeChild(timerDiv);
            }} else {{
                var newSecs = Math.round(remaining / 1000);
                if (newSecs !== secs) {{
                    secs = newSecs;
                    timerDiv.textContent = secs + ' seconds';
                }}
            }}
        }}
    }}
</script>
</body>
</html>
"#,
        icon = FAVICON_BASE64,
        value = html_escape(&view.value),
        uri = html_escape(&view.action_uri),
        field = html_escape(view.field_name),
        ticks = view.remaining_ticks,
    )
}

/// Escape HTML special characters
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Inline icon so browsers do not issue a favicon request on every GET.
const FAVICON_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAABgAAAAeCAYAAAA2Lt7lAAAAOklEQVRIS\
+3SMQoAAAjDQPv/R9cnZHIyzgHhaNp2Di8+IF2JSGgkkggFMHBFEqEABq5IIhTAwB\
U9IFq9Cnen3UNVJgAAAABJRU5ErkJggg==";
