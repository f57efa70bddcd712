//! Landing page for the multi-instance layout.

use genvisor_model::StatusSnapshot;

/// Render the instance index: one card per instance, linking to its tree
/// and showing whether the most recent generation run succeeded.
pub(crate) fn render(snapshots: &[StatusSnapshot]) -> String {
    let mut cards = String::new();
    for snapshot in snapshots {
        let (class, label) = if snapshot.success {
            ("ok", "OK")
        } else {
            ("failed", "Failed")
        };
        cards.push_str(&format!(
            r#"<div class="card"><a href="/{name}/">{name}</a><div class="state {class}">{label}</div></div>
"#,
            name = snapshot.name,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Instances</title>
<style>
body {{ font-family: sans-serif; background: #f5f5f5; margin: 0; padding: 20px; }}
h1 {{ text-align: center; color: #333; }}
.cards {{ display: flex; flex-wrap: wrap; justify-content: center; margin-top: 30px; }}
.card {{ background: white; border-radius: 8px; box-shadow: 0 2px 6px rgba(0,0,0,0.15);
        margin: 10px; padding: 20px; width: 180px; text-align: center; }}
.card a {{ text-decoration: none; color: #0070c0; font-weight: bold; display: block; }}
.state {{ margin-top: 10px; font-size: 12px; }}
.state.ok {{ color: green; }}
.state.failed {{ color: red; }}
</style>
</head>
<body>
<h1>Instances</h1>
<div class="cards">
{cards}</div>
</body>
</html>
"#
    )
}
